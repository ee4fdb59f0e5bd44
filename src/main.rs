// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! policygen - Compliance hardening generator
//!
//! Render CIS-style benchmarks into shell, Ansible or PowerShell artifacts.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use policygen::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let default_filter = if cli.verbose {
        "policygen=debug"
    } else {
        "policygen=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    policygen::utils::configure();

    // Dispatch to command handlers
    match cli.command {
        None => policygen::cli::generate::run(cli.generate, cli.verbose),
        Some(Commands::Standards) => policygen::cli::standards::run(cli.verbose),
        Some(Commands::Rules {
            compliance_standard,
            platform,
            format,
        }) => policygen::cli::rules::run(compliance_standard, platform, format, cli.verbose),
        Some(Commands::Check {
            compliance_standard,
            config_file,
        }) => policygen::cli::check::run(compliance_standard, config_file, cli.verbose),
    }
}
