// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! CLI command definitions and handlers
//!
//! Without a subcommand, policygen generates a hardening document. The
//! subcommands inspect the catalog or validate a configuration.

pub mod check;
pub mod generate;
pub mod rules;
pub mod standards;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::Platform;
use crate::config::UnknownKey;
use crate::errors::{PolicygenError, RecoverySuggestion};
use crate::utils;

/// Compliance hardening script generator
#[derive(Parser, Debug)]
#[clap(
    name = "policygen",
    version,
    about = "Generate compliance hardening scripts and playbooks from CIS-style benchmarks",
    long_about = None,
    subcommand_negates_reqs = true,
    after_help = "Examples:\n\
        policygen -c CIS-Linux-v8 -f hardening.yaml -o harden.sh -p shell\n\
        policygen -c CIS-Linux-v8 -f hardening.yaml -p ansible --dry-run\n\
        policygen standards                     List compliance standards\n\
        policygen rules -c CIS-Windows-11       List the rules of a standard\n\n\
        See 'policygen <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[clap(flatten)]
    pub generate: GenerateArgs,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments of the default generate invocation
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Compliance standard to apply (e.g. CIS-Linux-v8)
    #[clap(
        short = 'c',
        long,
        env = "POLICYGEN_STANDARD",
        required = true,
        value_name = "ID"
    )]
    pub compliance_standard: Option<String>,

    /// YAML (or .toml) file with setting overrides
    #[clap(short = 'f', long, required = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Where to write the generated document
    #[clap(
        short = 'o',
        long,
        required_unless_present = "dry_run",
        value_name = "PATH"
    )]
    pub output_file: Option<PathBuf>,

    /// Target platform (shell, ansible, powershell)
    #[clap(
        short = 'p',
        long,
        env = "POLICYGEN_PLATFORM",
        required = true,
        value_name = "NAME"
    )]
    pub platform: Option<Platform>,

    /// Print the document to stdout instead of writing it
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered compliance standards
    Standards,

    /// List the rules of a standard in catalog order
    Rules {
        /// Compliance standard id
        #[clap(short = 'c', long, env = "POLICYGEN_STANDARD", value_name = "ID")]
        compliance_standard: String,

        /// Only rules with a fragment for this platform
        #[clap(short = 'p', long, value_name = "NAME")]
        platform: Option<Platform>,

        /// Output format (text, json)
        #[clap(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a configuration file without generating anything
    Check {
        /// Compliance standard id
        #[clap(short = 'c', long, env = "POLICYGEN_STANDARD", value_name = "ID")]
        compliance_standard: String,

        /// Configuration file to validate
        #[clap(short = 'f', long, value_name = "PATH")]
        config_file: PathBuf,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Convert a library error into a report, printing next steps where useful
pub(crate) fn report(err: PolicygenError) -> miette::Report {
    let keys = err.offending_keys();
    if !keys.is_empty() {
        tracing::debug!(keys = ?keys, "Offending settings");
    }
    if let PolicygenError::UnknownStandard { .. } = err {
        eprint!("{}", RecoverySuggestion::list_standards());
    }
    err.into()
}

/// Print the unknown-key warnings of a load
pub(crate) fn print_unknown_keys(warnings: &[UnknownKey], standard: &str, verbose: bool) {
    if warnings.is_empty() {
        return;
    }

    utils::print_section("Unknown settings (ignored)");
    for unknown in warnings {
        match unknown.suggestion {
            Some(closest) => utils::print_warning(&format!(
                "{}: did you mean '{}'?",
                unknown.location, closest
            )),
            None => utils::print_warning(&unknown.location),
        }
        if verbose {
            let suggestion =
                RecoverySuggestion::fix_unknown_key(&unknown.key, unknown.suggestion, standard);
            for line in suggestion.to_string().lines() {
                eprintln!("    {}", line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "policygen", "-c", "CIS-Linux-v8", "-f", "cfg.yaml", "-o", "out.sh", "-p", "sh",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.generate.platform, Some(Platform::Shell));
        assert_eq!(cli.generate.output_file, Some(PathBuf::from("out.sh")));
    }

    #[test]
    fn test_dry_run_needs_no_output() {
        let cli = Cli::try_parse_from([
            "policygen", "-c", "CIS-Linux-v8", "-f", "cfg.yaml", "-p", "ansible", "--dry-run",
        ])
        .unwrap();

        assert!(cli.generate.dry_run);
        assert!(cli.generate.output_file.is_none());
    }

    #[test]
    fn test_subcommand_without_generate_flags() {
        let cli = Cli::try_parse_from(["policygen", "rules", "-c", "CIS-Windows-11", "--format", "json"])
            .unwrap();

        match cli.command {
            Some(Commands::Rules { format, platform, .. }) => {
                assert_eq!(format, OutputFormat::Json);
                assert!(platform.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_platform_is_rejected() {
        let result = Cli::try_parse_from([
            "policygen", "-c", "CIS-Linux-v8", "-f", "cfg.yaml", "-o", "out", "-p", "cobol",
        ]);
        assert!(result.is_err());
    }
}
