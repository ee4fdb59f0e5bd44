// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Check command - validate a configuration without rendering

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::{print_unknown_keys, report};
use crate::catalog::RuleCatalog;
use crate::config::ConfigLoader;
use crate::utils;

/// Run the check command
pub fn run(standard: String, config_file: PathBuf, verbose: bool) -> Result<()> {
    let catalog = RuleCatalog::builtin();
    let loader = ConfigLoader::new(catalog, &standard).map_err(report)?;
    let standard_id = loader.standard().id;

    utils::print_header(&format!("Checking {} against {}", config_file.display(), standard_id));

    let loaded = loader.load(&config_file).map_err(report)?;

    utils::print_success(&format!("{} override(s) valid", loaded.config.len()));
    if verbose {
        for (key, value) in loaded.config.iter() {
            utils::print_info(&format!("{} = {}", key, value));
        }
    }
    print_unknown_keys(&loaded.warnings, standard_id, verbose);

    eprintln!();
    if loaded.has_warnings() {
        eprintln!(
            "{}",
            "Configuration is valid but has unknown settings.".yellow().bold()
        );
    } else {
        eprintln!("{}", "Configuration is valid!".green().bold());
    }
    Ok(())
}
