// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Standards command - list registered compliance standards

use colored::Colorize;
use miette::Result;

use crate::catalog::{Platform, RuleCatalog};

/// Run the standards command
pub fn run(verbose: bool) -> Result<()> {
    let catalog = RuleCatalog::builtin();

    for standard in catalog.standards() {
        let coverage: Vec<String> = Platform::ALL
            .iter()
            .filter_map(|platform| {
                let supported = catalog
                    .rules_of(standard)
                    .filter(|rule| rule.supports(*platform))
                    .count();
                (supported > 0).then(|| format!("{} {}/{}", platform, supported, standard.len()))
            })
            .collect();

        println!(
            "{:<16} {:>3} rules  {}",
            standard.id.bold(),
            standard.len(),
            coverage.join(", ").dimmed()
        );
        if verbose {
            println!("{:<16} {}", "", standard.title);
        }
    }

    Ok(())
}
