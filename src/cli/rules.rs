// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Rules command - list the rules of a standard

use colored::Colorize;
use miette::Result;
use serde_json::json;

use super::{report, OutputFormat};
use crate::catalog::{Platform, Rule, RuleCatalog};
use crate::errors::PolicygenError;

/// Run the rules command
pub fn run(
    standard: String,
    platform: Option<Platform>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let catalog = RuleCatalog::builtin();
    let standard = catalog.standard(&standard).map_err(report)?;

    let rules: Vec<&Rule> = catalog
        .rules_of(standard)
        .filter(|rule| platform.map_or(true, |p| rule.supports(p)))
        .collect();

    match format {
        OutputFormat::Json => {
            let output = json!({
                "standard": standard.id,
                "title": standard.title,
                "family": standard.family,
                "platform": platform,
                "rules": rules.iter().map(|rule| rule_json(rule)).collect::<Vec<_>>(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(PolicygenError::from)?
            );
        }
        OutputFormat::Text => {
            println!("{} {}", standard.id.bold(), standard.title.dimmed());
            println!();
            for rule in &rules {
                print_rule(rule, verbose);
            }
            println!();
            println!("{} rule(s)", rules.len());
        }
    }

    Ok(())
}

fn print_rule(rule: &Rule, verbose: bool) {
    let platforms = rule
        .platforms()
        .iter()
        .map(Platform::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "  {:<10} {} ({}, default {}) [{}] {}",
        rule.section,
        rule.key.cyan(),
        rule.value_type.describe(),
        rule.default,
        rule.severity,
        platforms.dimmed()
    );
    if verbose {
        println!("  {:<10} {}", "", rule.title);
    }
}

fn rule_json(rule: &Rule) -> serde_json::Value {
    json!({
        "key": rule.key,
        "section": rule.section,
        "title": rule.title,
        "severity": rule.severity,
        "type": rule.value_type.name(),
        "accepts": rule.value_type.describe(),
        "default": rule.default,
        "platforms": rule.platforms(),
    })
}
