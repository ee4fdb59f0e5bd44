// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Generate command - load, render and write a hardening document

use colored::Colorize;
use miette::Result;
use tracing::info;

use super::{print_unknown_keys, report, GenerateArgs};
use crate::catalog::RuleCatalog;
use crate::config::ConfigLoader;
use crate::emit;
use crate::render::Renderer;
use crate::utils;

/// Run the default generate invocation
pub fn run(args: GenerateArgs, verbose: bool) -> Result<()> {
    let (Some(standard), Some(config_file), Some(platform)) =
        (args.compliance_standard, args.config_file, args.platform)
    else {
        return Err(miette::miette!(
            "--compliance-standard, --config-file and --platform are required"
        ));
    };

    let catalog = RuleCatalog::builtin();
    let loader = ConfigLoader::new(catalog, &standard).map_err(report)?;
    let standard_id = loader.standard().id;

    if verbose {
        utils::print_header(&format!("Generating {} for {}", standard_id, platform));
    }

    let loaded = loader.load(&config_file).map_err(report)?;
    print_unknown_keys(&loaded.warnings, standard_id, verbose);

    let document = Renderer::new(catalog)
        .render(standard_id, platform, &loaded.config)
        .map_err(report)?;

    if !document.skipped().is_empty() {
        utils::print_section(&format!("Rules without a {} fragment (skipped)", platform));
        for skipped in document.skipped() {
            utils::print_warning(&format!("[{}] {}", skipped.section, skipped.key));
        }
    }

    if verbose {
        utils::print_section("Rules applied");
        for fragment in document.fragments() {
            utils::print_info(&format!(
                "[{}] {} = {}{}",
                fragment.section,
                fragment.key,
                fragment.value,
                if fragment.source == crate::render::ValueSource::Override {
                    " (override)".dimmed().to_string()
                } else {
                    String::new()
                }
            ));
        }
        eprintln!();
    }

    if args.dry_run {
        info!("Dry run; writing document to stdout");
        print!("{}", document);
        return Ok(());
    }

    let Some(output) = args.output_file else {
        return Err(miette::miette!("--output-file is required unless --dry-run is given"));
    };
    let written = emit::write(&document, &output).map_err(report)?;

    utils::print_success(&format!(
        "Wrote {} {} rules to {} (blake3:{})",
        document.fragments().len(),
        document.standard(),
        written.display(),
        &document.fingerprint()[..12]
    ));
    Ok(())
}
