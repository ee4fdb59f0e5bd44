// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Terminal status output
//!
//! Status lines go to stderr so stdout only ever carries requested data
//! (a dry-run document or a listing).

use std::io::IsTerminal;

use colored::Colorize;

/// Turn colors off when stderr is not a terminal or `NO_COLOR` is set
pub fn configure() {
    if std::env::var_os("NO_COLOR").is_some() || !std::io::stderr().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Print a styled header
pub fn print_header(title: &str) {
    eprintln!("{}", title.bold());
    eprintln!("{}", "═".repeat(title.chars().count().max(40)));
}

/// Print a styled section
pub fn print_section(title: &str) {
    eprintln!();
    eprintln!("{}:", title.bold());
}

/// Print a success check
pub fn print_success(msg: &str) {
    eprintln!("  {} {}", "✓".green(), msg);
}

/// Print a warning
pub fn print_warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg);
}

/// Print an info item
pub fn print_info(msg: &str) {
    eprintln!("  {} {}", "→".blue(), msg);
}
