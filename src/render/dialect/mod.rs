// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Output dialects
//!
//! A dialect owns everything platform-specific around the rule fragments:
//! how free text is quoted, how comments and indentation look, and what the
//! document header and footer contain.

mod ansible;
mod powershell;
mod shell;

pub use ansible::AnsibleDialect;
pub use powershell::PowerShellDialect;
pub use shell::ShellDialect;

use crate::catalog::{ComplianceStandard, Platform};

/// Facts about the document available to headers and footers
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub standard: &'a ComplianceStandard,
    pub platform: Platform,
    /// Number of rendered fragments
    pub rule_count: usize,
    pub generator_version: &'static str,
}

/// Platform-specific document conventions
pub trait Dialect: Send + Sync {
    /// Platform this dialect renders for
    fn platform(&self) -> Platform;

    /// Quote free text so the target interpreter reads it literally
    fn quote(&self, text: &str) -> String;

    /// Line comment marker
    fn comment_prefix(&self) -> &'static str {
        "#"
    }

    /// Indentation applied to every fragment line
    fn indent(&self) -> &'static str {
        ""
    }

    /// Document preamble, ending with a newline
    fn header(&self, ctx: &DocumentContext<'_>) -> String;

    /// Document trailer, ending with a newline
    fn footer(&self, ctx: &DocumentContext<'_>) -> String;

    /// Format text as comment lines, ending with a newline
    fn comment(&self, text: &str) -> String {
        text.lines()
            .map(|line| format!("{} {}\n", self.comment_prefix(), line))
            .collect()
    }
}

impl Platform {
    /// The dialect rendering this platform
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            Self::Shell => &ShellDialect,
            Self::Ansible => &AnsibleDialect,
            Self::PowerShell => &PowerShellDialect,
        }
    }
}

/// Comment block shared by every dialect's header
pub(crate) fn provenance(dialect: &dyn Dialect, kind: &str, ctx: &DocumentContext<'_>) -> String {
    dialect.comment(&format!(
        "{} generated by policygen {}\n\
         Standard: {} ({})\n\
         Platform: {}\n\
         Rules applied: {}\n\
         Do not edit by hand; regenerate from the configuration instead.",
        kind,
        ctx.generator_version,
        ctx.standard.id,
        ctx.standard.title,
        ctx.platform,
        ctx.rule_count,
    ))
}
