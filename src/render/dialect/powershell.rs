// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! PowerShell dialect

use super::{provenance, Dialect, DocumentContext};
use crate::catalog::Platform;

/// ASCII apostrophe plus the typographic quotes PowerShell also accepts
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// PowerShell script
pub struct PowerShellDialect;

impl Dialect for PowerShellDialect {
    fn platform(&self) -> Platform {
        Platform::PowerShell
    }

    /// Verbatim single-quoted string; every character PowerShell reads as a
    /// single quote is doubled
    fn quote(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('\'');
        for c in text.chars() {
            if SINGLE_QUOTES.contains(&c) {
                out.push(c);
            }
            out.push(c);
        }
        out.push('\'');
        out
    }

    fn header(&self, ctx: &DocumentContext<'_>) -> String {
        format!(
            "#Requires -RunAsAdministrator\n\
             {}\
             Set-StrictMode -Version Latest\n\
             $ErrorActionPreference = 'Stop'\n\
             \n",
            provenance(self, "Hardening script", ctx)
        )
    }

    fn footer(&self, ctx: &DocumentContext<'_>) -> String {
        format!(
            "Write-Host {}\n",
            self.quote(&format!(
                "policygen: applied {} hardening rules for {}",
                ctx.rule_count, ctx.standard.id
            ))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_doubles_typographic_quotes() {
        let dialect = PowerShellDialect;

        assert_eq!(dialect.quote("it's"), "'it''s'");
        assert_eq!(
            dialect.quote("x\u{2019}; Remove-Item C:/tmp; \u{2018}"),
            "'x\u{2019}\u{2019}; Remove-Item C:/tmp; \u{2018}\u{2018}'"
        );
        assert_eq!(dialect.quote("\u{201A}\u{201B}"), "'\u{201A}\u{201A}\u{201B}\u{201B}'");
    }
}
