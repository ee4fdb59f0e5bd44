// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! POSIX shell dialect

use super::{provenance, Dialect, DocumentContext};
use crate::catalog::Platform;

/// POSIX `sh` script
pub struct ShellDialect;

impl Dialect for ShellDialect {
    fn platform(&self) -> Platform {
        Platform::Shell
    }

    /// Single quotes; embedded quotes become `'\''`
    fn quote(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', r"'\''"))
    }

    fn header(&self, ctx: &DocumentContext<'_>) -> String {
        format!(
            "#!/bin/sh\n\
             {}\
             set -eu\n\
             \n\
             if [ \"$(id -u)\" -ne 0 ]; then\n  \
             echo \"policygen: this script must be run as root\" >&2\n  \
             exit 1\n\
             fi\n\
             \n",
            provenance(self, "Hardening script", ctx)
        )
    }

    fn footer(&self, ctx: &DocumentContext<'_>) -> String {
        format!(
            "echo {}\n",
            self.quote(&format!(
                "policygen: applied {} hardening rules for {}",
                ctx.rule_count, ctx.standard.id
            ))
        )
    }
}
