// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Ansible playbook dialect
//!
//! Fragments are tasks; they are indented under a single play's `tasks:`.
//! Ansible templates every string with Jinja2, so quoted text that contains
//! a Jinja delimiter is tagged `!unsafe` and never evaluated.

use super::{provenance, Dialect, DocumentContext};
use crate::catalog::{OsFamily, Platform};

const JINJA_DELIMITERS: [&str; 3] = ["{{", "{%", "{#"];

/// Ansible playbook (YAML)
pub struct AnsibleDialect;

impl Dialect for AnsibleDialect {
    fn platform(&self) -> Platform {
        Platform::Ansible
    }

    /// JSON string syntax, which is also a YAML double-quoted scalar
    fn quote(&self, text: &str) -> String {
        let quoted = serde_json::Value::String(text.to_string()).to_string();
        if JINJA_DELIMITERS.iter().any(|d| text.contains(d)) {
            format!("!unsafe {}", quoted)
        } else {
            quoted
        }
    }

    fn indent(&self) -> &'static str {
        "    "
    }

    fn header(&self, ctx: &DocumentContext<'_>) -> String {
        // Windows hosts connect as an administrator; there is no sudo
        let privilege = match ctx.standard.family {
            OsFamily::Linux => "  become: true\n",
            OsFamily::Windows => "",
        };
        format!(
            "---\n\
             {}\
             - name: {}\n  \
             hosts: all\n\
             {}  \
             gather_facts: false\n  \
             tasks:\n",
            provenance(self, "Hardening playbook", ctx),
            self.quote(&format!("Apply {} hardening", ctx.standard.id)),
            privilege,
        )
    }

    fn footer(&self, ctx: &DocumentContext<'_>) -> String {
        self.comment(&format!(
            "End of {} tasks for {}",
            ctx.rule_count, ctx.standard.id
        ))
    }
}
