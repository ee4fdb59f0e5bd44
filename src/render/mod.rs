// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Template renderer
//!
//! Composes the fragments of a standard's rules into one document for a
//! platform. Rules are always visited in catalog order, so the output never
//! depends on how the user ordered their configuration, and the same inputs
//! always produce byte-identical documents.

pub mod dialect;
mod template;

pub use dialect::{Dialect, DocumentContext};
pub use template::{Filter, Placeholder, Template};

use tracing::{debug, warn};

use crate::catalog::{Platform, Rule, RuleCatalog, SettingValue};
use crate::config::UserConfig;
use crate::errors::{PolicygenError, PolicygenResult};

/// Where a fragment's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Default,
    Override,
}

/// One rule rendered for the target platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFragment {
    pub key: &'static str,
    pub section: &'static str,
    pub value: SettingValue,
    pub source: ValueSource,
    pub text: String,
}

/// A rule left out because it has no fragment for the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    pub key: &'static str,
    pub section: &'static str,
    pub reason: String,
}

/// The finished artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    standard: &'static str,
    platform: Platform,
    fragments: Vec<RenderedFragment>,
    skipped: Vec<SkippedRule>,
    fingerprint: String,
    text: String,
}

impl RenderedDocument {
    /// Full document text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn standard(&self) -> &'static str {
        self.standard
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Rendered fragments in catalog order
    pub fn fragments(&self) -> &[RenderedFragment] {
        &self.fragments
    }

    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }

    /// BLAKE3 hex digest of everything before the fingerprint line
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl std::fmt::Display for RenderedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders documents from a catalog
pub struct Renderer<'c> {
    catalog: &'c RuleCatalog,
}

impl<'c> Renderer<'c> {
    pub fn new(catalog: &'c RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Render `standard` for `platform` with the user's overrides
    pub fn render(
        &self,
        standard: &str,
        platform: Platform,
        config: &UserConfig,
    ) -> PolicygenResult<RenderedDocument> {
        let standard = self.catalog.standard(standard)?;
        let entries = self.catalog.lookup(standard.id, platform)?;
        let dialect = platform.dialect();

        let mut fragments = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for entry in entries {
            let rule = entry.rule;
            let source = match entry.template() {
                Ok(source) => source,
                Err(e) => {
                    warn!(rule = rule.key, section = rule.section, "{}; skipping", e);
                    skipped.push(SkippedRule {
                        key: rule.key,
                        section: rule.section,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let (value, value_source) = select_value(rule, config);
            let body = Template::parse(rule.key, source)?.render(rule, &value, dialect)?;
            debug!(rule = rule.key, value = %value, "Rendered fragment");

            fragments.push(RenderedFragment {
                key: rule.key,
                section: rule.section,
                text: layout_fragment(dialect, rule, &value, &body),
                value,
                source: value_source,
            });
        }

        if fragments.is_empty() {
            return Err(PolicygenError::EmptyDocument {
                standard: standard.id.to_string(),
                platform: platform.to_string(),
                skipped: skipped.len(),
            });
        }

        let ctx = DocumentContext {
            standard,
            platform,
            rule_count: fragments.len(),
            generator_version: crate::VERSION,
        };

        let mut text = dialect.header(&ctx);
        for fragment in &fragments {
            text.push_str(&fragment.text);
        }
        text.push_str(&dialect.footer(&ctx));

        let fingerprint = blake3::hash(text.as_bytes()).to_hex().to_string();
        text.push_str(&dialect.comment(&format!("fingerprint: blake3:{}", fingerprint)));

        Ok(RenderedDocument {
            standard: standard.id,
            platform,
            fragments,
            skipped,
            fingerprint,
            text,
        })
    }
}

/// User override when present and valid for the rule, otherwise the default
fn select_value(rule: &Rule, config: &UserConfig) -> (SettingValue, ValueSource) {
    match config.get(rule.key) {
        Some(value) => match rule.value_type.check(rule.key, value) {
            Ok(()) => (value.clone(), ValueSource::Override),
            Err(issue) => {
                warn!(rule = rule.key, "Ignoring invalid override: {}", issue);
                (rule.default.clone(), ValueSource::Default)
            }
        },
        None => (rule.default.clone(), ValueSource::Default),
    }
}

/// Comment header plus body, indented for the dialect, followed by a blank line
fn layout_fragment(dialect: &dyn Dialect, rule: &Rule, value: &SettingValue, body: &str) -> String {
    let mut block = dialect.comment(&format!(
        "[{}] {} = {} (severity: {})\n{}",
        rule.section, rule.key, value, rule.severity, rule.title
    ));
    block.push_str(body);
    block.push('\n');

    let indent = dialect.indent();
    let mut out = String::with_capacity(block.len() + 1);
    for line in block.lines() {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out.push('\n');
    out
}
