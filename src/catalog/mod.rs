// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Rule catalog
//!
//! The static registry of compliance standards and their hardening rules.
//! Rules live in a single arena and standards refer to them by [`RuleId`];
//! the built-in catalog is assembled once and never mutated afterwards.
//! Adding a rule or a platform fragment is a data change in [`builtin`].

pub mod builtin;
mod value;

pub use value::{yaml_kind, SettingValue, ValueType};

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::errors::{closest_match, PolicygenError, PolicygenResult};
use crate::render::Template;

/// Target dialect of a generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// POSIX shell script
    Shell,
    /// Ansible playbook
    Ansible,
    /// PowerShell script
    #[serde(rename = "powershell")]
    PowerShell,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Self::Shell, Self::Ansible, Self::PowerShell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Ansible => "ansible",
            Self::PowerShell => "powershell",
        }
    }

    /// Unix permission bits for the emitted artifact
    pub fn file_mode(&self) -> u32 {
        match self {
            Self::Shell => 0o755,
            Self::Ansible | Self::PowerShell => 0o644,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shell" | "sh" | "bash" | "linux" => Ok(Self::Shell),
            "ansible" | "ansible-playbook" | "playbook" => Ok(Self::Ansible),
            "powershell" | "pwsh" | "ps1" | "windows" => Ok(Self::PowerShell),
            _ => Err(format!(
                "Unknown platform: {} (expected shell, ansible or powershell)",
                s
            )),
        }
    }
}

/// Rule severity as assigned by the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One settable hardening item
#[derive(Debug, Clone)]
pub struct Rule {
    /// Setting key, unique within its standard
    pub key: &'static str,
    /// Benchmark control number, e.g. "5.2.10"
    pub section: &'static str,
    /// Benchmark title of the control
    pub title: &'static str,
    pub severity: Severity,
    pub value_type: ValueType,
    pub default: SettingValue,
    /// Template fragment per supported platform
    pub fragments: &'static [(Platform, &'static str)],
}

impl Rule {
    /// Template fragment for a platform, if the rule supports it
    pub fn fragment(&self, platform: Platform) -> Option<&'static str> {
        self.fragments
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, template)| *template)
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.fragment(platform).is_some()
    }

    /// Supported platforms in catalog-declared order
    pub fn platforms(&self) -> Vec<Platform> {
        self.fragments.iter().map(|(p, _)| *p).collect()
    }
}

/// Operating system family a standard hardens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    Windows,
}

/// Static definition of a standard and its rules, in catalog order
#[derive(Debug)]
pub struct StandardDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub family: OsFamily,
    pub rules: &'static [Rule],
}

/// Stable index of a rule in the catalog arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(usize);

/// A registered compliance standard
#[derive(Debug, Clone)]
pub struct ComplianceStandard {
    pub id: &'static str,
    pub title: &'static str,
    pub family: OsFamily,
    rule_ids: Vec<RuleId>,
}

impl ComplianceStandard {
    /// Rule ids in catalog order
    pub fn rule_ids(&self) -> &[RuleId] {
        &self.rule_ids
    }

    pub fn len(&self) -> usize {
        self.rule_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_ids.is_empty()
    }
}

/// A rule paired with its fragment for one platform
#[derive(Debug, Clone, Copy)]
pub struct PlatformRule<'a> {
    pub rule: &'a Rule,
    pub platform: Platform,
    pub fragment: Option<&'static str>,
}

impl PlatformRule<'_> {
    /// The fragment, or `UnsupportedPlatform` when the rule has none
    pub fn template(&self) -> PolicygenResult<&'static str> {
        self.fragment.ok_or_else(|| PolicygenError::UnsupportedPlatform {
            key: self.rule.key.to_string(),
            platform: self.platform.to_string(),
            supported: self
                .rule
                .platforms()
                .iter()
                .map(Platform::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

static BUILTIN: OnceLock<RuleCatalog> = OnceLock::new();

/// Registry of standards and rules
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
    standards: Vec<ComplianceStandard>,
}

impl RuleCatalog {
    /// The built-in catalog, assembled on first use
    pub fn builtin() -> &'static RuleCatalog {
        BUILTIN.get_or_init(|| {
            Self::new(builtin::STANDARDS).expect("built-in rule catalog is well-formed")
        })
    }

    /// Build a catalog from static definitions, reporting every malformed entry
    pub fn new(definitions: &[StandardDefinition]) -> PolicygenResult<Self> {
        let mut problems = Vec::new();
        let mut rules = Vec::new();
        let mut standards: Vec<ComplianceStandard> = Vec::new();

        for definition in definitions {
            if standards
                .iter()
                .any(|s| s.id.eq_ignore_ascii_case(definition.id))
            {
                problems.push(format!("duplicate standard id '{}'", definition.id));
                continue;
            }

            let mut seen_keys = HashSet::new();
            let mut rule_ids = Vec::with_capacity(definition.rules.len());

            for rule in definition.rules {
                if !seen_keys.insert(rule.key) {
                    problems.push(format!(
                        "{}: duplicate rule key '{}'",
                        definition.id, rule.key
                    ));
                    continue;
                }
                for problem in validate_rule(rule) {
                    problems.push(format!("{}/{}: {}", definition.id, rule.key, problem));
                }

                rule_ids.push(RuleId(rules.len()));
                rules.push(rule.clone());
            }

            standards.push(ComplianceStandard {
                id: definition.id,
                title: definition.title,
                family: definition.family,
                rule_ids,
            });
        }

        if problems.is_empty() {
            Ok(Self { rules, standards })
        } else {
            Err(PolicygenError::InvalidCatalog { problems })
        }
    }

    /// All registered standards, in registration order
    pub fn standards(&self) -> impl Iterator<Item = &ComplianceStandard> {
        self.standards.iter()
    }

    /// Find a standard by id (case-insensitive)
    pub fn standard(&self, id: &str) -> PolicygenResult<&ComplianceStandard> {
        self.standards
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| PolicygenError::UnknownStandard {
                standard: id.to_string(),
                available: self
                    .standards
                    .iter()
                    .map(|s| s.id)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    /// Rules of a standard in catalog order
    pub fn rules_of<'a>(
        &'a self,
        standard: &'a ComplianceStandard,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        standard.rule_ids.iter().map(move |id| self.rule(*id))
    }

    /// Rules of a standard in catalog order, each with its fragment for `platform`
    pub fn lookup(&self, standard: &str, platform: Platform) -> PolicygenResult<Vec<PlatformRule<'_>>> {
        let standard = self.standard(standard)?;

        Ok(self
            .rules_of(standard)
            .map(|rule| PlatformRule {
                rule,
                platform,
                fragment: rule.fragment(platform),
            })
            .collect())
    }

    /// Resolve a setting key within a standard
    pub fn resolve(&self, standard: &str, key: &str) -> PolicygenResult<&Rule> {
        let standard = self.standard(standard)?;

        self.rules_of(standard)
            .find(|rule| rule.key == key)
            .ok_or_else(|| {
                PolicygenError::unknown_rule_key(
                    standard.id,
                    key,
                    self.rules_of(standard).map(|r| r.key),
                )
            })
    }

    /// Closest rule key of a standard to a misspelled one
    pub fn suggest_key(&self, standard: &ComplianceStandard, key: &str) -> Option<&'static str> {
        closest_match(key, self.rules_of(standard).map(|r| r.key))
    }
}

fn is_identifier(s: &str, extra: &[char]) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || extra.contains(&c))
}

/// Invariant violations of a single rule
fn validate_rule(rule: &Rule) -> Vec<String> {
    let mut problems = Vec::new();

    if !is_identifier(rule.key, &[]) {
        problems.push("key must be alphanumeric or '_'".to_string());
    }
    if !is_identifier(rule.section, &['.']) {
        problems.push(format!("invalid section '{}'", rule.section));
    }
    if rule.title.chars().any(char::is_control) {
        problems.push("title contains control characters".to_string());
    }
    if rule.fragments.is_empty() {
        problems.push("declares no platform fragment".to_string());
    }
    if let ValueType::Choice(options) = rule.value_type {
        if options.is_empty() {
            problems.push("enum declares no options".to_string());
        }
        for option in options {
            if !is_identifier(option, &['.', '-', ':']) {
                problems.push(format!("enum option '{}' is not a plain word", option));
            }
        }
    }
    if let Err(issue) = rule.value_type.check(rule.key, &rule.default) {
        problems.push(format!("default value rejected: {}", issue));
    }

    let mut seen_platforms = HashSet::new();
    for (platform, source) in rule.fragments {
        if !seen_platforms.insert(*platform) {
            problems.push(format!("duplicate fragment for {}", platform));
        }
        match Template::parse(rule.key, source) {
            Ok(template) => {
                if let Err(e) = template.check_filters(rule) {
                    problems.push(format!("{} fragment: {}", platform, e));
                }
            }
            Err(e) => problems.push(format!("{} fragment: {}", platform, e)),
        }
    }

    problems
}
