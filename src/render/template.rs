// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Fragment templates
//!
//! A fragment is literal text with `{{ name }}` or `{{ name | filter }}`
//! placeholders. Substitution is purely textual; nothing in a template or a
//! value is ever evaluated.

use std::sync::OnceLock;

use regex::Regex;

use super::dialect::Dialect;
use crate::catalog::{Rule, SettingValue, ValueType};
use crate::errors::{PolicygenError, PolicygenResult};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_]+)\s*(?:\|\s*([A-Za-z_]+)\s*)?\}\}")
            .expect("Invalid placeholder pattern")
    })
}

/// Named placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// The chosen setting value
    Value,
    /// The rule key
    Key,
    /// The benchmark control number
    Section,
    /// The rule title, quoted for the dialect
    Title,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "value" => Some(Self::Value),
            "key" => Some(Self::Key),
            "section" => Some(Self::Section),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Value filter, valid on boolean values only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// true → yes, false → no
    YesNo,
    /// true → no, false → yes
    NoYes,
}

impl Filter {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "yesno" => Some(Self::YesNo),
            "noyes" => Some(Self::NoYes),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::YesNo => "yesno",
            Self::NoYes => "noyes",
        }
    }

    fn apply(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::YesNo, true) | (Self::NoYes, false) => "yes",
            (Self::YesNo, false) | (Self::NoYes, true) => "no",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder {
        name: Placeholder,
        filter: Option<Filter>,
    },
}

/// A parsed fragment template
#[derive(Debug, Clone)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    /// Parse a fragment belonging to rule `key`
    pub fn parse(key: &str, source: &'a str) -> PolicygenResult<Self> {
        let error = |message: String| PolicygenError::Template {
            key: key.to_string(),
            message,
        };

        let mut segments = Vec::new();
        let mut last = 0;

        for captures in placeholder_pattern().captures_iter(source) {
            let whole = captures.get(0).expect("capture group 0 always matches");
            push_literal(&mut segments, &source[last..whole.start()]).map_err(error)?;

            let name = &captures[1];
            let name = Placeholder::parse(name)
                .ok_or_else(|| error(format!("unknown placeholder '{}'", name)))?;
            let filter = match captures.get(2) {
                Some(f) => Some(
                    Filter::parse(f.as_str())
                        .ok_or_else(|| error(format!("unknown filter '{}'", f.as_str())))?,
                ),
                None => None,
            };

            segments.push(Segment::Placeholder { name, filter });
            last = whole.end();
        }
        push_literal(&mut segments, &source[last..]).map_err(error)?;

        Ok(Self { segments })
    }

    /// Verify filters are only applied to boolean values of `rule`
    pub fn check_filters(&self, rule: &Rule) -> Result<(), String> {
        for segment in &self.segments {
            match segment {
                Segment::Placeholder {
                    name,
                    filter: Some(filter),
                } => {
                    if *name != Placeholder::Value || rule.value_type != ValueType::Boolean {
                        return Err(format!(
                            "filter '{}' only applies to boolean values",
                            filter.name()
                        ));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Substitute placeholders for `rule` with `value` in `dialect`
    pub fn render(
        &self,
        rule: &Rule,
        value: &SettingValue,
        dialect: &dyn Dialect,
    ) -> PolicygenResult<String> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, filter } => match name {
                    Placeholder::Value => {
                        out.push_str(&encode_value(rule, value, *filter, dialect)?)
                    }
                    Placeholder::Key => out.push_str(rule.key),
                    Placeholder::Section => out.push_str(rule.section),
                    Placeholder::Title => out.push_str(&dialect.quote(rule.title)),
                },
            }
        }

        Ok(out)
    }
}

fn push_literal<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) -> Result<(), String> {
    if text.contains("{{") || text.contains("}}") {
        return Err(format!("malformed placeholder near '{}'", text.trim()));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text));
    }
    Ok(())
}

/// Encode a value for the dialect; only free text needs quoting
fn encode_value(
    rule: &Rule,
    value: &SettingValue,
    filter: Option<Filter>,
    dialect: &dyn Dialect,
) -> PolicygenResult<String> {
    if let Some(filter) = filter {
        let b = value.as_bool().ok_or_else(|| PolicygenError::Template {
            key: rule.key.to_string(),
            message: format!("filter '{}' applied to a {}", filter.name(), value.type_name()),
        })?;
        return Ok(filter.apply(b).to_string());
    }

    Ok(match value {
        SettingValue::Bool(b) => b.to_string(),
        SettingValue::Integer(n) => n.to_string(),
        SettingValue::Text(s) => match rule.value_type {
            ValueType::Choice(_) => s.to_string(),
            _ => dialect.quote(s),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Platform, RuleCatalog};

    fn rule(key: &str) -> &'static Rule {
        RuleCatalog::builtin().resolve("CIS-Linux-v8", key).unwrap()
    }

    #[test]
    fn test_parse_rejects_unknown_placeholder() {
        let err = Template::parse("demo", "echo {{ hostname }}").unwrap_err();
        assert!(err.to_string().contains("unknown placeholder 'hostname'"));
    }

    #[test]
    fn test_parse_rejects_unbalanced_braces() {
        assert!(Template::parse("demo", "echo {{ value").is_err());
        assert!(Template::parse("demo", "echo value }}").is_err());
    }

    #[test]
    fn test_boolean_filters() {
        let template = Template::parse("demo", "PermitRootLogin {{ value | noyes }}").unwrap();
        let rule = rule("disable_root_login");
        let dialect = Platform::Shell.dialect();

        assert_eq!(
            template.render(rule, &SettingValue::Bool(true), dialect).unwrap(),
            "PermitRootLogin no"
        );
        assert_eq!(
            template.render(rule, &SettingValue::Bool(false), dialect).unwrap(),
            "PermitRootLogin yes"
        );
    }

    #[test]
    fn test_text_is_quoted_per_dialect() {
        let template = Template::parse("demo", "banner {{ value }}").unwrap();
        let rule = rule("login_banner");
        let value = SettingValue::text("it's $(reboot)");

        assert_eq!(
            template.render(rule, &value, Platform::Shell.dialect()).unwrap(),
            r#"banner 'it'\''s $(reboot)'"#
        );
        assert_eq!(
            template.render(rule, &value, Platform::Ansible.dialect()).unwrap(),
            r#"banner "it's $(reboot)""#
        );
        assert_eq!(
            template.render(rule, &value, Platform::PowerShell.dialect()).unwrap(),
            "banner 'it''s $(reboot)'"
        );
    }

    #[test]
    fn test_hostile_text_stays_literal() {
        let template = Template::parse("demo", "banner {{ value }}").unwrap();
        let rule = rule("login_banner");
        let render = |text: &'static str, platform: Platform| {
            template
                .render(rule, &SettingValue::text(text), platform.dialect())
                .unwrap()
        };

        assert_eq!(
            render("bye\\\n", Platform::Shell),
            "banner 'bye\\\n'"
        );
        assert_eq!(
            render("{{ lookup('pipe', 'id') }}", Platform::Ansible),
            r#"banner !unsafe "{{ lookup('pipe', 'id') }}""#
        );
        assert_eq!(
            render("{% if true %}x{% endif %}", Platform::Ansible),
            r#"banner !unsafe "{% if true %}x{% endif %}""#
        );
        assert_eq!(
            render("x\u{2019}; Remove-Item -Recurse C:/tmp; \u{2019}", Platform::PowerShell),
            "banner 'x\u{2019}\u{2019}; Remove-Item -Recurse C:/tmp; \u{2019}\u{2019}'"
        );
    }

    #[test]
    fn test_choice_values_are_verbatim() {
        let template = Template::parse("demo", "LogLevel {{ value }}").unwrap();
        let rule = rule("ssh_log_level");

        assert_eq!(
            template
                .render(rule, &SettingValue::text("VERBOSE"), Platform::Shell.dialect())
                .unwrap(),
            "LogLevel VERBOSE"
        );
    }
}
