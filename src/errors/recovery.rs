// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Error recovery suggestions
//!
//! Provides actionable suggestions for recovering from errors.

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Suggest fixing invalid YAML
    pub fn fix_yaml_syntax(line: Option<usize>, column: Option<usize>) -> Self {
        let location = match (line, column) {
            (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
            (Some(l), None) => format!(" at line {}", l),
            _ => String::new(),
        };

        Self {
            action: format!("Fix YAML syntax error{}", location),
            steps: vec![
                "Check for common YAML issues:".into(),
                "  • Incorrect indentation (use spaces, not tabs)".into(),
                "  • Missing colons after keys".into(),
                "  • Settings must form a mapping of key: value pairs".into(),
            ],
            commands: vec![],
        }
    }

    /// Suggest correcting an unrecognized setting
    pub fn fix_unknown_key(key: &str, closest: Option<&str>, standard: &str) -> Self {
        let mut steps = vec![format!(
            "'{}' is not a rule of {} and will be ignored",
            key, standard
        )];
        if let Some(closest) = closest {
            steps.push(format!("Did you mean '{}'?", closest));
        }

        Self {
            action: format!("Check the spelling of '{}'", key),
            steps,
            commands: vec![
                "# List the settings this standard understands:".into(),
                format!("policygen rules --compliance-standard {}", standard),
            ],
        }
    }

    /// Suggest picking a registered standard
    pub fn list_standards() -> Self {
        Self {
            action: "Choose a registered compliance standard".into(),
            steps: vec!["Standard ids are matched case-insensitively".into()],
            commands: vec!["policygen standards".into()],
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}

/// Find the known key closest to `key`, if any is plausibly a typo of it
pub fn closest_match<'a>(key: &str, known: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let threshold = (key.chars().count() / 3).max(1);

    known
        .into_iter()
        .map(|candidate| (edit_distance(key, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Levenshtein distance over chars
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("disalbe", "disable"), 2);
    }

    #[test]
    fn test_closest_match_rejects_distant_keys() {
        let known = ["disable_root_login", "ssh_max_auth_tries"];
        assert_eq!(closest_match("banner", known), None);
        assert_eq!(
            closest_match("ssh_max_auth_try", known),
            Some("ssh_max_auth_tries")
        );
    }

    #[test]
    fn test_unknown_key_suggestion_display() {
        let suggestion =
            RecoverySuggestion::fix_unknown_key("disalbe_root_login", Some("disable_root_login"), "CIS-Linux-v8");
        let text = suggestion.to_string();

        assert!(text.contains("Did you mean 'disable_root_login'?"));
        assert!(text.contains("policygen rules --compliance-standard CIS-Linux-v8"));
    }
}
