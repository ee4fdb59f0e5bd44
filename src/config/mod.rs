// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Configuration loader
//!
//! Reads the user's hardening settings and validates them against the rules
//! of one standard. Every problem in the file is collected before failing,
//! so a single run reports all of them. Keys the standard does not know are
//! warnings, not errors.
//!
//! Nested mappings are treated as organizational sections; only leaf keys
//! are matched against the catalog:
//!
//! ```yaml
//! ssh:
//!   disable_root_login: true
//!   ssh_max_auth_tries: 3
//! password_max_days: 90
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::catalog::{yaml_kind, ComplianceStandard, RuleCatalog, SettingValue};
use crate::errors::{ConfigIssue, PolicygenError, PolicygenResult};

/// Validated user overrides, keyed by rule key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfig {
    values: BTreeMap<String, SettingValue>,
}

impl UserConfig {
    /// A configuration with no overrides
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overrides in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A key that matched no rule of the selected standard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    pub key: String,
    /// Dotted location within the file, e.g. `ssh.disalbe_root_login`
    pub location: String,
    /// Closest known key, when one is plausibly meant
    pub suggestion: Option<&'static str>,
}

/// Result of a successful load
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: UserConfig,
    /// Unrecognized keys, in file order; never fatal
    pub warnings: Vec<UnknownKey>,
}

impl LoadedConfig {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Loads configuration for one standard
pub struct ConfigLoader<'c> {
    catalog: &'c RuleCatalog,
    standard: &'c ComplianceStandard,
}

impl<'c> ConfigLoader<'c> {
    /// Bind a loader to a standard; fails with `UnknownStandard`
    pub fn new(catalog: &'c RuleCatalog, standard: &str) -> PolicygenResult<Self> {
        Ok(Self {
            catalog,
            standard: catalog.standard(standard)?,
        })
    }

    pub fn standard(&self) -> &ComplianceStandard {
        self.standard
    }

    /// Load and validate a configuration file
    ///
    /// `.toml` files are read as TOML, everything else as YAML.
    pub fn load(&self, path: &Path) -> PolicygenResult<LoadedConfig> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PolicygenError::FileReadError {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

        info!("Loading configuration from {}", path.display());

        if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            let value: toml::Value =
                toml::from_str(&content).map_err(|e| PolicygenError::ConfigParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                    help: None,
                })?;
            let value = serde_yaml::to_value(value)?;
            self.load_value(value, path)
        } else {
            self.load_str(&content, path)
        }
    }

    /// Validate YAML text; `origin` names it in errors
    pub fn load_str(&self, source: &str, origin: impl AsRef<Path>) -> PolicygenResult<LoadedConfig> {
        let origin = origin.as_ref();
        let value: Value = serde_yaml::from_str(source)
            .map_err(|e| PolicygenError::config_parse(origin, &e))?;
        self.load_value(value, origin)
    }

    /// Validate an already-parsed document
    pub fn load_value(&self, value: Value, origin: impl AsRef<Path>) -> PolicygenResult<LoadedConfig> {
        let origin = origin.as_ref();
        let mapping = match value {
            Value::Null => return Ok(LoadedConfig::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(PolicygenError::ConfigParse {
                    path: origin.to_path_buf(),
                    message: format!(
                        "expected a mapping of settings at the top level, found {}",
                        yaml_kind(&other)
                    ),
                    help: Some("Write settings as 'key: value' pairs".into()),
                })
            }
        };

        let mut walk = Walk {
            loader: self,
            origin,
            values: BTreeMap::new(),
            locations: HashMap::new(),
            issues: Vec::new(),
            warnings: Vec::new(),
        };
        walk.mapping(&mapping, "")?;

        if !walk.issues.is_empty() {
            return Err(PolicygenError::ConfigType {
                path: origin.to_path_buf(),
                issues: walk.issues,
            });
        }

        for unknown in &walk.warnings {
            warn!(
                standard = self.standard.id,
                "Ignoring unknown setting '{}'", unknown.location
            );
        }
        debug!(
            overrides = walk.values.len(),
            unknown = walk.warnings.len(),
            "Configuration validated"
        );

        Ok(LoadedConfig {
            config: UserConfig {
                values: walk.values,
            },
            warnings: walk.warnings,
        })
    }
}

/// Accumulator for one pass over the document
struct Walk<'a, 'c> {
    loader: &'a ConfigLoader<'c>,
    origin: &'a Path,
    values: BTreeMap<String, SettingValue>,
    /// Where each recognized key was first set
    locations: HashMap<&'static str, String>,
    issues: Vec<ConfigIssue>,
    warnings: Vec<UnknownKey>,
}

impl Walk<'_, '_> {
    fn mapping(&mut self, mapping: &serde_yaml::Mapping, prefix: &str) -> PolicygenResult<()> {
        for (raw_key, raw_value) in mapping {
            let Some(key) = raw_key.as_str() else {
                return Err(PolicygenError::ConfigParse {
                    path: self.origin.to_path_buf(),
                    message: format!(
                        "setting names must be strings, found {} under '{}'",
                        yaml_kind(raw_key),
                        if prefix.is_empty() { "<top level>" } else { prefix }
                    ),
                    help: None,
                });
            };
            let location = if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", prefix, key)
            };

            let catalog = self.loader.catalog;
            let standard = self.loader.standard;

            match catalog.resolve(standard.id, key) {
                Ok(rule) => {
                    if let Some(first) = self.locations.get(rule.key) {
                        self.issues.push(ConfigIssue::DuplicateKey {
                            key: rule.key.to_string(),
                            first: first.clone(),
                            second: location,
                        });
                        continue;
                    }
                    self.locations.insert(rule.key, location);

                    match rule.value_type.coerce(rule.key, raw_value) {
                        Ok(value) => {
                            self.values.insert(rule.key.to_string(), value);
                        }
                        Err(issue) => self.issues.push(issue),
                    }
                }
                Err(PolicygenError::UnknownRuleKey { .. }) => {
                    if let Value::Mapping(section) = raw_value {
                        self.mapping(section, &location)?;
                    } else {
                        self.warnings.push(UnknownKey {
                            key: key.to_string(),
                            suggestion: catalog.suggest_key(standard, key),
                            location,
                        });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader() -> ConfigLoader<'static> {
        ConfigLoader::new(RuleCatalog::builtin(), "CIS-Linux-v8").unwrap()
    }

    #[test]
    fn test_load_flat_mapping() {
        let loaded = loader()
            .load_str("disable_root_login: false\nssh_max_auth_tries: 3\n", "cfg.yaml")
            .unwrap();

        assert_eq!(loaded.config.len(), 2);
        assert_eq!(
            loaded.config.get("disable_root_login"),
            Some(&SettingValue::Bool(false))
        );
        assert_eq!(
            loaded.config.get("ssh_max_auth_tries"),
            Some(&SettingValue::Integer(3))
        );
        assert!(!loaded.has_warnings());
    }

    #[test]
    fn test_nested_sections_resolve_leaf_keys() {
        let loaded = loader()
            .load_str(
                "ssh:\n  disable_root_login: true\n  log:\n    ssh_log_level: VERBOSE\n",
                "cfg.yaml",
            )
            .unwrap();

        assert_eq!(
            loaded.config.get("ssh_log_level"),
            Some(&SettingValue::text("VERBOSE"))
        );
        assert_eq!(loaded.config.len(), 2);
    }

    #[test]
    fn test_unknown_keys_are_warnings() {
        let loaded = loader()
            .load_str("ssh:\n  disalbe_root_login: true\n", "cfg.yaml")
            .unwrap();

        assert!(loaded.config.is_empty());
        assert_eq!(
            loaded.warnings,
            vec![UnknownKey {
                key: "disalbe_root_login".into(),
                location: "ssh.disalbe_root_login".into(),
                suggestion: Some("disable_root_login"),
            }]
        );
    }

    #[test]
    fn test_all_type_errors_are_reported_together() {
        let yaml = "\
disable_root_login: \"yes\"
ssh_max_auth_tries: 50
ssh_log_level: DEBUG
login_banner: [a, b]
typo_key: 1
";
        let err = loader().load_str(yaml, "cfg.yaml").unwrap_err();

        match err {
            PolicygenError::ConfigType { issues, .. } => {
                let keys: Vec<_> = issues.iter().map(ConfigIssue::key).collect();
                assert_eq!(
                    keys,
                    vec![
                        "disable_root_login",
                        "ssh_max_auth_tries",
                        "ssh_log_level",
                        "login_banner"
                    ]
                );
                assert!(matches!(issues[0], ConfigIssue::TypeMismatch { .. }));
                assert!(matches!(issues[1], ConfigIssue::OutOfRange { value: 50, .. }));
                assert!(matches!(issues[2], ConfigIssue::NotAllowed { .. }));
                assert!(matches!(
                    &issues[3],
                    ConfigIssue::TypeMismatch { found, .. } if found == "sequence"
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_key_across_sections() {
        let yaml = "disable_root_login: true\nssh:\n  disable_root_login: false\n";
        let err = loader().load_str(yaml, "cfg.yaml").unwrap_err();

        match err {
            PolicygenError::ConfigType { issues, .. } => {
                assert_eq!(
                    issues,
                    vec![ConfigIssue::DuplicateKey {
                        key: "disable_root_login".into(),
                        first: "disable_root_login".into(),
                        second: "ssh.disable_root_login".into(),
                    }]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = loader()
            .load_str("disable_root_login: [unclosed\n", "cfg.yaml")
            .unwrap_err();
        assert!(matches!(err, PolicygenError::ConfigParse { .. }));

        let err = loader().load_str("- just\n- a list\n", "cfg.yaml").unwrap_err();
        match err {
            PolicygenError::ConfigParse { message, .. } => assert!(message.contains("sequence")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_document_is_empty_config() {
        let loaded = loader().load_str("", "cfg.yaml").unwrap();
        assert!(loaded.config.is_empty());

        let loaded = loader().load_str("# only a comment\n", "cfg.yaml").unwrap();
        assert!(loaded.config.is_empty());
    }

    #[test]
    fn test_load_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hardening.toml");
        std::fs::write(
            &path,
            "password_max_days = 90\n\n[ssh]\ndisable_root_login = true\n",
        )
        .unwrap();

        let loaded = loader().load(&path).unwrap();
        assert_eq!(
            loaded.config.get("password_max_days"),
            Some(&SettingValue::Integer(90))
        );
        assert_eq!(
            loaded.config.get("disable_root_login"),
            Some(&SettingValue::Bool(true))
        );
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = loader().load(&temp.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, PolicygenError::FileReadError { .. }));
    }
}
