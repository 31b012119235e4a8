// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::consts::DEFAULT_CONCURRENCY;
use crate::config::{ProcessorRegistry, StackTemplate};
use crate::errors::ConfigError;

/// Top-level configuration: runner options plus the stack templates a
/// deployment offers.
///
/// # Example
/// ```yaml
/// runner:
///   default_concurrency: 4
/// stacks:
///   - id: best-frame
///     name: Best frame
///     steps:
///       - processor: sample_frames
///         options: { frame_count: 12 }
///       - processor: score_frames
///       - processor: select_best_frame
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerOptions,
    #[serde(default)]
    pub stacks: Vec<StackTemplate>,
}

impl Config {
    /// Look up a stack template by id.
    ///
    /// # Errors
    /// `ConfigError::UnknownTemplate` when no stack has that id.
    pub fn template(&self, id: &str) -> Result<&StackTemplate, ConfigError> {
        self.stacks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ConfigError::UnknownTemplate(id.to_string()))
    }

    /// Structural checks that need no registry: a configured concurrency is
    /// non-zero, every stack has steps and stack ids are unique.
    pub fn validate_structure(&self) -> Result<(), ConfigError> {
        if let Some(0) = self.runner.default_concurrency {
            return Err(ConfigError::InvalidConcurrency(0));
        }

        let mut seen = HashSet::new();
        for template in &self.stacks {
            if template.steps.is_empty() {
                return Err(ConfigError::EmptyTemplate(template.id.clone()));
            }
            if !seen.insert(template.id.as_str()) {
                return Err(ConfigError::DuplicateTemplate(template.id.clone()));
            }
        }
        Ok(())
    }
}

/// Runner-wide options.
///
/// # Fields
/// * `default_concurrency` - Fan-out limit handed to processors through the
///   context's effective config (optional)
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RunnerOptions {
    pub default_concurrency: Option<usize>,
}

impl RunnerOptions {
    /// Configured concurrency, else the host's available parallelism.
    pub fn concurrency(&self) -> usize {
        self.default_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(DEFAULT_CONCURRENCY)
        })
    }
}

/// Parse a config from YAML text.
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Load a config and check it against `registry`.
///
/// Rejects a zero concurrency and empty or duplicate stacks, then validates
/// every step's processor id and reports all unknown ids at once.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
    registry: &ProcessorRegistry,
) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate_structure()?;
    registry
        .validate_templates(&cfg.stacks)
        .map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
runner:
  default_concurrency: 3
stacks:
  - id: best-frame
    name: Best frame
    steps:
      - processor: sample_frames
      - processor: score_frames
"#;

        let cfg = parse_config(yaml).unwrap();
        assert_eq!(cfg.runner.default_concurrency, Some(3));
        assert_eq!(cfg.runner.concurrency(), 3);
        assert_eq!(cfg.stacks.len(), 1);
        assert_eq!(cfg.template("best-frame").unwrap().steps.len(), 2);
    }

    #[test]
    fn test_runner_defaults_when_section_missing() {
        let cfg = parse_config("stacks: []").unwrap();
        assert_eq!(cfg.runner, RunnerOptions::default());
        assert!(cfg.runner.concurrency() >= 1);
    }

    #[test]
    fn test_unknown_template_lookup() {
        let cfg = parse_config("stacks: []").unwrap();
        assert!(matches!(
            cfg.template("nope"),
            Err(ConfigError::UnknownTemplate(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_config("stacks: [ {id: 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn test_structural_validation_table_driven() {
        struct TestCase {
            name: &'static str,
            yaml: &'static str,
            expected: Option<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "valid",
                yaml: "stacks:\n  - id: a\n    name: A\n    steps:\n      - processor: p\n",
                expected: None,
            },
            TestCase {
                name: "empty steps",
                yaml: "stacks:\n  - id: a\n    name: A\n    steps: []\n",
                expected: Some("Stack 'a' has no steps"),
            },
            TestCase {
                name: "duplicate ids",
                yaml: "stacks:\n  - id: a\n    name: A\n    steps:\n      - processor: p\n  - id: a\n    name: B\n    steps:\n      - processor: p\n",
                expected: Some("Duplicate stack id: 'a'"),
            },
            TestCase {
                name: "zero concurrency",
                yaml: "runner:\n  default_concurrency: 0\nstacks:\n  - id: a\n    name: A\n    steps:\n      - processor: p\n",
                expected: Some("runner.default_concurrency must be at least 1, got 0"),
            },
            TestCase {
                name: "explicit concurrency",
                yaml: "runner:\n  default_concurrency: 1\nstacks: []\n",
                expected: None,
            },
        ];

        for tc in test_cases {
            let cfg = parse_config(tc.yaml).unwrap();
            match (cfg.validate_structure(), tc.expected) {
                (Ok(()), None) => {}
                (Err(e), Some(expected)) => assert_eq!(e.to_string(), expected, "case: {}", tc.name),
                (result, expected) => {
                    panic!("case {}: got {:?}, expected {:?}", tc.name, result, expected)
                }
            }
        }
    }

    #[test]
    fn test_load_and_validate_rejects_zero_concurrency() {
        let file = write_config(
            r#"
runner:
  default_concurrency: 0
stacks:
  - id: best-frame
    name: Best frame
    steps:
      - processor: sample_frames
"#,
        );

        let err = load_and_validate_config(file.path(), &ProcessorRegistry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConcurrency(0)));
    }

    #[test]
    fn test_load_and_validate_reports_unknown_processors() {
        let file = write_config(
            r#"
stacks:
  - id: best-frame
    name: Best frame
    steps:
      - processor: sample_frames
      - processor: remove_background
"#,
        );

        let err = load_and_validate_config(file.path(), &ProcessorRegistry::new()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sample_frames"));
        assert!(message.contains("remove_background"));
    }
}
