//! Configuration file support for batch assessment runs
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.resiliencerc.json` in the data root
//! 3. `resilience.config.json` in the data root
//! 4. `"resilience"` key in `package.json`
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::assessment::{DEFAULT_DATA_SOURCE, METHODOLOGY_VERSION};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default key the assessment is written under in each occupation record
pub const DEFAULT_OUTPUT_KEY: &str = "aiAssessment";

/// Resilience configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResilienceConfig {
    /// SOC-code globs to include (default: all occupations)
    #[serde(default)]
    pub include: Vec<String>,

    /// SOC-code globs to exclude (default: none)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Methodology version stamped on each record (default: "1.0")
    #[serde(default)]
    pub methodology_version: Option<String>,

    /// Label for the job-growth projection source
    #[serde(default)]
    pub data_source: Option<String>,

    /// Record key the assessment is written under (default: "aiAssessment")
    #[serde(default)]
    pub output_key: Option<String>,

    /// Maximum number of rows to report
    #[serde(default)]
    pub top: Option<usize>,
}

/// Resolved configuration with compiled glob patterns
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Compiled include patterns (None means include all)
    pub include: Option<GlobSet>,
    /// Compiled exclude patterns (None means exclude nothing)
    pub exclude: Option<GlobSet>,
    pub methodology_version: String,
    pub data_source: String,
    pub output_key: String,
    pub top_n: Option<usize>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

fn require_non_empty(name: &str, value: &Option<String>) -> Result<()> {
    if let Some(v) = value {
        if v.trim().is_empty() {
            anyhow::bail!("{} must not be empty", name);
        }
    }
    Ok(())
}

fn compile_globs(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}

impl ResilienceConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        require_non_empty("methodology_version", &self.methodology_version)?;
        require_non_empty("data_source", &self.data_source)?;
        require_non_empty("output_key", &self.output_key)?;

        if self.top == Some(0) {
            anyhow::bail!("top must be at least 1");
        }

        for pattern in &self.include {
            Glob::new(pattern).with_context(|| format!("invalid include pattern: {}", pattern))?;
        }
        for pattern in &self.exclude {
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {}", pattern))?;
        }

        Ok(())
    }

    /// Resolve config into compiled form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        Ok(ResolvedConfig {
            include: compile_globs(&self.include)?,
            exclude: compile_globs(&self.exclude)?,
            methodology_version: self
                .methodology_version
                .clone()
                .unwrap_or_else(|| METHODOLOGY_VERSION.to_string()),
            data_source: self
                .data_source
                .clone()
                .unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string()),
            output_key: self
                .output_key
                .clone()
                .unwrap_or_else(|| DEFAULT_OUTPUT_KEY.to_string()),
            top_n: self.top,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Check whether an occupation code passes the include/exclude filters
    pub fn should_include(&self, code: &str) -> bool {
        // Check exclude first
        if let Some(ref exclude) = self.exclude {
            if exclude.is_match(code) {
                return false;
            }
        }

        // If include patterns exist, code must match at least one
        if let Some(ref include) = self.include {
            return include.is_match(code);
        }

        true
    }

    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        ResilienceConfig::default().resolve()
    }
}

/// Discover and load a config file from the data root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(ResilienceConfig, PathBuf)>> {
    let rc_path = project_root.join(".resiliencerc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = project_root.join("resilience.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    let pkg_path = project_root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<ResilienceConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: ResilienceConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load config from the "resilience" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<ResilienceConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("resilience") {
        Some(value) => {
            let config: ResilienceConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("invalid resilience config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid resilience config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config for a data directory
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (ResilienceConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResilienceConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert!(resolved.include.is_none());
        assert!(resolved.exclude.is_none());
        assert_eq!(resolved.methodology_version, "1.0");
        assert_eq!(resolved.output_key, "aiAssessment");
        assert_eq!(resolved.data_source, DEFAULT_DATA_SOURCE);
        assert!(resolved.top_n.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "include": ["15-*", "29-*"],
            "exclude": ["15-1299*"],
            "methodology_version": "1.1",
            "data_source": "BLS 2023-2033",
            "output_key": "resilience",
            "top": 20
        }"#;
        let config: ResilienceConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert!(resolved.include.is_some());
        assert_eq!(resolved.methodology_version, "1.1");
        assert_eq!(resolved.data_source, "BLS 2023-2033");
        assert_eq!(resolved.output_key, "resilience");
        assert_eq!(resolved.top_n, Some(20));
    }

    #[test]
    fn test_reject_unknown_fields() {
        let result: Result<ResilienceConfig, _> = serde_json::from_str(r#"{"weights": {}}"#);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_empty_strings() {
        let config: ResilienceConfig =
            serde_json::from_str(r#"{"methodology_version": "  "}"#).unwrap();
        assert!(config.validate().is_err());
        let config: ResilienceConfig = serde_json::from_str(r#"{"output_key": ""}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_zero_top() {
        let config: ResilienceConfig = serde_json::from_str(r#"{"top": 0}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_invalid_glob_pattern() {
        let config: ResilienceConfig = serde_json::from_str(r#"{"include": ["[15-"]}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_should_include_filters() {
        let config: ResilienceConfig =
            serde_json::from_str(r#"{"include": ["15-*"], "exclude": ["15-1299*"]}"#).unwrap();
        let resolved = config.resolve().unwrap();
        assert!(resolved.should_include("15-1252.00"));
        assert!(!resolved.should_include("15-1299.08"));
        assert!(!resolved.should_include("29-1141.00"));

        let defaults = ResolvedConfig::defaults().unwrap();
        assert!(defaults.should_include("29-1141.00"));
    }

    #[test]
    fn test_discover_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".resiliencerc.json");
        fs::write(&config_path, r#"{"top": 5}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.top, Some(5));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_package_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "careers", "resilience": {"data_source": "CareerOneStop"}}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.data_source.as_deref(), Some("CareerOneStop"));
    }

    #[test]
    fn test_discover_package_json_without_key() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "careers"}"#).unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".resiliencerc.json"), r#"{"top": 1}"#).unwrap();
        fs::write(dir.path().join("resilience.config.json"), r#"{"top": 2}"#).unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.top, Some(1), ".resiliencerc.json should take priority");
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"methodology_version": "2.0"}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.methodology_version, "2.0");
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.output_key, DEFAULT_OUTPUT_KEY);
    }
}
