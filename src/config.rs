//! Configuration module for tfbreak.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`tfbreak.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # tfbreak.yaml
//!
//! # Module loading
//! load:
//!   exclude_patterns:
//!     - "*_override.tf"
//!   max_depth: 1
//!
//! # Breaking-change policy
//! policy:
//!   variable_sensitivity_breaking: false
//!
//! # Output options
//! output:
//!   colored: true
//!   pretty: true
//!   show_all_changes: false
//! ```

use crate::error::{Result, ResultExt, TfBreakError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static BRACED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

static BARE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// Module loading options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// File names to ignore (glob patterns).
    pub exclude_patterns: Vec<String>,

    /// Directory depth to walk. Terraform modules are flat, so 1 reads only
    /// the module's own directory.
    pub max_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            max_depth: default_max_depth(),
        }
    }
}

/// Breaking-change policy options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyOptions {
    /// Report a variable that stops being sensitive as breaking.
    pub variable_sensitivity_breaking: bool,
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    pub colored: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Include the full changelog, not just breaking changes.
    pub show_all_changes: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            pretty: true,
            show_all_changes: false,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Module loading options
    pub load: LoadOptions,

    /// Breaking-change policy
    pub policy: PolicyOptions,

    /// Output options
    pub output: OutputOptions,
}

const fn default_max_depth() -> usize {
    1
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Self = serde_yaml::from_str(&expanded).map_err(|e| {
            TfBreakError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!())
        })?;

        if config.load.max_depth == 0 {
            return Err(crate::err!(ConfigParse {
                message: "load.max_depth must be at least 1".to_string(),
                source: None,
            }));
        }

        tracing::debug!(
            exclude_patterns = config.load.exclude_patterns.len(),
            max_depth = config.load.max_depth,
            variable_sensitivity_breaking = config.policy.variable_sensitivity_breaking,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        Self::from_yaml(&content)
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# tfbreak configuration file

# Module loading
load:
  # File names to ignore (glob patterns)
  exclude_patterns: []
  #   - "*_override.tf"

  # Directory depth to read (1 = the module directory only)
  max_depth: 1

# Breaking-change policy
policy:
  # Report variables that stop being sensitive as breaking changes
  variable_sensitivity_breaking: false

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Pretty-print JSON output
  pretty: true

  # Include every change in reports, not only breaking ones
  show_all_changes: false
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::CompareArgs) {
        if !args.exclude_patterns.is_empty() {
            self.load
                .exclude_patterns
                .extend(args.exclude_patterns.iter().cloned());
        }
        if args.all {
            self.output.show_all_changes = true;
        }
        if args.variable_sensitivity_breaking {
            self.policy.variable_sensitivity_breaking = true;
        }
        if args.no_color {
            self.output.colored = false;
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unset variables are left as-is.
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    for cap in BRACED_VAR.captures_iter(content) {
        if let Ok(value) = std::env::var(&cap[1]) {
            result = result.replace(&cap[0], &value);
        }
    }

    for cap in BARE_VAR.captures_iter(content) {
        if let Ok(value) = std::env::var(&cap[1]) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
