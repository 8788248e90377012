//! Report generation module.
//!
//! This module renders a [`Comparison`] in two formats:
//! - JSON: Machine-readable structured output
//! - Text: Human-readable CLI output
//!
//! # Example
//!
//! ```rust,no_run
//! use tfbreak::reporter::Reporter;
//! use tfbreak::{Comparison, Config, ReportFormat};
//!
//! let config = Config::default();
//! let reporter = Reporter::new(&config);
//!
//! let comparison = Comparison::default();
//! let json = reporter.generate(&comparison, ReportFormat::Json)?;
//! # Ok::<(), tfbreak::TfBreakError>(())
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Comparison, ReportFormat};

pub use json::JsonReporter;
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, comparison: &Comparison, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(comparison),
            ReportFormat::Text => TextReporter::new(&self.config).generate(comparison),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from a comparison.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, comparison: &Comparison) -> Result<String>;
}
