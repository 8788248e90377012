//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Change, ChangeCategory, Comparison, ModuleSummary};
use serde::Serialize;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
    /// Whether to include the full changelog
    show_all_changes: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
            show_all_changes: config.output.show_all_changes,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, comparison: &Comparison) -> Result<String> {
        let report = JsonReport {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            summary: ReportSummary::from(comparison),
            old: &comparison.old,
            new: &comparison.new,
            breaking: &comparison.breaking,
            changes: self.show_all_changes.then_some(comparison.changelog.as_slice()),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };

        json.map_err(|e| {
            crate::err!(ReportGeneration {
                message: format!("Failed to serialize JSON report: {e}"),
            })
        })
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Old module snapshot
    pub old: &'a ModuleSummary,
    /// New module snapshot
    pub new: &'a ModuleSummary,
    /// Breaking changes
    pub breaking: &'a [Change],
    /// Every change, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<&'a [Change]>,
}

/// Report metadata.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// tfbreak version
    pub version: String,
    /// Report generation timestamp
    pub timestamp: String,
}

/// Report summary.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    /// Number of changes of any kind
    pub total_changes: usize,
    /// Number of breaking changes
    pub breaking_changes: usize,
    /// Breaking changes to variables
    pub breaking_variables: usize,
    /// Breaking changes to outputs
    pub breaking_outputs: usize,
    /// Whether any breaking change was found
    pub has_breaking_changes: bool,
}

impl From<&Comparison> for ReportSummary {
    fn from(comparison: &Comparison) -> Self {
        Self {
            total_changes: comparison.changelog.len(),
            breaking_changes: comparison.breaking.len(),
            breaking_variables: comparison.breaking_in(ChangeCategory::Variables),
            breaking_outputs: comparison.breaking_in(ChangeCategory::Outputs),
            has_breaking_changes: comparison.has_breaking_changes(),
        }
    }
}
