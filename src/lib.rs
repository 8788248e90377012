//! # tfbreak
//!
//! A breaking-change detector for Terraform/OpenTofu modules.
//!
//! tfbreak loads two snapshots of the same module, diffs their input
//! variables and outputs, and reports the changes that would break a caller
//! already using the old version.
//!
//! ## Pipeline
//!
//! 1. **Load**: parse every `.tf` and `.tf.json` file of each snapshot
//!    ([`parser::ModuleLoader`])
//! 2. **Sanitize**: drop source positions ([`Module::sanitize`])
//! 3. **Diff**: structural comparison by name ([`diff::diff`])
//! 4. **Classify**: keep the breaking subset ([`analyzer::classify`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use tfbreak::{Config, Detector, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let detector = Detector::new(Config::default());
//!
//!     let comparison = detector.compare_paths("./v1", "./v2").await?;
//!     for change in &comparison.breaking {
//!         println!("{change}");
//!     }
//!
//!     println!("{}", comparison.generate_report(ReportFormat::Json)?);
//!     Ok(())
//! }
//! ```

// Note: README is not included as doc to avoid doctest failures
// See README.md for full documentation
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod parser;
pub mod reporter;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Result, TfBreakError};
pub use types::{
    Attribute, Change, ChangeCategory, ChangeType, Changelog, Comparison, Module, Output,
    ReportFormat, Variable,
};

use analyzer::Analyzer;
use parser::{ModuleLoader, SourceFile};
use std::path::Path;

/// Main orchestrator: load, diff, and classify two module snapshots.
///
/// # Example
///
/// ```rust
/// use tfbreak::parser::SourceFile;
/// use tfbreak::{Config, Detector};
///
/// let detector = Detector::new(Config::default());
/// let old = [SourceFile::new("variables.tf", "variable \"name\" {}\n")];
/// let new = [SourceFile::new("variables.tf", "")];
///
/// let comparison = detector.compare_sources(&old, &new)?;
/// assert_eq!(comparison.breaking.len(), 1);
/// # Ok::<(), tfbreak::TfBreakError>(())
/// ```
pub struct Detector {
    config: Config,
    loader: ModuleLoader,
    analyzer: Analyzer,
}

impl Detector {
    /// Create a new detector with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let loader = ModuleLoader::new(&config);
        let analyzer = Analyzer::new(&config);
        Self {
            config,
            loader,
            analyzer,
        }
    }

    /// The configuration this detector was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Compare two module directories.
    ///
    /// Both snapshots are loaded concurrently. If either fails to load,
    /// nothing is diffed.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory is missing, unreadable, or
    /// contains invalid Terraform.
    pub async fn compare_paths<P, Q>(&self, old: P, new: Q) -> Result<Comparison>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let (old, new) = (old.as_ref(), new.as_ref());
        tracing::info!(old = %old.display(), new = %new.display(), "Comparing modules");

        let (old_module, new_module) = tokio::try_join!(
            self.loader.load_directory(old),
            self.loader.load_directory(new)
        )?;

        Ok(self.compare_modules(&old_module, &new_module))
    }

    /// Compare two modules given as in-memory files.
    ///
    /// # Errors
    ///
    /// Returns an error if either set of files contains invalid Terraform.
    pub fn compare_sources(&self, old: &[SourceFile], new: &[SourceFile]) -> Result<Comparison> {
        let old_module = self.loader.load_sources(old)?;
        let new_module = self.loader.load_sources(new)?;
        Ok(self.compare_modules(&old_module, &new_module))
    }

    /// Compare two already-loaded modules.
    #[must_use]
    pub fn compare_modules(&self, old: &Module, new: &Module) -> Comparison {
        let changelog = diff::diff(&old.sanitized(), &new.sanitized());
        let breaking = self.analyzer.classify(&changelog);

        tracing::info!(
            changes = changelog.len(),
            breaking = breaking.len(),
            "Comparison complete"
        );

        Comparison {
            old: old.summary(),
            new: new.summary(),
            changelog,
            breaking,
        }
    }
}

/// Breaking changes between two modules under the default policy.
///
/// Neither module is modified; positions are ignored.
#[must_use]
pub fn breaking_changes(old: &Module, new: &Module) -> Vec<Change> {
    let changelog = diff::diff(&old.sanitized(), &new.sanitized());
    analyzer::classify(&changelog)
}
