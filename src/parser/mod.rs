//! Terraform configuration loading.
//!
//! Loading a module is a two-stage pipeline:
//!
//! 1. A [`ConfigParser`] reads each file for its structure: which variables,
//!    outputs, and resources it declares. This is where Terraform's own
//!    load-time rules are enforced (labels, unique names, outputs need a value).
//! 2. The [`AttributeExtractor`] re-reads the variable and output blocks and
//!    captures every attribute as the literal source text of its expression.
//!
//! The [`ModuleLoader`] drives both stages over a directory or a set of
//! in-memory files and merges the results into a [`Module`](crate::types::Module).
//!
//! # Supported Syntaxes
//!
//! - Native HCL (`.tf`) through `hcl-rs` and its `hcl-edit` parser
//! - Terraform JSON (`.tf.json`) through `serde_json`
//!
//! # Example
//!
//! ```rust,ignore
//! use tfbreak::parser::{ModuleLoader, SourceFile};
//! use tfbreak::Config;
//!
//! let loader = ModuleLoader::new(&Config::default());
//! let module = loader.load_sources(&[SourceFile::new("main.tf", r#"
//! variable "vnet_name" {
//!   type = string
//! }
//! "#)])?;
//! assert!(module.variables["vnet_name"].is_required());
//! ```

mod extract;
mod hcl;
mod json;
mod loader;

pub use self::extract::{AttributeExtractor, ExtractedFile};
pub use self::hcl::HclParser;
pub use self::json::JsonParser;
pub use self::loader::ModuleLoader;

use crate::types::Resource;
use std::path::{Path, PathBuf};

/// File suffixes that belong to a Terraform module.
pub const TERRAFORM_EXTENSIONS: &[&str] = &[".tf", ".tf.json"];

/// Directory and file names never read as module sources.
pub const SKIP_FILES: &[&str] = &[".terraform", ".terragrunt-cache", "terraform.tfstate"];

/// Configuration syntax of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Native HCL (`.tf`)
    Native,
    /// Terraform JSON (`.tf.json`)
    Json,
}

impl Syntax {
    /// Detects the syntax from a file name, `None` for non-Terraform files.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(".tf.json") {
            Some(Self::Json)
        } else if name.ends_with(".tf") {
            Some(Self::Native)
        } else {
            None
        }
    }
}

/// One configuration file: its name and full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File path, relative or absolute
    pub path: PathBuf,
    /// File contents
    pub content: String,
}

impl SourceFile {
    /// Create a source file from a path and its contents.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Syntax of this file, from its extension.
    #[must_use]
    pub fn syntax(&self) -> Option<Syntax> {
        Syntax::from_path(&self.path)
    }
}

/// Declarations found in one file by the structural stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    /// The file these declarations came from
    pub file: PathBuf,
    /// Declared variable names, in file order
    pub variables: Vec<String>,
    /// Declared output names, in file order
    pub outputs: Vec<String>,
    /// Declared resources and data sources
    pub resources: Vec<Resource>,
}

/// Structural stage of module loading.
///
/// Implemented once per configuration syntax, and swappable in tests.
pub trait ConfigParser: Send + Sync {
    /// Parse a single file's contents into its declarations.
    ///
    /// # Errors
    ///
    /// Returns `HclParse` for syntax errors and `HclStructure` for blocks
    /// Terraform itself would reject.
    fn parse_content(&self, content: &str, file_path: &Path) -> crate::Result<ParsedFile>;
}

/// Computes the 1-based line of a byte offset in `content`.
pub(crate) fn line_of_offset(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_from_path() {
        assert_eq!(Syntax::from_path(Path::new("main.tf")), Some(Syntax::Native));
        assert_eq!(Syntax::from_path(Path::new("vars.tf.json")), Some(Syntax::Json));
        assert_eq!(Syntax::from_path(Path::new("terraform.tfvars")), None);
        assert_eq!(Syntax::from_path(Path::new("README.md")), None);
    }

    #[test]
    fn test_line_of_offset() {
        let content = "a\nb\nc";
        assert_eq!(line_of_offset(content, 0), 1);
        assert_eq!(line_of_offset(content, 2), 2);
        assert_eq!(line_of_offset(content, 4), 3);
        assert_eq!(line_of_offset(content, 999), 3);
    }
}
