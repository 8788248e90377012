//! Core data types used throughout tfbreak.
//!
//! This module defines the fundamental data structures for representing:
//! - Terraform/OpenTofu modules with their variables, outputs, and resources
//! - Semantic changes between two module snapshots
//! - Comparison results and report formats

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;

/// Location of a declaration in the module sources.
///
/// Positions change on every edit and never take part in diffing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePos {
    /// File the block was declared in
    pub file: PathBuf,
    /// 1-based line of the block header, 0 when unknown
    pub line: usize,
}

impl Display for SourcePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// A declared input variable.
///
/// Every attribute holds the literal source text of its expression; nothing
/// is evaluated. An absent `default` makes the variable required.
///
/// # Example HCL
///
/// ```hcl
/// variable "address_space" {
///   type        = list(string)
///   description = "The address space that is used by the virtual network."
///   default     = ["10.0.0.0/16"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name (unique within a module)
    pub name: String,
    /// Type constraint expression
    pub type_constraint: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Default value expression
    pub default: Option<String>,
    /// `sensitive` expression, absent means false
    pub sensitive: Option<String>,
    /// `nullable` expression, absent means true
    pub nullable: Option<String>,
    /// Where the variable was declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

impl Variable {
    /// Returns true if callers must pass a value for this variable.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A declared output value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Output name (unique within a module)
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Value expression
    pub value: String,
    /// `sensitive` expression, absent means false
    pub sensitive: Option<String>,
    /// Where the output was declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

/// Whether a resource block is managed (`resource`) or a data source (`data`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// `resource` block
    Managed,
    /// `data` block
    Data,
}

/// A `resource` or `data` block declared in the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Managed resource or data source
    pub mode: ResourceMode,
    /// Resource type (e.g., "azurerm_virtual_network")
    pub resource_type: String,
    /// Resource name (e.g., "vnet")
    pub name: String,
    /// Where the resource was declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

impl Resource {
    /// Returns the Terraform address of this resource (`type.name` or `data.type.name`).
    #[must_use]
    pub fn address(&self) -> String {
        match self.mode {
            ResourceMode::Managed => format!("{}.{}", self.resource_type, self.name),
            ResourceMode::Data => format!("data.{}.{}", self.resource_type, self.name),
        }
    }
}

/// A parsed Terraform module.
///
/// Variables and outputs are keyed by name. Call [`Module::sanitize`] before
/// comparing two snapshots for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Directory the module was loaded from, if any
    pub path: Option<PathBuf>,
    /// Declared variables
    pub variables: BTreeMap<String, Variable>,
    /// Declared outputs
    pub outputs: BTreeMap<String, Output>,
    /// Declared resources and data sources
    pub resources: Vec<Resource>,
}

impl Module {
    /// Clears all source-position metadata.
    ///
    /// Positions differ between any two edits of a file, so they are dropped
    /// before two snapshots are compared.
    pub fn sanitize(&mut self) {
        self.path = None;
        for variable in self.variables.values_mut() {
            variable.pos = None;
        }
        for output in self.outputs.values_mut() {
            output.pos = None;
        }
        for resource in &mut self.resources {
            resource.pos = None;
        }
        // Declaration order of resources is not semantic either
        self.resources.sort_by(|a, b| {
            (a.mode, &a.resource_type, &a.name).cmp(&(b.mode, &b.resource_type, &b.name))
        });
    }

    /// Returns a sanitized copy of this module.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut module = self.clone();
        module.sanitize();
        module
    }

    /// Summary counts for reporting.
    #[must_use]
    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            path: self.path.clone(),
            variables: self.variables.len(),
            required_variables: self.variables.values().filter(|v| v.is_required()).count(),
            outputs: self.outputs.len(),
            resources: self.resources.len(),
        }
    }
}

/// Counts describing one module snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    /// Directory the module was loaded from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Number of variables
    pub variables: usize,
    /// Number of variables without a default
    pub required_variables: usize,
    /// Number of outputs
    pub outputs: usize,
    /// Number of resources and data sources
    pub resources: usize,
}

/// Kind of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Present only in the new module
    Create,
    /// Present only in the old module
    Delete,
    /// Present in both with a different value
    Update,
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Delete => write!(f, "delete"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Which part of the module contract a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeCategory {
    /// Input variables
    Variables,
    /// Output values
    Outputs,
}

impl Display for ChangeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variables => write!(f, "Variables"),
            Self::Outputs => write!(f, "Outputs"),
        }
    }
}

/// The field a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// The entity itself (created or deleted)
    Name,
    /// Variable type constraint
    Type,
    /// Description (variables and outputs)
    Description,
    /// Variable default value
    Default,
    /// `sensitive` flag (variables and outputs)
    Sensitive,
    /// Variable `nullable` flag
    Nullable,
    /// Output value expression
    Value,
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "Name",
            Self::Type => "Type",
            Self::Description => "Description",
            Self::Default => "Default",
            Self::Sensitive => "Sensitive",
            Self::Nullable => "Nullable",
            Self::Value => "Value",
        };
        f.write_str(s)
    }
}

/// One semantic delta between an old and a new module.
///
/// A rename is never a single change: it shows up as a `delete` of the old
/// name plus a `create` of the new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Create, delete, or update
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Variables or Outputs
    pub category: ChangeCategory,
    /// Entity name
    pub name: Option<String>,
    /// Changed field, `Name` when the whole entity appeared or disappeared
    pub attribute: Option<Attribute>,
    /// Previous raw value
    pub from: Option<String>,
    /// New raw value
    pub to: Option<String>,
}

impl Change {
    /// Creates a change record for `name.attribute` within `category`.
    #[must_use]
    pub fn new(
        change_type: ChangeType,
        category: ChangeCategory,
        name: &str,
        attribute: Attribute,
        from: Option<String>,
        to: Option<String>,
    ) -> Self {
        Self {
            change_type,
            category,
            name: Some(name.to_string()),
            attribute: Some(attribute),
            from,
            to,
        }
    }

    /// Returns true if this change is of `change_type` on `attribute`.
    #[must_use]
    pub fn is(&self, change_type: ChangeType, attribute: Attribute) -> bool {
        self.change_type == change_type && self.attribute == Some(attribute)
    }

    /// Returns the path segments `[category, name, attribute]`.
    #[must_use]
    pub fn path(&self) -> Vec<String> {
        let mut path = vec![self.category.to_string()];
        if let Some(name) = &self.name {
            path.push(name.clone());
        }
        if let Some(attribute) = &self.attribute {
            path.push(attribute.to_string());
        }
        path
    }
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.change_type, self.path().join("."))?;
        match (&self.from, &self.to) {
            (Some(from), Some(to)) if self.change_type == ChangeType::Update => {
                write!(f, ": {from} -> {to}")
            }
            (None, Some(to)) if self.change_type == ChangeType::Update => write!(f, ": (unset) -> {to}"),
            (Some(from), None) if self.change_type == ChangeType::Update => write!(f, ": {from} -> (unset)"),
            _ => Ok(()),
        }
    }
}

/// The ordered list of raw structural differences between two snapshots.
pub type Changelog = Vec<Change>;

/// Result of comparing two module snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comparison {
    /// Summary of the old snapshot
    pub old: ModuleSummary,
    /// Summary of the new snapshot
    pub new: ModuleSummary,
    /// Every structural difference
    pub changelog: Changelog,
    /// The subset of the changelog that breaks existing callers
    pub breaking: Vec<Change>,
}

impl Comparison {
    /// Returns true if any breaking change was found.
    #[must_use]
    pub fn has_breaking_changes(&self) -> bool {
        !self.breaking.is_empty()
    }

    /// Counts breaking changes in `category`.
    #[must_use]
    pub fn breaking_in(&self, category: ChangeCategory) -> usize {
        self.breaking.iter().filter(|c| c.category == category).count()
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate_report(&self, format: ReportFormat) -> crate::Result<String> {
        let config = crate::Config::default();
        let reporter = crate::reporter::Reporter::new(&config);
        reporter.generate(self, format)
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON format
    #[default]
    Json,
    /// Plain text format
    Text,
}
