//! Native HCL parser for the structural stage.
//!
//! This module reads `.tf` files with the `hcl-rs` crate and records what
//! each file declares.

use crate::error::{Result, TfBreakError};
use crate::parser::{ConfigParser, ParsedFile};
use crate::types::{Resource, ResourceMode};

use hcl::{Block, Body};
use std::path::Path;

/// Structural parser for native-syntax `.tf` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct HclParser;

impl HclParser {
    /// Create a new native HCL parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConfigParser for HclParser {
    fn parse_content(&self, content: &str, file_path: &Path) -> Result<ParsedFile> {
        let body: Body = hcl::parse(content).map_err(|e| hcl_parse_error(file_path, &e))?;

        let mut result = ParsedFile {
            file: file_path.to_path_buf(),
            ..Default::default()
        };

        for block in body.blocks() {
            match block.identifier.as_str() {
                "variable" => {
                    let name = single_label(block, file_path)?;
                    result.variables.push(name);
                }
                "output" => {
                    let name = single_label(block, file_path)?;
                    if !block.body.attributes().any(|a| a.key.as_str() == "value") {
                        return Err(crate::err!(HclStructure {
                            file: file_path.to_path_buf(),
                            message: format!("output \"{name}\" has no value attribute"),
                        }));
                    }
                    result.outputs.push(name);
                }
                "resource" => result
                    .resources
                    .push(parse_resource_block(block, ResourceMode::Managed, file_path)?),
                "data" => result
                    .resources
                    .push(parse_resource_block(block, ResourceMode::Data, file_path)?),
                _ => {
                    // locals, providers, module calls and terraform settings
                    // are not part of the variable/output contract
                }
            }
        }

        tracing::debug!(
            file = %file_path.display(),
            variables = result.variables.len(),
            outputs = result.outputs.len(),
            resources = result.resources.len(),
            "Parsed native HCL file"
        );

        Ok(result)
    }
}

/// Maps an `hcl-rs` error to `HclParse`, keeping line and column when the
/// parser reported them.
pub(crate) fn hcl_parse_error(file_path: &Path, error: &hcl::Error) -> TfBreakError {
    let (message, line, column) = match error {
        hcl::Error::Parse(e) => (
            e.to_string(),
            Some(e.location().line()),
            Some(e.location().column()),
        ),
        other => (other.to_string(), None, None),
    };
    TfBreakError::hcl_parse(
        file_path.to_path_buf(),
        message,
        line,
        column,
        file!(),
        line!(),
    )
}

/// Returns the only label of a `variable` or `output` block.
fn single_label(block: &Block, file_path: &Path) -> Result<String> {
    match block.labels.as_slice() {
        [label] => Ok(label.as_str().to_string()),
        labels => Err(crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!(
                "{} block needs exactly one label, found {}",
                block.identifier.as_str(),
                labels.len()
            ),
        })),
    }
}

/// Parse a `resource` or `data` block into a `Resource`.
fn parse_resource_block(block: &Block, mode: ResourceMode, file_path: &Path) -> Result<Resource> {
    match block.labels.as_slice() {
        [resource_type, name] => Ok(Resource {
            mode,
            resource_type: resource_type.as_str().to_string(),
            name: name.as_str().to_string(),
            pos: None,
        }),
        labels => Err(crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!(
                "{} block needs exactly two labels, found {}",
                block.identifier.as_str(),
                labels.len()
            ),
        })),
    }
}
