//! Terraform JSON syntax (`.tf.json`).
//!
//! Terraform accepts a JSON document whose top-level keys mirror the native
//! block types. A named block may be given as one object or as an array of
//! objects:
//!
//! ```json
//! {
//!   "variable": { "vnet_name": [ { "type": "string", "nullable": false } ] },
//!   "output":   { "vnet_id":   { "value": "${azurerm_virtual_network.vnet.id}" } }
//! }
//! ```
//!
//! Attribute values are captured as their compact JSON text.

use crate::error::{Result, TfBreakError};
use crate::parser::extract::ExtractedFile;
use crate::parser::{ConfigParser, ParsedFile};
use crate::types::{Output, Resource, ResourceMode, SourcePos, Variable};

use serde_json::{Map, Value};
use std::path::Path;

/// Structural parser for `.tf.json` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Create a new JSON parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConfigParser for JsonParser {
    fn parse_content(&self, content: &str, file_path: &Path) -> Result<ParsedFile> {
        let root = parse_root(content, file_path)?;

        let mut result = ParsedFile {
            file: file_path.to_path_buf(),
            ..Default::default()
        };

        for (name, _) in named_blocks(&root, "variable", file_path)? {
            result.variables.push(name.clone());
        }
        for (name, body) in named_blocks(&root, "output", file_path)? {
            if !body.contains_key("value") {
                return Err(crate::err!(HclStructure {
                    file: file_path.to_path_buf(),
                    message: format!("output \"{name}\" has no value attribute"),
                }));
            }
            result.outputs.push(name.clone());
        }
        result
            .resources
            .extend(resource_blocks(&root, "resource", ResourceMode::Managed, file_path)?);
        result
            .resources
            .extend(resource_blocks(&root, "data", ResourceMode::Data, file_path)?);

        tracing::debug!(
            file = %file_path.display(),
            variables = result.variables.len(),
            outputs = result.outputs.len(),
            resources = result.resources.len(),
            "Parsed JSON configuration file"
        );

        Ok(result)
    }
}

/// Extract variable and output attributes from a `.tf.json` file.
pub(crate) fn extract(content: &str, file_path: &Path) -> Result<ExtractedFile> {
    let root = parse_root(content, file_path)?;
    let pos = || {
        Some(SourcePos {
            file: file_path.to_path_buf(),
            line: 0,
        })
    };

    let mut extracted = ExtractedFile::default();

    for (name, body) in named_blocks(&root, "variable", file_path)? {
        extracted.variables.push(Variable {
            name: name.clone(),
            type_constraint: raw_value(body, "type"),
            description: raw_value(body, "description"),
            default: raw_value(body, "default"),
            sensitive: raw_value(body, "sensitive"),
            nullable: raw_value(body, "nullable"),
            pos: pos(),
        });
    }

    for (name, body) in named_blocks(&root, "output", file_path)? {
        let value = raw_value(body, "value").ok_or_else(|| {
            crate::err!(HclStructure {
                file: file_path.to_path_buf(),
                message: format!("output \"{name}\" has no value attribute"),
            })
        })?;
        extracted.outputs.push(Output {
            name: name.clone(),
            description: raw_value(body, "description"),
            value,
            sensitive: raw_value(body, "sensitive"),
            pos: pos(),
        });
    }

    Ok(extracted)
}

fn parse_root(content: &str, file_path: &Path) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(content).map_err(|e| {
        TfBreakError::hcl_parse(
            file_path.to_path_buf(),
            e.to_string(),
            Some(e.line()),
            Some(e.column()),
            file!(),
            line!(),
        )
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!("top-level value must be an object, found {}", type_name(&other)),
        })),
    }
}

/// Collects `(name, body)` pairs for a single-label block type.
///
/// An array of bodies yields one pair per element; the loader reports the
/// resulting duplicate names.
fn named_blocks<'a>(
    root: &'a Map<String, Value>,
    block_type: &str,
    file_path: &Path,
) -> Result<Vec<(&'a String, &'a Map<String, Value>)>> {
    let Some(section) = root.get(block_type) else {
        return Ok(Vec::new());
    };
    let section = as_object(section, block_type, file_path)?;

    let mut blocks = Vec::new();
    for (name, value) in section {
        for body in bodies(value, &format!("{block_type} \"{name}\""), file_path)? {
            blocks.push((name, body));
        }
    }
    Ok(blocks)
}

/// Collects resources for a two-label block type (`resource` or `data`).
fn resource_blocks(
    root: &Map<String, Value>,
    block_type: &str,
    mode: ResourceMode,
    file_path: &Path,
) -> Result<Vec<Resource>> {
    let Some(section) = root.get(block_type) else {
        return Ok(Vec::new());
    };

    let mut resources = Vec::new();
    for (resource_type, by_name) in as_object(section, block_type, file_path)? {
        let context = format!("{block_type} \"{resource_type}\"");
        for (name, value) in as_object(by_name, &context, file_path)? {
            for _ in bodies(value, &format!("{context} \"{name}\""), file_path)? {
                resources.push(Resource {
                    mode,
                    resource_type: resource_type.clone(),
                    name: name.clone(),
                    pos: None,
                });
            }
        }
    }
    Ok(resources)
}

fn bodies<'a>(
    value: &'a Value,
    context: &str,
    file_path: &Path,
) -> Result<Vec<&'a Map<String, Value>>> {
    match value {
        Value::Object(body) => Ok(vec![body]),
        Value::Array(items) => items
            .iter()
            .map(|item| as_object(item, context, file_path))
            .collect(),
        other => Err(crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!("{context} must be an object or array, found {}", type_name(other)),
        })),
    }
}

fn as_object<'a>(value: &'a Value, context: &str, file_path: &Path) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!("{context} must be an object, found {}", type_name(value)),
        })
    })
}

/// Compact JSON text of an attribute, `None` when absent.
fn raw_value(body: &Map<String, Value>, key: &str) -> Option<String> {
    body.get(key).map(Value::to_string)
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
