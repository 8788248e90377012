//! Attribute extraction for variable and output blocks.
//!
//! Values are kept as the exact source text of each expression, so
//! `list(string)` and `set(string)` compare unequal while reformatting the
//! whitespace around `=` does not produce a change.

use crate::error::{Result, TfBreakError};
use crate::parser::{json, line_of_offset, SourceFile, Syntax};
use crate::types::{Output, SourcePos, Variable};

use hcl_edit::expr::Expression;
use hcl_edit::structure::{Block, BlockLabel, Body, Structure};
use hcl_edit::Span;
use std::collections::BTreeMap;
use std::path::Path;

/// Variables and outputs extracted from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Variables in file order
    pub variables: Vec<Variable>,
    /// Outputs in file order
    pub outputs: Vec<Output>,
}

/// Reads variable and output attributes as raw expression text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeExtractor;

impl AttributeExtractor {
    /// Create a new extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extract every variable and output declared in `source`.
    ///
    /// # Errors
    ///
    /// Returns `HclParse` when the file cannot be parsed and `HclStructure`
    /// for an output block without a `value`.
    pub fn extract(&self, source: &SourceFile) -> Result<ExtractedFile> {
        match source.syntax() {
            Some(Syntax::Json) => json::extract(&source.content, &source.path),
            Some(Syntax::Native) => extract_native(&source.content, &source.path),
            None => Err(crate::err!(Internal {
                message: format!("not a Terraform file: {}", source.path.display()),
            })),
        }
    }
}

fn extract_native(content: &str, file_path: &Path) -> Result<ExtractedFile> {
    let body = hcl_edit::parser::parse_body(content).map_err(|e| {
        TfBreakError::hcl_parse(
            file_path.to_path_buf(),
            e.to_string(),
            Some(e.location().line()),
            Some(e.location().column()),
            file!(),
            line!(),
        )
    })?;

    let mut extracted = ExtractedFile::default();

    for structure in body.iter() {
        let Structure::Block(block) = structure else {
            continue;
        };
        let (Some(name), true) = (first_label(block), block.labels.len() == 1) else {
            continue;
        };

        let pos = block.span().map(|span| SourcePos {
            file: file_path.to_path_buf(),
            line: line_of_offset(content, span.start),
        });
        let mut attrs = raw_attributes(&block.body, content);

        match block.ident.as_str() {
            "variable" => extracted.variables.push(Variable {
                name,
                type_constraint: attrs.remove("type"),
                description: attrs.remove("description"),
                default: attrs.remove("default"),
                sensitive: attrs.remove("sensitive"),
                nullable: attrs.remove("nullable"),
                pos,
            }),
            "output" => {
                let value = attrs.remove("value").ok_or_else(|| {
                    crate::err!(HclStructure {
                        file: file_path.to_path_buf(),
                        message: format!("output \"{name}\" has no value attribute"),
                    })
                })?;
                extracted.outputs.push(Output {
                    name,
                    description: attrs.remove("description"),
                    value,
                    sensitive: attrs.remove("sensitive"),
                    pos,
                });
            }
            _ => {}
        }
    }

    Ok(extracted)
}

fn first_label(block: &Block) -> Option<String> {
    block.labels.first().map(|label| match label {
        BlockLabel::Ident(ident) => ident.as_str().to_string(),
        BlockLabel::String(s) => s.as_str().to_string(),
    })
}

/// Top-level attributes of a block body, keyed by name.
///
/// Nested blocks (`validation`, `precondition`) are ignored.
fn raw_attributes(body: &Body, content: &str) -> BTreeMap<String, String> {
    body.iter()
        .filter_map(|structure| match structure {
            Structure::Attribute(attr) => {
                Some((attr.key.as_str().to_string(), raw_text(&attr.value, content)))
            }
            Structure::Block(_) => None,
        })
        .collect()
}

fn raw_text(expr: &Expression, content: &str) -> String {
    expr.span()
        .and_then(|span| content.get(span))
        .map_or_else(|| expr.to_string().trim().to_string(), |s| s.trim().to_string())
}
