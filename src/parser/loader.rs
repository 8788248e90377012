//! Module loading: directory walking, parsing, and extraction.

use crate::config::{Config, LoadOptions};
use crate::error::{Result, TfBreakError};
use crate::parser::{
    AttributeExtractor, ConfigParser, HclParser, JsonParser, ParsedFile, SourceFile, Syntax,
    SKIP_FILES, TERRAFORM_EXTENSIONS,
};
use crate::types::Module;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Loads a Terraform module from a directory or from in-memory files.
///
/// Loading either yields a complete [`Module`] or fails; a parse error in
/// any one file fails the whole module.
pub struct ModuleLoader {
    /// Directory walking options
    options: LoadOptions,
    native: HclParser,
    json: JsonParser,
    extractor: AttributeExtractor,
}

impl ModuleLoader {
    /// Create a new loader with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            options: config.load.clone(),
            native: HclParser::new(),
            json: JsonParser::new(),
            extractor: AttributeExtractor::new(),
        }
    }

    /// Load every Terraform file in a module directory.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryNotFound` if `path` is not a directory, `Io` if a
    /// file cannot be read, and any error from [`ModuleLoader::load_sources`].
    pub async fn load_directory(&self, path: &Path) -> Result<Module> {
        if !path.is_dir() {
            return Err(crate::err!(DirectoryNotFound {
                path: path.to_path_buf(),
            }));
        }

        let mut sources = Vec::new();
        for file_path in self.terraform_files(path) {
            let content = tokio::fs::read_to_string(&file_path)
                .await
                .map_err(|e| TfBreakError::io(&file_path, e, file!(), line!()))?;
            sources.push(SourceFile::new(file_path, content));
        }

        let mut module = self.load_sources(&sources)?;
        module.path = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            files = sources.len(),
            variables = module.variables.len(),
            outputs = module.outputs.len(),
            resources = module.resources.len(),
            "Loaded module"
        );

        Ok(module)
    }

    /// Build a module from in-memory files.
    ///
    /// Files whose names are not `.tf` or `.tf.json` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `HclParse` or `HclStructure` for invalid sources, and
    /// `Internal` if extraction disagrees with the declared names.
    pub fn load_sources(&self, sources: &[SourceFile]) -> Result<Module> {
        let mut declared_variables = BTreeSet::new();
        let mut declared_outputs = BTreeSet::new();
        let mut module = Module::default();

        for source in sources {
            let Some(syntax) = source.syntax() else {
                tracing::debug!(file = %source.path.display(), "Ignoring non-Terraform file");
                continue;
            };

            let parsed = self.parse(source, syntax)?;
            for name in &parsed.variables {
                if !declared_variables.insert(name.clone()) {
                    return Err(duplicate(&source.path, "variable", name));
                }
            }
            for name in &parsed.outputs {
                if !declared_outputs.insert(name.clone()) {
                    return Err(duplicate(&source.path, "output", name));
                }
            }
            module.resources.extend(parsed.resources);

            let extracted = self.extractor.extract(source)?;
            for variable in extracted.variables {
                tracing::debug!(
                    file = %source.path.display(),
                    variable = %variable.name,
                    required = variable.is_required(),
                    "Extracted variable"
                );
                module.variables.insert(variable.name.clone(), variable);
            }
            for output in extracted.outputs {
                tracing::debug!(
                    file = %source.path.display(),
                    output = %output.name,
                    "Extracted output"
                );
                module.outputs.insert(output.name.clone(), output);
            }
        }

        let extracted_variables: BTreeSet<_> = module.variables.keys().cloned().collect();
        let extracted_outputs: BTreeSet<_> = module.outputs.keys().cloned().collect();
        if extracted_variables != declared_variables || extracted_outputs != declared_outputs {
            return Err(crate::err!(Internal {
                message: format!(
                    "extracted entities do not match declarations (variables: {:?} vs {:?}, outputs: {:?} vs {:?})",
                    declared_variables, extracted_variables, declared_outputs, extracted_outputs
                ),
            }));
        }

        Ok(module)
    }

    fn parse(&self, source: &SourceFile, syntax: Syntax) -> Result<ParsedFile> {
        let parser: &dyn ConfigParser = match syntax {
            Syntax::Native => &self.native,
            Syntax::Json => &self.json,
        };
        parser.parse_content(&source.content, &source.path)
    }

    /// Terraform files under `root`, sorted by path.
    fn terraform_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .max_depth(self.options.max_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_skip(e.path()))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            if entry.file_type().is_file() && is_terraform_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files
    }

    /// Check if a path should be skipped.
    fn should_skip(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if file_name.starts_with('.') {
            tracing::debug!(path = %path.display(), reason = "hidden file/directory", "Skipping path");
            return true;
        }

        if SKIP_FILES.iter().any(|s| *s == file_name) {
            tracing::debug!(path = %path.display(), reason = "known skip file", "Skipping path");
            return true;
        }

        if self.options.exclude_patterns.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(file_name))
                .unwrap_or(false)
        }) {
            tracing::debug!(path = %path.display(), reason = "matches exclude pattern", "Skipping path");
            return true;
        }

        false
    }
}

fn is_terraform_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    TERRAFORM_EXTENSIONS.iter().any(|ext| path_str.ends_with(ext))
}

fn duplicate(file: &Path, kind: &str, name: &str) -> TfBreakError {
    crate::err!(HclStructure {
        file: file.to_path_buf(),
        message: format!("duplicate {kind} \"{name}\""),
    })
}
