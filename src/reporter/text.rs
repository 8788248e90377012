//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Change, ChangeType, Comparison, ModuleSummary};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Widest raw value shown in a table cell.
const MAX_VALUE_WIDTH: usize = 40;

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list non-breaking changes too
    show_all_changes: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            show_all_changes: config.output.show_all_changes,
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, comparison: &Comparison) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header());
        output.push('\n');

        output.push_str(&self.format_summary(comparison));
        output.push('\n');

        if !comparison.breaking.is_empty() {
            output.push_str(&self.format_changes("Breaking Changes", &comparison.breaking));
            output.push('\n');
        }

        if self.show_all_changes && !comparison.changelog.is_empty() {
            output.push_str(&self.format_changes("All Changes", &comparison.changelog));
            output.push('\n');
        }

        output.push_str(&self.format_footer(comparison));

        Ok(output)
    }
}

impl TextReporter {
    fn title(&self, text: &str) -> String {
        if self.use_colors {
            text.bright_cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format the report header.
    fn format_header(&self) -> String {
        let title = "tfbreak Module Comparison";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        if self.use_colors {
            format!(
                "\n{} {} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                format!("({timestamp})").dimmed(),
                "=".repeat(80).bright_blue(),
            )
        } else {
            format!("\n{title} {version} ({timestamp})\n{}\n", "=".repeat(80))
        }
    }

    /// Format the summary section.
    fn format_summary(&self, comparison: &Comparison) -> String {
        let mut output = format!("\n{}\n{}\n", self.title("Summary"), "-".repeat(80));

        output.push_str(&format!("  old: {}\n", describe(&comparison.old)));
        output.push_str(&format!("  new: {}\n", describe(&comparison.new)));

        let breaking = comparison.breaking.len();
        let breaking_str = if self.use_colors && breaking > 0 {
            breaking.to_string().red().bold().to_string()
        } else {
            breaking.to_string()
        };
        output.push_str(&format!(
            "  {} {} | {} {}\n",
            comparison.changelog.len(),
            if comparison.changelog.len() == 1 { "change" } else { "changes" },
            breaking_str,
            "breaking",
        ));

        output
    }

    /// Format a table of changes.
    fn format_changes(&self, title: &str, changes: &[Change]) -> String {
        let mut output = format!("\n{}\n{}\n", self.title(title), "-".repeat(80));

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Type", "Category", "Name", "Attribute", "From", "To"]);

        for change in changes {
            let type_cell = Cell::new(change.change_type.to_string());
            let type_cell = if self.use_colors {
                type_cell.fg(match change.change_type {
                    ChangeType::Create => Color::Green,
                    ChangeType::Delete => Color::Red,
                    ChangeType::Update => Color::Yellow,
                })
            } else {
                type_cell
            };

            table.add_row(vec![
                type_cell,
                Cell::new(change.category.to_string()),
                Cell::new(change.name.as_deref().unwrap_or("-")),
                Cell::new(change.attribute.map_or_else(|| "-".to_string(), |a| a.to_string())),
                Cell::new(display_value(change.from.as_deref())),
                Cell::new(display_value(change.to.as_deref())),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Format the report footer.
    fn format_footer(&self, comparison: &Comparison) -> String {
        let status = if comparison.has_breaking_changes() {
            let text = format!(
                "FAILED - {} breaking change(s) found",
                comparison.breaking.len()
            );
            if self.use_colors {
                text.red().bold().to_string()
            } else {
                text
            }
        } else if self.use_colors {
            "PASSED - No breaking changes".green().to_string()
        } else {
            "PASSED - No breaking changes".to_string()
        };

        format!("\n{status}\n\n")
    }
}

fn describe(summary: &ModuleSummary) -> String {
    let path = summary
        .path
        .as_ref()
        .map(|p| format!("{} ", p.display()))
        .unwrap_or_default();
    format!(
        "{path}({} variables, {} required | {} outputs | {} resources)",
        summary.variables, summary.required_variables, summary.outputs, summary.resources
    )
}

/// One-line, width-limited rendering of a raw value.
fn display_value(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    let flat = value.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&flat, MAX_VALUE_WIDTH)
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
