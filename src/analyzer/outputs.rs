//! Breaking-change rules for outputs.
//!
//! New outputs are additive and never breaking.

use crate::types::{Attribute, Change, ChangeCategory, ChangeType};

fn output_changes(changes: &[Change]) -> impl Iterator<Item = &Change> {
    changes
        .iter()
        .filter(|c| c.category == ChangeCategory::Outputs)
}

/// Outputs that no longer exist.
pub(crate) fn deleted(changes: &[Change]) -> Vec<Change> {
    output_changes(changes)
        .filter(|c| c.is(ChangeType::Delete, Attribute::Name))
        .cloned()
        .collect()
}

pub(crate) fn value_changes(changes: &[Change]) -> Vec<Change> {
    output_changes(changes)
        .filter(|c| c.is(ChangeType::Update, Attribute::Value))
        .cloned()
        .collect()
}

/// Outputs newly marked sensitive. Unmasking or dropping the attribute is
/// not breaking.
pub(crate) fn sensitivity_changes(changes: &[Change]) -> Vec<Change> {
    output_changes(changes)
        .filter(|c| c.is(ChangeType::Update, Attribute::Sensitive))
        .filter(|c| c.to.as_deref() == Some("true"))
        .cloned()
        .collect()
}
