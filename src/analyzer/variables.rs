//! Breaking-change rules for input variables.

use crate::types::{Attribute, Change, ChangeCategory, ChangeType};
use std::collections::HashMap;

fn variable_changes(changes: &[Change]) -> impl Iterator<Item = &Change> {
    changes
        .iter()
        .filter(|c| c.category == ChangeCategory::Variables)
}

/// New variables without a default.
///
/// Creates are grouped by variable name; a group with no `Default` entry is a
/// new required variable and is reported through its `Name` record.
pub(crate) fn new_required(changes: &[Change]) -> Vec<Change> {
    let mut groups: HashMap<&str, Vec<&Change>> = HashMap::new();
    let mut order = Vec::new();

    for change in variable_changes(changes).filter(|c| c.change_type == ChangeType::Create) {
        let Some(name) = change.name.as_deref() else {
            continue;
        };
        groups
            .entry(name)
            .or_insert_with(|| {
                order.push(name);
                Vec::new()
            })
            .push(change);
    }

    order
        .into_iter()
        .filter_map(|name| {
            let group = &groups[name];
            if group.iter().any(|c| c.attribute == Some(Attribute::Default)) {
                return None;
            }
            group
                .iter()
                .find(|c| c.attribute == Some(Attribute::Name))
                .map(|c| (*c).clone())
        })
        .collect()
}

/// Variables that no longer exist.
pub(crate) fn deleted(changes: &[Change]) -> Vec<Change> {
    variable_changes(changes)
        .filter(|c| c.is(ChangeType::Delete, Attribute::Name))
        .cloned()
        .collect()
}

/// Type constraints changed to something non-empty.
pub(crate) fn type_changes(changes: &[Change]) -> Vec<Change> {
    variable_changes(changes)
        .filter(|c| c.is(ChangeType::Update, Attribute::Type))
        .filter(|c| c.to.as_deref().is_some_and(|to| !to.trim().is_empty()))
        .cloned()
        .collect()
}

/// Defaults changed or removed. Adding a default is not breaking.
pub(crate) fn default_changes(changes: &[Change]) -> Vec<Change> {
    variable_changes(changes)
        .filter(|c| c.is(ChangeType::Update, Attribute::Default) && c.from.is_some())
        .cloned()
        .collect()
}

pub(crate) fn nullable_changes(changes: &[Change]) -> Vec<Change> {
    variable_changes(changes)
        .filter(|c| c.is(ChangeType::Update, Attribute::Nullable))
        .cloned()
        .collect()
}

/// Variables that stopped being sensitive, either flipped to false or with
/// the attribute removed. Only applied when the policy asks for it.
pub(crate) fn sensitivity_changes(changes: &[Change]) -> Vec<Change> {
    variable_changes(changes)
        .filter(|c| c.is(ChangeType::Update, Attribute::Sensitive))
        .filter(|c| c.from.as_deref() == Some("true") && c.to.as_deref() != Some("true"))
        .cloned()
        .collect()
}
