//! Structural differ.
//!
//! Compares two modules entity by entity and records every difference as a
//! [`Change`]. Entities are matched by name only, so a rename is a delete
//! plus a create. Source positions are not compared; sanitize both modules
//! first.
//!
//! For a new entity the changelog holds a `create` on `Name` followed by one
//! `create` per populated attribute. For a removed entity it holds a single
//! `delete` on `Name`.

use crate::types::{Attribute, Change, ChangeCategory, ChangeType, Changelog, Module, Output, Variable};

use std::collections::BTreeMap;

/// Diff two modules, variables first, then outputs.
#[must_use]
pub fn diff(old: &Module, new: &Module) -> Changelog {
    let mut changelog = Changelog::new();
    diff_entities(
        &mut changelog,
        ChangeCategory::Variables,
        &old.variables,
        &new.variables,
        variable_fields,
    );
    diff_entities(
        &mut changelog,
        ChangeCategory::Outputs,
        &old.outputs,
        &new.outputs,
        output_fields,
    );

    tracing::debug!(changes = changelog.len(), "Diffed modules");
    changelog
}

type Fields = Vec<(Attribute, Option<String>)>;

fn variable_fields(v: &Variable) -> Fields {
    vec![
        (Attribute::Type, v.type_constraint.clone()),
        (Attribute::Description, v.description.clone()),
        (Attribute::Default, v.default.clone()),
        (Attribute::Sensitive, v.sensitive.clone()),
        (Attribute::Nullable, v.nullable.clone()),
    ]
}

fn output_fields(o: &Output) -> Fields {
    vec![
        (Attribute::Description, o.description.clone()),
        (Attribute::Value, Some(o.value.clone())),
        (Attribute::Sensitive, o.sensitive.clone()),
    ]
}

fn diff_entities<T>(
    changelog: &mut Changelog,
    category: ChangeCategory,
    old: &BTreeMap<String, T>,
    new: &BTreeMap<String, T>,
    fields: fn(&T) -> Fields,
) {
    for (name, old_entity) in old {
        match new.get(name) {
            None => changelog.push(Change::new(
                ChangeType::Delete,
                category,
                name,
                Attribute::Name,
                Some(name.clone()),
                None,
            )),
            Some(new_entity) => {
                let before = fields(old_entity);
                let after = fields(new_entity);
                for ((attribute, from), (_, to)) in before.into_iter().zip(after) {
                    if from != to {
                        changelog.push(Change::new(
                            ChangeType::Update,
                            category,
                            name,
                            attribute,
                            from,
                            to,
                        ));
                    }
                }
            }
        }
    }

    for (name, new_entity) in new {
        if old.contains_key(name) {
            continue;
        }
        changelog.push(Change::new(
            ChangeType::Create,
            category,
            name,
            Attribute::Name,
            None,
            Some(name.clone()),
        ));
        for (attribute, value) in fields(new_entity) {
            if value.is_some() {
                changelog.push(Change::new(ChangeType::Create, category, name, attribute, None, value));
            }
        }
    }
}
