//! Breaking-change classification.
//!
//! The classifier filters a changelog down to the changes that can break a
//! caller already using the module. It is a pure function of the changelog
//! and never fails.
//!
//! # Rules
//!
//! Variables:
//!
//! 1. **New required variable**: created with no `default`
//! 2. **Deleted variable**
//! 3. **Type change**: the new type constraint is non-empty
//! 4. **Default change**: an existing default was changed or removed
//! 5. **Nullable change**
//! 6. **Sensitivity relaxed**: only with
//!    [`BreakingPolicy::variable_sensitivity_breaking`]
//!
//! Outputs:
//!
//! 1. **Deleted output**
//! 2. **Value change**
//! 3. **Marked sensitive**: the new `sensitive` value is `true`
//!
//! Descriptions never matter.
//!
//! # Example
//!
//! ```rust
//! use tfbreak::analyzer::Analyzer;
//! use tfbreak::Config;
//!
//! let analyzer = Analyzer::new(&Config::default());
//! assert!(analyzer.classify(&[]).is_empty());
//! ```

mod outputs;
mod variables;

use crate::config::Config;
use crate::types::Change;

/// Which optional rules the classifier applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakingPolicy {
    /// Treat a variable that stops being sensitive as breaking.
    pub variable_sensitivity_breaking: bool,
}

impl BreakingPolicy {
    /// Policy from configuration.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            variable_sensitivity_breaking: config.policy.variable_sensitivity_breaking,
        }
    }
}

/// Breaking-change classifier.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    policy: BreakingPolicy,
}

impl Analyzer {
    /// Create a classifier from configuration.
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self::with_policy(BreakingPolicy::from_config(config))
    }

    /// Create a classifier with an explicit policy.
    #[must_use]
    pub const fn with_policy(policy: BreakingPolicy) -> Self {
        Self { policy }
    }

    /// The policy in effect.
    #[must_use]
    pub const fn policy(&self) -> BreakingPolicy {
        self.policy
    }

    /// Return the subset of `changes` that breaks existing callers.
    #[must_use]
    pub fn classify(&self, changes: &[Change]) -> Vec<Change> {
        tracing::debug!(changes = changes.len(), "Classifying changes");
        let mut breaking = Vec::new();

        let new_required = variables::new_required(changes);
        tracing::debug!(count = new_required.len(), "New required variables");
        breaking.extend(new_required);

        let deleted = variables::deleted(changes);
        tracing::debug!(count = deleted.len(), "Deleted variables");
        breaking.extend(deleted);

        breaking.extend(variables::type_changes(changes));
        breaking.extend(variables::default_changes(changes));
        breaking.extend(variables::nullable_changes(changes));

        if self.policy.variable_sensitivity_breaking {
            breaking.extend(variables::sensitivity_changes(changes));
        }

        let deleted = outputs::deleted(changes);
        tracing::debug!(count = deleted.len(), "Deleted outputs");
        breaking.extend(deleted);

        breaking.extend(outputs::value_changes(changes));
        breaking.extend(outputs::sensitivity_changes(changes));

        tracing::debug!(breaking = breaking.len(), "Classification complete");
        breaking
    }
}

/// Classify `changes` with the default policy.
#[must_use]
pub fn classify(changes: &[Change]) -> Vec<Change> {
    Analyzer::default().classify(changes)
}
