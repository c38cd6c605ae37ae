//! Action registry.
//!
//! Registration happens once, on a mutable [`RegistryBuilder`]. `build()`
//! applies the exclusion set and freezes the table into a [`Registry`] that
//! is shared read-only across any number of concurrent dispatches.

use std::collections::{HashMap, HashSet};

use crate::action::ActionSpec;
use crate::error::ActionError;
use crate::schema::ActionSchema;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Mutable registration phase of a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    specs: Vec<ActionSpec>,
    index: HashMap<String, usize>,
    excluded: HashSet<String>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides the given names from the built registry.
    ///
    /// Exclusion is order-independent: a name may be excluded before or after
    /// it is registered.
    #[must_use]
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// Registers an action.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAction` if the name is already registered, excluded
    /// or not, and leaves the table unchanged. Returns a `Configuration`
    /// error if the name is not usable as an action key.
    pub fn register(&mut self, spec: ActionSpec) -> Result<(), ActionError> {
        spec.validate_name()?;
        if self.index.contains_key(spec.name()) {
            tracing::error!(action = %spec.name(), "Duplicate action registration");
            return Err(ActionError::duplicate_action(spec.name()));
        }

        tracing::info!(
            action = %spec.name(),
            resources = ?spec.required_resources(),
            "action registered"
        );
        self.index.insert(spec.name().to_string(), self.specs.len());
        self.specs.push(spec);
        Ok(())
    }

    /// Returns true if the name has been registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns true if the name will be hidden by `build()`.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    /// Freezes the table, dropping excluded actions.
    #[must_use]
    pub fn build(self) -> Registry {
        let mut specs = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            if self.excluded.contains(spec.name()) {
                tracing::debug!(action = %spec.name(), "action excluded");
                continue;
            }
            specs.push(spec);
        }

        let index = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name().to_string(), i))
            .collect();

        Registry { specs, index }
    }
}

/// Immutable name to action table.
///
/// Excluded actions are not stored at all, so they are indistinguishable
/// from names that were never registered.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    specs: Vec<ActionSpec>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Starts a registration phase.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Finds an action by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAction`, with the closest visible name as a hint when
    /// one is similar enough.
    pub fn lookup(&self, name: &str) -> Result<&ActionSpec, ActionError> {
        self.index
            .get(name)
            .map(|&i| &self.specs[i])
            .ok_or_else(|| ActionError::unknown_action(name, self.suggest(name)))
    }

    /// The discriminated union of all visible actions, in registration order.
    #[must_use]
    pub fn build_schema(&self) -> ActionSchema {
        ActionSchema::new(self.specs.iter().map(ActionSpec::to_variant).collect())
    }

    /// Visible action names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(ActionSpec::name)
    }

    /// Visible actions, in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &ActionSpec> {
        self.specs.iter()
    }

    /// Returns true if the name is visible.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of visible actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if no action is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn suggest(&self, name: &str) -> Option<String> {
        self.names()
            .map(|candidate| (candidate, strsim::jaro_winkler(name, candidate)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate.to_string())
    }
}
