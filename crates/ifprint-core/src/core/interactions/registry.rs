use super::Interaction;
use super::builtin;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Constructs a fresh detector instance for a registry entry.
pub type InteractionFactory = Arc<dyn Fn() -> Arc<dyn Interaction> + Send + Sync>;

/// A named, constructible detector type.
#[derive(Clone)]
pub struct RegistryEntry {
    name: String,
    factory: InteractionFactory,
    hidden: bool,
}

impl RegistryEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entry is an internal base type, excluded from default listings
    /// and from selection.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn instantiate(&self) -> Arc<dyn Interaction> {
        (self.factory)()
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// Catalog of interaction detectors available for selection.
///
/// Registration is an upsert: registering a name again replaces the previous entry,
/// so detectors can be redefined while developing them. The abstract root capability
/// (the [`Interaction`] trait itself) is never an entry.
#[derive(Clone, Default)]
pub struct InteractionRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl InteractionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the reference detectors of [`builtin`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtin::register_defaults(&mut registry);
        registry
    }

    /// Registers a visible detector under `name`.
    ///
    /// # Return
    ///
    /// The entry previously registered under the same name, if any.
    pub fn register<F, I>(&mut self, name: &str, factory: F) -> Option<RegistryEntry>
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Interaction + 'static,
    {
        self.insert(name, factory, false)
    }

    /// Registers an internal base detector, hidden from default listings and never
    /// selectable by an orchestrator.
    pub fn register_hidden<F, I>(&mut self, name: &str, factory: F) -> Option<RegistryEntry>
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Interaction + 'static,
    {
        self.insert(name, factory, true)
    }

    fn insert<F, I>(&mut self, name: &str, factory: F, hidden: bool) -> Option<RegistryEntry>
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Interaction + 'static,
    {
        let factory: InteractionFactory =
            Arc::new(move || Arc::new(factory()) as Arc<dyn Interaction>);
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                name: name.to_string(),
                factory,
                hidden,
            },
        )
    }

    pub fn remove(&mut self, name: &str) -> Option<RegistryEntry> {
        self.entries.remove(name)
    }

    /// Looks up an entry by exact name, hidden entries included.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over non-hidden entries in name order.
    pub fn visible(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values().filter(|entry| !entry.hidden)
    }

    /// Lists registered interaction names, sorted alphabetically.
    ///
    /// # Arguments
    ///
    /// * `show_hidden` - Include internal base types.
    pub fn list_available(&self, show_hidden: bool) -> Vec<String> {
        self.entries
            .values()
            .filter(|entry| show_hidden || !entry.hidden)
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for InteractionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
