//! IndexContext: the settings snapshot every component works from.

use std::sync::Arc;

use crate::settings::Settings;

/// Immutable settings snapshot shared by the registry, the ontology resolver,
/// the layout engine and the scene. Cloning is cheap; replacing settings
/// means building a new context, so a render never sees a half-updated
/// configuration.
#[derive(Debug, Clone)]
pub struct IndexContext {
    settings: Arc<Settings>,
}

impl IndexContext {
    pub fn new(settings: Settings) -> Self {
        Self { settings: Arc::new(settings) }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Another handle to the same snapshot.
    pub fn snapshot(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    /// The drawing the view renders into.
    pub fn output_path(&self) -> &str {
        &self.settings.output_path
    }
}

impl Default for IndexContext {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl From<Settings> for IndexContext {
    fn from(settings: Settings) -> Self {
        Self::new(settings)
    }
}
