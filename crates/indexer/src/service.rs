use crate::activation::ActivationSink;
use crate::config::SourcesConfig;
use crate::coordinator::{IndexCoordinator, MergedIndex};
use crate::error::{ActivationError, ConfigError};
use crate::gate::QueryGate;
use log::debug;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tabs_protocol::ActivationRef;

/// What a query host talks to: gate, coordinator, config and activation.
pub struct TabService {
    coordinator: IndexCoordinator,
    gate: Mutex<QueryGate>,
    config: RwLock<SourcesConfig>,
    activator: Arc<dyn ActivationSink>,
}

impl TabService {
    pub fn new(
        coordinator: IndexCoordinator,
        gate: QueryGate,
        config: SourcesConfig,
        activator: Arc<dyn ActivationSink>,
    ) -> Self {
        Self {
            coordinator,
            gate: Mutex::new(gate),
            config: RwLock::new(config),
            activator,
        }
    }

    /// Must be called for every query. Returns the snapshot to match against.
    pub fn handle_query(&self, query: &str, is_valid: bool) -> Arc<MergedIndex> {
        let trigger = self.gate.lock().should_refresh(query, is_valid);
        if trigger {
            let enabled = self.config.read().enabled_sources();
            debug!("Query {query:?} triggers refresh of {enabled:?}");
            self.coordinator.request_refresh(&enabled);
        }
        self.coordinator.current_index()
    }

    /// Focuses a tab; the next query will refresh regardless of debounce.
    pub async fn activate(&self, target: &ActivationRef) -> Result<(), ActivationError> {
        self.gate.lock().reset();
        self.activator.activate(target).await
    }

    pub fn set_config_option(&self, name: &str, value: bool) -> Result<(), ConfigError> {
        self.config.write().set_config_option(name, value)
    }

    #[must_use]
    pub fn config(&self) -> SourcesConfig {
        self.config.read().clone()
    }

    #[must_use]
    pub fn coordinator(&self) -> &IndexCoordinator {
        &self.coordinator
    }
}
