//! Assistant registry
//!
//! Populated once at startup by registering each known adapter under its
//! identifier; read-only afterward, so concurrent request handlers share it
//! without locking. Registration order is preserved and is the order
//! [`AssistantRegistry::list`] reports.

use crate::adapters::{AdapterDescriptor, AssistantAdapter};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Registry resolution failures.
///
/// These are precondition violations on the request itself and the only
/// failures (besides unsupported operations) that propagate past the core.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("assistant '{requested}' is not registered (registered: {registered})")]
    AssistantNotFound {
        requested: String,
        registered: String,
    },

    #[error("no assistants are registered and no default is configured")]
    NoDefaultConfigured,
}

/// Availability report for one registered assistant
#[derive(Debug, Clone, Serialize)]
pub struct AssistantStatus {
    pub identifier: String,
    pub display_name: String,
    pub command: String,
    pub available: bool,
}

/// Read-only mapping from assistant identifier to adapter instance
#[derive(Default)]
pub struct AssistantRegistry {
    // A scanned Vec rather than a map: the registry is tiny, never mutated
    // after startup, and list() must preserve registration order.
    entries: Vec<(String, Arc<dyn AssistantAdapter>)>,
    default_id: Option<String>,
}

impl AssistantRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its descriptor's identifier.
    ///
    /// Re-registering an identifier replaces the previous adapter; each
    /// identifier resolves to exactly one adapter.
    pub fn register(&mut self, adapter: Arc<dyn AssistantAdapter>) {
        let identifier = adapter.descriptor().identifier.clone();
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == identifier) {
            warn!("Replacing previously registered assistant '{}'", identifier);
            entry.1 = adapter;
        } else {
            self.entries.push((identifier, adapter));
        }
    }

    /// Set the identifier returned by [`AssistantRegistry::default_adapter`]
    pub fn set_default(&mut self, identifier: impl Into<String>) {
        self.default_id = Some(identifier.into());
    }

    /// Resolve an identifier to its adapter
    pub fn resolve(&self, identifier: &str) -> Result<&Arc<dyn AssistantAdapter>, RegistryError> {
        self.entries
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, adapter)| adapter)
            .ok_or_else(|| RegistryError::AssistantNotFound {
                requested: identifier.to_string(),
                registered: self
                    .entries
                    .iter()
                    .map(|(id, _)| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// The adapter used when a request names no assistant: the configured
    /// default, or the first registered adapter when none is configured
    pub fn default_adapter(&self) -> Result<&Arc<dyn AssistantAdapter>, RegistryError> {
        match &self.default_id {
            Some(id) => self.resolve(id),
            None => self
                .entries
                .first()
                .map(|(_, adapter)| adapter)
                .ok_or(RegistryError::NoDefaultConfigured),
        }
    }

    /// Descriptors of all registered adapters, in registration order
    pub fn list(&self) -> Vec<&AdapterDescriptor> {
        self.entries
            .iter()
            .map(|(_, adapter)| adapter.descriptor())
            .collect()
    }

    /// Probe every registered adapter's availability concurrently
    pub async fn statuses(&self) -> Vec<AssistantStatus> {
        let probes = self.entries.iter().map(|(id, adapter)| async move {
            let descriptor = adapter.descriptor();
            AssistantStatus {
                identifier: id.clone(),
                display_name: descriptor.display_name.clone(),
                command: descriptor.command.clone(),
                available: adapter.is_available().await,
            }
        });
        futures::future::join_all(probes).await
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
