//! In-memory connector lookup.
//!
//! The persistent store of connector records belongs to the calling
//! application; the registry is the read-only view the routing layer hands
//! to this library. Resolution follows the routing rule: use the named
//! connector when one is requested, otherwise the first active one.

use crate::{connector::config::ConnectorConfig, error::RegistryError};

/// Read-only collection of connector configurations.
#[derive(Debug, Clone, Default)]
pub struct ConnectorRegistry {
    connectors: Vec<ConnectorConfig>,
}

impl ConnectorRegistry {
    /// Creates a registry over the given configurations.
    #[must_use]
    pub fn new(connectors: Vec<ConnectorConfig>) -> Self {
        Self { connectors }
    }

    /// Number of configured connectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// True when no connector is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Number of active connectors.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.connectors.iter().filter(|c| c.is_active).count()
    }

    /// Iterates over all configured connectors.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectorConfig> {
        self.connectors.iter()
    }

    /// Resolves a connector by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no connector carries the
    /// requested name.
    pub fn by_name(&self, name: &str) -> Result<&ConnectorConfig, RegistryError> {
        self.connectors
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))
    }

    /// Resolves the first active connector, in configuration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoneActive`] when the registry is empty or
    /// every connector is inactive.
    pub fn first_active(&self) -> Result<&ConnectorConfig, RegistryError> {
        self.connectors
            .iter()
            .find(|c| c.is_active)
            .ok_or(RegistryError::NoneActive)
    }
}
