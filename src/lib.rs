#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use k8s_openapi;
pub use kube;

pub mod config;
pub use config::{ClusterConnectionConfig, ConfigError};
pub mod connection;
pub use connection::ConnectionError;
pub mod discover;
pub mod dynamic;
pub mod event;
pub use event::{EventSink, Phase, TracingSink, TraversalEvent};
pub mod record;
pub use record::K8sResourceInfo;
pub mod traverse;

use discover::client::DiscoverClient;

/// Enumerates everything the configured credentials can list on one cluster.
///
/// Holds no state besides its configuration, so independent instances (or calls)
/// can run concurrently.
#[derive(Debug, Clone)]
pub struct ResourceInventory {
    config: ClusterConnectionConfig,
}

impl ResourceInventory {
    pub fn new(config: ClusterConnectionConfig) -> Self {
        Self { config }
    }

    /// Builds an inventory from the hosting framework's JSON configuration.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or `clusterName` / `apiServerUrl`
    /// is missing or empty.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        ClusterConnectionConfig::from_json_str(json).map(Self::new)
    }

    pub fn config(&self) -> &ClusterConnectionConfig {
        &self.config
    }

    /// Lists every accessible object, reporting progress through `tracing`.
    ///
    /// See [`ResourceInventory::list_all_with`].
    pub async fn list_all(&self) -> Result<Vec<K8sResourceInfo>, ConnectionError> {
        self.list_all_with(&TracingSink).await
    }

    /// Lists every accessible object, reporting progress to `sink`.
    ///
    /// # Errors
    /// Fails only when a client cannot be built from the configuration. Failures of
    /// individual requests are returned as [`K8sResourceInfo::Failure`] records.
    pub async fn list_all_with<S>(&self, sink: &S) -> Result<Vec<K8sResourceInfo>, ConnectionError>
    where
        S: EventSink + ?Sized,
    {
        let client = connection::connect(&self.config).await?;
        tracing::info!(
            cluster = %self.config.cluster_name(),
            namespace = ?self.config.namespace(),
            "enumerating cluster resources"
        );
        let api = DiscoverClient::new(client);
        Ok(traverse::enumerate_resources(&api, self.config.namespace(), sink).await)
    }
}
