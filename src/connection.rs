//! Turns a [`ClusterConnectionConfig`] into an authenticated [`kube::Client`].
//!
//! The client is configured from a synthetic kubeconfig holding exactly one cluster,
//! one user and one context, with that context selected as current. Nothing here
//! touches the network.

use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig, KubeconfigError},
};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::config::ClusterConnectionConfig;

/// Name of the single user entry; not derived from input.
pub const USER_NAME: &str = "kubesweep-user";

const DEFAULT_NAMESPACE: &str = "default";

/// Errors that can occur while building a client for a cluster.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to assemble kubeconfig: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Kubeconfig(#[from] KubeconfigError),

    #[error(transparent)]
    Kube(#[from] kube::Error),
}

/// Name of the context entry bound to the configured cluster.
pub fn context_name(config: &ClusterConnectionConfig) -> String {
    format!("{}-context", config.cluster_name())
}

/// Builds the in-memory kubeconfig for `config`.
///
/// Credential precedence: bearer token, then client certificate and key, then none.
/// Without a CA certificate the cluster entry skips TLS verification.
pub fn build_kubeconfig(config: &ClusterConnectionConfig) -> Result<Kubeconfig, ConnectionError> {
    let mut cluster = Map::new();
    cluster.insert("server".into(), config.api_server_url().into());
    match config.ca_certificate() {
        Some(ca) => {
            cluster.insert("certificate-authority-data".into(), ca.into());
        }
        None => {
            cluster.insert("insecure-skip-tls-verify".into(), true.into());
        }
    }

    let mut user = Map::new();
    match (config.token(), config.client_certificate_pair()) {
        (Some(token), pair) => {
            if pair.is_some() {
                tracing::warn!(
                    cluster = %config.cluster_name(),
                    "both a bearer token and a client certificate were supplied; using the token"
                );
            }
            user.insert("token".into(), token.into());
        }
        (None, Some((certificate, key))) => {
            user.insert("client-certificate-data".into(), certificate.into());
            user.insert("client-key-data".into(), key.into());
        }
        (None, None) => {
            tracing::debug!(cluster = %config.cluster_name(), "no credentials supplied");
        }
    }

    let context = context_name(config);
    let document = json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{ "name": config.cluster_name(), "cluster": Value::Object(cluster) }],
        "users": [{ "name": USER_NAME, "user": Value::Object(user) }],
        "contexts": [{
            "name": &context,
            "context": {
                "cluster": config.cluster_name(),
                "user": USER_NAME,
                "namespace": config.namespace().unwrap_or(DEFAULT_NAMESPACE),
            },
        }],
        "current-context": &context,
    });

    Ok(serde_json::from_value(document)?)
}

/// Resolves the kubeconfig for `config` into a [`kube::Config`].
pub async fn client_config(config: &ClusterConnectionConfig) -> Result<Config, ConnectionError> {
    let kubeconfig = build_kubeconfig(config)?;
    let options = KubeConfigOptions {
        context: Some(context_name(config)),
        ..Default::default()
    };
    Ok(Config::from_custom_kubeconfig(kubeconfig, &options).await?)
}

/// Builds a ready-to-use client for `config`.
pub async fn connect(config: &ClusterConnectionConfig) -> Result<Client, ConnectionError> {
    let client_config = client_config(config).await?;
    tracing::debug!(
        cluster = %config.cluster_name(),
        server = %client_config.cluster_url,
        namespace = %client_config.default_namespace,
        "built cluster client"
    );
    Ok(Client::try_from(client_config)?)
}
