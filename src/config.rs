use std::fmt;

use anyhow::Context;
use serde::Deserialize;

/// Errors raised while building a [`ClusterConnectionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("clusterName is required and must not be empty")]
    MissingClusterName,
    #[error("apiServerUrl is required and must not be empty")]
    MissingApiServerUrl,
}

/// Connection parameters for a single cluster.
///
/// A value of this type always carries a non-empty cluster name and API server URL;
/// both [`ClusterConnectionConfig::new`] and deserialization enforce it.
/// Optional fields holding an empty string are treated as absent.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClusterConnectionConfig")]
pub struct ClusterConnectionConfig {
    cluster_name: String,
    api_server_url: String,
    namespace: Option<String>,
    token: Option<String>,
    client_certificate: Option<String>,
    client_key: Option<String>,
    ca_certificate: Option<String>,
}

/// Wire shape accepted from the hosting framework before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClusterConnectionConfig {
    #[serde(default)]
    cluster_name: String,
    #[serde(default)]
    api_server_url: String,
    namespace: Option<String>,
    token: Option<String>,
    client_certificate: Option<String>,
    client_key: Option<String>,
    ca_certificate: Option<String>,
}

impl TryFrom<RawClusterConnectionConfig> for ClusterConnectionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawClusterConnectionConfig) -> Result<Self, Self::Error> {
        let config = Self::new(raw.cluster_name, raw.api_server_url)?;
        let config = match raw.namespace {
            Some(namespace) => config.with_namespace(namespace),
            None => config,
        };
        let config = match raw.token {
            Some(token) => config.with_token(token),
            None => config,
        };
        let config = match (raw.client_certificate, raw.client_key) {
            (Some(certificate), Some(key)) => config.with_client_certificate(certificate, key),
            (certificate, key) => Self {
                client_certificate: non_empty(certificate),
                client_key: non_empty(key),
                ..config
            },
        };
        Ok(match raw.ca_certificate {
            Some(ca) => config.with_ca_certificate(ca),
            None => config,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ClusterConnectionConfig {
    pub fn new(
        cluster_name: impl Into<String>,
        api_server_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let cluster_name = cluster_name.into();
        let api_server_url = api_server_url.into();
        if cluster_name.trim().is_empty() {
            return Err(ConfigError::MissingClusterName);
        }
        if api_server_url.trim().is_empty() {
            return Err(ConfigError::MissingApiServerUrl);
        }

        Ok(Self {
            cluster_name,
            api_server_url,
            namespace: None,
            token: None,
            client_certificate: None,
            client_key: None,
            ca_certificate: None,
        })
    }

    /// Parse a JSON document using the camelCase keys of the hosting framework.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse cluster connection config")
    }

    /// Restrict the scan to a single namespace instead of discovering all of them.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = non_empty(Some(namespace.into()));
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = non_empty(Some(token.into()));
        self
    }

    /// Both values are base64-encoded PEM, as in kubeconfig `client-*-data` fields.
    pub fn with_client_certificate(
        mut self,
        certificate: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.client_certificate = non_empty(Some(certificate.into()));
        self.client_key = non_empty(Some(key.into()));
        self
    }

    /// Base64-encoded PEM bundle, as in kubeconfig `certificate-authority-data`.
    pub fn with_ca_certificate(mut self, ca: impl Into<String>) -> Self {
        self.ca_certificate = non_empty(Some(ca.into()));
        self
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn api_server_url(&self) -> &str {
        &self.api_server_url
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the certificate/key pair only when both halves are present.
    pub fn client_certificate_pair(&self) -> Option<(&str, &str)> {
        self.client_certificate
            .as_deref()
            .zip(self.client_key.as_deref())
    }

    pub fn ca_certificate(&self) -> Option<&str> {
        self.ca_certificate.as_deref()
    }
}

impl fmt::Debug for ClusterConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "**REDACTED**");
        f.debug_struct("ClusterConnectionConfig")
            .field("cluster_name", &self.cluster_name)
            .field("api_server_url", &self.api_server_url)
            .field("namespace", &self.namespace)
            .field("token", &redacted(&self.token))
            .field("client_certificate", &self.client_certificate.is_some())
            .field("client_key", &redacted(&self.client_key))
            .field("ca_certificate", &self.ca_certificate.is_some())
            .finish()
    }
}
