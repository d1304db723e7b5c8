use std::fmt;

use serde::{Deserialize, Serialize};

use crate::discover::{GroupVersion, ResourceTypeDescriptor};

/// One entry of an enumeration result.
///
/// Serialized as a flat JSON object; a failure is the object carrying an `error` key.
/// Every record names its own scope, so it can be read without its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum K8sResourceInfo {
    /// A live object.
    ///
    /// `name` is empty when the server returned the object without `metadata.name`.
    #[serde(rename_all = "camelCase")]
    Instance {
        group: String,
        version: String,
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        name: String,
    },
    /// A unit of work that could not be completed, scoped as far as it got.
    #[serde(rename_all = "camelCase")]
    Failure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        #[serde(rename = "error")]
        message: String,
    },
}

impl K8sResourceInfo {
    pub(crate) fn instance(
        resource: &ResourceTypeDescriptor,
        namespace: Option<String>,
        name: String,
    ) -> Self {
        Self::Instance {
            group: resource.group.clone(),
            version: resource.version.clone(),
            kind: resource.kind.clone(),
            namespace,
            name,
        }
    }

    /// A failure not tied to any group/version.
    pub(crate) fn unscoped_failure(message: String) -> Self {
        Self::Failure {
            group: None,
            version: None,
            kind: None,
            namespace: None,
            message,
        }
    }

    pub(crate) fn group_version_failure(group_version: &GroupVersion, message: String) -> Self {
        Self::Failure {
            group: Some(group_version.group.clone()),
            version: Some(group_version.version.clone()),
            kind: None,
            namespace: None,
            message,
        }
    }

    pub(crate) fn resource_failure(
        resource: &ResourceTypeDescriptor,
        namespace: Option<&str>,
        message: String,
    ) -> Self {
        Self::Failure {
            group: Some(resource.group.clone()),
            version: Some(resource.version.clone()),
            kind: Some(resource.kind.clone()),
            namespace: namespace.map(str::to_string),
            message,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Instance { group, .. } => Some(group),
            Self::Failure { group, .. } => group.as_deref(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Instance { version, .. } => Some(version),
            Self::Failure { version, .. } => version.as_deref(),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Instance { kind, .. } => Some(kind),
            Self::Failure { kind, .. } => kind.as_deref(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Instance { namespace, .. } | Self::Failure { namespace, .. } => {
                namespace.as_deref()
            }
        }
    }

    /// The object name of an instance record.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Instance { name, .. } => Some(name),
            Self::Failure { .. } => None,
        }
    }

    /// The error message of a failure record.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Instance { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl fmt::Display for K8sResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scope = Vec::new();
        if let Some(version) = self.version() {
            let group_version = GroupVersion {
                group: self.group().unwrap_or_default().to_string(),
                version: version.to_string(),
            };
            scope.push(group_version.to_string());
        }
        if let Some(kind) = self.kind() {
            scope.push(kind.to_string());
        }
        let scope = scope.join("/");

        match self {
            Self::Instance {
                namespace, name, ..
            } => match namespace {
                Some(namespace) => write!(f, "{scope} {namespace}/{name}"),
                None => write!(f, "{scope} {name}"),
            },
            Self::Failure {
                namespace, message, ..
            } => {
                let target = match (scope.is_empty(), namespace) {
                    (true, _) => String::new(),
                    (false, Some(namespace)) => format!("{scope} {namespace}: "),
                    (false, None) => format!("{scope}: "),
                };
                write!(f, "{target}error: {message}")
            }
        }
    }
}
