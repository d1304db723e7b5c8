use std::{fmt, future::Future};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    APIGroupList, APIResource, APIResourceList, ObjectMeta,
};
use kube::Error as KubeError;

pub mod client;

/// The verb a resource kind must advertise to be enumerated.
pub const LIST_VERB: &str = "list";

/// An API group/version pair. The core group is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    /// The core group, always served at `/api/v1`.
    pub fn core() -> Self {
        Self {
            group: String::new(),
            version: String::from("v1"),
        }
    }

    /// Splits a combined `group/version` string; a string without `/` is a core version.
    pub fn parse(group_version: &str) -> Self {
        match group_version.split_once('/') {
            Some((group, version)) => Self {
                group: group.to_string(),
                version: version.to_string(),
            },
            None => Self {
                group: String::new(),
                version: group_version.to_string(),
            },
        }
    }

    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }

    /// Resolves the effective group/version of `resource` discovered under `self`.
    ///
    /// The resource's own `group`/`version` fields win; each falls back to `self`
    /// independently when absent or empty.
    pub fn effective_for(&self, resource: &APIResource) -> Self {
        Self {
            group: resource
                .group
                .clone()
                .filter(|group| !group.is_empty())
                .unwrap_or_else(|| self.group.clone()),
            version: resource
                .version
                .clone()
                .filter(|version| !version.is_empty())
                .unwrap_or_else(|| self.version.clone()),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_core() {
            f.write_str(&self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// A listable (or not) resource kind discovered under a group/version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceTypeDescriptor {
    pub group: String,
    pub version: String,
    pub kind: String,
    /// Plural name used in the list URL, e.g. `deployments`.
    pub plural: String,
    pub namespaced: bool,
    pub listable: bool,
}

impl ResourceTypeDescriptor {
    pub fn from_api_resource(resource: &APIResource, discovered_under: &GroupVersion) -> Self {
        let GroupVersion { group, version } = discovered_under.effective_for(resource);
        Self {
            group,
            version,
            kind: resource.kind.clone(),
            plural: resource.name.clone(),
            namespaced: resource.namespaced,
            listable: resource.verbs.iter().any(|verb| verb == LIST_VERB),
        }
    }

    pub fn group_version(&self) -> GroupVersion {
        GroupVersion {
            group: self.group.clone(),
            version: self.version.clone(),
        }
    }
}

/// The subset of the Kubernetes API needed to enumerate a cluster.
///
/// Every call is a single request; implementations must not retry.
pub trait ClusterApi {
    /// Names of every namespace, in server order.
    fn list_namespaces(&self) -> impl Future<Output = Result<Vec<String>, KubeError>> + Send;

    /// Every non-core API group.
    fn list_api_groups(&self) -> impl Future<Output = Result<APIGroupList, KubeError>> + Send;

    /// Resource kinds served under `group_version`.
    fn list_api_resources(
        &self,
        group_version: &GroupVersion,
    ) -> impl Future<Output = Result<APIResourceList, KubeError>> + Send;

    /// Metadata of every `resource` object in `namespace`.
    fn list_namespaced_objects(
        &self,
        resource: &ResourceTypeDescriptor,
        namespace: &str,
    ) -> impl Future<Output = Result<Vec<ObjectMeta>, KubeError>> + Send;

    /// Metadata of every object of a cluster-scoped `resource`.
    fn list_cluster_objects(
        &self,
        resource: &ResourceTypeDescriptor,
    ) -> impl Future<Output = Result<Vec<ObjectMeta>, KubeError>> + Send;
}
