use k8s_openapi::{
    api::core::v1::Namespace,
    apimachinery::pkg::apis::meta::v1::{APIGroupList, APIResourceList, ObjectMeta},
};
use kube::{
    Api, Client, Error as KubeError,
    api::{ListParams, ObjectList},
};

use super::{ClusterApi, GroupVersion, ResourceTypeDescriptor};
use crate::dynamic::DynamicObject;

/// [`ClusterApi`] backed by a live [`kube::Client`].
#[derive(Clone)]
pub struct DiscoverClient {
    client: Client,
}

impl DiscoverClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn into_metadata(list: ObjectList<DynamicObject>) -> Vec<ObjectMeta> {
    list.items.into_iter().map(|object| object.metadata).collect()
}

impl ClusterApi for DiscoverClient {
    async fn list_namespaces(&self) -> Result<Vec<String>, KubeError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces.list(&ListParams::default()).await?;
        Ok(list
            .items
            .into_iter()
            .filter_map(|namespace| namespace.metadata.name)
            .collect())
    }

    async fn list_api_groups(&self) -> Result<APIGroupList, KubeError> {
        self.client.list_api_groups().await
    }

    async fn list_api_resources(
        &self,
        group_version: &GroupVersion,
    ) -> Result<APIResourceList, KubeError> {
        // The core group is served from the legacy `/api` prefix.
        if group_version.is_core() {
            self.client
                .list_core_api_resources(&group_version.version)
                .await
        } else {
            self.client
                .list_api_group_resources(&group_version.to_string())
                .await
        }
    }

    async fn list_namespaced_objects(
        &self,
        resource: &ResourceTypeDescriptor,
        namespace: &str,
    ) -> Result<Vec<ObjectMeta>, KubeError> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, resource);
        Ok(into_metadata(api.list(&ListParams::default()).await?))
    }

    async fn list_cluster_objects(
        &self,
        resource: &ResourceTypeDescriptor,
    ) -> Result<Vec<ObjectMeta>, KubeError> {
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), resource);
        Ok(into_metadata(api.list(&ListParams::default()).await?))
    }
}
