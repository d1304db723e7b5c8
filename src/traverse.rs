//! Walks every group/version, every listable kind within it and every instance of that
//! kind, producing a flat list of [`K8sResourceInfo`] records.
//!
//! Requests are issued one at a time, so the output order is the discovery order:
//! the core group first, then other groups as the server reports them; kinds in server
//! order; namespaces in resolved order. A failing request becomes a
//! [`K8sResourceInfo::Failure`] record and the walk moves on.

use kube::Error as KubeError;

use crate::{
    discover::{ClusterApi, GroupVersion, ResourceTypeDescriptor},
    event::{EventSink, Phase, TraversalEvent},
    record::K8sResourceInfo,
};

/// Namespace scanned when none is configured and none can be discovered.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Enumerates every object `api` can list.
///
/// With `namespace` set, namespaced kinds are listed in that namespace only and no
/// namespace discovery is attempted.
pub async fn enumerate_resources<C, S>(
    api: &C,
    namespace: Option<&str>,
    sink: &S,
) -> Vec<K8sResourceInfo>
where
    C: ClusterApi,
    S: EventSink + ?Sized,
{
    let mut traversal = Traversal {
        api,
        sink,
        records: Vec::new(),
    };

    let namespaces = traversal.resolve_namespaces(namespace).await;
    traversal.visit_all_groups(&namespaces).await;

    let records = traversal.records;
    let failures = records.iter().filter(|record| record.is_failure()).count();
    sink.emit(TraversalEvent::progress(
        Phase::Done,
        format!(
            "enumerated {} objects with {failures} failures",
            records.len() - failures
        ),
    ));
    records
}

struct Traversal<'a, C, S: ?Sized> {
    api: &'a C,
    sink: &'a S,
    records: Vec<K8sResourceInfo>,
}

impl<C, S> Traversal<'_, C, S>
where
    C: ClusterApi,
    S: EventSink + ?Sized,
{
    /// Determines the namespaces namespaced kinds are listed in. Never empty.
    async fn resolve_namespaces(&mut self, configured: Option<&str>) -> Vec<String> {
        if let Some(namespace) = configured {
            self.sink.emit(TraversalEvent::progress(
                Phase::Namespaces,
                format!("using configured namespace {namespace}"),
            ));
            return vec![namespace.to_string()];
        }

        let mut namespaces = match self.api.list_namespaces().await {
            Ok(namespaces) => {
                self.sink.emit(TraversalEvent::progress(
                    Phase::Namespaces,
                    format!("discovered {} namespaces", namespaces.len()),
                ));
                namespaces
            }
            Err(err) => {
                let message = format!("Failed to list namespaces: {err}");
                self.sink
                    .emit(TraversalEvent::failure(Phase::Namespaces, message.as_str()));
                self.records.push(K8sResourceInfo::unscoped_failure(message));
                Vec::new()
            }
        };

        if namespaces.is_empty() {
            namespaces.push(DEFAULT_NAMESPACE.to_string());
        }
        namespaces
    }

    async fn visit_all_groups(&mut self, namespaces: &[String]) {
        // The core group is absent from the group list and is always visited.
        self.visit_group_version(&GroupVersion::core(), namespaces)
            .await;

        self.sink
            .emit(TraversalEvent::progress(Phase::Groups, "listing API groups"));
        let groups = match self.api.list_api_groups().await {
            Ok(groups) => groups.groups,
            Err(err) => {
                let message = format!("Failed to list API groups: {err}");
                self.sink
                    .emit(TraversalEvent::failure(Phase::Groups, message.as_str()));
                self.records.push(K8sResourceInfo::unscoped_failure(message));
                return;
            }
        };

        for group in groups {
            let Some(preferred) = group.preferred_version else {
                self.sink.emit(TraversalEvent::progress(
                    Phase::Groups,
                    format!("skipping group {} without a preferred version", group.name),
                ));
                continue;
            };
            let group_version = GroupVersion::parse(&preferred.group_version);
            self.visit_group_version(&group_version, namespaces).await;
        }
    }

    async fn visit_group_version(&mut self, group_version: &GroupVersion, namespaces: &[String]) {
        self.sink.emit(TraversalEvent::progress(
            Phase::Resources,
            format!("discovering resources in {group_version}"),
        ));

        let resources = match self.api.list_api_resources(group_version).await {
            Ok(list) => list.resources,
            Err(err) => {
                let message = format!("Failed to discover resources for {group_version}: {err}");
                self.sink
                    .emit(TraversalEvent::failure(Phase::Resources, message.as_str()));
                self.records
                    .push(K8sResourceInfo::group_version_failure(group_version, message));
                return;
            }
        };

        for resource in resources
            .iter()
            .map(|resource| ResourceTypeDescriptor::from_api_resource(resource, group_version))
            .filter(|resource| resource.listable)
        {
            if resource.namespaced {
                for namespace in namespaces {
                    self.list_namespaced(&resource, namespace).await;
                }
            } else {
                self.list_cluster_scoped(&resource).await;
            }
        }
    }

    async fn list_namespaced(&mut self, resource: &ResourceTypeDescriptor, namespace: &str) {
        match self.api.list_namespaced_objects(resource, namespace).await {
            Ok(items) => {
                self.sink.emit(TraversalEvent::progress(
                    Phase::Listing,
                    format!(
                        "found {} {} in {namespace}",
                        items.len(),
                        resource.plural
                    ),
                ));
                for meta in items {
                    // The object's own namespace is authoritative.
                    let item_namespace = meta.namespace.or_else(|| Some(namespace.to_string()));
                    let name = self.object_name(resource, meta.name);
                    self.records
                        .push(K8sResourceInfo::instance(resource, item_namespace, name));
                }
            }
            Err(err) => self.record_listing_failure(resource, Some(namespace), err),
        }
    }

    async fn list_cluster_scoped(&mut self, resource: &ResourceTypeDescriptor) {
        match self.api.list_cluster_objects(resource).await {
            Ok(items) => {
                self.sink.emit(TraversalEvent::progress(
                    Phase::Listing,
                    format!("found {} {}", items.len(), resource.plural),
                ));
                for meta in items {
                    let name = self.object_name(resource, meta.name);
                    self.records.push(K8sResourceInfo::instance(resource, None, name));
                }
            }
            Err(err) => self.record_listing_failure(resource, None, err),
        }
    }

    /// The server may omit `metadata.name`; such objects are kept with an empty name.
    fn object_name(&self, resource: &ResourceTypeDescriptor, name: Option<String>) -> String {
        name.unwrap_or_else(|| {
            self.sink.emit(TraversalEvent::progress(
                Phase::Listing,
                format!("a {} object was returned without a name", resource.kind),
            ));
            String::new()
        })
    }

    fn record_listing_failure(
        &mut self,
        resource: &ResourceTypeDescriptor,
        namespace: Option<&str>,
        err: KubeError,
    ) {
        let message = match namespace {
            Some(namespace) => format!(
                "Failed to list {} in namespace {namespace}: {err}",
                resource.plural
            ),
            None => format!("Failed to list {}: {err}", resource.plural),
        };
        self.sink
            .emit(TraversalEvent::failure(Phase::Listing, message.as_str()));
        self.records
            .push(K8sResourceInfo::resource_failure(resource, namespace, message));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
        APIGroup, APIGroupList, APIResource, APIResourceList, GroupVersionForDiscovery, ObjectMeta,
    };
    use kube::{Error as KubeError, core::ErrorResponse};

    use super::enumerate_resources;
    use crate::{
        discover::{ClusterApi, GroupVersion, ResourceTypeDescriptor},
        event::{Phase, TraversalEvent},
        record::K8sResourceInfo,
    };

    fn api_error(code: u16) -> KubeError {
        KubeError::Api(ErrorResponse {
            status: "Failure".into(),
            message: format!("status={code}"),
            reason: "Test".into(),
            code,
        })
    }

    fn objects(namespace: Option<&str>, names: &[&str]) -> Vec<ObjectMeta> {
        names
            .iter()
            .map(|name| ObjectMeta {
                name: Some(name.to_string()),
                namespace: namespace.map(str::to_string),
                ..Default::default()
            })
            .collect()
    }

    fn resource(name: &str, kind: &str, namespaced: bool, verbs: &[&str]) -> APIResource {
        APIResource {
            name: name.to_string(),
            kind: kind.to_string(),
            namespaced,
            verbs: verbs.iter().map(|verb| verb.to_string()).collect(),
            ..Default::default()
        }
    }

    /// In-memory cluster. Missing entries answer with a 404; `Err(code)` entries fail
    /// with that status code.
    #[derive(Default)]
    struct FakeCluster {
        namespaces: Option<Result<Vec<String>, u16>>,
        groups: Option<Result<Vec<(String, Option<String>)>, u16>>,
        resources: HashMap<String, Result<Vec<APIResource>, u16>>,
        objects: HashMap<(String, Option<String>), Result<Vec<ObjectMeta>, u16>>,
        calls: Mutex<Vec<String>>,
        namespace_calls: AtomicUsize,
    }

    impl FakeCluster {
        fn with_namespaces(mut self, namespaces: Result<&[&str], u16>) -> Self {
            self.namespaces =
                Some(namespaces.map(|list| list.iter().map(|ns| ns.to_string()).collect()));
            self
        }

        fn with_groups(mut self, groups: Result<&[(&str, Option<&str>)], u16>) -> Self {
            self.groups = Some(groups.map(|list| {
                list.iter()
                    .map(|(name, preferred)| (name.to_string(), preferred.map(str::to_string)))
                    .collect()
            }));
            self
        }

        fn with_resources(
            mut self,
            group_version: &str,
            resources: Result<Vec<APIResource>, u16>,
        ) -> Self {
            self.resources.insert(group_version.to_string(), resources);
            self
        }

        fn with_objects(
            mut self,
            plural: &str,
            namespace: Option<&str>,
            objects: Result<Vec<ObjectMeta>, u16>,
        ) -> Self {
            self.objects
                .insert((plural.to_string(), namespace.map(str::to_string)), objects);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record_call(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn objects_for(
            &self,
            resource: &ResourceTypeDescriptor,
            namespace: Option<&str>,
        ) -> Result<Vec<ObjectMeta>, KubeError> {
            match self
                .objects
                .get(&(resource.plural.clone(), namespace.map(str::to_string)))
            {
                Some(Ok(objects)) => Ok(objects.clone()),
                Some(Err(code)) => Err(api_error(*code)),
                None => Ok(Vec::new()),
            }
        }
    }

    impl ClusterApi for FakeCluster {
        async fn list_namespaces(&self) -> Result<Vec<String>, KubeError> {
            self.namespace_calls.fetch_add(1, Ordering::SeqCst);
            match &self.namespaces {
                Some(Ok(namespaces)) => Ok(namespaces.clone()),
                Some(Err(code)) => Err(api_error(*code)),
                None => Ok(Vec::new()),
            }
        }

        async fn list_api_groups(&self) -> Result<APIGroupList, KubeError> {
            self.record_call("groups".into());
            match &self.groups {
                Some(Ok(groups)) => Ok(APIGroupList {
                    groups: groups
                        .iter()
                        .map(|(name, preferred)| APIGroup {
                            name: name.clone(),
                            preferred_version: preferred.as_ref().map(|group_version| {
                                GroupVersionForDiscovery {
                                    group_version: group_version.clone(),
                                    version: GroupVersion::parse(group_version).version,
                                }
                            }),
                            ..Default::default()
                        })
                        .collect(),
                }),
                Some(Err(code)) => Err(api_error(*code)),
                None => Ok(APIGroupList::default()),
            }
        }

        async fn list_api_resources(
            &self,
            group_version: &GroupVersion,
        ) -> Result<APIResourceList, KubeError> {
            let key = group_version.to_string();
            self.record_call(format!("resources {key}"));
            match self.resources.get(&key) {
                Some(Ok(resources)) => Ok(APIResourceList {
                    group_version: key,
                    resources: resources.clone(),
                }),
                Some(Err(code)) => Err(api_error(*code)),
                None => Err(api_error(404)),
            }
        }

        async fn list_namespaced_objects(
            &self,
            resource: &ResourceTypeDescriptor,
            namespace: &str,
        ) -> Result<Vec<ObjectMeta>, KubeError> {
            self.record_call(format!("list {} {namespace}", resource.plural));
            self.objects_for(resource, Some(namespace))
        }

        async fn list_cluster_objects(
            &self,
            resource: &ResourceTypeDescriptor,
        ) -> Result<Vec<ObjectMeta>, KubeError> {
            self.record_call(format!("list {}", resource.plural));
            self.objects_for(resource, None)
        }
    }

    fn noop(_: TraversalEvent) {}

    fn instance(
        group: &str,
        kind: &str,
        namespace: Option<&str>,
        name: &str,
    ) -> K8sResourceInfo {
        K8sResourceInfo::Instance {
            group: group.into(),
            version: "v1".into(),
            kind: kind.into(),
            namespace: namespace.map(str::to_string),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn configured_namespace_skips_namespace_discovery() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["ns-a", "ns-b"]))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]))
            .with_objects("pods", Some("payments"), Ok(objects(Some("payments"), &["api"])));

        let records = enumerate_resources(&cluster, Some("payments"), &noop).await;

        assert_eq!(cluster.namespace_calls.load(Ordering::SeqCst), 0);
        assert_eq!(records, vec![instance("", "Pod", Some("payments"), "api")]);
        assert_eq!(cluster.calls(), vec!["resources v1", "list pods payments", "groups"]);
    }

    #[tokio::test]
    async fn discovered_namespaces_are_scanned_in_order() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["ns-a", "ns-b"]))
            .with_resources("v1", Ok(vec![resource("configmaps", "ConfigMap", true, &["list"])]));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert!(records.is_empty());
        assert_eq!(
            cluster.calls(),
            vec![
                "resources v1",
                "list configmaps ns-a",
                "list configmaps ns-b",
                "groups"
            ]
        );
    }

    #[tokio::test]
    async fn empty_namespace_list_falls_back_to_default() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&[]))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert!(records.is_empty());
        assert_eq!(cluster.calls(), vec!["resources v1", "list pods default", "groups"]);
    }

    #[tokio::test]
    async fn namespace_failure_is_recorded_and_falls_back_to_default() {
        let cluster = FakeCluster::default()
            .with_namespaces(Err(403))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]))
            .with_objects("pods", Some("default"), Ok(objects(Some("default"), &["nginx"])));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(records.len(), 2);
        match &records[0] {
            K8sResourceInfo::Failure {
                group,
                version,
                kind,
                namespace,
                message,
            } => {
                assert_eq!((group, version, kind, namespace), (&None, &None, &None, &None));
                assert!(message.starts_with("Failed to list namespaces"));
            }
            other => panic!("expected namespace failure, got {other:?}"),
        }
        assert_eq!(records[1], instance("", "Pod", Some("default"), "nginx"));
        assert_eq!(cluster.calls(), vec!["resources v1", "list pods default", "groups"]);
    }

    #[tokio::test]
    async fn one_namespace_failure_does_not_hide_another() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["default", "kube-system"]))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["get", "list"])]))
            .with_objects("pods", Some("default"), Ok(objects(Some("default"), &["nginx"])))
            .with_objects("pods", Some("kube-system"), Err(403));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], instance("", "Pod", Some("default"), "nginx"));
        assert!(records[1].is_failure());
        assert_eq!(records[1].group(), Some(""));
        assert_eq!(records[1].version(), Some("v1"));
        assert_eq!(records[1].kind(), Some("Pod"));
        assert_eq!(records[1].namespace(), Some("kube-system"));
        assert!(records[1].error().is_some_and(|message| message.contains("kube-system")));
    }

    #[tokio::test]
    async fn unlistable_kinds_produce_nothing() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["default"]))
            .with_resources(
                "v1",
                Ok(vec![
                    resource("pods/log", "Pod", true, &["get"]),
                    resource("bindings", "Binding", true, &["create"]),
                ]),
            );

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert!(records.is_empty());
        assert_eq!(cluster.calls(), vec!["resources v1", "groups"]);
    }

    #[tokio::test]
    async fn cluster_scoped_kinds_are_listed_once() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["a", "b", "c"]))
            .with_resources("v1", Ok(vec![resource("nodes", "Node", false, &["list"])]))
            .with_objects("nodes", None, Ok(objects(None, &["node-1", "node-2"])));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(
            records,
            vec![
                instance("", "Node", None, "node-1"),
                instance("", "Node", None, "node-2"),
            ]
        );
        assert_eq!(cluster.calls(), vec!["resources v1", "list nodes", "groups"]);
    }

    #[tokio::test]
    async fn cluster_scoped_failure_has_no_namespace() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["a"]))
            .with_resources("v1", Ok(vec![resource("nodes", "Node", false, &["list"])]))
            .with_objects("nodes", None, Err(403));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(records.len(), 1);
        assert!(records[0].is_failure());
        assert_eq!(records[0].kind(), Some("Node"));
        assert_eq!(records[0].namespace(), None);
    }

    #[tokio::test]
    async fn core_group_survives_group_list_failure() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["default"]))
            .with_groups(Err(500))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]))
            .with_objects("pods", Some("default"), Ok(objects(Some("default"), &["nginx"])));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], instance("", "Pod", Some("default"), "nginx"));
        assert_eq!(
            records[1].error().map(|message| message.starts_with("Failed to list API groups")),
            Some(true)
        );
        assert_eq!(records[1].group(), None);
    }

    #[tokio::test]
    async fn walks_groups_in_server_order() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["default"]))
            .with_groups(Ok(&[
                ("apps", Some("apps/v1")),
                ("legacy.example.com", None),
                ("rbac.authorization.k8s.io", Some("rbac.authorization.k8s.io/v1")),
            ]))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]))
            .with_resources(
                "apps/v1",
                Ok(vec![resource("deployments", "Deployment", true, &["list"])]),
            )
            .with_resources(
                "rbac.authorization.k8s.io/v1",
                Ok(vec![resource("clusterroles", "ClusterRole", false, &["list"])]),
            )
            .with_objects("pods", Some("default"), Ok(objects(Some("default"), &["nginx"])))
            .with_objects(
                "deployments",
                Some("default"),
                Ok(objects(Some("default"), &["web"])),
            )
            .with_objects("clusterroles", None, Ok(objects(None, &["admin"])));

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(
            records,
            vec![
                instance("", "Pod", Some("default"), "nginx"),
                instance("apps", "Deployment", Some("default"), "web"),
                instance("rbac.authorization.k8s.io", "ClusterRole", None, "admin"),
            ]
        );
        assert_eq!(
            cluster.calls(),
            vec![
                "resources v1",
                "list pods default",
                "groups",
                "resources apps/v1",
                "list deployments default",
                "resources rbac.authorization.k8s.io/v1",
                "list clusterroles",
            ]
        );
    }

    #[tokio::test]
    async fn group_version_discovery_failure_is_isolated() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["default"]))
            .with_groups(Ok(&[
                ("metrics.k8s.io", Some("metrics.k8s.io/v1beta1")),
                ("apps", Some("apps/v1")),
            ]))
            .with_resources("v1", Ok(Vec::new()))
            .with_resources("metrics.k8s.io/v1beta1", Err(503))
            .with_resources(
                "apps/v1",
                Ok(vec![resource("deployments", "Deployment", true, &["list"])]),
            )
            .with_objects(
                "deployments",
                Some("default"),
                Ok(objects(Some("default"), &["web"])),
            );

        let records = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(records.len(), 2);
        match &records[0] {
            K8sResourceInfo::Failure {
                group,
                version,
                kind,
                message,
                ..
            } => {
                assert_eq!(group.as_deref(), Some("metrics.k8s.io"));
                assert_eq!(version.as_deref(), Some("v1beta1"));
                assert_eq!(kind, &None);
                assert!(message.contains("metrics.k8s.io/v1beta1"));
            }
            other => panic!("expected discovery failure, got {other:?}"),
        }
        assert_eq!(records[1], instance("apps", "Deployment", Some("default"), "web"));
    }

    #[tokio::test]
    async fn item_namespace_is_authoritative() {
        let cluster = FakeCluster::default()
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]))
            .with_objects("pods", Some("team-a"), Ok(objects(Some("team-b"), &["odd"])))
            .with_objects("pods", Some("team-c"), Ok(objects(None, &["bare"])));

        let records = enumerate_resources(&cluster, Some("team-a"), &noop).await;
        assert_eq!(records, vec![instance("", "Pod", Some("team-b"), "odd")]);

        let records = enumerate_resources(&cluster, Some("team-c"), &noop).await;
        assert_eq!(records, vec![instance("", "Pod", Some("team-c"), "bare")]);
    }

    #[tokio::test]
    async fn unnamed_objects_are_kept_and_reported() {
        let cluster = FakeCluster::default()
            .with_resources("v1", Ok(vec![resource("nodes", "Node", false, &["list"])]))
            .with_objects("nodes", None, Ok(vec![ObjectMeta::default()]));

        let events = Mutex::new(Vec::new());
        let sink = |event: TraversalEvent| events.lock().unwrap().push(event);
        let records = enumerate_resources(&cluster, Some("default"), &sink).await;

        assert_eq!(records, vec![instance("", "Node", None, "")]);
        let events = events.into_inner().unwrap();
        assert!(events.iter().any(|event| {
            event.phase == Phase::Listing
                && event.detail.contains("Node object was returned without a name")
        }));
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let cluster = FakeCluster::default()
            .with_namespaces(Ok(&["default", "kube-system"]))
            .with_groups(Ok(&[("apps", Some("apps/v1"))]))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]))
            .with_resources(
                "apps/v1",
                Ok(vec![resource("deployments", "Deployment", true, &["list"])]),
            )
            .with_objects("pods", Some("default"), Ok(objects(Some("default"), &["a", "b"])))
            .with_objects(
                "deployments",
                Some("kube-system"),
                Ok(objects(Some("kube-system"), &["coredns"])),
            );

        let first = enumerate_resources(&cluster, None, &noop).await;
        let second = enumerate_resources(&cluster, None, &noop).await;

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn emits_progress_events() {
        let cluster = FakeCluster::default()
            .with_namespaces(Err(403))
            .with_resources("v1", Ok(vec![resource("pods", "Pod", true, &["list"])]));

        let events = Mutex::new(Vec::new());
        let sink = |event: TraversalEvent| events.lock().unwrap().push(event);
        enumerate_resources(&cluster, None, &sink).await;

        let events = events.into_inner().unwrap();
        assert_eq!(events.first().map(|event| event.phase), Some(Phase::Namespaces));
        assert!(events[0].failed);
        assert_eq!(events.last().map(|event| event.phase), Some(Phase::Done));
        assert!(events.iter().any(|event| event.phase == Phase::Listing));
    }
}
