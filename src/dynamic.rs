use std::borrow::Cow;

use kube::{
    Resource,
    api::{ObjectMeta, TypeMeta},
    core::DynamicResourceScope,
};

use crate::discover::ResourceTypeDescriptor;

/// Note about own `DynamicObject` instead of `kube::api::DynamicObject`.
/// The stock `kube::api::DynamicObject` is keyed by `kube::api::ApiResource`,
/// which has to be rebuilt from every discovered kind before an `Api` can be created.
///
/// This one is keyed by [`ResourceTypeDescriptor`] directly, so a descriptor produced
/// during discovery can be handed to `Api::namespaced_with` / `Api::all_with` as is.
/// Scope is checked by the caller via [`ResourceTypeDescriptor::namespaced`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct DynamicObject {
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,
    /// Object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// All other keys
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl Resource for DynamicObject {
    type DynamicType = ResourceTypeDescriptor;
    type Scope = DynamicResourceScope;

    fn group(dt: &ResourceTypeDescriptor) -> Cow<'_, str> {
        dt.group.as_str().into()
    }

    fn version(dt: &ResourceTypeDescriptor) -> Cow<'_, str> {
        dt.version.as_str().into()
    }

    fn kind(dt: &ResourceTypeDescriptor) -> Cow<'_, str> {
        dt.kind.as_str().into()
    }

    fn api_version(dt: &ResourceTypeDescriptor) -> Cow<'_, str> {
        // NOTE: The core group has no prefix in the apiVersion.
        dt.group_version().to_string().into()
    }

    fn plural(dt: &ResourceTypeDescriptor) -> Cow<'_, str> {
        dt.plural.as_str().into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
