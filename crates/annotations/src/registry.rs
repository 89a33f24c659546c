//! Subject capability and the type metadata registry.

use crate::metadata::TypeMetadata;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

/// An instance that can be validated.
///
/// The defaults describe a type with no readable members whose metadata, if
/// any, lives in the [global registry](global).
pub trait Subject: Any {
    /// Declared type name, without module path or generic arguments.
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Current value of the named member; `None` reads as null.
    fn member_value(&self, member: &str) -> Option<&dyn Any> {
        let _ = member;
        None
    }

    /// Metadata describing this type.
    fn type_metadata(&self) -> Option<Arc<TypeMetadata>> {
        lookup_global(self.type_id())
    }
}

/// Types that carry their own metadata, typically through
/// `#[derive(Annotated)]`.
pub trait Annotated: Subject {
    /// Metadata for the type.
    fn metadata() -> Arc<TypeMetadata>
    where
        Self: Sized;
}

/// Map from declared type to its metadata.
#[derive(Debug, Default, Clone)]
pub struct MetadataRegistry {
    entries: HashMap<TypeId, Arc<TypeMetadata>>,
}

impl MetadataRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for `T`, replacing any earlier registration.
    pub fn register<T: Any>(&mut self, metadata: TypeMetadata) -> Arc<TypeMetadata> {
        let metadata = Arc::new(metadata);
        debug!(
            type_name = metadata.type_name(),
            members = metadata.members().len(),
            "registered type metadata"
        );
        self.entries.insert(TypeId::of::<T>(), Arc::clone(&metadata));
        metadata
    }

    /// Register the metadata an [`Annotated`] type carries.
    pub fn register_annotated<T: Annotated>(&mut self) -> Arc<TypeMetadata> {
        let metadata = T::metadata();
        debug!(type_name = metadata.type_name(), "registered annotated type");
        self.entries.insert(TypeId::of::<T>(), Arc::clone(&metadata));
        metadata
    }

    /// Metadata registered for `type_id`.
    #[must_use]
    pub fn lookup(&self, type_id: TypeId) -> Option<Arc<TypeMetadata>> {
        self.entries.get(&type_id).cloned()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static GLOBAL: LazyLock<RwLock<MetadataRegistry>> =
    LazyLock::new(|| RwLock::new(MetadataRegistry::new()));

/// The process-wide registry.
pub fn global() -> &'static RwLock<MetadataRegistry> {
    &GLOBAL
}

/// Register metadata for `T` in the process-wide registry.
pub fn register_global<T: Any>(metadata: TypeMetadata) -> Arc<TypeMetadata> {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register::<T>(metadata)
}

fn lookup_global(type_id: TypeId) -> Option<Arc<TypeMetadata>> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup(type_id)
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
