//! Ambient state threaded through a validation pass.

use crate::error::ArgumentError;
use crate::metadata::TypeMetadata;
use crate::registry::Subject;
use crate::services::ServiceProvider;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Key/value bag carried alongside a validation pass.
pub type ValidationItems = BTreeMap<String, Value>;

/// Describes the subject and member under validation.
///
/// A context is created per validation pass. The subject is fixed for its
/// lifetime while the member name may be reassigned to validate several
/// members in sequence. The display name is resolved lazily and cached; the
/// cache is dropped only when the member name is written.
///
/// Contexts are not meant to be shared across threads; each pass gets its own.
pub struct ValidationContext<'a> {
    instance: &'a dyn Subject,
    metadata: Option<Arc<TypeMetadata>>,
    member_name: Option<String>,
    display_name: OnceCell<String>,
    items: ValidationItems,
    services: Option<Arc<dyn ServiceProvider>>,
}

impl<'a> ValidationContext<'a> {
    /// Context for `instance` with an empty item bag and no services.
    pub fn new(instance: impl Into<Option<&'a dyn Subject>>) -> Result<Self, ArgumentError> {
        Self::with_services(instance, None, None)
    }

    /// Context for `instance` with a copy of `items`.
    pub fn with_items(
        instance: impl Into<Option<&'a dyn Subject>>,
        items: Option<&ValidationItems>,
    ) -> Result<Self, ArgumentError> {
        Self::with_services(instance, None, items)
    }

    /// Context for `instance` with a service provider and a copy of `items`.
    pub fn with_services(
        instance: impl Into<Option<&'a dyn Subject>>,
        services: Option<Arc<dyn ServiceProvider>>,
        items: Option<&ValidationItems>,
    ) -> Result<Self, ArgumentError> {
        let Some(instance) = instance.into() else {
            return Err(ArgumentError::Null { param: "instance" });
        };
        Ok(Self {
            instance,
            metadata: instance.type_metadata(),
            member_name: None,
            display_name: OnceCell::new(),
            items: items.cloned().unwrap_or_default(),
            services,
        })
    }

    /// The subject instance.
    #[must_use]
    pub fn object_instance(&self) -> &'a dyn Subject {
        self.instance
    }

    /// Declared type name of the subject.
    #[must_use]
    pub fn object_type_name(&self) -> &str {
        match self.metadata.as_deref() {
            Some(metadata) => metadata.type_name(),
            None => self.instance.type_name(),
        }
    }

    /// Metadata of the subject's type, if any.
    #[must_use]
    pub const fn type_metadata(&self) -> Option<&Arc<TypeMetadata>> {
        self.metadata.as_ref()
    }

    /// Member currently under validation.
    #[must_use]
    pub fn member_name(&self) -> Option<&str> {
        self.member_name.as_deref()
    }

    /// Set the member under validation. Any name is accepted, including names
    /// the subject does not have. Clears the cached display name.
    pub fn set_member_name(&mut self, member_name: Option<impl Into<String>>) {
        self.member_name = member_name.map(Into::into);
        self.display_name = OnceCell::new();
    }

    /// Human-facing name of the member, or of the subject type when no member
    /// is set.
    ///
    /// Resolution order: an explicitly set name, the member's display label
    /// when present and not blank, the member name, the subject type name.
    /// An empty member name counts as unset.
    pub fn display_name(&self) -> &str {
        self.display_name.get_or_init(|| self.resolve_display_name())
    }

    /// Override the display name. Rejects `None` and the empty string and
    /// leaves the context untouched on failure.
    pub fn set_display_name<'s>(
        &mut self,
        display_name: impl Into<Option<&'s str>>,
    ) -> Result<(), ArgumentError> {
        match display_name.into() {
            None => Err(ArgumentError::Null { param: "value" }),
            Some("") => Err(ArgumentError::Empty { param: "value" }),
            Some(display_name) => {
                self.display_name = OnceCell::from(display_name.to_owned());
                Ok(())
            },
        }
    }

    fn resolve_display_name(&self) -> String {
        let member_name = self.member_name.as_deref().filter(|name| !name.is_empty());
        let Some(member_name) = member_name else {
            return self.object_type_name().to_owned();
        };
        self.metadata
            .as_deref()
            .and_then(|metadata| metadata.member(member_name))
            .and_then(|member| member.display_label())
            .unwrap_or(member_name)
            .to_owned()
    }

    /// The context's own item bag.
    #[must_use]
    pub const fn items(&self) -> &ValidationItems {
        &self.items
    }

    /// Mutable access to the context's own item bag.
    pub fn items_mut(&mut self) -> &mut ValidationItems {
        &mut self.items
    }

    /// The service provider, if one was supplied.
    #[must_use]
    pub fn service_provider(&self) -> Option<&Arc<dyn ServiceProvider>> {
        self.services.as_ref()
    }

    /// Resolve a service of type `T` through the provider.
    #[must_use]
    pub fn get_service<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .as_ref()?
            .get_service(TypeId::of::<T>())?
            .downcast::<T>()
            .ok()
    }
}

impl fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ValidationContext")
            .field("object_type", &self.object_type_name())
            .field("member_name", &self.member_name)
            .field("display_name", &self.display_name.get())
            .field("items", &self.items)
            .field("has_services", &self.services.is_some())
            .finish()
    }
}
