//! Optional service lookup exposed to rules through the context.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A shared service instance.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Resolves a requested service type to an instance.
///
/// The validation core never calls this itself; it is carried for rules that
/// need collaborators.
pub trait ServiceProvider: Send + Sync {
    /// Instance registered for `service`, if any.
    fn get_service(&self, service: TypeId) -> Option<Service>;
}

impl<F> ServiceProvider for F
where
    F: Fn(TypeId) -> Option<Service> + Send + Sync,
{
    fn get_service(&self, service: TypeId) -> Option<Service> {
        self(service)
    }
}

/// A provider backed by a map of service instances.
#[derive(Default, Clone)]
pub struct ServiceMap {
    services: HashMap<TypeId, Service>,
}

impl ServiceMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under its own type.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, service: T) -> Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(service));
        self
    }

    /// Number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True when no service is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceProvider for ServiceMap {
    fn get_service(&self, service: TypeId) -> Option<Service> {
        self.services.get(&service).cloned()
    }
}

impl fmt::Debug for ServiceMap {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ServiceMap")
            .field("len", &self.services.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Clock(u64);

    #[test]
    fn map_resolves_registered_types() {
        let map = ServiceMap::new().with(Clock(7));
        assert_eq!(map.len(), 1);
        let service = map.get_service(TypeId::of::<Clock>());
        let clock = service.and_then(|service| service.downcast::<Clock>().ok());
        assert_eq!(clock.as_deref(), Some(&Clock(7)));
        assert!(map.get_service(TypeId::of::<String>()).is_none());
    }

    #[test]
    fn closures_are_providers() {
        let provider = |service: TypeId| -> Option<Service> {
            (service == TypeId::of::<Clock>()).then(|| Arc::new(Clock(1)) as Service)
        };
        assert!(provider.get_service(TypeId::of::<Clock>()).is_some());
        assert!(provider.get_service(TypeId::of::<u8>()).is_none());
    }
}
