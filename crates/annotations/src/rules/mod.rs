//! Built-in rule variants.

mod file_extensions;
mod required;

pub use file_extensions::{DEFAULT_EXTENSIONS, FileExtensionsRule, normalize_extensions};
pub use required::RequiredRule;

use std::any::Any;

/// Borrow `value` as a string slice when it holds a `String`, `&'static str`,
/// or `Box<str>`.
pub(crate) fn string_value(value: &dyn Any) -> Option<&str> {
    if let Some(text) = value.downcast_ref::<String>() {
        return Some(text);
    }
    if let Some(text) = value.downcast_ref::<&'static str>() {
        return Some(text);
    }
    value.downcast_ref::<Box<str>>().map(AsRef::as_ref)
}
