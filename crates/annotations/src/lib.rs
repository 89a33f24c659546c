//! # data-annotations
//!
//! Declarative validation metadata for record types.
//!
//! Members of a type carry [`ValidationRule`]s plus passive display and
//! schema-mapping records. A [`ValidationContext`] describes the subject and
//! the member under validation and resolves the member's display name; each
//! rule evaluation yields a [`ValidationOutcome`], where `None` is success and
//! `Some` is a [`ValidationResult`] naming the affected members.
//!
//! Metadata is attached either by building a [`TypeMetadata`] and registering
//! it with [`register_global`], or by `#[derive(Annotated)]`.
//!
//! ```
//! use data_annotations::{Annotated, Subject, ValidationContext, Validator};
//!
//! #[derive(Annotated)]
//! struct Upload {
//!     #[annotate(display = "Profile photo", required, file_extensions)]
//!     photo: Option<String>,
//! }
//!
//! let upload = Upload { photo: Some("me.bmp".to_string()) };
//! let mut context = ValidationContext::new(&upload as &dyn Subject)?;
//! let failures = Validator::default().validate_object(&mut context);
//! assert_eq!(
//!     failures[0].error_message(),
//!     Some("The Profile photo field only accepts files with the following extensions: .png, .jpg, .jpeg, .gif")
//! );
//! # Ok::<(), data_annotations::ArgumentError>(())
//! ```
//!
//! ## Design Principles
//!
//! 1. **Validation failures are values** - rules return outcomes, never errors
//! 2. **Contract violations fail fast** - constructors return [`ArgumentError`]
//! 3. **Rules are shared** - rules are immutable once built and `Send + Sync`

extern crate self as data_annotations;

pub mod context;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod result;
pub mod rule;
pub mod rules;
pub mod services;
pub mod validator;

pub use context::{ValidationContext, ValidationItems};
pub use data_annotations_config::ValidatorSettings;
pub use data_annotations_derive::Annotated;
pub use error::ArgumentError;
pub use metadata::display::{DisplayAttribute, DisplayFormat};
pub use metadata::schema::{
    ColumnAttribute, DatabaseGeneratedOption, ForeignKeyAttribute, TableAttribute,
};
pub use metadata::{MemberMetadata, TypeMetadata, TypeMetadataBuilder};
pub use registry::{Annotated, MetadataRegistry, Subject, global, register_global};
pub use result::{ValidationOutcome, ValidationResult};
pub use rule::{RuleBuilder, RuleOptions, ValidationRule, format_template};
pub use rules::{FileExtensionsRule, RequiredRule};
pub use services::{Service, ServiceMap, ServiceProvider};
pub use validator::{Validator, group_by_error_key};

/// Returns the annotations crate version.
#[must_use]
pub const fn annotations_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Support code for `#[derive(Annotated)]`. Not public API.
#[doc(hidden)]
pub mod __private {
    use crate::metadata::{MemberMetadata, TypeMetadataBuilder};
    use crate::metadata::schema::{ColumnAttribute, ForeignKeyAttribute, TableAttribute};
    use std::any::Any;

    pub fn member<T: Any>(value: &T) -> Option<&dyn Any> {
        Some(value)
    }

    pub fn optional_member<T: Any>(value: &Option<T>) -> Option<&dyn Any> {
        value.as_ref().map(|value| value as &dyn Any)
    }

    // Names are checked for blankness at expansion time.
    pub fn table(
        builder: TypeMetadataBuilder,
        name: &str,
        schema: Option<&str>,
    ) -> TypeMetadataBuilder {
        let table = TableAttribute::new(name).and_then(|table| match schema {
            Some(schema) => table.with_schema(schema),
            None => Ok(table),
        });
        match table {
            Ok(table) => builder.table(table),
            Err(_) => builder,
        }
    }

    pub fn column(member: MemberMetadata, name: &str) -> MemberMetadata {
        match ColumnAttribute::named(name) {
            Ok(column) => member.column(column),
            Err(_) => member,
        }
    }

    pub fn foreign_key(member: MemberMetadata, name: &str) -> MemberMetadata {
        match ForeignKeyAttribute::new(name) {
            Ok(foreign_key) => member.foreign_key(foreign_key),
            Err(_) => member,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
