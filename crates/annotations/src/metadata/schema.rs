//! Passive schema-mapping metadata.
//!
//! None of these records take part in validation. They are carried so an
//! external object/relational mapper can read them off the same registry.

use crate::error::{ArgumentError, non_blank};
use serde::{Deserialize, Serialize};

/// Database table a type maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAttribute {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
}

impl TableAttribute {
    /// Table with the given name.
    pub fn new<'a>(name: impl Into<Option<&'a str>>) -> Result<Self, ArgumentError> {
        Ok(Self {
            name: non_blank(name.into(), "name")?,
            schema: None,
        })
    }

    /// Set the schema the table lives in.
    pub fn with_schema<'a>(
        mut self,
        schema: impl Into<Option<&'a str>>,
    ) -> Result<Self, ArgumentError> {
        self.schema = Some(non_blank(schema.into(), "schema")?);
        Ok(self)
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table schema, if set.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

/// Database column a member maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
}

impl Default for ColumnAttribute {
    fn default() -> Self {
        Self {
            name: None,
            order: -1,
            type_name: None,
        }
    }
}

impl ColumnAttribute {
    /// Column with an explicit name.
    pub fn named<'a>(name: impl Into<Option<&'a str>>) -> Result<Self, ArgumentError> {
        Ok(Self {
            name: Some(non_blank(name.into(), "name")?),
            ..Self::default()
        })
    }

    /// Set the zero-based column order.
    pub fn with_order(mut self, order: i32) -> Result<Self, ArgumentError> {
        if order < 0 {
            return Err(ArgumentError::OutOfRange {
                param: "order",
                value: order.to_string(),
            });
        }
        self.order = order;
        Ok(self)
    }

    /// Set the provider-specific column type.
    pub fn with_type_name<'a>(
        mut self,
        type_name: impl Into<Option<&'a str>>,
    ) -> Result<Self, ArgumentError> {
        self.type_name = Some(non_blank(type_name.into(), "type_name")?);
        Ok(self)
    }

    /// Column name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Zero-based order; `-1` when unset.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Column type, if set.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

/// Marks a member as a foreign key, or a navigation member with its key(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyAttribute {
    name: String,
}

impl ForeignKeyAttribute {
    /// Associated navigation member, or comma-separated key member names.
    pub fn new<'a>(name: impl Into<Option<&'a str>>) -> Result<Self, ArgumentError> {
        Ok(Self {
            name: non_blank(name.into(), "name")?,
        })
    }

    /// The associated member name(s).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How the database generates a member's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatabaseGeneratedOption {
    /// The database does not generate values.
    #[default]
    None,
    /// Generated when a row is inserted.
    Identity,
    /// Generated when a row is inserted or updated.
    Computed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_requires_a_name() -> Result<(), ArgumentError> {
        assert_eq!(
            TableAttribute::new(" "),
            Err(ArgumentError::NullOrWhitespace { param: "name" })
        );
        assert_eq!(
            TableAttribute::new(None::<&str>),
            Err(ArgumentError::NullOrWhitespace { param: "name" })
        );

        let table = TableAttribute::new("orders")?.with_schema("sales")?;
        assert_eq!(table.name(), "orders");
        assert_eq!(table.schema(), Some("sales"));

        let rejected = TableAttribute::new("orders")?.with_schema("");
        assert_eq!(
            rejected,
            Err(ArgumentError::NullOrWhitespace { param: "schema" })
        );
        Ok(())
    }

    #[test]
    fn column_order_must_not_be_negative() -> Result<(), ArgumentError> {
        let column = ColumnAttribute::default();
        assert_eq!(column.order(), -1);
        assert_eq!(column.name(), None);

        assert_eq!(
            ColumnAttribute::named("total")?.with_order(-1),
            Err(ArgumentError::OutOfRange {
                param: "order",
                value: "-1".to_string(),
            })
        );

        let column = ColumnAttribute::named("total")?
            .with_order(2)?
            .with_type_name("decimal(18,2)")?;
        assert_eq!(column.order(), 2);
        assert_eq!(column.type_name(), Some("decimal(18,2)"));
        Ok(())
    }

    #[test]
    fn foreign_key_requires_a_name() {
        assert!(ForeignKeyAttribute::new("\t").is_err());
        assert!(matches!(
            ForeignKeyAttribute::new("CustomerId"),
            Ok(key) if key.name() == "CustomerId"
        ));
    }
}
