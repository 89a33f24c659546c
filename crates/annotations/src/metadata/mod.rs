//! Per-type and per-member metadata records.
//!
//! A [`TypeMetadata`] is the explicit stand-in for attributes attached to a
//! declaration: it names the type, optionally maps it to a table, and lists its
//! members in declaration order with the rules and passive records bound to
//! each.

pub mod display;
pub mod schema;

use crate::rule::ValidationRule;
use display::{DisplayAttribute, DisplayFormat};
use schema::{ColumnAttribute, DatabaseGeneratedOption, ForeignKeyAttribute, TableAttribute};
use std::fmt;
use std::sync::Arc;

/// Metadata attached to one member of a type.
#[derive(Clone, Default)]
pub struct MemberMetadata {
    name: String,
    display: Option<DisplayAttribute>,
    display_format: Option<DisplayFormat>,
    concurrency_check: bool,
    column: Option<ColumnAttribute>,
    foreign_key: Option<ForeignKeyAttribute>,
    not_mapped: bool,
    database_generated: Option<DatabaseGeneratedOption>,
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl MemberMetadata {
    /// Empty metadata for the named member.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a display label.
    #[must_use]
    pub fn display(mut self, display: DisplayAttribute) -> Self {
        self.display = Some(display);
        self
    }

    /// Attach formatting options.
    #[must_use]
    pub fn display_format(mut self, format: DisplayFormat) -> Self {
        self.display_format = Some(format);
        self
    }

    /// Mark the member as taking part in optimistic concurrency checks.
    #[must_use]
    pub const fn concurrency_check(mut self) -> Self {
        self.concurrency_check = true;
        self
    }

    /// Map the member to a column.
    #[must_use]
    pub fn column(mut self, column: ColumnAttribute) -> Self {
        self.column = Some(column);
        self
    }

    /// Mark the member as a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, foreign_key: ForeignKeyAttribute) -> Self {
        self.foreign_key = Some(foreign_key);
        self
    }

    /// Exclude the member from database mapping.
    #[must_use]
    pub const fn not_mapped(mut self) -> Self {
        self.not_mapped = true;
        self
    }

    /// Set how the database generates the member's value.
    #[must_use]
    pub const fn database_generated(mut self, option: DatabaseGeneratedOption) -> Self {
        self.database_generated = Some(option);
        self
    }

    /// Append a validation rule.
    #[must_use]
    pub fn rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Append an already shared validation rule.
    #[must_use]
    pub fn shared_rule(mut self, rule: Arc<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label, if attached.
    #[must_use]
    pub const fn display_attribute(&self) -> Option<&DisplayAttribute> {
        self.display.as_ref()
    }

    /// The display label when it is present and not blank.
    #[must_use]
    pub fn display_label(&self) -> Option<&str> {
        self.display
            .as_ref()
            .and_then(DisplayAttribute::name)
            .filter(|label| !label.trim().is_empty())
    }

    /// Formatting options, if attached.
    #[must_use]
    pub const fn display_format_options(&self) -> Option<&DisplayFormat> {
        self.display_format.as_ref()
    }

    /// True when the member takes part in concurrency checks.
    #[must_use]
    pub const fn is_concurrency_token(&self) -> bool {
        self.concurrency_check
    }

    /// Column mapping, if attached.
    #[must_use]
    pub const fn column_mapping(&self) -> Option<&ColumnAttribute> {
        self.column.as_ref()
    }

    /// Foreign key marker, if attached.
    #[must_use]
    pub const fn foreign_key_mapping(&self) -> Option<&ForeignKeyAttribute> {
        self.foreign_key.as_ref()
    }

    /// True when the member is excluded from database mapping.
    #[must_use]
    pub const fn is_not_mapped(&self) -> bool {
        self.not_mapped
    }

    /// Database generation option, if attached.
    #[must_use]
    pub const fn database_generated_option(&self) -> Option<DatabaseGeneratedOption> {
        self.database_generated
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.rules
    }
}

impl fmt::Debug for MemberMetadata {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&'static str> = self.rules.iter().map(|rule| rule.name()).collect();
        formatter
            .debug_struct("MemberMetadata")
            .field("name", &self.name)
            .field("display", &self.display)
            .field("concurrency_check", &self.concurrency_check)
            .field("column", &self.column)
            .field("not_mapped", &self.not_mapped)
            .field("rules", &rules)
            .finish_non_exhaustive()
    }
}

/// Metadata attached to a type.
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    type_name: String,
    table: Option<TableAttribute>,
    not_mapped: bool,
    members: Vec<MemberMetadata>,
}

impl TypeMetadata {
    /// Start building metadata for the named type.
    pub fn builder(type_name: impl Into<String>) -> TypeMetadataBuilder {
        TypeMetadataBuilder {
            metadata: Self {
                type_name: type_name.into(),
                table: None,
                not_mapped: false,
                members: Vec::new(),
            },
        }
    }

    /// Declared type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Table mapping, if attached.
    #[must_use]
    pub const fn table(&self) -> Option<&TableAttribute> {
        self.table.as_ref()
    }

    /// True when the type is excluded from database mapping.
    #[must_use]
    pub const fn is_not_mapped(&self) -> bool {
        self.not_mapped
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[MemberMetadata] {
        &self.members
    }

    /// Look up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberMetadata> {
        self.members.iter().find(|member| member.name == name)
    }
}

/// Builder for [`TypeMetadata`].
#[derive(Debug, Clone)]
pub struct TypeMetadataBuilder {
    metadata: TypeMetadata,
}

impl TypeMetadataBuilder {
    /// Map the type to a table.
    #[must_use]
    pub fn table(mut self, table: TableAttribute) -> Self {
        self.metadata.table = Some(table);
        self
    }

    /// Exclude the type from database mapping.
    #[must_use]
    pub const fn not_mapped(mut self) -> Self {
        self.metadata.not_mapped = true;
        self
    }

    /// Append a member. A later member with the same name replaces the earlier one.
    #[must_use]
    pub fn member(mut self, member: MemberMetadata) -> Self {
        match self
            .metadata
            .members
            .iter_mut()
            .find(|existing| existing.name == member.name)
        {
            Some(existing) => *existing = member,
            None => self.metadata.members.push(member),
        }
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> TypeMetadata {
        self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FileExtensionsRule, RequiredRule};

    #[test]
    fn members_keep_declaration_order() {
        let metadata = TypeMetadata::builder("Order")
            .member(MemberMetadata::new("b"))
            .member(MemberMetadata::new("a").rule(RequiredRule::new()))
            .member(MemberMetadata::new("b").concurrency_check())
            .build();

        let names: Vec<&str> = metadata.members().iter().map(MemberMetadata::name).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(metadata.member("b").is_some_and(MemberMetadata::is_concurrency_token));
        assert_eq!(metadata.member("a").map(|member| member.rules().len()), Some(1));
        assert!(metadata.member("missing").is_none());
    }

    #[test]
    fn blank_display_labels_are_ignored() {
        let blank = MemberMetadata::new("Name").display(DisplayAttribute::new("  "));
        assert_eq!(blank.display_label(), None);
        assert!(blank.display_attribute().is_some());

        let labelled = MemberMetadata::new("Name").display(DisplayAttribute::new("Full name"));
        assert_eq!(labelled.display_label(), Some("Full name"));
    }

    #[test]
    fn debug_lists_rule_names() {
        let member = MemberMetadata::new("Photo").rule(FileExtensionsRule::new());
        assert!(format!("{member:?}").contains("file_extensions"));
    }
}
