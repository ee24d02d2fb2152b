use serde::Serialize;

use crate::error::RefdataError;
use crate::pluralize::{EnglishPluralizer, Pluralizer};

/// Maps an enumeration type to a physical table and its columns.
///
/// Defaults follow the store conventions: the key column is the
/// singularized table name plus `Key` ("Statuses" binds to "StatusKey"),
/// the name column is "Name" and the display name column is "Description".
/// Immutable once registered.
#[derive(Debug, Clone, Serialize)]
pub struct TableBinding {
    schema: String,
    table: String,
    key_column: String,
    name_column: String,
    display_name_column: String,
    // (logical property, physical column), in declaration order.
    properties: Vec<(String, String)>,
}

impl TableBinding {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        let schema = schema.into();
        let table = table.into();
        let pluralizer = EnglishPluralizer;
        let singular = if pluralizer.is_plural(&table) {
            pluralizer.singularize(&table)
        } else {
            table.clone()
        };
        Self {
            key_column: format!("{singular}Key"),
            name_column: "Name".into(),
            display_name_column: "Description".into(),
            properties: Vec::new(),
            schema,
            table,
        }
    }

    pub fn with_key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }

    pub fn with_name_column(mut self, column: impl Into<String>) -> Self {
        self.name_column = column.into();
        self
    }

    pub fn with_display_name_column(mut self, column: impl Into<String>) -> Self {
        self.display_name_column = column.into();
        self
    }

    /// Bind an extra property to a column. At most one column per property;
    /// the duplicate check runs when the binding is registered.
    pub fn with_property(mut self, property: impl Into<String>, column: impl Into<String>) -> Self {
        self.properties.push((property.into(), column.into()));
        self
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    pub fn display_name_column(&self) -> &str {
        &self.display_name_column
    }

    /// Property bindings in declaration order.
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    pub fn column_for(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, c)| c.as_str())
    }

    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    pub fn csv_file_name(&self) -> String {
        format!("{}.{}.csv", self.schema, self.table)
    }

    pub(crate) fn validate(&self) -> Result<(), RefdataError> {
        for (i, (property, _)) in self.properties.iter().enumerate() {
            if self.properties[..i].iter().any(|(p, _)| p == property) {
                return Err(RefdataError::DuplicatePropertyBinding {
                    property: property.clone(),
                });
            }
        }
        Ok(())
    }
}
