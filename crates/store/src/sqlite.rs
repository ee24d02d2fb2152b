// SQL-backed provider over a caller-owned connection.

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

use refdata_core::{
    PropertyValue, RefdataError, TableBinding, UpdateProvider, ValueProvider, ValueRecord,
};

/// Reads and writes enumeration rows in a SQLite database.
///
/// Wraps a borrowed connection and assumes exclusive use of it for the
/// duration of one call. One provider operation is one statement; there is
/// no transaction wrapping and no retry.
pub struct SqliteProvider<'a> {
    conn: &'a Connection,
    qualify_schema: bool,
}

impl<'a> SqliteProvider<'a> {
    /// Provider for a backend with schema support: statements target
    /// `"schema"."table"`.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            qualify_schema: true,
        }
    }

    /// Provider that ignores the binding's schema and targets the bare
    /// table name.
    pub fn without_schema(conn: &'a Connection) -> Self {
        Self {
            conn,
            qualify_schema: false,
        }
    }

    fn target(&self, binding: &TableBinding) -> String {
        if self.qualify_schema {
            format!("{}.{}", quote(binding.schema()), quote(binding.table()))
        } else {
            quote(binding.table())
        }
    }
}

impl ValueProvider for SqliteProvider<'_> {
    // No ORDER BY: rows surface in natural store order, which positional
    // verification is defined against.
    fn values(&self, binding: &TableBinding) -> Result<Vec<ValueRecord>, RefdataError> {
        let sql = select_sql(&self.target(binding), binding);
        let mut stmt = self.conn.prepare(&sql).map_err(store_err)?;

        let property_count = binding.properties().len();
        let rows = stmt
            .query_map([], |row| {
                let key: i64 = row.get(0)?;
                let name: String = row.get(1)?;
                let display_name: String = row.get(2)?;
                let mut properties = Vec::with_capacity(property_count);
                for i in 0..property_count {
                    properties.push(row.get::<_, SqlValue>(3 + i)?);
                }
                Ok((key, name, display_name, properties))
            })
            .map_err(store_err)?;

        let mut records = Vec::new();
        for row in rows {
            let (key, name, display_name, properties) = row.map_err(store_err)?;
            let mut record = ValueRecord::new(key, name).with_display_name(display_name);
            for ((property, _), value) in binding.properties().iter().zip(properties) {
                record = record.with_property(property.clone(), property_from_sql(value));
            }
            records.push(record);
        }
        Ok(records)
    }
}

impl UpdateProvider for SqliteProvider<'_> {
    fn insert_value(&self, binding: &TableBinding, record: &ValueRecord) -> Result<(), RefdataError> {
        check_properties(binding, record)?;
        let sql = insert_sql(&self.target(binding), binding);
        let mut values = vec![
            SqlValue::Integer(record.key),
            SqlValue::Text(record.name.clone()),
            SqlValue::Text(record.display_name.clone()),
        ];
        values.extend(property_params(binding, record));
        self.conn
            .execute(&sql, rusqlite::params_from_iter(values))
            .map_err(store_err)?;
        Ok(())
    }

    fn update_value(&self, binding: &TableBinding, record: &ValueRecord) -> Result<(), RefdataError> {
        check_properties(binding, record)?;
        let sql = update_sql(&self.target(binding), binding);
        let mut values = vec![
            SqlValue::Text(record.name.clone()),
            SqlValue::Text(record.display_name.clone()),
        ];
        values.extend(property_params(binding, record));
        values.push(SqlValue::Integer(record.key));
        self.conn
            .execute(&sql, rusqlite::params_from_iter(values))
            .map_err(store_err)?;
        Ok(())
    }

    fn clear(&self, binding: &TableBinding) -> Result<(), RefdataError> {
        let sql = format!("DELETE FROM {}", self.target(binding));
        self.conn.execute(&sql, []).map_err(store_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Statement text
// ---------------------------------------------------------------------------

fn quote(identifier: &str) -> String {
    // Embedded quotes are doubled, per SQL quoted-identifier rules.
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn select_sql(target: &str, binding: &TableBinding) -> String {
    let mut columns = vec![
        quote(binding.key_column()),
        quote(binding.name_column()),
        quote(binding.display_name_column()),
    ];
    columns.extend(binding.properties().iter().map(|(_, c)| quote(c)));
    format!("SELECT {} FROM {target}", columns.join(", "))
}

fn insert_sql(target: &str, binding: &TableBinding) -> String {
    let mut columns = vec![
        quote(binding.key_column()),
        quote(binding.name_column()),
        quote(binding.display_name_column()),
    ];
    columns.extend(binding.properties().iter().map(|(_, c)| quote(c)));
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {target} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn update_sql(target: &str, binding: &TableBinding) -> String {
    let mut assignments = vec![
        format!("{} = ?1", quote(binding.name_column())),
        format!("{} = ?2", quote(binding.display_name_column())),
    ];
    for (i, (_, column)) in binding.properties().iter().enumerate() {
        assignments.push(format!("{} = ?{}", quote(column), i + 3));
    }
    format!(
        "UPDATE {target} SET {} WHERE {} = ?{}",
        assignments.join(", "),
        quote(binding.key_column()),
        assignments.len() + 1
    )
}

// ---------------------------------------------------------------------------
// Value mapping
// ---------------------------------------------------------------------------

fn store_err(e: rusqlite::Error) -> RefdataError {
    RefdataError::Store(e.to_string())
}

fn check_properties(binding: &TableBinding, record: &ValueRecord) -> Result<(), RefdataError> {
    for property in record.properties.keys() {
        if binding.column_for(property).is_none() {
            return Err(RefdataError::UnboundProperty {
                property: property.clone(),
                table: binding.qualified_table(),
            });
        }
    }
    Ok(())
}

/// Bound property values in binding order. A bound column the record does
/// not carry becomes SQL NULL.
fn property_params(binding: &TableBinding, record: &ValueRecord) -> Vec<SqlValue> {
    binding
        .properties()
        .iter()
        .map(|(property, _)| record.properties.get(property).map_or(SqlValue::Null, property_to_sql))
        .collect()
}

fn property_to_sql(value: &PropertyValue) -> SqlValue {
    match value {
        PropertyValue::Int(v) => SqlValue::Integer(*v),
        PropertyValue::Real(v) => SqlValue::Real(*v),
        PropertyValue::Text(v) => SqlValue::Text(v.clone()),
        PropertyValue::Bool(v) => SqlValue::Integer(*v as i64),
        PropertyValue::Null => SqlValue::Null,
    }
}

fn property_from_sql(value: SqlValue) -> PropertyValue {
    match value {
        SqlValue::Integer(v) => PropertyValue::Int(v),
        SqlValue::Real(v) => PropertyValue::Real(v),
        SqlValue::Text(v) => PropertyValue::Text(v),
        // Blobs are not modeled.
        SqlValue::Null | SqlValue::Blob(_) => PropertyValue::Null,
    }
}
