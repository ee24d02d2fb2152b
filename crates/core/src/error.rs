use std::fmt;

#[derive(Debug)]
pub enum RefdataError {
    /// Type was never registered.
    NotRegistered(String),
    /// Type registered more than once.
    AlreadyRegistered(String),
    /// Two catalog records share a key.
    DuplicateKey { type_name: String, key: i64 },
    /// Declared default key has no catalog record.
    UnknownDefaultKey { type_name: String, key: i64 },
    /// A property bound to more than one column.
    DuplicatePropertyBinding { property: String },
    /// Record carries a property the binding has no column for.
    UnboundProperty { property: String, table: String },
    /// Malformed store file.
    Format { file: String, line: usize, message: String },
    /// Store holds keys the catalog does not know. Nothing was mutated.
    ExtraValues { type_name: String, orphans: Vec<(i64, String)> },
    /// Backend failure (SQL, filesystem).
    Store(String),
}

impl fmt::Display for RefdataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRegistered(type_name) => {
                write!(f, "type '{type_name}' is not registered")
            }
            Self::AlreadyRegistered(type_name) => {
                write!(f, "type '{type_name}' is already registered")
            }
            Self::DuplicateKey { type_name, key } => {
                write!(f, "{type_name} has duplicate key {key}")
            }
            Self::UnknownDefaultKey { type_name, key } => {
                write!(f, "{type_name} declares default key {key} but has no such record")
            }
            Self::DuplicatePropertyBinding { property } => {
                write!(f, "property '{property}' can only be bound to a single column")
            }
            Self::UnboundProperty { property, table } => {
                write!(f, "property '{property}' has no column binding on {table}")
            }
            Self::Format { file, line, message } => {
                write!(f, "{file}:{line}: {message}")
            }
            Self::ExtraValues { type_name, orphans } => {
                write!(f, "extra values exist in the store for {type_name}:")?;
                for (key, name) in orphans {
                    write!(f, " {name}({key})")?;
                }
                Ok(())
            }
            Self::Store(msg) => write!(f, "store error: {msg}"),
        }
    }
}

impl std::error::Error for RefdataError {}
