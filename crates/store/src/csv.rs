// Pipe-delimited flat-file provider.

use std::path::PathBuf;

use refdata_core::{RefdataError, TableBinding, ValueProvider, ValueRecord};

/// Read-only provider over pipe-delimited files, one file per binding at
/// `<root>/<Schema>.<Table>.csv`.
///
/// There is no quoting: a pipe is always a delimiter. Line 1 is the header
/// and must carry the three bound columns in order, then exactly the bound
/// property columns in any order. Property values are carried as text.
/// Blank lines are not data; the first one fails at its own line number.
pub struct CsvProvider {
    root: PathBuf,
}

impl CsvProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_path(&self, binding: &TableBinding) -> PathBuf {
        self.root.join(binding.csv_file_name())
    }
}

impl Default for CsvProvider {
    /// Reads from `csv/` under the working directory.
    fn default() -> Self {
        Self::new("csv")
    }
}

impl ValueProvider for CsvProvider {
    fn values(&self, binding: &TableBinding) -> Result<Vec<ValueRecord>, RefdataError> {
        let path = self.file_path(binding);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| RefdataError::Store(format!("{}: {e}", path.display())))?;
        parse_records(&path.display().to_string(), &content, binding)
    }
}

fn parse_records(file: &str, content: &str, binding: &TableBinding) -> Result<Vec<ValueRecord>, RefdataError> {
    // The reader skips empty lines and its positions do not count them, so
    // the first blank line is located before tokenization. Everything ahead
    // of it parses normally (an earlier line's error wins), then the blank
    // line itself fails at its own number.
    if let Some((offset, line)) = first_blank_line(content) {
        parse_delimited(file, &content[..offset], binding)?;
        if line == 1 {
            return Err(format_err(file, line, "header has 1 column(s), expected at least 3".into()));
        }
        let width = 3 + binding.properties().len();
        return Err(format_err(file, line, format!("expected {width} field(s), found 1")));
    }
    parse_delimited(file, content, binding)
}

/// Byte offset and 1-based number of the first empty line. Lines of only
/// whitespace are not empty; those reach the reader as one-field rows.
fn first_blank_line(content: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for (number, chunk) in content.split_inclusive('\n').enumerate() {
        let text = chunk.strip_suffix('\n').unwrap_or(chunk);
        let text = text.strip_suffix('\r').unwrap_or(text);
        if text.is_empty() {
            return Some((offset, number + 1));
        }
        offset += chunk.len();
    }
    None
}

fn parse_delimited(file: &str, content: &str, binding: &TableBinding) -> Result<Vec<ValueRecord>, RefdataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = reader.records();

    // An empty file is an empty record set, not an error.
    let header = match rows.next() {
        None => return Ok(Vec::new()),
        Some(row) => row.map_err(|e| RefdataError::Store(e.to_string()))?,
    };
    let properties = validate_header(file, &header, binding)?;
    let width = 3 + properties.len();

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|e| RefdataError::Store(e.to_string()))?;
        let line = row_line(&row);
        if row.len() != width {
            return Err(format_err(
                file,
                line,
                format!("expected {width} field(s), found {}", row.len()),
            ));
        }

        let key_token = row.get(0).unwrap_or("");
        let key: i64 = key_token
            .trim()
            .parse()
            .map_err(|_| format_err(file, line, format!("cannot parse key '{key_token}'")))?;

        let mut record = ValueRecord::new(key, row.get(1).unwrap_or(""))
            .with_display_name(row.get(2).unwrap_or(""));
        for (i, property) in properties.iter().enumerate() {
            record = record.with_property(property.clone(), row.get(3 + i).unwrap_or(""));
        }
        records.push(record);
    }
    Ok(records)
}

/// Checks the header shape and returns the logical property name for each
/// extra column, in header order.
fn validate_header(
    file: &str,
    header: &csv::StringRecord,
    binding: &TableBinding,
) -> Result<Vec<String>, RefdataError> {
    let line = row_line(header);
    let fixed = [
        binding.key_column(),
        binding.name_column(),
        binding.display_name_column(),
    ];
    if header.len() < fixed.len() {
        return Err(format_err(
            file,
            line,
            format!("header has {} column(s), expected at least {}", header.len(), fixed.len()),
        ));
    }
    for (i, expected) in fixed.iter().enumerate() {
        let found = header.get(i).unwrap_or("");
        if found != *expected {
            return Err(format_err(
                file,
                line,
                format!("header column {} is '{found}', expected '{expected}'", i + 1),
            ));
        }
    }

    let bound = binding.properties();
    let extras: Vec<&str> = header.iter().skip(fixed.len()).collect();
    if extras.len() != bound.len() {
        return Err(format_err(
            file,
            line,
            format!("header has {} extra column(s), expected {}", extras.len(), bound.len()),
        ));
    }
    let mut properties = Vec::with_capacity(extras.len());
    for (i, column) in extras.iter().enumerate() {
        if extras[..i].contains(column) {
            return Err(format_err(file, line, format!("duplicate header column '{column}'")));
        }
        match bound.iter().find(|(_, c)| c.as_str() == *column) {
            Some((property, _)) => properties.push(property.clone()),
            None => {
                return Err(format_err(
                    file,
                    line,
                    format!("header column '{column}' is not bound to any property"),
                ))
            }
        }
    }
    Ok(properties)
}

fn row_line(row: &csv::StringRecord) -> usize {
    row.position().map_or(0, |p| p.line() as usize)
}

fn format_err(file: &str, line: usize, message: String) -> RefdataError {
    RefdataError::Format {
        file: file.to_string(),
        line,
        message,
    }
}
