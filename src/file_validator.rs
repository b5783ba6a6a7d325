//! Single-pass record validation of one CSV file.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use crate::results::FileValidationResult;
use crate::rules::{self, RowView};
use crate::schema;

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Builds a CSV reader over `reader`, skipping a leading UTF-8 BOM.
///
/// Feeds exported from spreadsheet tools routinely start with a BOM that
/// would otherwise end up glued to the first header name.
pub(crate) fn csv_reader_skip_bom<R: Read>(
    mut reader: R,
    trim_fields: bool,
) -> std::io::Result<csv::Reader<std::io::Chain<Cursor<Vec<u8>>, R>>> {
    let mut head = [0u8; 3];
    let mut filled = 0;
    while filled < head.len() {
        match reader.read(&mut head[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    let replay = if head[..filled] == UTF8_BOM {
        Vec::new()
    } else {
        head[..filled].to_vec()
    };
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(if trim_fields {
            csv::Trim::Fields
        } else {
            csv::Trim::None
        })
        .from_reader(Cursor::new(replay).chain(reader)))
}

/// Validates every record of one file in a single forward pass.
///
/// Checks the header for required and unrecognized columns, then each data
/// row for empty required values, type conformance and the file's business
/// rules. Rows whose every cell is blank are skipped without advancing the
/// line counter, so trailing blank lines are not content. The header is line
/// 1 and the first data row is line 2.
///
/// Files without a schema only get their lines counted.
pub fn validate_records<R: Read>(
    reader: R,
    file_name: &str,
    trim_fields: bool,
) -> FileValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut csv_reader = match csv_reader_skip_bom(reader, trim_fields) {
        Ok(csv_reader) => csv_reader,
        Err(e) => return read_failure(file_name, &e.to_string()),
    };

    let headers = match csv_reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => return read_failure(file_name, &e.to_string()),
    };

    let schema = schema::schema_for(file_name);
    if let Some(schema) = schema {
        for field in schema.required {
            if !headers.iter().any(|header| header == *field) {
                errors.push(format!("Line 1: Missing required field: {field}"));
            }
        }
        for header in headers.iter() {
            if !schema.is_known_column(header) {
                warnings.push(format!("Line 1: Unrecognized field: {header}"));
            }
        }
    }

    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| (header, index))
        .collect();
    let business_rules = rules::rules_for(file_name);

    // The header is line 1
    let mut line = 1u64;
    let mut record = csv::StringRecord::new();
    loop {
        match csv_reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                errors.push(format!("Error reading file: {e}"));
                return FileValidationResult {
                    file_name: file_name.to_owned(),
                    is_valid: false,
                    total_lines: line,
                    errors,
                    warnings,
                };
            }
        }
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        line += 1;

        let schema = match schema {
            Some(schema) => schema,
            None => continue,
        };
        let row = RowView::new(&columns, &record);

        for field in schema.required {
            if row.get(field).trim().is_empty() {
                errors.push(format!("Line {line}: Required field empty: {field}"));
            }
        }

        for (index, header) in headers.iter().enumerate() {
            let value = record.get(index).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            if let Some(&field_type) = schema.types.get(header) {
                if !field_type.validate(value, file_name, header) {
                    errors.push(format!(
                        "Line {line}: Invalid value for {header}: expected {}, got '{value}'",
                        field_type.label()
                    ));
                }
            }
        }

        for rule in business_rules {
            if let Some(message) = rule(&row) {
                errors.push(format!("Line {line}: {message}"));
            }
        }
    }

    FileValidationResult {
        file_name: file_name.to_owned(),
        is_valid: errors.is_empty(),
        total_lines: line,
        errors,
        warnings,
    }
}

fn read_failure(file_name: &str, message: &str) -> FileValidationResult {
    FileValidationResult {
        file_name: file_name.to_owned(),
        is_valid: false,
        total_lines: 0,
        errors: vec![format!("Error reading file: {message}")],
        warnings: Vec::new(),
    }
}
