//! Delimited table reader.
//!
//! Reads comma-separated text with a header row. Fields may be wrapped in
//! double quotes, in which case they can contain commas, line breaks and
//! doubled quotes (`""`). A quote anywhere else, or text following a closing
//! quote, is an error. Both LF and CRLF line endings are accepted and blank
//! lines are ignored.

use crate::error::{PurchaserError, Result};

/// A parsed table: trimmed header names plus raw data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Column index for a header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Header cells found in the wild may carry a byte-order mark or padding.
pub fn clean_header(name: &str) -> String {
    name.trim_matches(|c| c == ' ' || c == '\u{feff}').to_string()
}

/// Parse a table from source text.
///
/// Every data row must have as many fields as the header.
pub fn parse_table(source: &str) -> Result<Table> {
    let mut records = parse_records(source)?.into_iter();

    let (_, header) = records.next().ok_or_else(|| PurchaserError::Parse {
        message: "Table is empty".to_string(),
        help: Some("The first line must be a header row".to_string()),
    })?;

    let headers: Vec<String> = header.iter().map(|h| clean_header(h)).collect();

    let mut rows = Vec::new();
    for (line, record) in records {
        if record.len() != headers.len() {
            return Err(PurchaserError::Parse {
                message: format!(
                    "Line {}: expected {} fields, found {}",
                    line,
                    headers.len(),
                    record.len()
                ),
                help: Some("Quote fields that contain commas".to_string()),
            });
        }
        rows.push(record);
    }

    Ok(Table { headers, rows })
}

/// Split source text into records, each tagged with its starting line number.
fn parse_records(source: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Set once the current field has any content or was quoted.
    let mut field_started = false;
    // Set between a closing quote and the next separator.
    let mut quote_closed = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = 0;

    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    quote_closed = true;
                }
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        let at_separator = c == ',' || c == '\n' || (c == '\r' && chars.peek() == Some(&'\n'));
        if quote_closed && !at_separator {
            return Err(PurchaserError::Parse {
                message: format!("Line {}: unexpected {:?} after closing quote", line, c),
                help: Some("Put the whole field inside the quotes".to_string()),
            });
        }

        match c {
            '"' if !field.is_empty() => {
                return Err(PurchaserError::Parse {
                    message: format!("Line {}: bare quote in unquoted field", line),
                    help: Some("Quote the field and double any quotes inside it".to_string()),
                });
            }
            '"' => {
                in_quotes = true;
                field_started = true;
                quote_line = line;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = true;
                quote_closed = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                end_record(&mut records, &mut record, &mut field, field_started, record_line);
                field_started = false;
                quote_closed = false;
                line += 1;
                record_line = line;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(PurchaserError::Parse {
            message: format!("Line {}: unterminated quoted field", quote_line),
            help: Some("Close the field with a matching double quote".to_string()),
        });
    }

    end_record(&mut records, &mut record, &mut field, field_started, record_line);
    Ok(records)
}

fn end_record(
    records: &mut Vec<(usize, Vec<String>)>,
    record: &mut Vec<String>,
    field: &mut String,
    field_started: bool,
    line: usize,
) {
    // A line with no separators and no content is blank, not a one-field record.
    if !field_started && record.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push((line, std::mem::take(record)));
}
