//! Delimited-text repair
//!
//! Quote-aware tokenizer plus the ragged-row repair heuristic.
//!
//! The repair rule: a row with too few fields gets empty trailing fields
//! (missing free text is assumed empty); a row with too many fields is
//! assumed to have an unescaped delimiter inside the final comment column,
//! so everything from that position onward is rejoined with the delimiter.
//! The rejoin is lossy when more than one field in the same row contains an
//! unescaped delimiter; that case is a documented limitation, not detectable
//! from column counts alone.

use super::{ParseOutput, RecordSource};
use crate::error::Result;
use crate::schema::TableSchema;
use crate::types::{JsonValue, RawRecord};
use tracing::warn;

/// Parser for delimited results exports
#[derive(Debug, Clone)]
pub struct CsvRepairer {
    schema: &'static TableSchema,
    delimiter: char,
}

impl CsvRepairer {
    /// Create a repairer for a schema with the default comma delimiter
    pub fn new(schema: &'static TableSchema) -> Self {
        Self {
            schema,
            delimiter: ',',
        }
    }

    /// Create a repairer with a custom delimiter
    pub fn with_delimiter(schema: &'static TableSchema, delimiter: char) -> Self {
        Self { schema, delimiter }
    }

    /// Force a tokenized row to exactly the expected column count
    fn repair(&self, mut fields: Vec<String>) -> Vec<String> {
        let expected = self.schema.len();

        if fields.len() < expected {
            // Missing trailing free-text fields are assumed empty
            fields.resize(expected, String::new());
        } else if fields.len() > expected {
            // Overflow is assumed to sit in the last (comment) column
            let tail = fields.split_off(expected - 1);
            fields.push(tail.join(&self.delimiter.to_string()));
        }

        fields
    }

    /// Map exactly-N fields positionally onto the schema's source names
    fn to_record(&self, fields: Vec<String>) -> RawRecord {
        let mut record = RawRecord::new();
        for (column, field) in self.schema.columns.iter().zip(fields) {
            record.insert(column.source.to_string(), JsonValue::String(field));
        }
        record
    }
}

impl RecordSource for CsvRepairer {
    fn parse(&self, body: &str) -> Result<ParseOutput> {
        let expected = self.schema.len();
        let tokenized = tokenize(body, self.delimiter);

        let mut rows = tokenized.rows.into_iter();
        let mut output = ParseOutput {
            skipped: tokenized.unterminated,
            ..ParseOutput::default()
        };

        // The header is informational only: positional mapping always
        // follows the schema, never the file's own column names.
        match rows.next() {
            Some(header) if header.len() != expected => {
                warn!(
                    expected,
                    got = header.len(),
                    "header column count mismatch, proceeding with schema order"
                );
            }
            Some(_) => {}
            None => return Ok(output),
        }

        for (row_num, fields) in rows.enumerate() {
            // Blank line between records, not a data row
            if fields.len() == 1 && fields[0].is_empty() {
                continue;
            }

            let repaired = self.repair(fields);
            if repaired.len() != expected {
                warn!(row = row_num + 2, "row could not be repaired, skipping");
                output.skipped += 1;
                continue;
            }
            output.records.push(self.to_record(repaired));
        }

        Ok(output)
    }
}

struct Tokenized {
    rows: Vec<Vec<String>>,
    /// Rows swallowed by an unterminated quote at end of input
    unterminated: usize,
}

/// Split a whole buffer into rows of fields.
///
/// A quoted field may contain the delimiter and line breaks literally;
/// a doubled quote inside a quoted field is an escaped quote.
fn tokenize(input: &str, delimiter: char) -> Tokenized {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else if (c == '\n' || c == '\r') && !in_quotes {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            fields.push(std::mem::take(&mut current));
            rows.push(std::mem::take(&mut fields));
        } else {
            current.push(c);
        }
    }

    let mut unterminated = 0;
    if in_quotes {
        // The open quote consumed the rest of the input; the partial row
        // cannot be mapped onto the schema with any confidence.
        warn!("unterminated quote at end of input, dropping trailing row");
        unterminated = 1;
    } else if !current.is_empty() || !fields.is_empty() {
        // Final row without a trailing newline
        fields.push(current);
        rows.push(fields);
    }

    Tokenized { rows, unterminated }
}
