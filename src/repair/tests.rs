//! Tests for the repair module

use super::*;
use crate::schema;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// CSV fixtures
// ============================================================================

/// A well-formed 39-field row with recognizable values per position
fn base_fields() -> Vec<String> {
    schema::results()
        .source_names()
        .map(|name| format!("v_{name}"))
        .collect()
}

fn header() -> String {
    schema::results()
        .source_names()
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_from_rows(rows: &[String]) -> String {
    let mut body = header();
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    body
}

fn field_of<'a>(record: &'a crate::types::RawRecord, name: &str) -> &'a str {
    record.get(name).and_then(|v| v.as_str()).unwrap()
}

// ============================================================================
// CSV repair
// ============================================================================

#[test]
fn test_well_formed_row_maps_positionally() {
    let repairer = CsvRepairer::new(schema::results());
    let body = csv_from_rows(&[base_fields().join(",")]);

    let output = repairer.parse(&body).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.skipped, 0);

    let record = &output.records[0];
    assert_eq!(record.len(), 39);
    assert_eq!(field_of(record, "date"), "v_date");
    assert_eq!(field_of(record, "or"), "v_or");
    assert_eq!(field_of(record, "comment"), "v_comment");
}

#[test]
fn test_short_row_padded_with_empty_trailing_fields() {
    let repairer = CsvRepairer::new(schema::results());

    let mut short = base_fields();
    short.pop(); // drop the trailing comment field entirely
    let mut explicit = base_fields();
    "".clone_into(explicit.last_mut().unwrap());

    let output = repairer
        .parse(&csv_from_rows(&[short.join(","), explicit.join(",")]))
        .unwrap();

    // Padding one missing trailing field is identical to an explicit empty one
    assert_eq!(output.records[0], output.records[1]);
    assert_eq!(field_of(&output.records[0], "comment"), "");
}

#[test]
fn test_overflow_row_rejoins_comment() {
    let repairer = CsvRepairer::new(schema::results());

    let mut fields = base_fields();
    // An unescaped comma inside the free-text comment splits it into two
    // fields on export
    "led, kept on well".clone_into(fields.last_mut().unwrap());

    let output = repairer.parse(&csv_from_rows(&[fields.join(",")])).unwrap();
    let record = &output.records[0];

    assert_eq!(record.len(), 39);
    // The rejoin reproduces the original untruncated free text
    assert_eq!(field_of(record, "comment"), "led, kept on well");
    // Fields before the comment are untouched
    assert_eq!(field_of(record, "owner"), "v_owner");
}

#[test]
fn test_quoted_delimiter_needs_no_repair() {
    let repairer = CsvRepairer::new(schema::results());

    let mut fields = base_fields();
    "\"led, kept on well\"".clone_into(fields.last_mut().unwrap());

    let output = repairer.parse(&csv_from_rows(&[fields.join(",")])).unwrap();
    assert_eq!(
        field_of(&output.records[0], "comment"),
        "led, kept on well"
    );
}

#[test]
fn test_double_corruption_is_lossy() {
    // Two unescaped delimiters in different fields cannot be told apart from
    // comment overflow; the repair folds everything from the comment
    // position onward into the comment. Known limitation, asserted as-is.
    let repairer = CsvRepairer::new(schema::results());

    let mut fields = base_fields();
    "J Smith, Jr".clone_into(&mut fields[37]); // owner sprouts a field
    "led, kept on".clone_into(&mut fields[38]);

    let output = repairer.parse(&csv_from_rows(&[fields.join(",")])).unwrap();
    let record = &output.records[0];

    assert_eq!(record.len(), 39);
    assert_eq!(field_of(record, "owner"), "J Smith");
    assert_eq!(field_of(record, "comment"), " Jr,led, kept on");
}

#[test]
fn test_header_mismatch_is_informational() {
    let repairer = CsvRepairer::new(schema::results());
    let mut body = String::from("only,three,columns\n");
    body.push_str(&base_fields().join(","));
    body.push('\n');

    // Rows still map by schema position, not by the header's names
    let output = repairer.parse(&body).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(field_of(&output.records[0], "date"), "v_date");
}

#[test]
fn test_blank_lines_skipped() {
    let repairer = CsvRepairer::new(schema::results());
    let mut body = csv_from_rows(&[base_fields().join(",")]);
    body.push('\n');
    body.push_str(&base_fields().join(","));
    body.push('\n');

    let output = repairer.parse(&body).unwrap();
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.skipped, 0);
}

#[test]
fn test_unterminated_quote_skips_row() {
    let repairer = CsvRepairer::new(schema::results());

    let mut fields = base_fields();
    "\"no closing quote".clone_into(fields.last_mut().unwrap());
    let good = base_fields().join(",");
    let body = csv_from_rows(&[good, fields.join(",")]);

    let output = repairer.parse(&body).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.skipped, 1);
}

#[test]
fn test_quoted_field_spans_lines() {
    let repairer = CsvRepairer::new(schema::results());

    let mut fields = base_fields();
    "\"led early\nfaded late\"".clone_into(fields.last_mut().unwrap());

    let output = repairer.parse(&csv_from_rows(&[fields.join(",")])).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(
        field_of(&output.records[0], "comment"),
        "led early\nfaded late"
    );
}

#[test]
fn test_empty_body_yields_no_records() {
    let repairer = CsvRepairer::new(schema::results());
    assert!(repairer.parse("").unwrap().records.is_empty());

    // Header-only files parse to zero records as well
    let output = repairer.parse(&csv_from_rows(&[])).unwrap();
    assert!(output.records.is_empty());
}

#[test]
fn test_crlf_line_endings() {
    let repairer = CsvRepairer::new(schema::results());
    let body = format!("{}\r\n{}\r\n", header(), base_fields().join(","));

    let output = repairer.parse(&body).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(field_of(&output.records[0], "comment"), "v_comment");
}

// ============================================================================
// Racecard flattening
// ============================================================================

fn racecard_fixture() -> String {
    json!({
        "GB": {
            "Ascot": {
                "13:30": {
                    "race_id": "871532",
                    "date": "2025-07-26T00:00:00",
                    "course": "Ascot",
                    "course_id": "2",
                    "region": "GB",
                    "off_time": "13:30",
                    "race_name": "Summer Mile",
                    "distance_f": "8.0",
                    "field_size": "2",
                    "going": "Good",
                    "rail_movements": ["rail moved 3yds"],
                    "runners": [
                        {
                            "horse_id": "101",
                            "name": "Quickstep",
                            "region": "IRE",
                            "number": "1",
                            "age": "4",
                            "jockey": "T Rider",
                            "trainer_14_days": {"runs": 12, "wins": 3},
                            "stats": {"course_wins": 1}
                        },
                        {
                            "horse_id": "102",
                            "name": "Slow Waltz",
                            "number": "2"
                        }
                    ]
                }
            }
        }
    })
    .to_string()
}

#[test]
fn test_flatten_one_row_per_runner() {
    let output = RacecardFlattener::new()
        .parse(&racecard_fixture())
        .unwrap();
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.skipped, 0);
}

#[test]
fn test_flatten_merges_race_and_runner_fields() {
    let output = RacecardFlattener::new()
        .parse(&racecard_fixture())
        .unwrap();
    let record = &output.records[0];

    // Every schema column is present on every flattened row
    assert_eq!(record.len(), schema::racecards().len());

    // Race-level fields repeat onto the runner row
    assert_eq!(record.get("race_id"), Some(&json!("871532")));
    assert_eq!(record.get("region"), Some(&json!("GB")));

    // Collisions resolve to runner-specific names
    assert_eq!(record.get("horse_name"), Some(&json!("Quickstep")));
    assert_eq!(record.get("horse_region"), Some(&json!("IRE")));

    // Nested structures survive as structures for the transform to serialize
    assert_eq!(
        record.get("trainer_14_days"),
        Some(&json!({"runs": 12, "wins": 3}))
    );
}

#[test]
fn test_flatten_absent_fields_are_null() {
    let output = RacecardFlattener::new()
        .parse(&racecard_fixture())
        .unwrap();
    let sparse = &output.records[1];

    assert_eq!(sparse.get("jockey"), Some(&json!(null)));
    assert_eq!(sparse.get("stats"), Some(&json!(null)));
    assert_eq!(sparse.get("dob"), Some(&json!(null)));
}

#[test]
fn test_flatten_race_without_runners() {
    let body = json!({
        "GB": {"Ascot": {"14:05": {"race_id": "871533", "race_name": "Handicap"}}}
    })
    .to_string();

    let output = RacecardFlattener::new().parse(&body).unwrap();
    assert!(output.records.is_empty());
    assert_eq!(output.skipped, 0);
}

#[test]
fn test_flatten_skips_malformed_nodes() {
    let body = json!({
        "GB": {
            "Ascot": {
                "13:30": "not a race object",
                "14:05": {
                    "race_id": "871534",
                    "runners": [{"horse_id": "103", "name": "Survivor"}]
                }
            }
        },
        "IRE": "not a courses object"
    })
    .to_string();

    let output = RacecardFlattener::new().parse(&body).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.skipped, 2);
    assert_eq!(output.records[0].get("horse_name"), Some(&json!("Survivor")));
}

#[test]
fn test_flatten_rejects_non_object_root() {
    let err = RacecardFlattener::new().parse("[1, 2, 3]").unwrap_err();
    assert!(err.to_string().contains("not an object"));
}
