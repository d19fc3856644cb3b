//! Built-in column tables
//!
//! One table per source variant. Column order for the results table matches
//! the position of fields in the delimited export; the racecards table lists
//! the flattened row produced by the repair walk.

use super::types::{Column, ColumnType, TableSchema};
use crate::types::SourceFormat;
use once_cell::sync::Lazy;

use ColumnType::{Date, Float, Int, Json, Str};

static RESULTS: Lazy<TableSchema> = Lazy::new(|| TableSchema {
    table: "historical_racing_results",
    columns: vec![
        Column::new("date", Str),
        Column::new("region", Str),
        Column::new("course", Str),
        Column::new("off", Str),
        Column::new("race_name", Str),
        Column::new("type", Str),
        Column::new("class", Str),
        Column::new("pattern", Str),
        Column::new("rating_band", Str),
        Column::new("age_band", Str),
        Column::new("sex_rest", Str),
        Column::new("dist", Str),
        Column::new("dist_f", Str),
        Column::new("dist_m", Int),
        Column::new("going", Str),
        Column::new("ran", Int),
        Column::new("num", Int),
        Column::new("pos", Int),
        Column::new("draw", Int),
        Column::new("ovr_btn", Float),
        Column::new("btn", Float),
        Column::new("horse", Str),
        Column::new("age", Int),
        Column::new("sex", Str),
        Column::new("lbs", Int),
        Column::new("hg", Str),
        Column::new("time", Str),
        Column::new("secs", Float),
        Column::new("dec", Float),
        Column::new("jockey", Str),
        Column::new("trainer", Str),
        Column::new("prize", Float),
        // "or" is a reserved word in the store's SQL layer
        Column::renamed("or", "or_rating", Int),
        Column::new("rpr", Int),
        Column::new("sire", Str),
        Column::new("dam", Str),
        Column::new("damsire", Str),
        Column::new("owner", Str),
        Column::new("comment", Str),
    ],
    natural_key: &["date", "course", "race_name", "horse", "pos"],
});

static RACECARDS: Lazy<TableSchema> = Lazy::new(|| TableSchema {
    table: "racecards",
    columns: vec![
        // Race-level fields, repeated on every runner row
        Column::new("race_id", Str),
        Column::new("date", Date),
        Column::new("course", Str),
        Column::new("course_id", Int),
        Column::new("region", Str),
        Column::new("off_time", Str),
        Column::new("race_name", Str),
        Column::new("distance_round", Str),
        Column::new("distance", Str),
        Column::new("distance_f", Float),
        Column::new("pattern", Str),
        Column::new("race_class", Str),
        Column::new("type", Str),
        Column::new("age_band", Str),
        Column::new("rating_band", Str),
        Column::new("prize", Str),
        Column::new("field_size", Int),
        Column::new("going", Str),
        Column::new("going_detailed", Str),
        Column::new("rail_movements", Json),
        Column::new("stalls", Str),
        Column::new("weather", Str),
        Column::new("surface", Str),
        // Runner-level fields
        Column::new("horse_id", Int),
        Column::new("horse_name", Str),
        Column::new("number", Int),
        Column::new("draw", Int),
        Column::new("age", Int),
        Column::new("sex", Str),
        Column::new("sex_code", Str),
        Column::new("colour", Str),
        Column::new("horse_region", Str),
        Column::new("dob", Date),
        Column::new("breeder", Str),
        Column::new("sire", Str),
        Column::new("sire_region", Str),
        Column::new("dam", Str),
        Column::new("dam_region", Str),
        Column::new("grandsire", Str),
        Column::new("damsire", Str),
        Column::new("damsire_region", Str),
        Column::new("trainer", Str),
        Column::new("trainer_id", Int),
        Column::new("trainer_location", Str),
        Column::new("trainer_14_days", Json),
        Column::new("trainer_rtf", Str),
        Column::new("owner", Str),
        Column::new("jockey", Str),
        Column::new("jockey_id", Int),
        Column::new("lbs", Int),
        Column::new("ofr", Int),
        Column::new("rpr", Int),
        Column::new("ts", Int),
        Column::new("headgear", Str),
        Column::new("headgear_first", Str),
        Column::new("last_run", Str),
        Column::new("form", Str),
        Column::new("prev_trainers", Json),
        Column::new("prev_owners", Json),
        Column::new("comment", Str),
        Column::new("spotlight", Str),
        Column::new("medical", Json),
        Column::new("quotes", Json),
        Column::new("stable_tour", Json),
        Column::new("stats", Json),
    ],
    natural_key: &["race_id", "horse_id"],
});

/// The 39-column historical results table
pub fn results() -> &'static TableSchema {
    &RESULTS
}

/// The flattened racecards table
pub fn racecards() -> &'static TableSchema {
    &RACECARDS
}

/// Schema for a source format
pub fn schema_for(format: SourceFormat) -> &'static TableSchema {
    match format {
        SourceFormat::Csv => results(),
        SourceFormat::Racecards => racecards(),
    }
}
