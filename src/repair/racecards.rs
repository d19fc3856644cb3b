//! Racecard JSON flattening
//!
//! The feed nests races three levels deep (region -> course -> off-time) and
//! embeds runners as an array inside each race. One flat raw record is
//! produced per runner by merging the enclosing race's fields with the
//! runner's own, resolving name collisions (`name` -> `horse_name`,
//! runner `region` -> `horse_region`) along the way.
//!
//! The source is self-describing so no column-count repair applies, but an
//! absent nested value always flattens to null, never an empty-structure
//! sentinel.

use super::{ParseOutput, RecordSource};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, RawRecord};
use tracing::warn;

/// (key in the race object, flattened column name)
const RACE_FIELDS: &[(&str, &str)] = &[
    ("race_id", "race_id"),
    ("date", "date"),
    ("course", "course"),
    ("course_id", "course_id"),
    ("region", "region"),
    ("off_time", "off_time"),
    ("race_name", "race_name"),
    ("distance_round", "distance_round"),
    ("distance", "distance"),
    ("distance_f", "distance_f"),
    ("pattern", "pattern"),
    ("race_class", "race_class"),
    ("type", "type"),
    ("age_band", "age_band"),
    ("rating_band", "rating_band"),
    ("prize", "prize"),
    ("field_size", "field_size"),
    ("going", "going"),
    ("going_detailed", "going_detailed"),
    ("rail_movements", "rail_movements"),
    ("stalls", "stalls"),
    ("weather", "weather"),
    ("surface", "surface"),
];

/// (key in the runner object, flattened column name)
const RUNNER_FIELDS: &[(&str, &str)] = &[
    ("horse_id", "horse_id"),
    ("name", "horse_name"),
    ("number", "number"),
    ("draw", "draw"),
    ("age", "age"),
    ("sex", "sex"),
    ("sex_code", "sex_code"),
    ("colour", "colour"),
    ("region", "horse_region"),
    ("dob", "dob"),
    ("breeder", "breeder"),
    ("sire", "sire"),
    ("sire_region", "sire_region"),
    ("dam", "dam"),
    ("dam_region", "dam_region"),
    ("grandsire", "grandsire"),
    ("damsire", "damsire"),
    ("damsire_region", "damsire_region"),
    ("trainer", "trainer"),
    ("trainer_id", "trainer_id"),
    ("trainer_location", "trainer_location"),
    ("trainer_14_days", "trainer_14_days"),
    ("trainer_rtf", "trainer_rtf"),
    ("owner", "owner"),
    ("jockey", "jockey"),
    ("jockey_id", "jockey_id"),
    ("lbs", "lbs"),
    ("ofr", "ofr"),
    ("rpr", "rpr"),
    ("ts", "ts"),
    ("headgear", "headgear"),
    ("headgear_first", "headgear_first"),
    ("last_run", "last_run"),
    ("form", "form"),
    ("prev_trainers", "prev_trainers"),
    ("prev_owners", "prev_owners"),
    ("comment", "comment"),
    ("spotlight", "spotlight"),
    ("medical", "medical"),
    ("quotes", "quotes"),
    ("stable_tour", "stable_tour"),
    ("stats", "stats"),
];

/// Parser for the nested racecard feed
#[derive(Debug, Clone, Default)]
pub struct RacecardFlattener;

impl RacecardFlattener {
    /// Create a new flattener
    pub fn new() -> Self {
        Self
    }

    fn flatten_race(&self, race: &JsonObject, output: &mut ParseOutput) {
        let mut base = RawRecord::new();
        for (key, dest) in RACE_FIELDS {
            base.insert(
                (*dest).to_string(),
                race.get(*key).cloned().unwrap_or(JsonValue::Null),
            );
        }

        let runners = match race.get("runners") {
            Some(JsonValue::Array(runners)) => runners,
            Some(JsonValue::Null) | None => return,
            Some(_) => {
                warn!(
                    race_id = ?race.get("race_id"),
                    "runners is not an array, skipping race"
                );
                output.skipped += 1;
                return;
            }
        };

        for runner in runners {
            let Some(runner) = runner.as_object() else {
                warn!(race_id = ?race.get("race_id"), "runner is not an object, skipping");
                output.skipped += 1;
                continue;
            };

            let mut record = base.clone();
            for (key, dest) in RUNNER_FIELDS {
                record.insert(
                    (*dest).to_string(),
                    runner.get(*key).cloned().unwrap_or(JsonValue::Null),
                );
            }
            output.records.push(record);
        }
    }
}

impl RecordSource for RacecardFlattener {
    fn parse(&self, body: &str) -> Result<ParseOutput> {
        let root: JsonValue = serde_json::from_str(body)?;
        let regions = root
            .as_object()
            .ok_or_else(|| Error::parse("racecards", "top level is not an object"))?;

        let mut output = ParseOutput::default();

        for (region, courses) in regions {
            let Some(courses) = courses.as_object() else {
                warn!(%region, "region value is not an object, skipping");
                output.skipped += 1;
                continue;
            };
            for (course, times) in courses {
                let Some(times) = times.as_object() else {
                    warn!(%region, %course, "course value is not an object, skipping");
                    output.skipped += 1;
                    continue;
                };
                for (off_time, race) in times {
                    match race.as_object() {
                        Some(race) => self.flatten_race(race, &mut output),
                        None => {
                            warn!(%region, %course, %off_time, "race is not an object, skipping");
                            output.skipped += 1;
                        }
                    }
                }
            }
        }

        Ok(output)
    }
}
