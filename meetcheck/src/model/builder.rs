//! Merge raw tables into participation records and benchmark sets
//!
//! Joins are inner joins on the database's own foreign keys. Rows that fail to
//! join (athlete without a team, entry for a deleted event, ...) are dropped
//! and counted, never reported as errors.

use super::participation::{Competitor, FinishStatus, Participation, RaceFields};
use super::standards::{Benchmark, BenchmarkSet, EventKey};
use super::MeetData;
use crate::error::Result;
use crate::source::columns::{self, PAD_TIME_COLUMNS};
use crate::source::{RawRow, RawTable, RawTables};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

struct TeamRow {
    name: Option<String>,
    abbr: String,
}

struct AthleteRow {
    last_name: String,
    first_name: String,
    preferred_name: Option<String>,
    team_no: i64,
}

struct EventRow {
    event_no: i64,
    event_sex: String,
    event_gender: String,
    ind_rel: String,
    distance: i64,
    stroke: String,
    low_age: i64,
    high_age: i64,
}

/// Fail on the first table lacking a column the merge reads
fn require_all_columns(tables: &RawTables) -> Result<()> {
    let required: [(&RawTable, &[&[&str]]); 9] = [
        (&tables.athlete, &[columns::ATHLETE_COLUMNS]),
        (&tables.team, &[columns::TEAM_COLUMNS]),
        (&tables.event, &[columns::EVENT_COLUMNS]),
        (&tables.entry, &[columns::RESULT_COLUMNS, columns::ENTRY_COLUMNS]),
        (&tables.relay, &[columns::RESULT_COLUMNS, columns::RELAY_COLUMNS]),
        (&tables.tag_names, &[columns::TAG_NAME_COLUMNS]),
        (&tables.time_standards, &[columns::TAG_KEY_COLUMNS, columns::TIME_STANDARD_COLUMNS]),
        (&tables.record_tags, &[columns::TAG_NAME_COLUMNS]),
        (&tables.records, &[columns::TAG_KEY_COLUMNS, columns::RECORD_COLUMNS]),
    ];
    for (table, column_sets) in required {
        for set in column_sets {
            table.require_columns(set)?;
        }
    }
    Ok(())
}

impl MeetData {
    /// Build the merged data set
    ///
    /// Missing required columns are fatal; empty tables are fine.
    pub fn build(tables: &RawTables) -> Result<Self> {
        require_all_columns(tables)?;

        let teams = team_index(&tables.team);
        let athletes = athlete_index(&tables.athlete);
        let events = event_index(&tables.event);

        let mut entries = individual_entries(&tables.entry, &athletes, &teams, &events);
        entries.extend(relay_entries(&tables.relay, &teams, &events));
        warn_duplicate_lanes(&entries);

        let time_standards = benchmarks(&tables.time_standards, &tables.tag_names);
        let records = benchmarks(&tables.records, &tables.record_tags);

        info!(
            "Merged meet data: {} entries, {} time standards, {} records",
            entries.len(),
            time_standards.len(),
            records.len()
        );
        debug!(
            "Standards: {:?}; records: {:?}",
            time_standards.names(),
            records.names()
        );

        Ok(Self {
            entries,
            time_standards,
            records,
        })
    }
}

fn team_index(table: &RawTable) -> HashMap<i64, TeamRow> {
    table
        .rows()
        .filter_map(|row| {
            let team_no = row.int("team_no")?;
            Some((
                team_no,
                TeamRow {
                    name: row.text("team_name").map(str::to_string),
                    abbr: row.text_or_empty("team_abbr"),
                },
            ))
        })
        .collect()
}

fn athlete_index(table: &RawTable) -> HashMap<i64, AthleteRow> {
    table
        .rows()
        .filter_map(|row| {
            Some((
                row.int("ath_no")?,
                AthleteRow {
                    last_name: row.text_or_empty("last_name"),
                    first_name: row.text_or_empty("first_name"),
                    preferred_name: row.text("pref_name").map(str::to_string),
                    team_no: row.int("team_no")?,
                },
            ))
        })
        .collect()
}

fn event_index(table: &RawTable) -> HashMap<i64, EventRow> {
    table
        .rows()
        .filter_map(|row| {
            Some((
                row.int("event_ptr")?,
                EventRow {
                    event_no: row.int("event_no")?,
                    event_sex: row.text_or_empty("event_sex"),
                    event_gender: row.text_or_empty("event_gender"),
                    ind_rel: row.text_or_empty("ind_rel"),
                    distance: row.int("event_dist").unwrap_or(0),
                    stroke: row.text_or_empty("event_stroke"),
                    low_age: row.int("low_age").unwrap_or(0),
                    high_age: row.int("high_age").unwrap_or(0),
                },
            ))
        })
        .collect()
}

/// Result columns shared by `entry` and `relay`, joined to an event
fn race_fields(
    row: &RawRow<'_>,
    event: &EventRow,
    competitor: Competitor,
    team_abbr: String,
) -> RaceFields {
    RaceFields {
        event_no: event.event_no,
        heat: row.int("fin_heat").unwrap_or(0),
        lane: row.int("fin_lane").unwrap_or(0),
        competitor,
        team_abbr,
        event_sex: event.event_sex.clone(),
        event_gender: event.event_gender.clone(),
        ind_rel: event.ind_rel.clone(),
        distance: event.distance,
        stroke: event.stroke.clone(),
        low_age: event.low_age,
        high_age: event.high_age,
        seed_time: row.float("actualseed_time"),
        finish_time: row.float("fin_time"),
        status: FinishStatus::from_code(row.text("fin_stat")),
        pad_times: PAD_TIME_COLUMNS.map(|c| row.float(c)),
    }
}

fn individual_entries(
    table: &RawTable,
    athletes: &HashMap<i64, AthleteRow>,
    teams: &HashMap<i64, TeamRow>,
    events: &HashMap<i64, EventRow>,
) -> Vec<Participation> {
    let mut dropped = 0usize;
    let mut entries = Vec::with_capacity(table.len());

    for row in table.rows() {
        let joined = row
            .int("ath_no")
            .and_then(|ath_no| athletes.get(&ath_no))
            .and_then(|athlete| Some((athlete, teams.get(&athlete.team_no)?)))
            .and_then(|(athlete, team)| {
                Some((athlete, team, events.get(&row.int("event_ptr")?)?))
            });

        match joined {
            Some((athlete, team, event)) => {
                let competitor = Competitor::Individual {
                    last_name: athlete.last_name.clone(),
                    first_name: athlete.first_name.clone(),
                    preferred_name: athlete.preferred_name.clone(),
                };
                let fields = race_fields(&row, event, competitor, team.abbr.clone());
                entries.push(Participation::new(fields));
            }
            None => dropped += 1,
        }
    }

    debug!(
        "Individual entries: {} joined, {} dropped without athlete/team/event",
        entries.len(),
        dropped
    );
    entries
}

fn relay_entries(
    table: &RawTable,
    teams: &HashMap<i64, TeamRow>,
    events: &HashMap<i64, EventRow>,
) -> Vec<Participation> {
    let mut dropped = 0usize;
    let mut entries = Vec::with_capacity(table.len());

    for row in table.rows() {
        let joined = row
            .int("team_no")
            .and_then(|team_no| teams.get(&team_no))
            .and_then(|team| Some((team, events.get(&row.int("event_ptr")?)?)));

        match joined {
            Some((team, event)) => {
                let competitor = Competitor::Relay {
                    team_name: team.name.clone(),
                    team_letter: row.text("team_ltr").map(str::to_string),
                };
                let fields = race_fields(&row, event, competitor, team.abbr.clone());
                entries.push(Participation::new(fields));
            }
            None => dropped += 1,
        }
    }

    debug!(
        "Relay entries: {} joined, {} dropped without team/event",
        entries.len(),
        dropped
    );
    entries
}

/// Raced lanes should be unique; duplicates are reported but kept
fn warn_duplicate_lanes(entries: &[Participation]) {
    let mut seen = HashSet::new();
    for entry in entries.iter().filter(|e| e.raced()) {
        if !seen.insert(entry.lane_key()) {
            let (event, heat, lane) = entry.lane_key();
            warn!(
                "More than one result for event {} heat {} lane {} ({})",
                event,
                heat,
                lane,
                entry.display_name()
            );
        }
    }
}

/// Join a `timestd`/`records` table to its tag-name table on `tag_ptr`
fn benchmarks(times: &RawTable, tag_names: &RawTable) -> BenchmarkSet {
    let names: HashMap<i64, String> = tag_names
        .rows()
        .filter_map(|row| Some((row.int("tag_ptr")?, row.text("tag_name")?.to_string())))
        .collect();

    // timestd carries tag_time, records carries Record_Time
    let time_column = if times.column_index("tag_time").is_some() {
        "tag_time"
    } else {
        "record_time"
    };

    let mut dropped = 0usize;
    let mut items = Vec::with_capacity(times.len());
    for row in times.rows() {
        let benchmark = benchmark_from_row(&row, &names, time_column);
        match benchmark {
            Some(b) => items.push(b),
            None => dropped += 1,
        }
    }

    debug!(
        "Table '{}': {} benchmark times, {} dropped",
        times.name(),
        items.len(),
        dropped
    );
    BenchmarkSet::new(items)
}

fn benchmark_from_row(
    row: &RawRow<'_>,
    names: &HashMap<i64, String>,
    time_column: &str,
) -> Option<Benchmark> {
    Some(Benchmark {
        name: names.get(&row.int("tag_ptr")?)?.clone(),
        key: EventKey {
            gender: row.text_or_empty("tag_gender"),
            ind_rel: row.text_or_empty("tag_indrel"),
            distance: row.int("tag_dist")?,
            stroke: row.text_or_empty("tag_stroke"),
            low_age: row.int("low_age").unwrap_or(0),
            high_age: row.int("high_age").unwrap_or(0),
        },
        time: row.float(time_column).filter(|t| *t > 0.0)?,
    })
}
