//! Table names and the columns the data model reads from each

pub const ATHLETE: &str = "athlete";
pub const TEAM: &str = "team";
pub const EVENT: &str = "event";
pub const ENTRY: &str = "entry";
pub const RELAY: &str = "relay";
pub const TAG_NAMES: &str = "tagnames";
pub const TIME_STANDARDS: &str = "timestd";
pub const RECORD_TAGS: &str = "recordtags";
pub const RECORDS: &str = "records";

/// Every table extracted for a run, in extraction order
pub const ALL_TABLES: [&str; 9] = [
    TEAM,
    EVENT,
    ATHLETE,
    ENTRY,
    RELAY,
    TAG_NAMES,
    TIME_STANDARDS,
    RECORDS,
    RECORD_TAGS,
];

/// `Pref_name` is read when present
pub const ATHLETE_COLUMNS: &[&str] = &["Ath_no", "Last_name", "First_name", "Team_no"];

/// `Team_name` is read when present; relays fall back to the abbreviation
pub const TEAM_COLUMNS: &[&str] = &["Team_no", "Team_abbr"];

pub const EVENT_COLUMNS: &[&str] = &[
    "Event_no",
    "Event_ptr",
    "Ind_rel",
    "Event_sex",
    "Event_gender",
    "Event_dist",
    "Event_stroke",
    "Low_age",
    "High_Age",
];

/// Result columns shared by individual and relay swims
pub const RESULT_COLUMNS: &[&str] = &[
    "Event_ptr",
    "ActualSeed_time",
    "Fin_heat",
    "Fin_lane",
    "Fin_stat",
    "Fin_Time",
    "Fin_back1",
    "Fin_back2",
    "Fin_back3",
];

pub const ENTRY_COLUMNS: &[&str] = &["Ath_no"];

pub const RELAY_COLUMNS: &[&str] = &["Team_no", "Team_ltr"];

pub const TAG_NAME_COLUMNS: &[&str] = &["tag_ptr", "tag_name"];

/// Event key columns shared by time standards and records
pub const TAG_KEY_COLUMNS: &[&str] = &[
    "tag_ptr",
    "tag_gender",
    "tag_indrel",
    "tag_dist",
    "tag_stroke",
    "low_age",
    "high_Age",
];

pub const TIME_STANDARD_COLUMNS: &[&str] = &["tag_time"];

pub const RECORD_COLUMNS: &[&str] = &["Record_Time"];

/// Pad (electronic backup) time columns, in lane-pad order
pub const PAD_TIME_COLUMNS: [&str; 3] = ["Fin_back1", "Fin_back2", "Fin_back3"];
