//! Participation records: one athlete or relay team in one race
//!
//! A [`Participation`] keeps the merged raw fields ([`RaceFields`]) apart from
//! the values computed from them ([`Derived`]). The computed half is rebuilt in
//! full by [`derive`] whenever the raw half changes; nothing is updated
//! incrementally.

use super::standards::EventKey;

/// Individual/relay flag value for relay events
pub const RELAY_FLAG: &str = "R";

/// Finish status codes from the meet database
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FinishStatus {
    /// Swam normally (blank status)
    #[default]
    Normal,
    /// `R`: scratched / no-show, did not swim
    NoShow,
    /// `Q`: disqualified
    Disqualified,
    /// Any other code, kept verbatim
    Other(String),
}

impl FinishStatus {
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            None | Some("") => Self::Normal,
            Some("R") => Self::NoShow,
            Some("Q") => Self::Disqualified,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Normal => "",
            Self::NoShow => "R",
            Self::Disqualified => "Q",
            Self::Other(code) => code,
        }
    }

    pub fn is_no_show(&self) -> bool {
        matches!(self, Self::NoShow)
    }

    pub fn is_disqualified(&self) -> bool {
        matches!(self, Self::Disqualified)
    }
}

/// Who swam: an athlete, or a lettered relay team
#[derive(Debug, Clone, PartialEq)]
pub enum Competitor {
    Individual {
        last_name: String,
        first_name: String,
        preferred_name: Option<String>,
    },
    Relay {
        team_name: Option<String>,
        team_letter: Option<String>,
    },
}

/// Raw fields merged from `entry`/`relay`, `athlete`, `team` and `event`
#[derive(Debug, Clone, PartialEq)]
pub struct RaceFields {
    pub event_no: i64,
    pub heat: i64,
    pub lane: i64,
    pub competitor: Competitor,
    pub team_abbr: String,

    /// `Event_sex` (B/G/X), used for the event name
    pub event_sex: String,
    /// `Event_gender`, used to key time standards and records
    pub event_gender: String,
    /// `I` or `R`
    pub ind_rel: String,
    pub distance: i64,
    pub stroke: String,
    pub low_age: i64,
    pub high_age: i64,

    pub seed_time: Option<f64>,
    pub finish_time: Option<f64>,
    pub status: FinishStatus,
    pub pad_times: [Option<f64>; 3],
}

/// Values computed from [`RaceFields`]
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub event_name: String,
    pub num_pad_times: usize,
    pub min_pad_time: Option<f64>,
    pub max_pad_time: Option<f64>,
    pub pad_time_spread: Option<f64>,
    /// Seed minus finish; positive means the seed was beaten
    pub popped_by: Option<f64>,
    /// Seed time with zero normalized to absent
    pub seed_time: Option<f64>,
    pub display_name: String,
}

/// Compute every derived field from the raw row
pub fn derive(raw: &RaceFields) -> Derived {
    let event_name = event_name(
        &raw.event_sex,
        raw.low_age,
        raw.high_age,
        raw.distance,
        &raw.stroke,
        raw.ind_rel == RELAY_FLAG,
    );

    let pads: Vec<f64> = raw
        .pad_times
        .iter()
        .flatten()
        .copied()
        .filter(|t| t.is_finite() && *t != 0.0)
        .collect();
    let min_pad_time = pads.iter().copied().reduce(f64::min);
    let max_pad_time = pads.iter().copied().reduce(f64::max);
    let pad_time_spread = min_pad_time.zip(max_pad_time).map(|(min, max)| max - min);

    let seed_time = raw.seed_time.filter(|t| *t != 0.0);
    let finish_time = raw.finish_time.filter(|t| *t != 0.0);
    let popped_by = seed_time.zip(finish_time).map(|(seed, fin)| seed - fin);

    Derived {
        event_name,
        num_pad_times: pads.len(),
        min_pad_time,
        max_pad_time,
        pad_time_spread,
        popped_by,
        seed_time,
        display_name: display_name(&raw.competitor, &raw.team_abbr),
    }
}

/// Human-readable event name, e.g. `Girls 9-10 50 Free` or `Boys 8&U 100 Medley Relay`
pub fn event_name(
    event_sex: &str,
    low_age: i64,
    high_age: i64,
    distance: i64,
    stroke_code: &str,
    relay: bool,
) -> String {
    let gender = match event_sex.trim() {
        "B" => "Boys",
        "X" => "Mixed",
        _ => "Girls",
    };

    let age = match (low_age == 0, high_age >= 99) {
        (true, true) => "Open".to_string(),
        (true, false) => format!("{}&U", high_age),
        (false, true) => format!("{}&O", low_age),
        (false, false) => format!("{}-{}", low_age, high_age),
    };

    let stroke = match stroke_code.trim() {
        "A" => "Free",
        "B" => "Back",
        "C" => "Breast",
        "D" => "Fly",
        "E" => "IM",
        other => other,
    };
    let stroke = match (relay, stroke) {
        (true, "IM") => "Medley Relay".to_string(),
        (true, s) => format!("{} Relay", s),
        (false, s) => s.to_string(),
    };

    format!("{} {} {} {}", gender, age, distance, stroke)
}

/// `Last, First` (preferred name wins) for athletes; `Team Letter` for relays
fn display_name(competitor: &Competitor, team_abbr: &str) -> String {
    match competitor {
        Competitor::Individual {
            last_name,
            first_name,
            preferred_name,
        } => {
            let first = preferred_name
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(first_name);
            if first.is_empty() {
                last_name.clone()
            } else {
                format!("{}, {}", last_name, first)
            }
        }
        Competitor::Relay {
            team_name,
            team_letter,
        } => {
            let team = team_name
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or(team_abbr);
            match team_letter.as_deref().filter(|l| !l.is_empty()) {
                Some(letter) => format!("{} {}", team, letter),
                None => team.to_string(),
            }
        }
    }
}

/// A merged, enriched race entry
#[derive(Debug, Clone, PartialEq)]
pub struct Participation {
    raw: RaceFields,
    derived: Derived,
}

impl Participation {
    pub fn new(raw: RaceFields) -> Self {
        let derived = derive(&raw);
        Self { raw, derived }
    }

    /// Change raw fields; derived fields are recomputed afterwards
    pub fn update(&mut self, f: impl FnOnce(&mut RaceFields)) {
        f(&mut self.raw);
        self.derived = derive(&self.raw);
    }

    pub fn raw(&self) -> &RaceFields {
        &self.raw
    }

    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    pub fn event_no(&self) -> i64 {
        self.raw.event_no
    }

    pub fn heat(&self) -> i64 {
        self.raw.heat
    }

    pub fn lane(&self) -> i64 {
        self.raw.lane
    }

    /// (event, heat, lane): the physical race-lane
    pub fn lane_key(&self) -> (i64, i64, i64) {
        (self.raw.event_no, self.raw.heat, self.raw.lane)
    }

    pub fn display_name(&self) -> &str {
        &self.derived.display_name
    }

    pub fn team_abbr(&self) -> &str {
        &self.raw.team_abbr
    }

    pub fn event_name(&self) -> &str {
        &self.derived.event_name
    }

    pub fn is_relay(&self) -> bool {
        self.raw.ind_rel == RELAY_FLAG
    }

    /// Heat 0 means the swim was never seeded into a heat
    pub fn raced(&self) -> bool {
        self.raw.heat != 0
    }

    pub fn status(&self) -> &FinishStatus {
        &self.raw.status
    }

    pub fn seed_time(&self) -> Option<f64> {
        self.derived.seed_time
    }

    pub fn finish_time(&self) -> Option<f64> {
        self.raw.finish_time
    }

    pub fn pad_times(&self) -> [Option<f64>; 3] {
        self.raw.pad_times
    }

    pub fn num_pad_times(&self) -> usize {
        self.derived.num_pad_times
    }

    pub fn min_pad_time(&self) -> Option<f64> {
        self.derived.min_pad_time
    }

    pub fn max_pad_time(&self) -> Option<f64> {
        self.derived.max_pad_time
    }

    pub fn pad_time_spread(&self) -> Option<f64> {
        self.derived.pad_time_spread
    }

    pub fn popped_by(&self) -> Option<f64> {
        self.derived.popped_by
    }

    pub fn event_key(&self) -> EventKey {
        EventKey {
            gender: self.raw.event_gender.clone(),
            ind_rel: self.raw.ind_rel.clone(),
            distance: self.raw.distance,
            stroke: self.raw.stroke.clone(),
            low_age: self.raw.low_age,
            high_age: self.raw.high_age,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Individual 50 Free, event 3 heat 1 lane 4, no times
    pub(crate) fn sample_fields() -> RaceFields {
        RaceFields {
            event_no: 3,
            heat: 1,
            lane: 4,
            competitor: Competitor::Individual {
                last_name: "Smith".to_string(),
                first_name: "Anna".to_string(),
                preferred_name: None,
            },
            team_abbr: "SHRK".to_string(),
            event_sex: "G".to_string(),
            event_gender: "F".to_string(),
            ind_rel: "I".to_string(),
            distance: 50,
            stroke: "A".to_string(),
            low_age: 9,
            high_age: 10,
            seed_time: None,
            finish_time: None,
            status: FinishStatus::Normal,
            pad_times: [None; 3],
        }
    }

    #[test]
    fn test_event_names() {
        assert_eq!(event_name("G", 9, 10, 50, "A", false), "Girls 9-10 50 Free");
        assert_eq!(event_name("B", 0, 8, 25, "B", false), "Boys 8&U 25 Back");
        assert_eq!(event_name("X", 15, 99, 200, "E", true), "Mixed 15&O 200 Medley Relay");
        assert_eq!(event_name("B", 0, 109, 100, "A", true), "Boys Open 100 Free Relay");
        assert_eq!(event_name("G", 11, 12, 100, "E", false), "Girls 11-12 100 IM");
        assert_eq!(event_name("", 13, 14, 50, "D", false), "Girls 13-14 50 Fly");
    }

    #[test]
    fn test_pad_time_statistics() {
        let mut fields = sample_fields();
        fields.pad_times = [Some(28.5), None, Some(28.9)];
        let entry = Participation::new(fields);

        assert_eq!(entry.num_pad_times(), 2);
        assert_eq!(entry.min_pad_time(), Some(28.5));
        assert_eq!(entry.max_pad_time(), Some(28.9));
        let spread = entry.pad_time_spread().unwrap();
        assert!((spread - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_zero_pad_times_are_absent() {
        let mut fields = sample_fields();
        fields.pad_times = [Some(0.0), None, Some(0.0)];
        let entry = Participation::new(fields);

        assert_eq!(entry.num_pad_times(), 0);
        assert_eq!(entry.min_pad_time(), None);
        assert_eq!(entry.max_pad_time(), None);
        assert_eq!(entry.pad_time_spread(), None);
    }

    #[test]
    fn test_popped_by_and_zero_seed() {
        let mut fields = sample_fields();
        fields.seed_time = Some(30.0);
        fields.finish_time = Some(28.5);
        let entry = Participation::new(fields.clone());
        assert_eq!(entry.popped_by(), Some(1.5));

        // Slower than seed is a negative pop
        fields.finish_time = Some(31.0);
        assert_eq!(Participation::new(fields.clone()).popped_by(), Some(-1.0));

        fields.seed_time = Some(0.0);
        let entry = Participation::new(fields);
        assert_eq!(entry.seed_time(), None);
        assert_eq!(entry.popped_by(), None);
    }

    #[test]
    fn test_display_names() {
        let mut fields = sample_fields();
        assert_eq!(Participation::new(fields.clone()).display_name(), "Smith, Anna");

        fields.competitor = Competitor::Individual {
            last_name: "Smith".to_string(),
            first_name: "Annabelle".to_string(),
            preferred_name: Some("Belle".to_string()),
        };
        assert_eq!(Participation::new(fields.clone()).display_name(), "Smith, Belle");

        fields.competitor = Competitor::Individual {
            last_name: "Smith".to_string(),
            first_name: "Annabelle".to_string(),
            preferred_name: Some("  ".to_string()),
        };
        assert_eq!(Participation::new(fields.clone()).display_name(), "Smith, Annabelle");

        fields.competitor = Competitor::Relay {
            team_name: Some("Sharks".to_string()),
            team_letter: Some("A".to_string()),
        };
        assert_eq!(Participation::new(fields.clone()).display_name(), "Sharks A");

        fields.competitor = Competitor::Relay {
            team_name: None,
            team_letter: Some("B".to_string()),
        };
        assert_eq!(Participation::new(fields).display_name(), "SHRK B");
    }

    #[test]
    fn test_update_recomputes() {
        let mut entry = Participation::new(sample_fields());
        assert_eq!(entry.num_pad_times(), 0);

        entry.update(|raw| {
            raw.pad_times = [Some(30.1), Some(30.2), Some(30.4)];
            raw.ind_rel = "R".to_string();
        });
        assert_eq!(entry.num_pad_times(), 3);
        assert!(entry.is_relay());
        assert_eq!(entry.event_name(), "Girls 9-10 50 Free Relay");
    }

    #[test]
    fn test_finish_status_codes() {
        assert_eq!(FinishStatus::from_code(None), FinishStatus::Normal);
        assert_eq!(FinishStatus::from_code(Some(" R ")), FinishStatus::NoShow);
        assert!(FinishStatus::from_code(Some("Q")).is_disqualified());
        assert_eq!(FinishStatus::from_code(Some("D")).code(), "D");
    }
}
