use crate::model::{
    constants::{DEFAULT_RATING, DEFAULT_RD, DEFAULT_VOLATILITY},
    structures::{
        event_importance::EventImportance, rating_adjustment_type::RatingAdjustmentType, rating_period::RatingPeriod
    }
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Accepts integers, integral floats and numeric strings. Anything else (including
/// markers such as `"DNF"`) becomes `None`.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        _ => None
    })
}

// Results source

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>
}

impl Event {
    /// Parses the leading `YYYY-MM-DD` of the event date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        let day = raw.get(..10).unwrap_or(raw);

        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Event")
    }
}

/// One athlete's result in one program (race heat) of an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceResult {
    #[serde(default, deserialize_with = "lenient_int")]
    pub athlete_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub event_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub prog_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub position: Option<i32>,
    #[serde(default)]
    pub status: Option<String>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsData {
    /// Keyed by event id as it appears in the source file
    #[serde(default)]
    pub events: IndexMap<String, Event>,
    #[serde(default)]
    pub results: Vec<RaceResult>
}

impl ResultsData {
    /// Event ids are stored as strings in the source file; this resolves them by integer id.
    pub fn event_lookup(&self) -> BTreeMap<i32, &Event> {
        self.events
            .iter()
            .filter_map(|(id, event)| id.trim().parse::<i32>().ok().map(|id| (id, event)))
            .collect()
    }
}

// Athlete registry

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteDetails {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub country: Option<String>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Athlete {
    #[serde(default)]
    pub details: Option<AthleteDetails>
}

impl Athlete {
    pub fn full_name(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.full_name.as_deref())
    }

    pub fn gender(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.gender.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthletesData {
    #[serde(default)]
    pub athletes: IndexMap<String, Athlete>
}

impl AthletesData {
    /// Ids of the athletes to rate, in registry order. `gender` filters case-insensitively;
    /// `limit` keeps only the first N matching athletes.
    pub fn population(&self, gender: Option<&str>, limit: Option<usize>) -> Vec<i32> {
        self.athletes
            .iter()
            .filter(|(_, athlete)| match gender {
                Some(g) => athlete.gender().is_some_and(|a| a.eq_ignore_ascii_case(g)),
                None => true
            })
            .filter_map(|(id, _)| id.trim().parse::<i32>().ok())
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    pub fn name_of(&self, athlete_id: i32) -> String {
        self.athletes
            .get(&athlete_id.to_string())
            .and_then(|a| a.full_name())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Athlete {}", athlete_id))
    }
}

// Rating output

/// The Glicko-2 state of one athlete, in the external (human-readable) scale,
/// together with the log of every period that changed it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AthleteRating {
    pub athlete_id: i32,
    pub initial: f64,
    #[serde(rename = "current")]
    pub rating: f64,
    #[serde(rename = "current_rd")]
    pub rating_deviation: f64,
    #[serde(rename = "current_volatility")]
    pub volatility: f64,
    pub races_completed: u32,
    /// Append-only, in non-decreasing period order
    pub history: Vec<RatingAdjustment>
}

impl AthleteRating {
    pub fn new(athlete_id: i32) -> AthleteRating {
        AthleteRating {
            athlete_id,
            initial: DEFAULT_RATING,
            rating: DEFAULT_RATING,
            rating_deviation: DEFAULT_RD,
            volatility: DEFAULT_VOLATILITY,
            races_completed: 0,
            history: Vec::new()
        }
    }
}

/// One period transition of an athlete's rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingAdjustment {
    pub period: RatingPeriod,
    /// Last event date in the period's results
    pub date: NaiveDate,
    pub label: String,
    pub rating_before: f64,
    pub rating_after: f64,
    pub rd_before: f64,
    pub rd_after: f64,
    pub volatility_before: f64,
    pub volatility_after: f64,
    #[serde(rename = "change")]
    pub rating_delta: f64,
    pub opponents_faced: u32,
    #[serde(rename = "status")]
    pub adjustment_type: RatingAdjustmentType
}

// Reports

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub rating: f64
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AthleteTimeline {
    pub name: String,
    pub initial_rating: f64,
    pub final_rating: f64,
    pub timeline: Vec<TimelinePoint>
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyLeader {
    pub athlete_id: i32,
    pub full_name: String,
    pub rating: f64,
    pub date: NaiveDate
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    pub event_id: i32,
    pub prog_id: i32,
    pub event_title: String,
    pub event_date: Option<String>,
    pub winner_id: i32,
    pub winner_position: i32,
    pub loser_id: i32,
    pub loser_position: i32
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadToHead {
    pub athlete1_id: i32,
    pub athlete1_name: String,
    pub athlete2_id: i32,
    pub athlete2_name: String,
    pub encounters: u32,
    pub athlete1_wins: u32,
    pub athlete2_wins: u32,
    pub meetings: Vec<Meeting>
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventSummary {
    pub event_id: i32,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub importance: EventImportance
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisMetadata {
    pub date_analyzed: String,
    pub athlete_count: usize,
    pub rated_athlete_count: usize,
    pub event_count: usize,
    pub result_count: usize,
    pub dropped_result_count: usize,
    pub period_count: usize,
    pub head_to_head_count: usize,
    pub processing_time: String
}

/// Everything the processor produces for the sinks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub athlete_ratings: BTreeMap<i32, AthleteRating>,
    pub timeline: BTreeMap<i32, AthleteTimeline>,
    pub head_to_head: BTreeMap<String, HeadToHead>,
    pub monthly_top: BTreeMap<RatingPeriod, Vec<MonthlyLeader>>,
    pub events: Vec<EventSummary>,
    pub metadata: AnalysisMetadata
}
