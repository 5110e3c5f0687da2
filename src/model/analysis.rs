use std::{collections::BTreeMap, time::Instant};

use chrono::Local;
use tracing::{info, warn};

use crate::{
    database::db_structs::{AnalysisMetadata, AnalysisOutput, AthletesData, EventSummary, ResultsData},
    model::{
        glicko_model::GlickoModel,
        head_to_head::generate_head_to_head,
        period::attach_dates,
        structures::event_importance::EventImportance,
        timeline::{generate_timeline, monthly_top}
    }
};

/// Athletes shown in the closing leaderboard log
const LEADERBOARD_LOG_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Registry gender to rate; `None` rates everyone
    pub gender: Option<String>,
    /// Rate only the first N athletes of the registry
    pub limit_athletes: Option<usize>,
    /// Size of each monthly leaderboard
    pub top: usize
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            gender: None,
            limit_athletes: None,
            top: 10
        }
    }
}

/// Runs the full pipeline over in-memory results: rates the selected population month by
/// month, then derives the reports that go into the output document.
pub fn analyze(results: &ResultsData, athletes: &AthletesData, options: &AnalysisOptions) -> AnalysisOutput {
    let start = Instant::now();
    let date_analyzed = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let population = athletes.population(options.gender.as_deref(), options.limit_athletes);
    info!(
        athletes = population.len(),
        results = results.results.len(),
        events = results.events.len(),
        "Loaded analysis input"
    );

    let (dated, dropped) = attach_dates(results);
    if dropped > 0 {
        info!(dropped, "Dropped results without a resolvable date, athlete, heat or finish");
    }

    let mut model = GlickoModel::new(&population);
    let summaries = model.process(dated);

    let degraded: usize = summaries.iter().map(|s| s.degraded).sum();
    if degraded > 0 {
        warn!(degraded, "Some volatility solves were unstable and kept the prior volatility");
    }

    for standing in model.rating_tracker.leaderboard().iter().take(LEADERBOARD_LOG_SIZE) {
        info!(
            rank = standing.rank,
            athlete = %athletes.name_of(standing.rating.athlete_id),
            rating = standing.rating.rating,
            rd = standing.rating.rating_deviation,
            "Leaderboard"
        );
    }

    let head_to_head = generate_head_to_head(results, athletes);
    info!(pairs = head_to_head.len(), "Generated head-to-head statistics");

    let timeline = generate_timeline(model.rating_tracker.ratings(), athletes);
    let monthly_top = monthly_top(&timeline, options.top);

    let athlete_ratings: BTreeMap<_, _> = model
        .rating_tracker
        .get_post_data()
        .into_iter()
        .map(|r| (r.athlete_id, r))
        .collect();

    let elapsed = start.elapsed().as_secs();
    let metadata = AnalysisMetadata {
        date_analyzed,
        athlete_count: population.len(),
        rated_athlete_count: athlete_ratings.values().filter(|r| r.races_completed > 0).count(),
        event_count: results.events.len(),
        result_count: results.results.len(),
        dropped_result_count: dropped,
        period_count: summaries.len(),
        head_to_head_count: head_to_head.len(),
        processing_time: format!("{}m {}s", elapsed / 60, elapsed % 60)
    };

    AnalysisOutput {
        athlete_ratings,
        timeline,
        head_to_head,
        monthly_top,
        events: event_summaries(results),
        metadata
    }
}

/// Every event with an integer id, classified by title.
pub fn event_summaries(results: &ResultsData) -> Vec<EventSummary> {
    results
        .event_lookup()
        .into_iter()
        .map(|(event_id, event)| EventSummary {
            event_id,
            title: event.title_or_default().to_string(),
            date: event.parsed_date(),
            importance: EventImportance::from_title(event.title.as_deref().unwrap_or_default())
        })
        .collect()
}
