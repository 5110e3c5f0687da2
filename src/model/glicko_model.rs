use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::{
    database::db_structs::RatingAdjustment,
    model::{
        decay::decay,
        glicko2::{rate, MatchOutcome, RatingState},
        matchups::heat_pairings,
        period::{bucket_by_period, DatedResult, PeriodBatch},
        rating_tracker::RatingTracker,
        structures::{rating_adjustment_type::RatingAdjustmentType, rating_period::RatingPeriod}
    },
    utils::progress_utils::progress_bar
};

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Period {period} is not after the last processed period {last}")]
    PeriodOutOfOrder { period: RatingPeriod, last: RatingPeriod }
}

/// What happened to the population during one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: RatingPeriod,
    pub as_of: NaiveDate,
    /// Athletes who faced at least one opponent
    pub participants: usize,
    /// Pairwise matches derived from the period's heats
    pub matches: usize,
    pub decayed: usize,
    /// Participants whose volatility solve fell back to the prior value
    pub degraded: usize
}

/// The score of one athlete against one opponent, by opponent id.
type Opponents = Vec<(i32, f64)>;

pub struct GlickoModel {
    pub rating_tracker: RatingTracker
}

impl GlickoModel {
    pub fn new(population: &[i32]) -> GlickoModel {
        GlickoModel {
            rating_tracker: RatingTracker::with_population(population)
        }
    }

    /// Rates a full set of results. The results are bucketed into months and processed in
    /// chronological order regardless of the order they are given in.
    ///
    /// Months not after the last period already processed are skipped with a warning.
    pub fn process(&mut self, results: Vec<DatedResult>) -> Vec<PeriodSummary> {
        let batches = bucket_by_period(results);
        let span = progress_bar(batches.len() as u64, "Processing rating periods");
        let _enter = span.enter();

        let mut summaries = Vec::with_capacity(batches.len());
        for batch in &batches {
            match self.process_period(batch) {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!("Skipping period: {}", e)
            }

            span.pb_inc(1);
        }

        info!(
            periods = summaries.len(),
            athletes = self.rating_tracker.len(),
            "Finished processing rating periods"
        );

        summaries
    }

    /// # Period Processing
    ///
    /// Applies one month of results as a single simultaneous Glicko-2 update.
    ///
    /// Steps:
    /// 1. Derive the pairwise outcomes of every heat, leaving out athletes the tracker
    ///     does not know.
    /// 2. Freeze the pre-period state of every participant. All expectations in the
    ///     period are computed against this snapshot only.
    /// 3. Rate every participant against its full list of opponents (in parallel).
    /// 4. Commit all transitions at once, then inflate the deviation of every athlete
    ///     who did not compete.
    pub fn process_period(&mut self, batch: &PeriodBatch) -> Result<PeriodSummary, ModelError> {
        if let Some(last) = self.rating_tracker.last_period() {
            if batch.period <= last {
                return Err(ModelError::PeriodOutOfOrder {
                    period: batch.period,
                    last
                });
            }
        }

        let (opponents, matches) = self.collect_opponents(batch);
        let snapshot = self.rating_tracker.snapshot(opponents.keys());

        let transitions: Vec<(i32, RatingAdjustment, bool)> = opponents
            .into_iter()
            .collect::<Vec<_>>()
            .par_iter()
            .filter_map(|(athlete_id, faced)| {
                Self::transition(*athlete_id, faced, &snapshot, batch).map(|(a, degraded)| (*athlete_id, a, degraded))
            })
            .collect();

        let degraded = transitions.iter().filter(|(_, _, degraded)| *degraded).count();
        for (athlete_id, _, _) in transitions.iter().filter(|(_, _, degraded)| *degraded) {
            debug!(
                athlete_id,
                period = %batch.period,
                "Volatility solve was unstable; kept the prior volatility"
            );
        }

        let participants = transitions.len();
        self.rating_tracker.commit(
            batch.period,
            transitions.into_iter().map(|(id, adjustment, _)| (id, adjustment)).collect()
        );

        let decayed = self.apply_decay(batch, &snapshot).len();

        debug!(
            period = %batch.period,
            participants,
            matches,
            decayed,
            "Committed rating period"
        );

        Ok(PeriodSummary {
            period: batch.period,
            as_of: batch.as_of,
            participants,
            matches,
            decayed,
            degraded
        })
    }

    /// Builds each known athlete's list of opponents for the period. Returns the lists in
    /// first-seen order along with the number of pairwise matches derived.
    fn collect_opponents(&self, batch: &PeriodBatch) -> (IndexMap<i32, Opponents>, usize) {
        let mut opponents: IndexMap<i32, Opponents> = IndexMap::new();
        let mut matches = 0;

        for heat in &batch.heats {
            for pair in heat_pairings(&heat.entries, |id| self.rating_tracker.contains(id)) {
                opponents.entry(pair.ahead).or_default().push((pair.behind, pair.score));
                opponents
                    .entry(pair.behind)
                    .or_default()
                    .push((pair.ahead, pair.behind_score()));
                matches += 1;
            }
        }

        (opponents, matches)
    }

    /// Rates one athlete from the frozen snapshot. Returns the history entry and whether
    /// the volatility solve degraded.
    fn transition(
        athlete_id: i32,
        faced: &Opponents,
        snapshot: &HashMap<i32, RatingState>,
        batch: &PeriodBatch
    ) -> Option<(RatingAdjustment, bool)> {
        let before = *snapshot.get(&athlete_id)?;
        let outcomes: Vec<MatchOutcome> = faced
            .iter()
            .filter_map(|(opponent_id, score)| {
                snapshot.get(opponent_id).map(|opponent| {
                    let internal = opponent.internal();
                    MatchOutcome {
                        mu: internal.mu,
                        phi: internal.phi,
                        score: *score
                    }
                })
            })
            .collect();

        let rated = rate(before, &outcomes);

        Some((
            RatingAdjustment {
                period: batch.period,
                date: batch.as_of,
                label: batch.period.label(),
                rating_before: before.rating,
                rating_after: rated.state.rating,
                rd_before: before.rating_deviation,
                rd_after: rated.state.rating_deviation,
                volatility_before: before.volatility,
                volatility_after: rated.state.volatility,
                rating_delta: rated.state.rating - before.rating,
                opponents_faced: rated.opponents as u32,
                adjustment_type: RatingAdjustmentType::PeriodUpdate
            },
            rated.solve.is_degraded()
        ))
    }

    /// Inflates the deviation of every tracked athlete who was not part of the snapshot.
    /// Returns the decay records by athlete id; they are logged, not kept in history.
    fn apply_decay(
        &mut self,
        batch: &PeriodBatch,
        participants: &HashMap<i32, RatingState>
    ) -> Vec<(i32, RatingAdjustment)> {
        let decayed: Vec<(i32, RatingAdjustment)> = self
            .rating_tracker
            .ratings_mut()
            .filter(|rating| !participants.contains_key(&rating.athlete_id))
            .filter_map(|rating| {
                let athlete_id = rating.athlete_id;
                decay(rating, batch.period, batch.as_of).map(|adjustment| (athlete_id, adjustment))
            })
            .collect();

        for (athlete_id, adjustment) in &decayed {
            debug!(
                athlete_id,
                period = %batch.period,
                rd_before = adjustment.rd_before,
                rd_after = adjustment.rd_after,
                "Inflated deviation of inactive athlete"
            );
        }

        decayed
    }
}
