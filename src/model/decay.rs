use crate::{
    database::db_structs::{AthleteRating, RatingAdjustment},
    model::{
        constants::{RD_CEILING, RD_FLOOR, SCALE_FACTOR},
        structures::{rating_adjustment_type::RatingAdjustmentType::Decay, rating_period::RatingPeriod}
    }
};
use chrono::NaiveDate;

/// # How this works
/// - This gets called once per period, after the period's updates are committed, for
///     every athlete who faced no opponent in it.
/// - The athlete's rating and volatility are untouched.
/// - The deviation grows as `sqrt(RD² + (scale·σ)²)` and is clamped to the RD bounds.
///
/// Returns a record of the inflation, tagged [`Decay`], or `None` when the deviation
/// could not grow (already at the ceiling). The record is not added to the athlete's
/// history.
pub fn decay(athlete_rating: &mut AthleteRating, period: RatingPeriod, as_of: NaiveDate) -> Option<RatingAdjustment> {
    if decay_impossible(athlete_rating) {
        return None;
    }

    let rd_before = athlete_rating.rating_deviation;
    let rd_after = decay_deviation(rd_before, athlete_rating.volatility);
    athlete_rating.rating_deviation = rd_after;

    Some(RatingAdjustment {
        period,
        date: as_of,
        label: period.label(),
        rating_before: athlete_rating.rating,
        rating_after: athlete_rating.rating,
        rd_before,
        rd_after,
        volatility_before: athlete_rating.volatility,
        volatility_after: athlete_rating.volatility,
        rating_delta: 0.0,
        opponents_faced: 0,
        adjustment_type: Decay
    })
}

/// The deviation after one period without competition, on the external scale.
pub fn decay_deviation(rd: f64, sigma: f64) -> f64 {
    let new_rd = (rd.powi(2) + (SCALE_FACTOR * sigma).powi(2)).sqrt();

    new_rd.clamp(RD_FLOOR, RD_CEILING)
}

fn decay_impossible(athlete_rating: &AthleteRating) -> bool {
    athlete_rating.rating_deviation >= RD_CEILING
}
