use approx::assert_abs_diff_eq;
use tri_rating::{
    model::{
        constants::{
            RATING_CEILING, RATING_FLOOR, RD_CEILING, RD_FLOOR, SCALE_FACTOR, VOLATILITY_CEILING, VOLATILITY_FLOOR
        },
        glicko_model::GlickoModel,
        matchups::heat_pairings,
        period::{attach_dates, bucket_by_period},
        structures::rating_adjustment_type::RatingAdjustmentType
    },
    utils::test_utils::generate_season
};

use crate::common::init_test_env;

fn rated_season(seed: u64) -> GlickoModel {
    let data = generate_season(40, 12, 4, 10, seed);
    let (dated, _) = attach_dates(&data);
    let population: Vec<i32> = (1..=40).collect();

    let mut model = GlickoModel::new(&population);
    model.process(dated);
    model
}

#[test]
fn test_outputs_stay_within_bounds() {
    init_test_env();
    for seed in [1, 2, 3] {
        let model = rated_season(seed);

        for rating in model.rating_tracker.ratings() {
            assert!(rating.rating >= RATING_FLOOR && rating.rating <= RATING_CEILING);
            assert!(rating.rating_deviation >= RD_FLOOR && rating.rating_deviation <= RD_CEILING);
            assert!(rating.volatility >= VOLATILITY_FLOOR && rating.volatility <= VOLATILITY_CEILING);

            for adjustment in &rating.history {
                assert!(adjustment.rating_delta.abs() <= 100.0 + 1e-9);
                assert!(adjustment.rating_after.is_finite());
            }
        }
    }
}

#[test]
fn test_deviation_never_exceeds_inflated_prior() {
    init_test_env();
    let model = rated_season(11);

    for rating in model.rating_tracker.ratings() {
        for adjustment in &rating.history {
            let inflated = (adjustment.rd_before.powi(2) + (SCALE_FACTOR * adjustment.volatility_after).powi(2)).sqrt();
            assert!(adjustment.rd_after <= inflated + 1e-9);
        }
    }
}

#[test]
fn test_history_is_chronological_and_chained() {
    init_test_env();
    let model = rated_season(5);

    for rating in model.rating_tracker.ratings() {
        for window in rating.history.windows(2) {
            assert!(window[0].period < window[1].period);
            assert!(window[0].date < window[1].date);
            assert_eq!(window[0].rating_after, window[1].rating_before);
            assert_eq!(window[0].volatility_after, window[1].volatility_before);
            // Decay between entries can only widen the deviation
            assert!(window[1].rd_before >= window[0].rd_after);
        }

        assert!(rating
            .history
            .iter()
            .all(|a| a.adjustment_type == RatingAdjustmentType::PeriodUpdate));
        assert_eq!(
            rating.races_completed,
            rating.history.iter().map(|a| a.opponents_faced).sum::<u32>()
        );
    }
}

#[test]
fn test_pairwise_scores_are_symmetric() {
    init_test_env();
    let data = generate_season(30, 6, 5, 12, 9);
    let (dated, _) = attach_dates(&data);

    for batch in bucket_by_period(dated) {
        for heat in &batch.heats {
            for pair in heat_pairings(&heat.entries, |_| true) {
                assert_abs_diff_eq!(pair.score + pair.behind_score(), 1.0);
                assert_ne!(pair.ahead, pair.behind);
            }
        }
    }
}

#[test]
fn test_identical_input_gives_identical_output() {
    init_test_env();
    let first = rated_season(21);
    let second = rated_season(21);

    for (a, b) in first.rating_tracker.ratings().zip(second.rating_tracker.ratings()) {
        assert_eq!(a.athlete_id, b.athlete_id);
        assert_eq!(a.rating, b.rating);
        assert_eq!(a.rating_deviation, b.rating_deviation);
        assert_eq!(a.volatility, b.volatility);
    }
}
