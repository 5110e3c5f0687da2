//! Glicko-2 equations on the internal rating axis.
//!
//! Every function here is pure: callers convert with [`to_internal`] / [`to_external`]
//! at the boundary and pass all state explicitly.
use crate::model::constants::{
    DEFAULT_RATING, EPSILON, EXPONENT_LIMIT, INFORMATION_FLOOR, MAX_ITERATIONS, MAX_RATING_CHANGE,
    NEGLIGIBLE_DELTA, PHI_FLOOR, RATING_CEILING, RATING_FLOOR, RD_CEILING, RD_FLOOR, SCALE_FACTOR,
    SLOPE_FLOOR, SOLVED_VOLATILITY_CEILING, TAU, VARIANCE_CEILING, VOLATILITY_CEILING, VOLATILITY_FLOOR
};
use std::f64::consts::PI;

/// Rating (μ) and deviation (φ) on the internal scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalRating {
    pub mu: f64,
    pub phi: f64
}

/// A rating, deviation and volatility on the external scale, as stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingState {
    pub rating: f64,
    pub rating_deviation: f64,
    pub volatility: f64
}

impl RatingState {
    pub fn internal(&self) -> InternalRating {
        to_internal(self.rating, self.rating_deviation)
    }
}

/// One opponent faced during a period: their frozen pre-period μ/φ and the score
/// obtained against them (1 win, 0.5 draw, 0 loss).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub mu: f64,
    pub phi: f64,
    pub score: f64
}

/// How the new volatility was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolatilitySolve {
    /// The Illinois iteration closed the bracket within ε.
    Converged(f64),
    /// The iteration cap was hit; the bracket midpoint is used.
    Exhausted(f64),
    /// Nothing to solve (no information, or a negligible Δ); σ is unchanged.
    Skipped(f64),
    /// A non-finite intermediate or out-of-range result; σ is unchanged.
    Degraded(f64)
}

impl VolatilitySolve {
    pub fn value(&self) -> f64 {
        match *self {
            VolatilitySolve::Converged(s)
            | VolatilitySolve::Exhausted(s)
            | VolatilitySolve::Skipped(s)
            | VolatilitySolve::Degraded(s) => s
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, VolatilitySolve::Degraded(_))
    }
}

/// The result of rating one athlete over one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodRating {
    pub state: RatingState,
    pub solve: VolatilitySolve,
    pub opponents: usize
}

pub fn to_internal(rating: f64, rd: f64) -> InternalRating {
    InternalRating {
        mu: (rating - DEFAULT_RATING) / SCALE_FACTOR,
        phi: rd / SCALE_FACTOR
    }
}

/// Returns `(rating, rd)` on the external scale.
pub fn to_external(mu: f64, phi: f64) -> (f64, f64) {
    (mu * SCALE_FACTOR + DEFAULT_RATING, phi * SCALE_FACTOR)
}

pub fn g(phi: f64) -> f64 {
    let phi = phi.max(PHI_FLOOR);
    1.0 / (1.0 + 3.0 * phi.powi(2) / PI.powi(2)).sqrt()
}

/// Expected score of a player rated `mu` against an opponent rated `mu_j` with deviation `phi_j`.
pub fn expected_score(mu: f64, mu_j: f64, phi_j: f64) -> f64 {
    let exponent = -g(phi_j) * (mu - mu_j);

    if exponent > EXPONENT_LIMIT {
        return 0.0;
    }
    if exponent < -EXPONENT_LIMIT {
        return 1.0;
    }

    1.0 / (1.0 + exponent.exp())
}

/// Estimated variance of the player's rating from game outcomes alone.
///
/// Infinite when the matches carry no information, then capped at [`VARIANCE_CEILING`].
pub fn variance(mu: f64, matches: &[MatchOutcome]) -> f64 {
    let information: f64 = matches
        .iter()
        .map(|m| {
            let e = expected_score(mu, m.mu, m.phi);
            g(m.phi).powi(2) * e * (1.0 - e)
        })
        .sum();

    let v = if information.abs() < INFORMATION_FLOOR {
        f64::INFINITY
    } else {
        1.0 / information
    };

    v.min(VARIANCE_CEILING)
}

/// `Σ g(φⱼ)·(sⱼ − E)` over the period's matches.
pub fn performance(mu: f64, matches: &[MatchOutcome]) -> f64 {
    matches
        .iter()
        .map(|m| g(m.phi) * (m.score - expected_score(mu, m.mu, m.phi)))
        .sum()
}

/// Estimated improvement Δ over the period.
pub fn delta(mu: f64, matches: &[MatchOutcome], v: f64) -> f64 {
    v * performance(mu, matches)
}

/// Solves for the new volatility σ′ with the Illinois variant of regula falsi.
pub fn solve_volatility(phi: f64, v: f64, delta: f64, sigma: f64, tau: f64, epsilon: f64) -> VolatilitySolve {
    if v.is_infinite() || delta.abs() < NEGLIGIBLE_DELTA {
        return VolatilitySolve::Skipped(sigma);
    }

    let a = (sigma * sigma).ln();
    if !a.is_finite() {
        return VolatilitySolve::Degraded(sigma);
    }

    let phi_sq = phi * phi;
    let delta_sq = delta * delta;
    let f = |x: f64| {
        let ex = x.exp();
        let denom = (2.0 * (phi_sq + v + ex).powi(2)).max(SLOPE_FLOOR);
        (ex * (delta_sq - phi_sq - v - ex)) / denom - (x - a) / (tau * tau)
    };

    let mut big_a = a;
    let mut big_b = if delta_sq > phi_sq + v {
        (delta_sq - phi_sq - v).ln()
    } else {
        let mut k = 1.0;
        while f(a - k * tau) < 0.0 && k < MAX_ITERATIONS as f64 {
            k += 1.0;
        }
        a - k * tau
    };

    if !big_b.is_finite() {
        return VolatilitySolve::Degraded(sigma);
    }

    let mut f_a = f(big_a);
    let mut f_b = f(big_b);
    if !(f_a.is_finite() && f_b.is_finite()) {
        return VolatilitySolve::Degraded(sigma);
    }

    let mut iterations = 0;
    while (big_b - big_a).abs() > epsilon && iterations < MAX_ITERATIONS {
        let mut c = if (f_b - f_a).abs() < SLOPE_FLOOR {
            (big_a + big_b) / 2.0
        } else {
            big_a + (big_a - big_b) * f_a / (f_b - f_a)
        };
        let mut f_c = f(c);

        if !f_c.is_finite() {
            c = (big_a + big_b) / 2.0;
            f_c = f(c);
            if !f_c.is_finite() {
                return VolatilitySolve::Degraded(sigma);
            }
        }

        if f_c * f_b <= 0.0 {
            big_a = big_b;
            f_a = f_b;
        } else {
            f_a /= 2.0;
        }

        big_b = c;
        f_b = f_c;
        iterations += 1;
    }

    let (result, exhausted) = if iterations >= MAX_ITERATIONS {
        (((big_a + big_b) / 4.0).exp(), true)
    } else {
        ((big_a / 2.0).exp(), false)
    };

    if !(VOLATILITY_FLOOR..=SOLVED_VOLATILITY_CEILING).contains(&result) {
        return VolatilitySolve::Degraded(sigma);
    }

    if exhausted {
        VolatilitySolve::Exhausted(result)
    } else {
        VolatilitySolve::Converged(result)
    }
}

/// Applies the new volatility and the period's performance to μ and φ.
pub fn update(current: InternalRating, v: f64, performance: f64, sigma_new: f64) -> InternalRating {
    let phi_star = (current.phi.powi(2) + sigma_new.powi(2)).sqrt();
    let phi = if v.is_finite() {
        1.0 / (1.0 / phi_star.powi(2) + 1.0 / v).sqrt()
    } else {
        phi_star
    };

    InternalRating {
        mu: current.mu + phi.powi(2) * performance,
        phi
    }
}

/// Rates one athlete for one period against every opponent faced in it.
///
/// `current` is the athlete's pre-period state and `matches` carries the opponents'
/// pre-period values. The rating change is limited to ±[`MAX_RATING_CHANGE`] before the
/// absolute rating, deviation and volatility bounds are applied.
pub fn rate(current: RatingState, matches: &[MatchOutcome]) -> PeriodRating {
    if matches.is_empty() {
        return PeriodRating {
            state: current,
            solve: VolatilitySolve::Skipped(current.volatility),
            opponents: 0
        };
    }

    let internal = current.internal();
    let v = variance(internal.mu, matches);
    let performance = performance(internal.mu, matches);
    let delta = v * performance;

    let solve = solve_volatility(internal.phi, v, delta, current.volatility, TAU, EPSILON);
    let volatility = solve.value().clamp(VOLATILITY_FLOOR, VOLATILITY_CEILING);

    let updated = update(internal, v, performance, volatility);
    let (rating, rating_deviation) = to_external(updated.mu, updated.phi);

    let change = (rating - current.rating).clamp(-MAX_RATING_CHANGE, MAX_RATING_CHANGE);
    let rating = (current.rating + change).clamp(RATING_FLOOR, RATING_CEILING);

    PeriodRating {
        state: RatingState {
            rating,
            rating_deviation: rating_deviation.clamp(RD_FLOOR, RD_CEILING),
            volatility
        },
        solve,
        opponents: matches.len()
    }
}
