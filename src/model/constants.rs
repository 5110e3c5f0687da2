// Glicko-2 scale
pub const SCALE_FACTOR: f64 = 173.7178;
pub const DEFAULT_RATING: f64 = 1500.0;
pub const DEFAULT_RD: f64 = 350.0;
pub const DEFAULT_VOLATILITY: f64 = 0.06;

// Volatility solver
pub const TAU: f64 = 0.5;
pub const EPSILON: f64 = 0.000001;
pub const MAX_ITERATIONS: usize = 100;
pub const NEGLIGIBLE_DELTA: f64 = 0.0001;
pub const SOLVED_VOLATILITY_CEILING: f64 = 1.0;

// Numerical guards
pub const PHI_FLOOR: f64 = 0.0001;
pub const EXPONENT_LIMIT: f64 = 700.0;
pub const VARIANCE_CEILING: f64 = 100.0;
pub const INFORMATION_FLOOR: f64 = 1e-12;
pub const SLOPE_FLOOR: f64 = 1e-10;

// Bounds applied after every period update
pub const MAX_RATING_CHANGE: f64 = 100.0;
pub const RATING_FLOOR: f64 = 100.0;
pub const RATING_CEILING: f64 = 5000.0;
pub const RD_FLOOR: f64 = 10.0;
pub const RD_CEILING: f64 = 500.0;
pub const VOLATILITY_FLOOR: f64 = 0.0001;
pub const VOLATILITY_CEILING: f64 = 0.15;
