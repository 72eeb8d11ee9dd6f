pub const NUMERIC_TOLERANCE: f64 = 1e-5;
pub const SIMPLEX_TOLERANCE: f64 = 1e-5;

/// Margin under which two AdaBoost.MH label weights are considered equal.
pub const MU_TOLERANCE:      f64 = 1e-9;
