//! One-dimensional interpolation kernels used by the effective area models.

pub mod linear;
pub mod spline;

pub use linear::{interp_bounded, interp_clamped};
pub use spline::CubicSpline;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least {0} points")]
    InsufficientData(usize),
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be strictly increasing")]
    UnsortedData,
}

/// Checks that `xs` and `ys` describe a usable knot table.
pub fn check_knots(xs: &[f64], ys: &[f64], min_points: usize) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }
    if xs.len() < min_points {
        return Err(InterpError::InsufficientData(min_points));
    }
    if !is_strictly_increasing(xs) {
        return Err(InterpError::UnsortedData);
    }
    Ok(())
}

pub fn is_strictly_increasing(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[0] < w[1])
}

/// Index `i` of the interval `[xs[i], xs[i + 1]]` holding `x`.
///
/// `xs` must be strictly increasing with at least two points; `x` is assumed
/// to be inside `[xs[0], xs[n - 1]]`. The last knot maps to the last interval.
fn interval(xs: &[f64], x: f64) -> usize {
    let upper = xs.partition_point(|&knot| knot <= x);
    upper.saturating_sub(1).min(xs.len() - 2)
}
