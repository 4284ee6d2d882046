use super::{InterpError, check_knots, interval};

/// Piecewise linear interpolation that holds the end values outside the
/// knot range.
pub fn interp_clamped(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    check_knots(xs, ys, 1)?;

    let n = xs.len();
    if x <= xs[0] {
        return Ok(ys[0]);
    }
    if x >= xs[n - 1] {
        return Ok(ys[n - 1]);
    }

    Ok(lerp(x, xs, ys, interval(xs, x)))
}

/// Piecewise linear interpolation that rejects points outside the knot range.
pub fn interp_bounded(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    check_knots(xs, ys, 2)?;

    let (lo, hi) = (xs[0], xs[xs.len() - 1]);
    if !(lo..=hi).contains(&x) {
        return Err(InterpError::OutOfBounds(x, lo, hi));
    }

    Ok(lerp(x, xs, ys, interval(xs, x)))
}

fn lerp(x: f64, xs: &[f64], ys: &[f64], i: usize) -> f64 {
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + t * (ys[i + 1] - ys[i])
}
