use super::{InterpError, check_knots, interval};

/// Cubic spline with not-a-knot end conditions: the third derivative is
/// continuous across the second and the second-to-last knots, so four or
/// more samples of a cubic polynomial reproduce it exactly.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    m: Vec<f64>,
}

impl CubicSpline {
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, InterpError> {
        check_knots(xs, ys, 4)?;

        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        // Interior rows i = 1..=n-2 of the moment equations, written for the
        // unknowns m[1..=n-2] after eliminating m[0] and m[n-1] with the
        // not-a-knot conditions.
        let size = n - 2;
        let mut sub = vec![0.0; size];
        let mut diag = vec![0.0; size];
        let mut sup = vec![0.0; size];
        let mut rhs = vec![0.0; size];

        for row in 0..size {
            let i = row + 1;
            sub[row] = h[i - 1];
            diag[row] = 2.0 * (h[i - 1] + h[i]);
            sup[row] = h[i];
            rhs[row] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
        }

        // m[0] = ((h0 + h1) m[1] - h0 m[2]) / h1
        let (h0, h1) = (h[0], h[1]);
        diag[0] += h0 * (h0 + h1) / h1;
        sup[0] -= h0 * h0 / h1;
        sub[0] = 0.0;

        // m[n-1] = ((ha + hb) m[n-2] - hb m[n-3]) / ha
        let (ha, hb) = (h[n - 3], h[n - 2]);
        let last = size - 1;
        diag[last] += hb * (ha + hb) / ha;
        sub[last] -= hb * hb / ha;
        sup[last] = 0.0;

        let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);

        let mut m = Vec::with_capacity(n);
        m.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
        m.extend_from_slice(&interior);
        let (m_a, m_b) = (interior[last], interior[last - 1]);
        m.push(((ha + hb) * m_a - hb * m_b) / ha);

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        })
    }

    /// Evaluates the spline; points outside the knot range are rejected.
    pub fn evaluate(&self, x: f64) -> Result<f64, InterpError> {
        let n = self.xs.len();
        let (lo, hi) = (self.xs[0], self.xs[n - 1]);
        if !(lo..=hi).contains(&x) {
            return Err(InterpError::OutOfBounds(x, lo, hi));
        }

        let i = interval(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;

        Ok(a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0)
    }
}

/// Thomas algorithm. `sub[0]` and `sup[n - 1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}
