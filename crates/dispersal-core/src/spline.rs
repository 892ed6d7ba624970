//! Natural (free-boundary) cubic spline interpolation.
//!
//! The solver follows the tridiagonal scheme in Burden & Faires, *Numerical
//! Analysis* (4th ed.), pp. 126-131: second-derivative coefficients are
//! recovered by a forward elimination and back substitution with `c[0] = c[n] = 0`.
//! The resulting piecewise polynomials agree with the knot values and are
//! continuous through their second derivatives at interior knots.

use crate::constants::MIN_SPLINE_POINTS;

/// Errors raised before any computation when the knot sequence is unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    #[error("x has {x_len} points but y has {y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },
    #[error("at least {min} points are required, got {actual}")]
    TooFewPoints { min: usize, actual: usize },
    #[error("x is not strictly increasing at index {index} ({previous} >= {value})")]
    NonMonotonic {
        index: usize,
        previous: f64,
        value: f64,
    },
}

/// Fits natural cubic splines through ordered knots.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplineInterpolator;

impl SplineInterpolator {
    pub fn new() -> Self {
        Self
    }

    /// Fit a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// `ys` may be `f64` or reduced-precision `f32` samples; the system is
    /// always solved in `f64`.
    pub fn interpolate<Y>(&self, xs: &[f64], ys: &[Y]) -> Result<SplineFunction, SplineError>
    where
        Y: Copy + Into<f64>,
    {
        if xs.len() != ys.len() {
            return Err(SplineError::DimensionMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        if xs.len() < MIN_SPLINE_POINTS {
            return Err(SplineError::TooFewPoints {
                min: MIN_SPLINE_POINTS,
                actual: xs.len(),
            });
        }
        check_strictly_increasing(xs)?;

        let y: Vec<f64> = ys.iter().map(|&v| v.into()).collect();
        let x = xs;
        // n intervals, n + 1 knots.
        let n = x.len() - 1;

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        let mut mu = vec![0.0; n];
        let mut z = vec![0.0; n + 1];
        for i in 1..n {
            let g = 2.0 * (x[i + 1] - x[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / g;
            z[i] = (3.0 * (y[i + 1] * h[i - 1] - y[i] * (x[i + 1] - x[i - 1]) + y[i - 1] * h[i])
                / (h[i - 1] * h[i])
                - h[i - 1] * z[i - 1])
                / g;
        }

        // b linear, c quadratic, d cubic; y supplies the constant terms.
        let mut b = vec![0.0; n];
        let mut c = vec![0.0; n + 1];
        let mut d = vec![0.0; n];
        for j in (0..n).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            b[j] = (y[j + 1] - y[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
        }

        let coefficients = (0..n).map(|i| [y[i], b[i], c[i], d[i]]).collect();
        Ok(SplineFunction {
            knots: x.to_vec(),
            coefficients,
        })
    }
}

fn check_strictly_increasing(xs: &[f64]) -> Result<(), SplineError> {
    for (i, w) in xs.windows(2).enumerate() {
        if w[0].is_nan() || w[1].is_nan() || w[1] <= w[0] {
            return Err(SplineError::NonMonotonic {
                index: i + 1,
                previous: w[0],
                value: w[1],
            });
        }
    }
    Ok(())
}

/// Piecewise cubic: on `[knots[i], knots[i+1])` the value is
/// `a + b*dx + c*dx^2 + d*dx^3` with `dx = x - knots[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SplineFunction {
    knots: Vec<f64>,
    coefficients: Vec<[f64; 4]>,
}

impl SplineFunction {
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// `[constant, linear, quadratic, cubic]` per interval.
    pub fn coefficients(&self) -> &[[f64; 4]] {
        &self.coefficients
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Interval containing `x`, or `None` outside the knot range.
    /// The last interval is closed on the right.
    fn interval(&self, x: f64) -> Option<usize> {
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&x) {
            return None;
        }
        let upper = self.knots.partition_point(|&k| k <= x);
        Some((upper - 1).min(self.coefficients.len() - 1))
    }

    /// Spline value at `x`; `None` outside the knot range.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let i = self.interval(x)?;
        let dx = x - self.knots[i];
        let [a, b, c, d] = self.coefficients[i];
        Some(a + dx * (b + dx * (c + dx * d)))
    }

    /// First derivative at `x`; `None` outside the knot range.
    pub fn derivative(&self, x: f64) -> Option<f64> {
        let i = self.interval(x)?;
        let dx = x - self.knots[i];
        let [_, b, c, d] = self.coefficients[i];
        Some(b + dx * (2.0 * c + dx * 3.0 * d))
    }

    /// Evaluate at many points, e.g. to put a sparse series on the simulation clock.
    pub fn resample(&self, xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cubic() -> SplineFunction {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| x * x * x).collect();
        SplineInterpolator::new()
            .interpolate(&xs, &ys)
            .expect("valid knots")
    }

    #[test]
    fn reproduces_knot_values() {
        let s = cubic();
        for x in [0.0, 1.0, 2.0, 3.0, 4.0] {
            let v = s.evaluate(x).expect("knot is in domain");
            assert!((v - x * x * x).abs() < 1e-9, "knot {x}: {v}");
        }
    }

    #[test]
    fn approximates_cubic_between_knots() {
        // x^3 has non-zero curvature at x = 4, so the free-boundary spline
        // departs slightly from 1.5^3 = 3.375; 387/112 is its exact value.
        let v = cubic().evaluate(1.5).expect("in domain");
        assert!((v - 387.0 / 112.0).abs() < 1e-12, "got {v}");
        assert!((v - 3.375).abs() < 0.1);
    }

    #[test]
    fn symmetric_hat_has_known_closed_form() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 0.0];
        let s = SplineInterpolator::new().interpolate(&xs, &ys).expect("valid");
        // Symmetric hat: slope at the apex vanishes, value at 0.5 is 11/16.
        assert!(s.derivative(1.0).expect("in domain").abs() < 1e-12);
        assert!((s.evaluate(0.5).expect("in domain") - 11.0 / 16.0).abs() < 1e-12);
        assert!((s.evaluate(1.5).expect("in domain") - 11.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn outside_domain_is_none() {
        let s = cubic();
        assert_eq!(s.evaluate(-0.1), None);
        assert_eq!(s.evaluate(4.1), None);
        assert_eq!(s.evaluate(f64::NAN), None);
        assert_eq!(s.domain(), (0.0, 4.0));
    }

    #[test]
    fn one_polynomial_per_interval() {
        let s = cubic();
        assert_eq!(s.knots().len(), 5);
        assert_eq!(s.coefficients().len(), 4);
    }

    #[test]
    fn natural_boundary_has_zero_curvature_at_ends() {
        let s = cubic();
        assert_eq!(s.coefficients()[0][2], 0.0);
        let [_, _, c, d] = s.coefficients()[3];
        let curvature_at_end = 2.0 * c + 6.0 * d;
        assert!(curvature_at_end.abs() < 1e-9);
    }

    #[test]
    fn derivatives_are_continuous_at_interior_knots() {
        let s = cubic();
        for i in 1..4 {
            let [_, b_prev, c_prev, d_prev] = s.coefficients()[i - 1];
            let [_, b_next, c_next, _] = s.coefficients()[i];
            let h = s.knots()[i] - s.knots()[i - 1];
            let slope_left = b_prev + 2.0 * c_prev * h + 3.0 * d_prev * h * h;
            let curv_left = 2.0 * c_prev + 6.0 * d_prev * h;
            assert!((slope_left - b_next).abs() < 1e-9);
            assert!((curv_left - 2.0 * c_next).abs() < 1e-9);
        }
    }

    #[test]
    fn f32_samples_match_f64_solution() {
        let xs = [0.0, 0.5, 1.25, 3.0];
        let ys32 = [1.5f32, -0.25, 2.0, 0.75];
        let ys64: Vec<f64> = ys32.iter().map(|&v| f64::from(v)).collect();
        let interp = SplineInterpolator::new();
        let a = interp.interpolate(&xs, &ys32).expect("valid knots");
        let b = interp.interpolate(&xs, &ys64).expect("valid knots");
        assert_eq!(a, b);
    }

    #[test]
    fn linear_data_gives_exact_linear_spline() {
        let xs = [0.0, 2.0, 3.0, 7.0];
        let ys = [1.0, 5.0, 7.0, 15.0];
        let s = SplineInterpolator::new().interpolate(&xs, &ys).expect("valid");
        for x in [0.5, 2.5, 6.0] {
            assert!((s.evaluate(x).expect("in domain") - (2.0 * x + 1.0)).abs() < 1e-9);
            assert!((s.derivative(x).expect("in domain") - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn resample_marks_points_outside_domain() {
        let out = cubic().resample(&[-1.0, 0.0, 2.0, 5.0]);
        assert_eq!(out.len(), 4);
        assert!(out[0].is_none() && out[3].is_none());
        assert!((out[2].expect("in domain") - 8.0).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = SplineInterpolator::new()
            .interpolate(&[0.0, 1.0, 2.0], &[0.0, 1.0])
            .unwrap_err();
        assert_eq!(err, SplineError::DimensionMismatch { x_len: 3, y_len: 2 });
    }

    #[test]
    fn two_points_are_too_few() {
        let err = SplineInterpolator::new()
            .interpolate(&[0.0, 1.0], &[0.0, 1.0])
            .unwrap_err();
        assert_eq!(err, SplineError::TooFewPoints { min: 3, actual: 2 });
    }

    #[test]
    fn repeated_knot_is_non_monotonic() {
        let err = SplineInterpolator::new()
            .interpolate(&[1.0, 1.0, 2.0], &[0.0, 1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, SplineError::NonMonotonic { index: 1, .. }));
    }

    #[test]
    fn dimension_check_precedes_point_count() {
        let err = SplineInterpolator::new()
            .interpolate(&[0.0, 1.0], &[0.0])
            .unwrap_err();
        assert!(matches!(err, SplineError::DimensionMismatch { .. }));
    }

    proptest! {
        #[test]
        fn proptest_spline_passes_through_every_knot(
            steps in proptest::collection::vec(0.1f64..10.0, 3..20),
            values in proptest::collection::vec(-100.0f64..100.0, 20),
        ) {
            let mut xs = Vec::with_capacity(steps.len());
            let mut acc = -5.0;
            for s in &steps {
                acc += s;
                xs.push(acc);
            }
            let ys = &values[..xs.len()];
            let s = SplineInterpolator::new().interpolate(&xs, ys).expect("valid knots");
            for (x, y) in xs.iter().zip(ys) {
                let v = s.evaluate(*x).expect("knot is in domain");
                prop_assert!((v - y).abs() < 1e-6 * (1.0 + y.abs()));
            }
        }
    }
}
