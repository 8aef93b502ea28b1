use nalgebra::DVector;

use crate::math::bspline::knotaxis::KnotAxis;
use crate::math::bspline::uniformbasis::UniformBasis;
use crate::spline::splineerror::SplineError;

/// Uniform B-spline evaluated over time.
///
/// Implementors own the control points and decide how `order` of them are
/// blended (`blend`); knot bookkeeping, support and evaluation are shared.
///
/// # Support
///
/// Segment `[knot(j), knot(j + 1)]` blends control points `j - s ..= j - s + k - 1`
/// where `k` is the order and `s = (k - 1) / 2`. For even orders this centers
/// each control point on its own knot. With `N` control points the spline is
/// evaluable on the closed range `[knot(s), knot(N - k + s + 1)]`.
pub trait BSpline {
    type Value;

    fn basis(&self) -> &UniformBasis;

    /// `None` until the spline is anchored in time.
    fn knot_axis(&self) -> Option<KnotAxis>;

    fn control_point_num(&self) -> usize;

    /// Weighted combination of the control points `first .. first + weights.len()`.
    fn blend(&self, first: usize, weights: &DVector<f64>) -> Self::Value;

    fn order(&self) -> usize {
        self.basis().order()
    }

    /// Control points that precede the segment containing a query time.
    fn leading_control_points(&self) -> usize {
        (self.order() - 1) / 2
    }

    fn evaluable_range(&self) -> Option<(f64, f64)> {
        let axis = self.knot_axis()?;
        let (n, k, s) = (self.control_point_num(), self.order(), self.leading_control_points());
        if n < k {
            return None;
        }
        Some((axis.knot_time(s), axis.knot_time(n - k + s + 1)))
    }

    fn is_ts_evaluable(&self, t: f64) -> bool {
        match self.evaluable_range() {
            Some((min, max)) => t >= min && t <= max,
            None => false
        }
    }

    /// First control point and local parameter for `t`.
    fn locate(&self, t: f64) -> Result<(usize, f64), SplineError> {
        let range = self.evaluable_range();
        let (axis, (min, max)) = match (self.knot_axis(), range) {
            (Some(axis), Some(range)) => (axis, range),
            _ => return Err(SplineError::NotEvaluable { t, range })
        };
        if !(t >= min && t <= max) {
            return Err(SplineError::NotEvaluable { t, range });
        }

        let (n, k, s) = (self.control_point_num(), self.order(), self.leading_control_points());
        let last_segment = (n - k + s) as i64;
        let segment = axis.index_of(t).clamp(s as i64, last_segment) as usize;
        Ok((segment - s, axis.local_parameter(t, segment)))
    }

    fn evaluate(&self, t: f64) -> Result<Self::Value, SplineError> {
        let (first, u) = self.locate(t)?;
        Ok(self.blend(first, &self.basis().weights(u)))
    }
}
