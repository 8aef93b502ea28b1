use crate::math::bspline::bspline::BSpline;
use crate::spline::splineerror::SplineError;

pub(crate) mod sealed {
    use crate::math::bspline::bspline::BSpline;

    /// Growth hooks behind `TrajectorySpline::add_sample`. Unreachable from
    /// outside the crate, so control points only grow with sample coverage.
    pub trait ControlPointSynthesis: BSpline {
        /// Appends one control point on the next knot, seeded by the
        /// implementor's policy.
        fn synthesize_new_control_point(&mut self);

        /// Appends control points up to the knot covering `t`.
        fn extend_to(&mut self, t: f64) -> usize {
            let Some(axis) = self.knot_axis() else {
                return 0;
            };
            let target = axis.index_of(t);
            let mut appended = 0;
            while (self.control_point_num() as i64) <= target {
                let before = self.control_point_num();
                self.synthesize_new_control_point();
                if self.control_point_num() == before {
                    break;
                }
                appended += 1;
            }
            appended
        }
    }
}

/// Time-indexed spline that can be seeded from samples and grown online.
///
/// One implementor per value space; the vector-space variant blends plain
/// vectors, a rotation-valued variant would blend on the group.
///
/// Control points are appended only through sample ingestion:
///
/// ```compile_fail
/// use posespline::spline::trajectoryspline::TrajectorySpline;
/// use posespline::spline::vectorspacespline::VectorSpaceSpline3;
///
/// let mut spline = VectorSpaceSpline3::new(4).unwrap();
/// spline.initial_spline_knot(0.0).unwrap();
/// spline.synthesize_new_control_point();
/// ```
pub trait TrajectorySpline: BSpline + sealed::ControlPointSynthesis {
    /// Fails once the knot axis is anchored.
    fn set_time_interval(&mut self, interval: f64) -> Result<(), SplineError>;

    fn time_interval(&self) -> f64;

    /// Records a sample and appends control points until one sits on the
    /// knot covering `t`. Returns the number of control points appended.
    fn add_sample(&mut self, t: f64, value: Self::Value) -> Result<usize, SplineError>;

    /// Batch construction from samples strictly increasing in time.
    fn initial_spline(&mut self, samples: &[(f64, Self::Value)]) -> Result<(), SplineError>;

    /// Anchors the knot axis at `t` without creating control points.
    fn initial_spline_knot(&mut self, t: f64) -> Result<(), SplineError>;
}
