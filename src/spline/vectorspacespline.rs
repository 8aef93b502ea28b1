use std::collections::BTreeMap;

use nalgebra::{DVector, SVector};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::math::bspline::bspline::BSpline;
use crate::math::bspline::knotaxis::KnotAxis;
use crate::math::bspline::uniformbasis::UniformBasis;
use crate::objectwithuuid::ObjectWithUUID;
use crate::spline::controlpoint::ControlPointMut;
use crate::spline::splineerror::SplineError;
use crate::spline::trajectoryspline::sealed::ControlPointSynthesis;
use crate::spline::trajectoryspline::TrajectorySpline;
use crate::time::time::Time;

pub const DEFAULT_TIME_INTERVAL: f64 = 0.1;

/// Most control points a single sample may append. A sample further out is
/// rejected instead of filling the gap.
pub const MAX_CONTROL_POINTS_PER_SAMPLE: usize = 100_000;

fn validate_time_interval(interval: f64) -> Result<(), SplineError> {
    if interval.is_finite() && interval > 0.0 {
        Ok(())
    } else {
        Err(SplineError::InvalidTimeInterval(interval))
    }
}

fn validate_time(t: f64) -> Result<(), SplineError> {
    if t.is_finite() {
        Ok(())
    } else {
        Err(SplineError::NonFiniteTime(t))
    }
}

/// Control points to append so that `covered` points reach the knot of `t`.
fn validate_extension(axis: &KnotAxis, covered: usize, t: f64) -> Result<usize, SplineError> {
    let required = (axis.index_of(t) + 1 - covered as i64).max(0) as usize;
    if required > MAX_CONTROL_POINTS_PER_SAMPLE {
        return Err(SplineError::SampleGapTooLarge {
            t,
            required,
            limit: MAX_CONTROL_POINTS_PER_SAMPLE
        });
    }
    Ok(required)
}

// ─────────────────────────────────────────────
// VectorSpaceSpline
// ─────────────────────────────────────────────
//
// Control points live in R^D and are blended as a plain weighted sum.
//
// Seeding policy: a control point appended on knot time t_j takes the value of
// the recorded sample nearest to t_j, ties going to the earlier sample, or
// zero when nothing is recorded yet. Extension only ever happens for a sample
// at or after t_j, and every later sample is farther from t_j than that one,
// so streaming samples in time order seeds exactly what a batch over the same
// samples would.

#[derive(Debug, Clone)]
pub struct VectorSpaceSpline<const D: usize> {
    uuid: Uuid,
    basis: UniformBasis,
    time_interval: f64,
    knot_axis: Option<KnotAxis>,
    control_points: Vec<SVector<f64, D>>,
    samples: BTreeMap<Time, SVector<f64, D>>
}

pub type VectorSpaceSpline3 = VectorSpaceSpline<3>;

impl<const D: usize> VectorSpaceSpline<D> {
    pub fn new(order: usize) -> Result<VectorSpaceSpline<D>, SplineError> {
        Self::with_time_interval(order, DEFAULT_TIME_INTERVAL)
    }

    pub fn with_time_interval(order: usize, interval: f64) -> Result<VectorSpaceSpline<D>, SplineError> {
        let basis = UniformBasis::new(order).ok_or(SplineError::InvalidOrder(order))?;
        validate_time_interval(interval)?;
        Ok(VectorSpaceSpline {
            uuid: Uuid::new_v4(),
            basis,
            time_interval: interval,
            knot_axis: None,
            control_points: Vec::new(),
            samples: BTreeMap::new()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    /// Panics when `i` is out of range.
    pub fn control_point(&self, i: usize) -> &SVector<f64, D> {
        assert!(
            i < self.control_points.len(),
            "control point index {} out of range ({} control points)",
            i,
            self.control_points.len()
        );
        &self.control_points[i]
    }

    /// Panics when `i` is out of range.
    pub fn control_point_mut(&mut self, i: usize) -> ControlPointMut<'_, D> {
        let count = self.control_points.len();
        assert!(i < count, "control point index {} out of range ({} control points)", i, count);
        let knot_time = self.knot_time(i).unwrap_or(f64::NAN);
        ControlPointMut::new(i, knot_time, &mut self.control_points[i])
    }

    pub fn control_points(&self) -> &[SVector<f64, D>] {
        &self.control_points
    }

    pub fn knot_time(&self, i: usize) -> Option<f64> {
        self.knot_axis.map(|axis| axis.knot_time(i))
    }

    pub fn sample_num(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> impl Iterator<Item = (Time, &SVector<f64, D>)> {
        self.samples.iter().map(|(t, v)| (*t, v))
    }

    /// `derivative`-th time derivative; `derivative == 0` is the value.
    pub fn evaluate_derivative(&self, t: f64, derivative: usize) -> Result<SVector<f64, D>, SplineError> {
        let (first, u) = self.locate(t)?;
        let scale = self.time_interval.powi(derivative as i32);
        let weights = self.basis.derivative_weights(u, derivative) / scale;
        Ok(self.blend(first, &weights))
    }

    /// Knot times and control points, also emitted through `tracing`.
    pub fn print_knots(&self) -> String {
        let mut dump = format!(
            "spline {}: order {}, interval {}, {} control points, {} samples\n",
            self.short_id(),
            self.order(),
            self.time_interval,
            self.control_points.len(),
            self.samples.len()
        );
        for (i, point) in self.control_points.iter().enumerate() {
            let components: Vec<String> = point.iter().map(|c| format!("{:.6}", c)).collect();
            dump.push_str(&format!(
                "knot[{}] t = {:.6} -> [{}]\n",
                i,
                self.knot_time(i).unwrap_or(f64::NAN),
                components.join(", ")
            ));
        }
        info!(spline = %self.short_id(), "{}", dump.trim_end());
        dump
    }

    fn anchor(&mut self, t: f64) -> KnotAxis {
        let axis = KnotAxis::anchored_at(t, self.time_interval);
        debug!(spline = %self.short_id(), t, origin = axis.origin(), "anchored knot axis");
        self.knot_axis = Some(axis);
        axis
    }

    fn already_initialized(&self, axis: &KnotAxis) -> SplineError {
        SplineError::AlreadyInitialized {
            origin: axis.origin(),
            control_points: self.control_points.len()
        }
    }

    fn nearest_sample(&self, t: f64) -> Option<&SVector<f64, D>> {
        let key = Time::from_sec(t);
        let before = self.samples.range(..=key).next_back();
        let after = self.samples.range(key..).next();
        match (before, after) {
            (Some((tb, vb)), Some((ta, va))) => {
                if (*ta - key) < (key - *tb) { Some(va) } else { Some(vb) }
            }
            (Some((_, v)), None) | (None, Some((_, v))) => Some(v),
            (None, None) => None
        }
    }
}

impl<const D: usize> ObjectWithUUID for VectorSpaceSpline<D> {
    fn uuid(&self) -> &Uuid {
        &self.uuid
    }
}

impl<const D: usize> BSpline for VectorSpaceSpline<D> {
    type Value = SVector<f64, D>;

    fn basis(&self) -> &UniformBasis {
        &self.basis
    }

    fn knot_axis(&self) -> Option<KnotAxis> {
        self.knot_axis
    }

    fn control_point_num(&self) -> usize {
        self.control_points.len()
    }

    fn blend(&self, first: usize, weights: &DVector<f64>) -> SVector<f64, D> {
        weights
            .iter()
            .zip(&self.control_points[first..])
            .fold(SVector::<f64, D>::zeros(), |acc, (w, p)| acc + p * *w)
    }
}

impl<const D: usize> TrajectorySpline for VectorSpaceSpline<D> {
    fn set_time_interval(&mut self, interval: f64) -> Result<(), SplineError> {
        validate_time_interval(interval)?;
        if self.knot_axis.is_some() && interval != self.time_interval {
            return Err(SplineError::TimeIntervalLocked {
                current: self.time_interval,
                requested: interval
            });
        }
        self.time_interval = interval;
        Ok(())
    }

    fn time_interval(&self) -> f64 {
        self.time_interval
    }

    fn add_sample(&mut self, t: f64, value: SVector<f64, D>) -> Result<usize, SplineError> {
        validate_time(t)?;
        let axis = match self.knot_axis {
            Some(axis) => axis,
            None => self.anchor(t)
        };
        if axis.index_of(t) < 0 {
            warn!(spline = %self.short_id(), t, origin = axis.origin(), "rejected sample before span");
            return Err(SplineError::SampleBeforeSpan { t, origin: axis.origin() });
        }
        if let Err(error) = validate_extension(&axis, self.control_points.len(), t) {
            warn!(spline = %self.short_id(), t, %error, "rejected sample beyond extension limit");
            return Err(error);
        }

        self.samples.insert(Time::from_sec(t), value);
        let appended = self.extend_to(t);
        if appended > 0 {
            debug!(
                spline = %self.short_id(),
                t,
                appended,
                control_points = self.control_points.len(),
                "extended spline"
            );
        }
        Ok(appended)
    }

    fn initial_spline(&mut self, samples: &[(f64, SVector<f64, D>)]) -> Result<(), SplineError> {
        if let Some(axis) = self.knot_axis {
            return Err(self.already_initialized(&axis));
        }
        let Some((first, _)) = samples.first() else {
            return Err(SplineError::EmptySampleBatch);
        };
        let axis = KnotAxis::anchored_at(*first, self.time_interval);
        let mut covered = 0;
        for (position, (t, _)) in samples.iter().enumerate() {
            validate_time(*t)?;
            if position > 0 && *t <= samples[position - 1].0 {
                return Err(SplineError::UnsortedSampleBatch { position, t: *t });
            }
            covered += validate_extension(&axis, covered, *t)?;
        }

        self.anchor(*first);
        for (t, value) in samples {
            self.add_sample(*t, *value)?;
        }
        info!(
            spline = %self.short_id(),
            samples = samples.len(),
            control_points = self.control_points.len(),
            range = ?self.evaluable_range(),
            "initialized spline from sample batch"
        );
        Ok(())
    }

    fn initial_spline_knot(&mut self, t: f64) -> Result<(), SplineError> {
        validate_time(t)?;
        if let Some(axis) = self.knot_axis {
            return Err(self.already_initialized(&axis));
        }
        self.anchor(t);
        Ok(())
    }
}

impl<const D: usize> ControlPointSynthesis for VectorSpaceSpline<D> {
    fn synthesize_new_control_point(&mut self) {
        let Some(axis) = self.knot_axis else {
            warn!(spline = %self.short_id(), "no knot axis, control point not synthesized");
            return;
        };
        let index = self.control_points.len();
        let knot_time = axis.knot_time(index);
        let seed = self.nearest_sample(knot_time).copied().unwrap_or_else(SVector::<f64, D>::zeros);
        debug!(spline = %self.short_id(), index, knot_time, "synthesized control point");
        self.control_points.push(seed);
    }
}
