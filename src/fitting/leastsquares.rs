use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use nalgebra::SVector;
use thiserror::Error;
use tracing::info;

use crate::math::bspline::bspline::BSpline;
use crate::objectwithuuid::ObjectWithUUID;
use crate::spline::splineerror::SplineError;
use crate::spline::vectorspacespline::VectorSpaceSpline;

// ─────────────────────────────────────────────
// Least-squares refinement of control points
// ─────────────────────────────────────────────
//
// Seeding copies the nearest sample onto each knot, which is exact only where
// the signal is linear. Refinement minimizes
//
//   Σ_samples || Σ_m w_m(u) · p_{first+m} - v ||²
//
// over all control points with L-BFGS. The problem is linear in the control
// points, so the gradient is exact:
//
//   ∂/∂p_{first+m} = 2 · w_m(u) · r,   r = prediction - v
//
// Only samples inside the evaluable range contribute; control points that no
// sample touches keep their seeded value.

#[derive(Debug, Error)]
pub enum FitError {
    #[error("no recorded sample lies inside the evaluable range")]
    NoEvaluableSamples,

    #[error("solver finished without a best parameter vector")]
    NoSolution,

    #[error(transparent)]
    Spline(#[from] SplineError),

    #[error(transparent)]
    Solver(#[from] argmin::core::Error)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementOptions {
    pub max_iters: u64,
    /// L-BFGS memory.
    pub history: usize,
    pub tolerance_grad: f64,
    /// Stop once the cost changes by less than this between iterations.
    pub tolerance_cost: f64
}

impl Default for RefinementOptions {
    fn default() -> Self {
        RefinementOptions { max_iters: 100, history: 7, tolerance_grad: 1e-8, tolerance_cost: 1e-14 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementReport {
    pub iterations: u64,
    pub observations: usize,
    pub initial_cost: f64,
    pub final_cost: f64
}

struct Observation<const D: usize> {
    first: usize,
    weights: Vec<f64>,
    target: SVector<f64, D>
}

struct SampleResidualProblem<const D: usize> {
    observations: Vec<Observation<D>>
}

impl<const D: usize> SampleResidualProblem<D> {
    fn from_spline(spline: &VectorSpaceSpline<D>) -> Result<SampleResidualProblem<D>, FitError> {
        let mut observations = Vec::new();
        for (stamp, target) in spline.samples() {
            let t = stamp.to_sec();
            if !spline.is_ts_evaluable(t) {
                continue;
            }
            let (first, u) = spline.locate(t)?;
            observations.push(Observation {
                first,
                weights: spline.basis().weights(u).iter().copied().collect(),
                target: *target
            });
        }
        Ok(SampleResidualProblem { observations })
    }

    fn residual(&self, observation: &Observation<D>, param: &[f64]) -> SVector<f64, D> {
        let mut prediction = SVector::<f64, D>::zeros();
        for (m, w) in observation.weights.iter().enumerate() {
            let offset = (observation.first + m) * D;
            prediction += SVector::<f64, D>::from_column_slice(&param[offset..offset + D]) * *w;
        }
        prediction - observation.target
    }

    fn sum_squared_residual(&self, param: &[f64]) -> f64 {
        self.observations
            .iter()
            .map(|observation| self.residual(observation, param).norm_squared())
            .sum()
    }

    fn residual_gradient(&self, param: &[f64]) -> Vec<f64> {
        let mut gradient = vec![0.0; param.len()];
        for observation in &self.observations {
            let residual = self.residual(observation, param);
            for (m, w) in observation.weights.iter().enumerate() {
                let offset = (observation.first + m) * D;
                for d in 0..D {
                    gradient[offset + d] += 2.0 * w * residual[d];
                }
            }
        }
        gradient
    }
}

impl<const D: usize> CostFunction for SampleResidualProblem<D> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.sum_squared_residual(param))
    }
}

impl<const D: usize> Gradient for SampleResidualProblem<D> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        Ok(self.residual_gradient(param))
    }
}

/// Fits the control points of `spline` to its recorded samples and writes the
/// result back through the control-point handles.
pub fn refine_control_points<const D: usize>(
    spline: &mut VectorSpaceSpline<D>,
    options: &RefinementOptions
) -> Result<RefinementReport, FitError> {
    let problem = SampleResidualProblem::from_spline(spline)?;
    if problem.observations.is_empty() {
        return Err(FitError::NoEvaluableSamples);
    }
    let observations = problem.observations.len();

    let initial: Vec<f64> = spline
        .control_points()
        .iter()
        .flat_map(|point| point.iter().copied())
        .collect();
    let initial_cost = problem.sum_squared_residual(&initial);
    let initial_grad_norm = problem
        .residual_gradient(&initial)
        .iter()
        .map(|g| g * g)
        .sum::<f64>()
        .sqrt();
    if initial_grad_norm <= options.tolerance_grad {
        return Ok(RefinementReport { iterations: 0, observations, initial_cost, final_cost: initial_cost });
    }

    let linesearch = MoreThuenteLineSearch::new();
    let solver = LBFGS::new(linesearch, options.history)
        .with_tolerance_grad(options.tolerance_grad)?
        .with_tolerance_cost(options.tolerance_cost)?;
    let result = Executor::new(problem, solver)
        .configure(|state| state.param(initial).max_iters(options.max_iters))
        .run()?;

    let state = result.state();
    let best = state.get_best_param().ok_or(FitError::NoSolution)?;
    let final_cost = state.get_best_cost();
    let iterations = state.get_iter();

    for i in 0..spline.control_point_num() {
        let fitted = SVector::<f64, D>::from_column_slice(&best[i * D..(i + 1) * D]);
        spline.control_point_mut(i).set(fitted);
    }

    info!(
        spline = %spline.short_id(),
        iterations,
        observations,
        initial_cost,
        final_cost,
        "refined control points"
    );
    Ok(RefinementReport { iterations, observations, initial_cost, final_cost })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::spline::trajectoryspline::TrajectorySpline;
    use crate::spline::vectorspacespline::VectorSpaceSpline3;

    fn curved_samples() -> Vec<(f64, Vector3<f64>)> {
        (0..60)
            .map(|i| {
                let t = i as f64 * 0.025;
                (t, Vector3::new((3.0 * t).sin(), t * t, (2.0 * t).cos()))
            })
            .collect()
    }

    #[test]
    fn refinement_lowers_sample_residual() {
        let samples = curved_samples();
        let mut spline = VectorSpaceSpline3::with_time_interval(4, 0.1).unwrap();
        spline.initial_spline(&samples).unwrap();
        let seeded = spline.control_points().to_vec();

        let report = refine_control_points(&mut spline, &RefinementOptions::default()).unwrap();

        assert!(report.observations > 0);
        assert!(report.initial_cost > 0.0);
        assert!(report.final_cost < report.initial_cost);
        assert_eq!(spline.control_point_num(), seeded.len());

        let recomputed: f64 = spline
            .samples()
            .filter(|(stamp, _)| spline.is_ts_evaluable(stamp.to_sec()))
            .map(|(stamp, v)| (spline.evaluate(stamp.to_sec()).unwrap() - v).norm_squared())
            .sum();
        assert_relative_eq!(recomputed, report.final_cost, epsilon = 1e-9, max_relative = 1e-6);
    }

    #[test]
    fn perfectly_fitting_seeds_are_left_alone() {
        let samples: Vec<(f64, Vector3<f64>)> = (0..11)
            .map(|i| {
                let t = i as f64 * 0.1;
                (t, Vector3::new(t, 2.0 * t, 0.0))
            })
            .collect();
        let mut spline = VectorSpaceSpline3::with_time_interval(4, 0.1).unwrap();
        spline.initial_spline(&samples).unwrap();
        let seeded = spline.control_points().to_vec();

        let report = refine_control_points(&mut spline, &RefinementOptions::default()).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(spline.control_points(), seeded.as_slice());
    }

    #[test]
    fn spline_without_evaluable_samples_is_rejected() {
        let mut spline = VectorSpaceSpline3::with_time_interval(4, 0.1).unwrap();
        spline.add_sample(0.0, Vector3::zeros()).unwrap();
        assert!(matches!(
            refine_control_points(&mut spline, &RefinementOptions::default()),
            Err(FitError::NoEvaluableSamples)
        ));
    }
}
