use anyhow::Result;
use nalgebra::Vector3;
use tracing_subscriber::{fmt, prelude::*};

use posespline::configuration::SplineConfiguration;
use posespline::fitting::leastsquares::refine_control_points;
use posespline::math::bspline::bspline::BSpline;
use posespline::spline::trajectoryspline::TrajectorySpline;
use posespline::spline::vectorspacespline::VectorSpaceSpline3;
use posespline::time::duration::Duration;
use posespline::time::time::Time;
use posespline::time::timesource::{SimulatedTimeSource, TimeSource};

const SAMPLE_PERIOD: f64 = 0.01;
const SAMPLE_COUNT: usize = 300;

fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing::level_filters::LevelFilter::INFO)
        .with(fmt::layer()
            .without_time()
            .with_target(false))
        .init();
    Ok(())
}

fn helix(t: f64) -> Vector3<f64> {
    Vector3::new(t.cos(), t.sin(), 0.2 * t)
}

fn main() -> Result<()> {
    init_logging()?;

    let configuration = match std::env::args().nth(1) {
        Some(path) => SplineConfiguration::from_reader(&path)?,
        None => SplineConfiguration::default()
    };
    let mut spline: VectorSpaceSpline3 = configuration.build_spline()?;

    let clock = SimulatedTimeSource::new();
    clock.init();
    clock.set_now(Time::from_sec(100.0));
    let start = clock.now();
    for _ in 0..SAMPLE_COUNT {
        clock.advance(Duration::from_sec(SAMPLE_PERIOD));
        let t = clock.now();
        spline.add_sample(t.to_sec(), helix((t - start).to_sec()))?;
    }

    let report = refine_control_points(&mut spline, &configuration.refinement_options())?;
    tracing::info!("refinement: {:?}", report);
    spline.print_knots();

    if let Some((min, max)) = spline.evaluable_range() {
        for step in 0..=4 {
            let t = min + (max - min) * step as f64 / 4.0;
            let value = spline.evaluate(t)?;
            let truth = helix(t - start.to_sec());
            println!(
                "t = {:.3}: [{:.4}, {:.4}, {:.4}] error {:.2e}",
                t, value.x, value.y, value.z, (value - truth).norm()
            );
        }
    }
    Ok(())
}
