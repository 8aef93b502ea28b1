use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    #[error("spline order must be at least 2, got {0}")]
    InvalidOrder(usize),

    #[error("time interval must be positive and finite, got {0}")]
    InvalidTimeInterval(f64),

    #[error("time interval is locked once the knot axis is anchored (current {current}, requested {requested})")]
    TimeIntervalLocked {
        current: f64,
        requested: f64
    },

    #[error("sample batch is empty")]
    EmptySampleBatch,

    #[error("sample batch is not strictly increasing in time at position {position} (t = {t})")]
    UnsortedSampleBatch {
        position: usize,
        t: f64
    },

    #[error("time {0} is not finite")]
    NonFiniteTime(f64),

    #[error("sample at t = {t} precedes the knot axis origin {origin}")]
    SampleBeforeSpan {
        t: f64,
        origin: f64
    },

    #[error("sample at t = {t} needs {required} new control points, above the limit of {limit}")]
    SampleGapTooLarge {
        t: f64,
        required: usize,
        limit: usize
    },

    #[error("spline is already initialized (origin {origin}, {control_points} control points)")]
    AlreadyInitialized {
        origin: f64,
        control_points: usize
    },

    #[error("time {t} is outside the evaluable range {range:?}")]
    NotEvaluable {
        t: f64,
        range: Option<(f64, f64)>
    }
}
