
/// Slack added to `(t - origin) / interval` before flooring, so that a time
/// computed as `origin + i * interval` maps back to `i` despite rounding.
pub const INDEX_TOLERANCE: f64 = 1e-9;

/// Uniform knot axis: knot `i` sits at `origin + i * interval`.
///
/// The origin is fixed when the axis is created and is aligned to the
/// interval grid (a multiple of `interval`), so two splines with the same
/// interval share knot times regardless of their first sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnotAxis {
    origin: f64,
    interval: f64
}

impl KnotAxis {
    /// Anchors the axis on the grid knot at or before `t`.
    pub fn anchored_at(t: f64, interval: f64) -> KnotAxis {
        KnotAxis { origin: Self::align(t, interval), interval }
    }

    pub fn align(t: f64, interval: f64) -> f64 {
        (t / interval + INDEX_TOLERANCE).floor() * interval
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }

    pub fn knot_time(&self, index: usize) -> f64 {
        self.origin + index as f64 * self.interval
    }

    /// Index of the knot at or before `t`; negative before the origin.
    pub fn index_of(&self, t: f64) -> i64 {
        ((t - self.origin) / self.interval + INDEX_TOLERANCE).floor() as i64
    }

    /// Local parameter of `t` inside the segment starting at knot `index`,
    /// clamped into `[0, 1]`.
    pub fn local_parameter(&self, t: f64, index: usize) -> f64 {
        ((t - self.knot_time(index)) / self.interval).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn origin_is_grid_aligned() {
        let axis = KnotAxis::anchored_at(1.234, 0.1);
        assert_relative_eq!(axis.origin(), 1.2, epsilon = 1e-12);
        assert_relative_eq!(axis.knot_time(3), 1.5, epsilon = 1e-12);

        let axis = KnotAxis::anchored_at(-0.05, 0.1);
        assert_relative_eq!(axis.origin(), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn knot_times_map_back_to_their_index() {
        let axis = KnotAxis::anchored_at(0.0, 0.1);
        for i in 0..1000 {
            assert_eq!(axis.index_of(axis.knot_time(i)), i as i64);
            assert_eq!(axis.index_of(i as f64 * 0.1), i as i64);
        }
        assert_eq!(axis.index_of(-0.01), -1);
        assert_eq!(axis.index_of(0.35), 3);
    }

    #[test]
    fn local_parameter_is_clamped() {
        let axis = KnotAxis::anchored_at(0.0, 0.5);
        assert_relative_eq!(axis.local_parameter(1.25, 2), 0.5, epsilon = 1e-12);
        assert_eq!(axis.local_parameter(0.9, 2), 0.0);
        assert_eq!(axis.local_parameter(2.0, 2), 1.0);
    }
}
