use std::ops::{Deref, DerefMut};

use nalgebra::SVector;

/// Mutable handle on one control point of a spline.
///
/// The handle holds the spline's storage exclusively for its lifetime, so an
/// optimizer can write the parameters in place without copying them out, and
/// cannot outlive the spline that owns them.
pub struct ControlPointMut<'a, const D: usize> {
    index: usize,
    knot_time: f64,
    value: &'a mut SVector<f64, D>
}

impl<'a, const D: usize> ControlPointMut<'a, D> {
    pub(crate) fn new(index: usize, knot_time: f64, value: &'a mut SVector<f64, D>) -> Self {
        ControlPointMut { index, knot_time, value }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn knot_time(&self) -> f64 {
        self.knot_time
    }

    /// Raw parameter block of length `D`.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        self.value.as_mut_slice()
    }

    pub fn set(&mut self, value: SVector<f64, D>) {
        *self.value = value;
    }
}

impl<const D: usize> Deref for ControlPointMut<'_, D> {
    type Target = SVector<f64, D>;

    fn deref(&self) -> &Self::Target {
        &*self.value
    }
}

impl<const D: usize> DerefMut for ControlPointMut<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.value
    }
}
