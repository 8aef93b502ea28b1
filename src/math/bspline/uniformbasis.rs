use nalgebra::{DMatrix, DVector};

// ─────────────────────────────────────────────
// Uniform B-spline basis in matrix form
// ─────────────────────────────────────────────
//
// For order k (degree k-1) on uniformly spaced knots, the k basis functions
// that are non-zero on one segment are polynomials in the local parameter
// u ∈ [0, 1]:
//
//   B_m(u) = Σ_j M[m, j] · u^j,   m, j = 0..k-1
//
// with the blending matrix
//
//   M[m, j] = C(k-1, j) / (k-1)! · Σ_{s=m}^{k-1} (-1)^(s-m) · C(k, s-m) · (k-s-1)^(k-1-j)
//
// The r-th derivative w.r.t. u drops the first r columns and scales by the
// falling factorial j! / (j-r)!.

fn factorial(n: usize) -> f64 {
    (1..=n).map(|i| i as f64).product()
}

fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    factorial(n) / (factorial(k) * factorial(n - k))
}

fn falling_factorial(n: usize, r: usize) -> f64 {
    ((n - r + 1)..=n).map(|i| i as f64).product()
}

fn compute_blending_matrix(order: usize) -> DMatrix<f64> {
    let degree = order - 1;
    let scale = factorial(degree);
    DMatrix::from_fn(order, order, |m, j| {
        let sum: f64 = (m..order)
            .map(|s| {
                let sign = if (s - m) % 2 == 0 { 1.0 } else { -1.0 };
                sign * binomial(order, s - m) * ((order - s - 1) as f64).powi((degree - j) as i32)
            })
            .sum();
        binomial(degree, j) * sum / scale
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformBasis {
    order: usize,
    blending: DMatrix<f64>
}

impl UniformBasis {
    /// `None` for orders below 2; a single control point spans nothing.
    pub fn new(order: usize) -> Option<UniformBasis> {
        if order < 2 {
            return None;
        }
        Some(UniformBasis { order, blending: compute_blending_matrix(order) })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Weights of the `order` control points active on a segment.
    pub fn weights(&self, u: f64) -> DVector<f64> {
        self.derivative_weights(u, 0)
    }

    /// Weights of the `derivative`-th derivative with respect to `u`.
    /// Divide by `interval^derivative` to get a time derivative.
    pub fn derivative_weights(&self, u: f64, derivative: usize) -> DVector<f64> {
        let mut powers = DVector::<f64>::zeros(self.order);
        let mut u_pow = 1.0;
        for j in derivative..self.order {
            powers[j] = falling_factorial(j, derivative) * u_pow;
            u_pow *= u;
        }
        &self.blending * powers
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rejects_degenerate_order() {
        assert!(UniformBasis::new(0).is_none());
        assert!(UniformBasis::new(1).is_none());
        assert!(UniformBasis::new(2).is_some());
    }

    #[test]
    fn linear_basis_is_lerp() {
        let basis = UniformBasis::new(2).unwrap();
        let w = basis.weights(0.25);
        assert_relative_eq!(w[0], 0.75, epsilon = 1e-12);
        assert_relative_eq!(w[1], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn cubic_basis_matches_textbook_values() {
        let basis = UniformBasis::new(4).unwrap();
        let w = basis.weights(0.0);
        assert_relative_eq!(w[0], 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(w[1], 4.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(w[2], 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(w[3], 0.0, epsilon = 1e-12);

        let w = basis.weights(0.5);
        assert_relative_eq!(w[0], 1.0 / 48.0, epsilon = 1e-12);
        assert_relative_eq!(w[1], 23.0 / 48.0, epsilon = 1e-12);
        assert_relative_eq!(w[2], 23.0 / 48.0, epsilon = 1e-12);
        assert_relative_eq!(w[3], 1.0 / 48.0, epsilon = 1e-12);
    }

    #[test]
    fn weights_partition_unity_for_every_order() {
        for order in 2..=7 {
            let basis = UniformBasis::new(order).unwrap();
            for step in 0..=10 {
                let u = step as f64 / 10.0;
                let w = basis.weights(u);
                assert_relative_eq!(w.sum(), 1.0, epsilon = 1e-9);
                assert!(w.iter().all(|&x| x >= -1e-9));
                assert_relative_eq!(basis.derivative_weights(u, 1).sum(), 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn derivative_weights_match_finite_difference() {
        let basis = UniformBasis::new(5).unwrap();
        let (u, h) = (0.37, 1e-6);
        let numeric = (basis.weights(u + h) - basis.weights(u - h)) / (2.0 * h);
        let analytic = basis.derivative_weights(u, 1);
        for m in 0..5 {
            assert_relative_eq!(analytic[m], numeric[m], epsilon = 1e-6);
        }
    }

    #[test]
    fn derivatives_beyond_degree_vanish() {
        let basis = UniformBasis::new(3).unwrap();
        assert!(basis.derivative_weights(0.3, 3).iter().all(|&x| x == 0.0));
    }
}
