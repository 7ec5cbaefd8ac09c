use ndarray::Array1;

/// Defines the objective the MCEM optimizer maximizes.
///
/// Implementors map a candidate vector of free-parameter values to a residual vector.
/// Cost and log-likelihood are derived from the residuals, so minimizing the one is
/// maximizing the other.
pub trait Objective: Sync {
    /// Number of free parameters a candidate must carry
    fn dimension(&self) -> usize;

    /// Calculates the residual vector for a candidate
    ///
    /// # Arguments
    /// * `candidate` - Free-parameter values in the objective's fixed order
    ///
    /// # Returns
    /// * `Array1<f64>` - Residuals; never fails, failures are encoded as penalty values
    fn residuals(&self, candidate: &[f64]) -> Array1<f64>;

    /// Sum of squared residuals
    fn cost(&self, candidate: &[f64]) -> f64 {
        self.residuals(candidate).mapv(|r| r * r).sum()
    }

    /// Negative sum of squared residuals
    fn log_likelihood(&self, candidate: &[f64]) -> f64 {
        -self.cost(candidate)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    struct Shifted;

    impl Objective for Shifted {
        fn dimension(&self) -> usize {
            2
        }

        fn residuals(&self, candidate: &[f64]) -> Array1<f64> {
            array![candidate[0] - 1.0, candidate[1] + 2.0]
        }
    }

    #[test]
    fn test_cost_and_likelihood_mirror() {
        assert_eq!(Shifted.cost(&[1.0, -2.0]), 0.0);
        assert_eq!(Shifted.cost(&[3.0, 0.0]), 8.0);
        assert_eq!(Shifted.log_likelihood(&[3.0, 0.0]), -8.0);
    }
}
