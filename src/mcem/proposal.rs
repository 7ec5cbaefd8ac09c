//! Proposal distribution
//!
//! Candidates are drawn componentwise and independently. Under positive-only sampling each
//! component is log-normal with the proposal mean and spread as its arithmetic mean and
//! standard deviation; otherwise it is normal.

use rand::{distributions::Distribution, Rng};
use statrs::distribution::{LogNormal, Normal};

use super::error::McemError;

/// Smallest spread handed to a distribution constructor
pub(crate) const SPREAD_FLOOR: f64 = f64::MIN_POSITIVE;

enum Component {
    LogNormal(LogNormal),
    Normal(Normal),
}

/// Independent per-parameter proposal for one EM iteration.
pub(crate) struct Proposal {
    components: Vec<Component>,
}

impl Proposal {
    /// Builds the proposal for the current mean and spread.
    ///
    /// # Arguments
    ///
    /// * `mean` - Proposal mean per parameter
    /// * `spread` - Proposal standard deviation per parameter
    /// * `positive_only` - Use log-normal components
    /// * `min_relative_spread` - Lower bound of `spread / |mean|`
    pub(crate) fn new(
        mean: &[f64],
        spread: &[f64],
        positive_only: bool,
        min_relative_spread: f64,
    ) -> Result<Self, McemError> {
        let components = mean
            .iter()
            .zip(spread)
            .enumerate()
            .map(|(index, (mn, sd))| {
                let sd = sd.max(min_relative_spread * mn.abs()).max(SPREAD_FLOOR);

                let component = if positive_only {
                    let (mu, sigma) = log_normal_moments(*mn, sd);
                    LogNormal::new(mu, sigma.max(SPREAD_FLOOR))
                        .map(Component::LogNormal)
                        .map_err(|e| e.to_string())
                } else {
                    Normal::new(*mn, sd)
                        .map(Component::Normal)
                        .map_err(|e| e.to_string())
                };

                component.map_err(|message| McemError::InvalidProposal { index, message })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }

    /// Draws one candidate vector.
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.components
            .iter()
            .map(|c| match c {
                Component::LogNormal(d) => d.sample(rng),
                Component::Normal(d) => d.sample(rng),
            })
            .collect()
    }
}

/// Log-space location and scale of a log-normal with arithmetic mean `mean` and
/// standard deviation `sd`.
///
/// μ = ln(mean / √(1 + cv²)), σ = √ln(1 + cv²) with cv = sd / mean
pub(crate) fn log_normal_moments(mean: f64, sd: f64) -> (f64, f64) {
    let cv2 = (sd / mean).powi(2);
    let mu = (mean / (1.0 + cv2).sqrt()).ln();
    let sigma = cv2.ln_1p().sqrt();
    (mu, sigma)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_log_normal_moments_recover_mean_and_sd() {
        let (mu, sigma) = log_normal_moments(2.0, 0.4);
        let mean = (mu + 0.5 * sigma * sigma).exp();
        let var = ((sigma * sigma).exp() - 1.0) * (2.0 * mu + sigma * sigma).exp();

        assert_relative_eq!(mean, 2.0, epsilon = 1e-12);
        assert_relative_eq!(var.sqrt(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_positive_samples() {
        let proposal = Proposal::new(&[1.0, 50.0], &[0.5, 10.0], true, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            assert!(proposal.sample(&mut rng).iter().all(|v| *v > 0.0));
        }
    }

    #[test]
    fn test_collapsed_spread_is_floored() {
        let proposal = Proposal::new(&[3.0], &[0.0], true, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_relative_eq!(proposal.sample(&mut rng)[0], 3.0, max_relative = 1e-12);

        let widened = Proposal::new(&[3.0], &[0.0], false, 0.1).unwrap();
        let draws = (0..50).map(|_| widened.sample(&mut rng)[0]).collect::<Vec<_>>();
        assert!(draws.iter().any(|d| (d - 3.0).abs() > 1e-6));
    }

    #[test]
    fn test_invalid_mean_is_reported() {
        assert!(matches!(
            Proposal::new(&[f64::NAN], &[1.0], false, 0.0),
            Err(McemError::InvalidProposal { index: 0, .. })
        ));
    }
}
