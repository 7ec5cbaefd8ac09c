use ndarray::Array1;

/// Critical value of the standard normal distribution for a two-sided 95 % interval
pub const Z_95: f64 = 1.96;

/// Calculates the sum of squared errors (SSE) of a residual vector.
///
/// SSE = Σr²
pub fn sum_of_squared_errors(residuals: &Array1<f64>) -> f64 {
    residuals.mapv(|x| x * x).sum()
}

/// Calculates Root Mean Squared Error (RMSE), in the units of the observed data.
///
/// RMSE = √((1/n) * Σr²)
///
/// # Arguments
/// * `residuals` - Residual vector
///
/// # Returns
/// * `f64` - RMSE, or `0.0` for an empty vector
pub fn root_mean_squared_error(residuals: &Array1<f64>) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    (sum_of_squared_errors(residuals) / residuals.len() as f64).sqrt()
}

/// Absolute deviation of each estimate from its reference, in percent of the reference.
///
/// error = |(estimate − reference) / reference| · 100
///
/// Entries whose reference is zero are `NaN`.
///
/// # Arguments
/// * `estimates` - Estimated values
/// * `references` - True values, or the initial guess to report the change from it
///
/// # Returns
/// * `Vec<f64>` - One percentage per estimate
pub fn relative_percentage_errors(estimates: &[f64], references: &[f64]) -> Vec<f64> {
    estimates
        .iter()
        .zip(references)
        .map(|(est, reference)| {
            if *reference == 0.0 {
                f64::NAN
            } else {
                ((est - reference) / reference).abs() * 100.0
            }
        })
        .collect()
}

/// Percentage change of each estimate from the initial guess.
pub fn percentage_change(estimates: &[f64], initial_guess: &[f64]) -> Vec<f64> {
    relative_percentage_errors(estimates, initial_guess)
}

/// Half-widths of 95 % confidence intervals from the final proposal spread.
pub fn confidence_half_widths(spread: &[f64]) -> Vec<f64> {
    spread.iter().map(|sd| Z_95 * sd).collect()
}

/// Mean of finite entries, ignoring `NaN` from zero references.
pub fn finite_mean(values: &[f64]) -> Option<f64> {
    let finite = values.iter().filter(|v| v.is_finite()).collect::<Vec<_>>();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().copied().sum::<f64>() / finite.len() as f64)
}
