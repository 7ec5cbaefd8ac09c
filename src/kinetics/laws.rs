//! Generic rate-law building blocks
//!
//! Pure functions shared by every enzyme of both pathways. All of them are well defined
//! for non-negative concentrations as long as the Michaelis, inhibition and activation
//! constants are strictly positive.

/// Michaelis-Menten saturation `vmax · s / (km + s)`.
#[inline]
pub fn michaelis_menten(vmax: f64, s: f64, km: f64) -> f64 {
    vmax * saturation(s, km)
}

/// Fractional saturation `s / (km + s)`.
#[inline]
pub fn saturation(s: f64, km: f64) -> f64 {
    s / (km + s)
}

/// Reversible Michaelis-Menten rate as forward minus reverse term.
///
/// The reverse maximal velocity is `vmax / keq`, so the net rate vanishes whenever the
/// two saturation terms are balanced at the equilibrium constant.
///
/// # Arguments
///
/// * `vmax` - Forward maximal velocity
/// * `s` - Substrate concentration
/// * `p` - Product concentration
/// * `km_s` - Michaelis constant of the substrate
/// * `km_p` - Michaelis constant of the product
/// * `keq` - Equilibrium constant
#[inline]
pub fn reversible_michaelis_menten(vmax: f64, s: f64, p: f64, km_s: f64, km_p: f64, keq: f64) -> f64 {
    vmax * saturation(s, km_s) - (vmax / keq) * saturation(p, km_p)
}

/// Hill saturation `vmax · sⁿ / (kmⁿ + sⁿ)`.
#[inline]
pub fn hill(vmax: f64, s: f64, km: f64, n: f64) -> f64 {
    let sn = s.powf(n);
    vmax * sn / (km.powf(n) + sn)
}

/// Apparent Michaelis constant under competitive inhibition, `km · (1 + i / ki)`.
#[inline]
pub fn competitive_km(km: f64, inhibitor: f64, ki: f64) -> f64 {
    km * (1.0 + inhibitor / ki)
}

/// Non-competitive inhibition factor `1 / (1 + i / ki)`.
#[inline]
pub fn inhibition_factor(inhibitor: f64, ki: f64) -> f64 {
    1.0 / (1.0 + inhibitor / ki)
}

/// Linear activation factor `1 + a / ka`.
#[inline]
pub fn activation_factor(activator: f64, ka: f64) -> f64 {
    1.0 + activator / ka
}

/// Hill-type activation factor `1 + xⁿ / (1 + xⁿ)` with `x = a / ka`.
///
/// Ranges from 1 (no activator) to 2 (saturating activator).
#[inline]
pub fn hill_activation_factor(activator: f64, ka: f64, n: f64) -> f64 {
    let xn = (activator / ka).powf(n);
    1.0 + xn / (1.0 + xn)
}
