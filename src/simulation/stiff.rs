//! Stiff integrator
//!
//! A linearly implicit Rosenbrock 2(3) pair with adaptive step size. Each step builds
//! the iteration matrix `W = I - h·d·J` from a finite-difference Jacobian, factors it
//! once and reuses the factorization for all three stages. The embedded third-order
//! stage only feeds the error estimate; the solution advances with the second-order one.
//!
//! Output times are hit exactly: a step that would overshoot the next output time is
//! shortened to land on it.

use nalgebra::{DMatrix, DVector};
use peroxide::fuga::ODEProblem;

use super::{
    error::IntegrationError,
    integrator::{eval_rhs, validate_times, Integrator},
    setup::SolverSetup,
    trajectory::Trajectory,
};

const SQRT2: f64 = std::f64::consts::SQRT_2;

/// Diagonal coefficient `1 / (2 + √2)`
const D: f64 = 1.0 / (2.0 + SQRT2);
/// Third-stage coupling `6 + √2`
const E32: f64 = 6.0 + SQRT2;

const SAFETY: f64 = 0.8;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Adaptive Rosenbrock integrator for stiff kinetic systems.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StiffSolver {
    setup: SolverSetup,
}

impl StiffSolver {
    pub fn new(setup: SolverSetup) -> Self {
        Self { setup }
    }

    pub fn setup(&self) -> &SolverSetup {
        &self.setup
    }
}

/// Result of a single attempted step
struct Attempt {
    y_new: DVector<f64>,
    error: f64,
}

impl Integrator for StiffSolver {
    fn integrate<P: ODEProblem>(
        &self,
        problem: &P,
        y0: &[f64],
        times: &[f64],
    ) -> Result<Trajectory, IntegrationError> {
        validate_times(times)?;

        let t_start = times[0];
        let t_end = times[times.len() - 1];

        let mut t = t_start;
        let mut y = DVector::from_column_slice(y0);
        let mut h = self.setup.initial_step(t_end - t_start);
        let mut steps = 0usize;

        let mut rows = Vec::with_capacity(times.len());
        rows.push(y0.to_vec());

        for &t_out in &times[1..] {
            while t < t_out {
                if steps >= self.setup.max_steps {
                    return Err(IntegrationError::MaxStepsExceeded(self.setup.max_steps));
                }
                steps += 1;

                let clipped = t + h >= t_out;
                let h_try = if clipped { t_out - t } else { h };

                let attempt = self.attempt(problem, t, &y, h_try)?;

                if attempt.error.is_finite() && attempt.error <= 1.0 {
                    if attempt.y_new.iter().any(|v| !v.is_finite()) {
                        return Err(IntegrationError::NonFiniteState(t));
                    }

                    t = if clipped { t_out } else { t + h_try };
                    y = attempt.y_new;

                    let factor = step_factor(attempt.error).min(MAX_FACTOR);
                    h = if clipped {
                        h.max(h_try * factor)
                    } else {
                        h_try * factor
                    };
                } else {
                    h = h_try * step_factor(attempt.error);

                    if h < self.setup.h_min {
                        return Err(if attempt.error.is_finite() {
                            IntegrationError::StepSizeUnderflow { t, h }
                        } else {
                            IntegrationError::NonFiniteState(t)
                        });
                    }
                }
            }

            rows.push(y.as_slice().to_vec());
        }

        Trajectory::from_rows(times.to_vec(), &rows).ok_or(IntegrationError::DimensionMismatch {
            expected: y0.len(),
            found: rows.last().map_or(0, |r| r.len()),
        })
    }
}

impl StiffSolver {
    fn attempt<P: ODEProblem>(
        &self,
        problem: &P,
        t: f64,
        y: &DVector<f64>,
        h: f64,
    ) -> Result<Attempt, IntegrationError> {
        let n = y.len();

        let f0 = rhs(problem, t, y)?;
        let jac = jacobian(problem, t, y, &f0)?;
        let dfdt = time_derivative(problem, t, y, &f0)?;

        let w = DMatrix::<f64>::identity(n, n) - jac * (h * D);
        let lu = w.lu();
        let solve = |b: DVector<f64>| lu.solve(&b).ok_or(IntegrationError::SingularMatrix(t));

        let hdt = &dfdt * (h * D);

        let k1 = solve(&f0 + &hdt)?;

        let f1 = rhs(problem, t + 0.5 * h, &(y + &k1 * (0.5 * h)))?;
        let k2 = solve(&f1 - &k1)? + &k1;

        let y_new = y + &k2 * h;
        let f2 = rhs(problem, t + h, &y_new)?;

        let k3 = solve(&f2 - (&k2 - &f1) * E32 - (&k1 - &f0) * 2.0 + &hdt)?;

        let err = (&k1 - &k2 * 2.0 + &k3) * (h / 6.0);
        let error = error_norm(&err, y, &y_new, self.setup.rtol, self.setup.atol);

        Ok(Attempt { y_new, error })
    }
}

/// Step-size multiplier for a given scaled error, bounded below by [`MIN_FACTOR`].
fn step_factor(error: f64) -> f64 {
    if !error.is_finite() {
        return MIN_FACTOR;
    }
    (SAFETY * error.powf(-1.0 / 3.0)).max(MIN_FACTOR)
}

/// Maximum componentwise error relative to the mixed tolerance.
fn error_norm(err: &DVector<f64>, y: &DVector<f64>, y_new: &DVector<f64>, rtol: f64, atol: f64) -> f64 {
    err.iter()
        .zip(y.iter().zip(y_new.iter()))
        .map(|(e, (a, b))| e.abs() / (atol + rtol * a.abs().max(b.abs())))
        .fold(0.0, |acc: f64, v| {
            if acc.is_nan() || v.is_nan() {
                f64::NAN
            } else {
                acc.max(v)
            }
        })
}

fn rhs<P: ODEProblem>(problem: &P, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, IntegrationError> {
    let mut dy = vec![0.0; y.len()];
    eval_rhs(problem, t, y.as_slice(), &mut dy)?;
    Ok(DVector::from_vec(dy))
}

/// Jacobian `∂f/∂y` by central differences.
fn jacobian<P: ODEProblem>(
    problem: &P,
    t: f64,
    y: &DVector<f64>,
    f0: &DVector<f64>,
) -> Result<DMatrix<f64>, IntegrationError> {
    let n = y.len();
    let eps = 1e-8;

    let mut jac = DMatrix::<f64>::zeros(n, n);
    let mut yp = y.as_slice().to_vec();
    let mut fp = vec![0.0; n];
    let mut fm = vec![0.0; n];

    for j in 0..n {
        let orig = yp[j];
        let delta = eps * (1.0 + orig.abs());

        yp[j] = orig + delta;
        eval_rhs(problem, t, &yp, &mut fp)?;
        yp[j] = orig - delta;
        eval_rhs(problem, t, &yp, &mut fm)?;
        yp[j] = orig;

        for i in 0..n {
            let d = (fp[i] - fm[i]) / (2.0 * delta);
            // Central difference can straddle a non-smooth point; fall back to one side
            jac[(i, j)] = if d.is_finite() {
                d
            } else {
                (fp[i] - f0[i]) / delta
            };
        }
    }

    Ok(jac)
}

/// Partial derivative `∂f/∂t` by a forward difference.
fn time_derivative<P: ODEProblem>(
    problem: &P,
    t: f64,
    y: &DVector<f64>,
    f0: &DVector<f64>,
) -> Result<DVector<f64>, IntegrationError> {
    let delta = f64::EPSILON.sqrt() * t.abs().max(1.0);
    let ft = rhs(problem, t + delta, y)?;
    Ok((ft - f0) / delta)
}
