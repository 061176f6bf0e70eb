//! Driven, dephasing two-level system.
//!
//! H = δ/2 · σx, one collapse operator √β · σz, starting in |0⟩ and
//! observing ⟨σz⟩. The closed-form reference curve drawn next to the solve
//! is cos(2πt) · e^(−βt).

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::operator::{Ket, Operator, linspace, scale, sigmax, sigmaz};
use crate::solver::{Trajectory, mesolve};

/// End of the default time grid.
pub const DEFAULT_T_END: f64 = 5.0;

/// Number of samples in the default time grid.
pub const DEFAULT_SAMPLES: usize = 100;

/// The default grid: 100 points over `[0, 5]`.
pub fn default_times() -> Vec<f64> {
    linspace(0.0, DEFAULT_T_END, DEFAULT_SAMPLES)
}

/// Solved and analytic ⟨σz⟩ on a shared grid.
#[derive(Debug, Clone)]
pub struct SigmaZComparison {
    /// Sample times.
    pub times: Vec<f64>,
    /// ⟨σz⟩ from the master-equation solve.
    pub solved: Vec<f64>,
    /// cos(2πt) · e^(−βt).
    pub analytic: Vec<f64>,
}

/// Coefficients of the driven two-level model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrivenQubit {
    /// Drive strength δ.
    pub delta: f64,
    /// Dissipation rate β.
    pub beta: f64,
}

impl DrivenQubit {
    /// Validate and wrap the coefficients.
    pub fn new(delta: f64, beta: f64) -> SimResult<Self> {
        if !delta.is_finite() {
            return Err(SimError::InvalidCoefficient {
                name: "delta",
                requirement: "finite",
                value: delta,
            });
        }
        if !(beta.is_finite() && beta >= 0.0) {
            return Err(SimError::InvalidCoefficient {
                name: "beta",
                requirement: "finite and non-negative",
                value: beta,
            });
        }
        Ok(Self { delta, beta })
    }

    /// δ/2 · σx.
    pub fn hamiltonian(&self) -> Operator {
        scale(&sigmax(), self.delta / 2.0)
    }

    /// [√β · σz].
    pub fn collapse_ops(&self) -> Vec<Operator> {
        vec![scale(&sigmaz(), self.beta.sqrt())]
    }

    /// |0⟩.
    pub fn initial_state(&self) -> Ket {
        let mut ket = Ket::zeros(2);
        ket[0] = Complex64::new(1.0, 0.0);
        ket
    }

    /// Solve for ⟨σz⟩ at `times`.
    pub fn solve(&self, times: &[f64]) -> SimResult<Trajectory> {
        mesolve(
            self.hamiltonian(),
            self.initial_state(),
            times,
            self.collapse_ops(),
            &[sigmaz()],
        )
    }

    /// Reference curve cos(2πt) · e^(−βt).
    pub fn analytic_sigma_z(&self, times: &[f64]) -> Vec<f64> {
        times
            .iter()
            .map(|&t| (2.0 * PI * t).cos() * (-t * self.beta).exp())
            .collect()
    }

    /// Solve and pair the result with the analytic reference.
    pub fn compare(&self, times: &[f64]) -> SimResult<SigmaZComparison> {
        let mut trajectory = self.solve(times)?;
        let solved = trajectory.expect.pop().unwrap_or_default();
        Ok(SigmaZComparison {
            times: trajectory.times,
            solved,
            analytic: self.analytic_sigma_z(times),
        })
    }
}
