//! Lindblad master-equation integration.

use num_complex::Complex64;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::operator::{Ket, Operator, dagger, expect, frobenius_norm, ket2dm};

/// Starting point of an evolution.
#[derive(Debug, Clone)]
pub enum InitialState {
    /// Pure state vector.
    Ket(Ket),
    /// Density matrix.
    Density(Operator),
}

impl InitialState {
    fn into_density(self) -> Operator {
        match self {
            InitialState::Ket(ket) => ket2dm(&ket),
            InitialState::Density(rho) => rho,
        }
    }

    fn dim(&self) -> (usize, usize) {
        match self {
            InitialState::Ket(ket) => (ket.len(), ket.len()),
            InitialState::Density(rho) => rho.dim(),
        }
    }
}

impl From<Ket> for InitialState {
    fn from(ket: Ket) -> Self {
        InitialState::Ket(ket)
    }
}

impl From<Operator> for InitialState {
    fn from(rho: Operator) -> Self {
        InitialState::Density(rho)
    }
}

/// Integrator settings.
///
/// The RK4 step is the smallest of `max_step` and the bounds derived from the
/// generator: `max_phase_per_step / (2‖H‖)` keeps oscillations accurate and
/// `max_decay_per_step / (2 Σ‖L†L‖)` keeps dissipation inside the stability
/// region. Norms are Frobenius norms, which bound the spectral norm.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// Largest RK4 step.
    pub max_step: f64,
    /// Largest rotation angle the Hamiltonian part may produce in one step.
    pub max_phase_per_step: f64,
    /// Largest decay exponent the dissipators may produce in one step.
    pub max_decay_per_step: f64,
    /// Work limit between two consecutive sample times.
    pub max_steps_per_interval: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_step: 1e-3,
            max_phase_per_step: 0.1,
            max_decay_per_step: 1.0,
            max_steps_per_interval: 100_000,
        }
    }
}

impl SolverOptions {
    fn validate(&self) -> SimResult<()> {
        let positive = [
            ("max_step", self.max_step),
            ("max_phase_per_step", self.max_phase_per_step),
            ("max_decay_per_step", self.max_decay_per_step),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidCoefficient {
                    name,
                    requirement: "positive and finite",
                    value,
                });
            }
        }
        if self.max_steps_per_interval == 0 {
            return Err(SimError::InvalidCoefficient {
                name: "max_steps_per_interval",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Result of [`mesolve`].
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// Sample times, as requested.
    pub times: Vec<f64>,
    /// One series per observable, each with `times.len()` entries.
    pub expect: Vec<Vec<f64>>,
    /// Density matrix at the last sample time.
    pub final_state: Operator,
}

/// A collapse operator with its derived products cached.
#[derive(Debug, Clone)]
struct Dissipator {
    l: Operator,
    l_dag: Operator,
    l_dag_l: Operator,
}

/// Generator of a Lindblad evolution.
#[derive(Debug, Clone)]
pub struct MasterEquation {
    hamiltonian: Operator,
    dissipators: Vec<Dissipator>,
}

impl MasterEquation {
    /// Build the generator, checking that every operator is square and shares
    /// the Hamiltonian's dimension.
    pub fn new(hamiltonian: Operator, collapse_ops: Vec<Operator>) -> SimResult<Self> {
        let dim = check_square("Hamiltonian", &hamiltonian)?;

        let mut dissipators = Vec::with_capacity(collapse_ops.len());
        for (k, l) in collapse_ops.into_iter().enumerate() {
            let what = format!("collapse operator {k}");
            let got = check_square(&what, &l)?;
            if got != dim {
                return Err(SimError::DimensionMismatch {
                    what,
                    expected: dim,
                    got,
                });
            }
            let l_dag = dagger(&l);
            let l_dag_l = l_dag.dot(&l);
            dissipators.push(Dissipator { l, l_dag, l_dag_l });
        }

        Ok(Self {
            hamiltonian,
            dissipators,
        })
    }

    /// Hilbert-space dimension.
    pub fn dim(&self) -> usize {
        self.hamiltonian.nrows()
    }

    /// Largest RK4 step allowed by `options` for this generator.
    pub fn step_limit(&self, options: &SolverOptions) -> f64 {
        let oscillation = 2.0 * frobenius_norm(&self.hamiltonian);
        let decay: f64 = self
            .dissipators
            .iter()
            .map(|d| 2.0 * frobenius_norm(&d.l_dag_l))
            .sum();

        let mut step = options.max_step;
        if oscillation > 0.0 {
            step = step.min(options.max_phase_per_step / oscillation);
        }
        if decay > 0.0 {
            step = step.min(options.max_decay_per_step / decay);
        }
        step
    }

    /// Evaluate dρ/dt.
    pub fn rhs(&self, rho: &Operator) -> Operator {
        let minus_i = Complex64::new(0.0, -1.0);
        let h_rho = self.hamiltonian.dot(rho);
        let rho_h = rho.dot(&self.hamiltonian);
        let mut out = (h_rho - rho_h).mapv(|z| z * minus_i);

        for d in &self.dissipators {
            let jump = d.l.dot(rho).dot(&d.l_dag);
            let anti = d.l_dag_l.dot(rho) + rho.dot(&d.l_dag_l);
            out = out + jump - anti.mapv(|z| z * 0.5);
        }
        out
    }

    /// One classical RK4 step of size `dt`.
    fn rk4_step(&self, rho: &Operator, dt: f64) -> Operator {
        let k1 = self.rhs(rho);
        let k2 = self.rhs(&(rho + &k1.mapv(|z| z * (dt / 2.0))));
        let k3 = self.rhs(&(rho + &k2.mapv(|z| z * (dt / 2.0))));
        let k4 = self.rhs(&(rho + &k3.mapv(|z| z * dt)));
        let incr = (k1 + k2.mapv(|z| z * 2.0) + k3.mapv(|z| z * 2.0) + k4).mapv(|z| z * (dt / 6.0));
        rho + &incr
    }

    /// Evolve `state` through `times`, recording `Tr(e ρ(t))` for each
    /// observable `e` at every sample. The state at `times[0]` is `state`.
    pub fn evolve(
        &self,
        state: InitialState,
        times: &[f64],
        observables: &[Operator],
        options: SolverOptions,
    ) -> SimResult<Trajectory> {
        check_times(times)?;
        options.validate()?;

        let dim = self.dim();
        let (rows, cols) = state.dim();
        if rows != dim || cols != dim {
            return Err(SimError::DimensionMismatch {
                what: "initial state".to_string(),
                expected: dim,
                got: rows.max(cols),
            });
        }
        for (k, e) in observables.iter().enumerate() {
            let what = format!("observable {k}");
            let got = check_square(&what, e)?;
            if got != dim {
                return Err(SimError::DimensionMismatch {
                    what,
                    expected: dim,
                    got,
                });
            }
        }

        let mut rho = state.into_density();
        let mut series: Vec<Vec<f64>> = observables
            .iter()
            .map(|_| Vec::with_capacity(times.len()))
            .collect();
        let record = |rho: &Operator, series: &mut Vec<Vec<f64>>| {
            for (s, e) in series.iter_mut().zip(observables) {
                s.push(expect(e, rho));
            }
        };

        let step_limit = self.step_limit(&options);
        if !(step_limit.is_finite() && step_limit > 0.0) {
            return Err(SimError::InvalidCoefficient {
                name: "step size",
                requirement: "positive and finite",
                value: step_limit,
            });
        }

        record(&rho, &mut series);
        let mut total_steps = 0usize;
        for window in times.windows(2) {
            let span = window[1] - window[0];
            if span > 0.0 {
                let wanted = (span / step_limit).ceil().max(1.0);
                if wanted > options.max_steps_per_interval as f64 {
                    return Err(SimError::StepLimit {
                        time: window[0],
                        limit: options.max_steps_per_interval,
                    });
                }
                let n = wanted as usize;
                let dt = span / n as f64;
                for _ in 0..n {
                    rho = self.rk4_step(&rho, dt);
                }
                total_steps += n;
            }
            if rho.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
                return Err(SimError::Diverged { time: window[1] });
            }
            record(&rho, &mut series);
        }

        debug!(
            dim,
            samples = times.len(),
            step_limit,
            steps = total_steps,
            "master equation integrated"
        );

        Ok(Trajectory {
            times: times.to_vec(),
            expect: series,
            final_state: rho,
        })
    }
}

/// Solve the master equation for Hamiltonian `h` and collapse operators
/// `c_ops`, sampling each of `e_ops` at `times`.
pub fn mesolve(
    h: Operator,
    state: impl Into<InitialState>,
    times: &[f64],
    c_ops: Vec<Operator>,
    e_ops: &[Operator],
) -> SimResult<Trajectory> {
    MasterEquation::new(h, c_ops)?.evolve(state.into(), times, e_ops, SolverOptions::default())
}

fn check_square(what: &str, op: &Operator) -> SimResult<usize> {
    let (rows, cols) = op.dim();
    if rows != cols || rows == 0 {
        return Err(SimError::NotSquare {
            what: what.to_string(),
            rows,
            cols,
        });
    }
    Ok(rows)
}

fn check_times(times: &[f64]) -> SimResult<()> {
    if times.is_empty() {
        return Err(SimError::InvalidTimes("no sample times".into()));
    }
    if let Some(t) = times.iter().find(|t| !t.is_finite()) {
        return Err(SimError::InvalidTimes(format!("non-finite time {t}")));
    }
    if let Some(w) = times.windows(2).find(|w| w[1] < w[0]) {
        return Err(SimError::InvalidTimes(format!(
            "times must be non-decreasing ({} follows {})",
            w[1], w[0]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{basis, sigmax, sigmaz, trace};

    #[test]
    fn test_rhs_vanishes_for_stationary_state() {
        // |0⟩⟨0| commutes with σz and is a fixed point of σz dephasing.
        let me = MasterEquation::new(sigmaz(), vec![sigmaz()]).unwrap();
        let rho = ket2dm(&basis(2, 0).unwrap());
        assert!(me.rhs(&rho).iter().all(|z| z.norm() < 1e-15));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = MasterEquation::new(sigmax(), vec![Operator::eye(3)]).unwrap_err();
        assert!(matches!(err, SimError::DimensionMismatch { expected: 2, got: 3, .. }));
    }

    #[test]
    fn test_step_limit_shrinks_with_generator_norm() {
        let options = SolverOptions::default();
        let slow = MasterEquation::new(sigmax(), vec![]).unwrap();
        assert_eq!(slow.step_limit(&options), options.max_step);

        let fast = MasterEquation::new(sigmax().mapv(|z| z * 500.0), vec![]).unwrap();
        let expected = options.max_phase_per_step / (1000.0 * 2f64.sqrt());
        assert!((fast.step_limit(&options) - expected).abs() < 1e-15);

        let lossy = MasterEquation::new(sigmax(), vec![sigmaz().mapv(|z| z * 40.0)]).unwrap();
        let expected = options.max_decay_per_step / (2.0 * 1600.0 * 2f64.sqrt());
        assert!((lossy.step_limit(&options) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_step_budget_exceeded() {
        let me = MasterEquation::new(sigmax().mapv(|z| z * 1e9), vec![]).unwrap();
        let err = me
            .evolve(
                basis(2, 0).unwrap().into(),
                &[0.0, 1.0],
                &[sigmaz()],
                SolverOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, SimError::StepLimit { limit: 100_000, .. }));
    }

    #[test]
    fn test_unordered_times_rejected() {
        let me = MasterEquation::new(sigmax(), vec![]).unwrap();
        let err = me
            .evolve(
                basis(2, 0).unwrap().into(),
                &[0.0, 1.0, 0.5],
                &[],
                SolverOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidTimes(_)));
    }

    #[test]
    fn test_single_sample_returns_initial_expectation() {
        let traj = mesolve(sigmax(), basis(2, 1).unwrap(), &[0.0], vec![], &[sigmaz()]).unwrap();
        assert_eq!(traj.expect, vec![vec![-1.0]]);
        assert!((trace(&traj.final_state).re - 1.0).abs() < 1e-12);
    }
}
