//! `qcv-sim`: open-system time evolution for the dynamics endpoint.
//!
//! Integrates the Lindblad master equation
//!
//!   dρ/dt = −i[H, ρ] + Σ_k ( L_k ρ L_k† − ½ {L_k† L_k, ρ} )
//!
//! on dense complex matrices with a fixed-step fourth-order Runge–Kutta
//! scheme, sampling expectation values at caller-supplied times.
//!
//! # Quick start
//!
//! ```rust
//! use qcv_sim::model::DrivenQubit;
//! use qcv_sim::operator::linspace;
//!
//! let model = DrivenQubit::new(1.0, 0.1).unwrap();
//! let times = linspace(0.0, 5.0, 100);
//! let cmp = model.compare(&times).unwrap();
//! assert_eq!(cmp.solved.len(), 100);
//! assert!((cmp.solved[0] - 1.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod model;
pub mod operator;
pub mod solver;

pub use error::{SimError, SimResult};
pub use model::{DrivenQubit, SigmaZComparison};
pub use operator::{Ket, Operator};
pub use solver::{InitialState, MasterEquation, SolverOptions, Trajectory, mesolve};
