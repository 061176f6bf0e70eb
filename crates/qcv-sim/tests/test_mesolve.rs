//! Tests for the Lindblad integrator and the driven two-level model.

use std::f64::consts::PI;

use proptest::prelude::*;
use qcv_sim::model::{DrivenQubit, default_times};
use qcv_sim::operator::{basis, dagger, linspace, sigmax, sigmaz, trace};
use qcv_sim::{MasterEquation, SimError, SolverOptions, mesolve};

// ---------------------------------------------------------------------------
// Closed-system limit
// ---------------------------------------------------------------------------

#[test]
fn undamped_rabi_matches_cosine() {
    // H = π σx from |0⟩ gives ⟨σz⟩ = cos(2πt), which is also the analytic
    // reference when β = 0.
    let model = DrivenQubit::new(2.0 * PI, 0.0).unwrap();
    let times = default_times();
    let cmp = model.compare(&times).unwrap();

    assert_eq!(cmp.times.len(), 100);
    for ((t, solved), analytic) in cmp.times.iter().zip(&cmp.solved).zip(&cmp.analytic) {
        assert!(
            (solved - analytic).abs() < 1e-6,
            "t = {t}: solved {solved} vs analytic {analytic}"
        );
    }
}

#[test]
fn generic_hamiltonian_through_mesolve() {
    let omega = 1.3;
    let h = sigmax().mapv(|z| z * (omega / 2.0));
    let times = linspace(0.0, 3.0, 31);
    let traj = mesolve(h, basis(2, 0).unwrap(), &times, vec![], &[sigmaz()]).unwrap();
    for (t, sz) in times.iter().zip(&traj.expect[0]) {
        assert!((sz - (omega * t).cos()).abs() < 1e-8);
    }
}

#[test]
fn fast_drive_keeps_full_amplitude() {
    let delta = 1000.0;
    let model = DrivenQubit::new(delta, 0.0).unwrap();
    let times = default_times();
    let traj = model.solve(&times).unwrap();

    for (t, sz) in times.iter().zip(&traj.expect[0]) {
        let exact = (delta * t).cos();
        assert!((sz - exact).abs() < 1e-2, "t = {t}: solved {sz} vs {exact}");
    }
    let purity = trace(&traj.final_state.dot(&traj.final_state)).re;
    assert!((purity - 1.0).abs() < 1e-3, "purity {purity} should stay 1");
}

// ---------------------------------------------------------------------------
// Dissipation
// ---------------------------------------------------------------------------

#[test]
fn pure_dephasing_leaves_populations_alone() {
    let model = DrivenQubit::new(0.0, 1.0).unwrap();
    let traj = model.solve(&linspace(0.0, 5.0, 11)).unwrap();
    assert!(traj.expect[0].iter().all(|sz| (sz - 1.0).abs() < 1e-12));
}

#[test]
fn dephasing_reduces_purity_and_keeps_trace() {
    let model = DrivenQubit::new(1.0, 0.1).unwrap();
    let traj = model.solve(&default_times()).unwrap();
    let rho = &traj.final_state;

    assert!((trace(rho).re - 1.0).abs() < 1e-9);
    assert!(trace(rho).im.abs() < 1e-12);

    let hermitian_gap = (rho - &dagger(rho)).iter().map(|z| z.norm()).fold(0.0, f64::max);
    assert!(hermitian_gap < 1e-12);

    let purity = trace(&rho.dot(rho)).re;
    assert!(purity < 0.999, "purity {purity} should have decayed");
}

#[test]
fn strong_dephasing_stays_bounded() {
    // Coherences decay at 2β; populations then follow a slow incoherent
    // drift with rate δ²/(2β).
    let model = DrivenQubit::new(1.0, 2000.0).unwrap();
    let traj = model.solve(&default_times()).unwrap();

    for sz in &traj.expect[0] {
        assert!(sz.is_finite());
        assert!(*sz <= 1.0 + 1e-9 && *sz > 0.99, "<sigma_z> = {sz}");
    }
    assert!((trace(&traj.final_state).re - 1.0).abs() < 1e-9);
}

#[test]
fn solved_curve_starts_at_one() {
    let model = DrivenQubit::new(1.0, 0.1).unwrap();
    let cmp = model.compare(&default_times()).unwrap();
    assert!((cmp.solved[0] - 1.0).abs() < 1e-12);
    assert!((cmp.analytic[0] - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn empty_time_grid_is_rejected() {
    let model = DrivenQubit::new(1.0, 0.1).unwrap();
    assert!(matches!(model.solve(&[]), Err(SimError::InvalidTimes(_))));
}

#[test]
fn zero_max_step_is_rejected() {
    let me = MasterEquation::new(sigmax(), vec![]).unwrap();
    let err = me
        .evolve(
            basis(2, 0).unwrap().into(),
            &[0.0, 1.0],
            &[sigmaz()],
            SolverOptions {
                max_step: 0.0,
                ..SolverOptions::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidCoefficient { name: "max_step", .. }));
}

#[test]
fn mismatched_initial_state_is_rejected() {
    let err = mesolve(sigmax(), basis(3, 0).unwrap(), &[0.0], vec![], &[]).unwrap_err();
    assert!(matches!(err, SimError::DimensionMismatch { expected: 2, got: 3, .. }));
}

// ---------------------------------------------------------------------------
// Physical bounds
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn sigma_z_stays_in_bounds(delta in -10.0f64..10.0, beta in 0.0f64..2.0) {
        let model = DrivenQubit::new(delta, beta).unwrap();
        let traj = model.solve(&linspace(0.0, 2.0, 21)).unwrap();
        for sz in &traj.expect[0] {
            prop_assert!(sz.abs() <= 1.0 + 1e-9);
        }
        prop_assert!((trace(&traj.final_state).re - 1.0).abs() < 1e-9);
    }
}
