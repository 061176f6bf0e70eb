//! Dense operators, states and the handful of constructors the dynamics
//! model needs.
//!
//! Conventions: `σz = diag(1, −1)`, so `basis(2, 0)` is the +1 eigenstate
//! of σz.

use ndarray::{Array1, Array2, array};
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Square complex matrix acting on a finite Hilbert space.
pub type Operator = Array2<Complex64>;

/// State vector.
pub type Ket = Array1<Complex64>;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Pauli-X.
pub fn sigmax() -> Operator {
    array![[ZERO, ONE], [ONE, ZERO]]
}

/// Pauli-Y.
pub fn sigmay() -> Operator {
    array![[ZERO, -I], [I, ZERO]]
}

/// Pauli-Z.
pub fn sigmaz() -> Operator {
    array![[ONE, ZERO], [ZERO, -ONE]]
}

/// Identity on a `dim`-dimensional space.
pub fn identity(dim: usize) -> Operator {
    Array2::eye(dim)
}

/// Computational basis vector `|n⟩` in a `dim`-dimensional space.
pub fn basis(dim: usize, n: usize) -> SimResult<Ket> {
    if n >= dim {
        return Err(SimError::InvalidBasis { dim, n });
    }
    let mut ket = Array1::zeros(dim);
    ket[n] = ONE;
    Ok(ket)
}

/// Density matrix `|ψ⟩⟨ψ|` of a pure state.
pub fn ket2dm(ket: &Ket) -> Operator {
    let dim = ket.len();
    Array2::from_shape_fn((dim, dim), |(i, j)| ket[i] * ket[j].conj())
}

/// Conjugate transpose.
pub fn dagger(op: &Operator) -> Operator {
    op.t().mapv(|z| z.conj())
}

/// Matrix trace.
pub fn trace(op: &Operator) -> Complex64 {
    op.diag().sum()
}

/// Expectation value `Tr(A ρ)`; the imaginary part vanishes for Hermitian `A`.
pub fn expect(op: &Operator, rho: &Operator) -> f64 {
    trace(&op.dot(rho)).re
}

/// Frobenius norm, an upper bound on the spectral norm.
pub fn frobenius_norm(op: &Operator) -> f64 {
    op.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Scale an operator by a real factor.
pub fn scale(op: &Operator, factor: f64) -> Operator {
    op.mapv(|z| z * factor)
}

/// `num` evenly spaced samples over `[start, stop]`, endpoints included.
///
/// `num == 1` yields `[start]`; `num == 0` yields an empty grid.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}
