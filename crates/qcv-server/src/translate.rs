//! Translation of inbound payloads into engine inputs.
//!
//! The circuit translator is deliberately lenient: unknown gate names and
//! multi-qubit gates with too few indices are skipped without error. Only a
//! single-qubit gate with no index at all, or an index outside the
//! register, fails the request.

use qcv_ir::{Circuit, ClbitId, IrError, QubitId};
use serde_json::Value;
use tracing::debug;

use crate::dto::CircuitRequest;

/// Classical bits in every translated circuit.
pub const CLASSICAL_BITS: u32 = 1;

/// Translation errors.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("gate {gate} at position {index} has no qubit index")]
    MissingQubit { gate: String, index: usize },

    #[error("missing key '{0}'")]
    MissingKey(&'static str),

    #[error("'{key}' must be a number, got {found}")]
    NotANumber { key: &'static str, found: String },

    #[error("dynamics payload must be a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Coefficients of a dynamics request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsParams {
    /// Drive strength.
    pub delta: f64,
    /// Dissipation rate.
    pub beta: f64,
}

/// Build a circuit with `qubit_no` qubits and one classical bit from
/// `request`, appending gates in order.
///
/// Role assignment: `CNOT` controls on the second index and targets the
/// first; `Toffoli` targets the first index and controls on the rest;
/// `M0` measures the first index into classical bit 0.
pub fn translate_circuit(request: &CircuitRequest) -> Result<Circuit, TranslateError> {
    let mut circuit = Circuit::with_size("circuit", request.qubit_no, CLASSICAL_BITS);

    for (index, gate) in request.gates.iter().enumerate() {
        let q = &gate.qubits;
        let first = || {
            q.first().copied().map(QubitId).ok_or_else(|| TranslateError::MissingQubit {
                gate: gate.name.clone(),
                index,
            })
        };

        match gate.name.as_str() {
            "H" => {
                circuit.h(first()?)?;
            }
            "X" => {
                circuit.x(first()?)?;
            }
            "Y" => {
                circuit.y(first()?)?;
            }
            "Z" => {
                circuit.z(first()?)?;
            }
            "CNOT" if q.len() >= 2 => {
                circuit.cx(QubitId(q[1]), QubitId(q[0]))?;
            }
            "Toffoli" if q.len() >= 3 => {
                circuit.ccx(q[1..].iter().copied().map(QubitId), QubitId(q[0]))?;
            }
            "SWAP" if q.len() == 2 => {
                circuit.swap(QubitId(q[0]), QubitId(q[1]))?;
            }
            "ISWAP" if q.len() == 2 => {
                circuit.iswap(QubitId(q[0]), QubitId(q[1]))?;
            }
            "M0" if !q.is_empty() => {
                circuit.measure(QubitId(q[0]), ClbitId(0))?;
            }
            _ => {
                debug!(
                    index,
                    gate = %gate.name,
                    qubits = q.len(),
                    "Skipping unsupported or under-specified gate"
                );
            }
        }
    }

    Ok(circuit)
}

/// Read `delta` and `beta` from an untyped JSON object. No other keys are
/// inspected.
pub fn parse_dynamics(body: &Value) -> Result<DynamicsParams, TranslateError> {
    let object = body.as_object().ok_or(TranslateError::NotAnObject)?;
    let number = |key: &'static str| -> Result<f64, TranslateError> {
        let value = object.get(key).ok_or(TranslateError::MissingKey(key))?;
        value.as_f64().ok_or_else(|| TranslateError::NotANumber {
            key,
            found: value.to_string(),
        })
    };

    Ok(DynamicsParams {
        delta: number("delta")?,
        beta: number("beta")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::Gate;
    use proptest::prelude::*;
    use qcv_ir::{InstructionKind, StandardGate};
    use serde_json::json;

    fn gate(name: &str, qubits: &[u32]) -> Gate {
        Gate {
            name: name.to_string(),
            qubits: qubits.to_vec(),
        }
    }

    fn request(qubit_no: u32, gates: Vec<Gate>) -> CircuitRequest {
        CircuitRequest { qubit_no, gates }
    }

    #[test]
    fn test_cnot_targets_first_index() {
        let circuit = translate_circuit(&request(2, vec![gate("CNOT", &[0, 1])])).unwrap();
        let inst = &circuit.instructions()[0];
        assert_eq!(inst.kind, InstructionKind::Gate(StandardGate::CX));
        assert_eq!(inst.targets, vec![QubitId(0)]);
        assert_eq!(inst.controls, vec![QubitId(1)]);
    }

    #[test]
    fn test_toffoli_controls_on_remaining() {
        let circuit = translate_circuit(&request(4, vec![gate("Toffoli", &[2, 0, 3])])).unwrap();
        let inst = &circuit.instructions()[0];
        assert_eq!(inst.targets, vec![QubitId(2)]);
        assert_eq!(inst.controls, vec![QubitId(0), QubitId(3)]);
    }

    #[test]
    fn test_every_m0_writes_clbit_zero() {
        let gates = vec![gate("M0", &[0]), gate("M0", &[1, 0])];
        let circuit = translate_circuit(&request(2, gates)).unwrap();
        assert_eq!(circuit.num_clbits(), 1);
        for (inst, q) in circuit.instructions().iter().zip([0, 1]) {
            assert!(inst.is_measure());
            assert_eq!(inst.targets, vec![QubitId(q)]);
            assert_eq!(inst.clbits, vec![ClbitId(0)]);
        }
    }

    #[test]
    fn test_underspecified_and_unknown_are_skipped() {
        let gates = vec![
            gate("CNOT", &[0]),
            gate("Toffoli", &[0, 1]),
            gate("SWAP", &[0, 1, 2]),
            gate("ISWAP", &[0]),
            gate("M0", &[]),
            gate("T", &[0]),
            gate("h", &[0]),
        ];
        let circuit = translate_circuit(&request(3, gates)).unwrap();
        assert_eq!(circuit.instructions().len(), 0);
        assert_eq!(circuit.num_qubits(), 3);
    }

    #[test]
    fn test_single_qubit_gate_without_index_fails() {
        let err = translate_circuit(&request(1, vec![gate("H", &[])])).unwrap_err();
        assert!(matches!(err, TranslateError::MissingQubit { index: 0, .. }));
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let err = translate_circuit(&request(2, vec![gate("X", &[2])])).unwrap_err();
        assert!(matches!(err, TranslateError::Ir(IrError::QubitNotFound { .. })));
    }

    #[test]
    fn test_parse_dynamics() {
        let p = parse_dynamics(&json!({"delta": 1, "beta": 0.1, "extra": "x"})).unwrap();
        assert_eq!(p, DynamicsParams { delta: 1.0, beta: 0.1 });
    }

    #[test]
    fn test_parse_dynamics_errors() {
        assert!(matches!(
            parse_dynamics(&json!({"delta": 1.0})),
            Err(TranslateError::MissingKey("beta"))
        ));
        assert!(matches!(
            parse_dynamics(&json!({"delta": "fast", "beta": 0.1})),
            Err(TranslateError::NotANumber { key: "delta", .. })
        ));
        assert!(matches!(
            parse_dynamics(&json!([1.0, 0.1])),
            Err(TranslateError::NotAnObject)
        ));
    }

    const NAMES: [&str; 11] = [
        "H", "X", "Y", "Z", "CNOT", "Toffoli", "SWAP", "ISWAP", "M0", "RX", "cnot",
    ];

    fn accepted(name: &str, n: usize) -> bool {
        match name {
            "H" | "X" | "Y" | "Z" | "M0" => n >= 1,
            "CNOT" => n >= 2,
            "Toffoli" => n >= 3,
            "SWAP" | "ISWAP" => n == 2,
            _ => false,
        }
    }

    fn arb_gate() -> impl Strategy<Value = Gate> {
        (
            0..NAMES.len(),
            prop::sample::subsequence((0..6u32).collect::<Vec<_>>(), 1..=4),
        )
            .prop_map(|(i, qubits)| Gate {
                name: NAMES[i].to_string(),
                qubits,
            })
    }

    proptest! {
        #[test]
        fn prop_one_instruction_per_accepted_gate(
            gates in prop::collection::vec(arb_gate(), 0..20),
        ) {
            let expected: Vec<&str> = gates
                .iter()
                .filter(|g| accepted(&g.name, g.qubits.len()))
                .map(|g| g.name.as_str())
                .collect();

            let circuit = translate_circuit(&request(6, gates.clone())).unwrap();
            prop_assert_eq!(circuit.instructions().len(), expected.len());

            for (inst, name) in circuit.instructions().iter().zip(expected) {
                let kind = match name {
                    "H" => InstructionKind::Gate(StandardGate::H),
                    "X" => InstructionKind::Gate(StandardGate::X),
                    "Y" => InstructionKind::Gate(StandardGate::Y),
                    "Z" => InstructionKind::Gate(StandardGate::Z),
                    "CNOT" => InstructionKind::Gate(StandardGate::CX),
                    "Toffoli" => InstructionKind::Gate(StandardGate::CCX),
                    "SWAP" => InstructionKind::Gate(StandardGate::Swap),
                    "ISWAP" => InstructionKind::Gate(StandardGate::ISwap),
                    _ => InstructionKind::Measure,
                };
                prop_assert_eq!(inst.kind, kind);
            }
        }
    }
}
