//! High-level circuit builder API.

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::layout::{self, CircuitLayer};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit: a fixed register of qubits and classical bits plus an
/// ordered list of instructions.
///
/// Every builder method validates operands before appending, so a `Circuit`
/// never holds an instruction that refers to a wire it does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubit wires.
    num_qubits: u32,
    /// Number of classical bit wires.
    num_clbits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Append an instruction after checking its arity and operand ranges.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        instruction.validate()?;

        let gate_name = || Some(instruction.name().to_string());
        for qubit in instruction.qubits() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }
        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name(),
                });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled(StandardGate::CX, [control], target))
    }

    /// Apply a Toffoli gate with two or more controls.
    pub fn ccx(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled(StandardGate::CCX, controls, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::ISwap, q1, q2))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Qubit ids in wire order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> {
        (0..self.num_qubits).map(QubitId)
    }

    /// Classical bit ids in wire order.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> {
        (0..self.num_clbits).map(ClbitId)
    }

    /// Drawable columns, see [`layout::layers`].
    pub fn layers(&self) -> Vec<CircuitLayer<'_>> {
        layout::layers(self)
    }

    /// Number of drawn columns.
    pub fn depth(&self) -> usize {
        self.layers().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::InstructionKind;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::with_size("test", 0, 0);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3, 1);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 1);
        assert_eq!(circuit.qubits().last(), Some(QubitId(2)));
        assert_eq!(circuit.clbits().collect::<Vec<_>>(), vec![ClbitId(0)]);
    }

    #[test]
    fn test_fluent_api_keeps_order() {
        let mut circuit = Circuit::with_size("test", 3, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .ccx([QubitId(0), QubitId(1)], QubitId(2))
            .unwrap()
            .measure(QubitId(2), ClbitId(0))
            .unwrap();

        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "cx", "ccx", "measure"]);
        assert_eq!(circuit.instructions().len(), 4);
    }

    #[test]
    fn test_out_of_range_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 2, 1);
        let err = circuit.x(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { qubit: QubitId(2), .. }));
        assert_eq!(circuit.instructions().len(), 0);
    }

    #[test]
    fn test_out_of_range_clbit_rejected() {
        let mut circuit = Circuit::with_size("test", 1, 1);
        let err = circuit.measure(QubitId(0), ClbitId(1)).unwrap_err();
        assert!(matches!(err, IrError::ClbitNotFound { .. }));
    }

    #[test]
    fn test_repeated_measurement_same_clbit() {
        let mut circuit = Circuit::with_size("test", 2, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(0)).unwrap();
        assert!(
            circuit
                .instructions()
                .iter()
                .all(|i| i.kind == InstructionKind::Measure && i.clbits == vec![ClbitId(0)])
        );
    }
}
