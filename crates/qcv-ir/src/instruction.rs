//! Circuit instructions combining gates with operands.

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(StandardGate),
    /// Measurement of one qubit into one classical bit.
    Measure,
}

/// A complete instruction with operands.
///
/// Operands are kept by role rather than by position so that the control /
/// target assignment made at translation time survives unchanged into the
/// diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Target qubits, in the order given.
    pub targets: Vec<QubitId>,
    /// Control qubits, in the order given.
    pub controls: Vec<QubitId>,
    /// Classical bits written by this instruction (for measure).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create an uncontrolled gate instruction.
    fn gate(gate: StandardGate, targets: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            targets: targets.into_iter().collect(),
            controls: vec![],
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-target gate instruction (SWAP-like).
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a controlled gate instruction.
    pub fn controlled(
        gate: StandardGate,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            targets: vec![target],
            controls: controls.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            targets: vec![qubit],
            controls: vec![],
            clbits: vec![clbit],
        }
    }

    /// Check operand counts against the gate's arity and reject repeated
    /// qubits. Range checks against a circuit happen in
    /// [`Circuit::apply`](crate::Circuit::apply).
    pub fn validate(&self) -> IrResult<()> {
        let gate_name = self.name().to_string();

        let (targets, min_controls, max_controls) = match self.kind {
            InstructionKind::Gate(g) => (g.num_targets(), g.min_controls(), g.max_controls()),
            InstructionKind::Measure => (1, 0, Some(0)),
        };

        if self.targets.len() != targets {
            return Err(IrError::QubitCountMismatch {
                gate_name,
                role: "target",
                expected: targets.to_string(),
                got: self.targets.len(),
            });
        }

        let got = self.controls.len();
        let controls_ok = got >= min_controls && max_controls.is_none_or(|max| got <= max);
        if !controls_ok {
            let expected = match max_controls {
                Some(max) if max == min_controls => max.to_string(),
                Some(max) => format!("{min_controls} to {max}"),
                None => format!("at least {min_controls}"),
            };
            return Err(IrError::QubitCountMismatch {
                gate_name,
                role: "control",
                expected,
                got,
            });
        }

        if self.is_measure() && self.clbits.len() != 1 {
            return Err(IrError::QubitCountMismatch {
                gate_name,
                role: "classical",
                expected: "1".to_string(),
                got: self.clbits.len(),
            });
        }

        let mut seen: Vec<QubitId> = Vec::with_capacity(targets + got);
        for q in self.qubits() {
            if seen.contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: Some(gate_name),
                });
            }
            seen.push(q);
        }

        Ok(())
    }

    /// All qubits touched by this instruction, controls first.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.controls.iter().chain(self.targets.iter()).copied()
    }

    /// Lowest and highest qubit index touched, or `None` if there are none.
    pub fn qubit_range(&self) -> Option<(QubitId, QubitId)> {
        let min = self.qubits().min()?;
        let max = self.qubits().max()?;
        Some((min, max))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &'static str {
        match self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert_eq!(inst.kind, InstructionKind::Gate(StandardGate::H));
        assert_eq!(inst.targets, vec![QubitId(0)]);
        assert!(inst.controls.is_empty());
        assert_eq!(inst.name(), "h");
        assert!(inst.validate().is_ok());
    }

    #[test]
    fn test_controlled_instruction_keeps_roles() {
        let inst = Instruction::controlled(StandardGate::CX, [QubitId(1)], QubitId(0));
        assert_eq!(inst.targets, vec![QubitId(0)]);
        assert_eq!(inst.controls, vec![QubitId(1)]);
        assert_eq!(inst.qubits().collect::<Vec<_>>(), vec![QubitId(1), QubitId(0)]);
        assert_eq!(inst.qubit_range(), Some((QubitId(0), QubitId(1))));
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure(QubitId(2), ClbitId(0));
        assert!(inst.is_measure());
        assert_eq!(inst.clbits, vec![ClbitId(0)]);
        assert!(inst.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_control() {
        let inst = Instruction::gate(StandardGate::CX, [QubitId(0)]);
        let err = inst.validate().unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch { role: "control", got: 0, .. }
        ));
    }

    #[test]
    fn test_validate_allows_many_toffoli_controls() {
        let inst = Instruction::controlled(
            StandardGate::CCX,
            [QubitId(1), QubitId(2), QubitId(3)],
            QubitId(0),
        );
        assert!(inst.validate().is_ok());

        let one = Instruction::controlled(StandardGate::CCX, [QubitId(1)], QubitId(0));
        assert!(one.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let inst = Instruction::two_qubit_gate(StandardGate::Swap, QubitId(1), QubitId(1));
        assert!(matches!(
            inst.validate(),
            Err(IrError::DuplicateQubit { qubit: QubitId(1), .. })
        ));
    }
}
