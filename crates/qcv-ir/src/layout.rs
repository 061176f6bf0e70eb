//! Column layout for circuit diagrams.
//!
//! Wires are numbered top to bottom: qubit `i` is row `i`, classical bit `c`
//! is row `num_qubits + c`. An instruction occupies every row between its
//! outermost operands (the vertical connector crosses them), so it is placed
//! in the first column after every earlier instruction overlapping that span.

use rustc_hash::FxHashMap;

use crate::circuit::Circuit;
use crate::instruction::Instruction;

/// Inclusive range of wire rows covered by one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireSpan {
    /// First (topmost) row.
    pub top: usize,
    /// Last (bottommost) row.
    pub bottom: usize,
}

impl WireSpan {
    /// Rows covered by `instruction` in a circuit with `num_qubits` qubit wires.
    pub fn of(instruction: &Instruction, num_qubits: usize) -> Option<Self> {
        let (min, max) = instruction.qubit_range()?;
        let mut top = min.index();
        let mut bottom = max.index();
        for clbit in &instruction.clbits {
            let row = num_qubits + clbit.index();
            top = top.min(row);
            bottom = bottom.max(row);
        }
        Some(Self { top, bottom })
    }

    /// Iterate over the covered rows.
    pub fn rows(self) -> std::ops::RangeInclusive<usize> {
        self.top..=self.bottom
    }
}

/// A single drawn column.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitLayer<'a> {
    /// Column index (0-based).
    pub depth: usize,
    /// Instructions drawn in this column, in application order.
    pub instructions: Vec<&'a Instruction>,
}

/// Group the circuit's instructions into columns.
pub fn layers(circuit: &Circuit) -> Vec<CircuitLayer<'_>> {
    let num_qubits = circuit.num_qubits();
    let mut layers: Vec<CircuitLayer<'_>> = vec![];
    let mut row_depth: FxHashMap<usize, usize> = FxHashMap::default();

    for instruction in circuit.instructions() {
        let Some(span) = WireSpan::of(instruction, num_qubits) else {
            continue;
        };

        let op_depth = span
            .rows()
            .map(|row| row_depth.get(&row).copied().unwrap_or(0))
            .max()
            .unwrap_or(0);

        while layers.len() <= op_depth {
            layers.push(CircuitLayer {
                depth: layers.len(),
                instructions: vec![],
            });
        }
        layers[op_depth].instructions.push(instruction);

        for row in span.rows() {
            row_depth.insert(row, op_depth + 1);
        }
    }

    layers
}
