//! Quantum gate types.

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardGate {
    // Single-qubit gates
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Controlled gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Toffoli gate, generalised to any number (≥2) of controls.
    CCX,

    // Two-target gates
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::CX => "cx",
            StandardGate::CCX => "ccx",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
        }
    }

    /// Text drawn inside the gate box.
    ///
    /// Controlled-X gates draw a target symbol instead of a box, so the label
    /// is only used for legends and logs.
    pub fn label(&self) -> &'static str {
        match self {
            StandardGate::H => "H",
            StandardGate::X => "X",
            StandardGate::Y => "Y",
            StandardGate::Z => "Z",
            StandardGate::CX => "CNOT",
            StandardGate::CCX => "TOFFOLI",
            StandardGate::Swap => "SWAP",
            StandardGate::ISwap => "iSWAP",
        }
    }

    /// Number of target qubits the gate acts on.
    #[inline]
    pub fn num_targets(&self) -> usize {
        match self {
            StandardGate::Swap | StandardGate::ISwap => 2,
            _ => 1,
        }
    }

    /// Minimum number of control qubits.
    #[inline]
    pub fn min_controls(&self) -> usize {
        match self {
            StandardGate::CX => 1,
            StandardGate::CCX => 2,
            _ => 0,
        }
    }

    /// Maximum number of control qubits, `None` when unbounded.
    #[inline]
    pub fn max_controls(&self) -> Option<usize> {
        match self {
            StandardGate::CCX => None,
            other => Some(other.min_controls()),
        }
    }

    /// Whether the gate carries control qubits.
    #[inline]
    pub fn is_controlled(&self) -> bool {
        self.min_controls() > 0
    }
}
