//! QCV Circuit Intermediate Representation
//!
//! This crate provides the data structures the circuit visualiser builds from
//! an inbound request before handing it to the diagram renderer.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] for addressing wires
//! - **Gates**: [`StandardGate`] for the gate set the visualiser understands
//! - **Instructions**: [`Instruction`] combining a gate (or measurement) with
//!   explicit target, control and classical operands
//! - **Circuit**: [`Circuit`] ordered builder API with operand validation
//! - **Layout**: [`CircuitLayer`] groups instructions into drawable columns
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcv_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 1);
//!
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure(QubitId(0), ClbitId(0)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.instructions().len(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Operands | Description |
//! |------|----------|-------------|
//! | `H` | 1 target | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 target | Pauli gates |
//! | `CX` | 1 control, 1 target | Controlled-NOT (CNOT) |
//! | `CCX` | ≥2 controls, 1 target | Toffoli (multi-controlled X) |
//! | `Swap` | 2 targets | SWAP gate |
//! | `ISwap` | 2 targets | iSWAP gate |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod layout;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use layout::{CircuitLayer, WireSpan};
pub use qubit::{ClbitId, QubitId};
