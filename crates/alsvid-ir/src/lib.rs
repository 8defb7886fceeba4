//! Alsvid Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Alsvid. It forms the foundation the tooling around the IR
//! builds on.
//!
//! # Overview
//!
//! The circuit IR is an ordered instruction sequence: program order is the
//! single source of truth, and anything structural (layer schedule, ASCII
//! drawing, used-qubit sets) is a derived view recomputed on demand. The
//! high-level [`Circuit`] API provides a convenient builder pattern that
//! validates every operand before it reaches the sequence.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] for addressing
//!   global positions; [`QuantumRegister`], [`ClassicalRegister`] for the
//!   named groupings the wire format declares
//! - **Gates**: [`StandardGate`] for built-in gates (H, X, CX, etc.) and
//!   [`CompositeGate`] for bound instances of registered templates
//! - **Instructions**: [`Instruction`] combining gates, measurements,
//!   barriers, timing directives and conditionals with their operands
//! - **Layers**: [`LayeredCircuit`] scheduling the sequence onto per-qubit
//!   rows
//! - **Composite registry**: [`GateRegistry`], [`GateTemplate`] for reusable
//!   sub-circuit templates
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use alsvid_ir::{Circuit, QubitId};
//!
//! // Create a new circuit with 2 qubits and 2 classical bits
//! let mut circuit = Circuit::new(2);
//!
//! // Build the Bell state: |00⟩ → (|00⟩ + |11⟩)/√2
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! // Add measurement
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2); // H, CX; measures occupy no layer
//! ```
//!
//! # Example: Conditional Execution
//!
//! ```rust
//! use alsvid_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.measure(&[QubitId(0)], &[ClbitId(0)]).unwrap();
//!
//! // Apply X on qubit 1 only when the measured bit reads 1
//! circuit
//!     .with_cif([ClbitId(0)], 1, |c| {
//!         c.x(QubitId(1))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(circuit.instructions().len(), 3);
//! assert!(!circuit.backend_executable());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase and π/8 gates with daggers |
//! | `SX`, `SXdg`, `SY`, `SYdg` | 1 | Square roots of X and Y |
//! | `W`, `SW` | 1 | W axis gate and its square root |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX`, `CY`, `CZ`, `CS`, `CT`, `CP` | 2 | Controlled gates |
//! | `Swap`, `ISwap` | 2 | SWAP and iSWAP gates |
//! | `RXX`, `RYY`, `RZZ` | 2 | Two-qubit rotation gates |
//! | `CCX` | 3 | Toffoli (CCNOT) gate |
//! | `CSwap` | 3 | Fredkin gate |
//! | `MCX`, `MCY`, `MCZ` | n | Multi-controlled Pauli gates |

pub mod circuit;
pub mod draw;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod layer;
pub mod oracle;
pub mod qubit;
pub mod register;

pub use circuit::Circuit;
pub use draw::draw;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, StandardGate};
pub use instruction::{CifBlock, Instruction, InstructionKind, PulseShape, TimeUnit};
pub use layer::{LayerRow, LayeredCircuit};
pub use oracle::{CompositeGate, GateRegistry, GateTemplate};
pub use qubit::{ClbitId, QubitId};
pub use register::{ClassicalRegister, QuantumRegister};
