//! `OpenQASM` 2.0 emitter for Alsvid
//!
//! This crate serializes an [`alsvid_ir::Circuit`] into `OPENQASM 2.0`
//! source for external collaborators (hardware toolchains and simulators
//! that ingest the qelib1 dialect). Parsing QASM back into a circuit is
//! left to those collaborators.
//!
//! # Emitted Subset
//!
//! | Construct | Example |
//! |-----------|---------|
//! | Header | `OPENQASM 2.0;` + `include "qelib1.inc";` |
//! | Register declarations | `qreg q[2];`, `creg meas[2];` |
//! | Gates | `h q[0];`, `cx q[0],q[1];`, `rx(pi/2) q[0];` |
//! | Timing | `delay(200ns) q[0];`, `xy(30us) q[0],q[1];` |
//! | Barrier / reset | `barrier q[0],q[1];`, `reset q[0];` |
//! | Measurements | `measure q[0] -> meas[0];` |
//!
//! Pulses and conditional blocks have no QASM 2.0 form and are omitted.
//! Composite gates emit their bound expansion so the output stays within
//! the qelib1 gate vocabulary plus the declared registers.
//!
//! # Example
//!
//! ```rust
//! use alsvid_ir::Circuit;
//! use alsvid_qasm::emit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let qasm = emit(&circuit);
//!
//! assert!(qasm.starts_with("OPENQASM 2.0;"));
//! assert!(qasm.contains("cx q[0],q[1];"));
//! assert!(qasm.contains("measure q[0] -> meas[0];"));
//! ```

mod emitter;

pub use emitter::emit;
