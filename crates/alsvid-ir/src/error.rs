//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit position exceeds the circuit's qubit count.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit")]
    QubitOutOfRange {
        /// The offending position.
        qubit: QubitId,
        /// Qubit count of the circuit.
        num_qubits: usize,
    },

    /// Classical bit position exceeds the circuit's classical bit count.
    #[error("Classical bit {clbit} out of range for {num_clbits}-bit circuit")]
    ClbitOutOfRange {
        /// The offending position.
        clbit: ClbitId,
        /// Classical bit count of the circuit.
        num_clbits: usize,
    },

    /// Duplicate qubit in a single operation.
    #[error("Duplicate qubit {qubit} in operation")]
    DuplicateQubit {
        /// The duplicate position.
        qubit: QubitId,
    },

    /// Duplicate classical bit in a single operation.
    #[error("Duplicate classical bit {clbit} in operation")]
    DuplicateClbit {
        /// The duplicate position.
        clbit: ClbitId,
    },

    /// Qubit was already assigned a measurement earlier in the circuit.
    #[error("Qubit {qubit} is already measured")]
    QubitAlreadyMeasured {
        /// The re-measured qubit.
        qubit: QubitId,
    },

    /// Classical bit already holds an earlier measurement result.
    #[error("Classical bit {clbit} is already assigned")]
    ClbitAlreadyAssigned {
        /// The re-used classical bit.
        clbit: ClbitId,
    },

    /// Measurement qubit and classical bit lists differ in length.
    #[error("Measurement maps {qubits} qubits to {clbits} classical bits")]
    MeasureMismatch {
        /// Number of qubits to measure.
        qubits: usize,
        /// Number of classical bits supplied.
        clbits: usize,
    },

    /// Parameter vector length differs from the number of parameterized gates.
    #[error("Expected {expected} parameter values, got {got}")]
    ParamCountMismatch {
        /// Number of parameterized gates in the circuit.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// A composite gate is already registered under this name.
    #[error("Gate name '{name}' is already registered")]
    GateNameTaken {
        /// The colliding name.
        name: String,
    },

    /// No composite gate is registered under this name.
    #[error("No gate registered under name '{name}'")]
    GateNotRegistered {
        /// The unknown name.
        name: String,
    },

    /// Conditional block names no classical bits to compare against.
    #[error("Conditional block references no classical bits")]
    InvalidCondition,
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
