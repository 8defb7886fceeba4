//! Quantum and classical registers.
//!
//! A register is a fixed-size, named range of global bit positions. Circuits
//! address bits by global position; registers carry the grouping needed for
//! declaration and operand naming in the wire format. Both kinds are
//! immutable once created.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qubit::{ClbitId, QubitId};

/// A named, fixed-size range of qubit positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    name: String,
    offset: u32,
    size: u32,
}

impl QuantumRegister {
    /// Create a register covering positions `offset..offset + size`.
    pub fn new(name: impl Into<String>, offset: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// The register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First global position covered by this register.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of qubits in this register.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether a global position falls inside this register.
    pub fn contains(&self, qubit: QubitId) -> bool {
        qubit.0 >= self.offset && qubit.0 < self.offset + self.size
    }

    /// Translate a global position to a register-local index.
    ///
    /// Returns `None` if the position lies outside this register.
    pub fn local(&self, qubit: QubitId) -> Option<u32> {
        self.contains(qubit).then(|| qubit.0 - self.offset)
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}

/// A named, fixed-size range of classical bit positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    name: String,
    offset: u32,
    size: u32,
}

impl ClassicalRegister {
    /// Create a register covering positions `offset..offset + size`.
    pub fn new(name: impl Into<String>, offset: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// The register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First global position covered by this register.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of bits in this register.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether a global position falls inside this register.
    pub fn contains(&self, clbit: ClbitId) -> bool {
        clbit.0 >= self.offset && clbit.0 < self.offset + self.size
    }

    /// Translate a global position to a register-local index.
    ///
    /// Returns `None` if the position lies outside this register.
    pub fn local(&self, clbit: ClbitId) -> Option<u32> {
        self.contains(clbit).then(|| clbit.0 - self.offset)
    }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}
