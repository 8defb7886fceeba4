//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::oracle::CompositeGate;

/// Standard gates with known semantics.
///
/// Parametric variants carry their rotation angle directly; the angle is the
/// tunable value addressed by [`Circuit::update_params`](crate::Circuit::update_params).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit fixed gates
    /// Identity gate.
    I,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,
    /// sqrt(Y) gate.
    SY,
    /// sqrt(Y)-dagger gate.
    SYdg,
    /// W gate, the Pauli axis (X + Y)/sqrt(2).
    W,
    /// sqrt(W) gate.
    SW,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-S gate.
    CS,
    /// Controlled-T gate.
    CT,
    /// Controlled phase gate.
    CP(f64),
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// XX rotation gate.
    RXX(f64),
    /// YY rotation gate.
    RYY(f64),
    /// ZZ rotation gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,

    // Multi-controlled gates
    /// Multi-controlled X gate.
    MCX {
        /// Number of control qubits.
        controls: u32,
    },
    /// Multi-controlled Y gate.
    MCY {
        /// Number of control qubits.
        controls: u32,
    },
    /// Multi-controlled Z gate.
    MCZ {
        /// Number of control qubits.
        controls: u32,
    },
}

impl StandardGate {
    /// Get the wire-format name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::SY => "sy",
            StandardGate::SYdg => "sydg",
            StandardGate::W => "w",
            StandardGate::SW => "sw",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CS => "cs",
            StandardGate::CT => "ct",
            StandardGate::CP(_) => "cp",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
            StandardGate::MCX { .. } => "mcx",
            StandardGate::MCY { .. } => "mcy",
            StandardGate::MCZ { .. } => "mcz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::H
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::SY
            | StandardGate::SYdg
            | StandardGate::W
            | StandardGate::SW
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CS
            | StandardGate::CT
            | StandardGate::CP(_)
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,

            StandardGate::MCX { controls }
            | StandardGate::MCY { controls }
            | StandardGate::MCZ { controls } => controls + 1,
        }
    }

    /// Number of leading control qubits among this gate's operands.
    #[inline]
    pub fn num_controls(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CS
            | StandardGate::CT
            | StandardGate::CP(_)
            | StandardGate::CSwap => 1,

            StandardGate::CCX => 2,

            StandardGate::MCX { controls }
            | StandardGate::MCY { controls }
            | StandardGate::MCZ { controls } => *controls,

            _ => 0,
        }
    }

    /// Whether the non-control part is a SWAP (targets drawn as `x`).
    pub fn is_swap_family(&self) -> bool {
        matches!(self, StandardGate::Swap | StandardGate::CSwap)
    }

    /// Check if this gate carries a tunable parameter.
    pub fn is_parameterized(&self) -> bool {
        self.param().is_some()
    }

    /// Get the rotation parameter, if any.
    pub fn param(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CP(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => Some(*p),
            _ => None,
        }
    }

    /// Get a mutable reference to the rotation parameter, if any.
    pub fn param_mut(&mut self) -> Option<&mut f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CP(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => Some(p),
            _ => None,
        }
    }

    /// Display text placed on the target row by the ASCII renderer.
    ///
    /// X-family targets draw as `+`, control rows are marked separately by
    /// the renderer, and parametric gates include their angle.
    pub fn symbol(&self) -> String {
        match self {
            StandardGate::I => "I".into(),
            StandardGate::H => "H".into(),
            StandardGate::X => "X".into(),
            StandardGate::Y => "Y".into(),
            StandardGate::Z => "Z".into(),
            StandardGate::S => "S".into(),
            StandardGate::Sdg => "Sdg".into(),
            StandardGate::T => "T".into(),
            StandardGate::Tdg => "Tdg".into(),
            StandardGate::SX => "SX".into(),
            StandardGate::SXdg => "SXdg".into(),
            StandardGate::SY => "SY".into(),
            StandardGate::SYdg => "SYdg".into(),
            StandardGate::W => "W".into(),
            StandardGate::SW => "SW".into(),
            StandardGate::Rx(p) => format!("RX({p:.3})"),
            StandardGate::Ry(p) => format!("RY({p:.3})"),
            StandardGate::Rz(p) => format!("RZ({p:.3})"),
            StandardGate::P(p) => format!("P({p:.3})"),
            StandardGate::CX => "+".into(),
            StandardGate::CY => "Y".into(),
            StandardGate::CZ => "Z".into(),
            StandardGate::CS => "S".into(),
            StandardGate::CT => "T".into(),
            StandardGate::CP(p) => format!("P({p:.3})"),
            StandardGate::Swap => "x".into(),
            StandardGate::ISwap => "iSWAP".into(),
            StandardGate::RXX(p) => format!("RXX({p:.3})"),
            StandardGate::RYY(p) => format!("RYY({p:.3})"),
            StandardGate::RZZ(p) => format!("RZZ({p:.3})"),
            StandardGate::CCX => "+".into(),
            StandardGate::CSwap => "x".into(),
            StandardGate::MCX { .. } => "+".into(),
            StandardGate::MCY { .. } => "Y".into(),
            StandardGate::MCZ { .. } => "Z".into(),
        }
    }
}

/// A quantum gate, either standard or a bound composite instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A bound instance of a registered composite gate.
    Composite(CompositeGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Composite(g) => &g.name,
        }
    }

    /// Number of leading control qubits among the operands.
    #[inline]
    pub fn num_controls(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_controls(),
            GateKind::Composite(_) => 0,
        }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a bound composite instance.
    pub fn composite(gate: CompositeGate) -> Self {
        Self {
            kind: GateKind::Composite(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Composite(_) => None,
        }
    }

    /// Display text for the renderer: the label if set, else the gate symbol.
    pub fn symbol(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match &self.kind {
            GateKind::Standard(g) => g.symbol(),
            GateKind::Composite(g) => g.name.clone(),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CompositeGate> for Gate {
    fn from(gate: CompositeGate) -> Self {
        Gate::composite(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::MCX { controls: 3 }.num_qubits(), 4);

        assert_eq!(StandardGate::CX.num_controls(), 1);
        assert_eq!(StandardGate::CCX.num_controls(), 2);
        assert_eq!(StandardGate::Swap.num_controls(), 0);

        assert!(!StandardGate::H.is_parameterized());
        assert!(StandardGate::Rx(PI).is_parameterized());
    }

    #[test]
    fn test_param_update() {
        let mut gate = StandardGate::Rz(0.1);
        *gate.param_mut().unwrap() = 0.7;
        assert_eq!(gate.param(), Some(0.7));
        assert!(StandardGate::X.param_mut().is_none());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(StandardGate::H.symbol(), "H");
        assert_eq!(StandardGate::CX.symbol(), "+");
        assert_eq!(StandardGate::Rx(PI / 2.0).symbol(), "RX(1.571)");
        assert_eq!(StandardGate::Sdg.symbol(), "Sdg");
    }

    #[test]
    fn test_gate_label() {
        let g = Gate::standard(StandardGate::H).with_label("prep");
        assert_eq!(g.symbol(), "prep");
        assert_eq!(g.name(), "h");
    }
}
