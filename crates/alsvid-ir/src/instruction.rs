//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// Time unit for scheduled durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Nanoseconds.
    Ns,
    /// Microseconds.
    Us,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Ns => write!(f, "ns"),
            TimeUnit::Us => write!(f, "us"),
        }
    }
}

/// Envelope shape of a hardware pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseShape {
    /// Rectangular envelope.
    Rect,
    /// Flat top with smoothed edges.
    Flattop,
    /// Gaussian envelope.
    Gaussian,
}

impl PulseShape {
    /// Lowercase shape name.
    pub fn name(&self) -> &'static str {
        match self {
            PulseShape::Rect => "rect",
            PulseShape::Flattop => "flattop",
            PulseShape::Gaussian => "gaussian",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            PulseShape::Rect => "Rect",
            PulseShape::Flattop => "Flattop",
            PulseShape::Gaussian => "Gaussian",
        }
    }
}

/// Body of a classical-conditional block.
///
/// The body is `None` while the scope is open and capturing; it is set
/// exactly once when the scope closes and is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CifBlock {
    condition: u64,
    body: Option<Vec<Instruction>>,
}

impl CifBlock {
    /// Create an open (capturing) block.
    pub fn new(condition: u64) -> Self {
        Self {
            condition,
            body: None,
        }
    }

    /// The value the named classical bits are compared against.
    pub fn condition(&self) -> u64 {
        self.condition
    }

    /// Whether the scope has not been closed yet.
    pub fn is_open(&self) -> bool {
        self.body.is_none()
    }

    /// The captured body, empty while the scope is open.
    pub fn body(&self) -> &[Instruction] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Seal the scope with its captured body.
    pub(crate) fn close(&mut self, body: Vec<Instruction>) {
        debug_assert!(self.body.is_none(), "conditional scope closed twice");
        self.body = Some(body);
    }

    pub(crate) fn body_mut(&mut self) -> Option<&mut Vec<Instruction>> {
        self.body.as_mut()
    }
}

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement into classical bits.
    Measure,
    /// Reset qubits to |0⟩.
    Reset,
    /// Barrier (scheduling fence across a qubit span).
    Barrier,
    /// Idle a qubit for a fixed duration.
    Delay {
        /// Duration as an integer multiple of `unit`.
        duration: u64,
        /// Time unit of the duration.
        unit: TimeUnit,
    },
    /// XY resonance evolution across a contiguous qubit range.
    Resonance {
        /// Duration as an integer multiple of `unit`.
        duration: u64,
        /// Time unit of the duration.
        unit: TimeUnit,
    },
    /// Hardware pulse applied to a single qubit.
    Pulse {
        /// Envelope shape.
        shape: PulseShape,
        /// Duration as an integer multiple of `unit`.
        duration: u64,
        /// Time unit of the duration.
        unit: TimeUnit,
    },
    /// Classical-conditional block over subsequent captured instructions.
    Cif(CifBlock),
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction operates on (measure, cif).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a single measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a multi-qubit measurement instruction.
    ///
    /// Returns an error if the number of qubits and classical bits differ.
    pub fn measure_all(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::MeasureMismatch {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    /// Create a reset instruction.
    pub fn reset(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a delay instruction.
    pub fn delay(qubit: QubitId, duration: u64, unit: TimeUnit) -> Self {
        Self {
            kind: InstructionKind::Delay { duration, unit },
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create an XY resonance instruction across `start..=end`.
    pub fn resonance(start: QubitId, end: QubitId, duration: u64, unit: TimeUnit) -> Self {
        let (lo, hi) = if start.0 <= end.0 {
            (start.0, end.0)
        } else {
            (end.0, start.0)
        };
        Self {
            kind: InstructionKind::Resonance { duration, unit },
            qubits: (lo..=hi).map(QubitId).collect(),
            clbits: vec![],
        }
    }

    /// Create a pulse instruction.
    pub fn pulse(shape: PulseShape, qubit: QubitId, duration: u64, unit: TimeUnit) -> Self {
        Self {
            kind: InstructionKind::Pulse {
                shape,
                duration,
                unit,
            },
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create an open conditional placeholder over `cbits`.
    pub fn cif(cbits: impl IntoIterator<Item = ClbitId>, condition: u64) -> Self {
        Self {
            kind: InstructionKind::Cif(CifBlock::new(condition)),
            qubits: vec![],
            clbits: cbits.into_iter().collect(),
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Check if this is a conditional block.
    pub fn is_cif(&self) -> bool {
        matches!(self.kind, InstructionKind::Cif(_))
    }

    /// Gate-like kinds: gates plus delay, barrier and resonance.
    ///
    /// These are the members of the circuit's backward-compatible gates
    /// view and are position-validated on append.
    pub fn is_gate_like(&self) -> bool {
        matches!(
            self.kind,
            InstructionKind::Gate(_)
                | InstructionKind::Delay { .. }
                | InstructionKind::Barrier
                | InstructionKind::Resonance { .. }
        )
    }

    /// Kinds projected onto the per-qubit layer matrix.
    pub fn is_layerable(&self) -> bool {
        self.is_gate_like() || matches!(self.kind, InstructionKind::Pulse { .. })
    }

    /// Whether layering must align the full `min..=max` position span.
    ///
    /// Barriers, resonances and multi-qubit gates occupy one slot across
    /// their whole span; everything else occupies a single row.
    pub fn is_span_acting(&self) -> bool {
        match self.kind {
            InstructionKind::Barrier | InstructionKind::Resonance { .. } => true,
            InstructionKind::Gate(_) => self.qubits.len() > 1,
            _ => false,
        }
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get mutable reference to the gate.
    pub fn gate_mut(&mut self) -> Option<&mut Gate> {
        match &mut self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the conditional block if this is one.
    pub fn as_cif(&self) -> Option<&CifBlock> {
        match &self.kind {
            InstructionKind::Cif(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn cif_mut(&mut self) -> Option<&mut CifBlock> {
        match &mut self.kind {
            InstructionKind::Cif(c) => Some(c),
            _ => None,
        }
    }

    /// Leading control qubits of a controlled gate, empty otherwise.
    pub fn controls(&self) -> &[QubitId] {
        let n = match &self.kind {
            InstructionKind::Gate(g) => g.kind.num_controls() as usize,
            _ => 0,
        };
        &self.qubits[..n.min(self.qubits.len())]
    }

    /// Target qubits following the controls.
    pub fn targets(&self) -> &[QubitId] {
        let n = match &self.kind {
            InstructionKind::Gate(g) => g.kind.num_controls() as usize,
            _ => 0,
        };
        &self.qubits[n.min(self.qubits.len())..]
    }

    /// Whether this instruction carries a tunable parameter.
    pub fn is_parameterized(&self) -> bool {
        match &self.kind {
            InstructionKind::Gate(g) => g.as_standard().is_some_and(StandardGate::is_parameterized),
            _ => false,
        }
    }

    /// Mutable access to the tunable parameter, if any.
    pub fn param_mut(&mut self) -> Option<&mut f64> {
        match &mut self.kind {
            InstructionKind::Gate(g) => match &mut g.kind {
                crate::gate::GateKind::Standard(s) => s.param_mut(),
                crate::gate::GateKind::Composite(_) => None,
            },
            _ => None,
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Delay { .. } => "delay",
            InstructionKind::Resonance { .. } => "xy",
            InstructionKind::Pulse { shape, .. } => shape.name(),
            InstructionKind::Cif(_) => "cif",
        }
    }

    /// Display text placed in this instruction's layer slot by the renderer.
    pub fn symbol(&self) -> String {
        match &self.kind {
            InstructionKind::Gate(g) => g.symbol(),
            InstructionKind::Measure => "M".into(),
            InstructionKind::Reset => "Reset".into(),
            InstructionKind::Barrier => "||".into(),
            InstructionKind::Delay { duration, unit } => format!("Delay({duration}{unit})"),
            InstructionKind::Resonance { duration, unit } => format!("XY({duration}{unit})"),
            InstructionKind::Pulse {
                shape,
                duration,
                unit,
            } => format!("{}({duration}{unit})", shape.symbol()),
            InstructionKind::Cif(_) => "Cif".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert!(inst.is_gate_like());
        assert!(inst.is_layerable());
        assert!(!inst.is_span_acting());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "h");
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(inst.is_measure());
        assert!(!inst.is_gate_like());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.clbits.len(), 1);
    }

    #[test]
    fn test_measure_all_mismatch() {
        let err = Instruction::measure_all([QubitId(0), QubitId(1)], [ClbitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::MeasureMismatch {
                qubits: 2,
                clbits: 1
            }
        ));
    }

    #[test]
    fn test_barrier_spans() {
        let inst = Instruction::barrier([QubitId(0), QubitId(2)]);
        assert!(inst.is_barrier());
        assert!(inst.is_span_acting());
        assert_eq!(inst.symbol(), "||");
    }

    #[test]
    fn test_controls_targets() {
        let inst = Instruction::gate(
            StandardGate::MCX { controls: 2 },
            [QubitId(0), QubitId(2), QubitId(4)],
        );
        assert_eq!(inst.controls(), &[QubitId(0), QubitId(2)]);
        assert_eq!(inst.targets(), &[QubitId(4)]);
        assert!(inst.is_span_acting());
    }

    #[test]
    fn test_resonance_expands_range() {
        let inst = Instruction::resonance(QubitId(1), QubitId(3), 30, TimeUnit::Ns);
        assert_eq!(inst.qubits, vec![QubitId(1), QubitId(2), QubitId(3)]);
        assert_eq!(inst.symbol(), "XY(30ns)");
        assert!(inst.is_span_acting());
    }

    #[test]
    fn test_delay_and_pulse_symbols() {
        let d = Instruction::delay(QubitId(0), 200, TimeUnit::Ns);
        assert_eq!(d.symbol(), "Delay(200ns)");
        assert!(d.is_layerable());
        assert!(!d.is_span_acting());

        let p = Instruction::pulse(PulseShape::Gaussian, QubitId(1), 50, TimeUnit::Us);
        assert_eq!(p.symbol(), "Gaussian(50us)");
        assert!(p.is_layerable());
        assert!(!p.is_gate_like());
    }

    #[test]
    fn test_cif_block_capture() {
        let mut inst = Instruction::cif([ClbitId(0), ClbitId(1)], 3);
        assert!(inst.as_cif().unwrap().is_open());
        assert_eq!(inst.clbits, vec![ClbitId(0), ClbitId(1)]);

        let body = vec![Instruction::single_qubit_gate(StandardGate::X, QubitId(2))];
        inst.cif_mut().unwrap().close(body);
        let block = inst.as_cif().unwrap();
        assert!(!block.is_open());
        assert_eq!(block.body().len(), 1);
        assert_eq!(block.condition(), 3);
    }

    #[test]
    fn test_parameterized_access() {
        let mut inst = Instruction::single_qubit_gate(StandardGate::Rx(0.5), QubitId(0));
        assert!(inst.is_parameterized());
        *inst.param_mut().unwrap() = 1.25;
        assert_eq!(
            inst.as_gate().unwrap().as_standard().unwrap().param(),
            Some(1.25)
        );
    }
}
