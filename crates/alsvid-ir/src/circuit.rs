//! High-level circuit builder API.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind, PulseShape, TimeUnit};
use crate::layer::LayeredCircuit;
use crate::oracle::{GateRegistry, GateTemplate};
use crate::qubit::{ClbitId, QubitId};
use crate::register::{ClassicalRegister, QuantumRegister};

/// A quantum circuit.
///
/// The circuit is an ordered instruction sequence over globally indexed
/// qubits and classical bits. Builder methods validate their operands
/// against the current register sizes before appending; an invalid call
/// leaves the sequence untouched. Scheduling and rendering are derived
/// views, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Quantum registers, contiguous from global position 0.
    qregs: Vec<QuantumRegister>,
    /// Classical registers, contiguous from global position 0.
    cregs: Vec<ClassicalRegister>,
    /// The instruction sequence, in append order.
    instructions: Vec<Instruction>,
    /// Recorded qubit-to-classical-bit measurement mappings.
    measures: Vec<(QubitId, ClbitId)>,
    /// Qubits already holding a measurement.
    measured_qubits: FxHashSet<QubitId>,
    /// Classical bits already holding a result.
    assigned_clbits: FxHashSet<ClbitId>,
    /// Cleared when the circuit uses operations the hardware path rejects.
    backend_executable: bool,
}

impl Circuit {
    /// Create a circuit with `num_qubits` qubits and as many classical bits.
    ///
    /// One quantum register `q` and one classical register `meas` are
    /// created, both starting at global position 0.
    pub fn new(num_qubits: u32) -> Self {
        Self::with_clbits(num_qubits, num_qubits)
    }

    /// Create a circuit with an explicit classical bit count.
    pub fn with_clbits(num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: "circuit".into(),
            qregs: vec![QuantumRegister::new("q", 0, num_qubits)],
            cregs: vec![ClassicalRegister::new("meas", 0, num_clbits)],
            instructions: vec![],
            measures: vec![],
            measured_qubits: FxHashSet::default(),
            assigned_clbits: FxHashSet::default(),
            backend_executable: true,
        }
    }

    /// Add a quantum register at the next free global positions.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let offset = self.num_qubits() as u32;
        self.qregs.push(QuantumRegister::new(name, offset, size));
        (offset..offset + size).map(QubitId).collect()
    }

    /// Add a classical register at the next free global positions.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let offset = self.num_clbits() as u32;
        self.cregs.push(ClassicalRegister::new(name, offset, size));
        (offset..offset + size).map(ClbitId).collect()
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::I, qubit))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::SX, qubit))
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::SXdg, qubit))
    }

    /// Apply sqrt(Y) gate.
    pub fn sy(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::SY, qubit))
    }

    /// Apply sqrt(Y)-dagger gate.
    pub fn sydg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::SYdg, qubit))
    }

    /// Apply W gate.
    pub fn w(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::W, qubit))
    }

    /// Apply sqrt(W) gate.
    pub fn sw(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::SW, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(
            StandardGate::Rx(theta),
            qubit,
        ))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(
            StandardGate::Ry(theta),
            qubit,
        ))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(
            StandardGate::Rz(theta),
            qubit,
        ))
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply controlled-X gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CNOT gate (alias for [`cx`](Self::cx)).
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.cx(control, target)
    }

    /// Apply controlled-Y gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CY, control, target))
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply controlled-S gate.
    pub fn cs(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CS, control, target))
    }

    /// Apply controlled-T gate.
    pub fn ct(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CT, control, target))
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::CP(theta),
            control,
            target,
        ))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::ISwap, q1, q2))
    }

    /// Apply RXX (XX rotation) gate.
    pub fn rxx(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::RXX(theta), q1, q2))
    }

    /// Apply RYY (YY rotation) gate.
    pub fn ryy(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::RYY(theta), q1, q2))
    }

    /// Apply RZZ (ZZ rotation) gate.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::RZZ(theta), q1, q2))
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply Toffoli gate (alias for [`ccx`](Self::ccx)).
    pub fn toffoli(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.ccx(c1, c2, target)
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))
    }

    /// Apply Fredkin gate (alias for [`cswap`](Self::cswap)).
    pub fn fredkin(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.cswap(control, t1, t2)
    }

    // =========================================================================
    // Multi-controlled gates
    // =========================================================================

    /// Apply multi-controlled X gate.
    pub fn mcx(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let mut qubits: Vec<_> = controls.into_iter().collect();
        let gate = StandardGate::MCX {
            controls: qubits.len() as u32,
        };
        qubits.push(target);
        self.append(Instruction::gate(gate, qubits))
    }

    /// Apply multi-controlled Y gate.
    pub fn mcy(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let mut qubits: Vec<_> = controls.into_iter().collect();
        let gate = StandardGate::MCY {
            controls: qubits.len() as u32,
        };
        qubits.push(target);
        self.append(Instruction::gate(gate, qubits))
    }

    /// Apply multi-controlled Z gate.
    pub fn mcz(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let mut qubits: Vec<_> = controls.into_iter().collect();
        let gate = StandardGate::MCZ {
            controls: qubits.len() as u32,
        };
        qubits.push(target);
        self.append(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a custom gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))
    }

    /// Append a raw instruction after validating its operands.
    ///
    /// Standard-gate arity, qubit/classical-bit ranges and duplicate gate
    /// operands are checked before the sequence is touched. Measurement
    /// mappings are recorded only by the measure methods; a raw measure
    /// instruction joins the sequence without one.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Apply a barrier to the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits() as u32).map(QubitId).collect();
        self.append(Instruction::barrier(qubits))
    }

    /// Idle a qubit for a fixed duration.
    pub fn delay(&mut self, qubit: QubitId, duration: u64, unit: TimeUnit) -> IrResult<&mut Self> {
        self.append(Instruction::delay(qubit, duration, unit))
    }

    /// Apply XY resonance across the inclusive qubit range `start..=end`.
    pub fn xy(
        &mut self,
        start: QubitId,
        end: QubitId,
        duration: u64,
        unit: TimeUnit,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::resonance(start, end, duration, unit))
    }

    /// Apply a hardware pulse to a qubit.
    pub fn pulse(
        &mut self,
        shape: PulseShape,
        qubit: QubitId,
        duration: u64,
        unit: TimeUnit,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::pulse(shape, qubit, duration, unit))
    }

    /// Reset the given qubits to |0⟩.
    ///
    /// Reset is not executable on the hardware path and clears the
    /// backend-executable flag.
    pub fn reset(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        let instruction = Instruction::reset(qubits);
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        self.backend_executable = false;
        Ok(self)
    }

    /// Reset all qubits to |0⟩.
    pub fn reset_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits() as u32).map(QubitId).collect();
        self.reset(qubits)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure qubits into explicitly paired classical bits.
    ///
    /// Each qubit may be measured once per circuit and each classical bit
    /// may receive one result; violations fail before anything is recorded.
    pub fn measure(&mut self, qubits: &[QubitId], cbits: &[ClbitId]) -> IrResult<&mut Self> {
        if qubits.len() != cbits.len() {
            return Err(IrError::MeasureMismatch {
                qubits: qubits.len(),
                clbits: cbits.len(),
            });
        }

        let num_qubits = self.num_qubits();
        let mut seen_qubits = FxHashSet::default();
        for &q in qubits {
            if q.index() >= num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits,
                });
            }
            if !seen_qubits.insert(q) {
                return Err(IrError::DuplicateQubit { qubit: q });
            }
            if self.measured_qubits.contains(&q) {
                return Err(IrError::QubitAlreadyMeasured { qubit: q });
            }
        }

        let num_clbits = self.num_clbits();
        let mut seen_cbits = FxHashSet::default();
        for &c in cbits {
            if c.index() >= num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit: c,
                    num_clbits,
                });
            }
            if !seen_cbits.insert(c) {
                return Err(IrError::DuplicateClbit { clbit: c });
            }
            if self.assigned_clbits.contains(&c) {
                return Err(IrError::ClbitAlreadyAssigned { clbit: c });
            }
        }

        let instruction =
            Instruction::measure_all(qubits.iter().copied(), cbits.iter().copied())?;
        self.instructions.push(instruction);
        for (&q, &c) in qubits.iter().zip(cbits) {
            self.measures.push((q, c));
            self.measured_qubits.insert(q);
            self.assigned_clbits.insert(c);
        }
        Ok(self)
    }

    /// Measure qubits into automatically assigned classical bits.
    ///
    /// Assignment starts at the number of already recorded measurements and
    /// ascends, skipping classical bits that already hold a result.
    pub fn measure_auto(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let mut next = self.measures.len() as u32;
        let mut cbits = Vec::with_capacity(qubits.len());
        for _ in qubits {
            while self.assigned_clbits.contains(&ClbitId(next)) {
                next += 1;
            }
            cbits.push(ClbitId(next));
            next += 1;
        }
        self.measure(qubits, &cbits)
    }

    /// Measure every qubit into automatically assigned classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits() as u32).map(QubitId).collect();
        self.measure_auto(&qubits)
    }

    // =========================================================================
    // Parameter updates
    // =========================================================================

    /// Overwrite every tunable gate parameter, in append order.
    ///
    /// The slice length must equal the number of parameterized gates in
    /// the sequence. Composite instances bind their parameters at
    /// construction and conditional bodies are not tunable.
    pub fn update_params(&mut self, params: &[f64]) -> IrResult<&mut Self> {
        let expected = self
            .instructions
            .iter()
            .filter(|ins| ins.is_parameterized())
            .count();
        if params.len() != expected {
            return Err(IrError::ParamCountMismatch {
                expected,
                got: params.len(),
            });
        }
        let mut values = params.iter();
        for ins in &mut self.instructions {
            if let Some(param) = ins.param_mut() {
                if let Some(value) = values.next() {
                    *param = *value;
                }
            }
        }
        Ok(self)
    }

    // =========================================================================
    // Conditional scopes
    // =========================================================================

    /// Run `f` inside a classical-conditional scope.
    ///
    /// Appends an open conditional placeholder over `cbits`, runs `f`, then
    /// seals the scope: everything `f` appended moves, in order, into the
    /// placeholder's body. Nested scopes close innermost-first. The scope is
    /// sealed even when `f` errors, so the circuit stays well formed and the
    /// error propagates. Conditionals are not executable on the hardware
    /// path and clear the backend-executable flag.
    pub fn with_cif<F>(
        &mut self,
        cbits: impl IntoIterator<Item = ClbitId>,
        condition: u64,
        f: F,
    ) -> IrResult<&mut Self>
    where
        F: FnOnce(&mut Self) -> IrResult<()>,
    {
        let cbits: Vec<ClbitId> = cbits.into_iter().collect();
        if cbits.is_empty() {
            return Err(IrError::InvalidCondition);
        }
        let num_clbits = self.num_clbits();
        let mut seen = FxHashSet::default();
        for &c in &cbits {
            if c.index() >= num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit: c,
                    num_clbits,
                });
            }
            if !seen.insert(c) {
                return Err(IrError::DuplicateClbit { clbit: c });
            }
        }

        self.backend_executable = false;
        let placeholder = self.instructions.len();
        self.instructions.push(Instruction::cif(cbits, condition));

        let result = f(self);

        // Instructions before the placeholder are never removed while the
        // scope runs, so its index stays valid even under nesting.
        let body = self.instructions.split_off(placeholder + 1);
        if let Some(block) = self.instructions[placeholder].cif_mut() {
            block.close(body);
        }
        result?;
        Ok(self)
    }

    // =========================================================================
    // Composite gates
    // =========================================================================

    /// Register a deep copy of this circuit's instruction sequence as a
    /// composite gate template.
    ///
    /// The template spans all of this circuit's qubit positions and carries
    /// every instruction, closed conditional bodies included. Recorded
    /// measurement mappings are circuit bookkeeping, not instructions, and
    /// stay behind.
    pub fn wrap_to_gate(
        &self,
        name: impl Into<String>,
        registry: &mut GateRegistry,
    ) -> IrResult<()> {
        let template =
            GateTemplate::new(name, self.num_qubits() as u32, self.instructions.clone())?;
        registry.register(template)
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Gate-like instructions: gates plus delay, barrier and resonance.
    pub fn gates(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(|ins| ins.is_gate_like())
    }

    /// Gate instructions carrying a tunable parameter, in append order.
    pub fn parameterized_gates(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions
            .iter()
            .filter(|ins| ins.is_parameterized())
    }

    /// Qubits the circuit acts on, in ascending order.
    ///
    /// Barrier-only qubits do not count as used; measured qubits do.
    /// Conditional bodies are searched recursively.
    pub fn used_qubits(&self) -> Vec<QubitId> {
        let mut used = FxHashSet::default();
        collect_used(&self.instructions, &mut used);
        for &(q, _) in &self.measures {
            used.insert(q);
        }
        let mut out: Vec<_> = used.into_iter().collect();
        out.sort_unstable();
        out
    }

    /// Project the circuit onto per-qubit layers.
    pub fn layered(&self) -> LayeredCircuit<'_> {
        LayeredCircuit::from_circuit(self)
    }

    /// Render the circuit as ASCII art.
    ///
    /// `width` is the minimum horizontal padding per column; console
    /// rendering conventionally uses 4.
    pub fn draw_circuit(&self, width: usize) -> String {
        crate::draw::draw(self, width)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the circuit name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qregs.iter().map(|reg| reg.size() as usize).sum()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(|reg| reg.size() as usize).sum()
    }

    /// Get the circuit depth (number of layers).
    pub fn depth(&self) -> usize {
        self.layered().depth()
    }

    /// Get the quantum registers.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Get the classical registers.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Get the instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get the recorded measurement mappings, in recording order.
    pub fn measures(&self) -> &[(QubitId, ClbitId)] {
        &self.measures
    }

    /// Whether the circuit avoids operations the hardware path rejects.
    pub fn backend_executable(&self) -> bool {
        self.backend_executable
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new(2);
        circuit.set_name("bell");
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure_all()?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new(n);
        circuit.set_name("ghz");
        if n == 0 {
            return Ok(circuit);
        }

        // H on first qubit
        circuit.h(QubitId(0))?;

        // CNOT chain
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }

        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Create a QFT circuit (without measurements).
    pub fn qft(n: u32) -> IrResult<Self> {
        use std::f64::consts::PI;

        let mut circuit = Self::with_clbits(n, 0);
        circuit.set_name("qft");

        for i in 0..n {
            // Hadamard on qubit i
            circuit.h(QubitId(i))?;

            // Controlled rotations
            for j in (i + 1)..n {
                let k = j - i;
                let angle = PI / (1u64 << k) as f64;
                circuit.cp(angle, QubitId(j), QubitId(i))?;
            }
        }

        // Swap qubits for bit reversal
        for i in 0..n / 2 {
            circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
        }

        Ok(circuit)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let num_qubits = self.num_qubits();
        for &q in &instruction.qubits {
            if q.index() >= num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits,
                });
            }
        }
        let num_clbits = self.num_clbits();
        for &c in &instruction.clbits {
            if c.index() >= num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit: c,
                    num_clbits,
                });
            }
        }
        if let Some(gate) = instruction.as_gate() {
            if let Some(standard) = gate.as_standard() {
                let expected = standard.num_qubits();
                if instruction.qubits.len() != expected as usize {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: standard.name().to_owned(),
                        expected,
                        got: instruction.qubits.len() as u32,
                    });
                }
            }
            if instruction.qubits.len() > 1 {
                let mut seen = FxHashSet::default();
                for &q in &instruction.qubits {
                    if !seen.insert(q) {
                        return Err(IrError::DuplicateQubit { qubit: q });
                    }
                }
            }
        }
        Ok(())
    }
}

fn collect_used(instructions: &[Instruction], used: &mut FxHashSet<QubitId>) {
    for ins in instructions {
        match &ins.kind {
            InstructionKind::Barrier => {}
            InstructionKind::Cif(block) => {
                used.extend(ins.qubits.iter().copied());
                collect_used(block.body(), used);
            }
            _ => used.extend(ins.qubits.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new(3);
        assert_eq!(circuit.name(), "circuit");
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.qregs()[0].name(), "q");
        assert_eq!(circuit.cregs()[0].name(), "meas");
        assert!(circuit.backend_executable());
    }

    #[test]
    fn test_with_clbits() {
        let circuit = Circuit::with_clbits(3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new(2);
        let anc = circuit.add_qreg("anc", 2);
        assert_eq!(anc, vec![QubitId(2), QubitId(3)]);
        assert_eq!(circuit.num_qubits(), 4);

        let flags = circuit.add_creg("flag", 1);
        assert_eq!(flags, vec![ClbitId(2)]);
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::new(2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(&[QubitId(0)], &[ClbitId(0)])
            .unwrap()
            .measure(&[QubitId(1)], &[ClbitId(1)])
            .unwrap();

        assert_eq!(circuit.instructions().len(), 4);
        assert_eq!(circuit.measures().len(), 2);
    }

    #[test]
    fn test_out_of_range_rejected_before_append() {
        let mut circuit = Circuit::new(2);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitOutOfRange {
                qubit: QubitId(2),
                num_qubits: 2
            }
        ));
        assert!(circuit.instructions().is_empty());
    }

    #[test]
    fn test_duplicate_gate_positions() {
        let mut circuit = Circuit::new(2);
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit } if qubit == QubitId(1)));
        assert!(circuit.instructions().is_empty());
    }

    #[test]
    fn test_gate_arity_checked() {
        let mut circuit = Circuit::new(2);
        let err = circuit
            .append(Instruction::gate(StandardGate::CX, [QubitId(0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_measure_tracks_mappings() {
        let mut circuit = Circuit::new(3);
        circuit
            .measure(&[QubitId(2), QubitId(0)], &[ClbitId(0), ClbitId(2)])
            .unwrap();
        assert_eq!(
            circuit.measures(),
            &[(QubitId(2), ClbitId(0)), (QubitId(0), ClbitId(2))]
        );
        assert_eq!(circuit.instructions().len(), 1);
        assert!(circuit.instructions()[0].is_measure());
    }

    #[test]
    fn test_measure_mismatch() {
        let mut circuit = Circuit::new(2);
        let err = circuit.measure(&[QubitId(0), QubitId(1)], &[ClbitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::MeasureMismatch {
                qubits: 2,
                clbits: 1
            }
        ));
    }

    #[test]
    fn test_measure_rejects_remeasure() {
        let mut circuit = Circuit::new(2);
        circuit.measure(&[QubitId(0)], &[ClbitId(0)]).unwrap();

        let err = circuit.measure(&[QubitId(0)], &[ClbitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::QubitAlreadyMeasured { .. }));

        let err = circuit.measure(&[QubitId(1)], &[ClbitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::ClbitAlreadyAssigned { .. }));

        // The failed calls recorded nothing.
        assert_eq!(circuit.measures().len(), 1);
        assert_eq!(circuit.instructions().len(), 1);
    }

    #[test]
    fn test_measure_auto_skips_assigned_cbits() {
        let mut circuit = Circuit::with_clbits(3, 4);
        circuit.measure(&[QubitId(0)], &[ClbitId(2)]).unwrap();
        circuit.measure_auto(&[QubitId(1), QubitId(2)]).unwrap();
        assert_eq!(
            circuit.measures(),
            &[
                (QubitId(0), ClbitId(2)),
                (QubitId(1), ClbitId(1)),
                (QubitId(2), ClbitId(3)),
            ]
        );
    }

    #[test]
    fn test_update_params() {
        let mut circuit = Circuit::new(1);
        circuit
            .rx(0.1, QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .rz(0.2, QubitId(0))
            .unwrap();

        circuit.update_params(&[1.0, 2.0]).unwrap();
        let params: Vec<f64> = circuit
            .parameterized_gates()
            .filter_map(|ins| ins.as_gate()?.as_standard()?.param())
            .collect();
        assert_eq!(params, vec![1.0, 2.0]);
    }

    #[test]
    fn test_update_params_count_mismatch() {
        let mut circuit = Circuit::new(1);
        circuit.rx(0.1, QubitId(0)).unwrap();
        let err = circuit.update_params(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            IrError::ParamCountMismatch {
                expected: 1,
                got: 2
            }
        ));
    }

    #[test]
    fn test_with_cif_captures_body() {
        let mut circuit = Circuit::new(3);
        circuit.x(QubitId(0)).unwrap();
        circuit
            .with_cif([ClbitId(0)], 1, |c| {
                c.x(QubitId(2))?;
                Ok(())
            })
            .unwrap();
        circuit.x(QubitId(1)).unwrap();

        // Flat sequence: X, sealed Cif, X. The conditioned gate lives in
        // the body, not in the top-level sequence.
        assert_eq!(circuit.instructions().len(), 3);
        assert_eq!(circuit.instructions()[0].qubits, vec![QubitId(0)]);
        let block = circuit.instructions()[1].as_cif().unwrap();
        assert!(!block.is_open());
        assert_eq!(block.condition(), 1);
        assert_eq!(block.body().len(), 1);
        assert_eq!(block.body()[0].qubits, vec![QubitId(2)]);
        assert_eq!(circuit.instructions()[2].qubits, vec![QubitId(1)]);
        assert!(!circuit.backend_executable());
    }

    #[test]
    fn test_with_cif_nested() {
        let mut circuit = Circuit::new(2);
        circuit
            .with_cif([ClbitId(0)], 1, |c| {
                c.x(QubitId(0))?;
                c.with_cif([ClbitId(1)], 1, |inner| {
                    inner.y(QubitId(1))?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        assert_eq!(circuit.instructions().len(), 1);
        let outer = circuit.instructions()[0].as_cif().unwrap();
        assert_eq!(outer.body().len(), 2);
        let inner = outer.body()[1].as_cif().unwrap();
        assert!(!inner.is_open());
        assert_eq!(inner.body().len(), 1);
        assert_eq!(inner.body()[0].qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_with_cif_requires_cbits() {
        let mut circuit = Circuit::new(1);
        let err = circuit.with_cif([], 1, |_| Ok(())).unwrap_err();
        assert!(matches!(err, IrError::InvalidCondition));
        assert!(circuit.instructions().is_empty());
        assert!(circuit.backend_executable());
    }

    #[test]
    fn test_with_cif_seals_scope_on_error() {
        let mut circuit = Circuit::new(2);
        let err = circuit
            .with_cif([ClbitId(0)], 1, |c| {
                c.x(QubitId(0))?;
                c.h(QubitId(9))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { .. }));

        let block = circuit.instructions()[0].as_cif().unwrap();
        assert!(!block.is_open());
        assert_eq!(block.body().len(), 1);
    }

    #[test]
    fn test_reset_clears_backend_flag() {
        let mut circuit = Circuit::new(2);
        circuit.reset([QubitId(0)]).unwrap();
        assert!(!circuit.backend_executable());
        assert!(circuit.instructions()[0].is_reset());
    }

    #[test]
    fn test_wrap_to_gate_snapshots_sequence() {
        let mut circuit = Circuit::new(2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure_all()
            .unwrap();

        let mut registry = GateRegistry::new();
        circuit.wrap_to_gate("bell_pair", &mut registry).unwrap();
        let template = registry.get("bell_pair").unwrap();
        assert_eq!(template.qubit_num(), 2);
        assert_eq!(template.template().len(), 3);

        let mut big = Circuit::new(6);
        let instance = registry
            .instantiate("bell_pair", &[QubitId(3), QubitId(5)], vec![], None)
            .unwrap();
        big.append(instance).unwrap();
        assert_eq!(big.instructions()[0].name(), "bell_pair");
        assert_eq!(big.instructions()[0].qubits, vec![QubitId(3), QubitId(5)]);
    }

    #[test]
    fn test_wrap_to_gate_keeps_conditionals() {
        let mut circuit = Circuit::with_clbits(2, 1);
        circuit.h(QubitId(0)).unwrap();
        circuit
            .with_cif([ClbitId(0)], 1, |c| {
                c.x(QubitId(1))?;
                Ok(())
            })
            .unwrap();

        let mut registry = GateRegistry::new();
        circuit.wrap_to_gate("cond_flip", &mut registry).unwrap();
        let instance = registry
            .instantiate("cond_flip", &[QubitId(2), QubitId(4)], vec![], None)
            .unwrap();

        let GateKind::Composite(composite) = &instance.as_gate().unwrap().kind else {
            panic!("expected composite gate");
        };
        assert_eq!(composite.insides.len(), 2);
        let cif = composite.insides[1].as_cif().unwrap();
        assert_eq!(cif.condition(), 1);
        assert_eq!(cif.body()[0].name(), "x");
        assert_eq!(cif.body()[0].qubits, vec![QubitId(4)]);
    }

    #[test]
    fn test_used_qubits_sorted_and_filtered() {
        let mut circuit = Circuit::new(5);
        circuit.h(QubitId(3)).unwrap();
        circuit.barrier([QubitId(0), QubitId(4)]).unwrap();
        circuit.measure(&[QubitId(1)], &[ClbitId(0)]).unwrap();
        assert_eq!(circuit.used_qubits(), vec![QubitId(1), QubitId(3)]);
    }

    #[test]
    fn test_used_qubits_sees_cif_bodies() {
        let mut circuit = Circuit::new(4);
        circuit
            .with_cif([ClbitId(0)], 1, |c| {
                c.x(QubitId(3))?;
                Ok(())
            })
            .unwrap();
        assert_eq!(circuit.used_qubits(), vec![QubitId(3)]);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.instructions().len(), 3); // H, CX, measure
        assert_eq!(
            circuit.measures(),
            &[(QubitId(0), ClbitId(0)), (QubitId(1), ClbitId(1))]
        );
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.measures().len(), 5);
    }

    #[test]
    fn test_qft_structure() {
        let circuit = Circuit::qft(3).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.measures().is_empty());
        // 3 Hadamards, 3 controlled phases, 1 swap.
        assert_eq!(circuit.instructions().len(), 7);
        assert_eq!(circuit.parameterized_gates().count(), 3);
    }

    #[test]
    fn test_parameterized_gate() {
        let mut circuit = Circuit::new(1);
        circuit.rx(PI / 2.0, QubitId(0)).unwrap();
        assert!(circuit.instructions()[0].is_parameterized());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut circuit = Circuit::bell().unwrap();
        circuit.barrier_all().unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
