//! QASM 2.0 emitter for serializing circuits.

use alsvid_ir::{Circuit, ClbitId, GateKind, Instruction, InstructionKind, QubitId};

/// Emit a circuit as QASM 2.0 source code.
///
/// Register declarations come first in declaration order, then one line per
/// instruction in sequence order, then the recorded measurement mapping.
/// Pulses and conditional blocks have no QASM 2.0 form and are omitted;
/// composite gates emit their bound expansion.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new(circuit);
    emitter.emit_circuit();
    emitter.output
}

/// QASM 2.0 emitter.
struct Emitter<'a> {
    circuit: &'a Circuit,
    output: String,
}

#[allow(clippy::unused_self)]
impl<'a> Emitter<'a> {
    fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self) {
        // Header
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");

        // Register declarations
        for reg in self.circuit.qregs() {
            self.writeln(&format!("qreg {}[{}];", reg.name(), reg.size()));
        }
        for reg in self.circuit.cregs() {
            self.writeln(&format!("creg {}[{}];", reg.name(), reg.size()));
        }

        // Instructions
        for instruction in self.circuit.instructions() {
            self.emit_instruction(instruction);
        }

        // Recorded measurement mapping
        for &(qubit, clbit) in self.circuit.measures() {
            let qubit = self.qubit_ref(qubit);
            let clbit = self.clbit_ref(clbit);
            self.writeln(&format!("measure {qubit} -> {clbit};"));
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => match &gate.kind {
                GateKind::Standard(std) => {
                    let name = std.name();
                    let qubits = self.operands(&instruction.qubits);

                    match std.param() {
                        Some(theta) => {
                            let theta = self.emit_param(theta);
                            self.writeln(&format!("{name}({theta}) {qubits};"));
                        }
                        None => self.writeln(&format!("{name} {qubits};")),
                    }
                }

                // Composite names are not in the qelib1 vocabulary; emit
                // the bound expansion instead.
                GateKind::Composite(composite) => {
                    for inner in &composite.insides {
                        self.emit_instruction(inner);
                    }
                }
            },

            // Measurement lines come from the recorded mapping at the end.
            InstructionKind::Measure => {}

            InstructionKind::Reset => {
                for &qubit in &instruction.qubits {
                    let qubit = self.qubit_ref(qubit);
                    self.writeln(&format!("reset {qubit};"));
                }
            }

            InstructionKind::Barrier => {
                let qubits = self.operands(&instruction.qubits);
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }

            InstructionKind::Delay { duration, unit } => {
                let qubits = self.operands(&instruction.qubits);
                self.writeln(&format!("delay({duration}{unit}) {qubits};"));
            }

            InstructionKind::Resonance { duration, unit } => {
                let qubits = self.operands(&instruction.qubits);
                self.writeln(&format!("xy({duration}{unit}) {qubits};"));
            }

            // No QASM 2.0 form.
            InstructionKind::Pulse { .. } | InstructionKind::Cif(_) => {}
        }
    }

    /// Format a parameter, preferring exact `pi` fractions.
    fn emit_param(&self, value: f64) -> String {
        let pi = std::f64::consts::PI;
        if (value - pi).abs() < 1e-10 {
            "pi".into()
        } else if (value - pi / 2.0).abs() < 1e-10 {
            "pi/2".into()
        } else if (value - pi / 4.0).abs() < 1e-10 {
            "pi/4".into()
        } else if (value + pi / 2.0).abs() < 1e-10 {
            "-pi/2".into()
        } else if (value + pi / 4.0).abs() < 1e-10 {
            "-pi/4".into()
        } else {
            format!("{value}")
        }
    }

    fn operands(&self, qubits: &[QubitId]) -> String {
        qubits
            .iter()
            .map(|&q| self.qubit_ref(q))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Translate a global qubit index through its owning register.
    fn qubit_ref(&self, qubit: QubitId) -> String {
        self.circuit
            .qregs()
            .iter()
            .find_map(|reg| reg.local(qubit).map(|local| format!("{}[{local}]", reg.name())))
            .unwrap_or_else(|| format!("q[{}]", qubit.index()))
    }

    fn clbit_ref(&self, clbit: ClbitId) -> String {
        self.circuit
            .cregs()
            .iter()
            .find_map(|reg| reg.local(clbit).map(|local| format!("{}[{local}]", reg.name())))
            .unwrap_or_else(|| format!("c[{}]", clbit.index()))
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}
