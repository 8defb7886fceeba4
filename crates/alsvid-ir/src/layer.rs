//! Layer projection of the instruction sequence onto per-qubit rows.

use crate::circuit::Circuit;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// One qubit's row in the layer matrix.
///
/// `slots[l]` is the instruction acting on this qubit in layer `l`, `None`
/// when the qubit idles there or is merely crossed by a multi-qubit span.
/// An instruction touching several qubits appears in each of its own rows,
/// so the slot references are shared, not unique.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow<'a> {
    /// Global position this row belongs to.
    pub qubit: QubitId,
    /// Layer slots, left to right.
    pub slots: Vec<Option<&'a Instruction>>,
}

/// The circuit scheduled into aligned layers.
///
/// A pure projection over a borrowed circuit, recomputed per call; it
/// retains only rows of used qubits, each labeled with its original
/// position. Projecting the same circuit twice yields equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredCircuit<'a> {
    rows: Vec<LayerRow<'a>>,
    depth: usize,
}

impl<'a> LayeredCircuit<'a> {
    /// Project a circuit onto per-qubit layers.
    ///
    /// Layerable instructions pack greedily in sequence order: single-qubit
    /// kinds occupy the next free slot of their row; span-acting kinds
    /// (multi-qubit gates, barriers, resonances) claim one aligned slot
    /// across their whole `min..=max` position span, padding shorter rows
    /// in the span with `None` just before the claimed slot. Measure, reset
    /// and conditional instructions do not occupy layers.
    pub fn from_circuit(circuit: &'a Circuit) -> Self {
        let num_qubits = circuit.num_qubits();
        let mut grid: Vec<Vec<Option<&'a Instruction>>> = vec![Vec::new(); num_qubits];

        for ins in circuit.instructions() {
            if !ins.is_layerable() || ins.qubits.is_empty() {
                continue;
            }
            if !ins.is_span_acting() {
                grid[ins.qubits[0].index()].push(Some(ins));
                continue;
            }

            let lo = ins.qubits.iter().map(|q| q.index()).min().unwrap_or(0);
            let hi = ins.qubits.iter().map(|q| q.index()).max().unwrap_or(0);
            for row in lo..=hi {
                if ins.qubits.contains(&QubitId(row as u32)) {
                    grid[row].push(Some(ins));
                } else {
                    grid[row].push(None);
                }
            }
            let target = (lo..=hi).map(|row| grid[row].len()).max().unwrap_or(0);
            for row in lo..=hi {
                while grid[row].len() < target {
                    let at = grid[row].len() - 1;
                    grid[row].insert(at, None);
                }
            }
        }

        let depth = grid.iter().map(Vec::len).max().unwrap_or(0);
        for slots in &mut grid {
            slots.resize(depth, None);
        }

        let rows: Vec<LayerRow<'a>> = circuit
            .used_qubits()
            .into_iter()
            .map(|qubit| LayerRow {
                qubit,
                slots: std::mem::take(&mut grid[qubit.index()]),
            })
            .collect();
        let depth = if rows.is_empty() { 0 } else { depth };

        Self { rows, depth }
    }

    /// Number of layers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Rows of used qubits, in ascending qubit order.
    pub fn rows(&self) -> &[LayerRow<'a>] {
        &self.rows
    }

    /// The row of a specific qubit, if it is used.
    pub fn row(&self, qubit: QubitId) -> Option<&LayerRow<'a>> {
        self.rows.iter().find(|row| row.qubit == qubit)
    }

    /// The instruction occupying `(qubit, layer)`, if any.
    pub fn instruction_at(&self, qubit: QubitId, layer: usize) -> Option<&'a Instruction> {
        self.row(qubit)?.slots.get(layer).copied().flatten()
    }

    /// Qubits with a retained row, in ascending order.
    pub fn used_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.rows.iter().map(|row| row.qubit)
    }
}
