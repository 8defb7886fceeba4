//! ASCII rendering of layered circuits.

use rustc_hash::FxHashMap;

use crate::circuit::Circuit;
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// Render a circuit as ASCII art.
///
/// One wire line per used qubit, interleaved with spacer lines carrying the
/// vertical connectors of multi-qubit spans. Wire lines fill with `-`,
/// spacer lines with spaces; control rows mark `*`, span extremes `#`,
/// SWAP-family targets `x`, and barriers `||` across their span. Measured
/// wires append ` M->c[j]`. `width` sets the minimum horizontal padding per
/// column. Returns an empty string when no qubit is used.
pub fn draw(circuit: &Circuit, width: usize) -> String {
    let layered = circuit.layered();
    let rows = layered.rows();
    let num = rows.len();
    if num == 0 {
        return String::new();
    }
    let depth = layered.depth();

    let reduce: FxHashMap<QubitId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.qubit, i))
        .collect();

    // Text rows interleave wires (even) and spacers (odd); the cell at
    // (2 * i, l) belongs to qubit row i, layer l.
    let mut cells: Vec<Vec<String>> = vec![vec![String::new(); depth]; 2 * num - 1];
    let mut colwidth = vec![0usize; depth];

    for l in 0..depth {
        let mut maxlen = 1 + width;
        for (i, row) in rows.iter().enumerate() {
            let Some(ins) = row.slots[l] else {
                continue;
            };
            // A span-acting instruction shares its slot across several
            // rows; stamp it once, from its lowest position.
            if ins.qubits.iter().min() != Some(&row.qubit) {
                continue;
            }
            if !ins.is_span_acting() {
                let symbol = ins.symbol();
                maxlen = maxlen.max(symbol.len() + width);
                cells[2 * i][l] = symbol;
            } else if ins.is_barrier() {
                // Positions on unused wires are not drawn.
                let reduced: Vec<usize> = ins
                    .qubits
                    .iter()
                    .filter_map(|q| reduce.get(q).copied())
                    .collect();
                let (Some(&q1), Some(&q2)) = (reduced.iter().min(), reduced.iter().max())
                else {
                    continue;
                };
                for cell_row in 2 * q1..=2 * q2 {
                    cells[cell_row][l] = "||".into();
                }
                maxlen = maxlen.max("||".len());
            } else {
                stamp_span(&mut cells, &reduce, ins, l, width, &mut maxlen);
            }
        }
        colwidth[l] = maxlen;
    }

    let mut lines = Vec::with_capacity(2 * num - 1);
    for (j, cell_row) in cells.iter().enumerate() {
        let line = if j % 2 == 0 {
            let qubit = rows[j / 2].qubit;
            let mut line = format!("q[{}]", qubit.0);
            while line.len() < 6 {
                line.push(' ');
            }
            for (l, entry) in cell_row.iter().enumerate() {
                line.push_str(&center(entry, colwidth[l], '-'));
            }
            if let Some(&(_, clbit)) = circuit.measures().iter().find(|(q, _)| *q == qubit) {
                line.push_str(&format!(" M->c[{}]", clbit.0));
            }
            line
        } else {
            let mut line = " ".repeat(6);
            for (l, entry) in cell_row.iter().enumerate() {
                line.push_str(&center(entry, colwidth[l], ' '));
            }
            line
        };
        lines.push(line);
    }
    lines.join("\n")
}

/// Stamp a multi-qubit gate or resonance span into the cell grid.
fn stamp_span(
    cells: &mut [Vec<String>],
    reduce: &FxHashMap<QubitId, usize>,
    ins: &Instruction,
    layer: usize,
    width: usize,
    maxlen: &mut usize,
) {
    let reduced: Vec<usize> = ins
        .qubits
        .iter()
        .filter_map(|q| reduce.get(q).copied())
        .collect();
    let (Some(&q1), Some(&q2)) = (reduced.iter().min(), reduced.iter().max()) else {
        return;
    };
    for cell_row in 2 * q1 + 1..2 * q2 {
        cells[cell_row][layer] = "|".into();
    }
    cells[2 * q1][layer] = "#".into();
    cells[2 * q2][layer] = "#".into();

    let swap_family = ins
        .as_gate()
        .and_then(Gate::as_standard)
        .is_some_and(StandardGate::is_swap_family);

    let control_rows: Vec<usize> = ins
        .controls()
        .iter()
        .filter_map(|q| reduce.get(q).copied())
        .collect();
    if control_rows.is_empty() {
        if swap_family {
            cells[2 * q1][layer] = "x".into();
            cells[2 * q2][layer] = "x".into();
        } else {
            let symbol = ins.symbol();
            *maxlen = (*maxlen).max(symbol.len() + width);
            cells[q1 + q2][layer] = symbol;
        }
        return;
    }

    for &row in &control_rows {
        cells[2 * row][layer] = "*".into();
    }
    if swap_family {
        for target in ins.targets() {
            if let Some(&row) = reduce.get(target) {
                cells[2 * row][layer] = "x".into();
            }
        }
        return;
    }

    let target_rows: Vec<usize> = ins
        .targets()
        .iter()
        .filter_map(|q| reduce.get(q).copied())
        .collect();
    let (Some(&tq1), Some(&tq2)) = (target_rows.iter().min(), target_rows.iter().max()) else {
        return;
    };
    cells[2 * tq1][layer] = "#".into();
    cells[2 * tq2][layer] = "#".into();
    let symbol = ins.symbol();
    *maxlen = (*maxlen).max(symbol.len() + width);
    // The target symbol sits on the row-sum midpoint line and keeps a `*`
    // prefix when a control occupies that line.
    let target_row = tq1 + tq2;
    if control_rows.iter().any(|&row| 2 * row == target_row) {
        cells[target_row][layer] = format!("*{symbol}");
    } else {
        cells[target_row][layer] = symbol;
    }
}

/// Center `s` in `width` columns with Python's `str.center` parity: an odd
/// margin shifts right in even widths and left in odd widths.
fn center(s: &str, width: usize, fill: char) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_owned();
    }
    let marg = width - len;
    let left = marg / 2 + (marg & width & 1);
    let mut out = String::with_capacity(width);
    for _ in 0..left {
        out.push(fill);
    }
    out.push_str(s);
    for _ in 0..marg - left {
        out.push(fill);
    }
    out
}
