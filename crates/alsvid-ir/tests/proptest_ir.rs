//! Property-based tests for circuit construction and its derived views.
//!
//! Random instruction sequences are applied to circuits of random width,
//! then the layer grid, wire list, and ASCII drawing are checked against
//! their structural invariants.

use alsvid_ir::{Circuit, QubitId, TimeUnit};
use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

/// Generate a random circuit for property testing.
///
/// Generates circuits with:
/// - 1-6 qubits
/// - 0-16 instructions from a mixed set (gates, delays, barriers, measurements)
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=6).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_circuit_op(num_qubits), 0..=16),
        )
            .prop_map(|(nq, ops)| {
                let mut circuit = Circuit::new(nq);
                for op in ops {
                    op.apply(&mut circuit);
                }
                circuit
            })
    })
}

/// Instructions that can be applied to a circuit.
#[derive(Debug, Clone)]
enum CircuitOp {
    H(u32),
    X(u32),
    Z(u32),
    Rx(f64, u32),
    Cx(u32, u32),
    Cz(u32, u32),
    Swap(u32, u32),
    Ccx(u32, u32, u32),
    Delay(u32, u64),
    Barrier,
    Measure(u32),
}

impl CircuitOp {
    fn apply(self, circuit: &mut Circuit) {
        match self {
            CircuitOp::H(q) => {
                let _ = circuit.h(QubitId(q));
            }
            CircuitOp::X(q) => {
                let _ = circuit.x(QubitId(q));
            }
            CircuitOp::Z(q) => {
                let _ = circuit.z(QubitId(q));
            }
            CircuitOp::Rx(theta, q) => {
                let _ = circuit.rx(theta, QubitId(q));
            }
            CircuitOp::Cx(c, t) => {
                let _ = circuit.cx(QubitId(c), QubitId(t));
            }
            CircuitOp::Cz(c, t) => {
                let _ = circuit.cz(QubitId(c), QubitId(t));
            }
            CircuitOp::Swap(a, b) => {
                let _ = circuit.swap(QubitId(a), QubitId(b));
            }
            CircuitOp::Ccx(c1, c2, t) => {
                let _ = circuit.ccx(QubitId(c1), QubitId(c2), QubitId(t));
            }
            CircuitOp::Delay(q, dur) => {
                let _ = circuit.delay(QubitId(q), dur, TimeUnit::Ns);
            }
            CircuitOp::Barrier => {
                let _ = circuit.barrier_all();
            }
            CircuitOp::Measure(q) => {
                let _ = circuit.measure_auto(&[QubitId(q)]);
            }
        }
    }
}

/// Generate a random instruction for a circuit with the given width.
fn arb_circuit_op(num_qubits: u32) -> impl Strategy<Value = CircuitOp> {
    // For single-qubit circuits, only generate single-qubit instructions
    if num_qubits < 2 {
        prop_oneof![
            (0..num_qubits).prop_map(CircuitOp::H),
            (0..num_qubits).prop_map(CircuitOp::X),
            (0..num_qubits).prop_map(CircuitOp::Z),
            (0.0..TAU, 0..num_qubits).prop_map(|(theta, q)| CircuitOp::Rx(theta, q)),
            (0..num_qubits, 1_u64..500).prop_map(|(q, dur)| CircuitOp::Delay(q, dur)),
            Just(CircuitOp::Barrier),
            (0..num_qubits).prop_map(CircuitOp::Measure),
        ]
        .boxed()
    } else if num_qubits < 3 {
        prop_oneof![
            (0..num_qubits).prop_map(CircuitOp::H),
            (0..num_qubits).prop_map(CircuitOp::X),
            (0..num_qubits).prop_map(CircuitOp::Z),
            (0.0..TAU, 0..num_qubits).prop_map(|(theta, q)| CircuitOp::Rx(theta, q)),
            (0..num_qubits, 1_u64..500).prop_map(|(q, dur)| CircuitOp::Delay(q, dur)),
            Just(CircuitOp::Barrier),
            (0..num_qubits).prop_map(CircuitOp::Measure),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| CircuitOp::Cx(c, t)),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| CircuitOp::Cz(c, t)),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Swapped qubits must differ", |(a, b)| a != b)
                .prop_map(|(a, b)| CircuitOp::Swap(a, b)),
        ]
        .boxed()
    } else {
        prop_oneof![
            (0..num_qubits).prop_map(CircuitOp::H),
            (0..num_qubits).prop_map(CircuitOp::X),
            (0..num_qubits).prop_map(CircuitOp::Z),
            (0.0..TAU, 0..num_qubits).prop_map(|(theta, q)| CircuitOp::Rx(theta, q)),
            (0..num_qubits, 1_u64..500).prop_map(|(q, dur)| CircuitOp::Delay(q, dur)),
            Just(CircuitOp::Barrier),
            (0..num_qubits).prop_map(CircuitOp::Measure),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| CircuitOp::Cx(c, t)),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| CircuitOp::Cz(c, t)),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Swapped qubits must differ", |(a, b)| a != b)
                .prop_map(|(a, b)| CircuitOp::Swap(a, b)),
            (0..num_qubits, 0..num_qubits, 0..num_qubits)
                .prop_filter("Controls and target must differ", |(c1, c2, t)| {
                    c1 != c2 && c1 != t && c2 != t
                })
                .prop_map(|(c1, c2, t)| CircuitOp::Ccx(c1, c2, t)),
        ]
        .boxed()
    }
}

proptest! {
    /// Test that the layer grid is a pure projection of the instruction
    /// sequence: deriving it twice yields the same rows and depth.
    #[test]
    fn test_layering_is_idempotent(circuit in arb_circuit()) {
        prop_assert_eq!(circuit.layered(), circuit.layered(),
            "layer projection must be deterministic");
    }

    /// Test that used wires are listed in ascending order, without
    /// duplicates, and never point outside the registers.
    #[test]
    fn test_used_qubits_sorted_and_in_range(circuit in arb_circuit()) {
        let used = circuit.used_qubits();

        prop_assert!(used.windows(2).all(|w| w[0] < w[1]),
            "used_qubits must be strictly increasing");
        prop_assert!(used.iter().all(|q| q.index() < circuit.num_qubits()),
            "used_qubits must stay inside the registers");
    }

    /// Test that depth agrees with the layer grid and that each
    /// instruction occupies at most one layer.
    #[test]
    fn test_depth_bounded_by_instruction_count(circuit in arb_circuit()) {
        let layerable = circuit
            .instructions()
            .iter()
            .filter(|ins| ins.is_layerable())
            .count();

        prop_assert_eq!(circuit.depth(), circuit.layered().depth(),
            "depth must match the layer grid");
        prop_assert!(circuit.depth() <= layerable,
            "an instruction occupies at most one layer");
    }

    /// Test that every used wire is drawn on its own line, with one
    /// connector line between neighbouring wires.
    #[test]
    fn test_draw_line_count_matches_used_wires(circuit in arb_circuit()) {
        let drawn = circuit.draw_circuit(4);
        let rows = circuit.layered().rows().len();

        if rows == 0 {
            prop_assert!(drawn.is_empty(), "a circuit without used wires draws nothing");
        } else {
            prop_assert_eq!(drawn.lines().count(), 2 * rows - 1,
                "expected one line per wire plus connectors");
        }
    }

    /// Test that out-of-range positions are reported as errors and leave
    /// the circuit untouched.
    #[test]
    fn test_out_of_range_positions_rejected(num_qubits in 1_u32..=5, extra in 0_u32..3) {
        let mut circuit = Circuit::new(num_qubits);
        let bad = QubitId(num_qubits + extra);

        prop_assert!(circuit.h(bad).is_err());
        prop_assert!(circuit.rx(PI / 3.0, bad).is_err());
        prop_assert!(circuit.cx(QubitId(0), bad).is_err());
        prop_assert!(circuit.delay(bad, 100, TimeUnit::Ns).is_err());
        prop_assert_eq!(circuit.instructions().len(), 0,
            "rejected instructions must not be recorded");
    }

    /// Test that a gate cannot address the same qubit twice.
    #[test]
    fn test_duplicate_positions_rejected(q in 0_u32..5) {
        let mut circuit = Circuit::new(5);

        prop_assert!(circuit.cx(QubitId(q), QubitId(q)).is_err());
        prop_assert!(circuit.swap(QubitId(q), QubitId(q)).is_err());
        prop_assert_eq!(circuit.instructions().len(), 0,
            "rejected instructions must not be recorded");
    }
}
