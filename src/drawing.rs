//! Plain text circuit diagrams, one column per operation.

use std::fmt;

use crate::circuit::{Circuit, Operation};
use crate::types::Precision;

const QUANTUM_WIRE: char = '─';
const CLASSICAL_WIRE: char = '═';
const QUANTUM_LINK: char = '│';
const CLASSICAL_LINK: char = '║';

enum Cell {
    Boxed(String),
    Bare(String),
    Link(char),
}

impl Cell {
    fn text(&self) -> String {
        match self {
            Cell::Boxed(s) => format!("┤ {} ├", s),
            Cell::Bare(s) => s.clone(),
            Cell::Link(c) => c.to_string(),
        }
    }
}

/// Cells of one column, indexed by row. Qubit rows come first, then one row per register.
fn column<P: Precision>(circuit: &Circuit<P>, op: &Operation<P>) -> Vec<Option<Cell>> {
    let n = circuit.num_qubits();
    let mut cells: Vec<Option<Cell>> = (0..n + circuit.registers().len()).map(|_| None).collect();

    let (top, bottom, link) = match op {
        Operation::Initialize { qubit, state } => {
            let (theta, phi) = state.bloch_angles();
            cells[*qubit] = Some(Cell::Boxed(format!("Init(θ={:.3}, φ={:.3})", theta, phi)));
            (*qubit, *qubit, QUANTUM_LINK)
        }
        Operation::Gate { gate, qubit } => {
            cells[*qubit] = Some(Cell::Boxed(gate.to_string()));
            (*qubit, *qubit, QUANTUM_LINK)
        }
        Operation::Cnot { control, target } => {
            cells[*control] = Some(Cell::Bare("■".to_string()));
            cells[*target] = Some(Cell::Bare("⊕".to_string()));
            (
                *control.min(target),
                *control.max(target),
                QUANTUM_LINK,
            )
        }
        Operation::Measure { qubit, clbit } => {
            cells[*qubit] = Some(Cell::Boxed("M".to_string()));
            let row = circuit
                .registers()
                .iter()
                .position(|r| *clbit >= r.offset() && *clbit < r.offset() + r.size())
                .map(|r| n + r);
            match row {
                Some(row) => {
                    let bit = clbit - circuit.registers()[row - n].offset();
                    let label = if circuit.registers()[row - n].size() > 1 {
                        format!("╩{}", bit)
                    } else {
                        "╩".to_string()
                    };
                    cells[row] = Some(Cell::Bare(label));
                    (*qubit, row, CLASSICAL_LINK)
                }
                None => (*qubit, *qubit, CLASSICAL_LINK),
            }
        }
        Operation::Conditional(c) => {
            cells[c.target] = Some(Cell::Boxed(c.gate.to_string()));
            let row = n + c.register;
            cells[row] = Some(Cell::Bare(format!("={}", c.value)));
            (c.target, row, CLASSICAL_LINK)
        }
    };

    (top + 1..bottom).for_each(|row| {
        if cells[row].is_none() {
            cells[row] = Some(Cell::Link(link));
        }
    });
    cells
}

fn centered(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    let left = (width.saturating_sub(len)) / 2;
    let right = width.saturating_sub(len + left);
    let mut s = String::with_capacity(width * 3);
    s.extend(std::iter::repeat(fill).take(left));
    s.push_str(text);
    s.extend(std::iter::repeat(fill).take(right));
    s
}

/// Render `circuit` as a text diagram.
///
/// # Example
/// ```
/// use qteleport::drawing::draw;
/// use qteleport::prelude::*;
/// use std::num::NonZeroUsize;
///
/// let mut b = CircuitBuilder::<f64>::new(NonZeroUsize::new(2).unwrap());
/// b.h(0).unwrap().cx(0, 1).unwrap();
/// let text = draw(&b.build());
/// assert_eq!(text.lines().count(), 2);
/// assert!(text.contains("┤ H ├"));
/// ```
pub fn draw<P: Precision>(circuit: &Circuit<P>) -> String {
    let n = circuit.num_qubits();
    let names: Vec<String> = (0..n)
        .map(|q| format!("q_{}", q))
        .chain(circuit.registers().iter().map(|r| r.name().to_string()))
        .collect();
    let name_width = names.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    let mut rows: Vec<String> = names
        .iter()
        .map(|name| format!("{:>width$}: ", name, width = name_width))
        .collect();
    let wire = |row: usize| if row < n { QUANTUM_WIRE } else { CLASSICAL_WIRE };

    rows.iter_mut()
        .enumerate()
        .for_each(|(row, s)| s.push(wire(row)));

    for op in circuit.operations() {
        let cells = column(circuit, op);
        let width = cells
            .iter()
            .flatten()
            .map(|c| c.text().chars().count())
            .max()
            .unwrap_or(1)
            + 2;
        rows.iter_mut()
            .zip(cells.iter())
            .enumerate()
            .for_each(|(row, (s, cell))| {
                let text = cell.as_ref().map(Cell::text).unwrap_or_default();
                s.push_str(&centered(&text, width, wire(row)));
            });
    }

    rows.iter_mut()
        .enumerate()
        .for_each(|(row, s)| s.push(wire(row)));
    rows.join("\n")
}

impl<P: Precision> fmt::Display for Circuit<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", draw(self))
    }
}
