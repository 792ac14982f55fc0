//! OpenQASM 2.0 export utilities.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::circuit::{Circuit, Operation};
use crate::types::Precision;

/// Exports a circuit to OpenQASM 2.0 text.
pub trait ToOpenQasm {
    /// Returns the circuit as OpenQASM 2.0 text.
    fn to_openqasm(&self) -> String;

    /// Writes the circuit as OpenQASM 2.0 into `path`.
    fn write_openqasm_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let qasm = self.to_openqasm();
        let mut f = File::create(path)?;
        f.write_all(qasm.as_bytes())
    }
}

impl<P: Precision> ToOpenQasm for Circuit<P> {
    fn to_openqasm(&self) -> String {
        let mut lines = vec![
            "OPENQASM 2.0;".to_string(),
            "include \"qelib1.inc\";".to_string(),
            format!("qreg q[{}];", self.num_qubits()),
        ];
        lines.extend(
            self.registers()
                .iter()
                .map(|r| format!("creg {}[{}];", r.name(), r.size())),
        );
        self.operations()
            .iter()
            .for_each(|op| emit_operation(self, op, &mut lines));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

// --- helpers ---

fn emit_operation<P: Precision>(circuit: &Circuit<P>, op: &Operation<P>, out: &mut Vec<String>) {
    match op {
        // Prepared from |0> with u3, which matches the state up to a global phase.
        Operation::Initialize { qubit, state } => {
            let (theta, phi) = state.bloch_angles();
            out.push(format!("reset q[{}];", qubit));
            out.push(format!(
                "u3({},{},0) q[{}];",
                format_angle(theta),
                format_angle(phi),
                qubit
            ));
        }
        Operation::Gate { gate, qubit } => out.push(format!("{} q[{}];", gate.name(), qubit)),
        Operation::Cnot { control, target } => {
            out.push(format!("cx q[{}],q[{}];", control, target))
        }
        Operation::Measure { qubit, clbit } => match circuit.register_of(*clbit) {
            Some((reg, bit)) => out.push(format!("measure q[{}] -> {}[{}];", qubit, reg.name(), bit)),
            None => out.push(format!("// measure q[{}] into unknown bit {}", qubit, clbit)),
        },
        Operation::Conditional(c) => {
            let reg = &circuit.registers()[c.register];
            out.push(format!(
                "if({}=={}) {} q[{}];",
                reg.name(),
                c.value,
                c.gate.name(),
                c.target
            ));
        }
    }
}

fn format_angle<P: Precision>(angle: P) -> String {
    // Decimal radians, trimmed.
    let f = angle.to_f64().unwrap_or(0.0);
    let s = format!("{:.12}", f);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}
