//! QCUT Quantum Volume Cut Demo
//!
//! Cuts the 8-qubit quantum-volume reference circuit into subcircuits of at
//! most 5 qubits and prints the accepted solution.

use qcut_search::prelude::*;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║                  QCUT Quantum Volume Cut Search                      ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let circuit = CircuitGenerator::new().quantum_volume_8q();
    let graph = InteractionGraph::from_circuit(&circuit)?;

    println!("Circuit:");
    println!("  • Qubits: {}", circuit.num_qubits());
    println!("  • Two-qubit blocks: {}", graph.n_vertices());
    println!("  • Graph edges: {}", graph.n_edges());
    println!();

    let config = CutConfig::new(5)
        .with_max_cuts(10)
        .with_num_subcircuits(vec![2, 3])
        .with_time_limit_secs(30);
    println!("Configuration: {}\n", config);

    let start = Instant::now();
    let mut searcher = CutSearcher::with_branch_and_bound(config);
    let solution = searcher.find_cuts(&circuit)?;
    let elapsed = start.elapsed();

    match solution {
        Some(solution) => {
            println!("{}\n", solution.report());
            println!("Cut positions:");
            for position in &solution.positions {
                println!("  • {}", position);
            }
            println!("\nQubit routes:");
            for (qubit, path) in solution.path_map.iter().enumerate() {
                let route: Vec<String> = path
                    .iter()
                    .map(|e| format!("s{}[{}]", e.subcircuit, e.local_qubit))
                    .collect();
                println!("  q[{}]: {}", qubit, route.join(" → "));
            }
        }
        None => println!("No valid cut found"),
    }

    println!("\nTotal time: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}
