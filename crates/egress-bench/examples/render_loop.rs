//! End-to-end host loop example.
//!
//! Demonstrates: build config → StateBuffer → publish ticks → query the
//! published frame → reset → repeat.

use egress_bench::{reference_config, seeded_payloads};
use egress_core::{AgentId, FrameAccess};
use egress_state::StateBuffer;

fn main() {
    println!("=== Egress Render Loop Example ===\n");

    let config = reference_config();
    let mut buffer = StateBuffer::new(config).unwrap();
    let payloads = seeded_payloads(config, 60, 42);

    // --- Run 1: a 60-tick evacuation ---
    println!("Run 1: 60 ticks, querying every 15th frame");
    for (tick, payload) in payloads.iter().enumerate() {
        buffer.apply(payload.as_update()).unwrap();

        if tick % 15 == 0 || tick == 59 {
            let frame = buffer.frame();
            let agent = frame.agent(AgentId(0)).unwrap();
            let max_congestion = frame
                .congestion()
                .iter()
                .cloned()
                .fold(f32::NEG_INFINITY, f32::max);

            println!(
                "  tick {:>2}: t={:>4.1}s, agent0=({:>6.2}, {:>6.2}), evacuated={:>2}/{}, max_congestion={:>6.3}",
                tick + 1,
                frame.time(),
                agent.x,
                agent.y,
                frame.evacuated_count(),
                frame.agent_count(),
                max_congestion,
            );
        }
    }

    // --- Reset and Run 2 ---
    println!("\nResetting buffer...");
    buffer.reset();

    println!("Run 2: 20 ticks with a different seed");
    for (tick, payload) in seeded_payloads(config, 20, 99).iter().enumerate() {
        buffer.apply(payload.as_update()).unwrap();

        if tick % 5 == 0 || tick == 19 {
            let frame = buffer.frame();
            println!(
                "  tick {:>2}: t={:>4.1}s, evacuated={:>2}/{}, congestion(50,50)={:>6.3}",
                tick + 1,
                frame.time(),
                frame.evacuated_count(),
                frame.agent_count(),
                frame.congestion_at(50, 50),
            );
        }
    }

    println!("\nFinal update count: {}", buffer.generation());
    println!("Done.");
}
