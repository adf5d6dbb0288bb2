//! Integration test: the host's tick/query interleave.
//!
//! Drives a `StateBuffer` the way a rendering host does — one update
//! per simulation tick, many point queries per drawn frame — and
//! verifies the published state is always internally consistent: every
//! query between two updates sees exactly one tick's data, never a mix.

use egress_core::{AgentId, FrameAccess, Generation};
use egress_state::{BufferConfig, StateBuffer, StateUpdate};

// ── Canonical smoke scenario ─────────────────────────────────────────

/// 10x10 grid, three agents, one update, three point queries. This is
/// the minimal end-to-end path a host exercises on integration day.
#[test]
fn smoke_scenario_three_agents() {
    let mut buf = StateBuffer::new(BufferConfig::new(10, 10, 3)).unwrap();

    let mut congestion = [0.0f32; 100];
    congestion[55] = 5.0; // cell (5, 5)
    buf.apply(StateUpdate {
        time: 1.0,
        positions: &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0],
        evacuated: &[0, 0, 0],
        congestion: &congestion,
    })
    .unwrap();

    let frame = buf.frame();
    let agent = frame.agent(AgentId(0)).unwrap();
    assert_eq!((agent.x, agent.y), (1.0, 1.0));
    assert!(!agent.evacuated);
    assert_eq!(frame.congestion_at(5, 5), 5.0);
    assert_eq!(frame.congestion_at(9, 9), 0.0);
}

// ── Tick/query interleave ────────────────────────────────────────────

/// Payload for tick `t`: agent `i` sits at `(t + i, t - i)`, agents
/// evacuate one per tick, and every cell holds `t * 0.5`.
fn tick_payload(tick: u32, agents: usize, cells: usize) -> (Vec<f32>, Vec<u8>, Vec<f32>) {
    let t = tick as f32;
    let mut positions = Vec::with_capacity(agents * 2);
    let mut evacuated = Vec::with_capacity(agents);
    for i in 0..agents {
        positions.push(t + i as f32);
        positions.push(t - i as f32);
        evacuated.push(u8::from((i as u32) < tick));
    }
    (positions, evacuated, vec![t * 0.5; cells])
}

#[test]
fn every_frame_sees_exactly_one_tick() {
    const AGENTS: usize = 8;
    let mut buf = StateBuffer::new(BufferConfig::new(20, 20, AGENTS as i32)).unwrap();

    for tick in 1..=50u32 {
        let (positions, evacuated, congestion) = tick_payload(tick, AGENTS, 400);
        buf.apply(StateUpdate {
            time: tick as f64 * 0.1,
            positions: &positions,
            evacuated: &evacuated,
            congestion: &congestion,
        })
        .unwrap();

        // Many queries per tick, the render side of the interleave.
        let frame = buf.frame();
        assert_eq!(frame.generation(), Generation(tick as u64));
        let t = tick as f32;
        for i in 0..AGENTS {
            let agent = frame.agent(AgentId(i as u32)).unwrap();
            assert_eq!(agent.x, t + i as f32, "tick {tick} agent {i} x");
            assert_eq!(agent.y, t - i as f32, "tick {tick} agent {i} y");
            assert_eq!(agent.evacuated, (i as u32) < tick);
        }
        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(frame.congestion_at(x, y), t * 0.5);
            }
        }
        assert_eq!(frame.evacuated_count(), (tick as usize).min(AGENTS));
    }
}

/// A rejected mid-run update must leave the interleave on the previous
/// tick rather than half-advanced.
#[test]
fn rejected_tick_does_not_advance_the_stream() {
    let mut buf = StateBuffer::new(BufferConfig::new(5, 5, 2)).unwrap();

    let (positions, evacuated, congestion) = tick_payload(1, 2, 25);
    buf.apply(StateUpdate {
        time: 0.1,
        positions: &positions,
        evacuated: &evacuated,
        congestion: &congestion,
    })
    .unwrap();

    // Simulated host bug: congestion sized for the wrong grid.
    let bad = buf.apply(StateUpdate {
        time: 0.2,
        positions: &positions,
        evacuated: &evacuated,
        congestion: &[0.0; 24],
    });
    assert!(bad.is_err());

    let frame = buf.frame();
    assert_eq!(frame.generation(), Generation(1));
    assert_eq!(frame.time(), 0.1);
    assert_eq!(frame.agent(AgentId(0)).unwrap().x, 1.0);
}

/// An owned frame taken mid-run keeps its tick while the buffer moves on,
/// even when read from another thread.
#[test]
fn owned_frame_pins_its_tick_across_threads() {
    let mut buf = StateBuffer::new(BufferConfig::new(8, 8, 4)).unwrap();

    let (positions, evacuated, congestion) = tick_payload(3, 4, 64);
    buf.apply(StateUpdate {
        time: 0.3,
        positions: &positions,
        evacuated: &evacuated,
        congestion: &congestion,
    })
    .unwrap();
    let pinned = buf.owned_frame();

    for tick in 4..=10u32 {
        let (positions, evacuated, congestion) = tick_payload(tick, 4, 64);
        buf.apply(StateUpdate {
            time: tick as f64 * 0.1,
            positions: &positions,
            evacuated: &evacuated,
            congestion: &congestion,
        })
        .unwrap();
    }

    let reader = std::thread::spawn(move || {
        assert_eq!(pinned.generation(), Generation(1));
        assert_eq!(pinned.time(), 0.3);
        pinned.agent(AgentId(0)).unwrap().x
    });
    assert_eq!(reader.join().unwrap(), 3.0);
    assert_eq!(buf.frame().agent(AgentId(0)).unwrap().x, 10.0);
}

/// Reset mid-run behaves like a fresh buffer with the same shape.
#[test]
fn reset_mid_run_matches_a_fresh_buffer() {
    let mut buf = StateBuffer::new(BufferConfig::new(6, 6, 3)).unwrap();
    for tick in 1..=5u32 {
        let (positions, evacuated, congestion) = tick_payload(tick, 3, 36);
        buf.apply(StateUpdate {
            time: tick as f64,
            positions: &positions,
            evacuated: &evacuated,
            congestion: &congestion,
        })
        .unwrap();
    }

    buf.reset();

    let fresh = StateBuffer::new(BufferConfig::new(6, 6, 3)).unwrap();
    let (a, b) = (buf.frame(), fresh.frame());
    assert_eq!(a.time(), b.time());
    assert_eq!(a.generation(), b.generation());
    assert_eq!(a.agents(), b.agents());
    assert_eq!(a.congestion(), b.congestion());
}
