//! Benchmark profiles and utilities for the egress state buffer.
//!
//! Provides pre-built buffer configurations and deterministic payload
//! generation for benchmarks and examples:
//!
//! - [`reference_config`]: 100x100 grid (10K cells), 64 agents
//! - [`stress_config`]: 316x316 grid (~100K cells), 1024 agents
//! - [`seeded_payloads`]: reproducible update payloads via seeded ChaCha8

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use egress_state::{BufferConfig, StateUpdate};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Reference benchmark profile: 100x100 grid (10K cells), 64 agents.
pub fn reference_config() -> BufferConfig {
    BufferConfig::new(100, 100, 64)
}

/// Stress benchmark profile: 316x316 grid (~100K cells), 1024 agents.
///
/// Same update path as [`reference_config`] but at 10x the cell count.
pub fn stress_config() -> BufferConfig {
    BufferConfig::new(316, 316, 1024)
}

/// One pre-generated update payload with owned storage.
///
/// Generating payloads up front keeps RNG cost out of benchmark loops;
/// [`TickPayload::as_update`] borrows the payload the way a host would
/// borrow its own per-tick arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct TickPayload {
    /// Simulation time of the tick.
    pub time: f64,
    /// Interleaved `x, y` for every agent.
    pub positions: Vec<f32>,
    /// One flag byte per agent, nonzero = evacuated.
    pub evacuated: Vec<u8>,
    /// Row-major congestion map.
    pub congestion: Vec<f32>,
}

impl TickPayload {
    /// Borrow this payload as a [`StateUpdate`].
    pub fn as_update(&self) -> StateUpdate<'_> {
        StateUpdate {
            time: self.time,
            positions: &self.positions,
            evacuated: &self.evacuated,
            congestion: &self.congestion,
        }
    }
}

/// Generate `count` deterministic tick payloads for a buffer shape.
///
/// Positions fall inside the grid, the evacuated fraction ramps up over
/// the run, and congestion values are uniform in `[0, 10)`. The same
/// seed always produces the same payload sequence.
pub fn seeded_payloads(config: BufferConfig, count: usize, seed: u64) -> Vec<TickPayload> {
    let shape = config
        .validate()
        .expect("benchmark profile must be a valid configuration");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let width = shape.dims.width as f32;
    let height = shape.dims.height as f32;
    let cells = shape.dims.cell_count();

    (0..count)
        .map(|tick| {
            let mut positions = Vec::with_capacity(shape.agent_count * 2);
            for _ in 0..shape.agent_count {
                positions.push(rng.random::<f32>() * width);
                positions.push(rng.random::<f32>() * height);
            }
            let evacuated_fraction = (tick as f64 / count.max(1) as f64).min(1.0);
            let evacuated = (0..shape.agent_count)
                .map(|_| u8::from(rng.random::<f64>() < evacuated_fraction))
                .collect();
            let congestion = (0..cells).map(|_| rng.random::<f32>() * 10.0).collect();

            TickPayload {
                time: tick as f64 * 0.1,
                positions,
                evacuated,
                congestion,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_validates() {
        let shape = reference_config().validate().unwrap();
        assert_eq!(shape.dims.cell_count(), 10_000);
        assert_eq!(shape.agent_count, 64);
    }

    #[test]
    fn stress_config_validates() {
        let shape = stress_config().validate().unwrap();
        assert_eq!(shape.dims.cell_count(), 316 * 316);
        assert_eq!(shape.agent_count, 1024);
    }

    #[test]
    fn seeded_payloads_match_shape() {
        let config = BufferConfig::new(8, 6, 5);
        let payloads = seeded_payloads(config, 4, 42);
        assert_eq!(payloads.len(), 4);
        for payload in &payloads {
            assert_eq!(payload.positions.len(), 10);
            assert_eq!(payload.evacuated.len(), 5);
            assert_eq!(payload.congestion.len(), 48);
        }
    }

    #[test]
    fn seeded_payloads_are_deterministic() {
        let config = BufferConfig::new(8, 6, 5);
        let a = seeded_payloads(config, 8, 42);
        let b = seeded_payloads(config, 8, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn seeded_payloads_stay_inside_the_grid() {
        let config = BufferConfig::new(20, 10, 16);
        for payload in seeded_payloads(config, 8, 7) {
            for pair in payload.positions.chunks_exact(2) {
                assert!((0.0..20.0).contains(&pair[0]));
                assert!((0.0..10.0).contains(&pair[1]));
            }
        }
    }
}
