//! State banks: one complete copy of everything a frame exposes.

use egress_core::{Agent, AgentId};

/// A single state bank.
///
/// Two of these live inside a `StateBuffer` and alternate between the
/// staging and published roles. Banks never reallocate after
/// construction: [`StateBank::stage`] overwrites in place and
/// [`StateBank::reset`] zeroes in place.
#[derive(Clone, Debug)]
pub(crate) struct StateBank {
    /// Simulation time of this bank's contents, in seconds.
    pub(crate) time: f64,
    /// Per-agent state, indexed by `AgentId`.
    pub(crate) agents: Vec<Agent>,
    /// Row-major congestion values.
    pub(crate) congestion: Vec<f32>,
}

impl StateBank {
    /// Allocate a zeroed bank: `agent_count` agents at the origin with
    /// clear flags, `cell_count` cells of `0.0`, time `0.0`.
    pub(crate) fn zeroed(agent_count: usize, cell_count: usize) -> Self {
        let agents = (0..agent_count)
            .map(|i| Agent::initial(AgentId(i as u32)))
            .collect();
        Self {
            time: 0.0,
            agents,
            congestion: vec![0.0; cell_count],
        }
    }

    /// Overwrite this bank's contents from one tick's inputs.
    ///
    /// Lengths must already be validated by the caller. Agent IDs are
    /// preserved; only positions, flags, time, and congestion change.
    pub(crate) fn stage(
        &mut self,
        time: f64,
        positions: &[f32],
        evacuated: &[u8],
        congestion: &[f32],
    ) {
        debug_assert_eq!(positions.len(), self.agents.len() * 2);
        debug_assert_eq!(evacuated.len(), self.agents.len());
        debug_assert_eq!(congestion.len(), self.congestion.len());

        self.time = time;
        for (i, agent) in self.agents.iter_mut().enumerate() {
            agent.x = positions[i * 2];
            agent.y = positions[i * 2 + 1];
            agent.evacuated = evacuated[i] != 0;
        }
        self.congestion.copy_from_slice(congestion);
    }

    /// Restore the post-construction state without reallocating.
    pub(crate) fn reset(&mut self) {
        self.time = 0.0;
        for agent in &mut self.agents {
            *agent = Agent::initial(agent.id);
        }
        self.congestion.fill(0.0);
    }

    /// Heap bytes held by this bank.
    pub(crate) fn memory_bytes(&self) -> usize {
        self.agents.capacity() * std::mem::size_of::<Agent>()
            + self.congestion.capacity() * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_bank_has_initial_agents() {
        let bank = StateBank::zeroed(3, 16);
        assert_eq!(bank.time, 0.0);
        assert_eq!(bank.agents.len(), 3);
        assert_eq!(bank.congestion.len(), 16);
        for (i, agent) in bank.agents.iter().enumerate() {
            assert_eq!(agent.id, AgentId(i as u32));
            assert_eq!((agent.x, agent.y), (0.0, 0.0));
            assert!(!agent.evacuated);
        }
        assert!(bank.congestion.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn stage_overwrites_everything_but_ids() {
        let mut bank = StateBank::zeroed(2, 4);
        bank.stage(
            2.5,
            &[1.0, 2.0, 3.0, 4.0],
            &[1, 0],
            &[0.5, 0.0, 0.0, 9.0],
        );
        assert_eq!(bank.time, 2.5);
        assert_eq!((bank.agents[0].x, bank.agents[0].y), (1.0, 2.0));
        assert!(bank.agents[0].evacuated);
        assert_eq!((bank.agents[1].x, bank.agents[1].y), (3.0, 4.0));
        assert!(!bank.agents[1].evacuated);
        assert_eq!(bank.congestion, vec![0.5, 0.0, 0.0, 9.0]);
        assert_eq!(bank.agents[0].id, AgentId(0));
        assert_eq!(bank.agents[1].id, AgentId(1));
    }

    #[test]
    fn nonzero_evacuated_byte_sets_the_flag() {
        let mut bank = StateBank::zeroed(3, 1);
        bank.stage(0.1, &[0.0; 6], &[0, 1, 255], &[0.0]);
        assert!(!bank.agents[0].evacuated);
        assert!(bank.agents[1].evacuated);
        assert!(bank.agents[2].evacuated);
    }

    #[test]
    fn reset_restores_zeroed_state() {
        let mut bank = StateBank::zeroed(2, 4);
        bank.stage(7.0, &[1.0; 4], &[1, 1], &[3.0; 4]);
        bank.reset();
        assert_eq!(bank.time, 0.0);
        for agent in &bank.agents {
            assert_eq!((agent.x, agent.y), (0.0, 0.0));
            assert!(!agent.evacuated);
        }
        assert!(bank.congestion.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn zero_agents_is_a_valid_bank() {
        let mut bank = StateBank::zeroed(0, 4);
        bank.stage(1.0, &[], &[], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(bank.congestion, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
