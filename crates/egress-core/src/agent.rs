//! Per-agent state record.

use crate::id::AgentId;

/// One agent's state as published in a frame.
///
/// Positions are world-space coordinates in the same units the
/// simulation backend emits; the buffer copies them verbatim and never
/// interprets them against the congestion grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    /// Stable identifier; always equals the agent's index in the buffer.
    pub id: AgentId,
    /// World-space x coordinate.
    pub x: f32,
    /// World-space y coordinate.
    pub y: f32,
    /// Whether the agent has reached an exit.
    pub evacuated: bool,
}

impl Agent {
    /// The state every agent holds before the first update: at the
    /// origin, not evacuated.
    pub fn initial(id: AgentId) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            evacuated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_agent_is_zeroed() {
        let a = Agent::initial(AgentId(3));
        assert_eq!(a.id, AgentId(3));
        assert_eq!(a.x, 0.0);
        assert_eq!(a.y, 0.0);
        assert!(!a.evacuated);
    }
}
