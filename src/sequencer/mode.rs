// Traversal modes - direction steering and boundary policy

use crate::sequencer::engine::{FIRST_STEP, LAST_STEP, WRAP_ABOVE, WRAP_BELOW};

/// How the position walks the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Forward,
    Backward,
    /// Bounces between the first and last playable steps.
    PingPong,
    /// Bounces on the boundary slots instead, spending one extra pulse at
    /// each end of the cycle.
    PingPongFixed,
}

impl PlayMode {
    /// Selector index shown to the user (1-based, like the mode slider).
    pub fn index(&self) -> i32 {
        match self {
            PlayMode::Forward => 1,
            PlayMode::Backward => 2,
            PlayMode::PingPong => 3,
            PlayMode::PingPongFixed => 4,
        }
    }

    /// Mode for a 1-based selector index.
    ///
    /// Out-of-range indices wrap to the opposite end of the selector.
    pub fn from_index(index: i32) -> Self {
        let index = if index > 4 {
            1
        } else if index < 1 {
            4
        } else {
            index
        };

        match index {
            1 => PlayMode::Forward,
            2 => PlayMode::Backward,
            3 => PlayMode::PingPong,
            _ => PlayMode::PingPongFixed,
        }
    }

    /// Direction for the given slot, keeping `direction` where the mode
    /// has no opinion.
    pub fn steer(&self, slot: i32, direction: i32) -> i32 {
        match self {
            PlayMode::Forward => 1,
            PlayMode::Backward => -1,
            PlayMode::PingPong => {
                if slot <= FIRST_STEP {
                    1
                } else if slot >= LAST_STEP {
                    -1
                } else {
                    direction
                }
            }
            PlayMode::PingPongFixed => {
                if slot <= WRAP_BELOW {
                    1
                } else if slot >= WRAP_ABOVE {
                    -1
                } else {
                    direction
                }
            }
        }
    }

    /// Whether the position crosses the boundary slots to the opposite
    /// end. PingPongFixed reverses on them instead.
    pub fn wraps_around(&self) -> bool {
        !matches!(self, PlayMode::PingPongFixed)
    }

    /// Bouncing modes force the direction forward on a sequence reset.
    pub fn is_ping_pong(&self) -> bool {
        matches!(self, PlayMode::PingPong | PlayMode::PingPongFixed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayMode::Forward => "Forward",
            PlayMode::Backward => "Backward",
            PlayMode::PingPong => "Ping-pong",
            PlayMode::PingPongFixed => "Ping-pong fixed",
        }
    }
}

impl Default for PlayMode {
    fn default() -> Self {
        PlayMode::Forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for mode in [
            PlayMode::Forward,
            PlayMode::Backward,
            PlayMode::PingPong,
            PlayMode::PingPongFixed,
        ] {
            assert_eq!(PlayMode::from_index(mode.index()), mode);
        }
    }

    #[test]
    fn test_selector_wraps_to_opposite_end() {
        assert_eq!(PlayMode::from_index(5), PlayMode::Forward);
        assert_eq!(PlayMode::from_index(42), PlayMode::Forward);
        assert_eq!(PlayMode::from_index(0), PlayMode::PingPongFixed);
        assert_eq!(PlayMode::from_index(-3), PlayMode::PingPongFixed);
    }

    #[test]
    fn test_forward_backward_ignore_slot() {
        for slot in WRAP_BELOW..=WRAP_ABOVE {
            assert_eq!(PlayMode::Forward.steer(slot, -1), 1);
            assert_eq!(PlayMode::Backward.steer(slot, 1), -1);
        }
    }

    #[test]
    fn test_ping_pong_turns_at_playable_bounds() {
        assert_eq!(PlayMode::PingPong.steer(FIRST_STEP, -1), 1);
        assert_eq!(PlayMode::PingPong.steer(LAST_STEP, 1), -1);
        // No opinion mid-cycle.
        assert_eq!(PlayMode::PingPong.steer(4, 1), 1);
        assert_eq!(PlayMode::PingPong.steer(4, -1), -1);
    }

    #[test]
    fn test_ping_pong_fixed_turns_on_boundary_slots() {
        assert_eq!(PlayMode::PingPongFixed.steer(WRAP_BELOW, -1), 1);
        assert_eq!(PlayMode::PingPongFixed.steer(WRAP_ABOVE, 1), -1);
        // The playable bounds are ordinary slots in this mode.
        assert_eq!(PlayMode::PingPongFixed.steer(FIRST_STEP, -1), -1);
        assert_eq!(PlayMode::PingPongFixed.steer(LAST_STEP, 1), 1);
    }

    #[test]
    fn test_wrap_policy() {
        assert!(PlayMode::Forward.wraps_around());
        assert!(PlayMode::Backward.wraps_around());
        assert!(PlayMode::PingPong.wraps_around());
        assert!(!PlayMode::PingPongFixed.wraps_around());
    }
}
