// Step slot data and defaults

/// Number of playable steps in the cycle.
pub const STEP_COUNT: usize = 8;

/// Repeat counts live in [REPEAT_MIN, REPEAT_MAX].
pub const REPEAT_MIN: i32 = 1;
pub const REPEAT_MAX: i32 = 8;

/// One playable slot in the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Normalized slider position in [0.0, 1.0]; 0.0 is the top of the
    /// configured note range.
    pub pitch: f32,

    /// Inactive steps are skipped entirely during traversal.
    pub active: bool,

    /// Silent steps still take their turn (and burn their repeats) but
    /// emit no note.
    pub audible: bool,

    /// Pulses this step owns before the position moves on.
    pub repeat_count: i32,

    /// Pulses left at the current visit; reloaded from `repeat_count`
    /// when the step is left and on every sequence reset.
    pub repeat_remaining: i32,
}

impl Step {
    pub fn new() -> Self {
        Self {
            pitch: 0.5,
            active: true,
            audible: true,
            repeat_count: 1,
            repeat_remaining: 1,
        }
    }

    /// Set the repeat count and reload the remaining counter.
    ///
    /// Out-of-range values wrap to the opposite end of the range.
    pub fn set_repeat_count(&mut self, count: i32) {
        self.repeat_count = wrap_repeat(count);
        self.repeat_remaining = self.repeat_count;
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a repeat value into [REPEAT_MIN, REPEAT_MAX]: above the max snaps
/// to the min, below the min snaps to the max.
pub(crate) fn wrap_repeat(count: i32) -> i32 {
    if count > REPEAT_MAX {
        REPEAT_MIN
    } else if count < REPEAT_MIN {
        REPEAT_MAX
    } else {
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_defaults() {
        let step = Step::new();

        assert_eq!(step.pitch, 0.5);
        assert!(step.active);
        assert!(step.audible);
        assert_eq!(step.repeat_count, 1);
        assert_eq!(step.repeat_remaining, 1);
    }

    #[test]
    fn test_set_repeat_count_reloads_remaining() {
        let mut step = Step::new();
        step.repeat_remaining = 0;

        step.set_repeat_count(5);

        assert_eq!(step.repeat_count, 5);
        assert_eq!(step.repeat_remaining, 5);
    }

    #[test]
    fn test_repeat_wraps_to_opposite_end() {
        let mut step = Step::new();

        step.set_repeat_count(REPEAT_MAX + 1);
        assert_eq!(step.repeat_count, REPEAT_MIN);

        step.set_repeat_count(REPEAT_MIN - 1);
        assert_eq!(step.repeat_count, REPEAT_MAX);
    }

    #[test]
    fn test_in_range_repeat_untouched() {
        for count in REPEAT_MIN..=REPEAT_MAX {
            assert_eq!(wrap_repeat(count), count);
        }
    }
}
