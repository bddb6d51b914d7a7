//! Processor power policy handed to the platform power manager.

/// Frequency bounds and light-sleep enable for the power manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerPolicy {
    pub min_freq_mhz: u32,
    pub max_freq_mhz: u32,
    /// Enter light sleep automatically when the scheduler is idle (tickless idle).
    pub light_sleep_enable: bool,
}

impl PowerPolicy {
    /// Pin the processor at `freq_mhz` so frequency scaling cannot disturb
    /// radio timing.
    pub const fn pinned(freq_mhz: u32, light_sleep_enable: bool) -> Self {
        Self {
            min_freq_mhz: freq_mhz,
            max_freq_mhz: freq_mhz,
            light_sleep_enable,
        }
    }

    pub const fn is_pinned(&self) -> bool {
        self.min_freq_mhz == self.max_freq_mhz
    }

    /// Nonzero bounds with `min <= max`.
    pub const fn is_well_formed(&self) -> bool {
        self.min_freq_mhz > 0 && self.min_freq_mhz <= self.max_freq_mhz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_policy() {
        let policy = PowerPolicy::pinned(160, true);
        assert!(policy.is_pinned());
        assert!(policy.is_well_formed());
        assert_eq!(policy.min_freq_mhz, 160);
        assert_eq!(policy.max_freq_mhz, 160);
        assert!(policy.light_sleep_enable);
    }

    #[test]
    fn scaled_policy_is_not_pinned() {
        let policy = PowerPolicy {
            min_freq_mhz: 80,
            max_freq_mhz: 160,
            light_sleep_enable: false,
        };
        assert!(!policy.is_pinned());
        assert!(policy.is_well_formed());
    }

    #[test]
    fn malformed_policies() {
        assert!(!PowerPolicy::pinned(0, false).is_well_formed());
        let inverted = PowerPolicy {
            min_freq_mhz: 240,
            max_freq_mhz: 80,
            light_sleep_enable: false,
        };
        assert!(!inverted.is_well_formed());
    }
}
