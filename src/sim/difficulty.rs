//! Difficulty ramps
//!
//! A ramp maps progress (elapsed frames or completed zones) to a scalar that
//! only moves in one direction and stops at a limit.

/// `base + step * floor(progress / every)`, clamped at `limit`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub base: f32,
    pub step: f32,
    pub every: u64,
    pub limit: f32,
}

impl Ramp {
    pub const fn new(base: f32, step: f32, every: u64, limit: f32) -> Self {
        Self {
            base,
            step,
            every,
            limit,
        }
    }

    /// A ramp that never changes
    pub const fn flat(value: f32) -> Self {
        Self::new(value, 0.0, 1, value)
    }

    pub fn at(&self, progress: u64) -> f32 {
        let steps = progress / self.every.max(1);
        let value = self.base + self.step * steps as f32;
        if self.step >= 0.0 {
            value.min(self.limit)
        } else {
            value.max(self.limit)
        }
    }

    /// Ramp value rounded to whole frames, at least 1 (spawn intervals)
    pub fn ticks_at(&self, progress: u64) -> u32 {
        self.at(progress).round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_increasing_ramp_caps() {
        let speed = Ramp::new(5.0, 0.5, 600, 9.0);
        assert_eq!(speed.at(0), 5.0);
        assert_eq!(speed.at(599), 5.0);
        assert_eq!(speed.at(600), 5.5);
        assert_eq!(speed.at(60_000), 9.0);
    }

    #[test]
    fn test_decreasing_ramp_floors() {
        let interval = Ramp::new(90.0, -5.0, 600, 45.0);
        assert_eq!(interval.ticks_at(0), 90);
        assert_eq!(interval.ticks_at(1200), 80);
        assert_eq!(interval.ticks_at(1_000_000), 45);
    }

    #[test]
    fn test_flat() {
        let r = Ramp::flat(3.0);
        assert_eq!(r.at(0), 3.0);
        assert_eq!(r.at(u64::MAX), 3.0);
    }

    proptest! {
        #[test]
        fn prop_ramp_monotonic(
            base in 0.0f32..100.0,
            step in -5.0f32..5.0,
            every in 1u64..1000,
            a in 0u64..100_000,
            b in 0u64..100_000,
        ) {
            let limit = if step >= 0.0 { base + 50.0 } else { (base - 50.0).max(1.0).min(base) };
            let ramp = Ramp::new(base, step, every, limit);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            if step >= 0.0 {
                prop_assert!(ramp.at(lo) <= ramp.at(hi));
            } else {
                prop_assert!(ramp.at(lo) >= ramp.at(hi));
            }
        }
    }
}
