//! Frame timers
//!
//! Delays, spawn intervals and countdowns are counted in frames and stored in
//! the world, so replacing the world on restart drops every pending timer.

use std::collections::BTreeMap;

/// A countdown in frames, optionally repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimer {
    pub remaining: u32,
    /// Re-arm with this period after firing
    pub period: Option<u32>,
}

impl FrameTimer {
    pub fn once(ticks: u32) -> Self {
        Self {
            remaining: ticks,
            period: None,
        }
    }

    pub fn every(ticks: u32) -> Self {
        Self {
            remaining: ticks,
            period: Some(ticks.max(1)),
        }
    }
}

/// Named timers advanced once per frame
#[derive(Debug, Clone, Default)]
pub struct Timers {
    entries: BTreeMap<&'static str, FrameTimer>,
    fired: Vec<&'static str>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a timer
    pub fn set(&mut self, name: &'static str, timer: FrameTimer) {
        self.entries.insert(name, timer);
    }

    pub fn cancel(&mut self, name: &'static str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Change a repeating timer's period without resetting its countdown
    pub fn set_period(&mut self, name: &'static str, period: u32) {
        if let Some(timer) = self.entries.get_mut(name) {
            timer.period = Some(period.max(1));
            timer.remaining = timer.remaining.min(period.max(1));
        }
    }

    pub fn remaining(&self, name: &'static str) -> Option<u32> {
        self.entries.get(name).map(|t| t.remaining)
    }

    pub fn is_pending(&self, name: &'static str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether the timer fired during the latest `advance`
    pub fn fired(&self, name: &'static str) -> bool {
        self.fired.contains(&name)
    }

    /// Advance every timer one frame. One-shot timers are dropped after
    /// firing; repeating timers re-arm.
    pub fn advance(&mut self) -> &[&'static str] {
        self.fired.clear();
        for (name, timer) in self.entries.iter_mut() {
            timer.remaining = timer.remaining.saturating_sub(1);
            if timer.remaining == 0 {
                self.fired.push(*name);
                if let Some(period) = timer.period {
                    timer.remaining = period;
                }
            }
        }
        self.entries.retain(|_, t| t.remaining > 0);
        &self.fired
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.fired.clear();
    }
}
