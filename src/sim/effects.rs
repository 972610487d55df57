//! Timed status effects and the power-ups that grant them

use serde::{Deserialize, Serialize};

use crate::secs_to_ticks;

/// Kinds of status effect an entity can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Absorbs hits (charges) or a single hazard contact
    Shield,
    /// One extra jump per grounding
    DoubleJump,
    /// Jump force multiplied by `HIGH_JUMP_FACTOR`
    HighJump,
    /// Halves the world pace for the games that read it
    SlowMotion,
}

/// Jump force multiplier while `HighJump` is active
pub const HIGH_JUMP_FACTOR: f32 = 1.35;

/// An active effect. `charges: None` means unlimited for the duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub remaining: u32,
    pub charges: Option<u32>,
}

/// What picking up a power-up grants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub kind: EffectKind,
    pub ticks: u32,
    pub charges: Option<u32>,
}

/// Set of active effects; at most one entry per kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    active: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    /// Apply a grant, replacing any existing effect of the same kind
    pub fn apply(&mut self, grant: Grant) {
        if grant.ticks == 0 {
            return;
        }
        let effect = StatusEffect {
            kind: grant.kind,
            remaining: grant.ticks,
            charges: grant.charges,
        };
        match self.active.iter_mut().find(|e| e.kind == grant.kind) {
            Some(existing) => *existing = effect,
            None => self.active.push(effect),
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.active.iter().find(|e| e.kind == kind && e.remaining > 0)
    }

    /// Remaining frames of an effect (0 when inactive)
    pub fn remaining(&self, kind: EffectKind) -> u32 {
        self.get(kind).map(|e| e.remaining).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance one frame. Returns the kinds that expired on this frame.
    pub fn tick(&mut self) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for effect in &mut self.active {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.active.retain(|e| e.remaining > 0);
        expired
    }

    /// Remove an effect outright. Returns whether it was active.
    pub fn consume(&mut self, kind: EffectKind) -> bool {
        let before = self.active.len();
        self.active.retain(|e| e.kind != kind);
        self.active.len() != before
    }

    /// Spend one charge of an effect. Unlimited effects are not used up.
    /// Returns whether the hit was absorbed.
    pub fn absorb(&mut self, kind: EffectKind) -> bool {
        let Some(effect) = self.active.iter_mut().find(|e| e.kind == kind && e.remaining > 0) else {
            return false;
        };
        match effect.charges {
            None => true,
            Some(0) => false,
            Some(n) => {
                effect.charges = Some(n - 1);
                if n == 1 {
                    self.consume(kind);
                }
                true
            }
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Collectible power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    /// Zone climb shield: survives one lava contact within 5 seconds
    Shield,
    /// Double jump for 11 seconds
    SuperJump,
    /// Unlimited obstacle shield for 13 seconds
    CapShield,
    /// Double jump plus four absorbed hits for 11 seconds
    IronArmor,
    /// Higher jumps and a slower world for 12 seconds
    Flash,
}

impl PowerUp {
    /// Power-ups the runner picks from at random
    pub const RUNNER: [PowerUp; 4] = [
        PowerUp::SuperJump,
        PowerUp::CapShield,
        PowerUp::IronArmor,
        PowerUp::Flash,
    ];

    pub fn grants(&self) -> Vec<Grant> {
        match self {
            PowerUp::Shield => vec![Grant {
                kind: EffectKind::Shield,
                ticks: secs_to_ticks(5.0),
                charges: None,
            }],
            PowerUp::SuperJump => vec![Grant {
                kind: EffectKind::DoubleJump,
                ticks: secs_to_ticks(11.0),
                charges: None,
            }],
            PowerUp::CapShield => vec![Grant {
                kind: EffectKind::Shield,
                ticks: secs_to_ticks(13.0),
                charges: None,
            }],
            PowerUp::IronArmor => vec![
                Grant {
                    kind: EffectKind::DoubleJump,
                    ticks: secs_to_ticks(11.0),
                    charges: None,
                },
                Grant {
                    kind: EffectKind::Shield,
                    ticks: secs_to_ticks(11.0),
                    charges: Some(4),
                },
            ],
            PowerUp::Flash => vec![
                Grant {
                    kind: EffectKind::HighJump,
                    ticks: secs_to_ticks(12.0),
                    charges: None,
                },
                Grant {
                    kind: EffectKind::SlowMotion,
                    ticks: secs_to_ticks(12.0),
                    charges: None,
                },
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUp::Shield => "shield",
            PowerUp::SuperJump => "super jump",
            PowerUp::CapShield => "cap shield",
            PowerUp::IronArmor => "iron armor",
            PowerUp::Flash => "flash",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shield(ticks: u32, charges: Option<u32>) -> Grant {
        Grant {
            kind: EffectKind::Shield,
            ticks,
            charges,
        }
    }

    #[test]
    fn test_effect_expires_at_zero() {
        let mut effects = StatusEffects::new();
        effects.apply(shield(2, None));
        assert!(effects.is_active(EffectKind::Shield));

        assert!(effects.tick().is_empty());
        assert_eq!(effects.remaining(EffectKind::Shield), 1);

        assert_eq!(effects.tick(), vec![EffectKind::Shield]);
        assert!(!effects.is_active(EffectKind::Shield));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_reapply_refreshes_duration() {
        let mut effects = StatusEffects::new();
        effects.apply(shield(10, None));
        effects.tick();
        effects.apply(shield(10, Some(2)));
        assert_eq!(effects.remaining(EffectKind::Shield), 10);
        assert_eq!(effects.iter().count(), 1);
    }

    #[test]
    fn test_absorb_spends_charges() {
        let mut effects = StatusEffects::new();
        effects.apply(shield(100, Some(2)));
        assert!(effects.absorb(EffectKind::Shield));
        assert!(effects.absorb(EffectKind::Shield));
        assert!(!effects.is_active(EffectKind::Shield));
        assert!(!effects.absorb(EffectKind::Shield));
    }

    #[test]
    fn test_unlimited_absorb_is_not_spent() {
        let mut effects = StatusEffects::new();
        effects.apply(shield(100, None));
        for _ in 0..10 {
            assert!(effects.absorb(EffectKind::Shield));
        }
        assert!(effects.consume(EffectKind::Shield));
        assert!(!effects.absorb(EffectKind::Shield));
    }

    #[test]
    fn test_iron_armor_grants_two_effects() {
        let mut effects = StatusEffects::new();
        for grant in PowerUp::IronArmor.grants() {
            effects.apply(grant);
        }
        assert!(effects.is_active(EffectKind::DoubleJump));
        assert_eq!(effects.get(EffectKind::Shield).and_then(|e| e.charges), Some(4));
    }

    proptest! {
        /// Remaining duration never goes up while an effect runs, and the
        /// effect is inactive exactly when it reaches zero
        #[test]
        fn prop_duration_monotonic(ticks in 1u32..500, steps in 1usize..600) {
            let mut effects = StatusEffects::new();
            effects.apply(shield(ticks, None));
            let mut last = effects.remaining(EffectKind::Shield);
            for _ in 0..steps {
                effects.tick();
                let now = effects.remaining(EffectKind::Shield);
                prop_assert!(now <= last);
                prop_assert_eq!(effects.is_active(EffectKind::Shield), now > 0);
                last = now;
            }
        }
    }
}
