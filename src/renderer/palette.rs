//! Neon palette: how each entity category looks

use std::collections::BTreeMap;

use crate::sim::{Category, EffectKind, Entity};

/// The neon colours every renderer picks from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neon {
    Cyan,
    Magenta,
    Yellow,
    Green,
    Orange,
    Red,
    White,
}

impl Neon {
    /// CSS colour, for renderers that draw to a canvas
    pub fn hex(&self) -> &'static str {
        match self {
            Neon::Cyan => "#00ffff",
            Neon::Magenta => "#ff00ff",
            Neon::Yellow => "#ffff00",
            Neon::Green => "#00ff00",
            Neon::Orange => "#ff4500",
            Neon::Red => "#ff0000",
            Neon::White => "#ffffff",
        }
    }
}

/// Glyph and colour for one entity. `glow` is a hint; renderers may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub glyph: char,
    pub color: Neon,
    pub glow: bool,
}

impl Style {
    pub const fn new(glyph: char, color: Neon) -> Self {
        Self {
            glyph,
            color,
            glow: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Palette {
    categories: BTreeMap<Category, Style>,
    /// Player colour by slot; wraps around
    players: Vec<Neon>,
    shielded: Neon,
}

impl Default for Palette {
    fn default() -> Self {
        let categories = BTreeMap::from([
            (Category::Player, Style::new('@', Neon::Cyan)),
            (Category::Obstacle, Style::new('#', Neon::Magenta)),
            (Category::Projectile, Style::new('o', Neon::Orange)),
            (Category::Pickup, Style::new('*', Neon::Green)),
            (Category::Goal, Style::new('=', Neon::Yellow)),
            (
                Category::Hazard,
                Style {
                    glyph: '~',
                    color: Neon::Red,
                    glow: false,
                },
            ),
        ]);
        Self {
            categories,
            players: vec![Neon::Cyan, Neon::Magenta],
            shielded: Neon::White,
        }
    }
}

impl Palette {
    pub fn category(&self, category: Category) -> Style {
        self.categories
            .get(&category)
            .copied()
            .unwrap_or(Style::new('?', Neon::White))
    }

    /// Override the style of one category
    pub fn set(&mut self, category: Category, style: Style) {
        self.categories.insert(category, style);
    }

    /// Style for a specific entity: players get their slot colour, and a
    /// shield turns them white
    pub fn style(&self, entity: &Entity) -> Style {
        let mut style = self.category(entity.category);
        if entity.category == Category::Player {
            if let Some(slot) = entity.slot {
                if !self.players.is_empty() {
                    style.color = self.players[slot as usize % self.players.len()];
                }
            }
            if entity.effects.is_active(EffectKind::Shield) {
                style.color = self.shielded;
            }
        }
        style
    }

    /// Draw order: lower layers first, players on top
    pub fn layer(category: Category) -> u8 {
        match category {
            Category::Hazard => 0,
            Category::Goal => 1,
            Category::Obstacle => 2,
            Category::Pickup => 3,
            Category::Projectile => 4,
            Category::Player => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUp;

    #[test]
    fn test_players_by_slot() {
        let palette = Palette::default();
        let p1 = Entity::player(0, 0.0, 0.0, 1.0, 1.0);
        let p2 = Entity::player(1, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(palette.style(&p1).color, Neon::Cyan);
        assert_eq!(palette.style(&p2).color, Neon::Magenta);
        assert_eq!(palette.style(&p2).glyph, '@');
    }

    #[test]
    fn test_shield_tint() {
        let palette = Palette::default();
        let mut p = Entity::player(0, 0.0, 0.0, 1.0, 1.0);
        p.apply_power_up(PowerUp::Shield);
        assert_eq!(palette.style(&p).color, Neon::White);
    }

    #[test]
    fn test_override() {
        let mut palette = Palette::default();
        palette.set(Category::Goal, Style::new('O', Neon::Orange));
        assert_eq!(palette.category(Category::Goal).glyph, 'O');
        assert_eq!(Neon::Orange.hex(), "#ff4500");
    }
}
