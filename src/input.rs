//! Logical input: actions, per-frame input sets and key bindings
//!
//! Movement actions are level-triggered: a game re-reads `held` every frame.
//! Discrete actions (jump, shoot, special, start, pause, restart) read
//! `pressed`, which holds each key-down once.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical actions a key can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Shoot,
    Special,
    Start,
    Pause,
    Restart,
}

/// Input for one frame: what is held and what was pressed since last frame,
/// per player slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFrame {
    held: BTreeSet<(u8, Action)>,
    pressed: BTreeSet<(u8, Action)>,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: an action held down this frame
    pub fn hold(mut self, slot: u8, action: Action) -> Self {
        self.held.insert((slot, action));
        self
    }

    /// Builder: an action pressed (and held) this frame
    pub fn press(mut self, slot: u8, action: Action) -> Self {
        self.held.insert((slot, action));
        self.pressed.insert((slot, action));
        self
    }

    pub fn is_held(&self, slot: u8, action: Action) -> bool {
        self.held.contains(&(slot, action))
    }

    pub fn was_pressed(&self, slot: u8, action: Action) -> bool {
        self.pressed.contains(&(slot, action))
    }

    /// Pressed by any slot (meta actions like pause and restart)
    pub fn any_pressed(&self, action: Action) -> bool {
        self.pressed.iter().any(|(_, a)| *a == action)
    }

    /// -1, 0 or 1 from Left/Right
    pub fn axis_x(&self, slot: u8) -> f32 {
        let mut x = 0.0;
        if self.is_held(slot, Action::Left) {
            x -= 1.0;
        }
        if self.is_held(slot, Action::Right) {
            x += 1.0;
        }
        x
    }

    /// -1, 0 or 1 from Up/Down (screen y grows downward)
    pub fn axis_y(&self, slot: u8) -> f32 {
        let mut y = 0.0;
        if self.is_held(slot, Action::Up) {
            y -= 1.0;
        }
        if self.is_held(slot, Action::Down) {
            y += 1.0;
        }
        y
    }

    pub fn axis(&self, slot: u8) -> Vec2 {
        Vec2::new(self.axis_x(slot), self.axis_y(slot))
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty() && self.pressed.is_empty()
    }
}

/// Where a key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub slot: u8,
    pub action: Action,
}

/// Key code (browser `KeyboardEvent.code` naming) to action map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    keys: BTreeMap<String, Binding>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: &str, slot: u8, action: Action) -> Self {
        self.keys.insert(key.to_string(), Binding { slot, action });
        self
    }

    pub fn lookup(&self, key: &str) -> Option<Binding> {
        self.keys.get(key).copied()
    }

    /// Overlay another map on top of this one
    pub fn merge(&mut self, other: &KeyBindings) {
        for (key, binding) in &other.keys {
            self.keys.insert(key.clone(), *binding);
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn with_meta_keys(self) -> Self {
        self.bind("Enter", 0, Action::Start)
            .bind("KeyP", 0, Action::Pause)
            .bind("Escape", 0, Action::Pause)
            .bind("KeyR", 0, Action::Restart)
    }

    /// Arrows or WASD move, Space jumps, F shoots
    pub fn single_player() -> Self {
        Self::new()
            .bind("ArrowLeft", 0, Action::Left)
            .bind("ArrowRight", 0, Action::Right)
            .bind("ArrowUp", 0, Action::Up)
            .bind("ArrowDown", 0, Action::Down)
            .bind("KeyA", 0, Action::Left)
            .bind("KeyD", 0, Action::Right)
            .bind("KeyW", 0, Action::Up)
            .bind("KeyS", 0, Action::Down)
            .bind("Space", 0, Action::Jump)
            .bind("KeyF", 0, Action::Shoot)
            .with_meta_keys()
    }

    /// Player 1 on WASD + F/G, player 2 on the arrows + K/L
    pub fn two_player() -> Self {
        Self::new()
            .bind("KeyA", 0, Action::Left)
            .bind("KeyD", 0, Action::Right)
            .bind("KeyW", 0, Action::Jump)
            .bind("KeyS", 0, Action::Down)
            .bind("KeyF", 0, Action::Shoot)
            .bind("KeyG", 0, Action::Special)
            .bind("ArrowLeft", 1, Action::Left)
            .bind("ArrowRight", 1, Action::Right)
            .bind("ArrowUp", 1, Action::Jump)
            .bind("ArrowDown", 1, Action::Down)
            .bind("KeyK", 1, Action::Shoot)
            .bind("KeyL", 1, Action::Special)
            .with_meta_keys()
    }

    /// Paddle games: player 1 on W/S, player 2 on the up/down arrows
    pub fn paddles() -> Self {
        Self::new()
            .bind("KeyW", 0, Action::Up)
            .bind("KeyS", 0, Action::Down)
            .bind("ArrowUp", 1, Action::Up)
            .bind("ArrowDown", 1, Action::Down)
            .with_meta_keys()
    }
}

/// Anything that can report the logical input for the next frame
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

/// Keyboard state fed by key events from the host
#[derive(Debug, Clone)]
pub struct KeyboardState {
    bindings: KeyBindings,
    down: BTreeSet<String>,
    pressed: BTreeSet<(u8, Action)>,
}

impl KeyboardState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            down: BTreeSet::new(),
            pressed: BTreeSet::new(),
        }
    }

    /// Key went down. Unknown keys are ignored (returns false); auto-repeat
    /// of a key already down does not press again.
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(binding) = self.bindings.lookup(code) else {
            return false;
        };
        if self.down.insert(code.to_string()) {
            self.pressed.insert((binding.slot, binding.action));
        }
        true
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.down.remove(code)
    }

    /// Release everything (focus lost)
    pub fn release_all(&mut self) {
        self.down.clear();
    }
}

impl InputSource for KeyboardState {
    fn poll(&mut self) -> InputFrame {
        let held = self
            .down
            .iter()
            .filter_map(|code| self.bindings.lookup(code))
            .map(|b| (b.slot, b.action))
            .collect();
        InputFrame {
            held,
            pressed: std::mem::take(&mut self.pressed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_triggered_movement() {
        let mut kb = KeyboardState::new(KeyBindings::single_player());
        kb.key_down("ArrowLeft");

        // Held key keeps reporting every frame
        for _ in 0..3 {
            let frame = kb.poll();
            assert_eq!(frame.axis_x(0), -1.0);
        }

        kb.key_up("ArrowLeft");
        assert_eq!(kb.poll().axis_x(0), 0.0);
    }

    #[test]
    fn test_discrete_actions_fire_once_per_key_down() {
        let mut kb = KeyboardState::new(KeyBindings::single_player());
        kb.key_down("Space");
        kb.key_down("Space"); // auto-repeat

        let frame = kb.poll();
        assert!(frame.was_pressed(0, Action::Jump));
        assert!(!kb.poll().was_pressed(0, Action::Jump));

        kb.key_up("Space");
        kb.key_down("Space");
        assert!(kb.poll().was_pressed(0, Action::Jump));
    }

    #[test]
    fn test_tap_within_one_frame_still_presses() {
        let mut kb = KeyboardState::new(KeyBindings::single_player());
        kb.key_down("KeyF");
        kb.key_up("KeyF");
        let frame = kb.poll();
        assert!(frame.was_pressed(0, Action::Shoot));
        assert!(!frame.is_held(0, Action::Shoot));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut kb = KeyboardState::new(KeyBindings::single_player());
        assert!(!kb.key_down("F13"));
        assert!(kb.poll().is_empty());
    }

    #[test]
    fn test_two_players_independent() {
        let mut kb = KeyboardState::new(KeyBindings::two_player());
        kb.key_down("KeyA");
        kb.key_down("ArrowRight");
        kb.key_down("KeyK");
        let frame = kb.poll();
        assert_eq!(frame.axis_x(0), -1.0);
        assert_eq!(frame.axis_x(1), 1.0);
        assert!(frame.was_pressed(1, Action::Shoot));
        assert!(!frame.was_pressed(0, Action::Shoot));
    }

    #[test]
    fn test_paddle_keys() {
        let mut kb = KeyboardState::new(KeyBindings::paddles());
        kb.key_down("KeyW");
        kb.key_down("ArrowDown");
        let frame = kb.poll();
        assert_eq!(frame.axis_y(0), -1.0);
        assert_eq!(frame.axis_y(1), 1.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let frame = InputFrame::new()
            .hold(0, Action::Left)
            .hold(0, Action::Right)
            .hold(0, Action::Down);
        assert_eq!(frame.axis(0), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_bindings_roundtrip_json() {
        let bindings = KeyBindings::new().bind("KeyJ", 1, Action::Jump);
        let json = serde_json::to_string(&bindings).unwrap();
        assert!(json.contains("\"jump\""));
        let back: KeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lookup("KeyJ"), Some(Binding { slot: 1, action: Action::Jump }));
    }

    #[test]
    fn test_merge_overrides() {
        let mut bindings = KeyBindings::single_player();
        bindings.merge(&KeyBindings::new().bind("Space", 0, Action::Shoot));
        assert_eq!(bindings.lookup("Space").map(|b| b.action), Some(Action::Shoot));
    }
}
