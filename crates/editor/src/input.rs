//! Pointer samples fed to the editor once per tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Begin,
    Moving,
    End,
}

/// One pointer contact in screen pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub position: Vec2,
    pub phase: TouchPhase,
}

impl Touch {
    pub fn new(position: Vec2, phase: TouchPhase) -> Self {
        Self { position, phase }
    }
}

/// Pointer state for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerFrame {
    pub touches: Vec<Touch>,
    /// Pointer is over a UI element and must not reach the world
    pub over_ui: bool,
}

impl PointerFrame {
    /// No contacts this tick
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn single(position: Vec2, phase: TouchPhase) -> Self {
        Self {
            touches: vec![Touch::new(position, phase)],
            over_ui: false,
        }
    }

    pub fn over_ui(mut self) -> Self {
        self.over_ui = true;
        self
    }

    pub fn primary(&self) -> Option<&Touch> {
        self.touches.first()
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Exactly one touch, in the Begin phase, not over UI
    pub fn single_begin(&self) -> Option<Vec2> {
        match self.touches.as_slice() {
            [t] if t.phase == TouchPhase::Begin && !self.over_ui => Some(t.position),
            _ => None,
        }
    }

    /// Touch 0 ended this tick, not over UI
    pub fn primary_end(&self) -> Option<Vec2> {
        match self.primary() {
            Some(t) if t.phase == TouchPhase::End && !self.over_ui => Some(t.position),
            _ => None,
        }
    }

    /// The active gesture is over: no contacts, or touch 0 ended
    pub fn is_released(&self) -> bool {
        match self.primary() {
            None => true,
            Some(t) => t.phase == TouchPhase::End,
        }
    }
}
