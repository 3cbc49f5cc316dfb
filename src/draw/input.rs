use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Keys typed and the last left click, filled in while events are polled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputQueue {
    /// Front is the most recently typed key.
    keys_typed: VecDeque<char>,
    mouse_pressed: bool,
    /// Device-pixel position of the last left click.
    mouse_position: Option<(f64, f64)>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_key(&mut self, key: char) {
        self.keys_typed.push_front(key);
    }

    pub fn record_left_click(&mut self, position: (f64, f64)) {
        self.mouse_pressed = true;
        self.mouse_position = Some(position);
    }

    pub fn has_next_key_typed(&self) -> bool {
        !self.keys_typed.is_empty()
    }

    /// Removes and returns the most recently typed key.
    pub fn next_key_typed(&mut self) -> Result<char> {
        self.keys_typed
            .pop_front()
            .ok_or_else(|| Error::state("no key has been typed; check has_next_key_typed first"))
    }

    /// True once per left click.
    pub fn take_mouse_pressed(&mut self) -> bool {
        std::mem::take(&mut self.mouse_pressed)
    }

    pub fn last_click(&self) -> Result<(f64, f64)> {
        self.mouse_position
            .ok_or_else(|| Error::state("can't determine mouse position if a click hasn't happened"))
    }

    pub fn pending_keys(&self) -> usize {
        self.keys_typed.len()
    }
}
