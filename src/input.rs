use std::collections::HashSet;

use glam::Vec2;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};

use crate::camera::Movement;

/// Keys held down right now.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
}

/// Mouse movement accumulated over the current frame.
#[derive(Default)]
pub struct MouseState {
    pub delta: Vec2,
    pub scroll_delta: Vec2,
}

impl MouseState {
    /// Offset to feed into [`crate::camera::Camera::rotate`]. Screen y grows downwards, pitch
    /// grows upwards.
    pub fn look_offset(&self) -> Vec2 {
        Vec2::new(self.delta.x, -self.delta.y)
    }
}

/// Binding from a held key to a camera movement.
pub const MOVEMENT_KEYS: [(Keycode, Movement); 6] = [
    (Keycode::W, Movement::Forward),
    (Keycode::S, Movement::Backward),
    (Keycode::A, Movement::Left),
    (Keycode::D, Movement::Right),
    (Keycode::E, Movement::Up),
    (Keycode::Q, Movement::Down),
];

impl KeyboardState {
    pub fn press(&mut self, keycode: Keycode) {
        self.down.insert(keycode);
    }

    pub fn release(&mut self, keycode: Keycode) {
        self.down.remove(&keycode);
    }

    /// Forgets every held key. Key releases are not delivered while the window is unfocused.
    pub fn release_all(&mut self) {
        self.down.clear();
    }

    /// Movements requested by the currently held keys.
    pub fn movements(&self) -> impl Iterator<Item = Movement> + '_ {
        MOVEMENT_KEYS
            .iter()
            .filter(|(key, _)| self.down.contains(key))
            .map(|&(_, movement)| movement)
    }
}

/// Per-frame input bookkeeping.
#[derive(Default)]
pub struct Input {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    pub quit: bool,
    /// Set when the window size changed this frame; query the drawable size for pixels.
    pub resized: bool,
}

impl Input {
    /// Clears everything that only lasts a single frame.
    pub fn begin_frame(&mut self) {
        self.mouse.delta = Vec2::ZERO;
        self.mouse.scroll_delta = Vec2::ZERO;
        self.resized = false;
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => self.quit = true,
            Event::Window {
                win_event: WindowEvent::SizeChanged(..),
                ..
            } => self.resized = true,
            Event::Window {
                win_event: WindowEvent::FocusLost,
                ..
            } => self.keyboard.release_all(),
            Event::MouseMotion { xrel, yrel, .. } => {
                self.mouse.delta += Vec2::new(*xrel as f32, *yrel as f32);
            }
            Event::MouseWheel { x, y, .. } => {
                self.mouse.scroll_delta += Vec2::new(*x as f32, *y as f32);
            }
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => self.keyboard.press(*keycode),
            Event::KeyUp {
                keycode: Some(keycode),
                ..
            } => self.keyboard.release(*keycode),
            _ => {}
        }
    }
}
