use std::time::Instant;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::pointer::{PointerEvent, PointerPhase};

impl From<TouchPhase> for PointerPhase {
    fn from(phase: TouchPhase) -> Self {
        match phase {
            TouchPhase::Started => Self::Began,
            TouchPhase::Moved => Self::Moved,
            TouchPhase::Ended => Self::Ended,
            TouchPhase::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Escape,
    Snapshot,
}

/// Folds the left mouse button and the first touch into one pointer stream.
/// Further fingers are ignored until the first one lifts.
#[derive(Debug)]
pub struct InputState {
    epoch: Instant,
    cursor: Option<Vec2>,
    mouse_down: bool,
    active_touch: Option<u64>,
}

impl InputState {
    pub fn new(epoch: Instant) -> Self {
        Self {
            epoch,
            cursor: None,
            mouse_down: false,
            active_touch: None,
        }
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn handle_key(&self, key: PhysicalKey, pressed: bool) -> InputAction {
        if !pressed {
            return InputAction::None;
        }
        match key {
            PhysicalKey::Code(KeyCode::Escape) => InputAction::Escape,
            PhysicalKey::Code(KeyCode::F12) => InputAction::Snapshot,
            _ => InputAction::None,
        }
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent, now: Instant) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32), now)
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.mouse_button(*state == ElementState::Pressed, now),
            WindowEvent::CursorLeft { .. } => self.cancel_mouse(now),
            WindowEvent::Focused(false) => self.cancel_mouse(now),
            WindowEvent::Touch(touch) => self.touch(
                touch.id,
                touch.phase.into(),
                Vec2::new(touch.location.x as f32, touch.location.y as f32),
                now,
            ),
            _ => None,
        }
    }

    fn event(&self, position: Vec2, phase: PointerPhase, now: Instant) -> PointerEvent {
        PointerEvent::new(position, phase, now.saturating_duration_since(self.epoch))
    }

    fn cursor_moved(&mut self, position: Vec2, now: Instant) -> Option<PointerEvent> {
        self.cursor = Some(position);
        self.mouse_down.then(|| self.event(position, PointerPhase::Moved, now))
    }

    fn mouse_button(&mut self, pressed: bool, now: Instant) -> Option<PointerEvent> {
        let position = self.cursor?;
        if pressed == self.mouse_down {
            return None;
        }
        self.mouse_down = pressed;
        let phase = if pressed {
            PointerPhase::Began
        } else {
            PointerPhase::Ended
        };
        Some(self.event(position, phase, now))
    }

    fn cancel_mouse(&mut self, now: Instant) -> Option<PointerEvent> {
        let position = self.cursor.take();
        if !self.mouse_down {
            return None;
        }
        self.mouse_down = false;
        Some(self.event(position.unwrap_or(Vec2::ZERO), PointerPhase::Cancelled, now))
    }

    fn touch(
        &mut self,
        id: u64,
        phase: PointerPhase,
        position: Vec2,
        now: Instant,
    ) -> Option<PointerEvent> {
        match (self.active_touch, phase) {
            (None, PointerPhase::Began) => self.active_touch = Some(id),
            (Some(active), _) if active == id => {
                if matches!(phase, PointerPhase::Ended | PointerPhase::Cancelled) {
                    self.active_touch = None;
                }
            }
            _ => return None,
        }
        Some(self.event(position, phase, now))
    }
}
