//! Tap-vs-drag classification.
//!
//! A press that is released quickly and close to where it started is a
//! selection tap; anything longer or further is treated as camera look and
//! never reaches targeting.

use std::time::Duration;

use glam::Vec2;

use crate::pointer::{PointerEvent, PointerPhase};

#[derive(Debug, Clone, Copy)]
struct PressStart {
    position: Vec2,
    timestamp: Duration,
}

#[derive(Debug, Clone)]
pub struct TapClassifier {
    max_duration: Duration,
    max_movement: f32,
    start: Option<PressStart>,
}

impl TapClassifier {
    pub fn new(max_duration: Duration, max_movement: f32) -> Self {
        Self {
            max_duration,
            max_movement,
            start: None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.start.is_some()
    }

    /// Feed one event. Returns the tap position when a press sequence ends
    /// inside both bounds.
    pub fn feed(&mut self, event: &PointerEvent) -> Option<Vec2> {
        match event.phase {
            PointerPhase::Began => {
                self.start = Some(PressStart {
                    position: event.position,
                    timestamp: event.timestamp,
                });
                None
            }
            PointerPhase::Moved => None,
            PointerPhase::Cancelled => {
                self.start = None;
                None
            }
            PointerPhase::Ended => {
                let start = self.start.take()?;
                let duration = event.timestamp.saturating_sub(start.timestamp);
                let distance = event.position.distance(start.position);
                if duration <= self.max_duration && distance <= self.max_movement {
                    Some(event.position)
                } else {
                    log::debug!(
                        "press not a tap ({} ms, {:.1} px)",
                        duration.as_millis(),
                        distance
                    );
                    None
                }
            }
        }
    }
}
