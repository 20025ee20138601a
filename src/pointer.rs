//! Device-agnostic pointer events.
//!
//! Mouse and touch both arrive here as a position, a phase and a timestamp.
//! Positions are in window pixels with the origin at the top-left and y
//! growing downward.

use std::time::Duration;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub phase: PointerPhase,
    /// Time since an arbitrary, fixed epoch chosen by the input source.
    pub timestamp: Duration,
}

impl PointerEvent {
    pub fn new(position: Vec2, phase: PointerPhase, timestamp: Duration) -> Self {
        Self {
            position,
            phase,
            timestamp,
        }
    }
}
