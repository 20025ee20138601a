//! Point at a wall, pick a color for it.
//!
//! The core (color model, gradient raster, picker geometry, targeting and
//! the selection session) is engine-agnostic. `scene` and `app` provide a
//! small box scene, a first-person camera and a winit host around it.

pub mod app;
pub mod color;
pub mod config;
pub mod picker;
pub mod pointer;
pub mod scene;
pub mod session;
pub mod targeting;
pub mod ui;
