mod input;
mod timing;

use crate::config::{Config, ConfigError};
use crate::picker::PickerRegion;
use crate::pointer::{PointerEvent, PointerPhase};
use crate::scene::camera::CameraController;
use crate::scene::serialization::{load_scene_from_file, SerializationError};
use crate::scene::SceneState;
use crate::session::{SelectionSession, SessionMode};
use crate::targeting::{CameraProjection, TapClassifier, Targeting};
use crate::ui::PickerPanel;
use input::{InputAction, InputState};
use timing::FrameTiming;

use glam::{Vec2, Vec3};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("scene error: {0}")]
    Scene(#[from] SerializationError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    scene: Option<PathBuf>,
}

impl Options {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, AppError> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--config" => &mut options.config,
                "--scene" => &mut options.scene,
                other => return Err(AppError::Usage(format!("unknown argument `{}`", other))),
            };
            let value = args
                .next()
                .ok_or_else(|| AppError::Usage(format!("{} needs a path", arg)))?;
            *slot = Some(PathBuf::from(value));
        }
        Ok(options)
    }
}

pub struct App {
    window: Option<Arc<Window>>,
    config: Config,
    scene: SceneState,
    camera: CameraController,
    session: SelectionSession,
    targeting: Targeting,
    taps: TapClassifier,
    input: InputState,
    ui: PickerPanel,
    timing: FrameTiming,
    /// Last pointer position while pressed, for look deltas.
    look_anchor: Option<Vec2>,
    /// Picker region captured by the press that is currently down.
    edit_region: Option<PickerRegion>,
    target_frame_duration: Duration,
    next_frame_time: Instant,
    failure: Option<AppError>,
}

impl App {
    pub fn new(config: Config, scene: SceneState) -> Result<Self, AppError> {
        let session = SelectionSession::new(&config)?;
        let targeting = Targeting::new(config.max_range, config.paintable_categories)?;
        let taps = TapClassifier::new(config.tap_max_duration(), config.tap_max_movement_px);
        let camera = match scene.bounds() {
            Some((center, extent)) => CameraController::from_bounds(center, extent),
            None => CameraController::new(Vec3::new(0.0, 1.6, 0.0), std::f32::consts::FRAC_PI_2, 0.0),
        };
        let now = Instant::now();

        Ok(Self {
            window: None,
            config,
            scene,
            camera,
            session,
            targeting,
            taps,
            input: InputState::new(now),
            ui: PickerPanel::new(),
            timing: FrameTiming::new("wallpaint".to_string()),
            look_anchor: None,
            edit_region: None,
            target_frame_duration: Duration::from_millis(16),
            next_frame_time: now,
            failure: None,
        })
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    fn update_target_frame_duration(&mut self, window: &Window) {
        let mut target = Duration::from_millis(16);
        if let Some(monitor) = window.current_monitor() {
            if let Some(millihz) = monitor.refresh_rate_millihertz() {
                let hz = millihz as f32 / 1000.0;
                if hz > 1.0 {
                    target = Duration::from_secs_f32(1.0 / hz);
                }
            }
        }
        self.target_frame_duration = target;
        self.next_frame_time = Instant::now() + self.target_frame_duration;
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        self.camera
            .set_viewport(new_size.width as f32, new_size.height as f32);
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match self.session.mode() {
            SessionMode::Aiming => self.aim(event),
            SessionMode::Editing => self.edit(event),
        }
    }

    fn aim(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Began => self.look_anchor = Some(event.position),
            PointerPhase::Moved => {
                if let Some(anchor) = self.look_anchor {
                    if self.session.accepts_look_input() {
                        self.camera
                            .look(event.position - anchor, self.config.look_sensitivity_deg);
                    }
                    self.look_anchor = Some(event.position);
                }
            }
            PointerPhase::Ended | PointerPhase::Cancelled => self.look_anchor = None,
        }

        let Some(tap) = self.taps.feed(&event) else {
            return;
        };
        let camera: &dyn CameraProjection = &self.camera;
        if self
            .session
            .select_at(tap, &self.targeting, Some(camera), &mut self.scene, &mut self.ui)
            .is_none()
        {
            log::debug!("tap at ({:.0}, {:.0}) selected nothing", tap.x, tap.y);
        }
    }

    fn edit(&mut self, event: PointerEvent) {
        self.look_anchor = None;
        if event.phase == PointerPhase::Began {
            self.edit_region = self.session.layout().hit(event.position);
        }
        let Some(region) = self.edit_region else {
            return;
        };
        match region {
            PickerRegion::SaturationValue => self.session.pointer_in_picker(
                event.position,
                event.phase,
                &mut self.scene,
                &mut self.ui,
            ),
            PickerRegion::HueStrip => self.session.pointer_in_hue_strip(
                event.position,
                event.phase,
                &mut self.scene,
                &mut self.ui,
            ),
        };
        if matches!(event.phase, PointerPhase::Ended | PointerPhase::Cancelled) {
            self.edit_region = None;
        }
    }

    /// Returns `true` when the app should exit.
    fn handle_action(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Escape => {
                if self.session.close(&mut self.ui) {
                    self.edit_region = None;
                    false
                } else {
                    true
                }
            }
            InputAction::Snapshot => {
                let dir = &self.config.snapshot_dir;
                match self.session.raster().save_pngs(dir) {
                    Ok(()) => log::info!("saved picker gradients to {}", dir.display()),
                    Err(err) => log::warn!("snapshot to {} failed: {}", dir.display(), err),
                }
                false
            }
            InputAction::None => false,
        }
    }

    fn redraw(&mut self) {
        self.timing.update(Instant::now());
        let status = self.ui.summary(&self.scene);
        self.timing.apply_title(self.window.as_deref(), &status);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("wallpaint")
            .with_inner_size(PhysicalSize::new(1280u32, 720u32))
            .with_resizable(true);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {}", err);
                self.failure = Some(err.into());
                event_loop.exit();
                return;
            }
        };

        self.handle_resize(window.inner_size());
        self.update_target_frame_duration(&window);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let now = Instant::now();
        if let Some(pointer) = self.input.handle_window_event(&event, now) {
            self.handle_pointer(pointer);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed && !event.repeat;
                let action = self.input.handle_key(event.physical_key, pressed);
                if self.handle_action(action) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
                if let Some(window) = self.window.clone() {
                    self.update_target_frame_duration(&window);
                }
            }
            WindowEvent::Moved(_) => {
                if let Some(window) = self.window.clone() {
                    self.update_target_frame_duration(&window);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame_time {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame_time = now + self.target_frame_duration;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame_time));
    }
}

pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let options = Options::parse(std::env::args().skip(1))?;
    let config = match &options.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };
    let scene = match &options.scene {
        Some(path) => load_scene_from_file(path)?,
        None => SceneState::demo_room(),
    };
    log::info!(
        "scene ready with {} objects: {}",
        scene.objects().len(),
        scene.object_names().join(", ")
    );
    log::info!("tap a wall to edit its color, Escape closes the picker or exits, F12 saves gradients");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, scene)?;
    event_loop.run_app(&mut app)?;
    if let Some(err) = app.failure.take() {
        return Err(err);
    }

    log::info!("goodbye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::targeting::ObjectId;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    fn pointer(x: f32, y: f32, phase: PointerPhase, ms: u64) -> PointerEvent {
        PointerEvent::new(Vec2::new(x, y), phase, Duration::from_millis(ms))
    }

    fn demo_app() -> App {
        let mut app = App::new(Config::default(), SceneState::demo_room()).unwrap();
        app.handle_resize(PhysicalSize::new(1280, 720));
        app
    }

    fn north_wall(app: &App) -> ObjectId {
        app.scene()
            .objects()
            .iter()
            .find(|object| object.name == "North wall")
            .map(|object| object.id)
            .unwrap()
    }

    #[test]
    fn options_parse_paths() {
        let options = Options::parse(args(&["--scene", "room.json", "--config", "c.json"])).unwrap();
        assert_eq!(options.scene, Some(PathBuf::from("room.json")));
        assert_eq!(options.config, Some(PathBuf::from("c.json")));
        assert_eq!(Options::parse(Vec::new()).unwrap(), Options::default());
    }

    #[test]
    fn options_reject_bad_input() {
        assert!(matches!(
            Options::parse(args(&["--verbose"])),
            Err(AppError::Usage(_))
        ));
        assert!(matches!(
            Options::parse(args(&["--scene"])),
            Err(AppError::Usage(_))
        ));
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = Config {
            sv_resolution: 0,
            ..Config::default()
        };
        assert!(matches!(
            App::new(config, SceneState::demo_room()),
            Err(AppError::Config(ConfigError::InvalidResolution { .. }))
        ));
    }

    #[test]
    fn tap_edit_and_close() {
        let mut app = demo_app();
        let north = north_wall(&app);

        app.handle_pointer(pointer(640.0, 360.0, PointerPhase::Began, 0));
        app.handle_pointer(pointer(641.0, 360.0, PointerPhase::Ended, 100));
        assert_eq!(app.session().mode(), SessionMode::Editing);
        assert_eq!(app.session().selected(), Some(north));

        // Top-left corner of the SV area is full value, no saturation.
        app.handle_pointer(pointer(40.0, 40.0, PointerPhase::Began, 500));
        assert_eq!(app.scene().object(north).unwrap().base_color, Rgb::WHITE);

        // Dragging out of the area keeps editing with the clamped position.
        app.handle_pointer(pointer(400.0, 400.0, PointerPhase::Moved, 520));
        assert_eq!(app.scene().object(north).unwrap().base_color, Rgb::BLACK);
        app.handle_pointer(pointer(400.0, 400.0, PointerPhase::Ended, 540));

        assert!(!app.handle_action(InputAction::Escape));
        assert_eq!(app.session().mode(), SessionMode::Aiming);
        assert!(app.handle_action(InputAction::Escape));
    }

    #[test]
    fn slow_press_only_looks() {
        let mut app = demo_app();
        let yaw = app.camera.yaw;

        app.handle_pointer(pointer(640.0, 360.0, PointerPhase::Began, 0));
        app.handle_pointer(pointer(740.0, 360.0, PointerPhase::Moved, 100));
        app.handle_pointer(pointer(740.0, 360.0, PointerPhase::Ended, 900));

        assert_eq!(app.session().mode(), SessionMode::Aiming);
        assert!((app.camera.yaw - yaw - 30f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn editing_freezes_the_camera() {
        let mut app = demo_app();
        app.handle_pointer(pointer(640.0, 360.0, PointerPhase::Began, 0));
        app.handle_pointer(pointer(640.0, 360.0, PointerPhase::Ended, 50));
        assert_eq!(app.session().mode(), SessionMode::Editing);

        let (yaw, pitch) = (app.camera.yaw, app.camera.pitch);
        app.handle_pointer(pointer(600.0, 600.0, PointerPhase::Began, 200));
        app.handle_pointer(pointer(900.0, 100.0, PointerPhase::Moved, 300));
        app.handle_pointer(pointer(900.0, 100.0, PointerPhase::Ended, 400));
        assert_eq!((app.camera.yaw, app.camera.pitch), (yaw, pitch));
    }

    #[test]
    fn hue_strip_press_changes_hue() {
        let mut app = demo_app();
        let north = north_wall(&app);
        app.handle_pointer(pointer(640.0, 360.0, PointerPhase::Began, 0));
        app.handle_pointer(pointer(640.0, 360.0, PointerPhase::Ended, 50));

        // Saturate first so the hue shows up in the material.
        app.handle_pointer(pointer(240.0, 40.0, PointerPhase::Began, 100));
        app.handle_pointer(pointer(240.0, 40.0, PointerPhase::Ended, 110));
        app.handle_pointer(pointer(270.0, 239.0, PointerPhase::Began, 200));
        app.handle_pointer(pointer(270.0, 239.0, PointerPhase::Ended, 210));

        let color = app.scene().object(north).unwrap().base_color;
        assert!(color.r > 0.9 && color.g < 0.1 && color.b < 0.1, "{:?}", color);
    }
}
