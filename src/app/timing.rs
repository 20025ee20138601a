use std::time::Instant;
use winit::window::Window;

pub struct FrameTiming {
    last_fps_time: Instant,
    frame_count: u32,
    fps: f32,
    base_title: String,
    last_title: String,
}

impl FrameTiming {
    pub fn new(base_title: String) -> Self {
        Self {
            last_fps_time: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            base_title,
            last_title: String::new(),
        }
    }

    pub fn update(&mut self, now: Instant) {
        self.frame_count = self.frame_count.saturating_add(1);
        let elapsed = now.saturating_duration_since(self.last_fps_time);
        if elapsed.as_secs_f32() >= 0.5 {
            self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_fps_time = now;
        }
    }

    pub fn title(&self, status: &str) -> String {
        format!("{} - {} - {:.1} fps", self.base_title, status, self.fps)
    }

    /// Push the title to the window only when it changed.
    pub fn apply_title(&mut self, window: Option<&Window>, status: &str) {
        let title = self.title(status);
        if title == self.last_title {
            return;
        }
        if let Some(window) = window {
            window.set_title(&title);
        }
        self.last_title = title;
    }
}
