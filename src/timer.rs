use instant::Duration;

const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Counts frames and turns them into a frames-per-second figure once per
/// [`SAMPLE_WINDOW`].
#[derive(Debug)]
pub struct FrameTimer {
    frames: u32,
    elapsed: Duration,
    fps: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            frames: 0,
            elapsed: Duration::ZERO,
            fps: 0.0,
        }
    }

    /// Record one frame that took `dt`. Returns `true` when the frame rate
    /// was recomputed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < SAMPLE_WINDOW {
            return false;
        }
        self.fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        true
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_rate_text(&self) -> String {
        format!("FPS: {:.1}", self.fps)
    }
}
