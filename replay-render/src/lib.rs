//! Replay Render Library
//!
//! This library rasterizes replay frames: agents become colored dots and
//! relays become arrows between them, under a timestamp title. Frames are
//! written as a numbered PNG sequence.

pub mod frame_renderer;
pub mod progress_tracker;
pub mod sequence;
pub mod title;
pub mod viewport;

pub use frame_renderer::FrameRenderer;
pub use progress_tracker::ProgressTracker;
pub use sequence::render_sequence;
pub use title::frame_title;
pub use viewport::Viewport;

/// Result type for replay-render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for replay-render operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Replay core error: {0}")]
    Core(#[from] replay_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Radius of an agent dot in pixels
    pub point_radius: f32,
    /// Stroke width of relay arrows in pixels
    pub arrow_width: f32,
    /// Margin around the data, as a fraction of the larger spatial span
    pub padding_ratio: f64,
    /// Background fill
    pub background: [u8; 4],
    /// Pixel size of one title font cell; 0 disables the title
    pub title_scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1100,
            height: 700,
            point_radius: 8.0,
            arrow_width: 4.0,
            padding_ratio: 0.25,
            background: [255, 255, 255, 255],
            title_scale: 3,
        }
    }
}
