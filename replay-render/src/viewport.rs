//! Geographic to pixel coordinate mapping

use replay_core::SpatialBounds;

/// Smallest span, in degrees, a viewport axis may cover
const MIN_SPAN: f64 = 1e-6;

/// Maps longitude to x and latitude to y (north up) on a fixed-size canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Frames `bounds` with a margin of `padding_ratio` times the larger span
    /// on every side
    pub fn from_bounds(bounds: &SpatialBounds, width: u32, height: u32, padding_ratio: f64) -> Self {
        let span = bounds
            .latitude_span()
            .max(bounds.longitude_span())
            .max(MIN_SPAN);
        let pad = span * padding_ratio.max(0.0);

        Self {
            min_longitude: bounds.min_longitude - pad,
            max_longitude: bounds.max_longitude + pad,
            min_latitude: bounds.min_latitude - pad,
            max_latitude: bounds.max_latitude + pad,
            width,
            height,
        }
    }

    /// Pixel position of a geographic coordinate. May fall outside the canvas.
    pub fn project(&self, latitude: f64, longitude: f64) -> (f32, f32) {
        let lon_span = (self.max_longitude - self.min_longitude).max(MIN_SPAN);
        let lat_span = (self.max_latitude - self.min_latitude).max(MIN_SPAN);
        let max_x = self.width.saturating_sub(1) as f64;
        let max_y = self.height.saturating_sub(1) as f64;

        let x = (longitude - self.min_longitude) / lon_span * max_x;
        let y = (self.max_latitude - latitude) / lat_span * max_y;
        (x as f32, y as f32)
    }
}
