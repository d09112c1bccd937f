//! Frame rasterization

use crate::title;
use crate::viewport::Viewport;
use crate::RenderConfig;
use image::{ImageBuffer, Rgba, RgbaImage};
use replay_core::Frame;

const ARROW_COLOR: Rgba<u8> = Rgba([128, 128, 128, 255]);
const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Renders replay frames onto a fixed viewport
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    config: RenderConfig,
    viewport: Viewport,
}

impl FrameRenderer {
    /// Creates a new frame renderer. The viewport decides the canvas size.
    pub fn new(config: RenderConfig, viewport: Viewport) -> Self {
        Self { config, viewport }
    }

    /// Renders a single frame: relay arrows first, agents on top, then the
    /// timestamp title centered along the top edge
    pub fn render(&self, frame: &Frame) -> RgbaImage {
        let mut image = ImageBuffer::from_pixel(
            self.viewport.width,
            self.viewport.height,
            Rgba(self.config.background),
        );

        for (sender, receiver) in frame.drawable_relays() {
            let from = self.viewport.project(sender.latitude, sender.longitude);
            let to = self.viewport.project(receiver.latitude, receiver.longitude);
            draw_arrow(
                &mut image,
                from,
                to,
                self.config.arrow_width,
                self.config.point_radius,
                ARROW_COLOR,
            );
        }

        for point in &frame.points {
            let center = self.viewport.project(point.latitude, point.longitude);
            let radius = self.config.point_radius;
            fill_circle(&mut image, center, radius, OUTLINE_COLOR);
            fill_circle(&mut image, center, (radius - 1.5).max(1.0), Rgba(point.status.rgba()));
        }

        let scale = self.config.title_scale;
        if scale > 0 {
            let text = title::frame_title(frame.timestamp_ms);
            let x = image.width().saturating_sub(title::text_width(&text, scale)) / 2;
            title::draw_text(&mut image, &text, (x, scale * 2), scale, OUTLINE_COLOR);
        }

        image
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

/// Fills every pixel whose center lies within `radius` of `center`
fn fill_circle(image: &mut RgbaImage, center: (f32, f32), radius: f32, color: Rgba<u8>) {
    let (cx, cy) = center;
    let Some((x0, y0, x1, y1)) = clip_box(image, cx - radius, cy - radius, cx + radius, cy + radius) else {
        return;
    };

    let r2 = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                image.put_pixel(x, y, color);
            }
        }
    }
}

/// Draws a line from `from` to `to` with an arrowhead ending `inset` pixels
/// before `to`, so the head stays visible next to the receiving dot
fn draw_arrow(
    image: &mut RgbaImage,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    inset: f32,
    color: Rgba<u8>,
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= inset {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);

    let tip = (to.0 - ux * inset, to.1 - uy * inset);
    let head_length = (width * 3.0).min(length - inset);
    let base = (tip.0 - ux * head_length, tip.1 - uy * head_length);
    let half = width * 1.5;
    let left = (base.0 - uy * half, base.1 + ux * half);
    let right = (base.0 + uy * half, base.1 - ux * half);

    draw_thick_line(image, from, base, width, color);
    fill_triangle(image, tip, left, right, color);
}

/// Fills pixels within `width / 2` of the segment `a`–`b`
fn draw_thick_line(image: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width: f32, color: Rgba<u8>) {
    let half = width / 2.0;
    let Some((x0, y0, x1, y1)) = clip_box(
        image,
        a.0.min(b.0) - half,
        a.1.min(b.1) - half,
        a.0.max(b.0) + half,
        a.1.max(b.1) + half,
    ) else {
        return;
    };

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f32 - a.0, y as f32 - a.1);
            let t = if len2 > 0.0 {
                ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (ex, ey) = (px - t * dx, py - t * dy);
            if ex * ex + ey * ey <= half * half {
                image.put_pixel(x, y, color);
            }
        }
    }
}

fn fill_triangle(image: &mut RgbaImage, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = clip_box(
        image,
        a.0.min(b.0).min(c.0),
        a.1.min(b.1).min(c.1),
        a.0.max(b.0).max(c.0),
        a.1.max(b.1).max(c.1),
    ) else {
        return;
    };

    let edge = |p: (f32, f32), q: (f32, f32), x: f32, y: f32| (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (fx, fy) = (x as f32, y as f32);
            let e0 = edge(a, b, fx, fy);
            let e1 = edge(b, c, fx, fy);
            let e2 = edge(c, a, fx, fy);
            let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
            if inside {
                image.put_pixel(x, y, color);
            }
        }
    }
}

/// Intersects a float bounding box with the image, in pixel indices
fn clip_box(image: &RgbaImage, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<(u32, u32, u32, u32)> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let last_x = (image.width() - 1) as f32;
    let last_y = (image.height() - 1) as f32;
    if !(min_x <= last_x && min_y <= last_y && max_x >= 0.0 && max_y >= 0.0) {
        return None;
    }

    Some((
        min_x.floor().max(0.0) as u32,
        min_y.floor().max(0.0) as u32,
        max_x.ceil().min(last_x) as u32,
        max_y.ceil().min(last_y) as u32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::{AgentPoint, RelayAssociation, SpatialBounds, StatusColor};

    fn renderer() -> FrameRenderer {
        let bounds = SpatialBounds {
            min_latitude: 0.0,
            max_latitude: 10.0,
            min_longitude: 0.0,
            max_longitude: 10.0,
        };
        let config = RenderConfig {
            width: 101,
            height: 101,
            padding_ratio: 0.0,
            ..Default::default()
        };
        let viewport = Viewport::from_bounds(&bounds, config.width, config.height, config.padding_ratio);
        FrameRenderer::new(config, viewport)
    }

    fn point(id: &str, lat: f64, lon: f64, status: StatusColor) -> AgentPoint {
        AgentPoint {
            agent_id: id.to_string(),
            latitude: lat,
            longitude: lon,
            status,
        }
    }

    #[test]
    fn test_points_use_status_colors() {
        let frame = Frame::new(
            0,
            vec![
                point("a", 5.0, 2.0, StatusColor::Searching),
                point("b", 5.0, 8.0, StatusColor::Active),
            ],
            vec![],
        );

        let image = renderer().render(&frame);
        assert_eq!(image.dimensions(), (101, 101));
        assert_eq!(*image.get_pixel(20, 50), Rgba(StatusColor::Searching.rgba()));
        assert_eq!(*image.get_pixel(80, 50), Rgba(StatusColor::Active.rgba()));
        assert_eq!(*image.get_pixel(50, 50), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_relay_draws_arrow_between_points() {
        let frame = Frame::new(
            0,
            vec![
                point("a", 5.0, 2.0, StatusColor::Active),
                point("b", 5.0, 8.0, StatusColor::Idle),
            ],
            vec![RelayAssociation::new("a", "b")],
        );

        let image = renderer().render(&frame);
        assert_eq!(*image.get_pixel(50, 50), ARROW_COLOR);
    }

    #[test]
    fn test_undrawable_relay_is_ignored() {
        let frame = Frame::new(
            0,
            vec![point("a", 5.0, 2.0, StatusColor::Active)],
            vec![RelayAssociation::new("a", "missing")],
        );

        let image = renderer().render(&frame);
        assert_eq!(*image.get_pixel(50, 50), Rgba([255, 255, 255, 255]));
    }

    fn title_pixels(image: &RgbaImage) -> usize {
        image.enumerate_pixels().filter(|(_, y, p)| *y < 25 && **p == OUTLINE_COLOR).count()
    }

    #[test]
    fn test_title_drawn_above_points() {
        let frame = Frame::new(1_738_800_000_000, vec![], vec![]);
        let image = renderer().render(&frame);
        assert!(title_pixels(&image) > 0);
        assert_eq!(*image.get_pixel(50, 50), Rgba([255, 255, 255, 255]));

        let mut config = renderer().config.clone();
        config.title_scale = 0;
        let untitled = FrameRenderer::new(config, *renderer().viewport()).render(&frame);
        assert_eq!(title_pixels(&untitled), 0);
    }

    #[test]
    fn test_offscreen_point_does_not_panic() {
        let frame = Frame::new(0, vec![point("far", 500.0, -500.0, StatusColor::Idle)], vec![]);
        let image = renderer().render(&frame);
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }
}
