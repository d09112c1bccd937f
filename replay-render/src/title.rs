//! Frame timestamp titles drawn with a built-in 3x5 bitmap font

use image::{Rgba, RgbaImage};

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

/// Title shown above a frame: the UTC wall-clock time of `timestamp_ms`,
/// or the raw millisecond value when it is outside chrono's range
pub fn frame_title(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Pixel width of `text` at the given scale
pub fn text_width(text: &str, scale: u32) -> u32 {
    let chars = text.chars().count() as u32;
    (chars * (GLYPH_WIDTH + 1) * scale).saturating_sub(scale)
}

/// Pixel height of one line of text at the given scale
pub fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * scale
}

/// Draws `text` with its top-left corner at `origin`. Pixels falling outside
/// the image are skipped; characters without a glyph render as blanks.
pub fn draw_text(image: &mut RgbaImage, text: &str, origin: (u32, u32), scale: u32, color: Rgba<u8>) {
    let (width, height) = image.dimensions();
    let mut pen_x = origin.0;

    for c in text.chars() {
        let rows = glyph(c);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                let x0 = pen_x + col * scale;
                let y0 = origin.1 + row as u32 * scale;
                for y in y0..(y0 + scale).min(height) {
                    for x in x0..(x0 + scale).min(width) {
                        image.put_pixel(x, y, color);
                    }
                }
            }
        }
        pen_x = pen_x.saturating_add((GLYPH_WIDTH + 1) * scale);
        if pen_x >= width {
            break;
        }
    }
}

fn glyph(c: char) -> [u8; GLYPH_HEIGHT as usize] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        _ => [0; GLYPH_HEIGHT as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_frame_title_format() {
        assert_eq!(frame_title(0), "1970-01-01 00:00:00");
        assert_eq!(frame_title(1_738_800_000_000), "2025-02-06 00:00:00");
        assert_eq!(frame_title(1_738_800_061_999), "2025-02-06 00:01:01");
        assert_eq!(frame_title(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn test_text_metrics() {
        assert_eq!(text_width("10", 2), 14);
        assert_eq!(text_width("", 3), 0);
        assert_eq!(text_height(3), 15);
    }

    #[test]
    fn test_draw_glyph_pixels() {
        let mut image: RgbaImage = ImageBuffer::from_pixel(10, 12, WHITE);
        draw_text(&mut image, "1", (0, 0), 2, BLACK);

        // top row of '1' is only the middle column
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(2, 0), BLACK);
        assert_eq!(*image.get_pixel(3, 1), BLACK);
        assert_eq!(*image.get_pixel(4, 0), WHITE);
        // bottom row spans all three columns
        assert_eq!(*image.get_pixel(0, 8), BLACK);
        assert_eq!(*image.get_pixel(5, 9), BLACK);
    }

    #[test]
    fn test_draw_clips_to_image() {
        let mut image: RgbaImage = ImageBuffer::from_pixel(5, 4, WHITE);
        draw_text(&mut image, "2025-02-06 00:00:00", (1, 1), 3, BLACK);
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(1, 1), BLACK);
    }
}
