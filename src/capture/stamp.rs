// Timestamp stamping for captured pictures
//
// Draws an opaque label box near the bottom-left corner of a frame and
// writes the capture time into it with a small built-in 3x5 pixel font.
// Lowercase letters are drawn as capitals; characters without a glyph are
// left blank.

use image::{Rgb, RgbImage};

/// Box geometry, relative to the bottom-left corner
pub const BOX_LEFT: u32 = 10;
pub const BOX_BOTTOM_OFFSET: u32 = 30;
pub const BOX_WIDTH: u32 = 280;
pub const BOX_HEIGHT: u32 = 20;
/// Text origin; the baseline sits `TEXT_BASELINE_OFFSET` above the bottom edge
pub const TEXT_LEFT: u32 = 15;
pub const TEXT_BASELINE_OFFSET: u32 = 15;

const SCALE: u32 = 2;
const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

const BOX_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Five rows of three pixels each; bit 2 is the leftmost pixel
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        _ => return None,
    };
    Some(rows)
}

/// Fill a rectangle, clipped to the image
pub fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Draw `text` with its top-left corner at (x, y); returns the advance width
pub fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) -> u32 {
    let advance = (GLYPH_WIDTH + 1) * SCALE;
    let mut cursor = x;

    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0b100 >> col) != 0 {
                        fill_rect(
                            img,
                            cursor + col * SCALE,
                            y + row as u32 * SCALE,
                            SCALE,
                            SCALE,
                            color,
                        );
                    }
                }
            }
        }
        cursor += advance;
    }

    cursor - x
}

/// Stamp `label` into the bottom-left box of `img`
pub fn stamp(img: &mut RgbImage, label: &str) {
    let height = img.height();

    let box_top = height.saturating_sub(BOX_BOTTOM_OFFSET);
    fill_rect(img, BOX_LEFT, box_top, BOX_WIDTH, BOX_HEIGHT, BOX_COLOR);

    let baseline = height.saturating_sub(TEXT_BASELINE_OFFSET);
    let text_top = baseline.saturating_sub(GLYPH_HEIGHT * SCALE);
    draw_text(img, TEXT_LEFT, text_top, label, TEXT_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_draws_box_and_text() {
        let mut img = RgbImage::from_pixel(640, 480, Rgb([40, 40, 40]));
        stamp(&mut img, "Captured: Oct 18, 2026, 14:03:22");

        // Box corners are white
        assert_eq!(*img.get_pixel(BOX_LEFT, 480 - BOX_BOTTOM_OFFSET), BOX_COLOR);
        assert_eq!(
            *img.get_pixel(BOX_LEFT + BOX_WIDTH - 1, 480 - BOX_BOTTOM_OFFSET + BOX_HEIGHT - 1),
            BOX_COLOR
        );
        // Outside the box is untouched
        assert_eq!(*img.get_pixel(5, 475), Rgb([40, 40, 40]));

        // Some text pixels are black inside the box
        let black = (BOX_LEFT..BOX_LEFT + BOX_WIDTH)
            .flat_map(|x| (450..470).map(move |y| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) == TEXT_COLOR)
            .count();
        assert!(black > 100, "expected rendered glyphs, got {} pixels", black);
    }

    #[test]
    fn test_stamp_on_tiny_frame_does_not_panic() {
        let mut img = RgbImage::new(8, 8);
        stamp(&mut img, "Captured: now");
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_lowercase_uses_capitals() {
        assert_eq!(glyph('a'), glyph('A'));
        assert!(glyph('~').is_none());
    }
}
