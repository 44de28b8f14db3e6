// src/render/text.rs
//
// Bitmap text from the built-in 8x8 font, scaled by pixel replication.
// Bold is a one-pixel double strike.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

pub const GLYPH: u32 = 8;

/// One line of text placed on the canvas (top-left anchored).
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub scale: u32,
    pub color: [u8; 3],
    pub bold: bool,
}

/// Rendered width in pixels.
pub fn text_width(text: &str, scale: u32, bold: bool) -> u32 {
    let n = text.chars().count() as u32;
    n * GLYPH * scale + if bold && n > 0 { 1 } else { 0 }
}

/// Cut to `max_chars`, marking the cut with `..`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(2);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("..");
    out
}

fn glyph(ch: char) -> [u8; 8] {
    let ch = match ch {
        '\u{2212}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => '-',
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201c}' | '\u{201d}' => '"',
        c => c,
    };
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

pub fn draw(img: &mut RgbImage, run: &TextRun) {
    let (w, h) = img.dimensions();
    let color = Rgb(run.color);
    let strikes: &[u32] = if run.bold { &[0, 1] } else { &[0] };

    for (i, ch) in run.text.chars().enumerate() {
        let origin_x = run.x + i as u32 * GLYPH * run.scale;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for &dx in strikes {
                    for sy in 0..run.scale {
                        for sx in 0..run.scale {
                            let px = origin_x + col * run.scale + sx + dx;
                            let py = run.y + row as u32 * run.scale + sy;
                            if px < w && py < h {
                                img.put_pixel(px, py, color);
                            }
                        }
                    }
                }
            }
        }
    }
}
