//! Pure frame composition plus the surfaces frames are presented on.

mod surface;

use std::fmt::{self, Write as _};

pub use surface::{terminal_size, RenderSurface, TerminalSurface, FALLBACK_TERMINAL_SIZE};

/// Default number of rows drawn on each side of the centre line.
pub const DEFAULT_CENTER: usize = 6;
/// Hue cycles advanced per second of playback.
pub const HUE_RATE: f64 = 0.05;
pub const SATURATION: f64 = 0.5;
pub const VALUE: f64 = 0.9;

const BAR_GLYPH: char = '█';
const AXIS_GLYPH: char = '─';

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Colour in HSV space, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    /// Colour for the given playback time: hue advances at [`HUE_RATE`] with
    /// fixed saturation and value.
    pub fn cycling(time_seconds: f64) -> Self {
        Self {
            h: (time_seconds * HUE_RATE).rem_euclid(1.0),
            s: SATURATION,
            v: VALUE,
        }
    }

    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self.h, self.s, self.v)
    }
}

/// Standard sextant HSV to RGB conversion with truncation to integers.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let scaled = h * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;

    let channel = |x: f64| (255.0 * x).clamp(0.0, 255.0) as u8;
    let p = channel(v * (1.0 - s));
    let q = channel(v * (1.0 - f * s));
    let t = channel(v * (1.0 - (1.0 - f) * s));
    let v = channel(v);

    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb { r, g, b }
}

/// Appends `text` wrapped in a truecolor foreground escape.
pub fn colorize_into(out: &mut String, text: impl fmt::Display, color: Rgb) {
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "\x1b[38;2;{};{};{}m{}\x1b[0m",
        color.r, color.g, color.b, text
    );
}

pub fn colorize(text: impl fmt::Display, color: Rgb) -> String {
    let mut out = String::new();
    colorize_into(&mut out, text, color);
    out
}

/// One rendered screen: the bar rows, a blank separator and the lyric row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    rows: Vec<String>,
}

impl Frame {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Final row carrying the revealed lyric text.
    pub fn lyric_row(&self) -> Option<&str> {
        self.rows.last().map(String::as_str)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                f.write_char('\n')?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

/// Builds mirrored amplitude bars around a horizontal axis.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    center: usize,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}

impl FrameRenderer {
    pub fn new(center: usize) -> Self {
        Self { center }
    }

    pub fn center(&self) -> usize {
        self.center
    }

    /// Renders `2 * center` bar rows, a blank row and the colorized lyric text.
    ///
    /// A cell at distance `d` from the centre row is filled when the bar's
    /// level is at least `d`; the centre row itself is the axis.
    pub fn render(&self, levels: &[usize], color: Hsv, typed: &str) -> Frame {
        let rgb = color.to_rgb();
        let mut rows = Vec::with_capacity(self.center * 2 + 2);

        for row in 0..self.center * 2 {
            let mut line = String::new();
            for &level in levels {
                if row == self.center {
                    colorize_into(&mut line, AXIS_GLYPH, rgb);
                } else if row.abs_diff(self.center) <= level {
                    colorize_into(&mut line, BAR_GLYPH, rgb);
                } else {
                    line.push(' ');
                }
            }
            rows.push(line);
        }

        rows.push(String::new());
        rows.push(if typed.is_empty() {
            String::new()
        } else {
            colorize(typed, rgb)
        });

        Frame { rows }
    }
}
