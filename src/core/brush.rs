use serde::{Deserialize, Serialize};

use super::pixel_buffer::PixelBuffer;

/// Edge length of remote pattern brushes
pub const BRUSH_SIZE: u32 = 8;

/// Tileable pattern in destination pixel format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Pattern {
    /// Panics if `pixels` does not hold `width * height` values or a side is 0.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        assert!(width > 0 && height > 0, "pattern must not be empty");
        assert_eq!(pixels.len(), (width * height) as usize, "pattern size mismatch");
        Self { width, height, pixels }
    }

    /// Use the top-left corner of a surface (at most 8×8) as the tile
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let bounds = buffer.bounds();
        let width = bounds.width.clamp(1, BRUSH_SIZE as i32);
        let height = bounds.height.clamp(1, BRUSH_SIZE as i32);
        let tile = crate::math::Rect::from_size(width, height);
        let pixels = match tile.intersection(&bounds) {
            Some(rect) if rect == tile => buffer.read_rect(rect),
            _ => vec![0; (width * height) as usize],
        };
        Self::new(width as u32, height as u32, pixels)
    }

    /// 8×8 two-colour pattern: set bits take `background`, clear bits `foreground`
    pub fn from_mono(rows: &[u8; 8], foreground: u32, background: u32) -> Self {
        let pixels = rows
            .iter()
            .flat_map(|row| (0..8).map(move |bit| row & (0x80 >> bit) != 0))
            .map(|set| if set { background } else { foreground })
            .collect();
        Self::new(BRUSH_SIZE, BRUSH_SIZE, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pattern value for destination pixel (x, y), brush origin at (0, 0)
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> u32 {
        let px = x.rem_euclid(self.width as i32) as usize;
        let py = y.rem_euclid(self.height as i32) as usize;
        self.pixels[py * self.width as usize + px]
    }
}

/// Pattern operand of a raster operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Brush {
    Solid(u32),
    Pattern(Pattern),
}

impl Brush {
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> u32 {
        match self {
            Brush::Solid(color) => *color,
            Brush::Pattern(pattern) => pattern.sample(x, y),
        }
    }
}

/// The six standard hatch styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatchStyle {
    Horizontal,
    Vertical,
    ForwardDiagonal,
    BackwardDiagonal,
    Cross,
    DiagonalCross,
}

impl HatchStyle {
    pub fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => HatchStyle::Horizontal,
            1 => HatchStyle::Vertical,
            2 => HatchStyle::ForwardDiagonal,
            3 => HatchStyle::BackwardDiagonal,
            4 => HatchStyle::Cross,
            5 => HatchStyle::DiagonalCross,
            _ => return None,
        })
    }

    /// Monochrome rows with hatch lines as clear bits (drawn in the foreground)
    pub fn mono_rows(self) -> [u8; 8] {
        let lines: [u8; 8] = match self {
            HatchStyle::Horizontal => [0, 0, 0, 0xFF, 0, 0, 0, 0],
            HatchStyle::Vertical => [0x10; 8],
            HatchStyle::ForwardDiagonal => [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80],
            HatchStyle::BackwardDiagonal => [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01],
            HatchStyle::Cross => [0x10, 0x10, 0x10, 0xFF, 0x10, 0x10, 0x10, 0x10],
            HatchStyle::DiagonalCross => [0x81, 0x42, 0x24, 0x18, 0x18, 0x24, 0x42, 0x81],
        };
        lines.map(|row| !row)
    }
}

/// Brush as described by the remote side, before colour conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum RemoteBrush {
    /// Filled with the call's foreground colour
    Solid,
    /// 8×8 pixels at the server colour depth
    Pattern { data: Vec<u8> },
    /// 8×8 bits, set bits in the background colour
    Mono { rows: [u8; 8] },
    Hatched { hatch: HatchStyle },
}

/// Line styles of a cosmetic pen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
    Null,
}

impl PenStyle {
    pub fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => PenStyle::Solid,
            1 => PenStyle::Dash,
            2 => PenStyle::Dot,
            3 => PenStyle::DashDot,
            4 => PenStyle::DashDotDot,
            5 => PenStyle::Null,
            _ => return None,
        })
    }

    /// Alternating on/off run lengths in pixels, starting with "on"
    pub fn dashes(self) -> Option<&'static [u32]> {
        match self {
            PenStyle::Dash => Some(&[18, 6]),
            PenStyle::Dot => Some(&[3, 3]),
            PenStyle::DashDot => Some(&[9, 6, 3, 6]),
            PenStyle::DashDotDot => Some(&[9, 3, 3, 3, 3, 3]),
            PenStyle::Solid | PenStyle::Null => None,
        }
    }
}

/// Line pen; `color` is a remote colour until the context converts it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pen {
    #[serde(default)]
    pub style: PenStyle,
    #[serde(default = "default_pen_width")]
    pub width: u32,
    pub color: u32,
}

fn default_pen_width() -> u32 {
    1
}

impl Pen {
    pub fn solid(color: u32) -> Self {
        Self {
            style: PenStyle::Solid,
            width: 1,
            color,
        }
    }
}
