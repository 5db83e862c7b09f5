use serde::{Deserialize, Serialize};

/// Number of entries in an indexed-colour palette
pub const PALETTE_SIZE: usize = 256;

/// One palette colour, laid out as the RGB triple sent on the wire
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl PaletteEntry {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Indexed-colour lookup table used when converting 8-bpp remote data.
///
/// Always holds 256 entries; colours beyond the supplied count are black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Box<[PaletteEntry; PALETTE_SIZE]>,
    count: usize,
}

impl Palette {
    /// Build a palette from up to 256 colours; extra colours are ignored
    pub fn new(colors: &[PaletteEntry]) -> Self {
        let count = colors.len().min(PALETTE_SIZE);
        let mut entries = Box::new([PaletteEntry::default(); PALETTE_SIZE]);
        entries[..count].copy_from_slice(&colors[..count]);
        Self { entries, count }
    }

    /// Build a palette from packed RGB triples; a trailing partial triple is dropped
    pub fn from_rgb_bytes(bytes: &[u8]) -> Self {
        let whole = bytes.len() - bytes.len() % 3;
        Self::new(bytemuck::cast_slice(&bytes[..whole]))
    }

    /// Number of colours supplied by the remote side
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn entry(&self, index: u8) -> PaletteEntry {
        self.entries[index as usize]
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries[..]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(&[])
    }
}
