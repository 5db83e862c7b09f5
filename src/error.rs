// error.rs - Recoverable failures of the compositor

/// Errors returned by the compositor.
///
/// Only conditions caused by the environment or by remote data end up here.
/// Caller bugs (unknown surface handles, destroying the primary surface,
/// malformed raster operation codes) panic instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GdiError {
    #[error("failed to allocate {width}x{height} pixel buffer ({bytes} bytes)")]
    Allocation { width: u32, height: u32, bytes: usize },

    #[error("unsupported colour depth: {0} bits per pixel")]
    UnsupportedDepth(u32),

    #[error("no conversion from {src_bpp} bpp to {dst_bpp} bpp")]
    UnsupportedConversion { src_bpp: u32, dst_bpp: u32 },

    #[error("image data is {actual} bytes, expected {expected}")]
    InvalidImageData { expected: usize, actual: usize },

    #[error("desktop save of {len} pixels at offset {offset} exceeds the {capacity}-pixel save buffer")]
    DesktopSaveOverflow { offset: u32, len: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, GdiError>;
