// overlay.rs - Video overlay collaborator interface
//
// Decoded video bypasses the blit engine. The only contact point is the
// colour key painted into the primary surface so the overlay shows
// through.

use crate::context::GdiContext;
use crate::error::{GdiError, Result};
use crate::math::Rect;
use crate::traits::ColorConverter;

/// Frames positioned further off-screen than this belong to a minimised player
pub const OFFSCREEN_LIMIT: i32 = -2048;

/// `I420` fourcc
pub const FOURCC_I420: u32 = u32::from_le_bytes(*b"I420");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePixelFormat {
    /// Planar Y, then U and V at quarter resolution
    I420,
    /// Any other fourcc, copied verbatim
    Other(u32),
}

impl FramePixelFormat {
    pub fn from_fourcc(fourcc: u32) -> Self {
        if fourcc == FOURCC_I420 {
            FramePixelFormat::I420
        } else {
            FramePixelFormat::Other(fourcc)
        }
    }

    pub fn fourcc(self) -> u32 {
        match self {
            FramePixelFormat::I420 => FOURCC_I420,
            FramePixelFormat::Other(fourcc) => fourcc,
        }
    }
}

/// One decoded frame and where it goes on the remote screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub x: i32,
    pub y: i32,
    /// Target size on screen
    pub width: u32,
    pub height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub format: FramePixelFormat,
    /// Visible parts, relative to (x, y)
    pub visible_rects: Vec<Rect>,
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// False for minimised players and fully hidden frames
    pub fn is_presentable(&self) -> bool {
        self.x >= OFFSCREEN_LIMIT && self.y >= OFFSCREEN_LIMIT && !self.visible_rects.is_empty()
    }

    /// Visible rectangles in screen coordinates
    pub fn screen_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        let origin = glam::IVec2::new(self.x, self.y);
        self.visible_rects.iter().map(move |r| r.translate(origin))
    }
}

/// Plane layout of an overlay image as chosen by the video driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayImage {
    pub offsets: [usize; 3],
    pub pitches: [usize; 3],
    pub data_size: usize,
}

impl OverlayImage {
    /// I420 layout with each plane's rows padded to a multiple of `align` bytes
    pub fn i420(width: u32, height: u32, align: usize) -> Self {
        let align = align.max(1);
        let pad = |n: usize| n.div_ceil(align) * align;
        let (w, h) = (width as usize, height as usize);
        let luma_pitch = pad(w);
        let chroma_pitch = pad(w / 2);
        let luma_size = luma_pitch * h;
        let chroma_size = chroma_pitch * (h / 2);
        Self {
            offsets: [0, luma_size, luma_size + chroma_size],
            pitches: [luma_pitch, chroma_pitch, chroma_pitch],
            data_size: luma_size + 2 * chroma_size,
        }
    }
}

/// Copy a frame into an overlay image buffer, honouring the image's plane pitches.
///
/// Formats other than I420 are copied byte for byte, truncated to the
/// smaller of the two sizes.
pub fn pack_frame(frame: &VideoFrame, image: &OverlayImage, out: &mut [u8]) -> Result<()> {
    if out.len() < image.data_size {
        return Err(GdiError::InvalidImageData {
            expected: image.data_size,
            actual: out.len(),
        });
    }

    match frame.format {
        FramePixelFormat::I420 => {
            let (w, h) = (frame.frame_width as usize, frame.frame_height as usize);
            let luma = w * h;
            let chroma = luma / 4;
            if frame.data.len() < luma + 2 * chroma {
                return Err(GdiError::InvalidImageData {
                    expected: luma + 2 * chroma,
                    actual: frame.data.len(),
                });
            }
            let (y_plane, rest) = frame.data.split_at(luma);
            let (u_plane, rest) = rest.split_at(chroma);
            let v_plane = &rest[..chroma];

            copy_plane(y_plane, w, h, out, image.offsets[0], image.pitches[0]);
            copy_plane(u_plane, w / 2, h / 2, out, image.offsets[1], image.pitches[1]);
            copy_plane(v_plane, w / 2, h / 2, out, image.offsets[2], image.pitches[2]);
        }
        FramePixelFormat::Other(_) => {
            let n = image.data_size.min(frame.data.len());
            out[..n].copy_from_slice(&frame.data[..n]);
        }
    }
    Ok(())
}

fn copy_plane(src: &[u8], width: usize, rows: usize, out: &mut [u8], offset: usize, pitch: usize) {
    if pitch == width {
        out[offset..offset + width * rows].copy_from_slice(&src[..width * rows]);
        return;
    }
    for (row, line) in src.chunks_exact(width.max(1)).take(rows).enumerate() {
        let at = offset + row * pitch;
        out[at..at + width].copy_from_slice(line);
    }
}

/// Windowing-system side of video playback
pub trait VideoOverlay {
    /// Colour the overlay shows through, if it uses a colour key
    fn color_key(&self) -> Option<u32>;

    /// Hand a presentable frame to the overlay
    fn process_frame(&mut self, frame: &VideoFrame) -> Result<()>;
}

/// Paint the colour key for `frame` and pass it on to `overlay`.
///
/// Returns false without touching anything when the frame isn't presentable.
pub fn present_frame<O, C>(overlay: &mut O, context: &mut GdiContext<C>, frame: &VideoFrame) -> Result<bool>
where
    O: VideoOverlay + ?Sized,
    C: ColorConverter,
{
    if !frame.is_presentable() {
        log::trace!("skipping hidden video frame at ({}, {})", frame.x, frame.y);
        return Ok(false);
    }
    if let Some(key) = overlay.color_key() {
        context.paint_color_key(frame, key);
    }
    overlay.process_frame(frame)?;
    Ok(true)
}
