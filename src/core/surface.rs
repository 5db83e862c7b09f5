//! Surface registry.
//!
//! Owns every pixel buffer of a session behind opaque handles. The
//! primary surface always exists; off-screen surfaces come and go with
//! the remote bitmap cache. Handles are never reused, so a stale handle
//! can't silently alias a newer surface.

use std::collections::HashMap;
use std::fmt;

use super::pixel_buffer::PixelBuffer;
use crate::error::Result;

/// Opaque reference to a registered surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(u32);

impl SurfaceHandle {
    /// The visible surface
    pub const PRIMARY: SurfaceHandle = SurfaceHandle(0);

    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

#[derive(Debug)]
pub struct SurfaceManager {
    surfaces: HashMap<SurfaceHandle, PixelBuffer>,
    active: SurfaceHandle,
    next_id: u32,
    bits_per_pixel: u32,
}

impl SurfaceManager {
    /// Allocate the primary surface; every surface shares its depth
    pub fn new(width: u32, height: u32, bits_per_pixel: u32) -> Result<Self> {
        let primary = PixelBuffer::new(width, height, bits_per_pixel)?;
        let mut surfaces = HashMap::new();
        surfaces.insert(SurfaceHandle::PRIMARY, primary);
        Ok(Self {
            surfaces,
            active: SurfaceHandle::PRIMARY,
            next_id: 1,
            bits_per_pixel,
        })
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    /// Allocate a zeroed off-screen surface. It does not become active.
    pub fn create_surface(&mut self, width: u32, height: u32) -> Result<SurfaceHandle> {
        let buffer = PixelBuffer::new(width, height, self.bits_per_pixel)?;
        Ok(self.insert(buffer))
    }

    /// Register an already-filled buffer as an off-screen surface.
    ///
    /// Panics if its depth differs from the registry's.
    pub fn insert(&mut self, buffer: PixelBuffer) -> SurfaceHandle {
        assert_eq!(
            buffer.bits_per_pixel(),
            self.bits_per_pixel,
            "surface depth must match the destination depth"
        );
        let handle = SurfaceHandle(self.next_id);
        self.next_id += 1;
        log::debug!("created {handle} {}x{}", buffer.width(), buffer.height());
        self.surfaces.insert(handle, buffer);
        handle
    }

    /// Register `buffer` in place of `old`, which is destroyed.
    ///
    /// If `old` was the drawing surface the replacement takes over.
    pub fn replace(&mut self, old: SurfaceHandle, buffer: PixelBuffer) -> SurfaceHandle {
        self.expect_off_screen(old, "replace");
        let was_active = self.active == old;
        let handle = self.insert(buffer);
        self.destroy_surface(old);
        if was_active {
            self.active = handle;
        }
        handle
    }

    /// Select the drawing surface; `None` selects the primary surface
    pub fn switch_surface(&mut self, handle: Option<SurfaceHandle>) {
        let handle = handle.unwrap_or(SurfaceHandle::PRIMARY);
        assert!(self.contains(handle), "switch to unknown {handle}");
        self.active = handle;
    }

    /// Free an off-screen surface, failing over to the primary surface
    /// first if it is the drawing surface.
    ///
    /// Panics for the primary surface or a handle that isn't registered.
    pub fn destroy_surface(&mut self, handle: SurfaceHandle) {
        self.expect_off_screen(handle, "destroy");
        if self.active == handle {
            self.active = SurfaceHandle::PRIMARY;
        }
        self.surfaces.remove(&handle);
        log::debug!("destroyed {handle}");
    }

    fn expect_off_screen(&self, handle: SurfaceHandle, action: &str) {
        assert!(handle != SurfaceHandle::PRIMARY, "cannot {action} the primary surface");
        assert!(self.contains(handle), "{action} of unknown {handle}");
    }

    /// Reallocate the primary surface at a new size.
    ///
    /// On failure the old primary surface is kept.
    pub fn resize_primary(&mut self, width: u32, height: u32) -> Result<()> {
        let buffer = PixelBuffer::new(width, height, self.bits_per_pixel)?;
        self.surfaces.insert(SurfaceHandle::PRIMARY, buffer);
        Ok(())
    }

    pub fn active(&self) -> SurfaceHandle {
        self.active
    }

    pub fn is_primary_active(&self) -> bool {
        self.active == SurfaceHandle::PRIMARY
    }

    pub fn contains(&self, handle: SurfaceHandle) -> bool {
        self.surfaces.contains_key(&handle)
    }

    /// Number of registered surfaces, primary included
    pub fn count(&self) -> usize {
        self.surfaces.len()
    }

    /// Buffer behind `handle`; panics if it isn't registered
    pub fn surface(&self, handle: SurfaceHandle) -> &PixelBuffer {
        match self.surfaces.get(&handle) {
            Some(buffer) => buffer,
            None => panic!("unknown {handle}"),
        }
    }

    pub fn surface_mut(&mut self, handle: SurfaceHandle) -> &mut PixelBuffer {
        match self.surfaces.get_mut(&handle) {
            Some(buffer) => buffer,
            None => panic!("unknown {handle}"),
        }
    }

    pub fn primary(&self) -> &PixelBuffer {
        self.surface(SurfaceHandle::PRIMARY)
    }

    pub fn primary_mut(&mut self) -> &mut PixelBuffer {
        self.surface_mut(SurfaceHandle::PRIMARY)
    }

    /// The current drawing surface
    pub fn active_surface(&self) -> &PixelBuffer {
        self.surface(self.active)
    }

    pub fn active_surface_mut(&mut self) -> &mut PixelBuffer {
        self.surface_mut(self.active)
    }
}
