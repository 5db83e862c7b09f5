pub mod cli;
pub mod context;
pub mod convert;
pub mod core;
pub mod error;
pub mod math;
pub mod overlay;
pub mod ppm;
pub mod script;
pub mod traits;

pub use context::{BlitSource, GdiConfig, GdiContext, DESKTOP_SAVE_PIXELS, DST_BPP};
pub use convert::StandardConverter;
pub use error::{GdiError, Result};
pub use traits::{ColorConverter, DrawingPrimitives};
