pub mod converter;
pub mod primitives;

pub use converter::*;
pub use primitives::*;
