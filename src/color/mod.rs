//! Color value type and palettes

pub mod rgb;
pub mod palette;

pub use rgb::Rgb;
pub use palette::Palette;
