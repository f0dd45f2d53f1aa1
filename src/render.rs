mod frame;
pub use frame::*;

pub mod font;
pub mod sink;

/// Output sinks a board can flush frames to.
pub mod sinks {
    pub mod memory;
    pub mod null;
    /// Greyscale PNG preview written to disk
    pub mod png;
}
