pub mod adjust;
pub mod buffer;
pub mod equalize;
pub mod loader;
pub mod resize;
