//! Handler implementations

pub mod memory;
pub mod stream;

#[cfg(feature = "file")]
pub mod rotating_file;

pub use memory::MemoryHandler;
pub use stream::StreamHandler;

#[cfg(feature = "file")]
pub use rotating_file::{RotationWhen, TimeRotatingFileHandler};

pub use crate::core::Handler;
