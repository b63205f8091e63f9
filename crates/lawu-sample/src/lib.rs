//! Lawu-Sample: generated Vulkan structure wrappers
//!
//! `build.rs` runs lawu-weld over [`sys`] as configured in `lawu.toml` and
//! writes the wrappers into `OUT_DIR`; [`vk`] mounts them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lawu_runtime::{Arena, Structure};
//! use lawu_sample::vk::Extent2d;
//!
//! let arena = Arena::new();
//! let raw = Extent2d { width: 640, height: 480 }.as_raw(&arena)?;
//! assert_eq!(lawu_sample::vk::Extent2dNative::new(raw).width(), 640);
//! ```

pub mod sys;
pub mod uuid;

mod chain;

/// Generated wrapper types
pub mod vk {
    include!(concat!(env!("OUT_DIR"), "/vk/mod.rs"));
}

pub use uuid::PipelineCacheUuid;
