//! API implementation submodules.
//!
//! Each submodule contains `impl SoundMapper` blocks that extend the public
//! API with domain-specific methods. The struct definition remains in `lib.rs`.

mod builder;
mod catalog;
mod preview;
mod score;
mod state;

pub use builder::SoundMapperBuilder;
pub(crate) use state::MapperState;
