//! CLI commands module.

mod combine;
mod config;
mod info;
mod render;
mod synth;
mod util;
mod voices;

pub use combine::CombineCommand;
pub use config::ConfigCommand;
pub use info::InfoCommand;
pub use render::RenderCommand;
pub use synth::SynthCommand;
pub use voices::VoicesCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
