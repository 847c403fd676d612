pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SiteConfig;

pub use adapters::{MemorySessionStore, MemorySurface, TokioFrameClock};
pub use crate::core::{
    counter::{CancelToken, CounterHandle, TimedCounter},
    counter_trigger::CounterTrigger,
    gate::{AccessGuard, PasswordGate},
    navigation::Navigator,
    parallax::Parallax,
    reveal::RevealController,
};
pub use utils::error::{Result, SiteError};
