#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::{
    CounterConfig, FrameConfig, GateConfig, GateMessages, NavigationConfig, ParallaxConfig,
    RevealConfig, SiteConfig, MAX_SESSION_HOURS,
};
