// Adapters layer: concrete host capabilities (frame clock, visibility feed, storage, surfaces).

pub mod frames;
pub mod memory;
pub mod observer;
pub mod terminal;

pub use frames::TokioFrameClock;
pub use memory::{MemorySessionStore, MemorySurface};
pub use observer::{visibility_channel, ChannelObserver, VisibilityFeed};
pub use terminal::TerminalSurface;
