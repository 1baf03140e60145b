pub mod engine;
pub mod state;

pub use engine::{SlideshowEngine, Timing};
pub use state::{Mode, Phase};
