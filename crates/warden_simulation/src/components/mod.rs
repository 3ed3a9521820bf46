//! ECS Components для sentry entity
//!
//! Организация по доменам:
//! - movement: navigation handoff и motion output (NavigationAgent, MotionOutput)
//! - audio: ambient audio source (AmbientAudio)

pub mod audio;
pub mod movement;

// Re-exports для удобного импорта
pub use audio::*;
pub use movement::*;
