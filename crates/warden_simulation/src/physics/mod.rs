//! Physics glue: motion sink
//!
//! FSM → MotionOutput → Transform (headless) или Rapier Velocity.

pub mod motion;

// Re-export основных типов
pub use motion::{integrate_motion, kinematic_body, sync_motion_to_rapier, MotionPlugin};
