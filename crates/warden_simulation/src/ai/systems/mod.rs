//! AI systems (ECS glue вокруг BehaviorStateMachine)

pub mod fsm;
pub mod reactions;

// Re-export all systems
pub use fsm::*;
pub use reactions::*;
