//! Sentry AI: Patrol / Investigate / Chase
//!
//! Ядро (`state_machine`, `steering`, `deferred`) = чистая логика без ECS,
//! общается с миром через `ports`. ECS glue: `systems` + `AIPlugin`.

use bevy::prelude::*;

pub mod builder;
pub mod components;
pub mod deferred;
pub mod events;
pub mod perception;
pub mod ports;
pub mod state_machine;
pub mod steering;
pub mod systems;

#[cfg(test)]
mod perception_tests;

// Re-export основных типов
pub use builder::{spawn_sentry, SentryBuilder, SentryBundle};
pub use components::{AIConfig, AIState, PatrolRoute};
pub use deferred::{DeferredAction, DeferredTimers, TimerHandle};
pub use events::{NoiseMade, SightEvent};
pub use perception::{NoiseEmitter, NoiseListener, PerceptionRegistry};
pub use ports::{AmbientAudioPort, NavigationPort};
pub use state_machine::{BehaviorStateMachine, SentryContext};

/// Фазы AI внутри одного fixed step
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AISet {
    /// Отложенный старт патруля
    Setup,
    /// Sight, потом noise
    Perception,
    /// Deferred timers
    Deferred,
    /// Behavior tick → MotionOutput
    Behavior,
}

/// AI Plugin
///
/// Registry upkeep идёт в PreUpdate каждый кадр: `RemovedComponents` живут
/// два кадра, а fixed step может не выпасть ни на один из них.
///
/// Остальное в FixedUpdate для детерминизма. Порядок выполнения:
/// 1. setup_patrol_on_spawn: первый тик после спавна
/// 2. react_to_sight → react_to_noise
/// 3. advance_deferred_timers
/// 4. tick_sentries: dispatch по state + steering
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NoiseMade>()
            .add_event::<SightEvent>()
            .init_resource::<PerceptionRegistry>()
            .configure_sets(
                FixedUpdate,
                (AISet::Setup, AISet::Perception, AISet::Deferred, AISet::Behavior).chain(),
            )
            .add_systems(
                PreUpdate,
                (
                    perception::unsubscribe_noise_listeners,
                    perception::subscribe_noise_listeners,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                systems::setup_patrol_on_spawn.in_set(AISet::Setup),
            )
            .add_systems(
                FixedUpdate,
                (systems::react_to_sight, systems::react_to_noise)
                    .chain()
                    .in_set(AISet::Perception),
            )
            .add_systems(
                FixedUpdate,
                systems::advance_deferred_timers.in_set(AISet::Deferred),
            )
            .add_systems(FixedUpdate, systems::tick_sentries.in_set(AISet::Behavior));
    }
}
