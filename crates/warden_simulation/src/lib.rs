//! Warden Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: sentry AI (Patrol / Investigate / Chase)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = решения (FSM, perception, deferred timers)
//! - Host (Godot или headless stand-in) = pathfinding, физика, audio
//! - Граница: NavigationAgent / AmbientAudio / MotionOutput компоненты

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod components;
pub mod error;
pub mod logger;
pub mod navigation;
pub mod physics;

// Re-export базовых компонентов для удобства
pub use ai::{
    spawn_sentry, AIConfig, AIPlugin, AISet, AIState, BehaviorStateMachine, NoiseEmitter, NoiseMade,
    PatrolRoute, PerceptionRegistry, SentryBuilder, SightEvent,
};
pub use components::*;
pub use error::{ConfigResult, ConfigurationError};
pub use navigation::HeadlessNavigationPlugin;
pub use physics::MotionPlugin;

// Logger API на уровне crate (crate::log и т.д.)
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, set_logger_if_needed,
    LogLevel, LogPrinter,
};

/// Fixed timestep симуляции (60Hz)
pub const FIXED_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed мог поставить хост (create_headless_app), не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .add_plugins((AIPlugin, MotionPlugin, HeadlessNavigationPlugin))
            .add_systems(
                FixedUpdate,
                ai::perception::emit_ambient_noise.before(AISet::Perception),
            );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт headless Bevy App с полной симуляцией
///
/// Время ручное: каждый `app.update()` = ровно один fixed тик (1/60s).
/// Первый update только инициализирует часы, fixed step в нём не запускается.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let step = Duration::from_secs_f64(1.0 / FIXED_HZ);
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .add_plugins(SimulationPlugin)
        // После SimulationPlugin: тот же step, что и у ManualDuration
        .insert_resource(Time::<Fixed>::from_duration(step));

    app
}

/// Состояние одного sentry для сравнения прогонов / вывода
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentrySnapshot {
    pub entity: u32,
    pub state: AIState,
    pub patrol_index: usize,
    pub is_waiting: bool,
    pub position: [f32; 3],
    pub yaw: f32,
    pub active_target: Option<u32>,
}

/// Snapshot всех sentry (отсортирован по Entity index для детерминизма)
pub fn sentry_snapshot(world: &mut World) -> Vec<SentrySnapshot> {
    let mut query = world.query::<(Entity, &BehaviorStateMachine, &Transform, &MotionOutput)>();

    let mut snapshots: Vec<_> = query
        .iter(world)
        .map(|(entity, brain, transform, motion)| SentrySnapshot {
            entity: entity.index(),
            state: brain.state(),
            patrol_index: brain.patrol_index(),
            is_waiting: brain.is_waiting(),
            position: transform.translation.to_array(),
            yaw: motion.yaw,
            active_target: brain.active_target().map(|target| target.index()),
        })
        .collect();

    snapshots.sort_by_key(|snapshot| snapshot.entity);
    snapshots
}
