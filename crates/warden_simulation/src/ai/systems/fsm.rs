//! Sentry FSM systems: spawn setup, deferred timers, behavior tick

use bevy::prelude::*;

use crate::ai::components::{AIConfig, PatrolRoute};
use crate::ai::state_machine::{BehaviorStateMachine, SentryContext};
use crate::components::{AmbientAudio, MotionOutput, NavigationAgent};

/// Общие компоненты sentry, нужные FSM для SentryContext
pub type SentryQueryData = (
    Entity,
    &'static mut BehaviorStateMachine,
    &'static AIConfig,
    &'static PatrolRoute,
    &'static mut NavigationAgent,
    &'static mut AmbientAudio,
);

/// System: отложенный старт патруля
///
/// Выполняется на первом fixed тике после спавна (а не в момент spawn),
/// чтобы navigation/audio уже были на месте.
pub fn setup_patrol_on_spawn(mut sentries: Query<SentryQueryData>) {
    for (entity, mut brain, config, route, mut navigation, mut audio) in sentries.iter_mut() {
        if brain.is_ready() {
            continue;
        }

        let mut ctx = SentryContext {
            entity,
            config,
            route,
            navigation: &mut *navigation,
            audio: &mut *audio,
        };
        brain.ready(&mut ctx);
        crate::log(&format!(
            "Enemy {:?}: ready, patrolling {} points",
            entity,
            route.len()
        ));
    }
}

/// System: продвигаем отложенные действия (resume patrol, end investigation, grace)
pub fn advance_deferred_timers(mut sentries: Query<SentryQueryData>, time: Res<Time<Fixed>>) {
    let delta = time.delta();

    for (entity, mut brain, config, route, mut navigation, mut audio) in sentries.iter_mut() {
        if brain.timers().is_empty() {
            continue;
        }

        let mut ctx = SentryContext {
            entity,
            config,
            route,
            navigation: &mut *navigation,
            audio: &mut *audio,
        };
        brain.advance_timers(delta, &mut ctx);
    }
}

/// System: behavior tick (state dispatch + steering → MotionOutput)
///
/// `active_target` резолвится через `targets` каждый тик: нет Transform →
/// цель считается потерянной.
pub fn tick_sentries(
    mut sentries: Query<(SentryQueryData, &Transform, &mut MotionOutput)>,
    targets: Query<&Transform>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta();
    let locate = |target: Entity| targets.get(target).ok().map(|transform| transform.translation);

    for ((entity, mut brain, config, route, mut navigation, mut audio), transform, mut motion) in
        sentries.iter_mut()
    {
        let mut ctx = SentryContext {
            entity,
            config,
            route,
            navigation: &mut *navigation,
            audio: &mut *audio,
        };
        brain.update(transform.translation, delta, locate, &mut motion, &mut ctx);
    }
}
