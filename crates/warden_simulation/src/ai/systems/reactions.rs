//! AI reaction systems (sight, noise).

use bevy::prelude::*;

use super::fsm::SentryQueryData;
use crate::ai::events::{NoiseMade, SightEvent};
use crate::ai::perception::PerceptionRegistry;
use crate::ai::state_machine::SentryContext;

/// System: vision события → FSM
///
/// События адресные (observer). Observer без FSM (despawned) пропускаем.
pub fn react_to_sight(
    mut sight_events: EventReader<SightEvent>,
    mut sentries: Query<SentryQueryData>,
) {
    for event in sight_events.read() {
        let Ok((entity, mut brain, config, route, mut navigation, mut audio)) =
            sentries.get_mut(event.observer())
        else {
            continue;
        };

        let mut ctx = SentryContext {
            entity,
            config,
            route,
            navigation: &mut *navigation,
            audio: &mut *audio,
        };

        match *event {
            SightEvent::TargetDetected { target, .. } => brain.on_target_detected(target, &mut ctx),
            SightEvent::TargetLost { .. } => {
                brain.on_target_lost(&mut ctx);
            }
        }
    }
}

/// System: шум → всем подписанным слушателям
///
/// Проверку дистанции делает FSM слушателя (у каждого свой hearing_range).
pub fn react_to_noise(
    mut noise_events: EventReader<NoiseMade>,
    registry: Res<PerceptionRegistry>,
    mut sentries: Query<(SentryQueryData, &Transform)>,
) {
    for noise in noise_events.read() {
        for &listener in registry.listeners() {
            let Ok(((entity, mut brain, config, route, mut navigation, mut audio), transform)) =
                sentries.get_mut(listener)
            else {
                continue;
            };

            let mut ctx = SentryContext {
                entity,
                config,
                route,
                navigation: &mut *navigation,
                audio: &mut *audio,
            };
            brain.on_noise_heard(transform.translation, noise.position, noise.volume, &mut ctx);
        }
    }
}
