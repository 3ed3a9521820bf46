//! Perception: кто слушает шум и откуда шум берётся
//!
//! `PerceptionRegistry`: явная подписка вместо глобального broadcaster.
//! Подписка привязана к жизни `NoiseListener`: компонент добавился →
//! subscribe, entity despawned (или компонент снят) → unsubscribe.

use bevy::prelude::*;
use rand::Rng;

use super::events::NoiseMade;
use crate::DeterministicRng;

/// Маркер: агент подписан на `NoiseMade`
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct NoiseListener;

/// Реестр подписчиков на шум
///
/// Порядок подписки сохраняется (детерминированный порядок реакций).
#[derive(Resource, Debug, Default)]
pub struct PerceptionRegistry {
    listeners: Vec<Entity>,
}

impl PerceptionRegistry {
    /// Подписать (повторная подписка игнорируется)
    pub fn subscribe(&mut self, entity: Entity) -> bool {
        if self.listeners.contains(&entity) {
            return false;
        }
        self.listeners.push(entity);
        true
    }

    pub fn unsubscribe(&mut self, entity: Entity) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|&listener| listener != entity);
        self.listeners.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.listeners.contains(&entity)
    }

    pub fn listeners(&self) -> &[Entity] {
        &self.listeners
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// System: новые слушатели → registry
pub fn subscribe_noise_listeners(
    added: Query<Entity, Added<NoiseListener>>,
    mut registry: ResMut<PerceptionRegistry>,
) {
    for entity in added.iter() {
        if registry.subscribe(entity) {
            crate::log(&format!("👂 {:?} subscribed to noise", entity));
        }
    }
}

/// System: despawned / снятые слушатели → вон из registry
pub fn unsubscribe_noise_listeners(
    mut removed: RemovedComponents<NoiseListener>,
    mut registry: ResMut<PerceptionRegistry>,
) {
    for entity in removed.read() {
        if registry.unsubscribe(entity) {
            crate::log(&format!("🗑️ {:?} unsubscribed from noise", entity));
        }
    }
}

/// Источник фонового шума (headless stand-in для шагов игрока, падающих
/// предметов и т.п.)
#[derive(Component, Debug, Clone)]
pub struct NoiseEmitter {
    pub interval: Timer,
    /// Разброс позиции шума вокруг источника (XZ)
    pub scatter_radius: f32,
    pub volume: f32,
}

impl NoiseEmitter {
    pub fn new(interval_secs: f32, scatter_radius: f32, volume: f32) -> Self {
        Self {
            interval: Timer::from_seconds(interval_secs, TimerMode::Repeating),
            scatter_radius,
            volume,
        }
    }
}

/// System: источники шумят по таймеру
///
/// Разброс берётся из `DeterministicRng` (одинаковый seed → одинаковые шумы).
pub fn emit_ambient_noise(
    mut emitters: Query<(&mut NoiseEmitter, &Transform)>,
    mut rng: ResMut<DeterministicRng>,
    mut noise_events: EventWriter<NoiseMade>,
    time: Res<Time<Fixed>>,
) {
    for (mut emitter, transform) in emitters.iter_mut() {
        emitter.interval.tick(time.delta());

        for _ in 0..emitter.interval.times_finished_this_tick() {
            let scatter = emitter.scatter_radius.max(0.0);
            let offset = if scatter > 0.0 {
                Vec3::new(
                    rng.rng.gen_range(-scatter..=scatter),
                    0.0,
                    rng.rng.gen_range(-scatter..=scatter),
                )
            } else {
                Vec3::ZERO
            };

            let position = transform.translation + offset;
            crate::log(&format!("📢 Noise at {:?} (volume {:.2})", position, emitter.volume));
            noise_events.write(NoiseMade::new(position, emitter.volume));
        }
    }
}
