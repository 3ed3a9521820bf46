//! AI Events: perception → FSM
//!
//! Хост (vision cone, звук шагов, scripted сцены) пишет события,
//! AI системы читают их в `AISet::Perception`.

use bevy::prelude::*;

/// Шум в мире (broadcast всем подписанным слушателям)
///
/// Слушатель сам решает, слышно ли: сравнивает дистанцию со своим
/// `hearing_range`. `volume` пока только логируется.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NoiseMade {
    pub position: Vec3,
    pub volume: f32,
}

impl NoiseMade {
    pub fn new(position: Vec3, volume: f32) -> Self {
        Self { position, volume }
    }
}

/// Vision события (адресные: у каждого наблюдателя свой vision cone)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightEvent {
    /// Цель вошла в поле зрения
    TargetDetected {
        /// Entity наблюдателя
        observer: Entity,
        /// Entity цели (non-owning, может исчезнуть)
        target: Entity,
    },

    /// Цель вышла из поля зрения
    TargetLost {
        /// Entity наблюдателя
        observer: Entity,
    },
}

impl SightEvent {
    pub fn observer(&self) -> Entity {
        match self {
            SightEvent::TargetDetected { observer, .. } | SightEvent::TargetLost { observer } => {
                *observer
            }
        }
    }
}
