//! Audio request компоненты

use bevy::prelude::*;

use crate::ai::ports::AmbientAudioPort;

/// Ambient audio source агента (ECS сторона audio слоя)
///
/// Храним только желаемое состояние. Audio слой хоста синхронизирует
/// реальный player по `is_playing()`.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AmbientAudio {
    playing: bool,
    has_stream: bool,
}

impl AmbientAudio {
    /// Источник с назначенным звуком
    pub fn with_stream() -> Self {
        Self {
            playing: false,
            has_stream: true,
        }
    }

    /// Источник без звука (запросы принимаются, но на спавне не стартуем)
    pub fn silent() -> Self {
        Self::default()
    }
}

impl AmbientAudioPort for AmbientAudio {
    fn play_ambient(&mut self) {
        self.playing = true;
    }

    fn stop_ambient(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn has_stream(&self) -> bool {
        self.has_stream
    }
}
