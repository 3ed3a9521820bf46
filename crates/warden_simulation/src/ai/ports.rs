//! Capability ports: через них FSM говорит с внешними слоями
//!
//! ECS реализации (`NavigationAgent`, `AmbientAudio`) лежат в `components`,
//! тестовые лежат прямо в тестах.

use bevy::prelude::*;

/// Внешний path planner
///
/// FSM только ставит цель и читает результат, сам путь не считает.
pub trait NavigationPort {
    /// Новая цель навигации (сбрасывает "finished", если цель действительно новая)
    fn set_target(&mut self, target: Vec3);

    /// Следующая точка пути к текущей цели
    fn next_waypoint(&self) -> Vec3;

    /// Достигли цели (или цели нет)
    fn is_finished(&self) -> bool;
}

/// Ambient audio (патрульное "напевание")
///
/// Запросы идемпотентны: play при уже играющем звуке ничего не меняет.
pub trait AmbientAudioPort {
    fn play_ambient(&mut self);

    fn stop_ambient(&mut self);

    fn is_playing(&self) -> bool;

    /// Есть ли вообще звук для проигрывания (без stream старт на спавне пропускается)
    fn has_stream(&self) -> bool {
        true
    }
}
