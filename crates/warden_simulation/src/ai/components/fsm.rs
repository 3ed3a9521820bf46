//! FSM AI components (state enum, config, patrol route).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConfigResult, ConfigurationError};

/// Сколько стоим на точке расследования перед возвратом в патруль (секунды)
pub const INVESTIGATE_WAIT_SECS: f32 = 3.0;

/// Grace period после потери цели из виду (секунды)
pub const LOST_SIGHT_GRACE_SECS: f32 = 5.0;

/// AI FSM состояния
///
/// Закрытый набор: добавление state = compile error во всех `match`.
/// Терминального состояния нет, FSM живёт столько же, сколько агент.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum AIState {
    /// Patrol: обход patrol points по кругу (начальное состояние)
    #[default]
    Patrol,

    /// Investigate: идём к источнику шума / последней известной позиции цели
    Investigate,

    /// Chase: преследование видимой цели
    Chase,
}

impl fmt::Display for AIState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AIState::Patrol => "Patrol",
            AIState::Investigate => "Investigate",
            AIState::Chase => "Chase",
        };
        f.write_str(name)
    }
}

/// Параметры sentry AI
///
/// Задаются при спавне, после этого не меняются.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Радиус слышимости шума (метры)
    pub hearing_range: f32,
    /// Скорость патруля / расследования (m/s)
    pub patrol_speed: f32,
    /// Скорость преследования (m/s)
    pub chase_speed: f32,
    /// Пауза на каждой patrol point (секунды)
    pub patrol_wait_time: f32,
    /// Дистанция, на которой навигация считается завершённой (метры)
    pub target_reached_threshold: f32,
    /// Дистанция переключения на следующий waypoint пути (метры)
    pub path_desired_distance: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            hearing_range: 15.0,
            patrol_speed: 2.0,
            chase_speed: 4.5,
            patrol_wait_time: 1.0,
            target_reached_threshold: 1.5,
            path_desired_distance: 1.0,
        }
    }
}

impl AIConfig {
    /// Загрузка из JSON (отсутствующие поля → default)
    pub fn from_json(source: &str) -> ConfigResult<Self> {
        let config: AIConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Все поля должны быть finite и >= 0
    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("hearing_range", self.hearing_range),
            ("patrol_speed", self.patrol_speed),
            ("chase_speed", self.chase_speed),
            ("patrol_wait_time", self.patrol_wait_time),
            ("target_reached_threshold", self.target_reached_threshold),
            ("path_desired_distance", self.path_desired_distance),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidValue { field, value });
            }
        }

        Ok(())
    }

    /// Скорость движения для текущего state
    pub fn speed_for(&self, state: AIState) -> f32 {
        match state {
            AIState::Chase => self.chase_speed,
            AIState::Patrol | AIState::Investigate => self.patrol_speed,
        }
    }
}

/// Упорядоченный список patrol points (world coordinates)
///
/// Пустой маршрут допустим: Patrol тогда = стоять на месте.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    points: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(points: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Следующий индекс по кругу (None для пустого маршрута)
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if self.points.is_empty() {
            None
        } else {
            Some((index + 1) % self.points.len())
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (index, point) in self.points.iter().enumerate() {
            if !point.is_finite() {
                return Err(ConfigurationError::InvalidPatrolPoint {
                    index,
                    point: point.to_array(),
                });
            }
        }
        Ok(())
    }
}
