//! Sentry spawn builder
//!
//! Собирает все компоненты агента и валидирует конфигурацию до спавна:
//! агент без navigation / audio или с битым конфигом не спавнится вообще.

use bevy::prelude::*;

use super::components::{AIConfig, PatrolRoute};
use super::perception::NoiseListener;
use super::state_machine::BehaviorStateMachine;
use crate::components::{AmbientAudio, MotionOutput, NavigationAgent};
use crate::error::{ConfigResult, ConfigurationError};

/// Полный набор компонентов sentry
#[derive(Bundle)]
pub struct SentryBundle {
    pub brain: BehaviorStateMachine,
    pub config: AIConfig,
    pub route: PatrolRoute,
    pub navigation: NavigationAgent,
    pub audio: AmbientAudio,
    pub motion: MotionOutput,
    pub listener: NoiseListener,
    pub transform: Transform,
}

/// Builder sentry агента
///
/// ```
/// use bevy::prelude::Vec3;
/// use warden_simulation::ai::{AIConfig, SentryBuilder};
///
/// let bundle = SentryBuilder::new(AIConfig::default())
///     .at(Vec3::ZERO)
///     .patrol_points([Vec3::X * 10.0, Vec3::Z * 10.0])
///     .with_default_navigation()
///     .with_audio(warden_simulation::components::AmbientAudio::with_stream())
///     .build();
/// assert!(bundle.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SentryBuilder {
    config: AIConfig,
    position: Vec3,
    yaw: f32,
    route: PatrolRoute,
    navigation: Option<NavigationAgent>,
    audio: Option<AmbientAudio>,
}

impl SentryBuilder {
    pub fn new(config: AIConfig) -> Self {
        Self {
            config,
            position: Vec3::ZERO,
            yaw: 0.0,
            route: PatrolRoute::default(),
            navigation: None,
            audio: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Начальный facing (rotation вокруг Y, радианы)
    pub fn facing(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn patrol_points(mut self, points: impl IntoIterator<Item = Vec3>) -> Self {
        self.route = PatrolRoute::new(points);
        self
    }

    pub fn with_navigation(mut self, navigation: NavigationAgent) -> Self {
        self.navigation = Some(navigation);
        self
    }

    /// NavigationAgent с порогами из конфига
    pub fn with_default_navigation(mut self) -> Self {
        self.navigation = Some(NavigationAgent::new(
            self.config.target_reached_threshold,
            self.config.path_desired_distance,
        ));
        self
    }

    pub fn with_audio(mut self, audio: AmbientAudio) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Валидирует и собирает bundle
    pub fn build(self) -> ConfigResult<SentryBundle> {
        self.config.validate()?;
        self.route.validate()?;
        let navigation = self.navigation.ok_or(ConfigurationError::MissingNavigation)?;
        let audio = self.audio.ok_or(ConfigurationError::MissingAudio)?;

        Ok(SentryBundle {
            brain: BehaviorStateMachine::new(),
            config: self.config,
            route: self.route,
            navigation,
            audio,
            motion: MotionOutput::facing(self.yaw),
            listener: NoiseListener,
            transform: Transform::from_translation(self.position)
                .with_rotation(Quat::from_rotation_y(self.yaw)),
        })
    }
}

/// Спавн sentry (ошибка конфигурации → ничего не спавнится)
pub fn spawn_sentry(commands: &mut Commands, builder: SentryBuilder) -> ConfigResult<Entity> {
    match builder.build() {
        Ok(bundle) => {
            let entity = commands.spawn(bundle).id();
            crate::log_info(&format!("🛡️ Spawned sentry {:?}", entity));
            Ok(entity)
        }
        Err(err) => {
            crate::log_error(&format!("Sentry spawn rejected: {}", err));
            Err(err)
        }
    }
}
