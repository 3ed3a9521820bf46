//! Ошибки конфигурации sentry
//!
//! Единственная ошибка, которая выходит наружу из AI: фатальная конфигурация
//! на этапе сборки агента. Stale timer callbacks и переходы в текущий state
//! обрабатываются локально внутри state machine и ошибками не являются.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("sentry has no navigation capability")]
    MissingNavigation,

    #[error("sentry has no ambient audio capability")]
    MissingAudio,

    #[error("config field `{field}` must be finite and non-negative, got {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("patrol point {index} is not finite: {point:?}")]
    InvalidPatrolPoint { index: usize, point: [f32; 3] },

    #[error("malformed AI config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
