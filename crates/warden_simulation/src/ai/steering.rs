//! Path-following steering
//!
//! Чистые функции: позиция + следующий waypoint + скорость → velocity и yaw.
//! Агент никогда не наклоняется, поворот только вокруг Y.
//!
//! Поворот: lerp угла с весом `TURN_GAIN * delta` за тик (не constant-rate turn).
//! Вес зависит от частоты тиков.

use bevy::prelude::*;
use std::f32::consts::TAU;

/// Ниже этого length_squared velocity facing не обновляется (anti-jitter)
pub const FACING_DEAD_ZONE_SQ: f32 = 0.1;

/// Angular gain за секунду для lerp угла
pub const TURN_GAIN: f32 = 5.0;

/// Результат steering за один тик
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringOutput {
    pub velocity: Vec3,
    /// Rotation вокруг Y (радианы)
    pub yaw: f32,
}

/// `normalize(next - current) * speed`, ноль если точки совпадают
pub fn desired_velocity(current: Vec3, next_waypoint: Vec3, speed: f32) -> Vec3 {
    (next_waypoint - current).normalize_or_zero() * speed
}

/// Целевой yaw для velocity (только XZ компоненты)
///
/// `None` внутри dead zone.
pub fn facing_for(velocity: Vec3) -> Option<f32> {
    if velocity.length_squared() <= FACING_DEAD_ZONE_SQ {
        return None;
    }

    let look = Vec3::new(velocity.x, 0.0, velocity.z).normalize_or_zero();
    Some(look.x.atan2(look.z))
}

/// Angle-aware lerp: идём по кратчайшей дуге
pub fn lerp_angle(from: f32, to: f32, weight: f32) -> f32 {
    let difference = (to - from) % TAU;
    let distance = (2.0 * difference) % TAU - difference;
    from + distance * weight
}

/// Один тик steering
pub fn steer(current: Vec3, next_waypoint: Vec3, speed: f32, yaw: f32, delta: f32) -> SteeringOutput {
    let velocity = desired_velocity(current, next_waypoint, speed);

    let yaw = match facing_for(velocity) {
        Some(target) => lerp_angle(yaw, target, TURN_GAIN * delta),
        None => yaw,
    };

    SteeringOutput { velocity, yaw }
}
