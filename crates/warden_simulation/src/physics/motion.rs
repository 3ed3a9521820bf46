//! MotionOutput → Transform / Rapier
//!
//! Архитектура:
//! - FSM только пишет MotionOutput (velocity + yaw), сама ничего не двигает
//! - Без Rapier body: интегрируем velocity в Transform напрямую (headless)
//! - С Rapier body (`Velocity`): отдаём linvel Rapier, он двигает тело сам
//!
//! Детерминизм: fixed timestep, после `AISet::Behavior`

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::ai::AISet;
use crate::components::MotionOutput;

/// Система интеграции velocity → Transform (headless режим, без Rapier)
pub fn integrate_motion(
    mut query: Query<(&MotionOutput, &mut Transform), Without<Velocity>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (motion, mut transform) in query.iter_mut() {
        transform.translation += motion.velocity * delta;
        transform.rotation = motion.rotation();
    }
}

/// Система синхронизации MotionOutput → Rapier Velocity
///
/// Rotation kinematic тела выставляем сами (angvel не используем).
pub fn sync_motion_to_rapier(mut query: Query<(&MotionOutput, &mut Velocity, &mut Transform)>) {
    for (motion, mut rapier_velocity, mut transform) in query.iter_mut() {
        rapier_velocity.linvel = motion.velocity;
        transform.rotation = motion.rotation();
    }
}

/// Rapier компоненты для sentry (kinematic capsule)
///
/// Добавляется поверх `SentryBundle`, если в мире есть RapierPhysicsPlugin.
pub fn kinematic_body() -> (RigidBody, Collider, Velocity) {
    (
        RigidBody::KinematicVelocityBased,
        Collider::capsule_y(0.5, 0.4), // Высота 1.0m (0.5 + 0.5), радиус 0.4m
        Velocity::default(),
    )
}

/// Plugin для motion sink
pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (integrate_motion, sync_motion_to_rapier).after(AISet::Behavior),
        );
    }
}
