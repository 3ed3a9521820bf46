//! Movement компоненты: navigation handoff и motion output

use bevy::prelude::*;

use crate::ai::ports::NavigationPort;

const SAME_TARGET_EPSILON: f32 = 1e-4;

/// Навигационный агент (ECS сторона внешнего path planner)
///
/// Архитектура:
/// - FSM пишет target через `NavigationPort::set_target`
/// - внешний planner (Godot NavigationAgent3D, headless stand-in) читает
///   `target_revision`, считает путь и отдаёт `report_progress`
/// - FSM читает `next_waypoint` / `is_finished` каждый тик
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavigationAgent {
    target_position: Option<Vec3>,
    next_waypoint: Vec3,
    finished: bool,
    /// Растёт на каждый `set_target` (planner видит смену цели)
    target_revision: u64,
    /// Дистанция до цели, на которой навигация считается завершённой
    pub target_desired_distance: f32,
    /// Дистанция переключения на следующий waypoint (для последнего
    /// waypoint пути тоже завершает навигацию)
    pub path_desired_distance: f32,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self {
            target_position: None,
            next_waypoint: Vec3::ZERO,
            // Без цели навигация "завершена"
            finished: true,
            target_revision: 0,
            target_desired_distance: 1.0,
            path_desired_distance: 1.0,
        }
    }
}

impl NavigationAgent {
    pub fn new(target_desired_distance: f32, path_desired_distance: f32) -> Self {
        Self {
            target_desired_distance,
            path_desired_distance,
            ..Default::default()
        }
    }

    pub fn target_position(&self) -> Option<Vec3> {
        self.target_position
    }

    pub fn target_revision(&self) -> u64 {
        self.target_revision
    }

    /// Planner → ECS: следующий waypoint и флаг завершения
    pub fn report_progress(&mut self, next_waypoint: Vec3, finished: bool) {
        self.next_waypoint = next_waypoint;
        self.finished = finished;
    }
}

impl NavigationPort for NavigationAgent {
    fn set_target(&mut self, target: Vec3) {
        // Повторная та же цель не сбрасывает путь (Chase шлёт её каждый тик)
        if self
            .target_position
            .is_some_and(|current| current.abs_diff_eq(target, SAME_TARGET_EPSILON))
        {
            return;
        }

        self.target_position = Some(target);
        // До первого ответа planner идём по прямой
        self.next_waypoint = target;
        self.finished = false;
        self.target_revision = self.target_revision.wrapping_add(1);
    }

    fn next_waypoint(&self) -> Vec3 {
        self.next_waypoint
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Motion output за тик (motion sink для внешнего integrator)
///
/// velocity = 0 когда навигация завершена или агент ждёт.
/// `yaw` сохраняется между тиками: steering плавно доворачивает от него.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MotionOutput {
    pub velocity: Vec3,
    /// Rotation вокруг Y (радианы)
    pub yaw: f32,
}

impl MotionOutput {
    pub fn facing(yaw: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            yaw,
        }
    }

    /// Стоп без изменения facing
    pub fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}
