//! Headless navigation stand-in
//!
//! В игре путь считает внешний planner (Godot NavigationAgent3D) и отдаёт
//! результат через `NavigationAgent::report_progress`. Для headless
//! симуляции и тестов: прямая линия до цели, без препятствий.

use bevy::prelude::*;

use crate::ai::NavigationPort;
use crate::components::NavigationAgent;
use crate::physics::integrate_motion;

/// System: waypoint = цель, finished по дистанции (XZ) до цели
///
/// Путь из одной точки (сама цель). Как у NavigationAgent3D, навигация
/// завершена, когда цель ближе `target_desired_distance` или последний
/// waypoint ближе `path_desired_distance`.
///
/// Запускается после интеграции движения: FSM видит результат на следующем тике.
pub fn advance_headless_navigation(mut agents: Query<(Entity, &mut NavigationAgent, &Transform)>) {
    for (entity, mut agent, transform) in agents.iter_mut() {
        let Some(target) = agent.target_position() else {
            continue;
        };

        let offset = target - transform.translation;
        let distance = Vec2::new(offset.x, offset.z).length();
        let finished = distance <= agent.target_desired_distance
            || distance <= agent.path_desired_distance;

        if finished && !agent.is_finished() {
            crate::log(&format!(
                "🧭 {:?} reached navigation target {:?} (distance {:.2}m)",
                entity, target, distance
            ));
        }
        agent.report_progress(target, finished);
    }
}

/// Plugin headless навигации (не подключать вместе с реальным planner)
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            advance_headless_navigation.after(integrate_motion),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigation_app() -> App {
        let mut app = App::new();
        app.add_systems(Update, advance_headless_navigation);
        app
    }

    #[test]
    fn test_agent_without_target_stays_finished() {
        let mut app = navigation_app();
        let entity = app
            .world_mut()
            .spawn((NavigationAgent::default(), Transform::default()))
            .id();

        app.update();

        let agent = app.world().get::<NavigationAgent>(entity).expect("agent");
        assert!(agent.is_finished());
    }

    #[test]
    fn test_finishes_within_target_distance() {
        let mut app = navigation_app();
        let mut agent = NavigationAgent::new(1.5, 1.0);
        agent.set_target(Vec3::new(10.0, 0.0, 0.0));
        let entity = app
            .world_mut()
            .spawn((agent, Transform::from_xyz(5.0, 0.0, 0.0)))
            .id();

        app.update();
        let agent = app.world().get::<NavigationAgent>(entity).expect("agent");
        assert!(!agent.is_finished());
        assert_eq!(agent.next_waypoint(), Vec3::new(10.0, 0.0, 0.0));

        // Высота не считается: капсула стоит выше точки маршрута
        app.world_mut()
            .entity_mut(entity)
            .insert(Transform::from_xyz(8.6, 0.9, 0.0));
        app.update();
        let agent = app.world().get::<NavigationAgent>(entity).expect("agent");
        assert!(agent.is_finished());
    }

    #[test]
    fn test_last_waypoint_within_path_distance_finishes() {
        let mut app = navigation_app();
        let mut agent = NavigationAgent::new(0.5, 2.0);
        agent.set_target(Vec3::new(10.0, 0.0, 0.0));
        let entity = app
            .world_mut()
            .spawn((agent, Transform::from_xyz(7.0, 0.0, 0.0)))
            .id();

        app.update();
        assert!(!app.world().get::<NavigationAgent>(entity).expect("agent").is_finished());

        // 1.8m: target_desired_distance ещё не достигнута, waypoint уже да
        app.world_mut()
            .entity_mut(entity)
            .insert(Transform::from_xyz(8.2, 0.0, 0.0));
        app.update();
        assert!(app.world().get::<NavigationAgent>(entity).expect("agent").is_finished());
    }
}
