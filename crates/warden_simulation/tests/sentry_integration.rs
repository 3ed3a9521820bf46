//! Sentry integration test
//!
//! Полный headless App (SimulationPlugin): спавн через builder, perception
//! события, deferred timers, headless навигация и motion.
//!
//! Проверяем:
//! - Патруль доходит до точки, ждёт и идёт к следующей
//! - Шум → Investigate → обратно в Patrol
//! - Sight / grace period поток
//! - Registry отписывает despawned слушателей

use bevy::prelude::*;
use warden_simulation::ai::AmbientAudioPort;
use warden_simulation::*;

/// Тиков в секунде (create_headless_app: один update = один fixed тик)
const TPS: usize = 60;

/// Helper: прогнать N updates
fn run(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

/// Helper: spawn sentry через builder (default config)
fn spawn_test_sentry(app: &mut App, position: Vec3, points: &[Vec3]) -> Entity {
    let bundle = SentryBuilder::new(AIConfig::default())
        .at(position)
        .patrol_points(points.iter().copied())
        .with_default_navigation()
        .with_audio(AmbientAudio::with_stream())
        .build()
        .expect("valid sentry");
    app.world_mut().spawn(bundle).id()
}

fn brain(app: &App, sentry: Entity) -> &BehaviorStateMachine {
    app.world().get::<BehaviorStateMachine>(sentry).expect("sentry brain")
}

fn navigation(app: &App, sentry: Entity) -> &NavigationAgent {
    app.world().get::<NavigationAgent>(sentry).expect("sentry navigation")
}

fn position(app: &App, sentry: Entity) -> Vec3 {
    app.world().get::<Transform>(sentry).expect("sentry transform").translation
}

/// Sentry в Chase за неподвижной целью рядом
fn chasing_app() -> (App, Entity, Entity) {
    let mut app = create_headless_app(42);
    let sentry = spawn_test_sentry(&mut app, Vec3::ZERO, &[Vec3::new(-10.0, 0.0, 0.0)]);
    let target = app.world_mut().spawn(Transform::from_xyz(5.0, 0.0, 5.0)).id();
    run(&mut app, 5);

    app.world_mut().send_event(SightEvent::TargetDetected {
        observer: sentry,
        target,
    });
    run(&mut app, 10);

    assert_eq!(brain(&app, sentry).state(), AIState::Chase);
    assert_eq!(brain(&app, sentry).active_target(), Some(target));
    (app, sentry, target)
}

#[test]
fn test_sentry_starts_patrol_on_first_tick() {
    let mut app = create_headless_app(42);
    let sentry = spawn_test_sentry(&mut app, Vec3::ZERO, &[Vec3::new(10.0, 0.0, 0.0)]);

    // Первый update только запускает часы
    run(&mut app, 2);

    let brain = brain(&app, sentry);
    assert!(brain.is_ready());
    assert_eq!(brain.state(), AIState::Patrol);
    assert_eq!(navigation(&app, sentry).target_position(), Some(Vec3::new(10.0, 0.0, 0.0)));
    assert!(app.world().get::<AmbientAudio>(sentry).expect("audio").is_playing());
}

#[test]
fn test_patrol_reaches_point_waits_and_moves_on() {
    let mut app = create_headless_app(42);
    let points = [Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0)];
    let sentry = spawn_test_sentry(&mut app, Vec3::ZERO, &points);

    // 8.5m при 2 m/s ≈ 4.25s до порога прибытия
    run(&mut app, 5 * TPS);
    assert_eq!(brain(&app, sentry).patrol_index(), 1);
    assert!(brain(&app, sentry).is_waiting());
    let paused_at = position(&app, sentry);
    assert!(paused_at.x >= 8.5 && paused_at.x < 10.0, "x = {}", paused_at.x);

    // Пауза 1s, потом к следующей точке
    run(&mut app, 2 * TPS);
    assert!(!brain(&app, sentry).is_waiting());
    assert_eq!(navigation(&app, sentry).target_position(), Some(points[1]));
    assert!(position(&app, sentry).z > 1.0);
}

#[test]
fn test_noise_leads_to_investigation_and_back() {
    let mut app = create_headless_app(42);
    let sentry = spawn_test_sentry(&mut app, Vec3::ZERO, &[Vec3::new(10.0, 0.0, 0.0)]);
    run(&mut app, 10);

    // Далеко: игнорируется
    app.world_mut().send_event(NoiseMade::new(Vec3::new(50.0, 0.0, 0.0), 1.0));
    run(&mut app, 1);
    assert_eq!(brain(&app, sentry).state(), AIState::Patrol);

    let noise = Vec3::new(5.0, 0.0, -5.0);
    app.world_mut().send_event(NoiseMade::new(noise, 1.0));
    run(&mut app, 1);
    assert_eq!(brain(&app, sentry).state(), AIState::Investigate);
    assert_eq!(navigation(&app, sentry).target_position(), Some(noise));

    // ~5.6m до порога при 2 m/s ≈ 2.8s, затем 3s осмотра
    run(&mut app, 4 * TPS);
    assert_eq!(brain(&app, sentry).state(), AIState::Investigate);
    assert!(brain(&app, sentry).is_waiting());

    run(&mut app, 3 * TPS);
    assert_eq!(brain(&app, sentry).state(), AIState::Patrol);
    assert!(!brain(&app, sentry).is_waiting());
    assert_eq!(navigation(&app, sentry).target_position(), Some(Vec3::new(10.0, 0.0, 0.0)));
}

#[test]
fn test_lost_target_grace_then_investigate() {
    let (mut app, sentry, _target) = chasing_app();
    assert!(!app.world().get::<AmbientAudio>(sentry).expect("audio").is_playing());

    app.world_mut().send_event(SightEvent::TargetLost { observer: sentry });
    run(&mut app, 4 * TPS);
    assert_eq!(brain(&app, sentry).state(), AIState::Chase);

    run(&mut app, 2 * TPS);
    let brain_state = brain(&app, sentry);
    assert_eq!(brain_state.state(), AIState::Investigate);
    assert_eq!(brain_state.active_target(), None);
    assert_eq!(
        navigation(&app, sentry).target_position(),
        Some(Vec3::new(5.0, 0.0, 5.0))
    );
}

#[test]
fn test_redetection_during_grace_keeps_chasing() {
    let (mut app, sentry, target) = chasing_app();

    app.world_mut().send_event(SightEvent::TargetLost { observer: sentry });
    run(&mut app, 2 * TPS);
    app.world_mut().send_event(SightEvent::TargetDetected {
        observer: sentry,
        target,
    });
    run(&mut app, 8 * TPS);

    assert_eq!(brain(&app, sentry).state(), AIState::Chase);
    assert_eq!(brain(&app, sentry).active_target(), Some(target));
}

#[test]
fn test_despawned_target_is_treated_as_lost() {
    let (mut app, sentry, target) = chasing_app();

    app.world_mut().despawn(target);
    run(&mut app, 1);
    assert_eq!(brain(&app, sentry).active_target(), None);
    assert_eq!(brain(&app, sentry).state(), AIState::Chase);

    run(&mut app, 6 * TPS);
    assert_eq!(brain(&app, sentry).state(), AIState::Investigate);
}

#[test]
fn test_noise_ignored_while_chasing() {
    let (mut app, sentry, _target) = chasing_app();

    app.world_mut().send_event(NoiseMade::new(Vec3::new(1.0, 0.0, 1.0), 1.0));
    run(&mut app, 1);

    assert_eq!(brain(&app, sentry).state(), AIState::Chase);
    assert_eq!(
        navigation(&app, sentry).target_position(),
        Some(Vec3::new(5.0, 0.0, 5.0))
    );
}

#[test]
fn test_despawned_sentry_leaves_registry() {
    let mut app = create_headless_app(42);
    let first = spawn_test_sentry(&mut app, Vec3::ZERO, &[]);
    let second = spawn_test_sentry(&mut app, Vec3::new(3.0, 0.0, 0.0), &[]);
    run(&mut app, 2);

    assert_eq!(app.world().resource::<PerceptionRegistry>().listeners(), &[first, second]);

    app.world_mut().despawn(first);
    run(&mut app, 1);

    let registry = app.world().resource::<PerceptionRegistry>();
    assert!(!registry.contains(first));
    assert!(registry.contains(second));

    // Шум после despawn обрабатывается без паники
    app.world_mut().send_event(NoiseMade::new(Vec3::new(3.0, 0.0, 3.0), 1.0));
    run(&mut app, 1);
    assert_eq!(brain(&app, second).state(), AIState::Investigate);
}

#[test]
fn test_despawn_between_fixed_ticks_leaves_registry() {
    // Хост рендерит 240 кадров/с: fixed тик раз в 4 кадра
    let mut app = create_headless_app(42);
    app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
        std::time::Duration::from_secs_f64(1.0 / 240.0),
    ));
    let sentry = spawn_test_sentry(&mut app, Vec3::ZERO, &[Vec3::new(10.0, 0.0, 0.0)]);
    run(&mut app, 12);
    assert!(app.world().resource::<PerceptionRegistry>().contains(sentry));
    assert!(brain(&app, sentry).is_ready());

    app.world_mut().despawn(sentry);
    run(&mut app, 1);
    assert!(!app.world().resource::<PerceptionRegistry>().contains(sentry));

    run(&mut app, 40);
    let registry = app.world().resource::<PerceptionRegistry>();
    assert!(!registry.contains(sentry));
    assert!(registry.is_empty());
}
