//! Tests for perception registry and noise sources.

#[cfg(test)]
mod tests {
    use super::super::events::NoiseMade;
    use super::super::perception::*;
    use crate::DeterministicRng;
    use bevy::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_registry_subscribe_once() {
        let mut registry = PerceptionRegistry::default();
        let a = Entity::from_raw(1);

        assert!(registry.subscribe(a));
        assert!(!registry.subscribe(a));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(a));
    }

    #[test]
    fn test_registry_keeps_subscription_order() {
        let mut registry = PerceptionRegistry::default();
        let (a, b, c) = (Entity::from_raw(3), Entity::from_raw(1), Entity::from_raw(2));
        registry.subscribe(a);
        registry.subscribe(b);
        registry.subscribe(c);

        assert!(registry.unsubscribe(b));
        assert_eq!(registry.listeners(), &[a, c]);

        // Уже отписан
        assert!(!registry.unsubscribe(b));
    }

    fn registry_app() -> App {
        let mut app = App::new();
        app.init_resource::<PerceptionRegistry>()
            .add_systems(Update, (unsubscribe_noise_listeners, subscribe_noise_listeners).chain());
        app
    }

    #[test]
    fn test_listener_lifetime_drives_subscription() {
        let mut app = registry_app();
        let listener = app.world_mut().spawn(NoiseListener).id();
        let bystander = app.world_mut().spawn(Transform::default()).id();

        app.update();
        let registry = app.world().resource::<PerceptionRegistry>();
        assert!(registry.contains(listener));
        assert!(!registry.contains(bystander));

        app.world_mut().despawn(listener);
        app.update();
        assert!(app.world().resource::<PerceptionRegistry>().is_empty());
    }

    #[test]
    fn test_removing_listener_component_unsubscribes() {
        let mut app = registry_app();
        let listener = app.world_mut().spawn(NoiseListener).id();
        app.update();

        app.world_mut().entity_mut(listener).remove::<NoiseListener>();
        app.update();

        assert!(!app.world().resource::<PerceptionRegistry>().contains(listener));
    }

    #[derive(Resource, Default)]
    struct HeardNoises(Vec<NoiseMade>);

    fn collect_noises(mut events: EventReader<NoiseMade>, mut heard: ResMut<HeardNoises>) {
        heard.0.extend(events.read().copied());
    }

    fn emitter_app(seed: u64) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(250)))
            .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)))
            .insert_resource(DeterministicRng::new(seed))
            .init_resource::<HeardNoises>()
            .add_event::<NoiseMade>()
            .add_systems(FixedUpdate, (emit_ambient_noise, collect_noises).chain());
        app
    }

    fn run_emitter(seed: u64, updates: usize) -> Vec<NoiseMade> {
        let mut app = emitter_app(seed);
        app.world_mut().spawn((
            NoiseEmitter::new(0.5, 2.0, 0.8),
            Transform::from_xyz(5.0, 0.0, -5.0),
        ));
        for _ in 0..updates {
            app.update();
        }
        app.world_mut().resource_mut::<HeardNoises>().0.drain(..).collect()
    }

    #[test]
    fn test_emitter_scatters_around_source() {
        let noises = run_emitter(7, 20);

        assert!(!noises.is_empty());
        for noise in &noises {
            assert!((noise.position.x - 5.0).abs() <= 2.0);
            assert!((noise.position.z + 5.0).abs() <= 2.0);
            assert_eq!(noise.position.y, 0.0);
            assert_eq!(noise.volume, 0.8);
        }
    }

    #[test]
    fn test_emitter_is_deterministic_per_seed() {
        assert_eq!(run_emitter(99, 20), run_emitter(99, 20));
    }
}
