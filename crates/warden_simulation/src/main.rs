//! Headless симуляция Warden
//!
//! Один sentry патрулирует треугольник, рядом шумит источник, на 400-м
//! тике появляется нарушитель и через 300 тиков скрывается.
//!
//! Usage: warden_simulation [config.json]

use bevy::prelude::*;
use std::process::ExitCode;
use warden_simulation::{
    create_headless_app, log_error, sentry_snapshot, AIConfig, AmbientAudio, NoiseEmitter,
    SentryBuilder, SightEvent,
};

const TICKS: u32 = 1500;
const INTRUDER_APPEARS: u32 = 400;
const INTRUDER_HIDES: u32 = 700;

fn load_config(path: Option<String>) -> Result<AIConfig, String> {
    let Some(path) = path else {
        return Ok(AIConfig::default());
    };

    let source = std::fs::read_to_string(&path).map_err(|err| format!("cannot read {}: {}", path, err))?;
    AIConfig::from_json(&source).map_err(|err| format!("{}: {}", path, err))
}

fn main() -> ExitCode {
    let seed = 42;
    println!("Starting Warden headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let config = match load_config(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(err) => {
            log_error(&format!("Invalid AI config: {}", err));
            return ExitCode::FAILURE;
        }
    };

    let sentry = match SentryBuilder::new(config)
        .at(Vec3::ZERO)
        .patrol_points([
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ])
        .with_default_navigation()
        .with_audio(AmbientAudio::with_stream())
        .build()
    {
        Ok(bundle) => app.world_mut().spawn(bundle).id(),
        Err(err) => {
            log_error(&format!("Sentry rejected: {}", err));
            return ExitCode::FAILURE;
        }
    };

    // Шумит раз в 4 секунды с разбросом 3м
    app.world_mut().spawn((
        NoiseEmitter::new(4.0, 3.0, 0.6),
        Transform::from_xyz(-6.0, 0.0, 4.0),
    ));

    let intruder = app.world_mut().spawn(Transform::from_xyz(14.0, 0.0, 14.0)).id();

    for tick in 0..TICKS {
        match tick {
            INTRUDER_APPEARS => {
                app.world_mut().send_event(SightEvent::TargetDetected {
                    observer: sentry,
                    target: intruder,
                });
            }
            INTRUDER_HIDES => {
                app.world_mut().send_event(SightEvent::TargetLost { observer: sentry });
            }
            _ => {}
        }

        // Нарушитель медленно уходит по X
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(intruder) {
            transform.translation.x += 0.02;
        }

        app.update();

        if tick % 100 == 0 {
            match serde_json::to_string(&sentry_snapshot(app.world_mut())) {
                Ok(json) => println!("Tick {}: {}", tick, json),
                Err(err) => log_error(&format!("Snapshot serialization failed: {}", err)),
            }
        }
    }

    println!("Simulation complete!");
    ExitCode::SUCCESS
}
