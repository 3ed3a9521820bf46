//! Behavior state machine: Patrol / Investigate / Chase
//!
//! Одна FSM на агента, эксклюзивно принадлежит ему. Все входы (тик,
//! таймеры, perception callbacks) приходят из систем одного fixed step,
//! поэтому никогда не пересекаются и локи не нужны.
//!
//! Переходы:
//! - Patrol → Investigate: услышали шум в радиусе
//! - * → Chase: цель замечена
//! - Chase → Investigate: grace period после потери цели истёк
//! - Investigate → Patrol: осмотрели точку, никого
//!
//! Re-entrancy: каждый отложенный callback несёт snapshot (`transition_epoch`,
//! для grace ещё `sighting_epoch`) и при срабатывании сверяет его с текущим.
//! Stale callback = no-op.

use bevy::prelude::*;
use std::time::Duration;

use super::components::{AIConfig, AIState, PatrolRoute, INVESTIGATE_WAIT_SECS, LOST_SIGHT_GRACE_SECS};
use super::deferred::{DeferredAction, DeferredTimers, TimerHandle};
use super::ports::{AmbientAudioPort, NavigationPort};
use super::steering::steer;
use crate::components::MotionOutput;

/// Capabilities, которые FSM получает на время одного вызова
pub struct SentryContext<'a> {
    /// Для логов
    pub entity: Entity,
    pub config: &'a AIConfig,
    pub route: &'a PatrolRoute,
    pub navigation: &'a mut dyn NavigationPort,
    pub audio: &'a mut dyn AmbientAudioPort,
}

impl SentryContext<'_> {
    fn setup_patrol(&mut self, patrol_index: usize) {
        // Пустой маршрут → стоим на месте
        if let Some(point) = self.route.point(patrol_index) {
            self.navigation.set_target(point);
        }
    }
}

/// FSM sentry агента
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct BehaviorStateMachine {
    state: AIState,
    patrol_index: usize,
    /// true пока висит таймер, который возобновит движение
    is_waiting: bool,
    last_seen_target_position: Vec3,
    /// Non-owning: резолвится через query каждый тик
    active_target: Option<Entity>,
    /// +1 на каждый реальный переход
    transition_epoch: u64,
    /// +1 на каждое обнаружение цели
    sighting_epoch: u64,
    /// Отложенный старт патруля уже выполнен
    ready: bool,
    #[reflect(ignore)]
    timers: DeferredTimers,
}

impl BehaviorStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AIState {
        self.state
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn is_waiting(&self) -> bool {
        self.is_waiting
    }

    pub fn active_target(&self) -> Option<Entity> {
        self.active_target
    }

    pub fn last_seen_target_position(&self) -> Vec3 {
        self.last_seen_target_position
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn timers(&self) -> &DeferredTimers {
        &self.timers
    }

    /// Отложенная инициализация (первый fixed тик после спавна)
    ///
    /// Запускает ambient audio (если есть stream) и ставит цель на первую
    /// patrol point. Повторные вызовы игнорируются.
    pub fn ready(&mut self, ctx: &mut SentryContext) {
        if self.ready {
            return;
        }
        self.ready = true;

        if ctx.audio.has_stream() {
            ctx.audio.play_ambient();
        }

        if ctx.route.is_empty() {
            crate::log_warning(&format!(
                "Enemy {:?}: no patrol points, standing idle",
                ctx.entity
            ));
        }

        ctx.setup_patrol(self.patrol_index);
    }

    /// Переход в `new_state`
    ///
    /// Переход в текущий state = no-op (без entry actions). Возвращает
    /// `true` если переход реально произошёл.
    pub fn switch_state(&mut self, new_state: AIState, ctx: &mut SentryContext) -> bool {
        if self.state == new_state {
            return false;
        }

        self.is_waiting = false;
        crate::log_info(&format!(
            "Enemy {:?}: switching state {} → {}",
            ctx.entity, self.state, new_state
        ));

        match new_state {
            AIState::Patrol => ctx.setup_patrol(self.patrol_index),
            // Цель уже выставил вызывающий (noise / last seen position)
            AIState::Investigate => {}
            AIState::Chase => ctx.audio.stop_ambient(),
        }

        self.state = new_state;
        self.transition_epoch = self.transition_epoch.wrapping_add(1);
        true
    }

    /// Один fixed тик: dispatch по state + steering
    ///
    /// `locate` резолвит `active_target` в позицию (None = цели больше нет).
    /// Пока `is_waiting`, тик пропускается и агент стоит.
    pub fn update<F>(
        &mut self,
        position: Vec3,
        delta: Duration,
        locate: F,
        motion: &mut MotionOutput,
        ctx: &mut SentryContext,
    ) where
        F: Fn(Entity) -> Option<Vec3>,
    {
        if self.is_waiting {
            motion.halt();
            return;
        }

        match self.state {
            AIState::Patrol => self.process_patrol(ctx),
            AIState::Chase => self.process_chase(locate, ctx),
            AIState::Investigate => self.process_investigate(motion, ctx),
        }

        if ctx.navigation.is_finished() {
            motion.halt();
        } else {
            let speed = ctx.config.speed_for(self.state);
            let output = steer(
                position,
                ctx.navigation.next_waypoint(),
                speed,
                motion.yaw,
                delta.as_secs_f32(),
            );
            motion.velocity = output.velocity;
            motion.yaw = output.yaw;
        }
    }

    fn process_patrol(&mut self, ctx: &mut SentryContext) {
        if ctx.navigation.is_finished() {
            if let Some(next) = ctx.route.next_index(self.patrol_index) {
                self.patrol_index = next;
                self.is_waiting = true;
                self.timers.schedule(
                    ctx.config.patrol_wait_time,
                    DeferredAction::ResumePatrol {
                        epoch: self.transition_epoch,
                    },
                );
                crate::log(&format!(
                    "Enemy {:?}: patrol point reached, next index {} in {:.1}s",
                    ctx.entity, next, ctx.config.patrol_wait_time
                ));
            }
        }

        if !ctx.audio.is_playing() {
            ctx.audio.play_ambient();
        }
    }

    fn process_chase<F>(&mut self, locate: F, ctx: &mut SentryContext)
    where
        F: Fn(Entity) -> Option<Vec3>,
    {
        // Без цели держим последнюю команду навигации.
        // TODO: прерывать погоню по дистанции до last seen position
        let Some(target) = self.active_target else {
            return;
        };

        match locate(target) {
            Some(target_position) => {
                ctx.navigation.set_target(target_position);
                self.last_seen_target_position = target_position;
            }
            None => {
                // Цель despawned между тиками → как потеря из виду
                crate::log(&format!(
                    "Enemy {:?}: target {:?} no longer exists, treating as lost",
                    ctx.entity, target
                ));
                self.active_target = None;
                self.on_target_lost(ctx);
            }
        }
    }

    fn process_investigate(&mut self, motion: &mut MotionOutput, ctx: &mut SentryContext) {
        if !ctx.navigation.is_finished() {
            return;
        }

        crate::log(&format!(
            "Enemy {:?}: reached investigation point, searching...",
            ctx.entity
        ));
        self.is_waiting = true;
        motion.halt();
        self.timers.schedule(
            INVESTIGATE_WAIT_SECS,
            DeferredAction::EndInvestigation {
                epoch: self.transition_epoch,
            },
        );
    }

    /// Шум услышан
    ///
    /// В Chase игнорируется. Иначе, если шум в радиусе слышимости:
    /// цель навигации = позиция шума, переход в Investigate. Уже
    /// расследующий агент перенацеливается на новый шум.
    pub fn on_noise_heard(
        &mut self,
        position: Vec3,
        noise_position: Vec3,
        volume: f32,
        ctx: &mut SentryContext,
    ) -> bool {
        if self.state == AIState::Chase {
            return false;
        }

        let distance = position.distance(noise_position);
        if distance > ctx.config.hearing_range {
            return false;
        }

        crate::log(&format!(
            "🔊 Enemy {:?}: heard noise at {:?} (distance {:.1}m, volume {:.2})",
            ctx.entity, noise_position, distance, volume
        ));
        ctx.navigation.set_target(noise_position);
        self.switch_state(AIState::Investigate, ctx);
        true
    }

    /// Цель замечена (vision trigger)
    pub fn on_target_detected(&mut self, target: Entity, ctx: &mut SentryContext) {
        crate::log(&format!("👁️ Enemy {:?}: target {:?} detected", ctx.entity, target));
        self.active_target = Some(target);
        self.sighting_epoch = self.sighting_epoch.wrapping_add(1);
        self.switch_state(AIState::Chase, ctx);
    }

    /// Цель потеряна из виду
    ///
    /// Только в Chase: планирует grace period, по истечении которого
    /// агент идёт расследовать last seen position. Пока grace идёт,
    /// Chase тик продолжает работать с прежним `active_target`.
    pub fn on_target_lost(&mut self, ctx: &mut SentryContext) -> Option<TimerHandle> {
        if self.state != AIState::Chase {
            return None;
        }

        crate::log(&format!(
            "👻 Enemy {:?}: lost sight of target, waiting {:.1}s before investigating",
            ctx.entity, LOST_SIGHT_GRACE_SECS
        ));

        Some(self.timers.schedule(
            LOST_SIGHT_GRACE_SECS,
            DeferredAction::LostSightGrace {
                epoch: self.transition_epoch,
                sighting: self.sighting_epoch,
            },
        ))
    }

    /// Продвинуть отложенные действия и выполнить сработавшие
    pub fn advance_timers(&mut self, delta: Duration, ctx: &mut SentryContext) {
        for action in self.timers.tick(delta) {
            self.run_deferred(action, ctx);
        }
    }

    /// Snapshot действия больше не соответствует текущему состоянию
    pub fn is_stale(&self, action: &DeferredAction) -> bool {
        if self.state != action.scheduled_under() || self.transition_epoch != action.epoch() {
            return true;
        }

        match action {
            DeferredAction::LostSightGrace { sighting, .. } => *sighting != self.sighting_epoch,
            DeferredAction::ResumePatrol { .. } | DeferredAction::EndInvestigation { .. } => false,
        }
    }

    /// Выполнить сработавшее действие (stale → no-op, возвращает `false`)
    pub fn run_deferred(&mut self, action: DeferredAction, ctx: &mut SentryContext) -> bool {
        if self.is_stale(&action) {
            crate::log(&format!(
                "Enemy {:?}: stale {:?} ignored (now {})",
                ctx.entity, action, self.state
            ));
            return false;
        }

        match action {
            DeferredAction::ResumePatrol { .. } => {
                self.is_waiting = false;
                ctx.setup_patrol(self.patrol_index);
            }
            DeferredAction::EndInvestigation { .. } => {
                crate::log(&format!(
                    "Enemy {:?}: nothing found, returning to patrol",
                    ctx.entity
                ));
                self.switch_state(AIState::Patrol, ctx);
                self.is_waiting = false;
            }
            DeferredAction::LostSightGrace { .. } => {
                ctx.navigation.set_target(self.last_seen_target_position);
                self.switch_state(AIState::Investigate, ctx);
                self.active_target = None;
            }
        }

        true
    }
}
