//! Deferred one-shot actions ("подождать N секунд, потом действовать")
//!
//! Вместо closure над живым состоянием храним данные: какое действие и
//! snapshot (epoch) на момент планирования. State machine при срабатывании
//! сама перепроверяет snapshot, stale действие = no-op.
//!
//! Отмены нет. Новый таймер не отзывает старый, их нейтрализует проверка epoch.
//! Таймеры тикают тем же fixed step, что и FSM, поэтому гонок нет.

use bevy::prelude::*;
use std::time::Duration;

use super::components::AIState;

/// Что сделать по истечении таймера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Конец паузы на patrol point → цель на следующую точку
    ResumePatrol { epoch: u64 },

    /// Конец осмотра точки расследования → обратно в Patrol
    EndInvestigation { epoch: u64 },

    /// Конец grace period после потери цели → Investigate last seen position
    LostSightGrace { epoch: u64, sighting: u64 },
}

impl DeferredAction {
    /// State, в котором действие было запланировано
    pub fn scheduled_under(&self) -> AIState {
        match self {
            DeferredAction::ResumePatrol { .. } => AIState::Patrol,
            DeferredAction::EndInvestigation { .. } => AIState::Investigate,
            DeferredAction::LostSightGrace { .. } => AIState::Chase,
        }
    }

    pub fn epoch(&self) -> u64 {
        match self {
            DeferredAction::ResumePatrol { epoch }
            | DeferredAction::EndInvestigation { epoch }
            | DeferredAction::LostSightGrace { epoch, .. } => *epoch,
        }
    }
}

/// Handle запланированного таймера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct PendingTimer {
    handle: TimerHandle,
    timer: Timer,
    action: DeferredAction,
}

/// Очередь отложенных действий одного агента
#[derive(Debug, Clone, Default)]
pub struct DeferredTimers {
    pending: Vec<PendingTimer>,
    next_handle: u64,
}

impl DeferredTimers {
    /// Запланировать `action` через `seconds` симулированного времени
    pub fn schedule(&mut self, seconds: f32, action: DeferredAction) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        self.pending.push(PendingTimer {
            handle,
            timer: Timer::from_seconds(seconds.max(0.0), TimerMode::Once),
            action,
        });

        handle
    }

    /// Продвинуть все таймеры на `delta`
    ///
    /// Возвращает сработавшие действия в порядке планирования. Каждое
    /// действие возвращается ровно один раз и удаляется из очереди.
    pub fn tick(&mut self, delta: Duration) -> Vec<DeferredAction> {
        let mut fired = Vec::new();

        self.pending.retain_mut(|pending| {
            pending.timer.tick(delta);
            if pending.timer.finished() {
                fired.push(pending.action);
                false
            } else {
                true
            }
        });

        fired
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Сколько осталось до срабатывания (None если уже сработал)
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.pending
            .iter()
            .find(|p| p.handle == handle)
            .map(|p| p.timer.remaining())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
