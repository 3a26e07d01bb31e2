//! Celebration timeline: opening salvo, periodic batches, then wind-down.

use super::engine::FireworkEngine;
use super::settings::{finite_or, finite_range_or, sample_count, sample_range};
use crate::scheduler::FrameScheduler;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowSettings {
    pub initial_launches: u32,
    /// Seconds between opening launches.
    pub initial_stagger: f32,
    /// Batch period, drawn once per show.
    pub batch_interval: [f32; 2],
    pub batch_size: [u32; 2],
    pub batch_stagger: f32,
    /// Seconds after which no new batches start.
    pub duration: f32,
    pub message_duration: f32,
}

impl Default for ShowSettings {
    fn default() -> Self {
        Self {
            initial_launches: 5,
            initial_stagger: 0.23,
            batch_interval: [2.0, 4.0],
            batch_size: [1, 3],
            batch_stagger: 0.25,
            duration: 30.0,
            message_duration: 5.0,
        }
    }
}

impl ShowSettings {
    /// Replace non-finite timings with defaults.
    pub fn sanitized(self) -> Self {
        let fallback = Self::default();
        Self {
            initial_launches: self.initial_launches,
            initial_stagger: finite_or(self.initial_stagger, fallback.initial_stagger),
            batch_interval: finite_range_or(self.batch_interval, fallback.batch_interval),
            batch_size: self.batch_size,
            batch_stagger: finite_or(self.batch_stagger, fallback.batch_stagger),
            duration: finite_or(self.duration, fallback.duration),
            message_duration: finite_or(self.message_duration, fallback.message_duration),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTask {
    LaunchFirework,
    LaunchBatch,
    EndShow,
    HideMessage,
}

pub struct CelebrationShow {
    settings: ShowSettings,
    scheduler: FrameScheduler<ShowTask>,
    rng: StdRng,
    started: bool,
    active: bool,
    message_visible: bool,
    message_shown: bool,
    launched: u32,
}

impl CelebrationShow {
    pub fn new(settings: ShowSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_seed(settings: ShowSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: ShowSettings, rng: StdRng) -> Self {
        Self {
            settings: settings.sanitized(),
            scheduler: FrameScheduler::new(),
            rng,
            started: false,
            active: false,
            message_visible: false,
            message_shown: false,
            launched: 0,
        }
    }

    pub fn settings(&self) -> &ShowSettings {
        &self.settings
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// True between `begin` and the end of the show window.
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn message_visible(&self) -> bool {
        self.message_visible
    }

    /// Shells launched so far.
    pub fn launched(&self) -> u32 {
        self.launched
    }

    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Start the show. Only the first call has any effect.
    pub fn begin(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.active = true;

        for index in 0..self.settings.initial_launches {
            let delay = seconds(self.settings.initial_stagger * index as f32);
            self.scheduler.schedule_after(delay, ShowTask::LaunchFirework);
        }

        let now = self.scheduler.now();
        let show_end = now.saturating_add(seconds(self.settings.duration));
        let interval = seconds(sample_range(&mut self.rng, self.settings.batch_interval));
        self.scheduler
            .schedule_repeating(interval, ShowTask::LaunchBatch, move |at| at >= show_end);
        self.scheduler
            .schedule_after(seconds(self.settings.duration), ShowTask::EndShow);

        info!(
            "Celebration started: {} opening shells, batches every {:.2}s for {:.0}s",
            self.settings.initial_launches,
            interval.as_secs_f32(),
            self.settings.duration
        );
        true
    }

    /// Advance the show clock and launch whatever came due.
    pub fn tick(&mut self, dt: f32, engine: &mut FireworkEngine) -> u32 {
        let mut launched = 0;
        for task in self.scheduler.advance(seconds(dt)) {
            match task {
                ShowTask::LaunchFirework => {
                    engine.spawn();
                    launched += 1;
                }
                ShowTask::LaunchBatch => {
                    if self.active {
                        launched += self.launch_batch(engine);
                    }
                }
                ShowTask::EndShow => {
                    self.active = false;
                    info!("Celebration window closed; letting in-flight fireworks finish");
                }
                ShowTask::HideMessage => self.message_visible = false,
            }
        }
        self.launched += launched;
        launched
    }

    /// First shell of the batch goes up now, the rest are staggered.
    fn launch_batch(&mut self, engine: &mut FireworkEngine) -> u32 {
        let size = sample_count(&mut self.rng, self.settings.batch_size);
        if size == 0 {
            return 0;
        }
        engine.spawn();
        for index in 1..size {
            let delay = seconds(self.settings.batch_stagger * index as f32);
            self.scheduler.schedule_after(delay, ShowTask::LaunchFirework);
        }
        1
    }

    /// Surface the celebration message on the first explosion of the session.
    pub fn notify_explosions(&mut self, count: usize) {
        if count == 0 || self.message_shown {
            return;
        }
        self.message_shown = true;
        self.message_visible = true;
        self.scheduler.schedule_after(
            seconds(self.settings.message_duration),
            ShowTask::HideMessage,
        );
    }
}

/// Negative and NaN delays run immediately; oversized ones saturate.
fn seconds(value: f32) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(value).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fireworks::FireworkSettings;

    const DT: f32 = 1.0 / 60.0;

    fn fixture(seed: u64) -> (CelebrationShow, FireworkEngine) {
        (
            CelebrationShow::with_seed(ShowSettings::default(), seed),
            FireworkEngine::with_seed(FireworkSettings::default(), Vec3::ZERO, seed),
        )
    }

    #[test]
    fn opening_salvo_is_staggered() {
        let (mut show, mut engine) = fixture(1);
        assert!(show.begin());

        assert_eq!(show.tick(0.0, &mut engine), 1);
        assert_eq!(show.tick(0.2, &mut engine), 0);
        assert_eq!(show.tick(0.05, &mut engine), 1);
        assert_eq!(show.tick(0.7, &mut engine), 3);
        assert_eq!(engine.fireworks().len(), 5);
    }

    #[test]
    fn begin_only_works_once() {
        let (mut show, mut engine) = fixture(2);
        assert!(show.begin());
        assert!(!show.begin());
        show.tick(1.0, &mut engine);
        assert_eq!(show.launched(), 5);
    }

    #[test]
    fn launches_stop_after_the_show_window() {
        let (mut show, mut engine) = fixture(3);
        show.begin();

        let mut time = 0.0;
        while time < 30.0 {
            show.tick(DT, &mut engine);
            engine.update(DT);
            time += DT;
        }
        // Let staggered batch members scheduled just before the end finish.
        for _ in 0..60 {
            show.tick(DT, &mut engine);
        }
        assert!(!show.active());

        // Interval is at most 4s, so at least 7 batches ran.
        assert!(show.launched() >= 5 + 7);
        assert!(show.launched() <= 5 + 15 * 3);

        let settled = show.launched();
        for _ in 0..600 {
            show.tick(DT, &mut engine);
        }
        assert_eq!(show.launched(), settled);
    }

    #[test]
    fn message_appears_once_and_hides() {
        let (mut show, _) = fixture(4);
        show.begin();

        show.notify_explosions(0);
        assert!(!show.message_visible());

        show.notify_explosions(2);
        assert!(show.message_visible());

        let mut engine = FireworkEngine::with_seed(FireworkSettings::default(), Vec3::ZERO, 4);
        show.tick(4.9, &mut engine);
        assert!(show.message_visible());
        show.tick(0.2, &mut engine);
        assert!(!show.message_visible());

        show.notify_explosions(3);
        assert!(!show.message_visible());
    }

    #[test]
    fn non_finite_timings_fall_back_to_defaults() {
        let settings = ShowSettings {
            initial_stagger: f32::NAN,
            batch_interval: [2.0, f32::INFINITY],
            duration: f32::INFINITY,
            ..ShowSettings::default()
        };
        let mut show = CelebrationShow::with_seed(settings, 6);
        assert_eq!(show.settings(), &ShowSettings::default());

        let mut engine = FireworkEngine::with_seed(FireworkSettings::default(), Vec3::ZERO, 6);
        assert!(show.begin());
        show.tick(1.0, &mut engine);
        assert_eq!(show.launched(), 5);
    }

    #[test]
    fn oversized_delays_saturate() {
        assert_eq!(seconds(f32::NAN), Duration::ZERO);
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f32::MAX), Duration::MAX);
        assert_eq!(seconds(0.5), Duration::from_millis(500));
    }
}
