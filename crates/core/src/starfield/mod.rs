//! Animated starfield: drifting background points plus periodic shooting
//! stars.
//!
//! The simulation is driven one frame at a time by [`FrameTask`], which
//! owns an [`AnimationContext`] and emits a list of [`RenderCommand`]s per
//! frame. Time, randomness and frame scheduling are all injected so the
//! host (a browser `requestAnimationFrame` loop or a test) decides when
//! frames happen.

pub mod clock;
pub mod entity;

use rand::Rng;

use nightsky_protocol::{Background, RenderCommand};

use crate::config::StarfieldConfig;

pub use clock::{Clock, CountingScheduler, FrameScheduler, ManualClock};
pub use entity::{Entity, EntityKind, Point, Streak};

/// Everything one viewport-sized run of the animation needs.
///
/// Rebuilt from scratch on resize rather than patched.
#[derive(Debug, Clone)]
pub struct AnimationContext {
    pub width: f64,
    pub height: f64,
    pub background: Background,
    pub entities: Vec<Entity>,
    pub last_spawn_ms: f64,
}

impl AnimationContext {
    /// Fill a `width` x `height` viewport with `config.star_count` points and
    /// one shooting star.
    pub fn populate<R: Rng + ?Sized>(
        config: &StarfieldConfig,
        background: Background,
        width: f64,
        height: f64,
        now_ms: f64,
        rng: &mut R,
    ) -> Self {
        let mut entities = Vec::with_capacity(config.star_count + 4);
        for _ in 0..config.star_count {
            entities.push(Entity::Point(Point::random(rng, width, height)));
        }
        entities.push(Entity::Streak(Streak::random(
            rng,
            width,
            height,
            config.streak_angle(),
        )));
        log::debug!(
            "starfield context {width}x{height} with {} points",
            config.star_count
        );
        Self {
            width,
            height,
            background,
            entities,
            last_spawn_ms: now_ms,
        }
    }

    /// Advance the simulation by one frame and return what to draw.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        config: &StarfieldConfig,
        now_ms: f64,
        rng: &mut R,
    ) -> Vec<RenderCommand> {
        let mut commands = Vec::with_capacity(self.entities.len() + 1);
        commands.push(RenderCommand::Clear {
            background: self.background.clone(),
        });

        if now_ms - self.last_spawn_ms > config.spawn_interval_ms {
            self.entities.push(Entity::Streak(Streak::random(
                rng,
                self.width,
                self.height,
                config.streak_angle(),
            )));
            self.last_spawn_ms = now_ms;
            log::trace!("shooting star spawned at {now_ms:.0} ms");
        }

        for entity in &mut self.entities {
            entity.update(rng, self.width, self.height, config.opacity_decay);
            entity.draw(&mut commands);
        }
        self.entities.retain(|e| !e.is_expired());

        commands
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }
}

/// Frame-driven animation task.
pub struct FrameTask<C, R> {
    config: StarfieldConfig,
    clock: C,
    rng: R,
    context: AnimationContext,
    running: bool,
    /// Draw one frame per (re)initialization instead of animating.
    still: bool,
}

impl<C: Clock, R: Rng> FrameTask<C, R> {
    pub fn new(
        config: StarfieldConfig,
        background: Background,
        clock: C,
        mut rng: R,
        width: f64,
        height: f64,
    ) -> Self {
        let context = AnimationContext::populate(
            &config,
            background,
            width,
            height,
            clock.now_ms(),
            &mut rng,
        );
        Self {
            config,
            clock,
            rng,
            context,
            running: true,
            still: false,
        }
    }

    /// Render a single frame and stop, as requested by reduced-motion users.
    pub fn still(mut self) -> Self {
        self.still = true;
        self
    }

    pub fn context(&self) -> &AnimationContext {
        &self.context
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the context for a new viewport size. A still task is armed
    /// again so the resized canvas gets one fresh frame.
    pub fn resize(&mut self, width: f64, height: f64, background: Background) {
        self.context = AnimationContext::populate(
            &self.config,
            background,
            width,
            height,
            self.clock.now_ms(),
            &mut self.rng,
        );
        if self.still {
            self.running = true;
        }
    }

    /// Compute one frame. Does not schedule anything.
    pub fn frame(&mut self) -> Vec<RenderCommand> {
        let now = self.clock.now_ms();
        self.context.step(&self.config, now, &mut self.rng)
    }

    /// Compute one frame and, while running, ask for the next one.
    /// Returns nothing once stopped.
    pub fn run_frame<S: FrameScheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
    ) -> Vec<RenderCommand> {
        if !self.running {
            return Vec::new();
        }
        let commands = self.frame();
        if self.still {
            self.running = false;
        } else {
            scheduler.request_frame();
        }
        commands
    }

    /// Restart a stopped animation, e.g. when a page comes back from the
    /// back/forward cache. Returns whether the caller must request a frame.
    pub fn resume(&mut self) -> bool {
        if self.running || self.still {
            return false;
        }
        self.running = true;
        true
    }

    /// Tear down: no further frames are drawn or requested.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("starfield stopped");
        }
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn task(clock: ManualClock) -> FrameTask<ManualClock, StdRng> {
        FrameTask::new(
            StarfieldConfig::default(),
            Background::Transparent,
            clock,
            StdRng::seed_from_u64(42),
            800.0,
            600.0,
        )
    }

    #[test]
    fn populates_points_and_one_streak() {
        let task = task(ManualClock::new(0.0));
        assert_eq!(task.context().count(EntityKind::Point), 200);
        assert_eq!(task.context().count(EntityKind::Streak), 1);
        assert_eq!(task.context().width, 800.0);
    }

    #[test]
    fn frame_starts_with_clear_and_draws_every_entity() {
        let mut task = task(ManualClock::new(0.0));
        let commands = task.frame();
        assert_eq!(
            commands[0],
            RenderCommand::Clear {
                background: Background::Transparent
            }
        );
        assert_eq!(commands.len(), 1 + 201);
    }

    #[test]
    fn streak_expires_after_fifty_frames() {
        let clock = ManualClock::new(0.0);
        let mut task = task(clock);
        for _ in 0..49 {
            task.frame();
        }
        assert_eq!(task.context().count(EntityKind::Streak), 1);
        task.frame();
        assert_eq!(task.context().count(EntityKind::Streak), 0);
        assert_eq!(task.context().count(EntityKind::Point), 200);
    }

    #[test]
    fn resize_replaces_context() {
        let clock = ManualClock::new(0.0);
        let mut task = task(clock.clone());
        clock.set(100.0);
        task.resize(320.0, 200.0, Background::Css("#000".into()));
        let ctx = task.context();
        assert_eq!((ctx.width, ctx.height), (320.0, 200.0));
        assert_eq!(ctx.last_spawn_ms, 100.0);
        assert_eq!(ctx.entities.len(), 201);
        assert_eq!(ctx.background, Background::Css("#000".into()));
    }

    #[test]
    fn run_frame_requests_next_until_stopped() {
        let mut task = task(ManualClock::new(0.0));
        let mut scheduler = CountingScheduler::default();
        task.run_frame(&mut scheduler);
        task.run_frame(&mut scheduler);
        assert_eq!(scheduler.requested, 2);

        task.stop();
        assert!(task.run_frame(&mut scheduler).is_empty());
        assert_eq!(scheduler.requested, 2);
        assert!(!task.is_running());
    }

    #[test]
    fn resume_restarts_a_stopped_animation_once() {
        let mut task = task(ManualClock::new(0.0));
        assert!(!task.resume());
        task.stop();
        assert!(task.resume());
        assert!(!task.resume());
        let mut scheduler = CountingScheduler::default();
        assert!(!task.run_frame(&mut scheduler).is_empty());
        assert_eq!(scheduler.requested, 1);
    }

    #[test]
    fn still_task_draws_once_per_size() {
        let mut task = task(ManualClock::new(0.0)).still();
        let mut scheduler = CountingScheduler::default();
        assert!(!task.run_frame(&mut scheduler).is_empty());
        assert!(task.run_frame(&mut scheduler).is_empty());
        assert_eq!(scheduler.requested, 0);

        task.resize(400.0, 300.0, Background::Transparent);
        assert!(!task.run_frame(&mut scheduler).is_empty());
        assert!(task.run_frame(&mut scheduler).is_empty());
    }
}
