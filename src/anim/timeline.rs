//! Host-clocked animation timeline
//!
//! Tracks how long every tween, loop and delayed callback has been running
//! and reports one-shot completions when the host advances the clock. The
//! timeline does not evaluate easing curves: it keeps each sprite's resting
//! transform and queues [`RenderCommand`]s so the host renderer can perform
//! the interpolation itself.

use super::{AnimHandle, Animator, Easing, Target, Transform, TweenProps};

/// Instruction for the host renderer
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Jump to a transform
    Set { target: Target, transform: Transform },
    /// Ease toward a transform
    Tween {
        target: Target,
        transform: Transform,
        duration: f32,
        easing: Easing,
    },
    /// Yoyo between two transforms forever
    Loop {
        target: Target,
        from: Transform,
        to: Transform,
        duration: f32,
    },
    /// Freeze at a transform, cancelling any tween or loop on the target
    Stop { target: Target, transform: Transform },
}

#[derive(Debug, Clone)]
enum Job {
    Tween {
        target: Target,
        props: TweenProps,
        from: Transform,
    },
    Loop {
        target: Target,
        props: TweenProps,
        from: Transform,
    },
    Delay,
}

#[derive(Debug, Clone)]
struct Running {
    handle: AnimHandle,
    job: Job,
    start: f64,
    duration: f64,
}

impl Running {
    fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn repeats(&self) -> bool {
        matches!(self.job, Job::Loop { .. })
    }

    fn elapsed_fraction(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }
}

/// Animation timeline driven by host frame time (milliseconds)
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    now: f64,
    next_id: u64,
    running: Vec<Running>,
    transforms: [Transform; Target::COUNT],
    commands: Vec<RenderCommand>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resting transform of a sprite (end values of issued tweens)
    pub fn transform(&self, target: Target) -> Transform {
        self.transforms[target.index()]
    }

    pub fn is_running(&self, handle: AnimHandle) -> bool {
        self.running.iter().any(|r| r.handle == handle)
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Take the render commands issued since the last drain
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Advance the clock and collect finished tweens and delays, ordered by
    /// the time they finished (ties keep issue order)
    pub fn advance(&mut self, dt: f32) -> Vec<AnimHandle> {
        self.now += dt.max(0.0) as f64;
        let now = self.now;

        let mut finished = Vec::new();
        self.running.retain(|r| {
            if !r.repeats() && r.end() <= now {
                finished.push((r.end(), r.handle));
                false
            } else {
                true
            }
        });

        finished.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        finished.into_iter().map(|(_, handle)| handle).collect()
    }

    fn allocate(&mut self, job: Job, duration: f32) -> AnimHandle {
        let handle = AnimHandle(self.next_id);
        self.next_id += 1;
        self.running.push(Running {
            handle,
            job,
            start: self.now,
            duration: duration.max(0.0) as f64,
        });
        handle
    }
}

impl Animator for Timeline {
    fn set(&mut self, target: Target, props: TweenProps) {
        let transform = props.apply(self.transforms[target.index()]);
        self.transforms[target.index()] = transform;
        self.commands.push(RenderCommand::Set { target, transform });
    }

    fn animate_to(
        &mut self,
        target: Target,
        props: TweenProps,
        duration: f32,
        easing: Easing,
    ) -> AnimHandle {
        let from = self.transforms[target.index()];
        let transform = props.apply(from);
        self.transforms[target.index()] = transform;
        self.commands.push(RenderCommand::Tween {
            target,
            transform,
            duration,
            easing,
        });
        self.allocate(Job::Tween { target, props, from }, duration)
    }

    fn loop_animation(&mut self, target: Target, props: TweenProps, duration: f32) -> AnimHandle {
        let from = self.transforms[target.index()];
        self.commands.push(RenderCommand::Loop {
            target,
            from,
            to: props.apply(from),
            duration,
        });
        self.allocate(Job::Loop { target, props, from }, duration)
    }

    fn schedule_delayed(&mut self, delay: f32) -> AnimHandle {
        self.allocate(Job::Delay, delay)
    }

    fn stop(&mut self, handle: AnimHandle) -> f32 {
        let Some(index) = self.running.iter().position(|r| r.handle == handle) else {
            return 1.0;
        };
        let running = self.running.remove(index);
        let now = self.now;

        match running.job {
            Job::Tween {
                target,
                props,
                from,
            } => {
                let f = running.elapsed_fraction(now);
                let base = self.transforms[target.index()];
                let transform = props.blend(base, from, f);
                self.transforms[target.index()] = transform;
                self.commands.push(RenderCommand::Stop { target, transform });
                f
            }
            Job::Loop {
                target,
                props,
                from,
            } => {
                let legs = if running.duration > 0.0 {
                    (now - running.start) / running.duration
                } else {
                    0.0
                };
                let frac = legs.fract() as f32;
                // Odd legs run back toward the start
                let along = if (legs.floor() as u64) % 2 == 0 {
                    frac
                } else {
                    1.0 - frac
                };
                let base = self.transforms[target.index()];
                let transform = props.blend(base, from, along);
                self.transforms[target.index()] = transform;
                self.commands.push(RenderCommand::Stop { target, transform });
                frac
            }
            Job::Delay => running.elapsed_fraction(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_completes_after_duration() {
        let mut timeline = Timeline::new();
        let h = timeline.animate_to(
            Target::Square,
            TweenProps::new().y(150.0),
            500.0,
            Easing::CubicOut,
        );

        assert!(timeline.advance(499.0).is_empty());
        assert!(timeline.is_running(h));
        assert_eq!(timeline.advance(1.0), vec![h]);
        assert!(!timeline.is_running(h));
        assert_eq!(timeline.transform(Target::Square).pos.y, 150.0);
    }

    #[test]
    fn test_completion_order_follows_end_time() {
        let mut timeline = Timeline::new();
        let slow = timeline.schedule_delayed(300.0);
        let fast = timeline.schedule_delayed(100.0);
        let same_as_slow = timeline.animate_to(
            Target::LeftWall,
            TweenProps::new().x(10.0),
            300.0,
            Easing::Linear,
        );

        assert_eq!(timeline.advance(1000.0), vec![fast, slow, same_as_slow]);
        assert_eq!(timeline.running_count(), 0);
    }

    #[test]
    fn test_loop_never_completes() {
        let mut timeline = Timeline::new();
        let h = timeline.loop_animation(Target::Square, TweenProps::new().angle(40.0), 300.0);
        for _ in 0..100 {
            assert!(timeline.advance(100.0).is_empty());
        }
        assert!(timeline.is_running(h));
    }

    #[test]
    fn test_stop_tween_midway_freezes_transform() {
        let mut timeline = Timeline::new();
        timeline.set(Target::Square, TweenProps::new().scale(0.2));
        let h = timeline.animate_to(
            Target::Square,
            TweenProps::new().scale(1.0),
            1500.0,
            Easing::Linear,
        );
        timeline.advance(750.0);

        let f = timeline.stop(h);
        assert!((f - 0.5).abs() < 1e-6);
        assert!((timeline.transform(Target::Square).scale - 0.6).abs() < 1e-5);
        assert!(!timeline.is_running(h));

        // Stopping again reports a finished handle
        assert_eq!(timeline.stop(h), 1.0);
    }

    #[test]
    fn test_stop_loop_reports_leg_position() {
        let mut timeline = Timeline::new();
        timeline.set(Target::Square, TweenProps::new().angle(50.0));
        let h = timeline.loop_animation(Target::Square, TweenProps::new().angle(40.0), 300.0);

        // 1.5 legs: halfway back toward the start angle
        timeline.advance(450.0);
        let f = timeline.stop(h);
        assert!((f - 0.5).abs() < 1e-6);
        assert!((timeline.transform(Target::Square).angle - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_stopped_delay_never_fires() {
        let mut timeline = Timeline::new();
        let h = timeline.schedule_delayed(1000.0);
        timeline.advance(250.0);
        assert!((timeline.stop(h) - 0.25).abs() < 1e-6);
        assert!(timeline.advance(5000.0).is_empty());
    }

    #[test]
    fn test_commands_are_queued_and_drained() {
        let mut timeline = Timeline::new();
        timeline.set(Target::Square, TweenProps::new().x(320.0).y(-400.0));
        let h = timeline.animate_to(
            Target::Square,
            TweenProps::new().y(150.0),
            500.0,
            Easing::CubicOut,
        );
        timeline.stop(h);

        let commands = timeline.drain_commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], RenderCommand::Set { target: Target::Square, .. }));
        assert!(matches!(
            commands[1],
            RenderCommand::Tween {
                easing: Easing::CubicOut,
                ..
            }
        ));
        assert!(matches!(commands[2], RenderCommand::Stop { .. }));
        assert!(timeline.drain_commands().is_empty());
    }
}
