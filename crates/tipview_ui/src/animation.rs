//! Show/dismiss transitions.
//!
//! The tooltip describes each change of its visual state as a
//! [`Transition`] and hands it to an [`Animator`]. It updates its own model
//! values immediately; the animator only decides how the in-between frames
//! look. When an animator finishes it must tell the tooltip through
//! [`crate::TooltipView::transition_finished`].
//!
//! [`TimelineAnimator`] is the bundled implementation: a damped spring
//! evaluated against either the wall clock or explicit time steps.

use std::time::Duration;

use web_time::Instant;

use crate::layout::Rectangle;

/// The animatable part of a tooltip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub alpha: f32,
    /// Uniform scale around the frame's center.
    pub scale: f32,
    /// Frame in container coordinates.
    pub frame: Rectangle,
}

impl VisualState {
    /// Fully opaque, unscaled.
    pub fn identity(frame: Rectangle) -> Self {
        Self {
            alpha: 1.0,
            scale: 1.0,
            frame,
        }
    }

    /// Linear blend; `t` may overshoot `0..=1` for spring curves.
    pub fn lerp(&self, to: &VisualState, t: f32) -> VisualState {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        VisualState {
            alpha: mix(self.alpha, to.alpha).clamp(0.0, 1.0),
            scale: mix(self.scale, to.scale).max(0.0),
            frame: Rectangle::new(
                mix(self.frame.x, to.frame.x),
                mix(self.frame.y, to.frame.y),
                mix(self.frame.width, to.frame.width),
                mix(self.frame.height, to.frame.height),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Appear,
    Dismiss,
    /// Move to a new frame after the container changed.
    Relayout,
}

/// A requested change of visual state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    /// Seconds.
    pub duration: f32,
    pub damping_ratio: f32,
    /// Initial velocity in units of the total change per second.
    pub initial_velocity: f32,
    pub from: VisualState,
    pub to: VisualState,
}

impl Transition {
    pub fn curve(&self) -> SpringCurve {
        SpringCurve::new(self.damping_ratio, self.initial_velocity * self.duration)
    }

    /// Visual state `elapsed` into the transition.
    pub fn sample(&self, elapsed: Duration) -> VisualState {
        let t = if self.duration > 0.0 {
            (elapsed.as_secs_f32() / self.duration).min(1.0)
        } else {
            1.0
        };
        self.from.lerp(&self.to, self.curve().progress(t))
    }

    pub fn is_finished_at(&self, elapsed: Duration) -> bool {
        elapsed.as_secs_f32() >= self.duration
    }
}

/// Animation runtime collaborator.
pub trait Animator {
    /// Start animating. A transition started while another is running
    /// replaces it.
    fn animate(&mut self, transition: Transition);

    /// Move the running transition to `frame` without restarting it.
    /// Does nothing when no transition is running.
    fn retarget(&mut self, frame: Rectangle);
}

/// Damped spring mapping normalized time `0..=1` to progress.
///
/// The stiffness is chosen so the oscillation has decayed to 0.1% of its
/// amplitude at `t = 1`, which makes the curve end where it settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCurve {
    damping_ratio: f32,
    /// Initial velocity in units of the total change per unit of
    /// normalized time.
    velocity: f32,
}

impl SpringCurve {
    const SETTLE: f32 = 6.907_755; // ln(1000)

    pub fn new(damping_ratio: f32, velocity: f32) -> Self {
        Self {
            damping_ratio: damping_ratio.max(0.01),
            velocity,
        }
    }

    pub fn progress(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let zeta = self.damping_ratio;
        let v0 = self.velocity;
        if zeta < 1.0 {
            let omega = Self::SETTLE / zeta;
            let decay = zeta * omega;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let envelope = (-decay * t).exp();
            let b = (decay - v0) / omega_d;
            1.0 - envelope * ((omega_d * t).cos() + b * (omega_d * t).sin())
        } else {
            let omega = Self::SETTLE;
            1.0 - (-omega * t).exp() * (1.0 + (omega - v0) * t)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    transition: Transition,
    elapsed: Duration,
}

/// One sampled frame from [`TimelineAnimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub kind: TransitionKind,
    pub visual: VisualState,
    /// The transition reached its end on this frame.
    pub finished: bool,
}

/// Spring animator driven by explicit steps or the wall clock.
#[derive(Debug, Default)]
pub struct TimelineAnimator {
    active: Option<Playback>,
    last_tick: Option<Instant>,
}

impl TimelineAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The running transition, if any.
    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref().map(|p| &p.transition)
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Current visual state of the running transition.
    pub fn current(&self) -> Option<VisualState> {
        self.active
            .as_ref()
            .map(|p| p.transition.sample(p.elapsed))
    }

    /// Advance by `dt`. Returns the sampled frame; a finished transition is
    /// reported once and then dropped.
    pub fn step(&mut self, dt: Duration) -> Option<AnimationFrame> {
        let playback = self.active.as_mut()?;
        playback.elapsed += dt;

        let finished = playback.transition.is_finished_at(playback.elapsed);
        let frame = AnimationFrame {
            kind: playback.transition.kind,
            visual: playback.transition.sample(playback.elapsed),
            finished,
        };
        if finished {
            log::debug!("{:?} transition finished", frame.kind);
            self.active = None;
            self.last_tick = None;
        }
        Some(frame)
    }

    /// Advance by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> Option<AnimationFrame> {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.step(dt)
    }
}

impl Animator for TimelineAnimator {
    fn animate(&mut self, transition: Transition) {
        let mut transition = transition;
        // Start from what is on screen now rather than the old target.
        if let Some(current) = self.current() {
            transition.from = current;
        }
        log::debug!(
            "Starting {:?} transition over {:.2}s",
            transition.kind,
            transition.duration
        );
        self.active = Some(Playback {
            transition,
            elapsed: Duration::ZERO,
        });
        self.last_tick = None;
    }

    fn retarget(&mut self, frame: Rectangle) {
        if let Some(playback) = self.active.as_mut() {
            playback.transition.from.frame = frame;
            playback.transition.to.frame = frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Rectangle {
        Rectangle::new(10.0, 10.0, 40.0, 20.0)
    }

    fn appear() -> Transition {
        Transition {
            kind: TransitionKind::Appear,
            duration: 0.5,
            damping_ratio: 0.7,
            initial_velocity: 0.7,
            from: VisualState {
                alpha: 0.0,
                scale: 0.0,
                frame: frame(),
            },
            to: VisualState::identity(frame()),
        }
    }

    #[test]
    fn test_spring_endpoints() {
        for zeta in [0.3, 0.7, 1.0, 2.0] {
            let curve = SpringCurve::new(zeta, 0.5);
            assert_eq!(curve.progress(0.0), 0.0);
            assert_eq!(curve.progress(1.0), 1.0);
            assert!((curve.progress(0.999) - 1.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_underdamped_spring_overshoots() {
        let curve = SpringCurve::new(0.3, 0.0);
        let peak = (1..100)
            .map(|i| curve.progress(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_lerp_clamps_alpha() {
        let a = VisualState {
            alpha: 0.0,
            scale: 0.0,
            frame: frame(),
        };
        let b = VisualState::identity(frame());
        let over = a.lerp(&b, 1.2);
        assert_eq!(over.alpha, 1.0);
        assert!(over.scale > 1.0);
    }

    #[test]
    fn test_step_until_finished() {
        let mut animator = TimelineAnimator::new();
        animator.animate(appear());
        assert!(animator.is_running());

        let first = animator.step(Duration::from_millis(100)).unwrap();
        assert!(!first.finished);
        assert!(first.visual.alpha > 0.0);

        let last = animator.step(Duration::from_millis(400)).unwrap();
        assert!(last.finished);
        assert_eq!(last.visual, VisualState::identity(frame()));
        assert!(!animator.is_running());
        assert!(animator.step(Duration::from_millis(16)).is_none());
    }

    #[test]
    fn test_new_transition_starts_from_current() {
        let mut animator = TimelineAnimator::new();
        animator.animate(appear());
        animator.step(Duration::from_millis(50));
        let midway = animator.current().unwrap();

        let mut dismiss = appear();
        dismiss.kind = TransitionKind::Dismiss;
        dismiss.from = VisualState::identity(frame());
        animator.animate(dismiss);

        let active = animator.active().unwrap();
        assert_eq!(active.kind, TransitionKind::Dismiss);
        assert_eq!(active.from, midway);
    }

    #[test]
    fn test_retarget_keeps_progress() {
        let mut animator = TimelineAnimator::new();
        animator.animate(appear());
        let before = animator.step(Duration::from_millis(50)).unwrap();

        let moved = Rectangle::new(30.0, 60.0, 40.0, 20.0);
        animator.retarget(moved);
        let active = animator.active().unwrap();
        assert_eq!(active.kind, TransitionKind::Appear);
        assert_eq!(active.to.frame, moved);

        let after = animator.step(Duration::from_millis(16)).unwrap();
        assert_eq!(after.visual.frame, moved);
        assert!(after.visual.alpha >= before.visual.alpha);
        assert!(!after.finished);
    }

    #[test]
    fn test_retarget_when_idle_does_nothing() {
        let mut animator = TimelineAnimator::new();
        animator.retarget(frame());
        assert!(!animator.is_running());
        assert!(animator.step(Duration::from_millis(16)).is_none());
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let mut transition = appear();
        transition.duration = 0.0;
        assert_eq!(transition.sample(Duration::ZERO), transition.to);
        assert!(transition.is_finished_at(Duration::ZERO));
    }
}
