//! Toss interaction controller
//!
//! Owns the object and drives it through Idle → Dragging → Tossing or
//! Resetting → Idle. Gesture events are applied immediately; motion,
//! the toss expiry and the reset ease all advance on `tick`.
//!
//! Every gesture that supersedes another bumps `generation`, cancels the
//! pending expiry and drops any in-flight reset before applying its own
//! effects, so at most one timer is ever live for the object.

use std::collections::VecDeque;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::attachment::DragSession;
use super::release::{Decision, evaluate_release};
use super::reset::ResetAnimation;
use super::state::{Phase, Pose, RngState, TossableObject};
use super::timer::{Scheduler, TimerHandle};
use super::toss::{apply_toss, draw_spin, integrate};
use crate::consts::*;
use crate::error::TossError;
use crate::settings::TossSettings;

/// Pointer input for one gesture step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Finger/mouse went down
    Begin { pointer: Vec2 },
    /// Pointer moved while down
    Update { pointer: Vec2 },
    /// Pointer released with a velocity in units/s
    End { pointer: Vec2, velocity: Vec2 },
}

/// Notifications for the presentation layer, drained after each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControllerEvent {
    /// A drag took hold, possibly cutting short a toss or reset
    DragStarted { anchor: Vec2, superseded: Phase },
    /// Released fast enough to fly
    Tossed { velocity: Vec2, spin: f32 },
    /// Toss flight ran its full duration
    TossExpired,
    /// Easing back to the original pose began
    ResetStarted,
    /// Object is home
    ResetFinished,
}

/// What the presentation layer needs to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Controller clock (seconds)
    pub time: f64,
    pub phase: Phase,
    pub pose: Pose,
    /// Pointer-side marker, present while dragging
    pub anchor_point: Option<Vec2>,
    /// Object-side marker, present while dragging
    pub attached_point: Option<Vec2>,
}

/// Undrained events kept before the oldest are dropped
const MAX_PENDING_EVENTS: usize = 64;

/// Payloads scheduled on the controller's timer queue
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimerEvent {
    TossExpired,
}

/// Phase together with the data only that phase owns
#[derive(Debug, Clone)]
enum Activity {
    Idle,
    Dragging(DragSession),
    Tossing { started_at: f64 },
    Resetting(ResetAnimation),
}

impl Activity {
    fn phase(&self) -> Phase {
        match self {
            Activity::Idle => Phase::Idle,
            Activity::Dragging(_) => Phase::Dragging,
            Activity::Tossing { .. } => Phase::Tossing,
            Activity::Resetting(_) => Phase::Resetting,
        }
    }
}

/// The drag-and-toss state machine
#[derive(Debug, Clone)]
pub struct TossController {
    settings: TossSettings,
    object: TossableObject,
    /// Reset target, captured once at construction
    original: Pose,
    activity: Activity,
    timers: Scheduler<TimerEvent>,
    toss_timer: Option<TimerHandle>,
    /// Bumped whenever a gesture supersedes in-flight behavior
    generation: u64,
    rng_state: RngState,
    rng: Pcg32,
    /// Fixed-step accumulator for `advance`
    accumulator: f32,
    events: VecDeque<ControllerEvent>,
    expiries_fired: u32,
    stale_callbacks: u32,
}

impl TossController {
    /// Create a controller resting at `original`
    pub fn new(original: Pose, settings: TossSettings) -> Result<Self, TossError> {
        settings.validate()?;
        let rng_state = RngState::new(settings.seed);
        Ok(Self {
            rng: rng_state.to_rng(),
            rng_state,
            object: TossableObject::new(original),
            original,
            activity: Activity::Idle,
            timers: Scheduler::new(),
            toss_timer: None,
            generation: 0,
            accumulator: 0.0,
            events: VecDeque::new(),
            expiries_fired: 0,
            stale_callbacks: 0,
            settings,
        })
    }

    // === Gestures ===

    /// Apply one gesture event. Returns the release decision on `End`.
    pub fn handle(&mut self, event: GestureEvent) -> Result<Option<Decision>, TossError> {
        match event {
            GestureEvent::Begin { pointer } => self.begin_drag(pointer).map(|_| None),
            GestureEvent::Update { pointer } => self.update_drag(pointer).map(|_| None),
            GestureEvent::End { pointer, velocity } => {
                self.update_drag(pointer)?;
                self.end_drag(velocity).map(Some)
            }
        }
    }

    /// Grab the object at `pointer`. Cancels any toss or reset in flight;
    /// the object stays where it is and the grabbed point is pinned.
    pub fn begin_drag(&mut self, pointer: Vec2) -> Result<(), TossError> {
        let superseded = self.activity.phase();
        if superseded == Phase::Dragging {
            return Err(self.invalid("begin drag"));
        }

        self.supersede();

        let session = DragSession::begin(pointer, &self.object);
        log::info!(
            "Drag start at ({:.1}, {:.1}), offset in object ({:.1}, {:.1})",
            pointer.x,
            pointer.y,
            session.anchor_offset.x,
            session.anchor_offset.y
        );
        if superseded != Phase::Idle {
            log::info!("Drag cut short {:?}", superseded);
        }

        self.activity = Activity::Dragging(session);
        self.emit(ControllerEvent::DragStarted {
            anchor: pointer,
            superseded,
        });
        Ok(())
    }

    /// Move the anchor with the pointer; the object follows
    pub fn update_drag(&mut self, pointer: Vec2) -> Result<(), TossError> {
        if let Activity::Dragging(session) = &mut self.activity {
            session.update(pointer, &mut self.object);
            return Ok(());
        }
        Err(self.invalid("update drag"))
    }

    /// Release the drag with the pointer's velocity and act on the decision
    pub fn end_drag(&mut self, velocity: Vec2) -> Result<Decision, TossError> {
        let Some(anchor) = self.anchor_point() else {
            return Err(self.invalid("end drag"));
        };
        log::info!(
            "Drag end at ({:.1}, {:.1}), velocity ({:.1}, {:.1})",
            anchor.x,
            anchor.y,
            velocity.x,
            velocity.y
        );

        self.activity = Activity::Idle;
        self.object.halt();

        let decision = evaluate_release(velocity, self.settings.throwing_threshold);
        match decision {
            Decision::Toss {
                direction,
                magnitude,
            } => self.start_toss(direction, magnitude),
            Decision::SnapBack => self.reset(),
        }
        Ok(decision)
    }

    /// Cancel whatever is happening and ease back to the original pose
    pub fn reset(&mut self) {
        self.supersede();
        self.activity = Activity::Resetting(ResetAnimation::new(
            self.object.pose,
            self.original,
            self.settings.reset_duration,
            self.settings.reset_easing,
        ));
        log::info!("Reset over {:.2}s", self.settings.reset_duration);
        self.emit(ControllerEvent::ResetStarted);
    }

    fn start_toss(&mut self, direction: Vec2, magnitude: f32) {
        let spin = draw_spin(&mut self.rng, &self.settings);
        apply_toss(&mut self.object, direction, magnitude, spin, &self.settings);

        self.toss_timer = Some(self.timers.schedule(
            f64::from(self.settings.toss_duration),
            self.generation,
            TimerEvent::TossExpired,
        ));
        self.activity = Activity::Tossing {
            started_at: self.timers.now(),
        };

        log::info!(
            "Toss at {:.0} units/s, launch velocity ({:.1}, {:.1}), spin {}",
            magnitude,
            self.object.vel.x,
            self.object.vel.y,
            spin
        );
        self.emit(ControllerEvent::Tossed {
            velocity: self.object.vel,
            spin,
        });
    }

    /// Invalidate everything the previous gesture left running
    fn supersede(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.toss_timer.take() {
            self.timers.cancel(handle);
        }
        self.object.halt();
    }

    fn invalid(&self, operation: &'static str) -> TossError {
        TossError::InvalidState {
            operation,
            phase: self.activity.phase(),
        }
    }

    // === Time ===

    /// Advance by one fixed step of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        let reset_done = match &mut self.activity {
            Activity::Idle | Activity::Dragging(_) => false,
            Activity::Tossing { .. } => {
                integrate(&mut self.object, dt, self.settings.friction);
                false
            }
            Activity::Resetting(anim) => {
                self.object.pose = anim.step(dt);
                anim.is_finished()
            }
        };

        if reset_done {
            self.object.pose = self.original;
            self.object.halt();
            self.activity = Activity::Idle;
            log::info!("Reset complete");
            self.emit(ControllerEvent::ResetFinished);
        }

        for fired in self.timers.advance(f64::from(dt)) {
            let live = fired.generation == self.generation
                && self.toss_timer == Some(fired.handle)
                && self.activity.phase() == Phase::Tossing;
            if !live {
                self.stale_callbacks += 1;
                log::debug!(
                    "Discarding stale {:?} from generation {} (now {})",
                    fired.event,
                    fired.generation,
                    self.generation
                );
                continue;
            }

            match fired.event {
                TimerEvent::TossExpired => {
                    self.toss_timer = None;
                    self.expiries_fired += 1;
                    log::info!("Toss expired after {:.2}s", self.toss_elapsed().unwrap_or(0.0));
                    self.emit(ControllerEvent::TossExpired);
                    self.reset();
                }
            }
        }
    }

    /// Feed a variable frame delta through fixed `SIM_DT` steps.
    /// Returns the number of steps taken.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop a backlog the step budget could not cover; replaying it later
        // would run the sim faster than the wall clock
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Queue an event for the presentation layer, dropping the oldest once
    /// nobody has drained for a while
    fn emit(&mut self, event: ControllerEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let dropped = self.events.pop_front();
            log::debug!("Event queue full, dropped {dropped:?}");
        }
        self.events.push_back(event);
    }

    // === Output ===

    pub fn phase(&self) -> Phase {
        self.activity.phase()
    }

    pub fn pose(&self) -> Pose {
        self.object.pose
    }

    pub fn object(&self) -> &TossableObject {
        &self.object
    }

    pub fn original_pose(&self) -> Pose {
        self.original
    }

    pub fn settings(&self) -> &TossSettings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Controller clock (seconds)
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    /// Pointer position the object is pinned to, while dragging
    pub fn anchor_point(&self) -> Option<Vec2> {
        match &self.activity {
            Activity::Dragging(session) => Some(session.anchor_point),
            _ => None,
        }
    }

    /// Screen position of the grabbed point on the object, while dragging
    pub fn attached_point(&self) -> Option<Vec2> {
        match &self.activity {
            Activity::Dragging(session) => Some(session.attached_point(&self.object)),
            _ => None,
        }
    }

    /// Grabbed point relative to the object center, while dragging
    pub fn anchor_offset(&self) -> Option<Vec2> {
        match &self.activity {
            Activity::Dragging(session) => Some(session.anchor_offset),
            _ => None,
        }
    }

    /// Seconds since the current toss launched
    pub fn toss_elapsed(&self) -> Option<f64> {
        match self.activity {
            Activity::Tossing { started_at } => Some(self.timers.now() - started_at),
            _ => None,
        }
    }

    /// Seconds until the current toss expires
    pub fn toss_remaining(&self) -> Option<f64> {
        self.toss_timer.and_then(|h| self.timers.remaining(h))
    }

    /// Number of toss expiries that actually fired
    pub fn expiries_fired(&self) -> u32 {
        self.expiries_fired
    }

    /// Number of timer callbacks discarded as belonging to a superseded gesture
    pub fn stale_callbacks(&self) -> u32 {
        self.stale_callbacks
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.now(),
            phase: self.phase(),
            pose: self.pose(),
            anchor_point: self.anchor_point(),
            attached_point: self.attached_point(),
        }
    }
}
