//! Deterministic interaction core
//!
//! Everything the drag-and-toss demo does lives here. This module must be
//! pure and deterministic:
//! - Time only advances through explicit steps
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod attachment;
pub mod controller;
pub mod release;
pub mod reset;
pub mod state;
pub mod timer;
pub mod toss;

pub use attachment::DragSession;
pub use controller::{ControllerEvent, GestureEvent, Snapshot, TossController};
pub use release::{Decision, evaluate_release};
pub use reset::ResetAnimation;
pub use state::{Phase, Pose, RngState, TossableObject};
pub use timer::{Fired, Scheduler, TimerHandle};
pub use toss::{apply_toss, draw_spin, impulse_speed, integrate};
