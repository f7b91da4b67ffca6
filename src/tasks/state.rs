//! # Task lifecycle states and the closed transition table.
//!
//! A task moves linearly through [`State`], with two cancellation shortcuts:
//!
//! ```text
//! Initialized ─► Pending ─► EvaluatingConditions ─► Ready ─► Executing ─► Finishing ─► Finished
//!                   │                                 ▲ │
//!                   ├────────── (no conditions, ──────┘ │
//!                   │            or cancelled)          │
//!                   └────────── (cancelled) ─► Finishing┘
//! ```
//!
//! ## Rules
//! - Transitions outside the table are caller bugs and panic immediately.
//! - `Pending → Finishing` is legal only while the cancellation latch is set.
//! - Nothing leaves `Finished`.
//! - The enum is ordered, so "past `Ready`" is `state > State::Ready`.

/// Lifecycle state of a [`Task`](crate::Task).
///
/// Cancellation is a separate latched axis, not a state: a cancelled task
/// still walks this progression (taking the shortcuts above) so its queue
/// can always reap it through the single `Finished` drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    /// Created; conditions, observers, and dependencies may be attached.
    Initialized,
    /// Admitted by a queue; waiting for dependencies to finish.
    Pending,
    /// All dependencies finished; conditions are being evaluated.
    EvaluatingConditions,
    /// Eligible to execute (possibly cancelled and about to be reaped).
    Ready,
    /// The task's work is running.
    Executing,
    /// Completion is in progress; observers are being notified.
    Finishing,
    /// Terminal. The one-shot completion notification has fired.
    Finished,
}

impl State {
    /// Whether moving to `target` is legal from this state.
    ///
    /// `cancelled` is the task's cancellation latch; it widens the table with
    /// the `Pending → Finishing` shortcut only.
    pub(crate) fn can_transition_to(self, target: State, cancelled: bool) -> bool {
        use State::*;
        match (self, target) {
            (Initialized, Pending) => true,
            (Pending, EvaluatingConditions) => true,
            (Pending, Ready) => true,
            (Pending, Finishing) => cancelled,
            (EvaluatingConditions, Ready) => true,
            (Ready, Executing) => true,
            (Ready, Finishing) => true,
            (Executing, Finishing) => true,
            (Finishing, Finished) => true,
            _ => false,
        }
    }

    /// True once the task has reached its terminal state.
    pub fn is_finished(self) -> bool {
        self == State::Finished
    }
}
