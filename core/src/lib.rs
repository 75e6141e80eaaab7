//! # Salon Booking Core
//!
//! Core traits and types shared by every wizard in the salon booking app.
//!
//! A wizard is modelled as a reducer: a pure function that takes the current
//! state and an action, updates the state in place and describes any side
//! effects it needs (loading availability, submitting a booking) as values.
//! The runtime crate owns the state and executes those descriptions.
//!
//! ## Core Concepts
//!
//! - **State**: The in-progress form for one wizard session
//! - **Action**: Everything a screen or an effect can feed into the wizard
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of async work whose result becomes an action
//! - **Environment**: Injected dependencies (API facade, clock)
//!
//! ## Example
//!
//! ```
//! use salon_booking_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct StepState {
//!     step: u8,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum StepAction {
//!     Next,
//!     Reset,
//! }
//!
//! struct StepReducer;
//!
//! impl Reducer for StepReducer {
//!     type State = StepState;
//!     type Action = StepAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut StepState,
//!         action: StepAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<StepAction>; 4]> {
//!         match action {
//!             StepAction::Next => state.step += 1,
//!             StepAction::Reset => state.step = 0,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = StepState::default();
//! let _ = StepReducer.reduce(&mut state, StepAction::Next, &());
//! assert_eq!(state.step, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - the core trait for wizard logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// A cascade (changing one step and clearing everything after it) happens
/// inside a single `reduce` call, so callers only ever observe whole transitions.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for wizard logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The wizard state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned by reducers. The runtime spawns them and feeds
/// any resulting action back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns `true` for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Returns `true` for `Effect::Future`
        #[must_use]
        pub const fn is_future(&self) -> bool {
            matches!(self, Effect::Future(_))
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Production code uses [`SystemClock`]; tests use a fixed clock so that
    /// confirmation timestamps are deterministic.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};

    #[test]
    fn effect_debug_hides_future() {
        let effect: Effect<()> = Effect::Future(Box::pin(async { None }));
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
        assert!(effect.is_future());
        assert!(Effect::<()>::None.is_none());
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
