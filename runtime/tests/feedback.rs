//! Integration tests for effect feedback and action broadcasting
//!
//! A small slot-hold flow stands in for a booking wizard: holding a slot
//! takes several async steps, each feeding the next action back into the
//! store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use salon_booking_core::environment::Clock;
use salon_booking_core::{DateTime, SmallVec, Utc, effect::Effect, reducer::Reducer, smallvec};
use salon_booking_runtime::{Store, StoreError};
use salon_booking_testing::{FixedClock, test_clock};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum HoldAction {
    /// Start holding a slot
    Hold { slot: String },
    /// One confirmation step finished
    StepConfirmed { slot: String, step: u32 },
    /// Hold is in place (terminal)
    Held { slot: String, at: DateTime<Utc> },
    /// Drop every hold
    Release,
}

#[derive(Debug, Clone, Default)]
struct HoldState {
    steps: Vec<u32>,
    held: Option<(String, DateTime<Utc>)>,
}

#[derive(Clone)]
struct HoldEnvironment {
    clock: Arc<dyn Clock>,
}

#[derive(Clone)]
struct HoldReducer;

impl Reducer for HoldReducer {
    type State = HoldState;
    type Action = HoldAction;
    type Environment = HoldEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            HoldAction::Hold { slot } => {
                state.steps.clear();
                state.held = None;
                smallvec![Effect::Future(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Some(HoldAction::StepConfirmed { slot, step: 1 })
                }))]
            },

            HoldAction::StepConfirmed { slot, step } => {
                state.steps.push(step);
                if step < 3 {
                    smallvec![Effect::Future(Box::pin(async move {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Some(HoldAction::StepConfirmed {
                            slot,
                            step: step + 1,
                        })
                    }))]
                } else {
                    let at = env.clock.now();
                    smallvec![Effect::Future(Box::pin(async move {
                        Some(HoldAction::Held { slot, at })
                    }))]
                }
            },

            HoldAction::Held { slot, at } => {
                state.held = Some((slot, at));
                smallvec![Effect::None]
            },

            HoldAction::Release => {
                *state = HoldState::default();
                smallvec![Effect::None]
            },
        }
    }
}

fn store() -> Store<HoldState, HoldAction, HoldEnvironment, HoldReducer> {
    Store::new(
        HoldState::default(),
        HoldReducer,
        HoldEnvironment {
            clock: Arc::new(test_clock()),
        },
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn multi_step_chain_reaches_terminal_action() {
    let store = store();

    let terminal = assert_ok!(
        store
            .send_and_wait_for(
                HoldAction::Hold {
                    slot: "10:00".to_string(),
                },
                |a| matches!(a, HoldAction::Held { .. }),
                Duration::from_secs(1),
            )
            .await
    );

    assert_eq!(
        terminal,
        HoldAction::Held {
            slot: "10:00".to_string(),
            at: test_clock().now(),
        }
    );

    let state = store.snapshot().await;
    assert_eq!(state.steps, vec![1, 2, 3]);
    assert_eq!(state.held.map(|(slot, _)| slot).as_deref(), Some("10:00"));
}

#[tokio::test]
async fn subscribers_see_every_feedback_action_in_order() {
    let store = store();
    let mut actions = store.subscribe_actions();

    let handle = store
        .send(HoldAction::Hold {
            slot: "11:30".to_string(),
        })
        .await
        .unwrap();
    handle.wait().await;

    let mut steps = Vec::new();
    loop {
        match tokio::time::timeout(Duration::from_secs(1), actions.recv()).await {
            Ok(Ok(HoldAction::StepConfirmed { step, .. })) => steps.push(step),
            Ok(Ok(HoldAction::Held { .. })) => break,
            other => panic!("unexpected broadcast: {other:?}"),
        }
    }
    assert_eq!(steps, vec![1, 2, 3]);
}

#[tokio::test]
async fn waiting_for_an_action_that_never_comes_times_out() {
    let store = store();

    let result = store
        .send_and_wait_for(
            HoldAction::Release,
            |a| matches!(a, HoldAction::Held { .. }),
            Duration::from_millis(50),
        )
        .await;

    assert_eq!(assert_err!(result), StoreError::Timeout);
}

#[tokio::test]
async fn clock_is_injected_through_the_environment() {
    let fixed = FixedClock::new(DateTime::<Utc>::UNIX_EPOCH);
    let store = Store::new(
        HoldState::default(),
        HoldReducer,
        HoldEnvironment {
            clock: Arc::new(fixed),
        },
    );

    let held = store
        .send_and_wait_for(
            HoldAction::Hold {
                slot: "09:00".to_string(),
            },
            |a| matches!(a, HoldAction::Held { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert!(matches!(held, HoldAction::Held { at, .. } if at == DateTime::<Utc>::UNIX_EPOCH));
}
