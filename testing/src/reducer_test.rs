//! Given-When-Then harness for reducers.
//!
//! Reducers are pure, so a test is: a starting state, a list of actions fed
//! in order, and checks on the final state and on the effects the last action
//! asked for.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use salon_booking_core::{effect::Effect, reducer::Reducer};

enum Check<S, A> {
    State(Box<dyn FnOnce(&S)>),
    Effects(Box<dyn FnOnce(&[Effect<A>])>),
}

/// Builder for one reducer scenario
///
/// State checks see the state after every action has been applied. Effect
/// checks see only the effects returned by the final action; earlier effects
/// are dropped unexecuted.
///
/// ```ignore
/// ReducerTest::new(AppointmentReducer::new())
///     .with_env(env())
///     .given_state(AppointmentState::default())
///     .when_actions([
///         AppointmentAction::SetService { service: haircut() },
///         AppointmentAction::SetStaff { staff: alice() },
///     ])
///     .then_state(|s| assert_eq!(s.stage(), Some(WizardStep::Staff)))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    given: Option<S>,
    actions: Vec<A>,
    checks: Vec<Check<S, A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a scenario for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            given: None,
            actions: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Environment handed to every `reduce` call
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// Starting state
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.given = Some(state);
        self
    }

    /// Queue one action
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Queue several actions, applied in iteration order
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Check the final state
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.checks.push(Check::State(Box::new(check)));
        self
    }

    /// Check the effects of the final action
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.checks.push(Check::Effects(Box::new(check)));
        self
    }

    /// Apply the actions, then run the checks in the order they were added
    ///
    /// # Panics
    ///
    /// When the state, environment or actions are missing, or a check fails.
    #[allow(clippy::panic)] // Test harness
    pub fn run(self) {
        let Some(mut state) = self.given else {
            panic!("ReducerTest: call given_state() before run()");
        };
        let Some(env) = self.env else {
            panic!("ReducerTest: call with_env() before run()");
        };
        assert!(
            !self.actions.is_empty(),
            "ReducerTest: queue at least one action with when_action()"
        );

        let last = self
            .actions
            .into_iter()
            .map(|action| self.reducer.reduce(&mut state, action, &env))
            .last()
            .unwrap_or_default()
            .into_vec();

        for check in self.checks {
            match check {
                Check::State(check) => check(&state),
                Check::Effects(check) => check(&last),
            }
        }
    }
}

/// Checks over a reducer's effects
pub mod assertions {
    use salon_booking_core::effect::Effect;

    /// Nothing but `Effect::None`
    ///
    /// # Panics
    ///
    /// If any effect would run.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        let running = effects.iter().filter(|e| e.is_future()).count();
        assert_eq!(running, 0, "expected no running effects, got {running}: {effects:?}");
    }

    /// Exactly `expected` effects
    ///
    /// # Panics
    ///
    /// On a count mismatch.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "effect count: {effects:?}");
    }

    /// At least one `Effect::Future`
    ///
    /// # Panics
    ///
    /// If every effect is `Effect::None`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(Effect::is_future),
            "expected a future effect: {effects:?}"
        );
    }

    /// Await every `Future` effect and collect the actions they feed back
    pub async fn resolve_effects<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
        let futures = effects.into_iter().filter_map(|effect| match effect {
            Effect::Future(future) => Some(future),
            Effect::None => None,
        });

        futures::future::join_all(futures)
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salon_booking_core::effect::Effect;
    use salon_booking_core::reducer::Reducer;
    use smallvec::{SmallVec, smallvec};

    /// Two-step form: picking a colour clears the chosen shade
    #[derive(Clone, Debug, Default, PartialEq)]
    struct Form {
        colour: Option<&'static str>,
        shade: Option<u8>,
        sent: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum FormAction {
        Colour(&'static str),
        Shade(u8),
        Send,
        Sent,
    }

    struct FormReducer;

    impl Reducer for FormReducer {
        type State = Form;
        type Action = FormAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Form,
            action: FormAction,
            _env: &(),
        ) -> SmallVec<[Effect<FormAction>; 4]> {
            match action {
                FormAction::Colour(colour) => {
                    state.colour = Some(colour);
                    state.shade = None;
                    SmallVec::new()
                },
                FormAction::Shade(shade) if state.colour.is_some() => {
                    state.shade = Some(shade);
                    SmallVec::new()
                },
                FormAction::Shade(_) => smallvec![Effect::None],
                FormAction::Send => {
                    smallvec![Effect::Future(Box::pin(async { Some(FormAction::Sent) }))]
                },
                FormAction::Sent => {
                    state.sent += 1;
                    SmallVec::new()
                },
            }
        }
    }

    #[test]
    fn sequence_applies_the_cascade() {
        ReducerTest::new(FormReducer)
            .with_env(())
            .given_state(Form::default())
            .when_actions([
                FormAction::Colour("copper"),
                FormAction::Shade(4),
                FormAction::Colour("ash"),
            ])
            .then_state(|form| {
                assert_eq!(form.colour, Some("ash"));
                assert_eq!(form.shade, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn out_of_order_step_is_ignored() {
        ReducerTest::new(FormReducer)
            .with_env(())
            .given_state(Form::default())
            .when_action(FormAction::Shade(2))
            .then_state(|form| assert_eq!(*form, Form::default()))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn only_the_last_actions_effects_are_checked() {
        ReducerTest::new(FormReducer)
            .with_env(())
            .given_state(Form::default())
            .when_action(FormAction::Send)
            .when_action(FormAction::Colour("ash"))
            .then_effects(assertions::assert_no_effects)
            .run();

        ReducerTest::new(FormReducer)
            .with_env(())
            .given_state(Form::default())
            .when_action(FormAction::Colour("ash"))
            .when_action(FormAction::Send)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .then_state(|form| assert_eq!(form.sent, 0))
            .run();
    }

    #[test]
    #[should_panic(expected = "given_state")]
    fn missing_state_is_reported() {
        ReducerTest::new(FormReducer)
            .with_env(())
            .when_action(FormAction::Send)
            .run();
    }

    #[tokio::test]
    async fn resolved_effects_feed_back_into_the_reducer() {
        let mut form = Form::default();
        let effects = FormReducer.reduce(&mut form, FormAction::Send, &());

        let feedback = assertions::resolve_effects(effects).await;
        assert_eq!(feedback, vec![FormAction::Sent]);

        for action in feedback {
            let _ = FormReducer.reduce(&mut form, action, &());
        }
        assert_eq!(form.sent, 1);
    }
}
