//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use salon_booking_core::async_effect;
///
/// let api = env.api.clone();
/// async_effect! {
///     let result = api.available_times(&staff_id, &date).await;
///     Some(AppointmentAction::AvailabilityLoaded { staff_id, date, result })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum SlotAction {
        SlotsLoaded { count: usize },
    }

    #[tokio::test]
    async fn async_effect_produces_feedback_action() {
        let slots = vec!["09:00", "09:30"];
        let effect: Effect<SlotAction> = async_effect! {
            Some(SlotAction::SlotsLoaded { count: slots.len() })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds Effect::Future");
        };
        assert_eq!(fut.await, Some(SlotAction::SlotsLoaded { count: 2 }));
    }
}
