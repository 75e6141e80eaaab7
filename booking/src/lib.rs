//! Salon booking wizards.
//!
//! Two flows share one architecture:
//!
//! - [`AppointmentReducer`]: service → staff → date/time → customer details,
//!   with cascading resets and a submit effect
//! - [`CartReducer`]: an ordered cart of services with a checkout effect
//!
//! Both run inside a [`Store`](salon_booking_runtime::Store), one per wizard
//! session. Effects reach the backend through [`SalonApi`], which normalizes
//! every response into a [`ServiceResult`](salon_booking_client::ServiceResult).
//!
//! # Quick Start
//!
//! ```no_run
//! use salon_booking::{
//!     AppointmentAction, AppointmentReducer, AppointmentState, BookingEnvironment, SalonApi,
//! };
//! use salon_booking_client::{ClientConfig, ReqwestHttpClient};
//! use salon_booking_core::environment::SystemClock;
//! use salon_booking_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = ReqwestHttpClient::new(&ClientConfig::from_env())?;
//! let api = SalonApi::new(Arc::new(http));
//! let env = BookingEnvironment::new(api.clone(), Arc::new(SystemClock));
//! let store = Store::new(AppointmentState::new(), AppointmentReducer::new(), env);
//!
//! let services = api.services().await?;
//! if let Some(service) = services.into_iter().next() {
//!     store.send(AppointmentAction::SetService { service }).await?;
//! }
//!
//! let stage = store.state(AppointmentState::stage).await;
//! println!("Wizard at {stage:?}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod appointment;
pub mod cart;
pub mod environment;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use api::SalonApi;
pub use appointment::{
    AppointmentAction, AppointmentReducer, AppointmentState, Submission, WizardStep,
};
pub use cart::{CartAction, CartReducer, CartState, CheckoutStatus};
pub use environment::BookingEnvironment;
pub use error::WizardError;
pub use types::{
    AppointmentConfirmation, AppointmentRequest, CartItem, CustomerDetails, Money, SaleReceipt,
    SaleRequest, Service, ServiceId, Staff, StaffId,
};
