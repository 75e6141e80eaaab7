//! # Salon Booking Client
//!
//! Every remote call made by the booking screens goes through
//! [`ServiceCallNormalizer`], which turns whatever the backend produced into a
//! single [`ServiceResult`]:
//!
//! - `{code: "0", msg, data}` envelopes unwrap to `Ok(data)`
//! - any other envelope code becomes [`ServiceError::Server`]
//! - plain JSON bodies pass through as the payload
//! - transport failures are classified into server / network / client errors
//!
//! The HTTP layer itself sits behind the [`HttpCollaborator`] trait.
//! [`ReqwestHttpClient`] is the production implementation.
//!
//! ## Example
//!
//! ```no_run
//! use salon_booking_client::{ClientConfig, HttpCollaborator, ReqwestHttpClient, ServiceCallNormalizer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = ReqwestHttpClient::new(&ClientConfig::from_env())?;
//! let normalizer = ServiceCallNormalizer::new();
//!
//! let titles: Vec<serde_json::Value> = match normalizer.invoke(|| http.get("/services")).await {
//!     Ok(services) => services,
//!     Err(error) => {
//!         eprintln!("{error} (status: {:?})", error.status_code());
//!         Vec::new()
//!     }
//! };
//! # let _ = titles;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod normalizer;

pub use config::ClientConfig;
pub use envelope::{ApiEnvelope, SUCCESS_CODE, is_envelope};
pub use error::{HttpError, NO_RESPONSE_MESSAGE, OriginalError, ServiceError};
pub use http::{HttpCollaborator, HttpFuture, ReqwestHttpClient};
pub use normalizer::{ServiceCallNormalizer, ServiceResult, classify, normalize_value};
