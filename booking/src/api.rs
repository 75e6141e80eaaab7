//! Typed facade over the booking backend.
//!
//! Every call goes through [`ServiceCallNormalizer`], so callers only ever
//! see a [`ServiceResult`].

use crate::types::{
    AppointmentConfirmation, AppointmentRequest, SaleReceipt, SaleRequest, Service, ServiceId,
    Staff, StaffId,
};
use salon_booking_client::{
    HttpCollaborator, HttpError, ServiceCallNormalizer, ServiceError, ServiceResult,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Booking backend API
///
/// Cheap to clone; clones share the collaborator.
#[derive(Clone)]
pub struct SalonApi {
    http: Arc<dyn HttpCollaborator>,
    normalizer: ServiceCallNormalizer,
}

impl SalonApi {
    /// Creates an API facade over an HTTP collaborator
    #[must_use]
    pub fn new(http: Arc<dyn HttpCollaborator>) -> Self {
        Self {
            http,
            normalizer: ServiceCallNormalizer::new(),
        }
    }

    /// `GET /services`
    ///
    /// # Errors
    ///
    /// Any normalized [`ServiceError`].
    pub async fn services(&self) -> ServiceResult<Vec<Service>> {
        self.normalizer.invoke(|| self.http.get("/services")).await
    }

    /// `GET /services/{id}/staff`
    ///
    /// # Errors
    ///
    /// Any normalized [`ServiceError`].
    pub async fn staff_for_service(&self, service_id: &ServiceId) -> ServiceResult<Vec<Staff>> {
        let path = format!("/services/{}/staff", encode(service_id.as_str()));
        self.normalizer.invoke(|| self.http.get(&path)).await
    }

    /// `GET /staff/{id}/availability?date=`
    ///
    /// # Errors
    ///
    /// Any normalized [`ServiceError`].
    pub async fn available_times(&self, staff_id: &StaffId, date: &str) -> ServiceResult<Vec<String>> {
        let path = format!(
            "/staff/{}/availability?date={}",
            encode(staff_id.as_str()),
            encode(date)
        );
        self.normalizer.invoke(|| self.http.get(&path)).await
    }

    /// `POST /appointments`
    ///
    /// # Errors
    ///
    /// Any normalized [`ServiceError`].
    pub async fn create_appointment(
        &self,
        request: &AppointmentRequest,
    ) -> ServiceResult<AppointmentConfirmation> {
        let body = to_body(request)?;
        self.normalizer
            .invoke(|| self.http.post("/appointments", body))
            .await
    }

    /// `POST /sales`
    ///
    /// # Errors
    ///
    /// Any normalized [`ServiceError`].
    pub async fn create_sale(&self, request: &SaleRequest) -> ServiceResult<SaleReceipt> {
        let body = to_body(request)?;
        self.normalizer.invoke(|| self.http.post("/sales", body)).await
    }
}

impl std::fmt::Debug for SalonApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalonApi").finish_non_exhaustive()
    }
}

fn to_body<T: Serialize>(request: &T) -> ServiceResult<Value> {
    serde_json::to_value(request).map_err(|error| {
        let original = HttpError::Setup {
            message: error.to_string(),
        };
        ServiceError::Client {
            message: error.to_string(),
            original,
        }
    })
}

/// Percent-encode a path segment or query value
fn encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
