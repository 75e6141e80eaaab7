//! Domain types shared by the booking wizards.
//!
//! Everything here is plain data that crosses the API boundary, so field
//! names follow the backend's camelCase wire format.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Backend identifier of a bookable service
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a `ServiceId` from the backend's identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend identifier of a staff member
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    /// Creates a `StaffId` from the backend's identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// An amount in minor units (cents)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Adds two money amounts, clamping at the maximum
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// A bookable service from the salon's catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Identifier
    pub id: ServiceId,
    /// Display title
    pub title: String,
    /// Length of one appointment
    pub duration_minutes: u32,
    /// Price of one appointment
    pub price: Money,
}

/// A staff member who can perform services
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    /// Identifier
    pub id: StaffId,
    /// Display name
    pub name: String,
    /// Optional specialty shown next to the name
    #[serde(default)]
    pub specialty: Option<String>,
}

/// Contact details entered in the last wizard step
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl CustomerDetails {
    /// Creates customer details
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// One line of a sales cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Service being sold
    pub id: ServiceId,
    /// Display title
    pub title: String,
    /// Unit price
    pub price: Money,
}

impl From<&Service> for CartItem {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.clone(),
            title: service.title.clone(),
            price: service.price,
        }
    }
}

// ============================================================================
// Requests and responses
// ============================================================================

/// Body of `POST /appointments`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    /// Chosen service
    pub service_id: ServiceId,
    /// Chosen staff member
    pub staff_id: StaffId,
    /// Appointment date (`YYYY-MM-DD`)
    pub date: String,
    /// Appointment time (`HH:MM`)
    pub time: String,
    /// Customer contact details
    pub customer: CustomerDetails,
}

/// Backend acknowledgement of a booked appointment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentConfirmation {
    /// Booking reference shown to the customer
    pub booking_id: String,
    /// Backend status label (e.g. `"confirmed"`, `"pending_approval"`)
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /sales`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    /// One entry per unit sold, in cart order
    pub items: Vec<ServiceId>,
    /// Buyer
    pub customer: CustomerDetails,
    /// Cart total at checkout
    pub total: Money,
}

/// Backend acknowledgement of a recorded sale
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    /// Sale reference
    pub sale_id: String,
    /// Total charged, when the backend echoes it
    #[serde(default)]
    pub total: Option<Money>,
}
