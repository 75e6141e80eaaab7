//! Command-line walk through the appointment wizard.
//!
//! Loads the service catalog from the configured backend, picks the first
//! service, staff member and free slot, and submits a booking for a demo
//! customer. Every step prints the wizard snapshot.

use anyhow::{Context, Result};
use salon_booking::{
    AppointmentAction, AppointmentReducer, AppointmentState, BookingEnvironment, CustomerDetails,
    SalonApi, Submission,
};
use salon_booking_client::{ClientConfig, ReqwestHttpClient};
use salon_booking_core::environment::{Clock, SystemClock};
use salon_booking_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WAIT: Duration = Duration::from_secs(30);

fn print_state(label: &str, state: &AppointmentState) {
    println!("\n[{label}] stage: {:?}", state.stage());
    if let Some(service) = &state.service {
        println!("  service:  {} ({} min, {})", service.title, service.duration_minutes, service.price);
    }
    if let Some(staff) = &state.staff {
        println!("  staff:    {}", staff.name);
    }
    if let (Some(date), Some(time)) = (&state.date, &state.time) {
        println!("  slot:     {date} {time}");
    }
    if let Some(customer) = &state.customer_details {
        println!("  customer: {} <{}>", customer.name, customer.email);
    }
    if !state.available_times.is_empty() {
        println!("  free:     {}", state.available_times.join(", "));
    }
    if let Some(error) = &state.last_error {
        println!("  error:    {error}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salon_booking=debug,salon_booking_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Salon Booking ===");

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Using booking API");

    let http = ReqwestHttpClient::new(&config).context("failed to build HTTP client")?;
    let api = SalonApi::new(Arc::new(http));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let env = BookingEnvironment::new(api.clone(), Arc::clone(&clock));
    let store = Store::new(AppointmentState::new(), AppointmentReducer::new(), env);

    let services = api.services().await.context("failed to load services")?;
    let service = services.into_iter().next().context("the catalog is empty")?;
    let staff = api
        .staff_for_service(&service.id)
        .await
        .context("failed to load staff")?
        .into_iter()
        .next()
        .context("no staff member offers this service")?;

    store.send(AppointmentAction::SetService { service }).await?;
    store.send(AppointmentAction::SetStaff { staff }).await?;
    print_state("chosen", &store.snapshot().await);

    let date = clock.now().date_naive().format("%Y-%m-%d").to_string();
    store
        .send_and_wait_for(
            AppointmentAction::LoadAvailability { date: date.clone() },
            |action| matches!(action, AppointmentAction::AvailabilityLoaded { .. }),
            WAIT,
        )
        .await?;

    let state = store.snapshot().await;
    print_state("availability", &state);
    let time = state
        .available_times
        .first()
        .cloned()
        .context("no free slots today")?;

    store
        .send(AppointmentAction::SetDateTime { date, time })
        .await?;
    store
        .send(AppointmentAction::SetCustomerDetails {
            details: CustomerDetails::new("Demo Customer", "demo@example.com", "555-0100"),
        })
        .await?;
    print_state("ready", &store.snapshot().await);

    store
        .send_and_wait_for(
            AppointmentAction::Submit,
            |action| matches!(action, AppointmentAction::SubmissionCompleted { .. }),
            WAIT,
        )
        .await?;

    match store.state(|s| s.submission.clone()).await {
        Submission::Confirmed(confirmation) => {
            println!("\nBooked: {}", confirmation.booking_id);
        },
        Submission::Failed {
            message,
            status_code,
        } => {
            println!("\nBooking failed: {message} (status: {status_code:?})");
        },
        other => println!("\nUnexpected submission state: {other:?}"),
    }

    store.close();
    println!("\n=== Done ===");
    Ok(())
}
