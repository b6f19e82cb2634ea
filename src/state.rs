//! Shared application state and service wiring.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    AccommodationService, AvailabilityService, BookingService, CalendarService, CommissionService,
};
use crate::domain::clock::Clock;
use crate::domain::commission::CommissionRate;
use crate::domain::lifecycle::RefundPolicy;
use crate::domain::repositories::{
    AccommodationRepository, AvailabilityRepository, BookingRepository, CommissionRepository,
};
use crate::error::AppError;
use crate::infrastructure::persistence::{
    MemoryStore, PgAccommodationRepository, PgAvailabilityRepository, PgBookingRepository,
    PgCommissionRepository,
};

/// Backing store of a running instance.
#[derive(Clone)]
pub enum Storage {
    Postgres(Arc<PgPool>),
    Memory,
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory => "memory",
        }
    }

    /// Round-trips to the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the database is unreachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        match self {
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool.as_ref()).await?;
                Ok(())
            }
            Self::Memory => Ok(()),
        }
    }
}

/// One implementation per repository trait.
#[derive(Clone)]
pub struct Repositories {
    pub accommodations: Arc<dyn AccommodationRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub availability: Arc<dyn AvailabilityRepository>,
    pub commissions: Arc<dyn CommissionRepository>,
    pub storage: Storage,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>, lock_timeout: Duration) -> Self {
        Self {
            accommodations: Arc::new(PgAccommodationRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone(), lock_timeout)),
            availability: Arc::new(PgAvailabilityRepository::new(pool.clone())),
            commissions: Arc::new(PgCommissionRepository::new(pool.clone())),
            storage: Storage::Postgres(pool),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            accommodations: store.clone(),
            bookings: store.clone(),
            availability: store.clone(),
            commissions: store,
            storage: Storage::Memory,
        }
    }
}

/// Booking and commission policy knobs taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct Policies {
    pub default_commission_rate: CommissionRate,
    pub refund_policy: RefundPolicy,
}

#[derive(Clone)]
pub struct AppState {
    pub accommodation_service: Arc<AccommodationService>,
    pub booking_service: Arc<BookingService>,
    pub availability_service: Arc<AvailabilityService>,
    pub commission_service: Arc<CommissionService>,
    pub calendar_service: Arc<CalendarService>,
    pub storage: Storage,
}

impl AppState {
    pub fn new(repositories: Repositories, clock: Arc<dyn Clock>, policies: Policies) -> Self {
        let accommodation_service =
            Arc::new(AccommodationService::new(repositories.accommodations));
        let commission_service = Arc::new(CommissionService::new(
            repositories.commissions,
            policies.default_commission_rate,
        ));
        let booking_service = Arc::new(BookingService::new(
            repositories.bookings.clone(),
            accommodation_service.clone(),
            commission_service.clone(),
            clock.clone(),
            policies.refund_policy,
        ));
        let availability_service = Arc::new(AvailabilityService::new(
            repositories.bookings.clone(),
            repositories.availability,
            accommodation_service.clone(),
        ));
        let calendar_service = Arc::new(CalendarService::new(repositories.bookings, clock));

        Self {
            accommodation_service,
            booking_service,
            availability_service,
            commission_service,
            calendar_service,
            storage: repositories.storage,
        }
    }
}
