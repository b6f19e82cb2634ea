//! Booking creation, lifecycle transitions and payment events.
//!
//! # Booking Flow
//!
//! 1. Request shape and dates are checked (`Validation`, `InvalidDateRange`)
//! 2. The room or tier is loaded and guest capacity checked (`CapacityExceeded`)
//! 3. The nightly rate is resolved and frozen, the total computed
//! 4. The repository inserts atomically per target (`Overlap` on conflict)
//!
//! Lifecycle and payment updates are compare-and-set on the booking's current
//! statuses. The commission change a move implies (record on the first
//! payment, cancel on refund) is written in the same repository call.

use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;

use crate::application::services::{AccommodationService, CommissionService};
use crate::domain::clock::Clock;
use crate::domain::entities::{
    Booking, BookingFilter, CommissionEffect, LifecycleState, NewBooking, PaymentStatus,
};
use crate::domain::lifecycle::{self, BookingAction, PaymentEvent, RefundPolicy};
use crate::domain::pricing;
use crate::domain::repositories::BookingRepository;
use crate::error::AppError;

/// A booking request as received from a caller.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub accommodation_id: i64,
    pub room_id: Option<i64>,
    pub room_type: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub notes: Option<String>,
}

pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    accommodations: Arc<AccommodationService>,
    commissions: Arc<CommissionService>,
    clock: Arc<dyn Clock>,
    refund_policy: RefundPolicy,
}

impl BookingService {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        accommodations: Arc<AccommodationService>,
        commissions: Arc<CommissionService>,
        clock: Arc<dyn Clock>,
        refund_policy: RefundPolicy,
    ) -> Self {
        Self {
            repository,
            accommodations,
            commissions,
            clock,
            refund_policy,
        }
    }

    /// Validates a request and creates the booking in `pending`/`pending`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if both a room and a tier are given or
    /// `guests` is below one.
    /// Returns [`AppError::InvalidDateRange`] if `check_out <= check_in` or
    /// `check_in` is before today.
    /// Returns [`AppError::NotFound`] if the accommodation, room or tier is unknown.
    /// Returns [`AppError::CapacityExceeded`] if `guests` exceeds the capacity.
    /// Returns [`AppError::Overlap`] if the target is already taken for the stay.
    pub async fn create_booking(&self, request: CreateBooking) -> Result<Booking, AppError> {
        if request.room_id.is_some() && request.room_type.is_some() {
            return Err(AppError::bad_request(
                "Select either a room or a room type, not both",
                json!({ "room_id": request.room_id, "room_type": request.room_type }),
            ));
        }
        self.validate_dates(request.check_in, request.check_out)?;
        if request.guests < 1 {
            return Err(AppError::bad_request(
                "At least one guest is required",
                json!({ "guests": request.guests }),
            ));
        }

        let selection = self
            .accommodations
            .resolve_selection(
                request.accommodation_id,
                request.room_id,
                request.room_type.as_deref(),
            )
            .await?;

        let capacity = selection.guest_capacity();
        if request.guests > capacity {
            tracing::debug!(
                accommodation_id = request.accommodation_id,
                guests = request.guests,
                capacity,
                "Booking rejected: capacity exceeded"
            );
            return Err(AppError::capacity_exceeded(
                format!("Selection holds at most {capacity} guests"),
                json!({ "guests": request.guests, "capacity": capacity }),
            ));
        }

        let rate = pricing::resolve_nightly_rate(
            &selection.accommodation,
            selection.room.as_ref(),
            selection.room_type.as_ref(),
        )?;
        let total_price = pricing::total_price(rate.nightly_rate, request.check_in, request.check_out)?;
        let target = selection.target();

        let new_booking = NewBooking {
            accommodation_id: request.accommodation_id,
            room_id: request.room_id,
            room_type: request.room_type,
            target: target.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            nightly_rate: rate.nightly_rate,
            total_price,
            notes: request.notes,
        };

        match self.repository.insert_if_available(new_booking).await {
            Ok(booking) => {
                metrics::counter!("bookings_created_total").increment(1);
                tracing::info!(
                    booking_id = booking.id,
                    booking_target = %target,
                    check_in = %booking.check_in,
                    check_out = %booking.check_out,
                    nightly_rate = booking.nightly_rate,
                    rate_source = ?rate.source,
                    total_price = booking.total_price,
                    "Booking created"
                );
                Ok(booking)
            }
            Err(err @ AppError::Overlap { .. }) => {
                metrics::counter!("booking_overlaps_total").increment(1);
                tracing::debug!(booking_target = %target, "Booking rejected: overlap");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    pub async fn get_booking(&self, id: i64) -> Result<Booking, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found", json!({ "id": id })))
    }

    /// Page of bookings plus the total number matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_bookings(&self, filter: BookingFilter) -> Result<(Vec<Booking>, i64), AppError> {
        tokio::try_join!(
            self.repository.list(filter.clone()),
            self.repository.count(filter)
        )
    }

    /// Confirms or cancels a booking.
    ///
    /// With automatic refunds, cancelling a paid booking also refunds it and
    /// cancels its pending commission in the same update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::InvalidTransition`] for illegal moves or when the
    /// booking changed concurrently.
    pub async fn transition_booking(&self, id: i64, action: BookingAction) -> Result<Booking, AppError> {
        let booking = self.get_booking(id).await?;
        let current = booking.lifecycle();
        let next = lifecycle::plan_action(current, action, self.refund_policy)?;

        let effect = if next.payment_status == PaymentStatus::Refunded {
            CommissionEffect::Cancel
        } else {
            CommissionEffect::None
        };
        let updated = self.apply(id, current, next, effect).await?;

        tracing::info!(
            booking_id = id,
            action = ?action,
            status = %updated.status,
            payment_status = %updated.payment_status,
            "Booking transitioned"
        );
        Ok(updated)
    }

    /// Records a payment outcome for a booking.
    ///
    /// A repeated `paid` event for an already paid booking changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::InvalidTransition`] for illegal payment moves.
    pub async fn record_payment(&self, id: i64, event: PaymentEvent) -> Result<Booking, AppError> {
        let booking = self.get_booking(id).await?;

        if event == PaymentEvent::Paid
            && booking.payment_status == PaymentStatus::Paid
            && booking.is_active()
        {
            tracing::debug!(booking_id = id, "Duplicate paid event");
            return Ok(booking);
        }

        let current = booking.lifecycle();
        let next = lifecycle::plan_payment(current, event)?;

        let (effect, quote) = match next.payment_status {
            PaymentStatus::Paid => {
                let quote = self.commissions.quote_for_booking(&booking).await?;
                (CommissionEffect::Record(quote.clone()), Some(quote))
            }
            PaymentStatus::Refunded => (CommissionEffect::Cancel, None),
            PaymentStatus::Pending | PaymentStatus::Failed => (CommissionEffect::None, None),
        };
        let updated = self.apply(id, current, next, effect).await?;

        if let Some(quote) = quote {
            metrics::counter!("commission_records_total").increment(1);
            tracing::info!(
                booking_id = id,
                rate = %quote.commission_rate,
                commission_amount = quote.commission_amount,
                host_amount = quote.host_amount,
                "Commission recorded"
            );
        }
        tracing::info!(
            booking_id = id,
            event = ?event,
            payment_status = %updated.payment_status,
            "Payment recorded"
        );
        Ok(updated)
    }

    fn validate_dates(&self, check_in: NaiveDate, check_out: NaiveDate) -> Result<(), AppError> {
        if check_out <= check_in {
            return Err(AppError::invalid_date_range(
                "Check-out must be after check-in",
                json!({ "check_in": check_in, "check_out": check_out }),
            ));
        }
        let today = self.clock.today();
        if check_in < today {
            return Err(AppError::invalid_date_range(
                "Check-in must not be in the past",
                json!({ "check_in": check_in, "today": today }),
            ));
        }
        Ok(())
    }

    async fn apply(
        &self,
        id: i64,
        current: LifecycleState,
        next: LifecycleState,
        effect: CommissionEffect,
    ) -> Result<Booking, AppError> {
        if let Some(updated) = self
            .repository
            .update_lifecycle(id, current, next, effect)
            .await?
        {
            return Ok(updated);
        }

        match self.repository.find_by_id(id).await? {
            None => Err(AppError::not_found("Booking not found", json!({ "id": id }))),
            Some(latest) => Err(AppError::invalid_transition(
                "Booking changed concurrently; reload and retry",
                json!({
                    "id": id,
                    "status": latest.status.as_str(),
                    "payment_status": latest.payment_status.as_str(),
                }),
            )),
        }
    }
}
