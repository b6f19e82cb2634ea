//! Booking and payment state machines.
//!
//! ```text
//! booking:  pending ──confirm──▶ confirmed
//!              │                    │
//!              └──cancel──▶ cancelled ◀──cancel──┘      (terminal)
//!
//! payment:  pending ──paid──▶ paid ──refund──▶ refunded  (terminal)
//!              │  ▲
//!            failed┘retry
//! ```
//!
//! The two machines are independent except for cancellation, which may drive
//! a paid booking to `refunded` depending on [`RefundPolicy`].

use serde::Deserialize;
use serde_json::json;

use crate::domain::entities::{BookingStatus, LifecycleState, PaymentStatus};
use crate::error::AppError;

/// Reservation-status action requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Confirm,
    Cancel,
}

/// Payment-status event reported by a caller or payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentEvent {
    Paid,
    Failed,
    /// Moves a failed payment back to pending.
    Retry,
    Refunded,
}

/// Whether cancelling a paid booking refunds it in the same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundPolicy {
    Automatic,
    Manual,
}

impl BookingStatus {
    /// Applies `action`, returning the next status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidTransition`] for moves not in the machine.
    pub fn transition(self, action: BookingAction) -> Result<BookingStatus, AppError> {
        match (self, action) {
            (BookingStatus::Pending, BookingAction::Confirm) => Ok(BookingStatus::Confirmed),
            (BookingStatus::Pending | BookingStatus::Confirmed, BookingAction::Cancel) => {
                Ok(BookingStatus::Cancelled)
            }
            (from, action) => Err(AppError::invalid_transition(
                format!("Cannot {action:?} a {from} booking").to_lowercase(),
                json!({ "from": from.as_str(), "action": format!("{action:?}").to_lowercase() }),
            )),
        }
    }
}

impl PaymentStatus {
    /// Applies `event`, returning the next payment status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidTransition`] for moves not in the machine.
    pub fn apply(self, event: PaymentEvent) -> Result<PaymentStatus, AppError> {
        match (self, event) {
            (PaymentStatus::Pending, PaymentEvent::Paid) => Ok(PaymentStatus::Paid),
            (PaymentStatus::Pending, PaymentEvent::Failed) => Ok(PaymentStatus::Failed),
            (PaymentStatus::Failed, PaymentEvent::Retry) => Ok(PaymentStatus::Pending),
            (PaymentStatus::Paid, PaymentEvent::Refunded) => Ok(PaymentStatus::Refunded),
            (from, event) => Err(AppError::invalid_transition(
                format!("Cannot record {event:?} for a {from} payment").to_lowercase(),
                json!({ "from": from.as_str(), "event": format!("{event:?}").to_lowercase() }),
            )),
        }
    }
}

/// Next lifecycle state after a booking action.
///
/// # Errors
///
/// Returns [`AppError::InvalidTransition`] if the booking status move is illegal.
pub fn plan_action(
    current: LifecycleState,
    action: BookingAction,
    policy: RefundPolicy,
) -> Result<LifecycleState, AppError> {
    let status = current.status.transition(action)?;

    let payment_status = if status == BookingStatus::Cancelled
        && current.payment_status == PaymentStatus::Paid
        && policy == RefundPolicy::Automatic
    {
        PaymentStatus::Refunded
    } else {
        current.payment_status
    };

    Ok(LifecycleState {
        status,
        payment_status,
    })
}

/// Next lifecycle state after a payment event.
///
/// # Errors
///
/// Returns [`AppError::InvalidTransition`] if the payment move is illegal, or
/// if a payment succeeds on a cancelled booking.
pub fn plan_payment(
    current: LifecycleState,
    event: PaymentEvent,
) -> Result<LifecycleState, AppError> {
    if current.status == BookingStatus::Cancelled && event != PaymentEvent::Refunded {
        return Err(AppError::invalid_transition(
            "Only refunds can be recorded for a cancelled booking",
            json!({ "status": current.status.as_str(), "payment_status": current.payment_status.as_str() }),
        ));
    }

    Ok(LifecycleState {
        status: current.status,
        payment_status: current.payment_status.apply(event)?,
    })
}
