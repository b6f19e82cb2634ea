//! In-process store implementing every repository trait.
//!
//! Used when no database is configured and by the HTTP test suite. Booking
//! insertion mirrors the PostgreSQL guarantees: a per-target async mutex
//! serializes check-then-insert for one target while other targets proceed,
//! and waiting for it is bounded by the configured lock timeout. The
//! availability check only reads the tables; the write lock is taken for the
//! insert alone. A lifecycle update and its commission write happen under a
//! single write lock.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::domain::availability::{maintenance_days_in, peak_occupancy};
use crate::domain::entities::{
    Accommodation, Booking, BookingFilter, BookingStatus, CommissionEffect,
    CommissionRateChange, CommissionRecord, CommissionStatus, DayOverride, LifecycleState,
    NewAccommodation, NewBooking, NewCommissionRecord, NewRoom, NewRoomTypePricing,
    PaymentStatus, Room, RoomTypePricing,
};
use crate::domain::repositories::{
    AccommodationRepository, AvailabilityRepository, BookingRepository, CommissionFilter,
    CommissionRepository,
};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    accommodations: BTreeMap<i64, Accommodation>,
    rooms: BTreeMap<i64, Room>,
    room_types: BTreeMap<i64, RoomTypePricing>,
    bookings: BTreeMap<i64, Booking>,
    overrides: BTreeMap<(String, NaiveDate), DayOverride>,
    commissions: BTreeMap<i64, CommissionRecord>,
    rate_changes: Vec<CommissionRateChange>,
    sequence: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn host_of(&self, accommodation_id: i64) -> Option<i64> {
        self.accommodations.get(&accommodation_id).map(|a| a.host_id)
    }

    fn commission_for(&mut self, booking_id: i64) -> Option<&mut CommissionRecord> {
        self.commissions
            .values_mut()
            .find(|c| c.booking_id == booking_id)
    }

    fn record_commission(&mut self, new_record: NewCommissionRecord) {
        if self.commission_for(new_record.booking_id).is_some() {
            return;
        }
        let record = CommissionRecord {
            id: self.next_id(),
            booking_id: new_record.booking_id,
            booking_amount: new_record.booking_amount,
            commission_rate: new_record.commission_rate,
            commission_amount: new_record.commission_amount,
            host_amount: new_record.host_amount,
            status: CommissionStatus::Pending,
            created_at: Utc::now(),
        };
        self.commissions.insert(record.id, record);
    }

    fn matching_bookings<'a>(&'a self, filter: &'a BookingFilter) -> impl Iterator<Item = &'a Booking> {
        self.bookings.values().filter(move |b| {
            self.host_of(b.accommodation_id)
                .is_some_and(|host_id| filter.matches(b, host_id))
        })
    }
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
    target_locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
    lock_timeout: Duration,
}

impl MemoryStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            target_locks: StdMutex::new(HashMap::new()),
            lock_timeout,
        }
    }

    fn target_lock(&self, target_key: &str) -> Result<Arc<Mutex<()>>, AppError> {
        let mut locks = self
            .target_locks
            .lock()
            .map_err(|_| AppError::internal("Booking lock table poisoned", json!({})))?;
        Ok(locks
            .entry(target_key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

fn missing(kind: &str, id: impl serde::Serialize) -> AppError {
    AppError::not_found(format!("{kind} not found"), json!({ "id": id }))
}

#[async_trait]
impl AccommodationRepository for MemoryStore {
    async fn create(&self, new_accommodation: NewAccommodation) -> Result<Accommodation, AppError> {
        let mut tables = self.tables.write().await;
        let accommodation = Accommodation {
            id: tables.next_id(),
            host_id: new_accommodation.host_id,
            name: new_accommodation.name,
            city: new_accommodation.city,
            base_rate: new_accommodation.base_rate,
            max_guests: new_accommodation.max_guests,
            status: new_accommodation.status,
            created_at: Utc::now(),
        };
        tables.accommodations.insert(accommodation.id, accommodation.clone());
        Ok(accommodation)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Accommodation>, AppError> {
        Ok(self.tables.read().await.accommodations.get(&id).cloned())
    }

    async fn update_base_rate(&self, id: i64, base_rate: i64) -> Result<Accommodation, AppError> {
        let mut tables = self.tables.write().await;
        let accommodation = tables
            .accommodations
            .get_mut(&id)
            .ok_or_else(|| missing("Accommodation", id))?;
        accommodation.base_rate = base_rate;
        Ok(accommodation.clone())
    }

    async fn create_room(&self, new_room: NewRoom) -> Result<Room, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.accommodations.contains_key(&new_room.accommodation_id) {
            return Err(missing("Accommodation", new_room.accommodation_id));
        }
        let room = Room {
            id: tables.next_id(),
            accommodation_id: new_room.accommodation_id,
            name: new_room.name,
            capacity: new_room.capacity,
            nightly_rate: new_room.nightly_rate,
        };
        tables.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_room(&self, room_id: i64) -> Result<Option<Room>, AppError> {
        Ok(self.tables.read().await.rooms.get(&room_id).cloned())
    }

    async fn list_rooms(&self, accommodation_id: i64) -> Result<Vec<Room>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .rooms
            .values()
            .filter(|r| r.accommodation_id == accommodation_id)
            .cloned()
            .collect())
    }

    async fn update_room_rate(&self, room_id: i64, nightly_rate: i64) -> Result<Room, AppError> {
        let mut tables = self.tables.write().await;
        let room = tables
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| missing("Room", room_id))?;
        room.nightly_rate = nightly_rate;
        Ok(room.clone())
    }

    async fn create_room_type(
        &self,
        new_room_type: NewRoomTypePricing,
    ) -> Result<RoomTypePricing, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.accommodations.contains_key(&new_room_type.accommodation_id) {
            return Err(missing("Accommodation", new_room_type.accommodation_id));
        }
        if tables.room_types.values().any(|t| {
            t.accommodation_id == new_room_type.accommodation_id && t.name == new_room_type.name
        }) {
            return Err(AppError::bad_request(
                "Room type already exists for this accommodation",
                json!({ "name": new_room_type.name }),
            ));
        }
        let room_type = RoomTypePricing {
            id: tables.next_id(),
            accommodation_id: new_room_type.accommodation_id,
            name: new_room_type.name,
            nightly_rate: new_room_type.nightly_rate,
            available_units: new_room_type.available_units,
        };
        tables.room_types.insert(room_type.id, room_type.clone());
        Ok(room_type)
    }

    async fn find_room_type(
        &self,
        accommodation_id: i64,
        name: &str,
    ) -> Result<Option<RoomTypePricing>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .room_types
            .values()
            .find(|t| t.accommodation_id == accommodation_id && t.name == name)
            .cloned())
    }

    async fn list_room_types(&self, accommodation_id: i64) -> Result<Vec<RoomTypePricing>, AppError> {
        let mut room_types: Vec<RoomTypePricing> = self
            .tables
            .read()
            .await
            .room_types
            .values()
            .filter(|t| t.accommodation_id == accommodation_id)
            .cloned()
            .collect();
        room_types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(room_types)
    }

    async fn update_room_type_rate(
        &self,
        accommodation_id: i64,
        name: &str,
        nightly_rate: i64,
    ) -> Result<RoomTypePricing, AppError> {
        let mut tables = self.tables.write().await;
        let room_type = tables
            .room_types
            .values_mut()
            .find(|t| t.accommodation_id == accommodation_id && t.name == name)
            .ok_or_else(|| {
                AppError::not_found(
                    "Room type not found",
                    json!({ "accommodation_id": accommodation_id, "name": name }),
                )
            })?;
        room_type.nightly_rate = nightly_rate;
        Ok(room_type.clone())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert_if_available(&self, new_booking: NewBooking) -> Result<Booking, AppError> {
        let target_key = new_booking.target.key();
        let lock = self.target_lock(&target_key)?;
        let _guard = tokio::time::timeout(self.lock_timeout, lock.lock())
            .await
            .map_err(|_| {
                AppError::internal(
                    "Timed out waiting for the booking target lock",
                    json!({ "retryable": true }),
                )
            })?;

        let (overlapping, overrides) = {
            let tables = self.tables.read().await;
            if !tables.accommodations.contains_key(&new_booking.accommodation_id) {
                return Err(missing("Accommodation", new_booking.accommodation_id));
            }

            let overlapping: Vec<Booking> = tables
                .bookings
                .values()
                .filter(|b| {
                    b.target_key == target_key
                        && b.is_active()
                        && b.overlaps(new_booking.check_in, new_booking.check_out)
                })
                .cloned()
                .collect();
            let overrides: Vec<DayOverride> = tables
                .overrides
                .values()
                .filter(|o| o.target_key == target_key)
                .cloned()
                .collect();
            (overlapping, overrides)
        };

        let capacity = new_booking.target.concurrent_capacity();
        if peak_occupancy(&overlapping, new_booking.check_in, new_booking.check_out) >= capacity {
            let conflicting: Vec<i64> = overlapping.iter().map(|b| b.id).collect();
            return Err(AppError::overlap(
                "Dates overlap an existing booking",
                json!({ "target": target_key, "conflicting_booking_ids": conflicting }),
            ));
        }

        let blocked = maintenance_days_in(new_booking.check_in, new_booking.check_out, &overrides);
        if !blocked.is_empty() {
            return Err(AppError::overlap(
                "Dates include maintenance days",
                json!({ "target": target_key, "maintenance_days": blocked }),
            ));
        }

        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let booking = Booking {
            id: tables.next_id(),
            accommodation_id: new_booking.accommodation_id,
            room_id: new_booking.room_id,
            room_type: new_booking.room_type,
            target_key,
            check_in: new_booking.check_in,
            check_out: new_booking.check_out,
            guests: new_booking.guests,
            nightly_rate: new_booking.nightly_rate,
            total_price: new_booking.total_price,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            notes: new_booking.notes,
            created_at: now,
            updated_at: now,
        };
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn list_active_for_target(
        &self,
        target_key: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        let mut bookings: Vec<Booking> = self
            .tables
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.target_key == target_key && b.is_active() && b.overlaps(from, to))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.check_in.cmp(&b.check_in).then(a.id.cmp(&b.id)));
        Ok(bookings)
    }

    async fn list_for_host(&self, host_id: i64) -> Result<Vec<Booking>, AppError> {
        let filter = BookingFilter::default().with_host(Some(host_id));
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables.matching_bookings(&filter).cloned().collect();
        bookings.sort_by(|a, b| a.check_in.cmp(&b.check_in).then(a.id.cmp(&b.id)));
        Ok(bookings)
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, AppError> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables.matching_bookings(&filter).cloned().collect();
        bookings.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(bookings
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(0))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .collect())
    }

    async fn count(&self, filter: BookingFilter) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.matching_bookings(&filter).count() as i64)
    }

    async fn update_lifecycle(
        &self,
        id: i64,
        expected: LifecycleState,
        next: LifecycleState,
        effect: CommissionEffect,
    ) -> Result<Option<Booking>, AppError> {
        let mut tables = self.tables.write().await;
        let updated = match tables.bookings.get_mut(&id) {
            Some(booking) if booking.lifecycle() == expected => {
                booking.status = next.status;
                booking.payment_status = next.payment_status;
                booking.updated_at = Utc::now();
                booking.clone()
            }
            _ => return Ok(None),
        };

        match effect {
            CommissionEffect::None => {}
            CommissionEffect::Record(new_record) => tables.record_commission(new_record),
            CommissionEffect::Cancel => {
                if let Some(record) = tables.commission_for(id)
                    && record.status == CommissionStatus::Pending
                {
                    record.status = CommissionStatus::Cancelled;
                }
            }
        }

        Ok(Some(updated))
    }
}

#[async_trait]
impl AvailabilityRepository for MemoryStore {
    async fn upsert_override(&self, day_override: DayOverride) -> Result<DayOverride, AppError> {
        let mut tables = self.tables.write().await;
        tables.overrides.insert(
            (day_override.target_key.clone(), day_override.day),
            day_override.clone(),
        );
        Ok(day_override)
    }

    async fn delete_override(&self, target_key: &str, day: NaiveDate) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .overrides
            .remove(&(target_key.to_string(), day))
            .is_some())
    }

    async fn list_overrides(
        &self,
        target_key: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayOverride>, AppError> {
        if to < from {
            return Ok(Vec::new());
        }
        let tables = self.tables.read().await;
        Ok(tables
            .overrides
            .range((target_key.to_string(), from)..=(target_key.to_string(), to))
            .map(|(_, o)| o.clone())
            .collect())
    }
}

#[async_trait]
impl CommissionRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<CommissionRecord>, AppError> {
        Ok(self.tables.read().await.commissions.get(&id).cloned())
    }

    async fn find_by_booking(&self, booking_id: i64) -> Result<Option<CommissionRecord>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .commissions
            .values()
            .find(|c| c.booking_id == booking_id)
            .cloned())
    }

    async fn list(&self, filter: CommissionFilter) -> Result<Vec<CommissionRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .commissions
            .values()
            .rev()
            .filter(|c| filter.status.is_none_or(|s| s == c.status))
            .skip(usize::try_from(filter.offset).unwrap_or(0))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count(&self, status: Option<CommissionStatus>) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .commissions
            .values()
            .filter(|c| status.is_none_or(|s| s == c.status))
            .count() as i64)
    }

    async fn update_status(
        &self,
        id: i64,
        expected: CommissionStatus,
        next: CommissionStatus,
    ) -> Result<Option<CommissionRecord>, AppError> {
        let mut tables = self.tables.write().await;
        match tables.commissions.get_mut(&id) {
            Some(record) if record.status == expected => {
                record.status = next;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn latest_rate(&self) -> Result<Option<CommissionRateChange>, AppError> {
        Ok(self.tables.read().await.rate_changes.last().cloned())
    }

    async fn append_rate_change(
        &self,
        rate: Decimal,
        note: Option<String>,
    ) -> Result<CommissionRateChange, AppError> {
        let mut tables = self.tables.write().await;
        let change = CommissionRateChange {
            id: tables.rate_changes.len() as i64 + 1,
            previous_rate: tables.rate_changes.last().map(|c| c.rate),
            rate,
            note,
            changed_at: Utc::now(),
        };
        tables.rate_changes.push(change.clone());
        Ok(change)
    }

    async fn list_rate_changes(&self) -> Result<Vec<CommissionRateChange>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .rate_changes
            .iter()
            .rev()
            .cloned()
            .collect())
    }
}
