//! Accommodation inventory management and booking-target resolution.

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{
    Accommodation, BookingTarget, NewAccommodation, NewRoom, NewRoomTypePricing, Room,
    RoomTypePricing,
};
use crate::domain::repositories::AccommodationRepository;
use crate::error::AppError;

/// An accommodation together with its rooms and tiers.
#[derive(Debug, Clone, Serialize)]
pub struct AccommodationDetails {
    #[serde(flatten)]
    pub accommodation: Accommodation,
    pub rooms: Vec<Room>,
    pub room_types: Vec<RoomTypePricing>,
}

/// The loaded inventory behind a booking or calendar request.
#[derive(Debug, Clone)]
pub struct Selection {
    pub accommodation: Accommodation,
    pub room: Option<Room>,
    pub room_type: Option<RoomTypePricing>,
}

impl Selection {
    /// Overlap space of the selection.
    ///
    /// Rooms are their own target; tiers with tracked units are their own
    /// target; everything else shares the accommodation-wide target.
    pub fn target(&self) -> BookingTarget {
        if let Some(room) = &self.room {
            return BookingTarget::Room(room.id);
        }
        match &self.room_type {
            Some(tier) if tier.tracks_units() => BookingTarget::Tier {
                accommodation_id: self.accommodation.id,
                name: tier.name.clone(),
                units: tier.available_units.unwrap_or(1),
            },
            _ => BookingTarget::Accommodation(self.accommodation.id),
        }
    }

    /// Maximum guests for the selection.
    pub fn guest_capacity(&self) -> i32 {
        self.room
            .as_ref()
            .map_or(self.accommodation.max_guests, |room| room.capacity)
    }
}

/// Service for managing accommodations, rooms and rate tiers.
///
/// Rate changes apply to future bookings only; existing bookings carry their
/// own frozen nightly rate.
pub struct AccommodationService {
    repository: Arc<dyn AccommodationRepository>,
}

impl AccommodationService {
    pub fn new(repository: Arc<dyn AccommodationRepository>) -> Self {
        Self { repository }
    }

    /// Creates an accommodation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the rate is not positive or
    /// `max_guests` is below one.
    pub async fn create_accommodation(
        &self,
        new_accommodation: NewAccommodation,
    ) -> Result<Accommodation, AppError> {
        validate_rate(new_accommodation.base_rate)?;
        validate_capacity(new_accommodation.max_guests)?;

        let created = self.repository.create(new_accommodation).await?;
        tracing::info!(
            accommodation_id = created.id,
            host_id = created.host_id,
            "Accommodation created"
        );
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    pub async fn get_accommodation(&self, id: i64) -> Result<Accommodation, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Accommodation not found", json!({ "id": id })))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    pub async fn get_details(&self, id: i64) -> Result<AccommodationDetails, AppError> {
        let accommodation = self.get_accommodation(id).await?;
        let (rooms, room_types) = tokio::try_join!(
            self.repository.list_rooms(id),
            self.repository.list_room_types(id)
        )?;

        Ok(AccommodationDetails {
            accommodation,
            rooms,
            room_types,
        })
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive rate.
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    pub async fn update_base_rate(&self, id: i64, base_rate: i64) -> Result<Accommodation, AppError> {
        validate_rate(base_rate)?;
        let updated = self.repository.update_base_rate(id, base_rate).await?;
        tracing::info!(accommodation_id = id, base_rate, "Base rate updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive rate or capacity.
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    pub async fn add_room(&self, new_room: NewRoom) -> Result<Room, AppError> {
        validate_rate(new_room.nightly_rate)?;
        validate_capacity(new_room.capacity)?;
        self.get_accommodation(new_room.accommodation_id).await?;

        self.repository.create_room(new_room).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive rate.
    /// Returns [`AppError::NotFound`] if the room does not exist.
    pub async fn update_room_rate(&self, room_id: i64, nightly_rate: i64) -> Result<Room, AppError> {
        validate_rate(nightly_rate)?;
        let updated = self.repository.update_room_rate(room_id, nightly_rate).await?;
        tracing::info!(room_id, nightly_rate, "Room rate updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive rate, negative unit
    /// count or duplicate name.
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    pub async fn add_room_type(
        &self,
        new_room_type: NewRoomTypePricing,
    ) -> Result<RoomTypePricing, AppError> {
        validate_rate(new_room_type.nightly_rate)?;
        if new_room_type.available_units.is_some_and(|u| u < 0) {
            return Err(AppError::bad_request(
                "Available units must not be negative",
                json!({ "available_units": new_room_type.available_units }),
            ));
        }
        self.get_accommodation(new_room_type.accommodation_id).await?;

        if self
            .repository
            .find_room_type(new_room_type.accommodation_id, &new_room_type.name)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request(
                "Room type already exists for this accommodation",
                json!({ "name": new_room_type.name }),
            ));
        }

        self.repository.create_room_type(new_room_type).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive rate.
    /// Returns [`AppError::NotFound`] if the tier does not exist.
    pub async fn update_room_type_rate(
        &self,
        accommodation_id: i64,
        name: &str,
        nightly_rate: i64,
    ) -> Result<RoomTypePricing, AppError> {
        validate_rate(nightly_rate)?;
        self.repository
            .update_room_type_rate(accommodation_id, name, nightly_rate)
            .await
    }

    /// Loads the accommodation and the optional room or tier of a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if both a room and a tier are given.
    /// Returns [`AppError::NotFound`] if any referenced entity is missing or
    /// the room belongs to another accommodation.
    pub async fn resolve_selection(
        &self,
        accommodation_id: i64,
        room_id: Option<i64>,
        room_type: Option<&str>,
    ) -> Result<Selection, AppError> {
        if room_id.is_some() && room_type.is_some() {
            return Err(AppError::bad_request(
                "Select either a room or a room type, not both",
                json!({ "room_id": room_id, "room_type": room_type }),
            ));
        }

        let accommodation = self.get_accommodation(accommodation_id).await?;

        let room = match room_id {
            Some(id) => Some(
                self.repository
                    .find_room(id)
                    .await?
                    .filter(|room| room.accommodation_id == accommodation_id)
                    .ok_or_else(|| {
                        AppError::not_found(
                            "Room not found in this accommodation",
                            json!({ "accommodation_id": accommodation_id, "room_id": id }),
                        )
                    })?,
            ),
            None => None,
        };

        let room_type = match room_type {
            Some(name) => Some(
                self.repository
                    .find_room_type(accommodation_id, name)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(
                            "Room type not found in this accommodation",
                            json!({ "accommodation_id": accommodation_id, "room_type": name }),
                        )
                    })?,
            ),
            None => None,
        };

        Ok(Selection {
            accommodation,
            room,
            room_type,
        })
    }
}

fn validate_rate(rate: i64) -> Result<(), AppError> {
    if rate <= 0 {
        return Err(AppError::bad_request(
            "Nightly rate must be positive",
            json!({ "rate": rate }),
        ));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if capacity < 1 {
        return Err(AppError::bad_request(
            "Capacity must be at least 1",
            json!({ "capacity": capacity }),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::entities::AccommodationStatus;
    use chrono::Utc;

    pub fn accommodation(id: i64) -> Accommodation {
        Accommodation {
            id,
            host_id: 9,
            name: "Seaside".to_string(),
            city: "Busan".to_string(),
            base_rate: 50_000,
            max_guests: 6,
            status: AccommodationStatus::Published,
            created_at: Utc::now(),
        }
    }

    pub fn room(id: i64, accommodation_id: i64) -> Room {
        Room {
            id,
            accommodation_id,
            name: "Ocean view".to_string(),
            capacity: 2,
            nightly_rate: 70_000,
        }
    }

    pub fn room_type(accommodation_id: i64, units: Option<i32>) -> RoomTypePricing {
        RoomTypePricing {
            id: 5,
            accommodation_id,
            name: "Suite".to_string(),
            nightly_rate: 120_000,
            available_units: units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::repositories::MockAccommodationRepository;

    fn selection(room: Option<Room>, room_type: Option<RoomTypePricing>) -> Selection {
        Selection {
            accommodation: accommodation(1),
            room,
            room_type,
        }
    }

    #[test]
    fn test_selection_targets() {
        assert_eq!(selection(None, None).target(), BookingTarget::Accommodation(1));
        assert_eq!(selection(Some(room(3, 1)), None).target(), BookingTarget::Room(3));
        assert_eq!(
            selection(None, Some(room_type(1, None))).target(),
            BookingTarget::Accommodation(1)
        );
        assert_eq!(
            selection(None, Some(room_type(1, Some(0)))).target(),
            BookingTarget::Accommodation(1)
        );
        assert_eq!(
            selection(None, Some(room_type(1, Some(3)))).target(),
            BookingTarget::Tier {
                accommodation_id: 1,
                name: "Suite".to_string(),
                units: 3
            }
        );
    }

    #[test]
    fn test_guest_capacity() {
        assert_eq!(selection(None, None).guest_capacity(), 6);
        assert_eq!(selection(Some(room(3, 1)), None).guest_capacity(), 2);
        assert_eq!(selection(None, Some(room_type(1, None))).guest_capacity(), 6);
    }

    #[tokio::test]
    async fn test_resolve_selection_rejects_room_and_tier() {
        let mock_repo = MockAccommodationRepository::new();
        let service = AccommodationService::new(Arc::new(mock_repo));

        let result = service.resolve_selection(1, Some(3), Some("Suite")).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_resolve_selection_rejects_foreign_room() {
        let mut mock_repo = MockAccommodationRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(accommodation(id))));
        mock_repo
            .expect_find_room()
            .times(1)
            .returning(|id| Ok(Some(room(id, 2))));

        let service = AccommodationService::new(Arc::new(mock_repo));
        let result = service.resolve_selection(1, Some(3), None).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_selection_with_tier() {
        let mut mock_repo = MockAccommodationRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(accommodation(id))));
        mock_repo
            .expect_find_room_type()
            .withf(|id, name| *id == 1 && name == "Suite")
            .times(1)
            .returning(|id, _| Ok(Some(room_type(id, Some(2)))));

        let service = AccommodationService::new(Arc::new(mock_repo));
        let selection = service.resolve_selection(1, None, Some("Suite")).await.unwrap();

        assert!(selection.room.is_none());
        assert_eq!(selection.room_type.unwrap().available_units, Some(2));
    }

    #[tokio::test]
    async fn test_update_base_rate_rejects_non_positive() {
        let mut mock_repo = MockAccommodationRepository::new();
        mock_repo.expect_update_base_rate().times(0);

        let service = AccommodationService::new(Arc::new(mock_repo));
        let result = service.update_base_rate(1, 0).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_add_room_type_duplicate_name() {
        let mut mock_repo = MockAccommodationRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(accommodation(id))));
        mock_repo
            .expect_find_room_type()
            .returning(|id, _| Ok(Some(room_type(id, None))));
        mock_repo.expect_create_room_type().times(0);

        let service = AccommodationService::new(Arc::new(mock_repo));
        let result = service
            .add_room_type(NewRoomTypePricing {
                accommodation_id: 1,
                name: "Suite".to_string(),
                nightly_rate: 100_000,
                available_units: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
