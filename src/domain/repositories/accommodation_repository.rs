//! Repository trait for accommodations, rooms and room-type tiers.

use crate::domain::entities::{
    Accommodation, NewAccommodation, NewRoom, NewRoomTypePricing, Room, RoomTypePricing,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the bookable inventory.
///
/// Rate updates only touch the inventory tables; bookings keep their frozen rate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccommodationRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_accommodation: NewAccommodation)
    -> Result<Accommodation, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Accommodation>, AppError>;

    /// Sets the base nightly rate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    async fn update_base_rate(&self, id: i64, base_rate: i64) -> Result<Accommodation, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    async fn create_room(&self, new_room: NewRoom) -> Result<Room, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_room(&self, room_id: i64) -> Result<Option<Room>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_rooms(&self, accommodation_id: i64) -> Result<Vec<Room>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the room does not exist.
    async fn update_room_rate(&self, room_id: i64, nightly_rate: i64) -> Result<Room, AppError>;

    /// Adds a tier. Tier names are unique per accommodation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the name is already used.
    /// Returns [`AppError::NotFound`] if the accommodation does not exist.
    async fn create_room_type(
        &self,
        new_room_type: NewRoomTypePricing,
    ) -> Result<RoomTypePricing, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_room_type(
        &self,
        accommodation_id: i64,
        name: &str,
    ) -> Result<Option<RoomTypePricing>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_room_types(&self, accommodation_id: i64)
    -> Result<Vec<RoomTypePricing>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the tier does not exist.
    async fn update_room_type_rate(
        &self,
        accommodation_id: i64,
        name: &str,
        nightly_rate: i64,
    ) -> Result<RoomTypePricing, AppError>;
}
