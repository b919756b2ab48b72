//! Hotel listing and admin maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::ports::{HotelCatalogue, HotelRepository};
use super::{Error, Hotel, HotelDraft, HotelId, HotelWithGuests, SessionClaims, map_hotel_error};

/// Implements [`HotelCatalogue`].
#[derive(Clone)]
pub struct HotelService {
    hotels: Arc<dyn HotelRepository>,
    clock: Arc<dyn Clock>,
}

impl HotelService {
    pub fn new(hotels: Arc<dyn HotelRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { hotels, clock }
    }
}

fn validate(draft: HotelDraft) -> Result<HotelDraft, Error> {
    draft.validated().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
    })
}

#[async_trait]
impl HotelCatalogue for HotelService {
    async fn list(&self) -> Result<Vec<HotelWithGuests>, Error> {
        self.hotels
            .list_with_guest_counts()
            .await
            .map_err(map_hotel_error)
    }

    async fn create(&self, actor: &SessionClaims, draft: HotelDraft) -> Result<Hotel, Error> {
        actor.require_admin()?;
        let draft = validate(draft)?;
        let hotel = self
            .hotels
            .create(&draft, self.clock.utc())
            .await
            .map_err(map_hotel_error)?;
        info!(hotel_id = %hotel.id, "hotel created");
        Ok(hotel)
    }

    async fn update(
        &self,
        actor: &SessionClaims,
        id: HotelId,
        draft: HotelDraft,
    ) -> Result<Hotel, Error> {
        actor.require_admin()?;
        let draft = validate(draft)?;
        self.hotels
            .update(id, &draft)
            .await
            .map_err(map_hotel_error)?
            .ok_or_else(|| Error::not_found(format!("hotel {id} not found")))
    }
}
