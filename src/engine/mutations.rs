use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::conflict::{check_room_free, validate_stay};
use super::{Engine, EngineError, WalCommand};

use std::sync::Arc;

use tokio::sync::{oneshot, RwLock};

impl Engine {
    pub async fn add_room(
        &self,
        room_type: String,
        price_per_night: f64,
        description: String,
        photo_url: String,
    ) -> Result<RoomInfo, EngineError> {
        if self.rooms.len() >= MAX_ROOMS {
            return Err(EngineError::LimitExceeded("too many rooms"));
        }
        if room_type.is_empty() || room_type.len() > MAX_ROOM_TYPE_LEN {
            return Err(EngineError::LimitExceeded("room type length"));
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(EngineError::LimitExceeded("description too long"));
        }
        if photo_url.len() > MAX_URL_LEN {
            return Err(EngineError::LimitExceeded("photo url too long"));
        }

        let id = Ulid::new();
        let event = Event::RoomAdded {
            id,
            room_type: room_type.clone(),
            price_per_night,
            description: description.clone(),
            photo_url: photo_url.clone(),
        };
        self.wal_append(&event).await?;

        let rs = RoomState::new(id, room_type, price_per_night, description, photo_url);
        let info = RoomInfo::from_state(&rs);
        self.rooms.insert(id, Arc::new(RwLock::new(rs)));
        Ok(info)
    }

    pub async fn register_user(
        &self,
        name: String,
        email: String,
        phone: String,
    ) -> Result<UserInfo, EngineError> {
        if self.users.len() >= MAX_USERS {
            return Err(EngineError::LimitExceeded("too many users"));
        }
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("user name length"));
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(EngineError::LimitExceeded("email too long"));
        }
        if phone.len() > MAX_PHONE_LEN {
            return Err(EngineError::LimitExceeded("phone too long"));
        }

        let id = Ulid::new();
        let event = Event::UserRegistered {
            id,
            name: name.clone(),
            email: email.clone(),
            phone: phone.clone(),
        };
        self.wal_append(&event).await?;

        let user = User { id, name, email, phone };
        let info = UserInfo::from_user(&user);
        self.users.insert(id, user);
        Ok(info)
    }

    /// Create a booking for `room_id`/`user_id` over `stay`.
    ///
    /// Validation order: room existence, user existence, stay guard
    /// (inverted range rejects as RoomUnavailable without touching the
    /// booking list), then the per-room overlap check — all under the room's
    /// write lock, so the check-then-insert sequence cannot interleave with
    /// a concurrent create for the same room.
    pub async fn create_booking(
        &self,
        room_id: Ulid,
        user_id: Ulid,
        stay: Stay,
        adults: u32,
        children: u32,
    ) -> Result<BookingInfo, EngineError> {
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        if !self.users.contains_key(&user_id) {
            return Err(EngineError::UserNotFound(user_id));
        }

        let mut guard = rs.write().await;
        if guard.bookings.len() >= MAX_BOOKINGS_PER_ROOM {
            return Err(EngineError::LimitExceeded("too many bookings on room"));
        }

        validate_stay(room_id, &stay)?;
        check_room_free(&guard, &stay)?;

        let id = Ulid::new();
        let confirmation_code = self.generate_confirmation_code()?;
        let event = Event::BookingCreated {
            id,
            room_id,
            user_id,
            stay,
            adults,
            children,
            confirmation_code,
        };
        self.persist_and_apply(&mut guard, &event).await?;

        // The record just applied is the one we report back.
        guard
            .bookings
            .iter()
            .find(|b| b.id == id)
            .map(|b| BookingInfo::from_record(room_id, b))
            .ok_or(EngineError::BookingNotFound(id))
    }

    /// Remove a booking, freeing its room for that interval.
    pub async fn cancel_booking(&self, booking_id: Ulid) -> Result<Ulid, EngineError> {
        let (room_id, mut guard) = self.resolve_booking_write(&booking_id).await?;
        let event = Event::BookingCancelled {
            id: booking_id,
            room_id,
        };
        self.persist_and_apply(&mut guard, &event).await?;
        Ok(room_id)
    }

    /// Opaque unique booking token. ULIDs make collisions vanishingly rare;
    /// the retry loop makes uniqueness unconditional against the live index.
    fn generate_confirmation_code(&self) -> Result<String, EngineError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = Ulid::new().to_string();
            if !self.code_to_booking.contains_key(&code) {
                return Ok(code);
            }
        }
        Err(EngineError::LimitExceeded("confirmation code collisions"))
    }

    /// Compact the WAL by rewriting it with only the events needed to
    /// recreate the current state.
    pub async fn compact_wal(&self) -> Result<(), EngineError> {
        let mut events = Vec::new();

        for user in self.users.iter() {
            let u = user.value();
            events.push(Event::UserRegistered {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                phone: u.phone.clone(),
            });
        }

        for rs in self.room_states() {
            let guard = rs.read().await;
            events.push(Event::RoomAdded {
                id: guard.id,
                room_type: guard.room_type.clone(),
                price_per_night: guard.price_per_night,
                description: guard.description.clone(),
                photo_url: guard.photo_url.clone(),
            });
            for b in &guard.bookings {
                events.push(Event::BookingCreated {
                    id: b.id,
                    room_id: guard.id,
                    user_id: b.user_id,
                    stay: b.stay,
                    adults: b.adults,
                    children: b.children,
                    confirmation_code: b.confirmation_code.clone(),
                });
            }
        }

        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Compact { events, response: tx })
            .await
            .map_err(|_| EngineError::StoreUnavailable("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::StoreUnavailable("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))
    }

    pub async fn wal_appends_since_compact(&self) -> u64 {
        let (tx, rx) = oneshot::channel();
        if self
            .wal_tx
            .send(WalCommand::AppendsSinceCompact { response: tx })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}
