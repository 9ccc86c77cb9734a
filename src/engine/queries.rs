use chrono::NaiveDate;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::availability::{filter_available, occupied_rooms, type_matches};
use super::{Engine, EngineError};

impl Engine {
    /// All bookings whose stay overlaps `[check_in, check_out]` under the
    /// closed predicate: `b.check_in <= check_out && check_in <= b.check_out`.
    ///
    /// Ordering of the result is unspecified. The range is not validated:
    /// an inverted range yields whatever the predicate admits (possibly
    /// nothing), never an error.
    pub async fn bookings_overlapping(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<BookingInfo>, EngineError> {
        if (check_out - check_in).num_days() > MAX_QUERY_WINDOW_DAYS {
            return Err(EngineError::LimitExceeded("query window too wide"));
        }
        // Struct literal on purpose: the query range may be inverted.
        let query = Stay { check_in, check_out };

        let mut hits = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            for b in guard.overlapping(&query) {
                hits.push(BookingInfo::from_record(guard.id, b));
            }
        }
        Ok(hits)
    }

    /// Rooms free for the whole stay: all rooms of a matching type minus the
    /// occupied set derived from the overlap query.
    pub async fn find_available(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        room_type_pattern: &str,
    ) -> Result<Vec<RoomInfo>, EngineError> {
        let overlapping = self.bookings_overlapping(check_in, check_out).await?;
        let occupied = occupied_rooms(&overlapping);

        let mut rooms = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            rooms.push(RoomInfo::from_state(&guard));
        }
        Ok(filter_available(rooms, &occupied, room_type_pattern))
    }

    /// Rooms with no booking on record at all — the interval-blind policy.
    /// Deliberately cruder than `find_available`: one booking anywhere in
    /// time disqualifies a room here.
    pub async fn find_all_available(&self) -> Result<Vec<RoomInfo>, EngineError> {
        let mut rooms = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            if guard.bookings.is_empty() {
                rooms.push(RoomInfo::from_state(&guard));
            }
        }
        Ok(rooms)
    }

    pub async fn list_rooms(&self) -> Result<Vec<RoomInfo>, EngineError> {
        let mut rooms = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            rooms.push(RoomInfo::from_state(&guard));
        }
        Ok(rooms)
    }

    pub async fn get_room(&self, id: Ulid) -> Result<RoomInfo, EngineError> {
        let rs = self
            .get_room_state(&id)
            .ok_or(EngineError::RoomNotFound(id))?;
        let guard = rs.read().await;
        Ok(RoomInfo::from_state(&guard))
    }

    pub async fn rooms_by_type(&self, pattern: &str) -> Result<Vec<RoomInfo>, EngineError> {
        let mut rooms = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            if type_matches(&guard.room_type, pattern) {
                rooms.push(RoomInfo::from_state(&guard));
            }
        }
        Ok(rooms)
    }

    /// Distinct room types, sorted. Feeds the availability filter.
    pub async fn room_types(&self) -> Result<Vec<String>, EngineError> {
        let mut types = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            if !types.contains(&guard.room_type) {
                types.push(guard.room_type.clone());
            }
        }
        types.sort();
        Ok(types)
    }

    pub async fn list_bookings(&self) -> Result<Vec<BookingInfo>, EngineError> {
        let mut bookings = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            for b in &guard.bookings {
                bookings.push(BookingInfo::from_record(guard.id, b));
            }
        }
        Ok(bookings)
    }

    pub async fn find_by_confirmation_code(
        &self,
        code: &str,
    ) -> Result<BookingInfo, EngineError> {
        let booking_id = self
            .code_to_booking
            .get(code)
            .map(|e| *e.value())
            .ok_or_else(|| EngineError::CodeNotFound(code.to_string()))?;
        let room_id = self
            .room_for_booking(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.read().await;
        guard
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .map(|b| BookingInfo::from_record(room_id, b))
            .ok_or(EngineError::BookingNotFound(booking_id))
    }

    pub async fn get_booking(&self, id: Ulid) -> Result<BookingInfo, EngineError> {
        let room_id = self
            .room_for_booking(&id)
            .ok_or(EngineError::BookingNotFound(id))?;
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = rs.read().await;
        guard
            .bookings
            .iter()
            .find(|b| b.id == id)
            .map(|b| BookingInfo::from_record(room_id, b))
            .ok_or(EngineError::BookingNotFound(id))
    }

    /// A user's booking history across all rooms.
    pub async fn bookings_for_user(
        &self,
        user_id: Ulid,
    ) -> Result<Vec<BookingInfo>, EngineError> {
        if !self.users.contains_key(&user_id) {
            return Err(EngineError::UserNotFound(user_id));
        }
        let mut bookings = Vec::new();
        for rs in self.room_states() {
            let guard = rs.read().await;
            for b in guard.bookings.iter().filter(|b| b.user_id == user_id) {
                bookings.push(BookingInfo::from_record(guard.id, b));
            }
        }
        Ok(bookings)
    }

    pub fn get_user(&self, id: Ulid) -> Result<UserInfo, EngineError> {
        self.users
            .get(&id)
            .map(|u| UserInfo::from_user(u.value()))
            .ok_or(EngineError::UserNotFound(id))
    }
}
