use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Closed date interval `[check_in, check_out]` — date granularity, no time
/// component. Checkout day is NOT free: two stays sharing a boundary date
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        debug_assert!(check_in <= check_out, "Stay check_in must not follow check_out");
        Self { check_in, check_out }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Closed-interval overlap: a stay ending exactly on `other`'s first date
    /// (or starting on its last) counts as overlapping.
    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in <= other.check_out && other.check_in <= self.check_out
    }

    pub fn contains_date(&self, d: NaiveDate) -> bool {
        self.check_in <= d && d <= self.check_out
    }
}

/// A booking as held on its room — everything but the room id, which is the
/// key of the owning [`RoomState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Ulid,
    pub user_id: Ulid,
    pub stay: Stay,
    pub adults: u32,
    pub children: u32,
    pub confirmation_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomState {
    pub id: Ulid,
    /// Free-text category, e.g. "Deluxe".
    pub room_type: String,
    pub price_per_night: f64,
    pub description: String,
    pub photo_url: String,
    /// All bookings on this room, sorted by `stay.check_in`.
    pub bookings: Vec<BookingRecord>,
}

impl RoomState {
    pub fn new(
        id: Ulid,
        room_type: String,
        price_per_night: f64,
        description: String,
        photo_url: String,
    ) -> Self {
        Self {
            id,
            room_type,
            price_per_night,
            description,
            photo_url,
            bookings: Vec::new(),
        }
    }

    /// Insert booking maintaining sort order by check-in date.
    pub fn insert_booking(&mut self, booking: BookingRecord) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.stay.check_in, |b| b.stay.check_in)
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    /// Remove booking by id.
    pub fn remove_booking(&mut self, id: Ulid) -> Option<BookingRecord> {
        if let Some(pos) = self.bookings.iter().position(|b| b.id == id) {
            Some(self.bookings.remove(pos))
        } else {
            None
        }
    }

    /// Bookings whose stay overlaps `query` under the closed predicate.
    /// Binary search skips bookings checking in after `query.check_out`.
    pub fn overlapping(&self, query: &Stay) -> impl Iterator<Item = &BookingRecord> {
        // Everything at index >= right_bound checks in after query.check_out →
        // can't overlap a closed interval.
        let right_bound = self
            .bookings
            .partition_point(|b| b.stay.check_in <= query.check_out);
        let query_check_in = query.check_in;
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.stay.check_out >= query_check_in)
    }
}

/// A registered guest. Write-once: registration is the only mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Ulid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// The event types — flat, no nesting. This is the WAL record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    RoomAdded {
        id: Ulid,
        room_type: String,
        price_per_night: f64,
        description: String,
        photo_url: String,
    },
    UserRegistered {
        id: Ulid,
        name: String,
        email: String,
        phone: String,
    },
    BookingCreated {
        id: Ulid,
        room_id: Ulid,
        user_id: Ulid,
        stay: Stay,
        adults: u32,
        children: u32,
        confirmation_code: String,
    },
    BookingCancelled {
        id: Ulid,
        room_id: Ulid,
    },
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomInfo {
    pub id: Ulid,
    pub room_type: String,
    pub price_per_night: f64,
    pub description: String,
    pub photo_url: String,
}

impl RoomInfo {
    pub fn from_state(rs: &RoomState) -> Self {
        Self {
            id: rs.id,
            room_type: rs.room_type.clone(),
            price_per_night: rs.price_per_night,
            description: rs.description.clone(),
            photo_url: rs.photo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingInfo {
    pub id: Ulid,
    pub room_id: Ulid,
    pub user_id: Ulid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub confirmation_code: String,
}

impl BookingInfo {
    pub fn from_record(room_id: Ulid, b: &BookingRecord) -> Self {
        Self {
            id: b.id,
            room_id,
            user_id: b.user_id,
            check_in: b.stay.check_in,
            check_out: b.stay.check_out,
            adults: b.adults,
            children: b.children,
            confirmation_code: b.confirmation_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub id: Ulid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl UserInfo {
    pub fn from_user(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(check_in: &str, check_out: &str) -> BookingRecord {
        BookingRecord {
            id: Ulid::new(),
            user_id: Ulid::new(),
            stay: Stay::new(d(check_in), d(check_out)),
            adults: 2,
            children: 0,
            confirmation_code: Ulid::new().to_string(),
        }
    }

    #[test]
    fn stay_basics() {
        let s = Stay::new(d("2024-06-10"), d("2024-06-15"));
        assert_eq!(s.nights(), 5);
        assert!(s.contains_date(d("2024-06-10")));
        assert!(s.contains_date(d("2024-06-15"))); // closed on both ends
        assert!(!s.contains_date(d("2024-06-16")));
    }

    #[test]
    fn stay_overlap_boundary_inclusive() {
        let a = Stay::new(d("2024-06-10"), d("2024-06-15"));
        let b = Stay::new(d("2024-06-15"), d("2024-06-20"));
        let c = Stay::new(d("2024-06-16"), d("2024-06-20"));
        assert!(a.overlaps(&b)); // shared boundary date counts
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // adjacent next day does not
    }

    #[test]
    fn stay_overlap_containment() {
        let outer = Stay::new(d("2024-06-01"), d("2024-06-30"));
        let inner = Stay::new(d("2024-06-10"), d("2024-06-12"));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn single_day_stay_overlaps_itself() {
        let s = Stay::new(d("2024-06-10"), d("2024-06-10"));
        assert!(s.overlaps(&s));
        assert_eq!(s.nights(), 0);
    }

    #[test]
    fn booking_ordering() {
        let mut rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        rs.insert_booking(record("2024-07-01", "2024-07-05"));
        rs.insert_booking(record("2024-06-01", "2024-06-05"));
        rs.insert_booking(record("2024-06-15", "2024-06-20"));
        assert_eq!(rs.bookings[0].stay.check_in, d("2024-06-01"));
        assert_eq!(rs.bookings[1].stay.check_in, d("2024-06-15"));
        assert_eq!(rs.bookings[2].stay.check_in, d("2024-07-01"));
    }

    #[test]
    fn booking_remove() {
        let mut rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        let b = record("2024-06-01", "2024-06-05");
        let id = b.id;
        rs.insert_booking(b);
        assert_eq!(rs.bookings.len(), 1);
        rs.remove_booking(id);
        assert!(rs.bookings.is_empty());
    }

    #[test]
    fn remove_nonexistent_returns_none() {
        let mut rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        rs.insert_booking(record("2024-06-01", "2024-06-05"));
        assert!(rs.remove_booking(Ulid::new()).is_none());
        assert_eq!(rs.bookings.len(), 1);
    }

    #[test]
    fn overlapping_skips_past_and_future() {
        let mut rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        rs.insert_booking(record("2024-05-01", "2024-05-05")); // past
        rs.insert_booking(record("2024-06-12", "2024-06-18")); // hit
        rs.insert_booking(record("2024-08-01", "2024-08-05")); // future

        let query = Stay::new(d("2024-06-10"), d("2024-06-15"));
        let hits: Vec<_> = rs.overlapping(&query).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stay.check_in, d("2024-06-12"));
    }

    #[test]
    fn overlapping_boundary_touch_included() {
        // Booking ending exactly on query.check_in IS overlapping (closed interval)
        let mut rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        rs.insert_booking(record("2024-06-10", "2024-06-15"));

        let touch = Stay::new(d("2024-06-15"), d("2024-06-20"));
        assert_eq!(rs.overlapping(&touch).count(), 1);

        let clear = Stay::new(d("2024-06-16"), d("2024-06-20"));
        assert_eq!(rs.overlapping(&clear).count(), 0);
    }

    #[test]
    fn overlapping_all_past() {
        let mut rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        for m in 1..=5 {
            rs.insert_booking(record(
                &format!("2024-0{m}-01"),
                &format!("2024-0{m}-03"),
            ));
        }
        let query = Stay::new(d("2024-09-01"), d("2024-09-30"));
        assert_eq!(rs.overlapping(&query).count(), 0);
    }

    #[test]
    fn overlapping_spanning_booking() {
        let mut rs = RoomState::new(Ulid::new(), "Suite".into(), 400.0, String::new(), String::new());
        rs.insert_booking(record("2024-01-01", "2024-12-31"));
        let query = Stay::new(d("2024-06-10"), d("2024-06-11"));
        assert_eq!(rs.overlapping(&query).count(), 1);
    }

    #[test]
    fn overlapping_empty_room() {
        let rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        let query = Stay::new(d("2024-06-01"), d("2024-06-30"));
        assert_eq!(rs.overlapping(&query).count(), 0);
    }

    #[test]
    fn overlapping_inverted_query_is_not_an_error() {
        // Callers own the ordering invariant; an inverted query just filters.
        // A booking containing both endpoints still satisfies the closed
        // predicate, so the result may be non-empty.
        let mut rs = RoomState::new(Ulid::new(), "Standard".into(), 90.0, String::new(), String::new());
        rs.insert_booking(record("2024-06-01", "2024-06-30"));
        let inverted = Stay {
            check_in: d("2024-06-20"),
            check_out: d("2024-06-10"),
        };
        assert_eq!(rs.overlapping(&inverted).count(), 1);
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = Event::BookingCreated {
            id: Ulid::new(),
            room_id: Ulid::new(),
            user_id: Ulid::new(),
            stay: Stay::new(d("2024-06-16"), d("2024-06-18")),
            adults: 2,
            children: 1,
            confirmation_code: Ulid::new().to_string(),
        };
        let bytes = bincode::serialize(&event).unwrap();
        let decoded: Event = bincode::deserialize(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
