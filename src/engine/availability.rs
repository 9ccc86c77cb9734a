use std::collections::HashSet;

use ulid::Ulid;

use crate::model::*;

// ── Availability derivation ──────────────────────────────────────
//
// A room is available for a queried stay iff no booking on it overlaps the
// stay. The derivation runs on the output of the overlap query: collect the
// distinct room ids the overlapping bookings reference (the occupied set),
// then keep every room whose type matches and whose id is not in that set.

/// Distinct room ids referenced by the given bookings.
pub fn occupied_rooms(bookings: &[BookingInfo]) -> HashSet<Ulid> {
    bookings.iter().map(|b| b.room_id).collect()
}

/// Room-type filter: case-sensitive substring match. An empty pattern or
/// `"*"` matches every type.
pub fn type_matches(room_type: &str, pattern: &str) -> bool {
    pattern.is_empty() || pattern == "*" || room_type.contains(pattern)
}

/// Keep rooms whose type matches `pattern` and whose id is not occupied.
pub fn filter_available(
    rooms: Vec<RoomInfo>,
    occupied: &HashSet<Ulid>,
    pattern: &str,
) -> Vec<RoomInfo> {
    rooms
        .into_iter()
        .filter(|r| type_matches(&r.room_type, pattern) && !occupied.contains(&r.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    fn room(room_type: &str) -> RoomInfo {
        RoomInfo {
            id: Ulid::new(),
            room_type: room_type.into(),
            price_per_night: 120.0,
            description: String::new(),
            photo_url: String::new(),
        }
    }

    fn booking_on(room_id: Ulid) -> BookingInfo {
        BookingInfo {
            id: Ulid::new(),
            room_id,
            user_id: Ulid::new(),
            check_in: d("2024-06-10"),
            check_out: d("2024-06-15"),
            adults: 2,
            children: 0,
            confirmation_code: Ulid::new().to_string(),
        }
    }

    #[test]
    fn occupied_set_is_distinct() {
        let rid = Ulid::new();
        let other = Ulid::new();
        let bookings = vec![booking_on(rid), booking_on(rid), booking_on(other)];
        let occupied = occupied_rooms(&bookings);
        assert_eq!(occupied.len(), 2);
        assert!(occupied.contains(&rid));
        assert!(occupied.contains(&other));
    }

    #[test]
    fn occupied_set_empty_for_no_bookings() {
        assert!(occupied_rooms(&[]).is_empty());
    }

    #[test]
    fn type_match_is_substring_and_case_sensitive() {
        assert!(type_matches("Deluxe King", "Deluxe"));
        assert!(type_matches("Deluxe", "Deluxe"));
        assert!(!type_matches("Deluxe", "deluxe"));
        assert!(!type_matches("Standard", "Deluxe"));
    }

    #[test]
    fn empty_and_star_patterns_are_wildcards() {
        assert!(type_matches("Suite", ""));
        assert!(type_matches("Suite", "*"));
    }

    #[test]
    fn filter_drops_occupied_and_mismatched() {
        let deluxe = room("Deluxe");
        let standard = room("Standard");
        let occupied_deluxe = room("Deluxe");

        let mut occupied = HashSet::new();
        occupied.insert(occupied_deluxe.id);

        let rooms = vec![deluxe.clone(), standard, occupied_deluxe];
        let got = filter_available(rooms, &occupied, "Deluxe");
        assert_eq!(got, vec![deluxe]);
    }

    #[test]
    fn wildcard_filters_only_by_occupancy() {
        let a = room("Deluxe");
        let b = room("Standard");
        let occupied: HashSet<Ulid> = [b.id].into_iter().collect();
        let got = filter_available(vec![a.clone(), b], &occupied, "*");
        assert_eq!(got, vec![a]);
    }

    #[test]
    fn empty_occupied_set_returns_all_matching() {
        let rooms = vec![room("Standard"), room("Standard")];
        let got = filter_available(rooms.clone(), &HashSet::new(), "Standard");
        assert_eq!(got, rooms);
    }
}
