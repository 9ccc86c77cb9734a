use crate::limits::*;
use crate::model::*;

use super::EngineError;

/// Stay guard for booking creation. The inverted-range check runs before any
/// overlap scan: an inverted stay is rejected without consulting the booking
/// list. Equal check-in/check-out is accepted (single-date stay under the
/// closed predicate).
pub(crate) fn validate_stay(room_id: ulid::Ulid, stay: &Stay) -> Result<(), EngineError> {
    if stay.check_out < stay.check_in {
        return Err(EngineError::RoomUnavailable(room_id));
    }
    if stay.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(())
}

/// Reject if any existing booking on this room overlaps `stay`. Same closed
/// predicate as the store-wide overlap query, scoped to one room. Caller
/// holds the room's write lock, so check-then-insert is race-free.
pub(crate) fn check_room_free(rs: &RoomState, stay: &Stay) -> Result<(), EngineError> {
    if rs.overlapping(stay).next().is_some() {
        return Err(EngineError::RoomUnavailable(rs.id));
    }
    Ok(())
}
