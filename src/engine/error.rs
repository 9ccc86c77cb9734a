use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    RoomNotFound(Ulid),
    UserNotFound(Ulid),
    BookingNotFound(Ulid),
    /// Confirmation-code lookup missed.
    CodeNotFound(String),
    /// The requested stay overlaps an existing booking for that room, or the
    /// stay itself is inverted (check-out before check-in).
    RoomUnavailable(Ulid),
    LimitExceeded(&'static str),
    /// The booking store could not be reached (WAL write failure). Not
    /// retried here; retry policy belongs to the caller.
    StoreUnavailable(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::RoomNotFound(id) => write!(f, "room not found: {id}"),
            EngineError::UserNotFound(id) => write!(f, "user not found: {id}"),
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::CodeNotFound(code) => {
                write!(f, "no booking with confirmation code: {code}")
            }
            EngineError::RoomUnavailable(id) => {
                write!(f, "room {id} is not available for the requested dates")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::StoreUnavailable(e) => write!(f, "booking store unavailable: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
