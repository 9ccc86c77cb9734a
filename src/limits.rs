//! Input limits. Everything user-supplied is bounded so a single client
//! cannot grow state or the WAL without bound.

/// Max rooms in the inventory.
pub const MAX_ROOMS: usize = 10_000;

/// Max registered users.
pub const MAX_USERS: usize = 100_000;

/// Max bookings held on a single room.
pub const MAX_BOOKINGS_PER_ROOM: usize = 10_000;

/// Max length of a room type category.
pub const MAX_ROOM_TYPE_LEN: usize = 64;

/// Max length of a room description.
pub const MAX_DESCRIPTION_LEN: usize = 4_096;

/// Max length of a photo URL.
pub const MAX_URL_LEN: usize = 2_048;

/// Max length of a user name.
pub const MAX_NAME_LEN: usize = 256;

/// Max length of a user email address.
pub const MAX_EMAIL_LEN: usize = 320;

/// Max length of a user phone number.
pub const MAX_PHONE_LEN: usize = 32;

/// Max stay length in nights.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Max width of an availability/overlap query window, in days.
pub const MAX_QUERY_WINDOW_DAYS: i64 = 3_650;

/// Attempts to generate a confirmation code before giving up on collisions.
pub const MAX_CODE_ATTEMPTS: usize = 8;
