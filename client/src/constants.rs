/// How many recent lobby events the activity feed keeps.
pub const ACTIVITY_BUFFER_SIZE: usize = 64;

pub const DEFAULT_PLAYER_RATING: i32 = 1500;
