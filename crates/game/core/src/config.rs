/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Maximum number of entries retained by the message log.
    pub log_capacity: usize,
    /// Sight radius of the player, in tiles.
    pub fov_radius: i32,
    /// Number of log lines visible at once in the message log view.
    pub log_window: usize,
    /// Action points the player gets every turn.
    pub action_points: i32,
    /// How far a directional item travels before it stops.
    pub targeting_range: i32,
    /// Dungeon generation attempts before falling back to a single room.
    pub max_generation_attempts: u32,
}

impl GameConfig {
    // ===== compile-time limits =====
    /// Smallest map side the generator accepts; smaller requests are clamped.
    pub const MIN_MAP_SIDE: u32 = 5;
    /// Room placements tried per generation attempt.
    pub const MAX_ROOM_PLACEMENTS: u32 = 200;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LOG_CAPACITY: usize = 100;
    pub const DEFAULT_FOV_RADIUS: i32 = 8;
    pub const DEFAULT_LOG_WINDOW: usize = 10;
    pub const DEFAULT_ACTION_POINTS: i32 = 3;
    pub const DEFAULT_TARGETING_RANGE: i32 = 8;
    pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 8;

    pub fn new() -> Self {
        Self {
            log_capacity: Self::DEFAULT_LOG_CAPACITY,
            fov_radius: Self::DEFAULT_FOV_RADIUS,
            log_window: Self::DEFAULT_LOG_WINDOW,
            action_points: Self::DEFAULT_ACTION_POINTS,
            targeting_range: Self::DEFAULT_TARGETING_RANGE,
            max_generation_attempts: Self::DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }

    pub fn with_fov_radius(mut self, fov_radius: i32) -> Self {
        self.fov_radius = fov_radius;
        self
    }

    pub fn with_log_capacity(mut self, log_capacity: usize) -> Self {
        self.log_capacity = log_capacity;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
