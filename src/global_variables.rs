// Junction defaults
pub const DEFAULT_LANES_PER_JUNCTION: usize = 4;
pub const DEFAULT_ARRIVAL_RATE: f64 = 10.0;
pub const DEFAULT_JUNCTION_COUNT: usize = 1;

// Dashboard bounds, checked by the front end only. The engine accepts any finite rate >= 0.
pub const UI_MIN_RATE: f64 = 0.0;
pub const UI_MAX_RATE: f64 = 25.0;
pub const UI_LANES_PER_JUNCTION: usize = 4;
pub const UI_MAX_JUNCTIONS: usize = 4;

// Rendering
pub const MAX_VEHICLE_GLYPHS: usize = 10;

// Environment
pub const ENV_SEED: &str = "JUNCTION_SEED";
