//! Application-level configuration constants.

// Participant limits
pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 10;
pub const MAX_NAME_LENGTH: usize = 20;

// Spin physics: power = duration / DIVISOR * MULTIPLIER + U[0,1) * VARIANCE
pub const SPIN_MIN_SECONDS: f64 = 3.0;
pub const SPIN_MAX_SECONDS: f64 = 30.0;
pub const POWER_DURATION_DIVISOR: f64 = 4.0;
pub const POWER_BASE_MULTIPLIER: f64 = 2000.0;
pub const POWER_RANDOM_VARIANCE: f64 = 1000.0;

// Timing (milliseconds)
pub const UPDATE_INTERVAL_MS: u32 = 16;
pub const DRAMA_DURATION_MS: u32 = 1000;
/// Share of the drama window spent on the drum roll; the rest is "calculating".
pub const DRUM_ROLL_SHARE: f64 = 0.8;
pub const RESULT_DISPLAY_MS: u32 = 2000;
pub const ERROR_DISMISS_MS: u32 = 1000;
pub const HINT_DISPLAY_MS: u32 = 10_000;
pub const HINT_CYCLE_MS: u32 = 30_000;
/// How often the hint schedule is re-evaluated.
pub const HINT_TICK_MS: u32 = 500;

// Pointer (bottle opener) geometry, measured on the source artwork
pub const POINTER_BASE_ANGLE_DEG: f64 = -177.8;
pub const POINTER_TIP_DISTANCE_PX: f64 = 221.9;
pub const POINTER_AXIS_X_RATIO: f64 = 0.5524;
pub const POINTER_AXIS_Y_RATIO: f64 = 0.4669;
pub const POINTER_OFFSET_X_PX: f64 = -7.5;
pub const POINTER_OFFSET_Y_PX: f64 = 4.8;
pub const POINTER_INITIAL_ROTATION_DEG: f64 = -90.0;

// Wheel layout
pub const LABEL_RADIUS_PX: f64 = 120.0;
pub const SELECTED_PAYER_COLOR: &str = "#F7DC6F";
pub const ROULETTE_SIZE_MOBILE_PX: f64 = 320.0;
pub const ROULETTE_SIZE_DESKTOP_PX: f64 = 384.0;
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

// UI text
pub const PAGE_TITLE: &str = "BarTab Roulette";
pub const PAGE_SUBTITLE: &str = "🍻 Who buys the next round? 🍻";
pub const PAGE_FOOTER: &str = "Please drink responsibly 🍻";
pub const HINT_TEXT: &str = "Tap the center to spin the roulette!";
pub const INSUFFICIENT_PARTICIPANTS: &str = "Add at least two participants to spin the roulette";
pub const SPINNING_TEXT: &str = "Spinning...";
