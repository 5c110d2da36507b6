/// Balance granted when nothing (or garbage) is stored
pub const INITIAL_BALANCE: u64 = 10_000;

/// Stake selected when a session opens
pub const DEFAULT_STAKE: u64 = 100;

/// Quick-select stake amounts
pub const STAKE_PRESETS: [u64; 4] = [100, 500, 1_000, 5_000];

/// Maximum number of rounds kept in history
pub const HISTORY_LIMIT: usize = 20;

/// Consecutive wins required for a streak bonus
pub const WIN_STREAK_THRESHOLD: u32 = 3;

/// Win-streak bonus as a share of the stake, in basis points (20%)
pub const WIN_STREAK_BONUS_BPS: u64 = 2_000;

/// Consecutive losses required for a consolation payment
pub const LOSS_STREAK_THRESHOLD: u32 = 5;

/// Fixed consolation paid after a losing streak
pub const LOSS_STREAK_CONSOLATION: u64 = 500;

/// 100% in basis points
pub const BASIS_POINTS: u64 = 10_000;

/// Dice tumble time before the faces are drawn
pub const ROLL_DELAY_MS: u64 = 1_500;

/// Time the revealed faces stay on screen before the round settles
pub const REVEAL_DELAY_MS: u64 = 500;

/// Store key holding the JSON-encoded balance
pub const BALANCE_KEY: &str = "balance";

/// Store key holding the JSON-encoded history
pub const HISTORY_KEY: &str = "history";
