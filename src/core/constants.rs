// Action codes
pub const IDLE_ACTION: usize = 0;

// Combat
pub const UNARMED_DAMAGE: f64 = 1.0;

// Engine defaults
pub const DEFAULT_NUM_AGENTS: usize = 2;
pub const DEFAULT_MAX_HEALTH: u32 = 100;
pub const DEFAULT_MAX_WEAPON_LEVEL: u8 = 5;
pub const DEFAULT_STEP_BUDGET: u64 = 200;
pub const DEFAULT_SEED: u64 = 42;

// Rewards
pub const KILL_REWARD: f64 = 100.0;
pub const FINAL_BOSS_REWARD: f64 = 1000.0;
pub const UPGRADE_REWARD: f64 = 50.0;
pub const LOSS_REWARD: f64 = 0.0;
