// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; chartpost/0.3)";
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Upstream endpoints
pub const TELEGRAM_API: &str = "https://api.telegram.org";
pub const WORLD_BANK_API: &str = "https://api.worldbank.org/v2";
pub const YAHOO_CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

// Environment keys
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_CHAT_ID: &str = "CHAT_ID";
pub const ENV_EMAIL_USER: &str = "EMAIL_USER";
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const ENV_EMAIL_TO: &str = "EMAIL_TO";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";

// Series
pub const DEFAULT_MAX_ROWS: usize = 10;

// Export
pub const DEFAULT_OUT_DIR: &str = ".";
pub const CHART_EXT: &str = "png";

// Render
pub const DPI: u32 = 120;
pub const FIG_WIDTH_IN: f32 = 10.0;
pub const BG: [u8; 3] = [0, 0, 0];
pub const FG: [u8; 3] = [255, 255, 255];
pub const GRID: [u8; 3] = [58, 58, 58];
pub const CAPTION: [u8; 3] = [170, 170, 170];
pub const POSITIVE: [u8; 3] = [0, 128, 0]; // "green"
pub const NEGATIVE: [u8; 3] = [255, 0, 0]; // "red"

// Connectivity check
pub const PING_TEXT: &str = "🔔 TEST: Verification Successful!";
