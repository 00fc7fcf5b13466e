//! Default values shared by the config structs.

pub const DEFAULT_DB_PATH: &str = "recsync.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 8420;

pub const DEFAULT_SOURCE_BASE_URL: &str = "http://127.0.0.1:9601";
pub const DEFAULT_TARGET_BASE_URL: &str = "http://127.0.0.1:9602";
