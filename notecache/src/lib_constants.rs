// relative to the data directory
pub const NOTES_TABLE_FILE: &str = "notes.toml";
pub const PROFILES_TABLE_FILE: &str = "profiles.toml";

pub const TMP_FILENAME_INFIX: &str = ".tmp.";

pub const DEFAULT_DATA_DIR_FALLBACK: &str = "notecache-data";
pub const DEFAULT_CHANGE_BUFFER_SIZE: usize = 16;
pub const MAX_CHANGE_BUFFER_SIZE: usize = 65536;

pub const MAX_USER_ID_LEN: usize = 128;

pub const APP_CONFIG_ENV_PREFIX: &str = "NOTECACHE_";
