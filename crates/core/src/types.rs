/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Per-asset version number. Starts at 1 and grows without gaps.
pub type VersionNumber = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
