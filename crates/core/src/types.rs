/// User identities are PostgreSQL BIGINT ids issued by the upstream auth service.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
