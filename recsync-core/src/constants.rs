/// Recsync system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tenant used when a request carries no `X-Tenant-ID` header.
pub const DEFAULT_TENANT: &str = "default";

/// Field separator used when joining fingerprint fields (US, unit
/// separator — never legal in the upstream data).
pub const FINGERPRINT_SEPARATOR: char = '\x1f';

/// Default page size for full-collection pulls from the source system.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Default time-to-live for idempotency cache entries (seconds).
pub const DEFAULT_IDEMPOTENCY_TTL_SECS: u64 = 3600;

/// Default per-request timeout for external HTTP calls (seconds).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// How many per-record error details a full-sync step retains verbatim.
/// The total error count is always exact; only the samples are capped.
pub const STEP_ERROR_SAMPLE_CAP: usize = 10;

/// How many seconds before access-token expiry the source client refreshes.
pub const TOKEN_REFRESH_MARGIN_SECS: u64 = 60;
