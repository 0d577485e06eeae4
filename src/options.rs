use crate::LockEncoding;

/// Symfony security advisory endpoint used by the dependency-lock check.
pub const DEFAULT_DEPENDENCY_CHECK_URL: &str = "https://security.symfony.com/check_lock";

/// Configures HTTP timeouts, retry behavior and the dependency-lock upload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total number of ping attempts, including the first one.
    pub max_attempts: usize,
    /// Linear backoff unit in milliseconds. Attempt `n` waits `n * unit`.
    pub retry_backoff_ms: u64,
    /// Enables verbose connection logging in the transport.
    pub debug: bool,
    /// Endpoint receiving the lock-file upload.
    pub dependency_check_url: String,
    /// Body encoding for the lock-file upload.
    pub lock_encoding: LockEncoding,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 15_000,
            timeout_ms: 15_000,
            max_attempts: 3,
            retry_backoff_ms: 1_000,
            debug: false,
            dependency_check_url: DEFAULT_DEPENDENCY_CHECK_URL.to_owned(),
            lock_encoding: LockEncoding::default(),
        }
    }
}
