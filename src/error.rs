/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum EyewitnessError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Response body was not the JSON shape we expected.
    #[error("decode error: {0}")]
    Decode(String),
    /// Local file access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Missing or malformed configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Transport version string could not be parsed.
    #[error("invalid transport version '{version}': {source}")]
    Version {
        version: String,
        source: semver::Error,
    },
}
