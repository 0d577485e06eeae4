//! Dependency-lock upload encodings.
//!
//! Two HTTP client generations expect different multipart call shapes. The
//! encoding is chosen once, when [`ClientOptions`](crate::ClientOptions) is
//! built, never per request.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use semver::Version;

use crate::{EyewitnessError, Result};

/// Form field carrying the lock file.
pub const LOCK_FIELD: &str = "lock";

/// First transport version using the parts-list encoding.
const MODERN_TRANSPORT_BOUNDARY: Version = Version::new(6, 0, 0);

/// Returns `true` when `version` orders strictly below `6.0.0`.
pub fn is_legacy_transport(version: &str) -> Result<bool> {
    let parsed = Version::parse(version.trim()).map_err(|source| EyewitnessError::Version {
        version: version.to_owned(),
        source,
    })?;
    Ok(parsed < MODERN_TRANSPORT_BOUNDARY)
}

/// Body encoding for the lock-file upload.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LockEncoding {
    /// Single `lock` file field streamed straight from the open file handle.
    FieldHandle,
    /// File contents read up front and sent as a typed `lock` part.
    #[default]
    MultipartParts,
}

impl LockEncoding {
    pub fn for_transport_version(version: &str) -> Result<Self> {
        if is_legacy_transport(version)? {
            Ok(Self::FieldHandle)
        } else {
            Ok(Self::MultipartParts)
        }
    }

    pub(crate) async fn encode(self, path: &Path) -> Result<Form> {
        let part = match self {
            Self::FieldHandle => {
                let file = tokio::fs::File::open(path).await?;
                Part::stream(file).file_name(lock_file_name(path))
            }
            Self::MultipartParts => {
                let contents = tokio::fs::read(path).await?;
                Part::bytes(contents)
                    .file_name(lock_file_name(path))
                    .mime_str("application/json")
                    .map_err(EyewitnessError::Transport)?
            }
        };
        Ok(Form::new().part(LOCK_FIELD, part))
    }
}

fn lock_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| LOCK_FIELD.to_owned())
}
