//! Crate-level error types.

use std::fmt;

use crate::renderer::RendererError;
use crate::resources::{FragmentKey, ResourceKind, ResourceType};

/// A single resource could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    /// Location that was requested.
    pub url: String,
    /// Transport or status failure description.
    pub reason: String,
}

impl FetchError {
    /// Build an error for `url` with a human-readable reason.
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot download {}: {}", self.url, self.reason)
    }
}

impl std::error::Error for FetchError {}

/// One or more resources of a single fragment bundle failed to download.
///
/// Resources of the same bundle that did download are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDownloadError {
    /// Every individual failure, in descriptor order.
    pub failures: Vec<FetchError>,
}

impl BatchDownloadError {
    /// One message per failed resource.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for BatchDownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} resource(s) failed to download", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchDownloadError {}

/// Errors produced by the watlas-sync crate.
#[derive(Debug)]
pub enum AtlasError {
    /// Loading fragment bundles failed. Holds one message per failed
    /// resource across every fragment of the call. Fragments not mentioned
    /// may have loaded successfully.
    Load(Vec<String>),
    /// The renderer rejected an operation.
    Renderer(RendererError),
    /// The fragment has no display state.
    NotDisplayed(FragmentKey),
    /// The kind/type combination does not name a resource.
    InvalidResource {
        /// Requested kind.
        kind: ResourceKind,
        /// Requested type.
        ty: ResourceType,
    },
    /// Iso level is NaN or infinite.
    InvalidIso(f64),
    /// No instance is bound under this id.
    UnknownInstance(String),
    /// An instance is already bound under this id.
    InstanceAlreadyBound(String),
    /// A previous call on the instance panicked while holding its lock.
    LockPoisoned(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl AtlasError {
    /// Human-readable messages describing the failure.
    ///
    /// Aggregate load failures expand to one message per failed resource.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Load(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(messages) => {
                write!(f, "failed to load resources: {}", messages.join("; "))
            }
            Self::Renderer(e) => write!(f, "renderer error: {e}"),
            Self::NotDisplayed(key) => {
                write!(f, "fragment {key} is not displayed")
            }
            Self::InvalidResource { kind, ty } => {
                write!(f, "there is no {ty} resource of kind {kind}")
            }
            Self::InvalidIso(iso) => {
                write!(f, "iso level {iso} is not a finite number")
            }
            Self::UnknownInstance(id) => {
                write!(f, "instance with id {id} is not bound")
            }
            Self::InstanceAlreadyBound(id) => {
                write!(f, "instance with id {id} is already bound")
            }
            Self::LockPoisoned(id) => {
                write!(f, "instance {id} is unusable after a panic")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Renderer(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RendererError> for AtlasError {
    fn from(e: RendererError) -> Self {
        Self::Renderer(e)
    }
}

impl From<BatchDownloadError> for AtlasError {
    fn from(e: BatchDownloadError) -> Self {
        Self::Load(e.messages())
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_url() {
        let e = FetchError::new("./data/AA00/A_A/x.pdb", "404 Not Found");
        assert_eq!(
            e.to_string(),
            "Cannot download ./data/AA00/A_A/x.pdb: 404 Not Found"
        );
    }

    #[test]
    fn batch_error_expands_to_messages() {
        let batch = BatchDownloadError {
            failures: vec![FetchError::new("a", "x"), FetchError::new("b", "y")],
        };
        let err = AtlasError::from(batch);
        assert_eq!(
            err.messages(),
            vec!["Cannot download a: x", "Cannot download b: y"]
        );
    }

    #[test]
    fn non_load_errors_yield_single_message() {
        let err = AtlasError::UnknownInstance("viewer".to_owned());
        assert_eq!(err.messages(), vec!["instance with id viewer is not bound"]);
    }
}
