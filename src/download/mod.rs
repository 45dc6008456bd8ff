//! Fetching of fragment resource bundles.
//!
//! [`download_batch`] fans out one fetch per resource on scoped threads and
//! joins them all before deciding the outcome. Failures are isolated per
//! resource, but the bundle as a whole is all-or-nothing: if any resource
//! fails, the ones that succeeded are dropped.

mod file;
#[cfg(feature = "http")]
mod http;

use std::thread;

pub use file::FileFetcher;
#[cfg(feature = "http")]
pub use http::HttpFetcher;

use crate::error::{BatchDownloadError, FetchError};
use crate::options::FetchOptions;
use crate::resources::{ResourceDescriptor, ResourceKind, ResourceType};

/// Source of raw resource bytes.
///
/// Implementations are shared between the fetch threads of one batch.
pub trait Fetcher: Sync {
    /// Fetch a text resource.
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a binary resource.
    fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Downloaded content of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcePayload {
    /// Structure text.
    Text(String),
    /// Density map bytes.
    Binary(Vec<u8>),
}

/// One successfully downloaded resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedResource {
    /// Which part of the fragment it is.
    pub kind: ResourceKind,
    /// Structure or density map.
    pub ty: ResourceType,
    /// Content.
    pub data: ResourcePayload,
}

fn fetch_one<F: Fetcher + ?Sized>(
    fetcher: &F,
    desc: &ResourceDescriptor,
) -> Result<DownloadedResource, FetchError> {
    log::debug!("fetching {}", desc.url);
    let data = match desc.ty {
        ResourceType::DensityMap => {
            ResourcePayload::Binary(fetcher.fetch_binary(&desc.url)?)
        }
        ResourceType::Structure => {
            ResourcePayload::Text(fetcher.fetch_text(&desc.url)?)
        }
    };
    Ok(DownloadedResource {
        kind: desc.kind,
        ty: desc.ty,
        data,
    })
}

/// Download every resource in `descriptors` concurrently.
///
/// Density maps are read as binary, everything else as text. All fetches
/// run to completion even when some fail.
pub fn download_batch<F: Fetcher + ?Sized>(
    fetcher: &F,
    descriptors: &[ResourceDescriptor],
) -> Result<Vec<DownloadedResource>, BatchDownloadError> {
    let outcomes: Vec<_> = thread::scope(|scope| {
        let pending: Vec<_> = descriptors
            .iter()
            .map(|desc| {
                let handle = thread::Builder::new()
                    .name(format!("fetch-{}-{}", desc.kind, desc.ty))
                    .spawn_scoped(scope, move || fetch_one(fetcher, desc));
                (desc, handle)
            })
            .collect();

        pending
            .into_iter()
            .map(|(desc, handle)| match handle {
                Ok(handle) => handle.join().unwrap_or_else(|_| {
                    Err(FetchError::new(&desc.url, "fetch thread panicked"))
                }),
                Err(e) => {
                    log::warn!(
                        "could not spawn fetch thread ({e}), fetching {} inline",
                        desc.url
                    );
                    fetch_one(fetcher, desc)
                }
            })
            .collect()
    });

    let mut resources = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(resource) => resources.push(resource),
            Err(e) => failures.push(e),
        }
    }

    if failures.is_empty() {
        Ok(resources)
    } else {
        log::debug!(
            "discarding {} downloaded resource(s) of a failed bundle",
            resources.len()
        );
        Err(BatchDownloadError { failures })
    }
}

/// Fetcher picked from the scheme of the data root.
#[derive(Debug)]
pub enum SourceFetcher {
    /// Remote data over HTTP(S).
    #[cfg(feature = "http")]
    Http(HttpFetcher),
    /// Local data tree.
    File(FileFetcher),
}

impl SourceFetcher {
    /// HTTP for `http://`/`https://` roots, the file system otherwise.
    #[must_use]
    pub fn for_root(root: &str, options: &FetchOptions) -> Self {
        if let Some(remote) = Self::remote(root, options) {
            return remote;
        }
        log::debug!("reading fragment data from the file system under {root}");
        Self::File(FileFetcher)
    }

    #[cfg(feature = "http")]
    fn remote(root: &str, options: &FetchOptions) -> Option<Self> {
        let remote = root.starts_with("http://") || root.starts_with("https://");
        remote.then(|| Self::Http(HttpFetcher::new(options.max_body_bytes)))
    }

    #[cfg(not(feature = "http"))]
    fn remote(_root: &str, _options: &FetchOptions) -> Option<Self> {
        None
    }
}

impl Fetcher for SourceFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        match self {
            #[cfg(feature = "http")]
            Self::Http(f) => f.fetch_text(url),
            Self::File(f) => f.fetch_text(url),
        }
    }

    fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            #[cfg(feature = "http")]
            Self::Http(f) => f.fetch_binary(url),
            Self::File(f) => f.fetch_binary(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{FragmentKey, ResourceLinks};
    use crate::testing::MockFetcher;

    fn bundle() -> Vec<ResourceDescriptor> {
        ResourceLinks::new("mock://data").bundle(&FragmentKey::new("AA00", "A_A"))
    }

    #[test]
    fn reads_maps_as_binary_and_structures_as_text() {
        let fetcher = MockFetcher::serving_all();
        let resources = download_batch(&fetcher, &bundle()).unwrap();
        assert_eq!(resources.len(), 7);
        for r in &resources {
            match (r.ty, &r.data) {
                (ResourceType::DensityMap, ResourcePayload::Binary(_))
                | (ResourceType::Structure, ResourcePayload::Text(_)) => {}
                other => panic!("unexpected payload {other:?}"),
            }
        }
    }

    #[test]
    fn one_failure_discards_whole_bundle() {
        let descriptors = bundle();
        let fetcher = MockFetcher::serving_all().failing(&descriptors[2].url);
        let err = download_batch(&fetcher, &descriptors).unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].url, descriptors[2].url);
        // every sibling fetch still ran
        assert_eq!(fetcher.calls(), 7);
    }

    #[test]
    fn collects_every_failure() {
        let descriptors = bundle();
        let fetcher = MockFetcher::serving_all()
            .failing(&descriptors[0].url)
            .failing(&descriptors[6].url);
        let err = download_batch(&fetcher, &descriptors).unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn empty_batch_succeeds() {
        let fetcher = MockFetcher::serving_all();
        assert!(download_batch(&fetcher, &[]).unwrap().is_empty());
    }

    #[test]
    fn plain_roots_use_file_system() {
        let fetcher = SourceFetcher::for_root("./data", &FetchOptions::default());
        assert!(matches!(fetcher, SourceFetcher::File(_)));
    }
}
