use super::Fetcher;
use crate::error::FetchError;

/// Reads resources from a local data tree. `file://` prefixes are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

fn local_path(url: &str) -> &str {
    url.strip_prefix("file://").unwrap_or(url)
}

impl Fetcher for FileFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        std::fs::read_to_string(local_path(url))
            .map_err(|e| FetchError::new(url, e.to_string()))
    }

    fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        std::fs::read(local_path(url))
            .map_err(|e| FetchError::new(url, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_local_files() {
        let dir = std::env::temp_dir()
            .join(format!("watlas-file-fetcher-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("x.pdb");
        std::fs::write(&path, "ATOM").unwrap();

        let url = format!("file://{}", path.display());
        assert_eq!(FileFetcher.fetch_text(&url).unwrap(), "ATOM");
        assert_eq!(
            FileFetcher.fetch_binary(path.to_str().unwrap()).unwrap(),
            b"ATOM"
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_names_url() {
        let err = FileFetcher.fetch_text("/nonexistent/watlas/x.pdb").unwrap_err();
        assert_eq!(err.url, "/nonexistent/watlas/x.pdb");
    }
}
