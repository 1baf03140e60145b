//! Resolves the list of images a slideshow should show.
//!
//! Candidates are tried in priority order and the first non-empty list wins:
//! an inline JSON array, then a JSON manifest, then a hardcoded fallback.
//! Every resulting path is normalized against the assets image root.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::{debug, info, warn};

use crate::constants::ASSETS_IMAGES_ROOT;
use crate::error::SourceError;

/// Fetches the raw text of a manifest.
pub trait ManifestFetcher {
    fn fetch(&self, location: &str) -> Result<String, SourceError>;
}

/// Reads `http(s)` manifests over the network, bypassing caches, and
/// everything else from disk below the site root.
pub struct HttpManifestFetcher {
    client: reqwest::blocking::Client,
    site_root: PathBuf,
}

impl HttpManifestFetcher {
    pub fn new(site_root: &Path) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| SourceError::Fetch { location: "<client>".to_string(), source })?;
        Ok(Self::with_client(site_root, client))
    }

    pub fn with_client(site_root: &Path, client: reqwest::blocking::Client) -> Self {
        Self { client, site_root: site_root.to_path_buf() }
    }
}

impl ManifestFetcher for HttpManifestFetcher {
    fn fetch(&self, location: &str) -> Result<String, SourceError> {
        if is_remote(location) {
            let response = self
                .client
                .get(location)
                .header(CACHE_CONTROL, "no-store")
                .header(PRAGMA, "no-cache")
                .send()
                .map_err(|source| SourceError::Fetch { location: location.to_string(), source })?;
            if !response.status().is_success() {
                return Err(SourceError::Status {
                    location: location.to_string(),
                    status: response.status().as_u16(),
                });
            }
            return response
                .text()
                .map_err(|source| SourceError::Fetch { location: location.to_string(), source });
        }

        let path = self.site_root.join(location);
        fs::read_to_string(&path).map_err(|source| SourceError::Io { path, source })
    }
}

pub struct SourceResolver {
    inline: Option<String>,
    manifest: Option<String>,
    fallback: Vec<String>,
}

impl SourceResolver {
    pub fn new(inline: Option<String>, manifest: Option<String>, fallback: &[&str]) -> Self {
        Self {
            inline,
            manifest,
            fallback: fallback.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Returns the normalized image list. Never fails: every rejected
    /// candidate falls through to the next one.
    pub fn resolve(&self, fetcher: &dyn ManifestFetcher) -> Vec<String> {
        let list = self
            .from_inline()
            .or_else(|| self.from_manifest(fetcher))
            .unwrap_or_else(|| {
                info!("Using {} fallback image(s)", self.fallback.len());
                self.fallback.clone()
            });
        list.iter().map(|p| normalize_path(p)).collect()
    }

    fn from_inline(&self) -> Option<Vec<String>> {
        let raw = self.inline.as_deref()?;
        match parse_list(raw) {
            Ok(list) => {
                info!("Using {} inline image(s)", list.len());
                Some(list)
            }
            Err(e) => {
                debug!("Ignoring inline image list: {}", e);
                None
            }
        }
    }

    fn from_manifest(&self, fetcher: &dyn ManifestFetcher) -> Option<Vec<String>> {
        let location = self.manifest.as_deref()?;
        match fetcher.fetch(location).and_then(|body| parse_list(&body)) {
            Ok(list) => {
                info!("Loaded {} image(s) from manifest {}", list.len(), location);
                Some(list)
            }
            Err(e) => {
                warn!("Manifest {} unusable: {}", location, e);
                None
            }
        }
    }
}

/// Parses a JSON array of paths; an empty array is rejected.
pub fn parse_list(raw: &str) -> Result<Vec<String>, SourceError> {
    let list: Vec<String> = serde_json::from_str(raw)?;
    if list.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(list)
}

pub fn is_remote(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Maps user-supplied image paths under the assets image root.
pub fn normalize_path(path: &str) -> String {
    let p = path.replace('\\', "/");
    if p.is_empty() || is_remote(&p) {
        return p;
    }
    if p.starts_with(&format!("{ASSETS_IMAGES_ROOT}/")) {
        return p;
    }
    if let Some(rest) = p.strip_prefix("./") {
        return rest.to_string();
    }
    if p.starts_with("Banners/") || !p.contains('/') {
        return format!("{ASSETS_IMAGES_ROOT}/{p}");
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    struct CountingFetcher {
        body: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl CountingFetcher {
        fn new(body: Option<&'static str>) -> Self {
            Self { body, calls: Cell::new(0) }
        }
    }

    impl ManifestFetcher for CountingFetcher {
        fn fetch(&self, location: &str) -> Result<String, SourceError> {
            self.calls.set(self.calls.get() + 1);
            self.body
                .map(str::to_string)
                .ok_or_else(|| SourceError::Status { location: location.to_string(), status: 500 })
        }
    }

    #[test]
    fn normalizes_known_shapes() {
        assert_eq!(normalize_path("Banner.jpg"), "assets/images/Banner.jpg");
        assert_eq!(normalize_path("Banners/x.jpg"), "assets/images/Banners/x.jpg");
        assert_eq!(normalize_path("./assets/images/y.jpg"), "assets/images/y.jpg");
        assert_eq!(normalize_path("https://host/z.jpg"), "https://host/z.jpg");
        assert_eq!(normalize_path("HTTP://Host/Z.jpg"), "HTTP://Host/Z.jpg");
    }

    #[test]
    fn converts_backslashes_before_matching() {
        assert_eq!(normalize_path("Banners\\b.png"), "assets/images/Banners/b.png");
        assert_eq!(normalize_path("assets\\images\\c.png"), "assets/images/c.png");
    }

    #[test]
    fn leaves_other_relative_paths_alone() {
        assert_eq!(normalize_path("photos/2024/d.jpg"), "photos/2024/d.jpg");
        assert_eq!(normalize_path("./e.jpg"), "e.jpg");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn inline_list_wins_without_fetching() {
        let fetcher = CountingFetcher::new(Some(r#"["m.jpg"]"#));
        let resolver = SourceResolver::new(Some(r#"["i.jpg"]"#.into()), Some("gallery.json".into()), &["f.jpg"]);
        assert_eq!(resolver.resolve(&fetcher), vec!["assets/images/i.jpg"]);
        assert_eq!(fetcher.calls.get(), 0);
    }

    #[test]
    fn broken_inline_falls_through_to_manifest() {
        let fetcher = CountingFetcher::new(Some(r#"["Banners/m.jpg"]"#));
        for inline in ["not json", "[]", r#"{"a":1}"#] {
            let resolver = SourceResolver::new(Some(inline.into()), Some("gallery.json".into()), &["f.jpg"]);
            assert_eq!(resolver.resolve(&fetcher), vec!["assets/images/Banners/m.jpg"]);
        }
    }

    #[test]
    fn failing_or_empty_manifest_uses_fallback() {
        let resolver = SourceResolver::new(None, Some("gallery.json".into()), &["assets/images/Rajiv-Pic.jpg"]);
        assert_eq!(resolver.resolve(&CountingFetcher::new(None)), vec!["assets/images/Rajiv-Pic.jpg"]);
        assert_eq!(resolver.resolve(&CountingFetcher::new(Some("[]"))), vec!["assets/images/Rajiv-Pic.jpg"]);
        assert_eq!(resolver.resolve(&CountingFetcher::new(Some("<html>"))), vec!["assets/images/Rajiv-Pic.jpg"]);
    }

    #[test]
    fn reads_local_manifest_relative_to_site_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets/images")).unwrap();
        fs::write(dir.path().join("assets/images/gallery.json"), r#"["one.jpg", "Banners/two.jpg"]"#).unwrap();

        let fetcher = HttpManifestFetcher::new(dir.path()).unwrap();
        let resolver = SourceResolver::new(None, Some("assets/images/gallery.json".into()), &[]);
        assert_eq!(
            resolver.resolve(&fetcher),
            vec!["assets/images/one.jpg", "assets/images/Banners/two.jpg"]
        );
    }

    /// Answers a single request with `response` and hands back the raw
    /// request, lowercased.
    fn serve_once(response: String) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/assets/images/gallery.json", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_lowercase()
        });
        (url, handle)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn local_fetcher() -> HttpManifestFetcher {
        let client = reqwest::blocking::Client::builder().no_proxy().build().unwrap();
        HttpManifestFetcher::with_client(Path::new("."), client)
    }

    #[test]
    fn remote_manifest_is_fetched_without_caching() {
        let (url, server) = serve_once(http_response("200 OK", r#"["Banners/web.jpg"]"#));
        let resolver = SourceResolver::new(None, Some(url), &["assets/images/Rajiv-Pic.jpg"]);

        assert_eq!(resolver.resolve(&local_fetcher()), vec!["assets/images/Banners/web.jpg"]);

        let request = server.join().unwrap();
        assert!(request.starts_with("get /assets/images/gallery.json"));
        assert!(request.contains("cache-control: no-store"));
        assert!(request.contains("pragma: no-cache"));
    }

    #[test]
    fn remote_error_status_falls_back() {
        let (url, server) = serve_once(http_response("404 Not Found", ""));
        assert!(matches!(local_fetcher().fetch(&url), Err(SourceError::Status { status: 404, .. })));
        server.join().unwrap();

        let (url, server) = serve_once(http_response("404 Not Found", ""));
        let resolver = SourceResolver::new(None, Some(url), &["Banners/Banner.jpg"]);
        assert_eq!(resolver.resolve(&local_fetcher()), vec!["assets/images/Banners/Banner.jpg"]);
        server.join().unwrap();
    }

    #[test]
    fn missing_local_manifest_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpManifestFetcher::new(dir.path()).unwrap();
        assert!(matches!(fetcher.fetch("nope.json"), Err(SourceError::Io { .. })));
    }
}
