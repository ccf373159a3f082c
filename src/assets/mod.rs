pub mod fetcher;

use crate::{
    config::AssetConfig,
    error::{Result, VisionError},
    models::AnimationSet,
};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

pub use fetcher::{AssetFetcher, HttpAssetFetcher};

pub const CODING_FILE: &str = "coding.json";
pub const INTRO_FILE: &str = "intro.json";
pub const SPINNER_FILE: &str = "spinner.json";
pub const BACKGROUND_FILE: &str = "bg_animation.json";

/// Fixed-delay retry for decorative downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl From<&AssetConfig> for RetryPolicy {
    fn from(config: &AssetConfig) -> Self {
        Self::new(config.fetch_attempts, config.fetch_delay)
    }
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| VisionError::Asset {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| VisionError::AssetParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_from_file`], but a file that does not exist is `None`.
/// A file that exists and fails to parse is still an error.
pub fn load_optional_file(path: impl AsRef<Path>) -> Result<Option<Value>> {
    match load_from_file(path.as_ref()) {
        Ok(value) => Ok(Some(value)),
        Err(VisionError::Asset { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            log::warn!(
                "Optional animation {} not found, skipping",
                path.as_ref().display()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Downloads a JSON asset, retrying with a fixed delay. Gives up with `None`
/// once every attempt has failed; the caller just goes without the asset.
pub async fn load_from_url(
    fetcher: &dyn AssetFetcher,
    url: &str,
    policy: RetryPolicy,
) -> Option<Value> {
    let attempts = policy.attempts();

    for attempt in 1..=attempts {
        match fetcher.fetch(url).await {
            Ok(value) => {
                log::debug!("Fetched {} on attempt {}/{}", url, attempt, attempts);
                return Some(value);
            }
            Err(e) => {
                log::warn!(
                    "Attempt {}/{} to fetch {} failed: {}",
                    attempt,
                    attempts,
                    url,
                    e
                );
                if attempt < attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    log::warn!("Giving up on {} after {} attempts", url, attempts);
    None
}

impl AnimationSet {
    /// `coding.json` must be present; everything else is optional. The
    /// background comes from the configured URL when there is one, otherwise
    /// from `bg_animation.json`.
    pub async fn load(config: &AssetConfig, fetcher: &dyn AssetFetcher) -> Result<Self> {
        let dir = &config.dir;

        let coding = Some(load_from_file(dir.join(CODING_FILE))?);
        let intro = load_optional_file(dir.join(INTRO_FILE))?;
        let spinner = load_optional_file(dir.join(SPINNER_FILE))?;

        let background = match &config.background_url {
            Some(url) => load_from_url(fetcher, url, RetryPolicy::from(config)).await,
            None => load_optional_file(dir.join(BACKGROUND_FILE))?,
        };

        let set = AnimationSet {
            coding,
            intro,
            spinner,
            background,
        };
        log::info!("Animations loaded: {:?}", set.loaded_names());
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then returns `payload`.
    struct FlakyFetcher {
        failures: u32,
        calls: AtomicU32,
        payload: Value,
    }

    impl FlakyFetcher {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                payload: json!({"v": "5.7.4", "layers": []}),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssetFetcher for FlakyFetcher {
        async fn fetch(&self, _url: &str) -> Result<Value> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(VisionError::Api {
                    status: 503,
                    message: "unavailable".into(),
                })
            } else {
                Ok(self.payload.clone())
            }
        }
    }

    fn quick(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1))
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_url_succeeds_after_two_failures() {
        let fetcher = FlakyFetcher::new(2);
        let value = load_from_url(&fetcher, "http://example.test/bg.json", quick(3)).await;
        assert_eq!(value, Some(fetcher.payload.clone()));
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn test_url_unavailable_after_all_attempts() {
        let fetcher = FlakyFetcher::new(u32::MAX);
        let value = load_from_url(&fetcher, "http://example.test/bg.json", quick(3)).await;
        assert!(value.is_none());
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn test_url_zero_attempts_still_tries_once() {
        let fetcher = FlakyFetcher::new(0);
        let value = load_from_url(&fetcher, "http://example.test/bg.json", quick(0)).await;
        assert!(value.is_some());
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn test_load_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, VisionError::Asset { .. }));

        write(dir.path(), "broken.json", "{ not json");
        let broken = load_from_file(dir.path().join("broken.json")).unwrap_err();
        assert!(matches!(broken, VisionError::AssetParse { .. }));

        assert!(load_optional_file(dir.path().join("nope.json")).unwrap().is_none());
        assert!(load_optional_file(dir.path().join("broken.json")).is_err());
    }

    #[tokio::test]
    async fn test_animation_set_requires_coding() {
        let dir = tempfile::tempdir().unwrap();
        let config = AssetConfig::new().with_dir(dir.path());
        let fetcher = FlakyFetcher::new(0);

        let err = AnimationSet::load(&config, &fetcher).await.unwrap_err();
        assert!(matches!(err, VisionError::Asset { .. }));
    }

    #[tokio::test]
    async fn test_animation_set_degrades_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CODING_FILE, r#"{"nm": "coding"}"#);
        write(dir.path(), SPINNER_FILE, r#"{"nm": "spinner"}"#);
        let config = AssetConfig::new()
            .with_dir(dir.path())
            .with_background_url("http://example.test/bg.json")
            .with_retry(2, Duration::from_millis(1));
        let fetcher = FlakyFetcher::new(u32::MAX);

        let set = AnimationSet::load(&config, &fetcher).await.unwrap();
        assert_eq!(set.coding, Some(json!({"nm": "coding"})));
        assert!(set.has_spinner());
        assert!(set.intro.is_none());
        assert!(set.background.is_none());
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(set.loaded_names(), vec!["coding", "spinner"]);
    }

    #[tokio::test]
    async fn test_animation_set_background_from_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CODING_FILE, "{}");
        write(dir.path(), BACKGROUND_FILE, r#"{"nm": "bg"}"#);
        let config = AssetConfig::new().with_dir(dir.path());
        let fetcher = FlakyFetcher::new(0);

        let set = AnimationSet::load(&config, &fetcher).await.unwrap();
        assert_eq!(set.background, Some(json!({"nm": "bg"})));
        assert_eq!(fetcher.calls(), 0);
    }
}
