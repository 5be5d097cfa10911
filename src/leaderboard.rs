//! Top-5 high score table backed by a remote store
//!
//! The table lives in a PostgREST-style `scores` table (`{name, score}`),
//! read ordered by score descending. Every failure is soft: the game keeps
//! running with an empty list and a log line.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StoreError};

/// Rows shown and the size of the qualification window
pub const MAX_ENTRIES: usize = 5;
/// Names are cut to this many characters before insert
pub const MAX_NAME_LEN: usize = 10;
/// Stored when the player submits a blank name
pub const DEFAULT_NAME: &str = "Anonymous";

/// Environment variable holding the store's base URL
pub const URL_VAR: &str = "EMBER_DASH_STORE_URL";
/// Environment variable holding the store's anon API key
pub const KEY_VAR: &str = "EMBER_DASH_STORE_KEY";

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

impl LeaderboardEntry {
    /// Build a row the way it is written to the store: trimmed name (blank
    /// becomes [`DEFAULT_NAME`]) cut to [`MAX_NAME_LEN`] chars, integer score.
    pub fn normalized(name: &str, score: f64) -> Self {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            trimmed.chars().take(MAX_NAME_LEN).collect()
        };
        let score = if score.is_finite() {
            score.trunc() as i64
        } else {
            0
        };
        Self { name, score }
    }
}

/// Whether `score` would make the top [`MAX_ENTRIES`] given the current rows
pub fn qualifies(entries: &[LeaderboardEntry], score: i64) -> bool {
    if score < 0 {
        return false;
    }
    if entries.len() < MAX_ENTRIES {
        return true;
    }
    entries
        .iter()
        .map(|e| e.score)
        .min()
        .is_none_or(|lowest| score > lowest)
}

/// Text lines for the leaderboard panel
pub fn render_lines(entries: &[LeaderboardEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No scores yet.".to_string()];
    }

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(format!("Top {MAX_ENTRIES} High Scores"));
    for (rank, entry) in entries.iter().enumerate() {
        lines.push(format!("{}. {}: {}", rank + 1, entry.name, entry.score));
    }
    lines
}

/// Backend holding the scores table
#[allow(async_fn_in_trait)]
pub trait ScoreStore {
    /// Up to `limit` rows, highest score first
    async fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;

    async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), StoreError>;
}

/// Store kept in process memory. Used by the native runner and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RefCell<Vec<LeaderboardEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(rows: Vec<LeaderboardEntry>) -> Self {
        Self {
            rows: RefCell::new(rows),
        }
    }

    /// Total rows stored, including ones below the top window
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }
}

impl ScoreStore for MemoryStore {
    async fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut rows = self.rows.borrow().clone();
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        self.rows.borrow_mut().push(entry.clone());
        Ok(())
    }
}

/// Connection settings for the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project base URL, without trailing slash
    pub url: String,
    /// Anon key sent as both `apikey` and bearer token
    pub key: String,
}

impl StoreConfig {
    /// Validate raw values: an `https://` URL and a non-empty key
    pub fn new(url: Option<&str>, key: Option<&str>) -> Result<Self, ConfigError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)?;
        let key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingKey)?;

        if !url.starts_with("https://") || url.len() == "https://".len() {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    /// Read the store settings from the environment.
    ///
    /// Natively the variables are read at runtime; in the browser they are
    /// baked in at build time.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(URL_VAR).ok();
        let key = std::env::var(KEY_VAR).ok();
        Self::new(url.as_deref(), key.as_deref())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(
            option_env!("EMBER_DASH_STORE_URL"),
            option_env!("EMBER_DASH_STORE_KEY"),
        )
    }

    /// Endpoint for inserts into the `scores` table
    pub fn scores_url(&self) -> String {
        format!("{}/rest/v1/scores", self.url)
    }

    /// Endpoint for the top-`limit` query
    pub fn top_scores_url(&self, limit: usize) -> String {
        format!(
            "{}?select=name,score&order=score.desc&limit={limit}",
            self.scores_url()
        )
    }
}

/// Leaderboard client used by the game shell.
///
/// Built without a store when configuration is missing; every call is then a
/// quiet no-op for the rest of the session.
#[derive(Debug)]
pub struct Leaderboard<S> {
    store: Option<S>,
}

impl<S: ScoreStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self { store: Some(store) }
    }

    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Enabled when the store could be configured, disabled otherwise
    pub fn from_config(
        config: Result<StoreConfig, ConfigError>,
        connect: impl FnOnce(StoreConfig) -> S,
    ) -> Self {
        match config {
            Ok(config) => {
                log::info!("Leaderboard store at {}", config.url);
                Self::new(connect(config))
            }
            Err(e) => {
                log::warn!("Leaderboard disabled: {e}");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&S, StoreError> {
        self.store.as_ref().ok_or(StoreError::Disabled)
    }

    /// Top rows straight from the store, capped at [`MAX_ENTRIES`]
    pub async fn try_fetch_top(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut rows = self.store()?.fetch_top(MAX_ENTRIES).await?;
        rows.truncate(MAX_ENTRIES);
        Ok(rows)
    }

    /// Top rows, or an empty list if the store is disabled or failing
    pub async fn fetch_top(&self) -> Vec<LeaderboardEntry> {
        match self.try_fetch_top().await {
            Ok(rows) => {
                log::info!("Fetched {} leaderboard rows", rows.len());
                rows
            }
            Err(StoreError::Disabled) => Vec::new(),
            Err(e) => {
                log::error!("Error fetching scores: {e}");
                Vec::new()
            }
        }
    }

    /// Whether a final score earns a spot. Always false when disabled.
    pub async fn is_high_score(&self, score: u64) -> bool {
        if self.store.is_none() {
            return false;
        }
        let rows = self.fetch_top().await;
        qualifies(&rows, i64::try_from(score).unwrap_or(i64::MAX))
    }

    /// Record a score. Returns whether the row reached the store.
    pub async fn submit(&self, name: &str, score: u64) -> bool {
        let entry = LeaderboardEntry::normalized(name, score as f64);
        match self.try_submit(&entry).await {
            Ok(()) => {
                log::info!("Score saved: {} {}", entry.name, entry.score);
                true
            }
            Err(StoreError::Disabled) => false,
            Err(e) => {
                log::error!("Error saving score: {e}");
                false
            }
        }
    }

    async fn try_submit(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        self.store()?.insert(entry).await
    }
}

#[cfg(target_arch = "wasm32")]
pub use rest::RestStore;

#[cfg(target_arch = "wasm32")]
mod rest {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    use super::{LeaderboardEntry, ScoreStore, StoreConfig};
    use crate::error::StoreError;

    /// PostgREST client using the browser's `fetch`
    #[derive(Debug, Clone)]
    pub struct RestStore {
        config: StoreConfig,
    }

    impl RestStore {
        pub fn new(config: StoreConfig) -> Self {
            Self { config }
        }

        fn headers(&self) -> Result<Headers, StoreError> {
            let headers = Headers::new().map_err(js_error)?;
            headers.set("apikey", &self.config.key).map_err(js_error)?;
            headers
                .set("Authorization", &format!("Bearer {}", self.config.key))
                .map_err(js_error)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
            Ok(headers)
        }

        async fn send(&self, url: &str, init: &RequestInit) -> Result<Response, StoreError> {
            let request = Request::new_with_str_and_init(url, init).map_err(js_error)?;
            let window =
                web_sys::window().ok_or_else(|| StoreError::Request("no window".to_string()))?;

            let value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_error)?;
            let response: Response = value.dyn_into().map_err(js_error)?;

            if !response.ok() {
                return Err(StoreError::Status(response.status()));
            }
            Ok(response)
        }
    }

    impl ScoreStore for RestStore {
        async fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
            let init = RequestInit::new();
            init.set_method("GET");
            init.set_mode(RequestMode::Cors);
            init.set_headers(&self.headers()?);

            let response = self.send(&self.config.top_scores_url(limit), &init).await?;
            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            let body = text
                .as_string()
                .ok_or_else(|| StoreError::Decode("body is not text".to_string()))?;

            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
        }

        async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
            let body =
                serde_json::to_string(entry).map_err(|e| StoreError::Decode(e.to_string()))?;
            let headers = self.headers()?;
            headers
                .set("Prefer", "return=minimal")
                .map_err(js_error)?;

            let init = RequestInit::new();
            init.set_method("POST");
            init.set_mode(RequestMode::Cors);
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&body));

            self.send(&self.config.scores_url(), &init).await?;
            Ok(())
        }
    }

    fn js_error(value: JsValue) -> StoreError {
        StoreError::Request(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use proptest::prelude::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    fn entry(name: &str, score: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
        }
    }

    fn full_table() -> Vec<LeaderboardEntry> {
        vec![
            entry("ada", 900),
            entry("bob", 700),
            entry("cy", 500),
            entry("dee", 300),
            entry("eve", 100),
        ]
    }

    /// Store that refuses every call
    struct DownStore;

    impl ScoreStore for DownStore {
        async fn fetch_top(&self, _limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
            Err(StoreError::Status(503))
        }

        async fn insert(&self, _entry: &LeaderboardEntry) -> Result<(), StoreError> {
            Err(StoreError::Request("connection reset".to_string()))
        }
    }

    /// Future that is pending once and wakes itself before resolving
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                return Poll::Ready(());
            }
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }

    /// Store whose calls suspend before answering, like a network round trip
    struct SlowStore(MemoryStore);

    impl ScoreStore for SlowStore {
        async fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
            YieldOnce(false).await;
            self.0.fetch_top(limit).await
        }

        async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
            YieldOnce(false).await;
            self.0.insert(entry).await
        }
    }

    #[test]
    fn test_normalized_name_rules() {
        assert_eq!(LeaderboardEntry::normalized("  Sam  ", 12.9).name, "Sam");
        assert_eq!(LeaderboardEntry::normalized("   ", 1.0).name, DEFAULT_NAME);
        assert_eq!(
            LeaderboardEntry::normalized("Bartholomew the Great", 1.0).name,
            "Bartholome"
        );
        // Char-based cut, never splits a code point
        assert_eq!(
            LeaderboardEntry::normalized("ééééééééééé", 1.0).name.chars().count(),
            MAX_NAME_LEN
        );
    }

    #[test]
    fn test_normalized_score_is_integer() {
        assert_eq!(LeaderboardEntry::normalized("a", 12.9).score, 12);
        assert_eq!(LeaderboardEntry::normalized("a", f64::NAN).score, 0);
    }

    #[test]
    fn test_qualifies_full_table() {
        let table = full_table();
        assert!(!qualifies(&table, 100));
        assert!(qualifies(&table, 101));
        assert!(!qualifies(&table, -1));
    }

    #[test]
    fn test_render_lines() {
        assert_eq!(render_lines(&[]), vec!["No scores yet."]);
        let lines = render_lines(&full_table()[..2]);
        assert_eq!(lines, vec!["Top 5 High Scores", "1. ada: 900", "2. bob: 700"]);
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            StoreConfig::new(None, Some("k")),
            Err(ConfigError::MissingUrl)
        );
        assert_eq!(
            StoreConfig::new(Some("https://x.example"), Some("  ")),
            Err(ConfigError::MissingKey)
        );
        assert_eq!(
            StoreConfig::new(Some("http://x.example"), Some("k")),
            Err(ConfigError::InvalidUrl("http://x.example".to_string()))
        );

        let config = StoreConfig::new(Some("https://x.example/"), Some("k")).unwrap();
        assert_eq!(config.scores_url(), "https://x.example/rest/v1/scores");
        assert_eq!(
            config.top_scores_url(5),
            "https://x.example/rest/v1/scores?select=name,score&order=score.desc&limit=5"
        );
    }

    #[test]
    fn test_memory_store_orders_and_limits() {
        let store = MemoryStore::with_entries(vec![entry("low", 1), entry("high", 50)]);
        block_on(store.insert(&entry("mid", 20))).unwrap();
        let top = block_on(store.fetch_top(2)).unwrap();
        assert_eq!(top, vec![entry("high", 50), entry("mid", 20)]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_disabled_leaderboard_is_noop() {
        let board: Leaderboard<MemoryStore> =
            Leaderboard::from_config(StoreConfig::new(None, None), |_| MemoryStore::new());
        assert!(!board.is_enabled());
        assert!(block_on(board.fetch_top()).is_empty());
        assert!(!block_on(board.is_high_score(10_000)));
        assert!(!block_on(board.submit("sam", 10)));
    }

    #[test]
    fn test_failing_store_is_soft() {
        let board = Leaderboard::new(DownStore);
        assert!(block_on(board.fetch_top()).is_empty());
        // Empty list means any score qualifies
        assert!(block_on(board.is_high_score(0)));
        assert!(!block_on(board.submit("sam", 10)));
    }

    #[test]
    fn test_disabled_store_reports_disabled() {
        let board: Leaderboard<MemoryStore> = Leaderboard::disabled();
        assert_eq!(block_on(board.try_fetch_top()), Err(StoreError::Disabled));
        assert_eq!(
            block_on(board.try_submit(&entry("sam", 1))),
            Err(StoreError::Disabled)
        );
        assert_eq!(StoreError::Disabled.to_string(), "score store is disabled");
    }

    #[test]
    fn test_try_fetch_top_passes_store_errors_through() {
        let board = Leaderboard::new(DownStore);
        assert_eq!(block_on(board.try_fetch_top()), Err(StoreError::Status(503)));
    }

    #[test]
    fn test_suspending_store_completes() {
        let board = Leaderboard::new(SlowStore(MemoryStore::new()));
        assert!(block_on(board.submit("ada", 30)));
        assert!(block_on(board.submit("bob", 70)));
        assert_eq!(
            block_on(board.fetch_top()),
            vec![entry("bob", 70), entry("ada", 30)]
        );
        assert!(block_on(board.is_high_score(1)));
    }

    #[test]
    fn test_submit_normalizes() {
        let board = Leaderboard::new(MemoryStore::new());
        assert!(block_on(board.submit("", 42)));
        let top = block_on(board.fetch_top());
        assert_eq!(top, vec![entry(DEFAULT_NAME, 42)]);
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_string(&entry("sam", 7)).unwrap();
        assert_eq!(json, r#"{"name":"sam","score":7}"#);
        let rows: Vec<LeaderboardEntry> =
            serde_json::from_str(r#"[{"name":"a","score":3},{"name":"b","score":1}]"#).unwrap();
        assert_eq!(rows.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_short_table_accepts_any_non_negative(
            scores in prop::collection::vec(0i64..10_000, 0..MAX_ENTRIES),
            s in 0i64..10_000,
        ) {
            let table: Vec<_> = scores.iter().map(|&v| entry("x", v)).collect();
            prop_assert!(qualifies(&table, s));
        }

        #[test]
        fn prop_full_table_needs_to_beat_lowest(
            scores in prop::collection::vec(0i64..10_000, MAX_ENTRIES),
            s in 0i64..10_000,
        ) {
            let table: Vec<_> = scores.iter().map(|&v| entry("x", v)).collect();
            let lowest = scores.iter().copied().min().unwrap_or(0);
            prop_assert_eq!(qualifies(&table, s), s > lowest);
        }
    }
}
