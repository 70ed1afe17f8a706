//! Per-origin color preferences and the recent-colors list.
//!
//! Both records live in an external key-value store under two top-level
//! keys. Nothing here caches them: every operation reads the current record,
//! and writes replace the whole record (last writer wins).

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::{any::type_name_of_val, fmt};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tint_model::{HexColor, Origin};
use tracing::{debug, warn};

use crate::error::Result;

/// Record holding the origin -> color map.
pub const COLORS_KEY: &str = "navyColorsByOrigin";

/// Record holding the most-recent-first color list.
pub const RECENTS_KEY: &str = "recentNavyColors";

/// Maximum number of entries kept in the recents list.
pub const RECENT_COLORS_LIMIT: usize = 7;

/// Durable, asynchronous key-value backend.
///
/// Failures are reported as [`TintError::StoreUnavailable`](crate::TintError::StoreUnavailable).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Typed access to the origin color map and the recents list.
pub struct OriginColorStore<S>
where
    S: KeyValueStore + ?Sized,
{
    backend: Arc<S>,
}

impl<S> Clone for OriginColorStore<S>
where
    S: KeyValueStore + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<S> fmt::Debug for OriginColorStore<S>
where
    S: KeyValueStore + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginColorStore")
            .field("backend", &type_name_of_val(self.backend.as_ref()))
            .finish()
    }
}

impl<S> OriginColorStore<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(backend: Arc<S>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<S> {
        &self.backend
    }

    /// The color map exactly as stored. A record that is not a JSON object
    /// reads as empty.
    async fn raw_color_map(&self) -> Result<Map<String, Value>> {
        match self.backend.get(COLORS_KEY).await? {
            None => Ok(Map::new()),
            Some(Value::Object(entries)) => Ok(entries),
            Some(_) => {
                warn!(key = COLORS_KEY, "ignoring malformed color map record");
                Ok(Map::new())
            }
        }
    }

    /// Every origin with an explicit preference.
    ///
    /// Entries whose key or color does not parse are skipped here but stay
    /// in the stored record.
    pub async fn all_colors(&self) -> Result<BTreeMap<Origin, HexColor>> {
        let mut colors = BTreeMap::new();
        for (origin, color) in self.raw_color_map().await? {
            let parsed = Origin::parse(&origin).ok().zip(
                color.as_str().and_then(|raw| HexColor::parse(raw).ok()),
            );
            match parsed {
                Some((origin, color)) => {
                    colors.insert(origin, color);
                }
                None => {
                    warn!(%origin, value = %color, "skipping invalid stored color entry");
                }
            }
        }

        Ok(colors)
    }

    /// Stored color for `origin`, or `None` when the default applies.
    pub async fn get_color_for_origin(
        &self,
        origin: &Origin,
    ) -> Result<Option<HexColor>> {
        let mut colors = self.all_colors().await?;
        Ok(colors.remove(origin))
    }

    /// Upsert (`Some`) or delete (`None`) the preference for `origin`, then
    /// persist the whole map.
    ///
    /// Only keys that resolve to `origin` are touched; every other entry is
    /// written back verbatim, including ones this version cannot parse.
    pub async fn set_color_for_origin(
        &self,
        origin: &Origin,
        color: Option<&HexColor>,
    ) -> Result<()> {
        let mut record = self.raw_color_map().await?;
        record.retain(|key, _| Origin::parse(key).ok().as_ref() != Some(origin));
        if let Some(color) = color {
            record.insert(
                origin.as_str().to_string(),
                Value::String(color.as_str().to_string()),
            );
        }
        self.backend.set(COLORS_KEY, Value::Object(record)).await?;

        debug!(%origin, color = ?color.map(HexColor::as_str), "stored origin color");
        Ok(())
    }

    /// Recent colors, most recent first, without duplicates.
    pub async fn get_recent_colors(&self) -> Result<Vec<HexColor>> {
        let Some(raw) = self.backend.get(RECENTS_KEY).await? else {
            return Ok(Vec::new());
        };

        let Value::Array(items) = raw else {
            warn!(key = RECENTS_KEY, "ignoring malformed recents record");
            return Ok(Vec::new());
        };

        let mut recents: Vec<HexColor> = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str().and_then(|raw| HexColor::parse(raw).ok()) {
                Some(color) if !recents.contains(&color) => recents.push(color),
                Some(_) => {}
                None => {
                    warn!(value = %item, "dropping invalid recent color");
                }
            }
        }
        recents.truncate(RECENT_COLORS_LIMIT);

        Ok(recents)
    }

    /// Move `color` to the front of the recents list, dropping any earlier
    /// occurrence and anything past [`RECENT_COLORS_LIMIT`].
    ///
    /// Returns the resulting list. No write happens when the list is
    /// already in that state.
    pub async fn push_recent_color(
        &self,
        color: &HexColor,
    ) -> Result<Vec<HexColor>> {
        let current = self.get_recent_colors().await?;

        let mut next = Vec::with_capacity(RECENT_COLORS_LIMIT);
        next.push(color.clone());
        next.extend(current.iter().filter(|c| *c != color).cloned());
        next.truncate(RECENT_COLORS_LIMIT);

        if next == current {
            debug!(%color, "recent colors unchanged");
            return Ok(next);
        }

        let record = Value::Array(
            next.iter()
                .map(|c| Value::String(c.as_str().to_string()))
                .collect(),
        );
        self.backend.set(RECENTS_KEY, record).await?;

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> OriginColorStore<MemoryStore> {
        OriginColorStore::new(Arc::new(MemoryStore::new()))
    }

    fn hex(raw: &str) -> HexColor {
        HexColor::parse(raw).unwrap()
    }

    fn origin(raw: &str) -> Origin {
        Origin::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn missing_origin_is_absent_not_error() {
        let store = store();
        let found = store
            .get_color_for_origin(&origin("https://a.com"))
            .await
            .expect("read");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = store();
        let a = origin("https://a.com");
        store
            .set_color_for_origin(&a, Some(&hex("#FF0000")))
            .await
            .unwrap();
        assert_eq!(
            store.get_color_for_origin(&a).await.unwrap(),
            Some(hex("#ff0000"))
        );

        let raw = store.backend().get(COLORS_KEY).await.unwrap();
        assert_eq!(raw, Some(json!({ "https://a.com": "#ff0000" })));
    }

    #[tokio::test]
    async fn origins_are_isolated() {
        let store = store();
        let a = origin("https://a.com");
        let b = origin("https://b.com");

        store
            .set_color_for_origin(&b, Some(&hex("#00ff00")))
            .await
            .unwrap();
        store
            .set_color_for_origin(&a, Some(&hex("#ff0000")))
            .await
            .unwrap();

        assert_eq!(
            store.get_color_for_origin(&b).await.unwrap(),
            Some(hex("#00ff00"))
        );
    }

    #[tokio::test]
    async fn clearing_removes_only_that_origin() {
        let store = store();
        let a = origin("https://a.com");
        let b = origin("https://b.com");
        store
            .set_color_for_origin(&a, Some(&hex("#111111")))
            .await
            .unwrap();
        store
            .set_color_for_origin(&b, Some(&hex("#222222")))
            .await
            .unwrap();

        store.set_color_for_origin(&a, None).await.unwrap();

        let all = store.all_colors().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get(&b), Some(&hex("#222222")));
    }

    #[tokio::test]
    async fn recents_are_bounded_deduplicated_and_mru() {
        let store = store();
        let pushes = [
            "#aaaaaa", "#bbbbbb", "#aaaaaa", "#cccccc", "#dddddd", "#eeeeee",
            "#ffffff", "#111111", "#222222",
        ];
        for raw in pushes {
            store.push_recent_color(&hex(raw)).await.unwrap();
        }

        let recents: Vec<String> = store
            .get_recent_colors()
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            recents,
            [
                "#222222", "#111111", "#ffffff", "#eeeeee", "#dddddd",
                "#cccccc", "#aaaaaa",
            ]
        );
    }

    #[tokio::test]
    async fn pushing_front_color_is_a_noop() {
        let store = store();
        store.push_recent_color(&hex("#123456")).await.unwrap();
        store.push_recent_color(&hex("#654321")).await.unwrap();
        let before = store.get_recent_colors().await.unwrap();

        let after = store.push_recent_color(&hex("#654321")).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(store.get_recent_colors().await.unwrap(), before);
    }

    #[tokio::test]
    async fn legacy_records_are_canonicalized_on_read() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(RECENTS_KEY, json!(["#ABC", "#aabbcc", "bogus", 42, "#123"]))
            .await
            .unwrap();
        backend
            .set(
                COLORS_KEY,
                json!({ "https://a.com": "#ABC", "": "#fff", "https://b.com": 7 }),
            )
            .await
            .unwrap();
        let store = OriginColorStore::new(backend);

        let recents = store.get_recent_colors().await.unwrap();
        assert_eq!(recents, vec![hex("#aabbcc"), hex("#112233")]);

        let colors = store.all_colors().await.unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors.get(&origin("https://a.com")), Some(&hex("#aabbcc")));
    }

    #[tokio::test]
    async fn writes_keep_entries_that_do_not_parse() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                COLORS_KEY,
                json!({
                    "null": "#010101",
                    "HTTPS://A.com": "#020202",
                    "https://b.com": "not-a-color",
                    "https://c.com": "#030303",
                }),
            )
            .await
            .unwrap();
        let store = OriginColorStore::new(backend.clone());

        store
            .set_color_for_origin(&origin("https://a.com"), Some(&hex("#0a0a0a")))
            .await
            .unwrap();

        let raw = backend.get(COLORS_KEY).await.unwrap();
        assert_eq!(
            raw,
            Some(json!({
                "null": "#010101",
                "https://a.com": "#0a0a0a",
                "https://b.com": "not-a-color",
                "https://c.com": "#030303",
            }))
        );

        store
            .set_color_for_origin(&origin("https://c.com"), None)
            .await
            .unwrap();
        let colors = store.all_colors().await.unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors.get(&origin("https://a.com")), Some(&hex("#0a0a0a")));
        let raw = backend.get(COLORS_KEY).await.unwrap().unwrap();
        assert_eq!(raw["null"], "#010101");
    }

    #[tokio::test]
    async fn malformed_records_read_as_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(RECENTS_KEY, json!("nope")).await.unwrap();
        backend.set(COLORS_KEY, json!([1, 2])).await.unwrap();
        let store = OriginColorStore::new(backend);

        assert!(store.get_recent_colors().await.unwrap().is_empty());
        assert!(store.all_colors().await.unwrap().is_empty());
    }
}
