//! SQLite-based store for cached responses, partitioned into generations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// A cached response body with its capture metadata.
#[derive(Debug, Clone)]
pub struct StoredResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

/// SQLite store for cached responses.
///
/// Keys are `(generation, method, url)`; writes are last-writer-wins with no
/// merge semantics. Generation purge is the only eviction mechanism.
pub struct CacheStore {
    conn: Connection,
}

impl CacheStore {
    /// Create a new store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                generation TEXT NOT NULL,
                method TEXT NOT NULL,
                url TEXT NOT NULL,
                status INTEGER NOT NULL,
                content_type TEXT,
                body BLOB NOT NULL,
                stored_at INTEGER NOT NULL,
                PRIMARY KEY (generation, method, url)
            );

            CREATE INDEX IF NOT EXISTS idx_entries_generation ON entries(generation);
            "#,
        )?;
        Ok(())
    }

    /// Store a response copy under a generation. Replaces any previous entry
    /// for the same request.
    pub fn put(
        &self,
        generation: &str,
        method: &str,
        url: &str,
        status: u16,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO entries
            (generation, method, url, status, content_type, body, stored_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![generation, method, url, status, content_type, body, now],
        )?;
        Ok(())
    }

    /// Look up a cached response.
    pub fn get(&self, generation: &str, method: &str, url: &str) -> Result<Option<StoredResponse>> {
        let row = self
            .conn
            .query_row(
                "SELECT status, content_type, body, stored_at FROM entries
                 WHERE generation = ?1 AND method = ?2 AND url = ?3",
                params![generation, method, url],
                |row| {
                    Ok((
                        row.get::<_, u16>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(status, content_type, body, stored_ms)| StoredResponse {
            status,
            content_type,
            body,
            stored_at: DateTime::from_timestamp_millis(stored_ms).unwrap_or_default(),
        }))
    }

    /// List all generation names present in the store.
    pub fn generations(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT generation FROM entries ORDER BY generation")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Failed to read generations: {}", e))
    }

    /// Delete every generation not in `keep`. Returns the deleted names.
    pub fn purge_except(&self, keep: &[&str]) -> Result<Vec<String>> {
        let doomed: Vec<String> = self
            .generations()?
            .into_iter()
            .filter(|g| !keep.contains(&g.as_str()))
            .collect();

        for generation in &doomed {
            self.conn.execute(
                "DELETE FROM entries WHERE generation = ?1",
                params![generation],
            )?;
        }
        Ok(doomed)
    }

    /// Number of entries in a generation.
    pub fn entry_count(&self, generation: &str) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE generation = ?1",
            params![generation],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Clear all cached data.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute_batch("DELETE FROM entries;")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_roundtrip() {
        let store = CacheStore::in_memory().unwrap();
        store
            .put(
                "api-v1",
                "GET",
                "https://api.example/forecast",
                200,
                Some("application/json"),
                b"{\"ok\":true}",
            )
            .unwrap();

        let hit = store
            .get("api-v1", "GET", "https://api.example/forecast")
            .unwrap()
            .unwrap();
        assert_eq!(hit.status, 200);
        assert_eq!(hit.content_type.as_deref(), Some("application/json"));
        assert_eq!(hit.body, b"{\"ok\":true}");
    }

    #[test]
    fn test_miss_on_other_generation() {
        let store = CacheStore::in_memory().unwrap();
        store
            .put("api-v1", "GET", "https://api.example/x", 200, None, b"1")
            .unwrap();
        assert!(store
            .get("api-v2", "GET", "https://api.example/x")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_put_replaces_previous_entry() {
        let store = CacheStore::in_memory().unwrap();
        store
            .put("static-v1", "GET", "https://x/app.css", 200, None, b"old")
            .unwrap();
        store
            .put("static-v1", "GET", "https://x/app.css", 200, None, b"new")
            .unwrap();

        let hit = store.get("static-v1", "GET", "https://x/app.css").unwrap().unwrap();
        assert_eq!(hit.body, b"new");
        assert_eq!(store.entry_count("static-v1").unwrap(), 1);
    }

    #[test]
    fn test_purge_except_keeps_only_current() {
        let store = CacheStore::in_memory().unwrap();
        for generation in ["static-v1", "api-v1", "static-v2", "api-v2", "legacy"] {
            store
                .put(generation, "GET", "https://x/a", 200, None, b"x")
                .unwrap();
        }

        let deleted = store.purge_except(&["static-v2", "api-v2"]).unwrap();
        assert_eq!(deleted.len(), 3);

        let remaining = store.generations().unwrap();
        assert_eq!(remaining, vec!["api-v2".to_string(), "static-v2".to_string()]);
    }

    #[test]
    fn test_purge_with_nothing_to_delete() {
        let store = CacheStore::in_memory().unwrap();
        store
            .put("api-v1", "GET", "https://x/a", 200, None, b"x")
            .unwrap();
        let deleted = store.purge_except(&["static-v1", "api-v1"]).unwrap();
        assert!(deleted.is_empty());
    }
}
