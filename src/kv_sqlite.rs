use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, params};

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// Redis-shaped sets and hashes kept in two SQLite tables.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)
            .map_err(|err| Error::store(&format!("open sqlite db {}", path.display()), err))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|err| Error::store("open in-memory sqlite db", err))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv_sets (
            key TEXT NOT NULL,
            member TEXT NOT NULL,
            PRIMARY KEY (key, member)
        );
        CREATE TABLE IF NOT EXISTS kv_hashes (
            key TEXT NOT NULL,
            field TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (key, field)
        );
        "#,
    )
    .map_err(|err| Error::store("create sqlite schema", err))?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn sadd(&mut self, key: &str, member: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO kv_sets(key, member) VALUES (?1, ?2)",
            params![key, member],
        )?;
        Ok(())
    }

    fn smembers(&mut self, key: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT member FROM kv_sets WHERE key = ?1 ORDER BY member")?;
        let rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn replace_hash(&mut self, key: &str, fields: &[(&str, String)]) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM kv_hashes WHERE key = ?1", params![key])?;
        for (field, value) in fields {
            tx.execute(
                "INSERT INTO kv_hashes(key, field, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key, field) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, field, value, updated_at],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn hgetall(&mut self, key: &str) -> Result<BTreeMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT field, value FROM kv_hashes WHERE key = ?1")?;
        let rows = stmt.query_map(params![key], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut out = BTreeMap::new();
        for row in rows {
            let (field, value) = row?;
            out.insert(field, value);
        }
        Ok(out)
    }

    fn hlen(&mut self, key: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM kv_hashes WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_members_are_unique() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.sadd("matches", "1").unwrap();
        store.sadd("matches", "1").unwrap();
        store.sadd("matches", "2").unwrap();
        assert_eq!(store.smembers("matches").unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn replace_hash_drops_old_fields() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .replace_hash("h", &[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();
        store.replace_hash("h", &[("a", "3".to_string())]).unwrap();
        let fields = store.hgetall("h").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("a").map(String::as_str), Some("3"));
        assert_eq!(store.hlen("h").unwrap(), 1);
        assert_eq!(store.hlen("missing").unwrap(), 0);
    }

    #[test]
    fn opens_file_backed_db() {
        let dir = std::env::temp_dir().join(format!("wc_snapshot_kv_{}", std::process::id()));
        let path = dir.join("store.sqlite");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.sadd("matches", "7").unwrap();
        }
        let mut store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.smembers("matches").unwrap(), vec!["7"]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
