use crate::error::{KpiError, Result};
use crate::model::{AuthorCommits, RepoStatsRecord, SCHEMA_VERSION};
use rusqlite::{params, Connection, OpenFlags, Row, Transaction};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default store file, created in the working directory.
pub const DEFAULT_STORE_FILE: &str = "kpi_stats.db";

const SELECT_COLUMNS: &str = "SELECT repo_name, repo_owner, stargazers, fork_count, branches, \
     commits_by_author, language, weekly_commits FROM repo_stats";

/// What `upsert` did with the incoming record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Replaced { previous_total: u64 },
    Unchanged { stored_total: u64 },
}

/// File-backed collection of [`RepoStatsRecord`] rows, at most one per
/// `repo_name`.
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open the store at `path`, creating the file if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        let mut store = Self { conn, path };
        store.initialize()?;
        Ok(store)
    }

    /// Open a store that must already exist, for read-only consumers.
    ///
    /// The file is opened read-only and never modified. A missing file, a
    /// file that is not a SQLite database, or one without the stats table
    /// all fail with [`KpiError::StoreUnavailable`].
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(KpiError::StoreUnavailable(path));
        }

        let conn = match Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .and_then(|conn| has_stats_table(&conn).map(|found| (conn, found)))
        {
            Ok((conn, true)) => conn,
            Ok((_, false)) => {
                debug!(path = %path.display(), "no repo_stats table");
                return Err(KpiError::StoreUnavailable(path));
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "unreadable store");
                return Err(KpiError::StoreUnavailable(path));
            }
        };

        let store = Self { conn, path };
        store.expect_schema_version(store.schema_version()?)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS repo_stats (
                row_id INTEGER PRIMARY KEY AUTOINCREMENT,
                repo_name TEXT NOT NULL,
                repo_owner TEXT NOT NULL,
                stargazers INTEGER NOT NULL,
                fork_count INTEGER NOT NULL,
                branches INTEGER NOT NULL,
                num_contributors INTEGER NOT NULL,
                commits_by_author TEXT NOT NULL,
                total_commits INTEGER NOT NULL,
                language TEXT,
                weekly_commits TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_repo_stats_name ON repo_stats(repo_name);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    fn expect_schema_version(&self, found: i64) -> Result<()> {
        if found == i64::from(SCHEMA_VERSION) {
            return Ok(());
        }
        Err(KpiError::SchemaMismatch {
            path: self.path.clone(),
            expected: SCHEMA_VERSION,
            found,
        })
    }

    /// Stamp a fresh file with the current version, or verify an older stamp.
    fn check_schema_version(&mut self) -> Result<()> {
        match self.schema_version()? {
            0 => {
                self.conn
                    .pragma_update(None, "user_version", SCHEMA_VERSION)?;
                Ok(())
            }
            found => self.expect_schema_version(found),
        }
    }

    /// Reconcile `record` with the stored row for the same `repo_name`.
    ///
    /// Inserts when no row exists and replaces the row only when `record`
    /// has strictly more commits; otherwise the stored row is kept as-is.
    /// Two or more stored rows for the key fail with
    /// [`KpiError::DuplicateRecord`] and nothing is written. The whole
    /// operation runs in one transaction, so readers never observe the key
    /// with zero or two rows.
    pub fn upsert(&mut self, record: &RepoStatsRecord) -> Result<UpsertOutcome> {
        let tx = self.conn.transaction()?;

        let existing = {
            let mut stmt = tx.prepare("SELECT row_id, total_commits FROM repo_stats WHERE repo_name = ?")?;
            let rows = stmt.query_map(params![record.repo_name], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, u64>(1)?))
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let outcome = match existing.as_slice() {
            [] => {
                insert_row(&tx, record)?;
                UpsertOutcome::Inserted
            }
            [(row_id, stored_total)] => {
                if record.total_commits() > *stored_total {
                    tx.execute("DELETE FROM repo_stats WHERE row_id = ?", params![row_id])?;
                    insert_row(&tx, record)?;
                    UpsertOutcome::Replaced {
                        previous_total: *stored_total,
                    }
                } else {
                    UpsertOutcome::Unchanged {
                        stored_total: *stored_total,
                    }
                }
            }
            rows => {
                return Err(KpiError::DuplicateRecord {
                    repo_name: record.repo_name.clone(),
                    count: rows.len(),
                });
            }
        };

        tx.commit()?;
        debug!(repo = %record.repo_name, ?outcome, "upsert");
        Ok(outcome)
    }

    /// Every stored row, in insertion order.
    pub fn all(&self) -> Result<Vec<RepoStatsRecord>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY row_id"))?;
        let rows = stmt.query_map([], record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn find(&self, repo_name: &str) -> Result<Vec<RepoStatsRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE repo_name = ? ORDER BY row_id"))?;
        let rows = stmt.query_map(params![repo_name], record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM repo_stats", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn has_stats_table(conn: &Connection) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'repo_stats')",
        [],
        |row| row.get(0),
    )
}

fn insert_row(tx: &Transaction<'_>, record: &RepoStatsRecord) -> Result<()> {
    let weekly = record
        .weekly_commits
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    tx.execute(
        "INSERT INTO repo_stats (repo_name, repo_owner, stargazers, fork_count, branches,
             num_contributors, commits_by_author, total_commits, language, weekly_commits)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            record.repo_name,
            record.repo_owner,
            record.stargazers,
            record.fork_count,
            record.branches,
            record.num_contributors(),
            serde_json::to_string(record.commits_by_author())?,
            record.total_commits(),
            record.language,
            weekly
        ],
    )?;
    Ok(())
}

fn json_column<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<RepoStatsRecord> {
    let authors_json: String = row.get(5)?;
    let authors: Vec<AuthorCommits> = json_column(5, &authors_json)?;
    let weekly_json: Option<String> = row.get(7)?;
    let weekly: Option<Vec<u64>> = match weekly_json {
        Some(raw) => Some(json_column(7, &raw)?),
        None => None,
    };

    Ok(RepoStatsRecord::new(row.get::<_, String>(1)?, row.get::<_, String>(0)?)
        .with_stargazers(row.get(2)?)
        .with_fork_count(row.get(3)?)
        .with_branches(row.get(4)?)
        .with_language(row.get(6)?)
        .with_weekly_commits(weekly)
        .with_commits_by_author(authors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn record(name: &str, commits: &[u64]) -> RepoStatsRecord {
        RepoStatsRecord::new("octo", name)
            .with_stargazers(5)
            .with_fork_count(1)
            .with_branches(3)
            .with_language(Some("Rust".to_string()))
            .with_weekly_commits(Some(vec![0, 2, 5]))
            .with_commits_by_author(
                commits
                    .iter()
                    .enumerate()
                    .map(|(i, c)| AuthorCommits::new(format!("dev{i}"), *c))
                    .collect(),
            )
    }

    fn open_temp() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("kpi.db")).unwrap();
        (dir, store)
    }

    fn raw_rows(store: &Store) -> Vec<(i64, String, u64)> {
        let mut stmt = store
            .conn
            .prepare("SELECT row_id, repo_name, total_commits FROM repo_stats ORDER BY row_id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap();
        rows.collect::<rusqlite::Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn first_upsert_inserts() {
        let (_dir, mut store) = open_temp();
        let outcome = store.upsert(&record("demo", &[10, 10])).unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(store.find("demo").unwrap(), vec![record("demo", &[10, 10])]);
    }

    #[test]
    fn repeated_upsert_is_idempotent() {
        let (_dir, mut store) = open_temp();
        let rec = record("demo", &[20]);
        store.upsert(&rec).unwrap();
        let before = raw_rows(&store);

        let outcome = store.upsert(&rec).unwrap();
        assert_eq!(outcome, UpsertOutcome::Unchanged { stored_total: 20 });
        assert_eq!(raw_rows(&store), before);
        assert_eq!(store.all().unwrap(), vec![rec]);
    }

    #[test]
    fn replaces_only_on_strictly_more_commits() {
        let (_dir, mut store) = open_temp();
        store.upsert(&record("demo", &[20])).unwrap();

        let outcome = store.upsert(&record("demo", &[15])).unwrap();
        assert_eq!(outcome, UpsertOutcome::Unchanged { stored_total: 20 });
        assert_eq!(store.find("demo").unwrap()[0].total_commits(), 20);

        let outcome = store.upsert(&record("demo", &[20, 5])).unwrap();
        assert_eq!(outcome, UpsertOutcome::Replaced { previous_total: 20 });
        let rows = store.find("demo").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_commits(), 25);
        assert_eq!(rows[0].num_contributors(), 2);
    }

    #[test]
    fn duplicate_rows_fail_without_mutation() {
        let (_dir, mut store) = open_temp();
        {
            let tx = store.conn.transaction().unwrap();
            insert_row(&tx, &record("dup", &[3])).unwrap();
            insert_row(&tx, &record("dup", &[4])).unwrap();
            tx.commit().unwrap();
        }
        let before = raw_rows(&store);

        let err = store.upsert(&record("dup", &[100])).unwrap_err();
        match err {
            KpiError::DuplicateRecord { repo_name, count } => {
                assert_eq!(repo_name, "dup");
                assert_eq!(count, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(raw_rows(&store), before);
    }

    #[test]
    fn keys_are_independent() {
        let (_dir, mut store) = open_temp();
        store.upsert(&record("a", &[1])).unwrap();
        store.upsert(&record("b", &[2])).unwrap();
        store.upsert(&record("a", &[5])).unwrap();
        assert_eq!(store.len().unwrap(), 2);
        let names: Vec<_> = store.all().unwrap().into_iter().map(|r| r.repo_name).collect();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn missing_weekly_commits_round_trip_as_none() {
        let (_dir, mut store) = open_temp();
        let rec = record("quiet", &[1]).with_weekly_commits(None).with_language(None);
        store.upsert(&rec).unwrap();
        assert_eq!(store.all().unwrap(), vec![rec]);
    }

    #[test]
    fn rows_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("kpi.db");
        {
            let mut store = Store::open(&path).unwrap();
            store.upsert(&record("persist", &[8])).unwrap();
        }
        let store = Store::open_existing(&path).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn open_existing_requires_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(matches!(
            Store::open_existing(&path),
            Err(KpiError::StoreUnavailable(p)) if p == path
        ));
        assert!(!path.exists());
    }

    #[test]
    fn schema_mismatch_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kpi.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("PRAGMA user_version = 99;").unwrap();
        }
        assert!(matches!(
            Store::open(&path),
            Err(KpiError::SchemaMismatch { expected: SCHEMA_VERSION, found: 99, .. })
        ));
    }

    #[test]
    fn open_existing_rejects_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        let garbage = b"this is not a sqlite database, just some text padding it out".repeat(10);
        std::fs::write(&path, &garbage).unwrap();

        assert!(matches!(
            Store::open_existing(&path),
            Err(KpiError::StoreUnavailable(p)) if p == path
        ));
        assert_eq!(std::fs::read(&path).unwrap(), garbage);
    }

    #[test]
    fn open_existing_leaves_empty_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.db");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(
            Store::open_existing(&path),
            Err(KpiError::StoreUnavailable(p)) if p == path
        ));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn open_existing_is_read_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kpi.db");
        {
            let mut store = Store::open(&path).unwrap();
            store.upsert(&record("demo", &[4])).unwrap();
        }
        let before = std::fs::read(&path).unwrap();

        let mut store = Store::open_existing(&path).unwrap();
        assert_eq!(store.all().unwrap(), vec![record("demo", &[4])]);
        assert!(matches!(store.upsert(&record("demo", &[9])), Err(KpiError::Database(_))));
        drop(store);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
