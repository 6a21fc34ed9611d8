//! SQLite-backed habit store.
//!
//! The persistence collaborator around the engine: systems, tasks, logs,
//! achievement state, and the XP ledger. Ownership cascades downward
//! (deleting a system removes its tasks and their logs), the reverse
//! edges are plain ids, and at most one log exists per task per date
//! (UNIQUE constraint; duplicate dates are ignored on insert). The
//! engine itself never touches this module; it is handed materialized
//! snapshots.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use crate::achievements::{Achievement, AchievementCategory, AchievementDef, Evaluation, Ledger};
use crate::error::{CoreError, DatabaseError};
use crate::habit::{HabitType, Log, LogSource, System, Task};
use crate::schedule::Frequency;
use crate::stats::{SystemSnapshot, TaskHistory};

/// Batch size for bulk log insertion. Purely bounds write amplification;
/// results are independent of batch boundaries.
pub const LOG_INSERT_CHUNK: usize = 500;

const TOTAL_XP_KEY: &str = "total_xp";

/// SQLite database for habit storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/habitloop/habitloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("habitloop.db");
        let conn = Connection::open(&path).map_err(|source| {
            CoreError::Database(DatabaseError::OpenFailed { path, source })
        })?;
        let db = Self { conn };
        db.migrate().map_err(|e| {
            CoreError::Database(DatabaseError::MigrationFailed(e.to_string()))
        })?;
        Ok(db)
    }

    /// Open an in-memory database (tests and ephemeral runs).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate().map_err(|e| {
            CoreError::Database(DatabaseError::MigrationFailed(e.to_string()))
        })?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS systems (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                category    TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL,
                created_on  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id          TEXT PRIMARY KEY,
                system_id   TEXT NOT NULL REFERENCES systems(id) ON DELETE CASCADE,
                name        TEXT NOT NULL,
                frequency   TEXT NOT NULL,
                habit_type  TEXT NOT NULL DEFAULT 'positive',
                created_at  TEXT NOT NULL,
                created_on  TEXT NOT NULL,
                cue_time    TEXT
            );

            CREATE TABLE IF NOT EXISTS logs (
                id             TEXT PRIMARY KEY,
                task_id        TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                date           TEXT NOT NULL,
                note           TEXT,
                rating         INTEGER,
                minutes        INTEGER,
                source         TEXT NOT NULL DEFAULT 'manual',
                external_value REAL,
                UNIQUE(task_id, date)
            );

            CREATE TABLE IF NOT EXISTS achievements (
                id          TEXT PRIMARY KEY,
                key         TEXT NOT NULL UNIQUE,
                name        TEXT NOT NULL,
                category    TEXT NOT NULL,
                threshold   INTEGER NOT NULL,
                progress    INTEGER NOT NULL DEFAULT 0,
                unlocked    INTEGER NOT NULL DEFAULT 0,
                unlocked_at TEXT,
                xp_reward   INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_system ON tasks(system_id);
            CREATE INDEX IF NOT EXISTS idx_logs_task_date ON logs(task_id, date);",
        )
    }

    // ---- systems ----

    pub fn insert_system(&self, system: &System) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO systems (id, name, category, created_at, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                system.id,
                system.name,
                system.category,
                system.created_at.to_rfc3339(),
                system.created_on.to_string(),
            ],
        )?;
        Ok(())
    }

    pub fn list_systems(&self) -> Result<Vec<System>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category, created_at, created_on
             FROM systems ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], row_to_system)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn get_system(&self, id: &str) -> Result<Option<System>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category, created_at, created_on
             FROM systems WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], row_to_system);
        match result {
            Ok(system) => Ok(Some(system)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a system; its tasks and their logs cascade away.
    pub fn delete_system(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM systems WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ---- tasks ----

    pub fn insert_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (id, system_id, name, frequency, habit_type, created_at, created_on, cue_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id,
                task.system_id,
                task.name,
                task.frequency.to_string(),
                format_habit_type(task.habit_type),
                task.created_at.to_rfc3339(),
                task.created_on.to_string(),
                task.cue_time,
            ],
        )?;
        Ok(())
    }

    pub fn list_tasks(&self, system_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, system_id, name, frequency, habit_type, created_at, created_on, cue_time
             FROM tasks WHERE system_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![system_id], row_to_task)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, system_id, name, frequency, habit_type, created_at, created_on, cue_time
             FROM tasks WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], row_to_task);
        match result {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ---- logs ----

    /// Insert a log. Returns false when the task already has an
    /// authoritative log on that date (the insert is ignored, keeping
    /// the one-log-per-date invariant without failing callers).
    pub fn insert_log(&self, log: &Log) -> Result<bool, DatabaseError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO logs (id, task_id, date, note, rating, minutes, source, external_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                log.id,
                log.task_id,
                log.date.to_string(),
                log.note,
                log.rating,
                log.minutes,
                format_log_source(log.source),
                log.external_value,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Bulk-insert logs in chunks of [`LOG_INSERT_CHUNK`], one
    /// transaction per chunk. Returns the number actually inserted
    /// (duplicate dates are ignored).
    pub fn insert_logs(&self, logs: &[Log]) -> Result<usize, DatabaseError> {
        let mut inserted = 0usize;
        for chunk in logs.chunks(LOG_INSERT_CHUNK) {
            let tx = self.conn.unchecked_transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT OR IGNORE INTO logs (id, task_id, date, note, rating, minutes, source, external_value)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?;
                for log in chunk {
                    inserted += stmt.execute(params![
                        log.id,
                        log.task_id,
                        log.date.to_string(),
                        log.note,
                        log.rating,
                        log.minutes,
                        format_log_source(log.source),
                        log.external_value,
                    ])?;
                }
            }
            tx.commit()?;
        }
        Ok(inserted)
    }

    pub fn delete_log(&self, task_id: &str, date: NaiveDate) -> Result<bool, DatabaseError> {
        let deleted = self.conn.execute(
            "DELETE FROM logs WHERE task_id = ?1 AND date = ?2",
            params![task_id, date.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Logs for a task, ordered by date ascending.
    pub fn list_logs(&self, task_id: &str) -> Result<Vec<Log>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, date, note, rating, minutes, source, external_value
             FROM logs WHERE task_id = ?1 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![task_id], row_to_log)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Materialize the full snapshot the engine folds over.
    pub fn snapshot(&self) -> Result<Vec<SystemSnapshot>, DatabaseError> {
        let mut snapshots = Vec::new();
        for system in self.list_systems()? {
            let mut tasks = Vec::new();
            for task in self.list_tasks(&system.id)? {
                let logs = self.list_logs(&task.id)?;
                tasks.push(TaskHistory { task, logs });
            }
            snapshots.push(SystemSnapshot { system, tasks });
        }
        Ok(snapshots)
    }

    // ---- achievements ----

    /// Idempotent first-launch seeding: insert catalog entries that are
    /// not present yet, never touching existing rows. Returns how many
    /// were newly created.
    pub fn bootstrap_achievements(&self, defs: &[AchievementDef]) -> Result<usize, DatabaseError> {
        let mut created = 0usize;
        for def in defs {
            let fresh = Achievement::from_def(def);
            created += self.conn.execute(
                "INSERT OR IGNORE INTO achievements (id, key, name, category, threshold, progress, unlocked, unlocked_at, xp_reward)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, NULL, ?6)",
                params![
                    fresh.id,
                    fresh.key,
                    fresh.name,
                    format_category(fresh.category),
                    fresh.threshold,
                    fresh.xp_reward,
                ],
            )?;
        }
        Ok(created)
    }

    pub fn list_achievements(&self) -> Result<Vec<Achievement>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, key, name, category, threshold, progress, unlocked, unlocked_at, xp_reward
             FROM achievements ORDER BY category, threshold",
        )?;
        let rows = stmt.query_map([], row_to_achievement)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Persist an evaluation pass and credit its XP to the ledger.
    /// Returns the updated ledger.
    pub fn apply_evaluation(&self, evaluation: &Evaluation) -> Result<Ledger, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "UPDATE achievements SET progress = ?2, unlocked = ?3, unlocked_at = ?4 WHERE key = ?1",
            )?;
            for achievement in &evaluation.achievements {
                stmt.execute(params![
                    achievement.key,
                    achievement.progress,
                    achievement.unlocked,
                    achievement.unlocked_at.map(|t| t.to_rfc3339()),
                ])?;
            }
        }
        let mut ledger = ledger_from(&tx)?;
        ledger.award(evaluation.xp_delta);
        tx.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![TOTAL_XP_KEY, ledger.total_xp.to_string()],
        )?;
        tx.commit()?;
        Ok(ledger)
    }

    /// The current XP ledger.
    pub fn ledger(&self) -> Result<Ledger, DatabaseError> {
        ledger_from(&self.conn)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn ledger_from(conn: &Connection) -> Result<Ledger, DatabaseError> {
    let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
    let result = stmt.query_row(params![TOTAL_XP_KEY], |row| row.get::<_, String>(0));
    match result {
        Ok(v) => Ok(Ledger::new(v.parse().unwrap_or(0))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Ledger::default()),
        Err(e) => Err(e.into()),
    }
}

// ---- row and string mapping ----

/// Parse a datetime from an RFC3339 string with fallback to now.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a calendar date with fallback to today; bad historical rows
/// must never abort a recompute.
fn parse_date_fallback(date_str: &str) -> NaiveDate {
    date_str
        .parse()
        .unwrap_or_else(|_| Utc::now().date_naive())
}

fn format_habit_type(habit_type: HabitType) -> &'static str {
    match habit_type {
        HabitType::Positive => "positive",
        HabitType::Negative => "negative",
    }
}

fn parse_habit_type(s: &str) -> HabitType {
    match s {
        "negative" => HabitType::Negative,
        _ => HabitType::Positive,
    }
}

fn format_log_source(source: LogSource) -> &'static str {
    match source {
        LogSource::Manual => "manual",
        LogSource::External => "external",
        LogSource::Synthetic => "synthetic",
    }
}

fn parse_log_source(s: &str) -> LogSource {
    match s {
        "external" => LogSource::External,
        "synthetic" => LogSource::Synthetic,
        _ => LogSource::Manual,
    }
}

fn format_category(category: AchievementCategory) -> &'static str {
    match category {
        AchievementCategory::Streak => "streak",
        AchievementCategory::Completions => "completions",
        AchievementCategory::Consistency => "consistency",
        AchievementCategory::Systems => "systems",
        AchievementCategory::WeeklyQuota => "weekly_quota",
    }
}

fn parse_category(s: &str) -> AchievementCategory {
    match s {
        "completions" => AchievementCategory::Completions,
        "consistency" => AchievementCategory::Consistency,
        "systems" => AchievementCategory::Systems,
        "weekly_quota" => AchievementCategory::WeeklyQuota,
        _ => AchievementCategory::Streak,
    }
}

fn row_to_system(row: &rusqlite::Row) -> Result<System, rusqlite::Error> {
    Ok(System {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(3)?),
        created_on: parse_date_fallback(&row.get::<_, String>(4)?),
    })
}

fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let frequency_str: String = row.get(3)?;
    // Unknown specs become the degenerate never-due day set rather than
    // poisoning the whole listing.
    let frequency = Frequency::parse(&frequency_str)
        .unwrap_or(Frequency::SpecificDays(Default::default()));
    let habit_type_str: String = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        system_id: row.get(1)?,
        name: row.get(2)?,
        frequency,
        habit_type: parse_habit_type(&habit_type_str),
        created_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
        created_on: parse_date_fallback(&row.get::<_, String>(6)?),
        cue_time: row.get(7)?,
    })
}

fn row_to_log(row: &rusqlite::Row) -> Result<Log, rusqlite::Error> {
    let source_str: String = row.get(6)?;
    Ok(Log {
        id: row.get(0)?,
        task_id: row.get(1)?,
        date: parse_date_fallback(&row.get::<_, String>(2)?),
        note: row.get(3)?,
        rating: row.get(4)?,
        minutes: row.get(5)?,
        source: parse_log_source(&source_str),
        external_value: row.get(7)?,
    })
}

fn row_to_achievement(row: &rusqlite::Row) -> Result<Achievement, rusqlite::Error> {
    let category_str: String = row.get(3)?;
    let unlocked_at: Option<String> = row.get(7)?;
    Ok(Achievement {
        id: row.get(0)?,
        key: row.get(1)?,
        name: row.get(2)?,
        category: parse_category(&category_str),
        threshold: row.get(4)?,
        progress: row.get(5)?,
        unlocked: row.get(6)?,
        unlocked_at: unlocked_at.map(|s| parse_datetime_fallback(&s)),
        xp_reward: row.get(8)?,
    })
}
