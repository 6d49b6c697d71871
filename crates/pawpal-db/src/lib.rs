//! Storage layer for PawPal.
//!
//! Persists the owner aggregate (pets and their tasks) using `rusqlite`.
//! The scheduling engine never touches storage; callers load an
//! [`Owner`], run engine operations on it, and save it back.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Use one `Database` per thread, or wrap it in a `Mutex`.
//!
//! # Schema
//!
//! Due times are stored as TEXT in `YYYY-MM-DDTHH:MM:SS` form, without a
//! timezone. Lexicographic ordering matches chronological ordering.
//!
//! Priority and frequency are stored as text and re-parsed on load through
//! the engine's case-insensitive mapping, so rows written with older
//! spellings (e.g. `high`) load as the canonical variant.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use pawpal_core::{NewTask, Owner, OwnerState, Pet, PetId, Task, TaskId, ValidationError};
use rusqlite::{Connection, Row, params};
use thiserror::Error;

/// Storage format for due times.
const DUE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Stored state violates an engine invariant.
    #[error("invalid stored state: {0}")]
    Validation(#[from] ValidationError),
    /// Failed to parse a stored due time.
    #[error("invalid due time for task {task_id}: {value}")]
    TimestampParse {
        task_id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A row holds a value the engine cannot represent.
    #[error("invalid {table} row {id}: {message}")]
    InvalidRow {
        table: &'static str,
        id: i64,
        message: String,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A pet row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PetRow {
    id: i64,
    name: String,
    species: String,
    age: i64,
}

/// A task row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TaskRow {
    id: i64,
    pet_id: i64,
    description: String,
    duration_minutes: i64,
    priority: String,
    due_time: Option<String>,
    frequency: String,
    completed: bool,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            -- Single row holding owner-level attributes
            CREATE TABLE IF NOT EXISTS owner (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS pets (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                species TEXT NOT NULL,
                age INTEGER NOT NULL
            );

            -- position: insertion order within the owning pet
            -- due_time: 'YYYY-MM-DDTHH:MM:SS', NULL when unscheduled
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                pet_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                description TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                priority TEXT NOT NULL,
                due_time TEXT,
                frequency TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (pet_id) REFERENCES pets(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_pet ON tasks(pet_id, position);
            CREATE INDEX IF NOT EXISTS idx_tasks_due ON tasks(due_time);
            ",
        )?;
        Ok(())
    }

    /// Loads the stored owner.
    ///
    /// An empty database yields a fresh owner called `default_name`. Id
    /// counters resume past the largest stored ids.
    pub fn load_owner(&self, default_name: &str) -> Result<Owner, DbError> {
        let name = self
            .owner_name()?
            .unwrap_or_else(|| default_name.to_string());

        let mut tasks_by_pet: BTreeMap<i64, Vec<Task>> = BTreeMap::new();
        for row in self.task_rows()? {
            let pet_id = row.pet_id;
            tasks_by_pet.entry(pet_id).or_default().push(row.into_task()?);
        }

        let mut pets = Vec::new();
        for row in self.pet_rows()? {
            let tasks = tasks_by_pet.remove(&row.id).unwrap_or_default();
            pets.push(row.into_pet(tasks)?);
        }
        if let Some((pet_id, tasks)) = tasks_by_pet.into_iter().next() {
            let task_id = tasks.first().map_or(0, |task| task.id().get());
            return Err(DbError::InvalidRow {
                table: "tasks",
                id: i64::try_from(task_id).unwrap_or(i64::MAX),
                message: format!("references missing pet {pet_id}"),
            });
        }

        let owner = Owner::from_state(OwnerState { name, pets })?;
        tracing::debug!(
            pets = owner.pets().count(),
            tasks = owner.task_count(),
            next_task_id = %owner.next_task_id(),
            "loaded owner"
        );
        Ok(owner)
    }

    /// Replaces all stored state with `owner` in a single transaction.
    pub fn save_owner(&mut self, owner: &Owner) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        tx.execute("DELETE FROM pets", [])?;
        tx.execute(
            "
            INSERT INTO owner (id, name) VALUES (1, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name
            ",
            params![owner.name()],
        )?;
        {
            let mut insert_pet =
                tx.prepare("INSERT INTO pets (id, name, species, age) VALUES (?, ?, ?, ?)")?;
            let mut insert_task = tx.prepare(
                "
                INSERT INTO tasks
                    (id, pet_id, position, description, duration_minutes, priority, due_time, frequency, completed)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for pet in owner.pets() {
                let pet_id = to_sql_id(pet.id().get(), "pets")?;
                insert_pet.execute(params![pet_id, pet.name(), pet.species(), pet.age()])?;
                for (position, task) in pet.tasks().iter().enumerate() {
                    insert_task.execute(params![
                        to_sql_id(task.id().get(), "tasks")?,
                        pet_id,
                        i64::try_from(position).unwrap_or(i64::MAX),
                        task.description(),
                        task.duration_minutes(),
                        task.priority().as_str(),
                        task.due_time().map(format_due_time),
                        task.frequency().as_str(),
                        task.is_completed(),
                    ])?;
                }
            }
        }
        tx.commit()?;
        tracing::debug!(
            pets = owner.pets().count(),
            tasks = owner.task_count(),
            "saved owner"
        );
        Ok(())
    }

    fn owner_name(&self) -> Result<Option<String>, DbError> {
        let mut stmt = self.conn.prepare("SELECT name FROM owner WHERE id = 1")?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn pet_rows(&self) -> Result<Vec<PetRow>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, species, age FROM pets ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(PetRow {
                id: row.get(0)?,
                name: row.get(1)?,
                species: row.get(2)?,
                age: row.get(3)?,
            })
        })?;
        let mut pets = Vec::new();
        for row in rows {
            pets.push(row?);
        }
        Ok(pets)
    }

    fn task_rows(&self) -> Result<Vec<TaskRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, pet_id, description, duration_minutes, priority, due_time, frequency, completed
            FROM tasks
            ORDER BY pet_id ASC, position ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], task_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }
}

fn task_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        description: row.get(2)?,
        duration_minutes: row.get(3)?,
        priority: row.get(4)?,
        due_time: row.get(5)?,
        frequency: row.get(6)?,
        completed: row.get(7)?,
    })
}

impl PetRow {
    fn into_pet(self, tasks: Vec<Task>) -> Result<Pet, DbError> {
        let id = PetId::new(from_sql_id(self.id, "pets")?);
        Ok(Pet::restore(id, self.name, self.species, self.age, tasks)?)
    }
}

impl TaskRow {
    fn into_task(self) -> Result<Task, DbError> {
        let id = TaskId::new(from_sql_id(self.id, "tasks")?);
        let pet_id = PetId::new(from_sql_id(self.pet_id, "tasks")?);
        let duration_minutes =
            u32::try_from(self.duration_minutes).map_err(|_| DbError::InvalidRow {
                table: "tasks",
                id: self.id,
                message: format!("duration out of range: {}", self.duration_minutes),
            })?;
        let due_time = self
            .due_time
            .map(|value| parse_due_time(value, self.id))
            .transpose()?;

        let new = NewTask {
            description: self.description,
            duration_minutes,
            priority: self.priority.parse()?,
            due_time,
            frequency: self.frequency.parse()?,
        };
        Ok(Task::restore(id, pet_id, new, self.completed)?)
    }
}

fn to_sql_id(id: u64, table: &'static str) -> Result<i64, DbError> {
    i64::try_from(id).map_err(|_| DbError::InvalidRow {
        table,
        id: i64::MAX,
        message: format!("id {id} does not fit in an INTEGER column"),
    })
}

fn from_sql_id(id: i64, table: &'static str) -> Result<u64, DbError> {
    u64::try_from(id).map_err(|_| DbError::InvalidRow {
        table,
        id,
        message: "negative id".to_string(),
    })
}

fn parse_due_time(value: String, task_id: i64) -> Result<NaiveDateTime, DbError> {
    NaiveDateTime::parse_from_str(&value, DUE_TIME_FORMAT).map_err(|source| {
        DbError::TimestampParse {
            task_id,
            value,
            source,
        }
    })
}

fn format_due_time(due: NaiveDateTime) -> String {
    due.format(DUE_TIME_FORMAT).to_string()
}
