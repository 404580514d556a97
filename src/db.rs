use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::PathBuf;

use crate::models::{
    City, Country, Currency, JobCategory, JobType, NewApplication, NewJobPost, NewPerson,
    Permission, RoleRow, WorkExperience,
};
#[cfg(test)]
use crate::models::{JobApplication, JobPost, Profile, User};

/// Every generated table, leaves first. Deletion walks this list backwards.
pub const TABLES_IN_CREATION_ORDER: [&str; 15] = [
    "roles",
    "permissions",
    "role_permissions",
    "countries",
    "cities",
    "currencies",
    "job_categories",
    "job_types",
    "users",
    "profiles",
    "social_links",
    "skills",
    "work_experiences",
    "job_posts",
    "job_applications",
];

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::configure(&conn)?;
        Ok(Self { conn, path })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "crewseed") {
            Ok(proj_dirs.data_dir().join("crewseed.db"))
        } else {
            Ok(PathBuf::from("crewseed.db"))
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE CHECK (name IN ('ADMIN', 'RECRUITER', 'CANDIDATE')),
                description TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS permissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS role_permissions (
                role_id INTEGER NOT NULL REFERENCES roles(id),
                permission_id INTEGER NOT NULL REFERENCES permissions(id),
                PRIMARY KEY (role_id, permission_id)
            );

            CREATE TABLE IF NOT EXISTS countries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS cities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                country_id INTEGER NOT NULL REFERENCES countries(id),
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS currencies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                symbol TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS job_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS job_types (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role_id INTEGER NOT NULL REFERENCES roles(id),
                is_verified INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                bio TEXT NOT NULL,
                availability TEXT NOT NULL,
                website TEXT,
                public_email TEXT,
                city_id INTEGER REFERENCES cities(id),
                country_id INTEGER REFERENCES countries(id)
            );

            CREATE TABLE IF NOT EXISTS social_links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                profile_id INTEGER NOT NULL UNIQUE REFERENCES profiles(id),
                linkedin TEXT NOT NULL,
                instagram TEXT NOT NULL,
                imdb TEXT NOT NULL,
                portfolio TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                profile_id INTEGER NOT NULL REFERENCES profiles(id),
                name TEXT NOT NULL,
                UNIQUE (profile_id, name)
            );

            CREATE TABLE IF NOT EXISTS work_experiences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                profile_id INTEGER NOT NULL REFERENCES profiles(id),
                title TEXT NOT NULL,
                project_type TEXT NOT NULL,
                year INTEGER NOT NULL,
                description TEXT
            );

            CREATE TABLE IF NOT EXISTS job_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                min_salary INTEGER NOT NULL,
                max_salary INTEGER NOT NULL,
                is_accepting INTEGER NOT NULL DEFAULT 1,
                poster_id INTEGER NOT NULL REFERENCES users(id),
                currency_id INTEGER NOT NULL REFERENCES currencies(id),
                job_type_id INTEGER NOT NULL REFERENCES job_types(id),
                category_id INTEGER NOT NULL REFERENCES job_categories(id),
                city_id INTEGER REFERENCES cities(id),
                country_id INTEGER REFERENCES countries(id),
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                CHECK (min_salary <= max_salary)
            );

            CREATE TABLE IF NOT EXISTS job_applications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_post_id INTEGER NOT NULL REFERENCES job_posts(id),
                applicant_id INTEGER NOT NULL REFERENCES users(id),
                status TEXT NOT NULL DEFAULT 'PENDING' CHECK (status IN ('PENDING', 'ACCEPTED', 'REJECTED')),
                ai_verification_status TEXT NOT NULL DEFAULT 'PENDING' CHECK (ai_verification_status IN ('PENDING', 'VERIFIED', 'REJECTED')),
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE (job_post_id, applicant_id)
            );

            CREATE INDEX IF NOT EXISTS idx_cities_country ON cities(country_id);
            CREATE INDEX IF NOT EXISTS idx_profiles_city ON profiles(city_id);
            CREATE INDEX IF NOT EXISTS idx_skills_profile ON skills(profile_id);
            CREATE INDEX IF NOT EXISTS idx_experiences_profile ON work_experiences(profile_id);
            CREATE INDEX IF NOT EXISTS idx_job_posts_poster ON job_posts(poster_id);
            CREATE INDEX IF NOT EXISTS idx_applications_applicant ON job_applications(applicant_id);
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='job_applications'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!("Database not initialized. Run 'crewseed seed' first."));
        }
        Ok(())
    }

    // --- Roles and permissions ---

    pub fn create_role(&self, name: &str, description: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO roles (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_roles(&self) -> Result<Vec<RoleRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM roles ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(RoleRow {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list roles")
    }

    pub fn create_permission(&self, name: &str, description: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO permissions (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_permissions(&self) -> Result<Vec<Permission>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM permissions ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Permission {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list permissions")
    }

    pub fn grant_permission(&self, role_id: i64, permission_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES (?1, ?2)",
            params![role_id, permission_id],
        )?;
        Ok(())
    }

    // --- Locations ---

    pub fn create_country(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO countries (name) VALUES (?1)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn find_country_by_name(&self, name: &str) -> Result<Option<Country>> {
        self.conn
            .query_row(
                "SELECT id, name, is_deleted FROM countries WHERE name = ?1",
                [name],
                Self::row_to_country,
            )
            .optional()
            .context("Failed to look up country")
    }

    pub fn list_countries(&self) -> Result<Vec<Country>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, is_deleted FROM countries ORDER BY id")?;
        let rows = stmt.query_map([], Self::row_to_country)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list countries")
    }

    fn row_to_country(row: &rusqlite::Row) -> rusqlite::Result<Country> {
        Ok(Country {
            id: row.get(0)?,
            name: row.get(1)?,
            is_deleted: row.get(2)?,
        })
    }

    pub fn create_city(&self, name: &str, country_id: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO cities (name, country_id) VALUES (?1, ?2)",
            params![name, country_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_cities(&self) -> Result<Vec<City>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, country_id, is_deleted FROM cities ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(City {
                id: row.get(0)?,
                name: row.get(1)?,
                country_id: row.get(2)?,
                is_deleted: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list cities")
    }

    // --- Catalog tables ---

    pub fn create_currency(&self, code: &str, symbol: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO currencies (code, symbol) VALUES (?1, ?2)",
            params![code, symbol],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_currencies(&self) -> Result<Vec<Currency>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, code, symbol FROM currencies ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Currency {
                id: row.get(0)?,
                code: row.get(1)?,
                symbol: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list currencies")
    }

    pub fn create_job_category(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO job_categories (name) VALUES (?1)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_job_categories(&self) -> Result<Vec<JobCategory>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM job_categories ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(JobCategory {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list job categories")
    }

    pub fn create_job_type(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO job_types (name) VALUES (?1)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_job_types(&self) -> Result<Vec<JobType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM job_types ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(JobType {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list job types")
    }

    // --- People ---

    /// Inserts the user, its profile and social links atomically. Returns (user_id, profile_id).
    pub fn create_person(&self, person: &NewPerson) -> Result<(i64, i64)> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO users (email, password_hash, role_id, is_verified)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                person.email,
                person.password_hash,
                person.role_id,
                person.is_verified
            ],
        )?;
        let user_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO profiles (user_id, first_name, last_name, bio, availability,
                                   website, public_email, city_id, country_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user_id,
                person.first_name,
                person.last_name,
                person.bio,
                person.availability,
                person.website,
                person.public_email,
                person.city_id,
                person.country_id
            ],
        )?;
        let profile_id = tx.last_insert_rowid();

        if let Some(links) = &person.social_links {
            tx.execute(
                "INSERT INTO social_links (profile_id, linkedin, instagram, imdb, portfolio)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    profile_id,
                    links.linkedin,
                    links.instagram,
                    links.imdb,
                    links.portfolio
                ],
            )?;
        }

        tx.commit()?;
        Ok((user_id, profile_id))
    }

    /// Bulk insert; a skill already attached to the profile is skipped.
    pub fn create_skills(&self, profile_id: i64, names: &[String]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO skills (profile_id, name) VALUES (?1, ?2)")?;
            for name in names {
                inserted += stmt.execute(params![profile_id, name])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn create_work_experiences(
        &self,
        profile_id: i64,
        experiences: &[WorkExperience],
    ) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO work_experiences (profile_id, title, project_type, year, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for exp in experiences {
                stmt.execute(params![
                    profile_id,
                    exp.title,
                    exp.project_type,
                    exp.year,
                    exp.description
                ])?;
            }
        }
        tx.commit()?;
        Ok(experiences.len())
    }

    // --- Job operations ---

    pub fn create_job_post(&self, job: &NewJobPost) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO job_posts (title, description, min_salary, max_salary, is_accepting,
                                    poster_id, currency_id, job_type_id, category_id,
                                    city_id, country_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                job.title,
                job.description,
                job.min_salary,
                job.max_salary,
                job.is_accepting,
                job.poster_id,
                job.currency_id,
                job.job_type_id,
                job.category_id,
                job.city_id,
                job.country_id
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // --- Applications ---

    /// Insert-new, ignore-existing: pairs already present are skipped silently.
    pub fn create_applications(&self, batch: &[NewApplication]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO job_applications
                     (job_post_id, applicant_id, status, ai_verification_status)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for app in batch {
                inserted += stmt.execute(params![
                    app.job_post_id,
                    app.applicant_id,
                    app.status.as_str(),
                    app.ai_verification_status.as_str()
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    // --- Bulk maintenance ---

    /// Deletes every row of the given tables, in the order given, in one transaction.
    pub fn delete_all(&self, tables: &[&str]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut deleted = 0;
        for table in tables {
            let table = Self::checked_table(table)?;
            deleted += tx
                .execute(&format!("DELETE FROM {}", table), [])
                .with_context(|| format!("Failed to clear {}", table))?;
            tx.execute("DELETE FROM sqlite_sequence WHERE name = ?1", [table])?;
        }
        tx.commit()?;
        Ok(deleted)
    }

    pub fn count(&self, table: &str) -> Result<i64> {
        let table = Self::checked_table(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn checked_table(table: &str) -> Result<&str> {
        TABLES_IN_CREATION_ORDER
            .iter()
            .find(|known| **known == table)
            .copied()
            .ok_or_else(|| anyhow!("Unknown table '{}'", table))
    }
}

/// Read-back queries used to check what a run wrote.
#[cfg(test)]
impl Database {
    pub fn list_role_permission_names(&self, role_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.name FROM role_permissions rp
             JOIN permissions p ON rp.permission_id = p.id
             WHERE rp.role_id = ?1
             ORDER BY p.name",
        )?;
        let rows = stmt.query_map([role_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list role permissions")
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, password_hash, role_id, is_verified, created_at
             FROM users ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                email: row.get(1)?,
                password_hash: row.get(2)?,
                role_id: row.get(3)?,
                is_verified: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list users")
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, first_name, last_name, bio, availability,
                    website, public_email, city_id, country_id
             FROM profiles ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Profile {
                id: row.get(0)?,
                user_id: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                bio: row.get(4)?,
                availability: row.get(5)?,
                website: row.get(6)?,
                public_email: row.get(7)?,
                city_id: row.get(8)?,
                country_id: row.get(9)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list profiles")
    }

    pub fn list_skills(&self, profile_id: i64) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM skills WHERE profile_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map([profile_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list skills")
    }

    pub fn list_work_experiences(&self, profile_id: i64) -> Result<Vec<WorkExperience>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, project_type, year, description
             FROM work_experiences WHERE profile_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([profile_id], |row| {
            Ok(WorkExperience {
                title: row.get(0)?,
                project_type: row.get(1)?,
                year: row.get(2)?,
                description: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list work experiences")
    }

    pub fn list_job_posts(&self) -> Result<Vec<JobPost>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, min_salary, max_salary, is_accepting, poster_id,
                    currency_id, job_type_id, category_id, city_id, country_id
             FROM job_posts ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(JobPost {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                min_salary: row.get(3)?,
                max_salary: row.get(4)?,
                is_accepting: row.get(5)?,
                poster_id: row.get(6)?,
                currency_id: row.get(7)?,
                job_type_id: row.get(8)?,
                category_id: row.get(9)?,
                city_id: row.get(10)?,
                country_id: row.get(11)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list job posts")
    }

    pub fn list_applications(&self) -> Result<Vec<JobApplication>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, job_post_id, applicant_id, status, ai_verification_status, created_at
             FROM job_applications ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(JobApplication {
                id: row.get(0)?,
                job_post_id: row.get(1)?,
                applicant_id: row.get(2)?,
                status: row.get(3)?,
                ai_verification_status: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list applications")
    }
}

/// True when the error came from a UNIQUE / FOREIGN KEY / CHECK constraint.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<rusqlite::Error>(),
            Some(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation
        )
    })
}
