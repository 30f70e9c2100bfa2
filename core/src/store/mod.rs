//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The engine runs entirely in memory; the store receives the finished
//! `SimOutput` once and writes it, with its run record, inside a single
//! transaction.

use crate::{
    catalog::CourseCatalog,
    config::SimConfig,
    error::{SimError, SimResult},
    records::SimOutput,
};
use rusqlite::{params, Connection};

mod cohort;
mod completion;
mod enrollment;
mod integrity;
mod student;

pub use cohort::{CohortRetention, RetentionByAttendance};
pub use enrollment::EnrollmentRow;
pub use integrity::IntegrityReport;

/// Row counts written by one bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub students: usize,
    pub enrollments: usize,
    pub course_enrollments: usize,
    pub completions: usize,
    pub cohorts: usize,
}

/// The tables a run populates, in referential load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Runs,
    Courses,
    Students,
    Enrollments,
    CourseEnrollments,
    Completions,
    Cohorts,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Runs => "sim_run",
            Self::Courses => "courses",
            Self::Students => "students",
            Self::Enrollments => "enrollments",
            Self::CourseEnrollments => "course_enrollments",
            Self::Completions => "completions",
            Self::Cohorts => "cohorts",
        }
    }
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    pub fn open(path: &str) -> SimResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let conn = Connection::open(path)?;
        // WAL only matters for real files; ignore databases that refuse it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_schema.sql"))?;
        Ok(())
    }

    // ── Reference data ─────────────────────────────────────────

    /// Seed the course catalog. Existing course ids are left untouched.
    pub fn seed_course_catalog(&self, catalog: &CourseCatalog) -> SimResult<usize> {
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO courses (course_id, course_code, course_name, credit_hours)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut inserted = 0;
        for c in catalog.courses() {
            inserted += stmt.execute(params![
                c.course_id as i64,
                &c.course_code,
                &c.course_name,
                c.credit_hours
            ])?;
        }
        log::debug!("courses: seeded {inserted} of {}", catalog.len());
        Ok(inserted)
    }

    // ── Bulk load ──────────────────────────────────────────────

    /// Write every row of a run in referential order inside one
    /// transaction. Any failure rolls the whole load back.
    pub fn bulk_write(&mut self, output: &SimOutput) -> SimResult<WriteReport> {
        self.load(None, output)
    }

    /// `bulk_write` plus the `sim_run` record, committed together. A failed
    /// load leaves no run record behind.
    pub fn bulk_write_run(
        &mut self,
        run_id: &str,
        config: &SimConfig,
        version: &str,
        output: &SimOutput,
    ) -> SimResult<WriteReport> {
        self.load(Some((run_id, config, version)), output)
    }

    fn load(
        &mut self,
        run: Option<(&str, &SimConfig, &str)>,
        output: &SimOutput,
    ) -> SimResult<WriteReport> {
        let tx = self.conn.transaction()?;
        if let Some((run_id, config, version)) = run {
            insert_run(&tx, run_id, config, version)?;
        }
        let report = WriteReport {
            students: student::insert_students(&tx, &output.students)?,
            enrollments: enrollment::insert_enrollments(&tx, &output.enrollments)?,
            course_enrollments: enrollment::insert_course_enrollments(
                &tx,
                &output.course_enrollments,
            )?,
            completions: completion::insert_completions(&tx, &output.completions)?,
            cohorts: cohort::insert_cohorts(&tx, &output.cohorts)?,
        };

        // Returning before commit drops `tx`, which rolls the load back.
        let integrity = integrity::check(&tx)?;
        if !integrity.is_clean() {
            let issues = integrity.issues();
            for issue in &issues {
                log::warn!("integrity: {issue}");
            }
            return Err(SimError::Integrity { issues });
        }

        tx.commit()?;
        log::info!(
            "bulk write committed: {} students, {} enrollments, {} course enrollments, \
             {} completions, {} cohorts",
            report.students,
            report.enrollments,
            report.course_enrollments,
            report.completions,
            report.cohorts
        );
        Ok(report)
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn count(&self, table: Table) -> SimResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let n = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(n)
    }
}

fn insert_run(
    conn: &Connection,
    run_id: &str,
    config: &SimConfig,
    version: &str,
) -> SimResult<()> {
    conn.execute(
        "INSERT INTO sim_run (run_id, seed, version, config_json) VALUES (?1, ?2, ?3, ?4)",
        params![
            run_id,
            config.random_seed as i64,
            version,
            serde_json::to_string(config)?
        ],
    )?;
    Ok(())
}

/// ISO date column format.
pub(crate) fn date_text(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
