//! Post-load integrity checks over the persisted tables.

use super::SimStore;
use crate::error::SimResult;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub orphaned_enrollments: i64,
    pub orphaned_course_enrollments: i64,
    pub unknown_courses: i64,
    pub orphaned_completions: i64,
    pub orphaned_cohorts: i64,
    pub gpa_out_of_range: i64,
    pub class_year_out_of_range: i64,
    pub duplicate_completions: i64,
    pub duplicate_student_terms: i64,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Human-readable lines for every non-zero counter.
    pub fn issues(&self) -> Vec<String> {
        [
            ("enrollments with unknown student_id", self.orphaned_enrollments),
            ("course enrollments with unknown enrollment_id", self.orphaned_course_enrollments),
            ("course enrollments with unknown course_id", self.unknown_courses),
            ("completions with unknown student_id", self.orphaned_completions),
            ("cohort rows with unknown student_id", self.orphaned_cohorts),
            ("enrollments with avg_gpa outside 0.0-4.0", self.gpa_out_of_range),
            ("enrollments with class_year outside 1-4", self.class_year_out_of_range),
            ("students with more than one completion", self.duplicate_completions),
            ("students enrolled twice in one term", self.duplicate_student_terms),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(what, n)| format!("{n} {what}"))
        .collect()
    }
}

impl SimStore {
    pub fn integrity_report(&self) -> SimResult<IntegrityReport> {
        let report = check(&self.conn)?;
        for issue in report.issues() {
            log::warn!("integrity: {issue}");
        }
        Ok(report)
    }
}

/// Run every integrity query against `conn`. Works on an open transaction
/// so a load can be checked before it commits.
pub(super) fn check(conn: &Connection) -> SimResult<IntegrityReport> {
    let count = |sql: &str| -> SimResult<i64> {
        Ok(conn.query_row(sql, [], |row| row.get(0))?)
    };
    let report = IntegrityReport {
        orphaned_enrollments: count(
            "SELECT COUNT(*) FROM enrollments e
             WHERE NOT EXISTS (SELECT 1 FROM students s WHERE s.student_id = e.student_id)",
        )?,
        orphaned_course_enrollments: count(
            "SELECT COUNT(*) FROM course_enrollments ce
             WHERE NOT EXISTS (
                SELECT 1 FROM enrollments e WHERE e.enrollment_id = ce.enrollment_id
             )",
        )?,
        unknown_courses: count(
            "SELECT COUNT(*) FROM course_enrollments ce
             WHERE NOT EXISTS (SELECT 1 FROM courses c WHERE c.course_id = ce.course_id)",
        )?,
        orphaned_completions: count(
            "SELECT COUNT(*) FROM completions c
             WHERE NOT EXISTS (SELECT 1 FROM students s WHERE s.student_id = c.student_id)",
        )?,
        orphaned_cohorts: count(
            "SELECT COUNT(*) FROM cohorts c
             WHERE NOT EXISTS (SELECT 1 FROM students s WHERE s.student_id = c.student_id)",
        )?,
        gpa_out_of_range: count(
            "SELECT COUNT(*) FROM enrollments WHERE avg_gpa < 0.0 OR avg_gpa > 4.0",
        )?,
        class_year_out_of_range: count(
            "SELECT COUNT(*) FROM enrollments WHERE class_year < 1 OR class_year > 4",
        )?,
        duplicate_completions: count(
            "SELECT COUNT(*) FROM (
                SELECT student_id FROM completions GROUP BY student_id HAVING COUNT(*) > 1
             )",
        )?,
        duplicate_student_terms: count(
            "SELECT COUNT(*) FROM (
                SELECT student_id, term FROM enrollments
                GROUP BY student_id, term HAVING COUNT(*) > 1
             )",
        )?,
    };
    Ok(report)
}
