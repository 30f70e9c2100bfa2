use super::SimStore;
use crate::{error::SimResult, records::Cohort};
use rusqlite::{params, Connection};

pub(super) fn insert_cohorts(conn: &Connection, cohorts: &[Cohort]) -> SimResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO cohorts (
            cohort_id, student_id, cohort_year, cohort_term, enrollment_type,
            attendance_status, seeking_status, is_excluded, exclusion_reason,
            retained_fall, completed_by_fall
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for c in cohorts {
        stmt.execute(params![
            c.cohort_id as i64,
            c.student_id as i64,
            c.cohort_year,
            &c.cohort_term,
            c.enrollment_type.as_str(),
            &c.attendance_status,
            &c.seeking_status,
            c.is_excluded as i32,
            &c.exclusion_reason,
            c.retained_fall as i32,
            c.completed_by_fall as i32,
        ])?;
    }
    log::debug!("cohorts: inserted {}", cohorts.len());
    Ok(cohorts.len())
}

/// Fall-to-fall retention counts for one entering cohort.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CohortRetention {
    pub cohort: i64,
    pub exclusions: i64,
    pub adjusted_cohort: i64,
    pub retained_or_completed: i64,
}

impl CohortRetention {
    /// Retention rate in percent of the adjusted cohort.
    pub fn rate(&self) -> Option<f64> {
        (self.adjusted_cohort > 0)
            .then(|| self.retained_or_completed as f64 / self.adjusted_cohort as f64 * 100.0)
    }
}

/// IPEDS Part E: retention reported separately for full-time and
/// part-time first-time cohorts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetentionByAttendance {
    pub full_time: CohortRetention,
    pub part_time: CohortRetention,
}

impl RetentionByAttendance {
    pub fn total(&self) -> CohortRetention {
        CohortRetention {
            cohort: self.full_time.cohort + self.part_time.cohort,
            exclusions: self.full_time.exclusions + self.part_time.exclusions,
            adjusted_cohort: self.full_time.adjusted_cohort + self.part_time.adjusted_cohort,
            retained_or_completed: self.full_time.retained_or_completed
                + self.part_time.retained_or_completed,
        }
    }
}

impl SimStore {
    /// Part E counts for the first-time cohort entering in `cohort_year`,
    /// grouped by attendance status at entry.
    pub fn cohort_retention(&self, cohort_year: i32) -> SimResult<RetentionByAttendance> {
        let mut stmt = self.conn.prepare(
            "SELECT attendance_status,
                    COUNT(*),
                    COALESCE(SUM(is_excluded), 0),
                    COALESCE(SUM(CASE WHEN is_excluded = 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN is_excluded = 0
                                       AND (retained_fall = 1 OR completed_by_fall = 1)
                                      THEN 1 ELSE 0 END), 0)
             FROM cohorts
             WHERE cohort_year = ?1 AND enrollment_type = 'First-time'
             GROUP BY attendance_status",
        )?;
        let rows = stmt.query_map(params![cohort_year], |row| {
            Ok((
                row.get::<_, String>(0)?,
                CohortRetention {
                    cohort: row.get(1)?,
                    exclusions: row.get(2)?,
                    adjusted_cohort: row.get(3)?,
                    retained_or_completed: row.get(4)?,
                },
            ))
        })?;

        let mut r = RetentionByAttendance::default();
        for row in rows {
            let (attendance, counts) = row?;
            match attendance.as_str() {
                "Full-time" => r.full_time = counts,
                "Part-time" => r.part_time = counts,
                other => log::warn!("cohorts: unknown attendance status {other:?}"),
            }
        }
        Ok(r)
    }
}
