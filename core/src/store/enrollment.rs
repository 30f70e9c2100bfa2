use super::{date_text, SimStore};
use crate::{
    error::SimResult,
    records::{CourseEnrollment, Enrollment},
    types::{EnrollmentId, StudentId},
};
use rusqlite::{params, Connection};

pub(super) fn insert_enrollments(
    conn: &Connection,
    enrollments: &[Enrollment],
) -> SimResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO enrollments (
            enrollment_id, student_id, term, term_start_date, program, status,
            retained_next_term, class_year, avg_gpa, level, enrollment_type,
            attendance_status, seeking_status, distance_education_status, credit_hours
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
    )?;
    for e in enrollments {
        stmt.execute(params![
            e.enrollment_id as i64,
            e.student_id as i64,
            &e.term,
            date_text(e.term_start_date),
            &e.program,
            e.status.as_str(),
            e.retained_next_term as i32,
            e.class_year,
            e.avg_gpa,
            &e.level,
            e.enrollment_type.as_str(),
            &e.attendance_status,
            &e.seeking_status,
            &e.distance_education_status,
            e.credit_hours,
        ])?;
    }
    log::debug!("enrollments: inserted {}", enrollments.len());
    Ok(enrollments.len())
}

pub(super) fn insert_course_enrollments(
    conn: &Connection,
    rows: &[CourseEnrollment],
) -> SimResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO course_enrollments (
            course_enrollment_id, enrollment_id, course_id, grade, grade_points
        ) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for c in rows {
        stmt.execute(params![
            c.course_enrollment_id as i64,
            c.enrollment_id as i64,
            c.course_id as i64,
            &c.grade,
            c.grade_points,
        ])?;
    }
    log::debug!("course_enrollments: inserted {}", rows.len());
    Ok(rows.len())
}

/// One persisted enrollment, as read back for checks and reports.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRow {
    pub enrollment_id: EnrollmentId,
    pub term: String,
    pub status: String,
    pub class_year: i64,
    pub avg_gpa: f64,
    pub retained_next_term: bool,
}

impl SimStore {
    pub fn enrollments_for_student(&self, student_id: StudentId) -> SimResult<Vec<EnrollmentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT enrollment_id, term, status, class_year, avg_gpa, retained_next_term
             FROM enrollments WHERE student_id = ?1
             ORDER BY enrollment_id ASC",
        )?;
        let rows = stmt.query_map(params![student_id as i64], |row| {
            Ok(EnrollmentRow {
                enrollment_id: row.get::<_, i64>(0)? as u64,
                term: row.get(1)?,
                status: row.get(2)?,
                class_year: row.get(3)?,
                avg_gpa: row.get(4)?,
                retained_next_term: row.get::<_, i32>(5)? != 0,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Stored `avg_gpa` next to the credit-weighted GPA recomputed from the
    /// enrollment's course rows and the course catalog.
    pub fn stored_and_recomputed_gpa(&self, enrollment_id: EnrollmentId) -> SimResult<(f64, f64)> {
        let pair = self.conn.query_row(
            "SELECT e.avg_gpa,
                    SUM(ce.grade_points * c.credit_hours) * 1.0 / SUM(c.credit_hours)
             FROM enrollments e
             JOIN course_enrollments ce ON ce.enrollment_id = e.enrollment_id
             JOIN courses c ON c.course_id = ce.course_id
             WHERE e.enrollment_id = ?1
             GROUP BY e.enrollment_id",
            params![enrollment_id as i64],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(pair)
    }

    pub fn enrollment_count_for_term(&self, term: &str) -> SimResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM enrollments WHERE term = ?1",
            params![term],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
