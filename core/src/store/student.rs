use super::{date_text, SimStore};
use crate::{error::SimResult, records::Student};
use rusqlite::{params, Connection};

pub(super) fn insert_students(conn: &Connection, students: &[Student]) -> SimResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO students (
            student_id, first_name, last_name, dob, gender, race_ethnicity,
            citizenship, state_of_residence, state_fips_code, country,
            enrollment_type, seeking_status, program, class_year,
            final_class_year, status, first_term
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )?;
    for s in students {
        stmt.execute(params![
            s.student_id as i64,
            &s.first_name,
            &s.last_name,
            date_text(s.dob),
            &s.gender,
            &s.race_ethnicity,
            &s.citizenship,
            &s.state_of_residence,
            &s.state_fips_code,
            &s.country,
            s.enrollment_type.as_str(),
            &s.seeking_status,
            &s.program,
            s.entry_class_year,
            s.class_year,
            s.status.as_str(),
            &s.first_term_label,
        ])?;
    }
    log::debug!("students: inserted {}", students.len());
    Ok(students.len())
}

impl SimStore {
    /// (admission class year, student count), ascending by class year.
    pub fn entry_class_year_counts(&self) -> SimResult<Vec<(i64, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT class_year, COUNT(*) FROM students GROUP BY class_year ORDER BY class_year",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn student_count_by_status(&self, status: &str) -> SimResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM students WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
