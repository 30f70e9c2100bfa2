use super::{date_text, SimStore};
use crate::{error::SimResult, records::Completion, types::StudentId};
use rusqlite::{params, Connection};

pub(super) fn insert_completions(
    conn: &Connection,
    completions: &[Completion],
) -> SimResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO completions (
            completion_id, student_id, award_type, cip_code, completion_date
        ) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for c in completions {
        stmt.execute(params![
            c.completion_id as i64,
            c.student_id as i64,
            &c.award_type,
            &c.cip_code,
            date_text(c.completion_date),
        ])?;
    }
    log::debug!("completions: inserted {}", completions.len());
    Ok(completions.len())
}

impl SimStore {
    pub fn completion_count_for_student(&self, student_id: StudentId) -> SimResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM completions WHERE student_id = ?1",
            params![student_id as i64],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// (award type, count), most frequent first.
    pub fn completions_by_award(&self) -> SimResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT award_type, COUNT(*) AS n FROM completions
             GROUP BY award_type ORDER BY n DESC, award_type ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
