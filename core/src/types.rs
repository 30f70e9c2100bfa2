//! Shared primitive types used across the entire simulation.

/// Primary key of a simulated student. Assigned from 1, never reused.
pub type StudentId = u64;

/// Primary key of a student-term enrollment row.
pub type EnrollmentId = u64;

/// Primary key of a (enrollment, course) row.
pub type CourseEnrollmentId = u64;

/// Primary key of a completion (graduation) row.
pub type CompletionId = u64;

/// Primary key of a cohort row.
pub type CohortId = u64;

/// Primary key of a catalog course.
pub type CourseId = u64;

/// Index of a term within the simulated horizon, starting at 0.
pub type TermIndex = usize;

/// Class standing: 1 = Freshman .. 4 = Senior.
pub type ClassYear = u8;

pub const FRESHMAN: ClassYear = 1;
pub const SENIOR: ClassYear = 4;

/// A monotonic primary-key sequence owned by whoever assigns the keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next key.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of keys handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
