//! Row types produced by a simulation run.
//!
//! Each struct maps field-for-field onto one table in
//! `migrations/001_schema.sql`; the store binds columns by name.

use crate::types::{
    ClassYear, CohortId, CompletionId, CourseEnrollmentId, CourseId, EnrollmentId, StudentId,
    TermIndex,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnrollmentType {
    #[serde(rename = "First-time")]
    FirstTime,
    #[serde(rename = "Transfer-in")]
    TransferIn,
    Continuing,
}

impl EnrollmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstTime => "First-time",
            Self::TransferIn => "Transfer-in",
            Self::Continuing => "Continuing",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Active,
    Withdrawn,
    Completed,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Withdrawn => "Withdrawn",
            Self::Completed => "Completed",
        }
    }
}

/// A simulated student. Carried from term to term while `active`;
/// frozen once a graduation or withdrawal sets `active = false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub student_id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub race_ethnicity: String,
    pub citizenship: String,
    pub state_of_residence: Option<String>,
    pub state_fips_code: Option<String>,
    pub country: String,
    pub enrollment_type: EnrollmentType,
    pub seeking_status: String,
    pub program: String,
    /// Class year at admission.
    pub entry_class_year: ClassYear,
    /// Class year carried into the next term.
    pub class_year: ClassYear,
    pub active: bool,
    pub status: EnrollmentStatus,
    pub first_term: TermIndex,
    pub first_term_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub student_id: StudentId,
    pub term_index: TermIndex,
    pub term: String,
    pub term_start_date: NaiveDate,
    pub program: String,
    pub status: EnrollmentStatus,
    pub retained_next_term: bool,
    /// Class year at the start of the term, before any advancement.
    pub class_year: ClassYear,
    pub avg_gpa: f64,
    pub level: String,
    pub enrollment_type: EnrollmentType,
    pub attendance_status: String,
    pub seeking_status: String,
    pub distance_education_status: String,
    pub credit_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseEnrollment {
    pub course_enrollment_id: CourseEnrollmentId,
    pub enrollment_id: EnrollmentId,
    pub course_id: CourseId,
    pub grade: String,
    pub grade_points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    pub completion_id: CompletionId,
    pub student_id: StudentId,
    pub award_type: String,
    pub cip_code: String,
    pub completion_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cohort {
    pub cohort_id: CohortId,
    pub student_id: StudentId,
    pub cohort_year: i32,
    pub cohort_term: String,
    pub enrollment_type: EnrollmentType,
    pub attendance_status: String,
    pub seeking_status: String,
    pub is_excluded: bool,
    pub exclusion_reason: Option<String>,
    pub retained_fall: bool,
    pub completed_by_fall: bool,
}

/// Per-term counters gathered while the scheduler runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TermSummary {
    pub term: String,
    pub entrants: usize,
    pub enrolled: usize,
    pub graduated: usize,
    pub withdrawn: usize,
    pub advanced: usize,
    pub mean_gpa: f64,
}

/// Everything a run produced, in key order, ready for the bulk write.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimOutput {
    pub students: Vec<Student>,
    pub enrollments: Vec<Enrollment>,
    pub course_enrollments: Vec<CourseEnrollment>,
    pub completions: Vec<Completion>,
    pub cohorts: Vec<Cohort>,
    pub term_summaries: Vec<TermSummary>,
}

impl SimOutput {
    pub fn enrollments_for(&self, student_id: StudentId) -> impl Iterator<Item = &Enrollment> {
        self.enrollments
            .iter()
            .filter(move |e| e.student_id == student_id)
    }

    pub fn courses_for(
        &self,
        enrollment_id: EnrollmentId,
    ) -> impl Iterator<Item = &CourseEnrollment> {
        self.course_enrollments
            .iter()
            .filter(move |c| c.enrollment_id == enrollment_id)
    }
}
