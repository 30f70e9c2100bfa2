//! Consistency checks over a finished run.
//!
//! These are the lifecycle invariants every run must satisfy regardless of
//! parameters. `validate_output` returns every violation it finds; an empty
//! list means the output is internally consistent.

use crate::{
    catalog::CourseCatalog,
    grades::{weighted_gpa, MAX_COURSES_PER_TERM, MIN_COURSES_PER_TERM},
    records::{Enrollment, EnrollmentStatus, EnrollmentType, SimOutput},
    types::{ClassYear, CourseId, EnrollmentId, StudentId, TermIndex, FRESHMAN, SENIOR},
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Tolerance when comparing a stored GPA with its recomputation.
pub const GPA_TOLERANCE: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("enrollment {enrollment_id}: class year {class_year} outside 1-4")]
    ClassYearOutOfRange {
        enrollment_id: EnrollmentId,
        class_year: ClassYear,
    },

    #[error("student {student_id}: class year fell from {from} to {to}")]
    ClassYearDecreased {
        student_id: StudentId,
        from: ClassYear,
        to: ClassYear,
    },

    #[error("enrollment {enrollment_id}: avg_gpa {avg_gpa} outside 0.0-4.0")]
    GpaOutOfRange { enrollment_id: EnrollmentId, avg_gpa: f64 },

    #[error("enrollment {enrollment_id}: stored avg_gpa {stored} but courses give {recomputed}")]
    GpaMismatch {
        enrollment_id: EnrollmentId,
        stored: f64,
        recomputed: f64,
    },

    #[error("enrollment {enrollment_id}: {count} courses, expected 2-5")]
    CourseCountOutOfRange { enrollment_id: EnrollmentId, count: usize },

    #[error("enrollment {enrollment_id}: course {course_id} taken twice")]
    DuplicateCourse {
        enrollment_id: EnrollmentId,
        course_id: CourseId,
    },

    #[error("enrollment {enrollment_id}: course {course_id} is not in the catalog")]
    UnknownCourse {
        enrollment_id: EnrollmentId,
        course_id: CourseId,
    },

    #[error("student {student_id}: {count} completions")]
    MultipleCompletions { student_id: StudentId, count: usize },

    #[error("student {student_id}: completed without a senior final term")]
    CompletionWithoutSeniorTerm { student_id: StudentId },

    #[error("student {student_id}: enrolled in terms {actual:?}, expected {expected:?}")]
    EnrollmentGap {
        student_id: StudentId,
        expected: Vec<TermIndex>,
        actual: Vec<TermIndex>,
    },

    #[error("student {student_id}: final status does not match the last enrollment")]
    StatusMismatch { student_id: StudentId },

    #[error("student {student_id}: first-time entrant admitted above freshman standing")]
    FirstTimeAboveFreshman { student_id: StudentId },

    #[error("student {student_id}: cohort row is missing, duplicated, or not first-time")]
    CohortMembership { student_id: StudentId },
}

/// Check every lifecycle invariant over `output`. `horizon` is the number
/// of simulated terms.
pub fn validate_output(
    output: &SimOutput,
    catalog: &CourseCatalog,
    horizon: usize,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut by_student: HashMap<StudentId, Vec<&Enrollment>> = HashMap::new();
    for e in &output.enrollments {
        by_student.entry(e.student_id).or_default().push(e);
    }

    check_enrollments(output, catalog, &mut violations);
    check_lifecycles(output, &by_student, horizon, &mut violations);
    check_completions(output, &by_student, &mut violations);
    check_cohorts(output, &mut violations);

    for v in &violations {
        log::warn!("validation: {v}");
    }
    violations
}

fn check_enrollments(output: &SimOutput, catalog: &CourseCatalog, out: &mut Vec<Violation>) {
    let mut courses_by_enrollment: HashMap<EnrollmentId, Vec<(CourseId, f64)>> = HashMap::new();
    for c in &output.course_enrollments {
        courses_by_enrollment
            .entry(c.enrollment_id)
            .or_default()
            .push((c.course_id, c.grade_points));
    }

    for e in &output.enrollments {
        if !(FRESHMAN..=SENIOR).contains(&e.class_year) {
            out.push(Violation::ClassYearOutOfRange {
                enrollment_id: e.enrollment_id,
                class_year: e.class_year,
            });
        }
        if !(0.0..=4.0).contains(&e.avg_gpa) {
            out.push(Violation::GpaOutOfRange {
                enrollment_id: e.enrollment_id,
                avg_gpa: e.avg_gpa,
            });
        }

        let courses = courses_by_enrollment
            .get(&e.enrollment_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if !(MIN_COURSES_PER_TERM..=MAX_COURSES_PER_TERM).contains(&courses.len()) {
            out.push(Violation::CourseCountOutOfRange {
                enrollment_id: e.enrollment_id,
                count: courses.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut weighted = Vec::with_capacity(courses.len());
        for (course_id, points) in courses {
            if !seen.insert(*course_id) {
                out.push(Violation::DuplicateCourse {
                    enrollment_id: e.enrollment_id,
                    course_id: *course_id,
                });
            }
            match catalog.get(*course_id) {
                Some(course) => weighted.push((*points, course.credit_hours)),
                None => out.push(Violation::UnknownCourse {
                    enrollment_id: e.enrollment_id,
                    course_id: *course_id,
                }),
            }
        }
        if !weighted.is_empty() {
            let recomputed = weighted_gpa(weighted, f64::NAN);
            if (recomputed - e.avg_gpa).abs() > GPA_TOLERANCE {
                out.push(Violation::GpaMismatch {
                    enrollment_id: e.enrollment_id,
                    stored: e.avg_gpa,
                    recomputed,
                });
            }
        }
    }
}

fn check_lifecycles(
    output: &SimOutput,
    by_student: &HashMap<StudentId, Vec<&Enrollment>>,
    horizon: usize,
    out: &mut Vec<Violation>,
) {
    for s in &output.students {
        if s.enrollment_type == EnrollmentType::FirstTime && s.entry_class_year != FRESHMAN {
            out.push(Violation::FirstTimeAboveFreshman {
                student_id: s.student_id,
            });
        }

        let rows = by_student.get(&s.student_id).map(Vec::as_slice).unwrap_or_default();

        for pair in rows.windows(2) {
            if pair[1].class_year < pair[0].class_year {
                out.push(Violation::ClassYearDecreased {
                    student_id: s.student_id,
                    from: pair[0].class_year,
                    to: pair[1].class_year,
                });
            }
        }

        let actual: Vec<TermIndex> = rows.iter().map(|e| e.term_index).collect();
        let last_term = match rows.last() {
            Some(last) if last.status != EnrollmentStatus::Active => last.term_index,
            _ => horizon.saturating_sub(1),
        };
        let expected: Vec<TermIndex> = (s.first_term..=last_term).collect();
        if actual != expected {
            out.push(Violation::EnrollmentGap {
                student_id: s.student_id,
                expected,
                actual,
            });
        }

        let only_last_closes = rows
            .iter()
            .rev()
            .skip(1)
            .all(|e| e.status == EnrollmentStatus::Active);
        let final_matches = rows.last().map(|e| e.status) == Some(s.status);
        let active_matches = s.active == (s.status == EnrollmentStatus::Active);
        if !only_last_closes || !final_matches || !active_matches {
            out.push(Violation::StatusMismatch {
                student_id: s.student_id,
            });
        }
    }
}

fn check_completions(
    output: &SimOutput,
    by_student: &HashMap<StudentId, Vec<&Enrollment>>,
    out: &mut Vec<Violation>,
) {
    let mut counts: HashMap<StudentId, usize> = HashMap::new();
    for c in &output.completions {
        *counts.entry(c.student_id).or_default() += 1;
    }
    let mut students: Vec<_> = counts.into_iter().collect();
    students.sort_unstable();

    for (student_id, count) in students {
        if count > 1 {
            out.push(Violation::MultipleCompletions { student_id, count });
        }
        let final_senior = by_student
            .get(&student_id)
            .and_then(|rows| rows.last())
            .map(|last| last.class_year == SENIOR && last.status == EnrollmentStatus::Completed)
            .unwrap_or(false);
        if !final_senior {
            out.push(Violation::CompletionWithoutSeniorTerm { student_id });
        }
    }
}

fn check_cohorts(output: &SimOutput, out: &mut Vec<Violation>) {
    let mut cohort_counts: HashMap<StudentId, usize> = HashMap::new();
    for c in &output.cohorts {
        *cohort_counts.entry(c.student_id).or_default() += 1;
    }
    for s in &output.students {
        let rows = cohort_counts.get(&s.student_id).copied().unwrap_or(0);
        let expected = usize::from(s.enrollment_type == EnrollmentType::FirstTime);
        if rows != expected {
            out.push(Violation::CohortMembership {
                student_id: s.student_id,
            });
        }
    }
}
