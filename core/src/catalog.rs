//! Fixed reference data: the course catalog, grading scale, programs and
//! awards. The catalog is seeded into the `courses` table before a run and
//! is read-only afterwards.

use crate::types::CourseId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub course_id: CourseId,
    pub course_code: String,
    pub course_name: String,
    pub credit_hours: u32,
}

#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The standard ten-course general-education catalog, keyed 1..=10.
    pub fn standard() -> Self {
        const COURSES: &[(&str, &str, u32)] = &[
            ("CSCI 101", "Intro to CS", 3),
            ("MATH 101", "College Algebra", 3),
            ("ENG 101", "English Composition", 3),
            ("HIST 210", "World History", 3),
            ("BIO 110", "General Biology", 4),
            ("PSYC 101", "Intro to Psychology", 3),
            ("ECON 101", "Principles of Econ", 3),
            ("CHEM 101", "General Chemistry", 4),
            ("PHYS 101", "General Physics", 4),
            ("PHIL 100", "Intro to Philosophy", 3),
        ];
        let courses = COURSES
            .iter()
            .enumerate()
            .map(|(i, (code, name, credits))| Course {
                course_id: i as CourseId + 1,
                course_code: (*code).into(),
                course_name: (*name).into(),
                credit_hours: *credits,
            })
            .collect();
        Self { courses }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, course_id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }
}

/// Letter-grade distribution for a single course attempt.
pub const GRADE_DISTRIBUTION: &[(&str, f64)] = &[
    ("A", 0.25),
    ("B", 0.35),
    ("C", 0.25),
    ("D", 0.10),
    ("F", 0.05),
];

/// Grade points on the 4.0 scale. Unknown letters earn no points.
pub fn grade_points(letter: &str) -> f64 {
    match letter {
        "A" => 4.0,
        "B" => 3.0,
        "C" => 2.0,
        "D" => 1.0,
        _ => 0.0,
    }
}

/// CIP codes of the degree programs students can declare.
pub const PROGRAMS: &[(&str, f64)] = &[
    ("11.0101", 0.25), // Computer Science
    ("24.0101", 0.25), // Liberal Arts and Sciences
    ("52.0301", 0.25), // Accounting
    ("14.0901", 0.25), // Computer Engineering
];

pub const AWARD_TYPES: &[(&str, f64)] = &[
    ("Bachelor's", 0.80),
    ("Associate", 0.15),
    ("Certificate <1 year", 0.05),
];

pub const DISTANCE_EDUCATION: &[(&str, f64)] = &[
    ("Not enrolled in any distance education", 0.70),
    ("Enrolled in some distance education", 0.22),
    ("Enrolled exclusively in distance education", 0.08),
];

pub const SEEKING_STATUS: &[(&str, f64)] = &[
    ("Degree-seeking", 0.95),
    ("Non-degree-seeking", 0.05),
];

/// Credit hours at or above which a term load counts as full-time.
pub const FULL_TIME_CREDIT_HOURS: u32 = 12;

pub fn attendance_status(credit_hours: u32) -> &'static str {
    if credit_hours >= FULL_TIME_CREDIT_HOURS {
        "Full-time"
    } else {
        "Part-time"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_keyed_from_one() {
        let catalog = CourseCatalog::standard();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get(1).map(|c| c.course_code.as_str()), Some("CSCI 101"));
        assert_eq!(catalog.get(10).map(|c| c.credit_hours), Some(3));
        assert!(catalog.get(11).is_none());
    }

    #[test]
    fn distributions_sum_to_one() {
        let distributions = [
            GRADE_DISTRIBUTION,
            PROGRAMS,
            AWARD_TYPES,
            DISTANCE_EDUCATION,
            SEEKING_STATUS,
        ];
        for dist in distributions {
            let total: f64 = dist.iter().map(|(_, p)| p).sum();
            assert!((total - 1.0).abs() < 1e-9, "weights sum to {total}");
        }
    }

    #[test]
    fn twelve_credits_is_full_time() {
        assert_eq!(attendance_status(11), "Part-time");
        assert_eq!(attendance_status(12), "Full-time");
    }
}
