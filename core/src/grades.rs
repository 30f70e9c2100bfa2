//! Course and grade draws for one active student-term.

use crate::{
    catalog::{grade_points, CourseCatalog, GRADE_DISTRIBUTION},
    rng::SimRng,
    sampler::weighted_pick,
    types::CourseId,
};

pub const MIN_COURSES_PER_TERM: usize = 2;
pub const MAX_COURSES_PER_TERM: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct CourseGrade {
    pub course_id: CourseId,
    pub grade: &'static str,
    pub grade_points: f64,
    pub credit_hours: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermCourseLoad {
    pub courses: Vec<CourseGrade>,
    pub credit_hours: u32,
    pub avg_gpa: f64,
}

/// Draw a term's course load: a count in [2, 5], that many distinct
/// courses, and one letter grade per course.
pub fn draw_course_load(
    rng: &mut SimRng,
    catalog: &CourseCatalog,
    default_gpa: f64,
) -> TermCourseLoad {
    let count =
        rng.range_inclusive(MIN_COURSES_PER_TERM as i64, MAX_COURSES_PER_TERM as i64) as usize;
    let picks = rng.sample_distinct(catalog.len(), count);

    let courses: Vec<CourseGrade> = picks
        .into_iter()
        .map(|i| {
            let course = &catalog.courses()[i];
            let grade = *weighted_pick(rng, GRADE_DISTRIBUTION);
            CourseGrade {
                course_id: course.course_id,
                grade,
                grade_points: grade_points(grade),
                credit_hours: course.credit_hours,
            }
        })
        .collect();

    let credit_hours = courses.iter().map(|c| c.credit_hours).sum();
    let avg_gpa = weighted_gpa(
        courses.iter().map(|c| (c.grade_points, c.credit_hours)),
        default_gpa,
    );
    TermCourseLoad {
        courses,
        credit_hours,
        avg_gpa,
    }
}

/// Σ(points × credits) / Σ(credits), or `default_gpa` when no credits
/// were attempted.
pub fn weighted_gpa(grades: impl IntoIterator<Item = (f64, u32)>, default_gpa: f64) -> f64 {
    let (points, credits) = grades
        .into_iter()
        .fold((0.0, 0u32), |(p, c), (gp, hours)| (p + gp * hours as f64, c + hours));
    if credits == 0 {
        default_gpa
    } else {
        points / credits as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_gpa_scales_by_credit_hours() {
        // A in a 4-credit lab, C in a 3-credit course: (16 + 6) / 7
        let gpa = weighted_gpa([(4.0, 4), (2.0, 3)], 2.0);
        assert!((gpa - 22.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn zero_credit_falls_back_to_default() {
        assert_eq!(weighted_gpa(std::iter::empty(), 2.0), 2.0);
        assert_eq!(weighted_gpa([(4.0, 0)], 1.5), 1.5);
    }

    #[test]
    fn course_loads_are_distinct_and_bounded() {
        let catalog = CourseCatalog::standard();
        let mut rng = SimRng::new(8);
        for _ in 0..1_000 {
            let load = draw_course_load(&mut rng, &catalog, 2.0);
            assert!((MIN_COURSES_PER_TERM..=MAX_COURSES_PER_TERM).contains(&load.courses.len()));
            let mut ids: Vec<_> = load.courses.iter().map(|c| c.course_id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), load.courses.len(), "course drawn twice");
            assert!((0.0..=4.0).contains(&load.avg_gpa));
            assert_eq!(
                load.credit_hours,
                load.courses.iter().map(|c| c.credit_hours).sum::<u32>()
            );
        }
    }

    #[test]
    fn course_count_is_capped_by_a_small_catalog() {
        let catalog = CourseCatalog::new(
            CourseCatalog::standard().courses()[..3].to_vec(),
        );
        let mut rng = SimRng::new(4);
        for _ in 0..200 {
            let load = draw_course_load(&mut rng, &catalog, 2.0);
            assert!(load.courses.len() <= 3);
        }
    }
}
