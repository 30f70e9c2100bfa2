//! Course loads, grades and the term GPA.

use enrollsim_core::{
    catalog::{grade_points, CourseCatalog},
    config::SimConfig,
    engine::SimEngine,
    grades::weighted_gpa,
    store::SimStore,
};
use std::collections::HashSet;

const TOLERANCE: f64 = 1e-9;

#[test]
fn stored_gpa_round_trips_in_memory() {
    let catalog = CourseCatalog::standard();
    let output = SimEngine::build_test(21).unwrap().run().unwrap();
    assert!(!output.enrollments.is_empty());

    for e in &output.enrollments {
        let recomputed = weighted_gpa(
            output.courses_for(e.enrollment_id).map(|c| {
                let course = catalog.get(c.course_id).expect("course in catalog");
                (c.grade_points, course.credit_hours)
            }),
            f64::NAN,
        );
        assert!(
            (recomputed - e.avg_gpa).abs() < TOLERANCE,
            "enrollment {}: stored {} recomputed {recomputed}",
            e.enrollment_id,
            e.avg_gpa
        );
    }
}

#[test]
fn stored_gpa_round_trips_through_the_database() {
    let output = SimEngine::build_test(22).unwrap().run().unwrap();
    let mut store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    store.bulk_write(&output).unwrap();

    for e in output.enrollments.iter().take(50) {
        let (stored, recomputed) = store.stored_and_recomputed_gpa(e.enrollment_id).unwrap();
        assert!((stored - e.avg_gpa).abs() < TOLERANCE);
        assert!((stored - recomputed).abs() < TOLERANCE);
    }
}

#[test]
fn each_enrollment_has_two_to_five_distinct_courses() {
    let output = SimEngine::build_test(23).unwrap().run().unwrap();
    for e in &output.enrollments {
        let ids: Vec<u64> = output.courses_for(e.enrollment_id).map(|c| c.course_id).collect();
        assert!((2..=5).contains(&ids.len()), "{} courses", ids.len());
        let distinct: HashSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), ids.len(), "duplicate course in {ids:?}");
    }
}

#[test]
fn grade_points_match_letters() {
    let output = SimEngine::build_test(24).unwrap().run().unwrap();
    for c in &output.course_enrollments {
        assert_eq!(c.grade_points, grade_points(&c.grade));
    }
}

#[test]
fn credit_hours_drive_attendance_status() {
    let output = SimEngine::new(SimConfig {
        total_terms: 2,
        ..SimConfig::default_test()
    })
    .unwrap()
    .run()
    .unwrap();
    let catalog = CourseCatalog::standard();

    for e in &output.enrollments {
        let credits: u32 = output
            .courses_for(e.enrollment_id)
            .map(|c| catalog.get(c.course_id).unwrap().credit_hours)
            .sum();
        assert_eq!(e.credit_hours, credits);
        let expected = if credits >= 12 { "Full-time" } else { "Part-time" };
        assert_eq!(e.attendance_status, expected);
    }
}
