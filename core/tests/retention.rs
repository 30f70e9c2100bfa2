//! Retention, progression and graduation.

use enrollsim_core::{
    config::SimConfig,
    demographics::PENALIZED_RACE,
    engine::SimEngine,
    records::{EnrollmentStatus, SimOutput},
    retention::RetentionPolicy,
};

fn run(config: SimConfig) -> SimOutput {
    SimEngine::new(config).expect("engine").run().expect("run")
}

#[test]
fn certain_graduation_completes_every_senior_term() {
    let output = run(SimConfig {
        total_terms: 8,
        senior_grad_prob: 1.0,
        base_dropout_prob: 0.0,
        freshman_to_soph_prob: 1.0,
        soph_to_junior_prob: 1.0,
        junior_to_senior_prob: 1.0,
        ..SimConfig::default_test()
    });

    let seniors: Vec<_> = output.enrollments.iter().filter(|e| e.class_year == 4).collect();
    assert!(!seniors.is_empty(), "fast progression should produce seniors within 8 terms");
    for e in seniors {
        assert_eq!(e.status, EnrollmentStatus::Completed);
        assert!(
            output.completions.iter().any(|c| c.student_id == e.student_id),
            "senior enrollment {} has no completion",
            e.enrollment_id
        );
    }
}

#[test]
fn completions_carry_the_student_program() {
    let output = run(SimConfig {
        total_terms: 8,
        senior_grad_prob: 1.0,
        ..SimConfig::default_test()
    });
    for c in &output.completions {
        let student = output.students.iter().find(|s| s.student_id == c.student_id).unwrap();
        assert_eq!(c.cip_code, student.program);
        assert_eq!(student.status, EnrollmentStatus::Completed);
        assert!(!student.active);
        assert_eq!(student.class_year, 4);
    }
}

#[test]
fn no_graduation_keeps_seniors_enrolled() {
    let output = run(SimConfig {
        total_terms: 8,
        senior_grad_prob: 0.0,
        ..SimConfig::default_test()
    });
    assert!(output.completions.is_empty());
    assert!(output
        .enrollments
        .iter()
        .all(|e| e.status != EnrollmentStatus::Completed));
}

#[test]
fn lowest_gpa_band_retains_at_fifteen_percent() {
    let policy = RetentionPolicy::from_config(&SimConfig {
        base_dropout_prob: 0.0,
        ..SimConfig::default()
    });
    assert_eq!(policy.retention_prob(0.2, "White"), 0.15);
}

#[test]
fn full_penalty_withdraws_every_penalized_student() {
    let output = run(SimConfig {
        total_terms: 3,
        new_freshmen_each_fall: 200,
        race_penalty_for_retention: 1.0,
        ..SimConfig::default_test()
    });
    let penalized: Vec<_> = output
        .students
        .iter()
        .filter(|s| s.race_ethnicity == PENALIZED_RACE)
        .collect();
    assert!(!penalized.is_empty());
    for s in penalized {
        assert_eq!(s.status, EnrollmentStatus::Withdrawn);
        assert_eq!(output.enrollments_for(s.student_id).count(), 1);
    }
}

#[test]
fn retained_next_term_matches_the_following_row() {
    let output = run(SimConfig {
        total_terms: 5,
        random_seed: 4,
        ..SimConfig::default_test()
    });
    for s in &output.students {
        let rows: Vec<_> = output.enrollments_for(s.student_id).collect();
        for pair in rows.windows(2) {
            assert!(pair[0].retained_next_term);
            assert_eq!(pair[1].term_index, pair[0].term_index + 1);
        }
    }
}
