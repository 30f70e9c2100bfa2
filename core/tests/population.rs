//! Admission and demographic tests.

use enrollsim_core::{
    config::SimConfig,
    demographics::NONRESIDENT_ALIEN,
    engine::SimEngine,
    records::EnrollmentType,
    store::{SimStore, Table},
};

fn one_term_config(seed: u64) -> SimConfig {
    SimConfig {
        total_terms: 1,
        new_freshmen_each_fall: 100,
        freshman_variation: 10,
        random_seed: seed,
        ..SimConfig::default_test()
    }
}

#[test]
fn single_term_admits_freshmen_within_variation() {
    let output = SimEngine::new(one_term_config(42)).unwrap().run().unwrap();

    let mut store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
        .seed_course_catalog(&enrollsim_core::catalog::CourseCatalog::standard())
        .unwrap();
    store.bulk_write(&output).unwrap();

    let count = store.count(Table::Students).unwrap();
    assert!((90..=110).contains(&count), "Expected 90-110 students, got {count}");

    let by_year = store.entry_class_year_counts().unwrap();
    assert_eq!(by_year, vec![(1, count)], "Every entrant should be a freshman");
}

#[test]
fn every_admitted_student_enrolls_in_their_first_term() {
    let output = SimEngine::new(one_term_config(7)).unwrap().run().unwrap();
    assert_eq!(output.enrollments.len(), output.students.len());
    for s in &output.students {
        assert_eq!(s.first_term, 0);
        assert_eq!(s.first_term_label, "Fall 2019");
        assert_eq!(s.enrollment_type, EnrollmentType::FirstTime);
        assert_eq!(output.enrollments_for(s.student_id).count(), 1);
    }
}

#[test]
fn zero_entrants_yields_an_empty_run() {
    let output = SimEngine::new(SimConfig {
        new_freshmen_each_fall: 0,
        freshman_variation: 0,
        ..SimConfig::default_test()
    })
    .unwrap()
    .run()
    .unwrap();
    assert!(output.students.is_empty());
    assert!(output.enrollments.is_empty());
    assert!(output.cohorts.is_empty());
}

#[test]
fn student_ids_are_sequential_from_one() {
    let output = SimEngine::build_test(3).unwrap().run().unwrap();
    let ids: Vec<u64> = output.students.iter().map(|s| s.student_id).collect();
    let expected: Vec<u64> = (1..=ids.len() as u64).collect();
    assert_eq!(ids, expected);
}

#[test]
fn freshman_ages_fall_in_band() {
    let output = SimEngine::new(one_term_config(11)).unwrap().run().unwrap();
    let start = chrono::NaiveDate::from_ymd_opt(2019, 9, 1).unwrap();
    for s in &output.students {
        let days = (start - s.dob).num_days();
        assert!(
            (17 * 365..21 * 365).contains(&days),
            "student {} is {days} days old at term start",
            s.student_id
        );
    }
}

#[test]
fn nonresident_aliens_have_no_us_state() {
    let output = SimEngine::new(SimConfig {
        new_freshmen_each_fall: 400,
        ..one_term_config(19)
    })
    .unwrap()
    .run()
    .unwrap();

    for s in &output.students {
        if s.race_ethnicity == NONRESIDENT_ALIEN {
            assert!(s.state_of_residence.is_none());
            assert!(s.state_fips_code.is_none());
            assert_ne!(s.country, "United States");
        } else {
            assert_eq!(s.country, "United States");
            assert!(s.state_of_residence.is_some());
        }
    }
}

#[test]
fn transfers_enter_above_freshman_or_at_it() {
    let output = SimEngine::new(SimConfig {
        new_transfers_each_fall: 30,
        ..one_term_config(23)
    })
    .unwrap()
    .run()
    .unwrap();

    let transfers: Vec<_> = output
        .students
        .iter()
        .filter(|s| s.enrollment_type != EnrollmentType::FirstTime)
        .collect();
    assert!(!transfers.is_empty());
    assert!(transfers.iter().all(|s| (1..=3).contains(&s.entry_class_year)));
}
