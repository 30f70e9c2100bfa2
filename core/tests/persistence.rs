//! Bulk write, integrity and rollback.

use enrollsim_core::{
    catalog::CourseCatalog,
    config::SimConfig,
    engine::SimEngine,
    error::SimError,
    records::SimOutput,
    store::{SimStore, Table},
};

fn migrated_store() -> SimStore {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn run(seed: u64) -> SimOutput {
    SimEngine::new(SimConfig {
        total_terms: 5,
        new_transfers_each_fall: 6,
        senior_grad_prob: 0.9,
        random_seed: seed,
        ..SimConfig::default_test()
    })
    .unwrap()
    .run()
    .unwrap()
}

#[test]
fn bulk_write_persists_every_row() {
    let output = run(1);
    let mut store = migrated_store();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    let report = store.bulk_write(&output).unwrap();

    assert_eq!(report.students, output.students.len());
    assert_eq!(store.count(Table::Students).unwrap(), output.students.len() as i64);
    assert_eq!(store.count(Table::Enrollments).unwrap(), output.enrollments.len() as i64);
    assert_eq!(
        store.count(Table::CourseEnrollments).unwrap(),
        output.course_enrollments.len() as i64
    );
    assert_eq!(store.count(Table::Completions).unwrap(), output.completions.len() as i64);
    assert_eq!(store.count(Table::Cohorts).unwrap(), output.cohorts.len() as i64);
}

#[test]
fn persisted_run_passes_integrity_checks() {
    let output = run(2);
    let mut store = migrated_store();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    store.bulk_write(&output).unwrap();

    let report = store.integrity_report().unwrap();
    assert!(report.is_clean(), "integrity issues: {:?}", report.issues());
}

#[test]
fn missing_catalog_rolls_back_the_whole_load() {
    let output = run(3);
    let mut store = migrated_store();

    assert!(store.bulk_write(&output).is_err(), "unknown courses must fail the load");
    assert_eq!(store.count(Table::Students).unwrap(), 0);
    assert_eq!(store.count(Table::Enrollments).unwrap(), 0);
    assert_eq!(store.count(Table::CourseEnrollments).unwrap(), 0);
}

#[test]
fn failed_load_leaves_no_run_record() {
    let output = run(7);
    let config = SimConfig::default_test();
    let mut store = migrated_store();

    // No catalog yet: course rows violate their foreign key.
    assert!(store.bulk_write_run("run-a", &config, "0.1.0-test", &output).is_err());
    assert_eq!(store.count(Table::Runs).unwrap(), 0, "run record survived a failed load");

    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    store.bulk_write_run("run-a", &config, "0.1.0-test", &output).unwrap();
    assert_eq!(store.count(Table::Runs).unwrap(), 1);
}

#[test]
fn second_run_into_the_same_file_leaves_only_the_first() {
    let path = std::env::temp_dir().join(format!("enrollsim-reload-{}.db", std::process::id()));
    let path = path.to_string_lossy().into_owned();
    let _ = std::fs::remove_file(&path);
    let config = SimConfig::default_test();

    let first = run(8);
    {
        let mut store = SimStore::open(&path).unwrap();
        store.migrate().unwrap();
        store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
        store.bulk_write_run("run-a", &config, "0.1.0-test", &first).unwrap();
    }

    let mut store = SimStore::open(&path).unwrap();
    store.migrate().unwrap();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    let second = store.bulk_write_run("run-b", &config, "0.1.0-test", &run(9));

    let runs = store.count(Table::Runs).unwrap();
    let students = store.count(Table::Students).unwrap();
    drop(store);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }

    assert!(second.is_err(), "colliding student ids must fail the second load");
    assert_eq!(runs, 1, "failed load left its run record behind");
    assert_eq!(students, first.students.len() as i64);
}

#[test]
fn integrity_failure_rolls_back_before_commit() {
    let mut output = run(10);
    output.enrollments[0].avg_gpa = 5.0;
    let mut store = migrated_store();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();

    match store.bulk_write_run("run-bad", &SimConfig::default_test(), "0.1.0-test", &output) {
        Err(SimError::Integrity { issues }) => {
            assert!(issues.iter().any(|i| i.contains("avg_gpa")), "{issues:?}");
        }
        other => panic!("expected an integrity failure, got {other:?}"),
    }
    assert_eq!(store.count(Table::Runs).unwrap(), 0);
    assert_eq!(store.count(Table::Students).unwrap(), 0);
    assert_eq!(store.count(Table::Enrollments).unwrap(), 0);
}

#[test]
fn writing_the_same_run_twice_fails_and_keeps_the_first() {
    let output = run(4);
    let mut store = migrated_store();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    store.bulk_write(&output).unwrap();

    assert!(store.bulk_write(&output).is_err());
    assert_eq!(store.count(Table::Students).unwrap(), output.students.len() as i64);
}

#[test]
fn stored_enrollments_read_back_in_term_order() {
    let output = run(5);
    let mut store = migrated_store();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    store.bulk_write(&output).unwrap();

    let student = &output.students[0];
    let rows = store.enrollments_for_student(student.student_id).unwrap();
    let expected: Vec<_> = output.enrollments_for(student.student_id).collect();
    assert_eq!(rows.len(), expected.len());
    for (row, e) in rows.iter().zip(expected) {
        assert_eq!(row.enrollment_id, e.enrollment_id);
        assert_eq!(row.term, e.term);
        assert_eq!(row.status, e.status.as_str());
        assert_eq!(row.class_year, e.class_year as i64);
    }

    let completions = store.completion_count_for_student(student.student_id).unwrap();
    assert!(completions <= 1);
    assert_eq!(
        store.student_count_by_status("Active").unwrap(),
        output.students.iter().filter(|s| s.active).count() as i64
    );
}

#[test]
fn term_counts_match_summaries() {
    let output = run(6);
    let mut store = migrated_store();
    store.seed_course_catalog(&CourseCatalog::standard()).unwrap();
    store.bulk_write(&output).unwrap();

    for summary in &output.term_summaries {
        assert_eq!(
            store.enrollment_count_for_term(&summary.term).unwrap(),
            summary.enrolled as i64
        );
    }
    let awards: i64 = store.completions_by_award().unwrap().iter().map(|(_, n)| n).sum();
    assert_eq!(awards, output.completions.len() as i64);
}
