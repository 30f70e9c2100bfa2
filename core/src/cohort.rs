//! IPEDS-style first-time cohort tracking.
//!
//! Entrants are recorded as they are admitted. After the last term the
//! tracker reads the finished enrollment and completion rows and resolves
//! each entry into a `Cohort` row. It never touches student state.

use crate::{
    calendar::TermCalendar,
    records::{Cohort, Completion, Enrollment, EnrollmentType},
    rng::SimRng,
    types::{IdSequence, StudentId, TermIndex},
};
use std::collections::{HashMap, HashSet};

/// Reason recorded on every excluded cohort member.
pub const EXCLUSION_REASON: &str =
    "Death, disability, military service, foreign aid service, or official church mission";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CohortEntry {
    student_id: StudentId,
    term_index: TermIndex,
}

#[derive(Debug, Clone)]
pub struct CohortTracker {
    exclusion_prob: f64,
    entries: Vec<CohortEntry>,
}

impl CohortTracker {
    pub fn new(exclusion_prob: f64) -> Self {
        Self {
            exclusion_prob,
            entries: Vec::new(),
        }
    }

    /// Record an entrant. Only first-time entrants join a cohort;
    /// anything else is ignored.
    pub fn record(
        &mut self,
        student_id: StudentId,
        enrollment_type: EnrollmentType,
        term_index: TermIndex,
    ) {
        if enrollment_type == EnrollmentType::FirstTime {
            self.entries.push(CohortEntry {
                student_id,
                term_index,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every recorded entrant into a cohort row, in admission
    /// order. Consumes one exclusion draw per entrant.
    pub fn finalize(
        &self,
        rng: &mut SimRng,
        calendar: &TermCalendar,
        enrollments: &[Enrollment],
        completions: &[Completion],
        ids: &mut IdSequence,
    ) -> Vec<Cohort> {
        let by_student_term: HashMap<(StudentId, TermIndex), &Enrollment> = enrollments
            .iter()
            .map(|e| ((e.student_id, e.term_index), e))
            .collect();
        let completed: HashSet<StudentId> = completions.iter().map(|c| c.student_id).collect();

        let mut cohorts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let term = calendar.term(entry.term_index);
            let entry_enrollment = by_student_term.get(&(entry.student_id, entry.term_index));

            let retained_fall = calendar
                .following_fall(entry.term_index)
                .map(|fall| by_student_term.contains_key(&(entry.student_id, fall.index)))
                .unwrap_or(false);
            let completed_by_fall = completed.contains(&entry.student_id);
            let is_excluded = rng.chance(self.exclusion_prob);

            cohorts.push(Cohort {
                cohort_id: ids.next_id(),
                student_id: entry.student_id,
                cohort_year: term.year,
                cohort_term: term.label.clone(),
                enrollment_type: EnrollmentType::FirstTime,
                attendance_status: entry_enrollment
                    .map(|e| e.attendance_status.clone())
                    .unwrap_or_else(|| "Full-time".into()),
                seeking_status: entry_enrollment
                    .map(|e| e.seeking_status.clone())
                    .unwrap_or_else(|| "Degree-seeking".into()),
                is_excluded,
                exclusion_reason: is_excluded.then(|| EXCLUSION_REASON.to_string()),
                retained_fall,
                completed_by_fall,
            });
        }

        let excluded = cohorts.iter().filter(|c| c.is_excluded).count();
        let retained = cohorts.iter().filter(|c| c.retained_fall).count();
        log::debug!(
            "cohorts: {} entrants, {retained} retained to next fall, {excluded} excluded",
            cohorts.len()
        );
        cohorts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calendar::TermPattern, records::EnrollmentStatus};
    use chrono::NaiveDate;

    fn enrollment(
        id: u64,
        student_id: StudentId,
        term_index: TermIndex,
        attendance: &str,
    ) -> Enrollment {
        Enrollment {
            enrollment_id: id,
            student_id,
            term_index,
            term: format!("Fall {}", 2019 + term_index),
            term_start_date: NaiveDate::from_ymd_opt(2019 + term_index as i32, 9, 1).unwrap(),
            program: "11.0101".into(),
            status: EnrollmentStatus::Active,
            retained_next_term: true,
            class_year: 1,
            avg_gpa: 3.0,
            level: "Undergraduate".into(),
            enrollment_type: EnrollmentType::FirstTime,
            attendance_status: attendance.into(),
            seeking_status: "Degree-seeking".into(),
            distance_education_status: "Not enrolled in any distance education".into(),
            credit_hours: 12,
        }
    }

    #[test]
    fn only_first_time_entrants_are_recorded() {
        let mut tracker = CohortTracker::new(0.0);
        tracker.record(1, EnrollmentType::FirstTime, 0);
        tracker.record(2, EnrollmentType::TransferIn, 0);
        tracker.record(3, EnrollmentType::Continuing, 0);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn retained_fall_requires_enrollment_one_year_later() {
        let calendar = TermCalendar::new(2019, 3, TermPattern::FallOnly).unwrap();
        let mut tracker = CohortTracker::new(0.0);
        tracker.record(1, EnrollmentType::FirstTime, 0);
        tracker.record(2, EnrollmentType::FirstTime, 0);
        tracker.record(3, EnrollmentType::FirstTime, 2);

        let enrollments = vec![
            enrollment(1, 1, 0, "Full-time"),
            enrollment(2, 2, 0, "Part-time"),
            enrollment(3, 1, 1, "Full-time"),
            enrollment(4, 3, 2, "Full-time"),
        ];
        let mut rng = SimRng::new(1);
        let mut ids = IdSequence::new();
        let cohorts = tracker.finalize(&mut rng, &calendar, &enrollments, &[], &mut ids);

        assert_eq!(cohorts.len(), 3);
        assert!(cohorts[0].retained_fall);
        assert!(!cohorts[1].retained_fall);
        assert_eq!(cohorts[1].attendance_status, "Part-time");
        // Fall 2021 cohort: the following fall is past the horizon.
        assert!(!cohorts[2].retained_fall);
        assert_eq!(cohorts[2].cohort_year, 2021);
        assert_eq!(cohorts.iter().map(|c| c.cohort_id).collect::<Vec<_>>(), [1, 2, 3]);
        assert!(cohorts.iter().all(|c| !c.is_excluded && c.exclusion_reason.is_none()));
    }

    #[test]
    fn completion_marks_completed_by_fall() {
        let calendar = TermCalendar::new(2019, 1, TermPattern::FallOnly).unwrap();
        let mut tracker = CohortTracker::new(0.0);
        tracker.record(7, EnrollmentType::FirstTime, 0);
        let completions = vec![Completion {
            completion_id: 1,
            student_id: 7,
            award_type: "Bachelor's".into(),
            cip_code: "11.0101".into(),
            completion_date: NaiveDate::from_ymd_opt(2020, 5, 15).unwrap(),
        }];
        let cohorts = tracker.finalize(
            &mut SimRng::new(1),
            &calendar,
            &[enrollment(1, 7, 0, "Full-time")],
            &completions,
            &mut IdSequence::new(),
        );
        assert!(cohorts[0].completed_by_fall);
    }

    #[test]
    fn certain_exclusion_sets_reason() {
        let calendar = TermCalendar::new(2019, 1, TermPattern::FallOnly).unwrap();
        let mut tracker = CohortTracker::new(1.0);
        tracker.record(1, EnrollmentType::FirstTime, 0);
        let cohorts = tracker.finalize(
            &mut SimRng::new(1),
            &calendar,
            &[enrollment(1, 1, 0, "Full-time")],
            &[],
            &mut IdSequence::new(),
        );
        assert!(cohorts[0].is_excluded);
        assert_eq!(cohorts[0].exclusion_reason.as_deref(), Some(EXCLUSION_REASON));
    }
}
