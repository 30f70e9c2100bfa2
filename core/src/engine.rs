//! The simulation engine: the term scheduler.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   for each term, in chronological order:
//!     1. Admission      (fall terms only: freshmen, then transfers)
//!     2. Term pass      (every student active at term start, in
//!                        population order: course load, distance-ed
//!                        status, retention state machine, award)
//!   after the last term:
//!     3. Cohort pass    (exclusion draws, in admission order)
//!
//! RULES:
//!   - All randomness flows through the one SimRng, in the order above.
//!   - Enrollment rows use the class year and GPA from before the
//!     state machine runs; its outcome only shapes the next term.
//!   - The term pass consumes the current population and returns the
//!     next one. Nothing mutates the list it is iterating.
//!   - Primary keys come from explicit IdSequences owned by the engine.

use crate::{
    calendar::{Term, TermCalendar},
    catalog::{attendance_status, CourseCatalog, AWARD_TYPES, DISTANCE_EDUCATION},
    cohort::CohortTracker,
    config::SimConfig,
    demographics::{DemographicGenerator, TRANSFER_ENTRY_TYPES},
    error::{SimError, SimResult},
    grades::{draw_course_load, MAX_COURSES_PER_TERM},
    records::{
        Completion, CourseEnrollment, Enrollment, EnrollmentStatus, EnrollmentType, SimOutput,
        Student, TermSummary,
    },
    retention::{RetentionPolicy, Transition},
    rng::SimRng,
    sampler::weighted_pick,
    types::{IdSequence, TermIndex},
};

pub const LEVEL_UNDERGRADUATE: &str = "Undergraduate";

/// One primary-key sequence per generated table.
#[derive(Debug, Clone, Default)]
pub struct IdCounters {
    pub students: IdSequence,
    pub enrollments: IdSequence,
    pub course_enrollments: IdSequence,
    pub completions: IdSequence,
    pub cohorts: IdSequence,
}

pub struct SimEngine {
    pub config: SimConfig,
    pub calendar: TermCalendar,
    catalog: CourseCatalog,
    policy: RetentionPolicy,
    rng: SimRng,
    ids: IdCounters,
    cohorts: CohortTracker,
    population: Vec<Student>,
    output: SimOutput,
    next_term: TermIndex,
}

impl SimEngine {
    /// Validate the configuration and build an engine over the standard
    /// course catalog.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        Self::with_catalog(config, CourseCatalog::standard())
    }

    pub fn with_catalog(config: SimConfig, catalog: CourseCatalog) -> SimResult<Self> {
        config.validate()?;
        if catalog.len() < MAX_COURSES_PER_TERM {
            return Err(SimError::invalid_config(
                "catalog",
                format!("{} courses, need at least {MAX_COURSES_PER_TERM}", catalog.len()),
            ));
        }
        let calendar =
            TermCalendar::new(config.start_year, config.total_terms, config.term_pattern)?;
        Ok(Self {
            calendar,
            catalog,
            policy: RetentionPolicy::from_config(&config),
            rng: SimRng::new(config.random_seed),
            ids: IdCounters::default(),
            cohorts: CohortTracker::new(config.cohort_exclusion_prob),
            population: Vec::new(),
            output: SimOutput::default(),
            next_term: 0,
            config,
        })
    }

    /// Engine over `SimConfig::default_test()` with the given seed.
    pub fn build_test(seed: u64) -> SimResult<Self> {
        Self::new(SimConfig {
            random_seed: seed,
            ..SimConfig::default_test()
        })
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn terms_remaining(&self) -> usize {
        self.calendar.len() - self.next_term
    }

    /// Simulate the next term. Returns `None` once the horizon is done.
    pub fn run_term(&mut self) -> SimResult<Option<TermSummary>> {
        if self.next_term >= self.calendar.len() {
            return Ok(None);
        }
        let term = self.calendar.term(self.next_term).clone();
        self.next_term += 1;

        let mut summary = TermSummary {
            term: term.label.clone(),
            ..TermSummary::default()
        };
        if term.is_fall() {
            summary.entrants = self.admit_entrants(&term);
        }

        let population = std::mem::take(&mut self.population);
        let mut next_population = Vec::with_capacity(population.len());
        let mut gpa_total = 0.0;
        for student in population {
            if !student.active {
                next_population.push(student);
                continue;
            }
            let (carried, gpa) = self.simulate_student_term(&student, &term, &mut summary)?;
            gpa_total += gpa;
            next_population.push(carried);
        }
        self.population = next_population;

        if summary.enrolled > 0 {
            summary.mean_gpa = gpa_total / summary.enrolled as f64;
        }
        log::info!(
            "term={} admitted {} enrolled {} graduated {} withdrew {} advanced {} mean_gpa={:.2}",
            summary.term,
            summary.entrants,
            summary.enrolled,
            summary.graduated,
            summary.withdrawn,
            summary.advanced,
            summary.mean_gpa
        );
        self.output.term_summaries.push(summary.clone());
        Ok(Some(summary))
    }

    /// Run every remaining term, then the cohort pass.
    pub fn run(mut self) -> SimResult<SimOutput> {
        while self.run_term()?.is_some() {}
        self.finish()
    }

    /// Resolve cohorts and hand back all accumulated rows.
    pub fn finish(mut self) -> SimResult<SimOutput> {
        let cohorts = self.cohorts.finalize(
            &mut self.rng,
            &self.calendar,
            &self.output.enrollments,
            &self.output.completions,
            &mut self.ids.cohorts,
        );
        self.output.cohorts = cohorts;
        self.output.students = self.population;
        log::info!(
            "run complete: {} students, {} enrollments, {} course enrollments, \
             {} completions, {} cohort rows ({} draws)",
            self.output.students.len(),
            self.output.enrollments.len(),
            self.output.course_enrollments.len(),
            self.output.completions.len(),
            self.output.cohorts.len(),
            self.rng.draws()
        );
        Ok(self.output)
    }

    fn admit_entrants(&mut self, term: &Term) -> usize {
        let freshmen = DemographicGenerator::entrant_count(
            &mut self.rng,
            self.config.new_freshmen_each_fall,
            self.config.freshman_variation,
        );
        for _ in 0..freshmen {
            self.admit(EnrollmentType::FirstTime, term);
        }

        let transfers = if self.config.new_transfers_each_fall > 0 {
            DemographicGenerator::entrant_count(
                &mut self.rng,
                self.config.new_transfers_each_fall,
                self.config.transfer_variation,
            )
        } else {
            0
        };
        for _ in 0..transfers {
            let entry_type = *weighted_pick(&mut self.rng, TRANSFER_ENTRY_TYPES);
            self.admit(entry_type, term);
        }

        log::debug!("term={} admission: {freshmen} first-time, {transfers} transfer", term.label);
        freshmen + transfers
    }

    fn admit(&mut self, enrollment_type: EnrollmentType, term: &Term) {
        let student_id = self.ids.students.next_id();
        let student =
            DemographicGenerator::generate(&mut self.rng, student_id, enrollment_type, term);
        self.cohorts.record(student_id, enrollment_type, term.index);
        self.population.push(student);
    }

    /// One active student through one term. Returns the state carried into
    /// the next term and the term GPA.
    fn simulate_student_term(
        &mut self,
        student: &Student,
        term: &Term,
        summary: &mut TermSummary,
    ) -> SimResult<(Student, f64)> {
        let load = draw_course_load(&mut self.rng, &self.catalog, self.config.default_gpa);
        let distance_education = *weighted_pick(&mut self.rng, DISTANCE_EDUCATION);
        let transition = self.policy.transition(
            &mut self.rng,
            student.class_year,
            load.avg_gpa,
            &student.race_ethnicity,
        );

        let mut carried = student.clone();
        let status = match transition {
            Transition::Graduated => {
                let award_type = *weighted_pick(&mut self.rng, AWARD_TYPES);
                self.output.completions.push(Completion {
                    completion_id: self.ids.completions.next_id(),
                    student_id: student.student_id,
                    award_type: award_type.into(),
                    cip_code: student.program.clone(),
                    completion_date: term.completion_date()?,
                });
                carried.active = false;
                carried.status = EnrollmentStatus::Completed;
                summary.graduated += 1;
                EnrollmentStatus::Completed
            }
            Transition::Retained { next_class_year } => {
                if next_class_year > student.class_year {
                    summary.advanced += 1;
                }
                carried.class_year = next_class_year;
                EnrollmentStatus::Active
            }
            Transition::Withdrawn => {
                carried.active = false;
                carried.status = EnrollmentStatus::Withdrawn;
                summary.withdrawn += 1;
                EnrollmentStatus::Withdrawn
            }
        };

        let enrollment_id = self.ids.enrollments.next_id();
        let enrollment_type = if term.index == student.first_term {
            student.enrollment_type
        } else {
            EnrollmentType::Continuing
        };
        self.output.enrollments.push(Enrollment {
            enrollment_id,
            student_id: student.student_id,
            term_index: term.index,
            term: term.label.clone(),
            term_start_date: term.start_date,
            program: student.program.clone(),
            status,
            retained_next_term: transition.is_retained(),
            class_year: student.class_year,
            avg_gpa: load.avg_gpa,
            level: LEVEL_UNDERGRADUATE.into(),
            enrollment_type,
            attendance_status: attendance_status(load.credit_hours).into(),
            seeking_status: student.seeking_status.clone(),
            distance_education_status: distance_education.into(),
            credit_hours: load.credit_hours,
        });
        for course in &load.courses {
            self.output.course_enrollments.push(CourseEnrollment {
                course_enrollment_id: self.ids.course_enrollments.next_id(),
                enrollment_id,
                course_id: course.course_id,
                grade: course.grade.into(),
                grade_points: course.grade_points,
            });
        }

        summary.enrolled += 1;
        Ok((carried, load.avg_gpa))
    }
}
