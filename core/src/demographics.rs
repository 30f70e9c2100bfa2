//! New-entrant generation.
//!
//! Every attribute is an independent weighted draw, taken in this order:
//!   gender, race/ethnicity, first name, last name,
//!   citizenship (+ state or country), age, program, seeking status,
//!   class year (transfer and continuing entrants only).

use crate::{
    calendar::Term,
    catalog::{PROGRAMS, SEEKING_STATUS},
    name_generator::NameGenerator,
    records::{EnrollmentStatus, EnrollmentType, Student},
    rng::SimRng,
    sampler::weighted_pick,
    types::{ClassYear, StudentId, FRESHMAN},
};
use chrono::Duration;

pub const GENDERS: &[(&str, f64)] = &[
    ("Female", 0.56),
    ("Male", 0.43),
    ("Other/Unknown", 0.01),
];

pub const NONRESIDENT_ALIEN: &str = "Nonresident Alien";

/// Category whose retention probability carries the configured penalty.
pub const PENALIZED_RACE: &str = "Black/African American";

pub const RACE_ETHNICITY: &[(&str, f64)] = &[
    ("White", 0.50),
    ("Hispanic/Latino", 0.18),
    ("Black/African American", 0.12),
    ("Asian", 0.07),
    ("Two or More Races", 0.04),
    ("American Indian/Alaska Native", 0.01),
    ("Native Hawaiian/Pacific Islander", 0.005),
    ("Race Unknown", 0.035),
    (NONRESIDENT_ALIEN, 0.04),
];

pub const DOMESTIC_CITIZENSHIP: &[(&str, f64)] = &[
    ("U.S. Citizen", 0.94),
    ("Permanent Resident", 0.06),
];

/// Sentinel label resolved by a uniform pick over `OTHER_STATES`.
const OTHER_STATES_LABEL: &str = "Other states";

/// (state, FIPS code) weighted toward the home state.
const STATES: &[((&str, &str), f64)] = &[
    (("Ohio", "39"), 0.72),
    (("Pennsylvania", "42"), 0.05),
    (("Michigan", "26"), 0.04),
    (("Indiana", "18"), 0.03),
    (("Kentucky", "21"), 0.03),
    (("West Virginia", "54"), 0.02),
    (("New York", "36"), 0.02),
    (("Illinois", "17"), 0.02),
    ((OTHER_STATES_LABEL, ""), 0.07),
];

const OTHER_STATES: &[(&str, &str)] = &[
    ("California", "06"),
    ("Florida", "12"),
    ("Georgia", "13"),
    ("Maryland", "24"),
    ("New Jersey", "34"),
    ("North Carolina", "37"),
    ("Tennessee", "47"),
    ("Texas", "48"),
    ("Virginia", "51"),
    ("Wisconsin", "55"),
];

const INTERNATIONAL_COUNTRIES: &[(&str, f64)] = &[
    ("China", 0.28),
    ("India", 0.24),
    ("South Korea", 0.07),
    ("Saudi Arabia", 0.05),
    ("Canada", 0.05),
    ("Vietnam", 0.05),
    ("Nigeria", 0.05),
    ("Brazil", 0.04),
    ("Mexico", 0.04),
    ("Other", 0.13),
];

/// Entry type of a non-freshman entrant.
pub const TRANSFER_ENTRY_TYPES: &[(EnrollmentType, f64)] = &[
    (EnrollmentType::TransferIn, 0.85),
    (EnrollmentType::Continuing, 0.15),
];

/// Age band (inclusive, in whole years) at term start.
pub fn age_band(enrollment_type: EnrollmentType) -> (i64, i64) {
    match enrollment_type {
        EnrollmentType::FirstTime => (17, 20),
        EnrollmentType::TransferIn => (19, 25),
        EnrollmentType::Continuing => (18, 24),
    }
}

/// Residence attributes drawn together because they depend on one another.
struct Residence {
    citizenship: String,
    state: Option<(String, String)>,
    country: String,
}

pub struct DemographicGenerator;

impl DemographicGenerator {
    /// Base count plus a uniform perturbation in [-variation, variation],
    /// floored at zero. One draw.
    pub fn entrant_count(rng: &mut SimRng, base: u32, variation: u32) -> usize {
        let v = variation as i64;
        let delta = rng.range_inclusive(-v, v);
        (base as i64 + delta).max(0) as usize
    }

    /// Draw a complete new student admitted in `term`.
    pub fn generate(
        rng: &mut SimRng,
        student_id: StudentId,
        enrollment_type: EnrollmentType,
        term: &Term,
    ) -> Student {
        let gender = *weighted_pick(rng, GENDERS);
        let race = *weighted_pick(rng, RACE_ETHNICITY);
        let first_name = NameGenerator::first_name(rng, gender);
        let last_name = NameGenerator::last_name(rng);
        let residence = Self::residence(rng, race);

        let (min_age, max_age) = age_band(enrollment_type);
        let age_days = rng.range_inclusive(min_age * 365, (max_age + 1) * 365 - 1);
        let dob = term.start_date - Duration::days(age_days);

        let program = *weighted_pick(rng, PROGRAMS);
        let seeking_status = *weighted_pick(rng, SEEKING_STATUS);
        let class_year = Self::entry_class_year(rng, enrollment_type);

        let (state_of_residence, state_fips_code) = match residence.state {
            Some((name, fips)) => (Some(name), Some(fips)),
            None => (None, None),
        };

        Student {
            student_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            dob,
            gender: gender.into(),
            race_ethnicity: race.into(),
            citizenship: residence.citizenship,
            state_of_residence,
            state_fips_code,
            country: residence.country,
            enrollment_type,
            seeking_status: seeking_status.into(),
            program: program.into(),
            entry_class_year: class_year,
            class_year,
            active: true,
            status: EnrollmentStatus::Active,
            first_term: term.index,
            first_term_label: term.label.clone(),
        }
    }

    fn entry_class_year(rng: &mut SimRng, enrollment_type: EnrollmentType) -> ClassYear {
        match enrollment_type {
            EnrollmentType::FirstTime => FRESHMAN,
            EnrollmentType::TransferIn | EnrollmentType::Continuing => {
                rng.range_inclusive(1, 3) as ClassYear
            }
        }
    }

    fn residence(rng: &mut SimRng, race: &str) -> Residence {
        if race == NONRESIDENT_ALIEN {
            return Residence {
                citizenship: "Nonresident".into(),
                state: None,
                country: (*weighted_pick(rng, INTERNATIONAL_COUNTRIES)).into(),
            };
        }

        let citizenship = *weighted_pick(rng, DOMESTIC_CITIZENSHIP);
        let (mut state, mut fips) = *weighted_pick(rng, STATES);
        if state == OTHER_STATES_LABEL {
            (state, fips) = *rng.pick(OTHER_STATES);
        }
        Residence {
            citizenship: citizenship.into(),
            state: Some((state.into(), fips.into())),
            country: "United States".into(),
        }
    }
}
