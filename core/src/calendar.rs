//! Term calendar: the fixed, chronological list of simulated terms.

use crate::{
    error::{SimError, SimResult},
    types::TermIndex,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TermPattern {
    /// One term per academic year (Fall 2019, Fall 2020, ...).
    FallOnly,
    /// Two terms per academic year (Fall 2019, Spring 2020, Fall 2020, ...).
    FallSpring,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Season {
    Fall,
    Spring,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Term {
    pub index: TermIndex,
    pub season: Season,
    /// Calendar year the term starts in.
    pub year: i32,
    pub label: String,
    pub start_date: NaiveDate,
}

impl Term {
    pub fn is_fall(&self) -> bool {
        self.season == Season::Fall
    }

    /// Completion date for an award earned in this term: May 15 of the
    /// academic year's closing calendar year.
    pub fn completion_date(&self) -> SimResult<NaiveDate> {
        let year = match self.season {
            Season::Fall => self.year + 1,
            Season::Spring => self.year,
        };
        date(year, 5, 15)
    }
}

#[derive(Debug, Clone)]
pub struct TermCalendar {
    terms: Vec<Term>,
}

impl TermCalendar {
    /// Build `total_terms` consecutive terms starting with Fall `start_year`.
    pub fn new(start_year: i32, total_terms: usize, pattern: TermPattern) -> SimResult<Self> {
        let mut terms = Vec::with_capacity(total_terms);
        let mut season = Season::Fall;
        let mut year = start_year;
        for index in 0..total_terms {
            let start_date = match season {
                Season::Fall => date(year, 9, 1)?,
                Season::Spring => date(year, 1, 15)?,
            };
            let label = match season {
                Season::Fall => format!("Fall {year}"),
                Season::Spring => format!("Spring {year}"),
            };
            terms.push(Term { index, season, year, label, start_date });

            (season, year) = match (pattern, season) {
                (TermPattern::FallOnly, _) => (Season::Fall, year + 1),
                (TermPattern::FallSpring, Season::Fall) => (Season::Spring, year + 1),
                (TermPattern::FallSpring, Season::Spring) => (Season::Fall, year),
            };
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, index: TermIndex) -> &Term {
        &self.terms[index]
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The fall term one year after `index`, if it falls inside the horizon.
    pub fn following_fall(&self, index: TermIndex) -> Option<&Term> {
        let term = self.terms.get(index)?;
        let target_year = match term.season {
            Season::Fall => term.year + 1,
            Season::Spring => term.year,
        };
        self.terms[index + 1..]
            .iter()
            .find(|t| t.is_fall() && t.year == target_year)
    }
}

fn date(year: i32, month: u32, day: u32) -> SimResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(SimError::CalendarOutOfRange { year })
}
