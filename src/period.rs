use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

/// A calendar month reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub const fn new(month: u32, year: i32) -> Self {
        Period { month, year }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Period::new(date.month(), date.year())
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Period::new(12, self.year - 1)
        } else {
            Period::new(self.month - 1, self.year)
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_month_stays_in_same_year() {
        let period = Period::containing(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap());
        assert_eq!(period, Period::new(8, 2025));
        assert_eq!(period.previous(), Period::new(7, 2025));
    }

    #[test]
    fn january_wraps_to_previous_december() {
        let period = Period::new(1, 2026);
        assert_eq!(period.previous(), Period::new(12, 2025));
    }

    #[test]
    fn displays_as_month_slash_year() {
        assert_eq!(Period::new(3, 2026).to_string(), "03/2026");
    }
}
