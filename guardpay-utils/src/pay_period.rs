use std::fmt::{Display, Formatter};
use thiserror::*;

use time::{Date, Month};

/// The payroll cycle runs from the 26th of one calendar month to the 25th of
/// the next, so a period always spans two calendar months.
pub const PERIOD_START_DAY: u8 = 26;
pub const PERIOD_END_DAY: u8 = 25;

#[derive(Debug, Error)]
pub enum PayPeriodError {
    #[error("Invalid month number: {0}")]
    InvalidMonth(u8),
    #[error("Invalid date: {0}")]
    DateError(#[from] time::error::ComponentRange),
}

/// A calendar month used as the anchor for deriving pay periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferenceMonth {
    year: i32,
    month: Month,
}

impl ReferenceMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn from_ymd(year: i32, month: u8) -> Result<Self, PayPeriodError> {
        let month = Month::try_from(month).map_err(|_| PayPeriodError::InvalidMonth(month))?;
        Ok(Self { year, month })
    }

    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == Month::January {
            Self {
                year: self.year - 1,
                month: Month::December,
            }
        } else {
            Self {
                year: self.year,
                month: self.month.previous(),
            }
        }
    }

    /// First day of the calendar month.  This is the attendance split date:
    /// days before it belong to the "previous month" bucket of the period.
    pub fn first_day(&self) -> Date {
        self.with_day(1)
    }

    /// Every month has at least 28 days, so any day up to 28 is safe.
    pub fn with_day(&self, day: u8) -> Date {
        debug_assert!(day <= 28 || day <= self.month.length(self.year));
        Date::from_calendar_date(self.year, self.month, day)
            .expect("Day values up to 28 exist in every month")
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }
}

impl Display for ReferenceMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl From<Date> for ReferenceMonth {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}

/// One 26th-to-25th pay period.  Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PayPeriod {
    from: Date,
    to: Date,
}

impl PayPeriod {
    /// Period billed for the reference month: 26th of the month before it
    /// through the 25th of the month itself.
    pub fn current_for(month: ReferenceMonth) -> Self {
        Self {
            from: month.previous().with_day(PERIOD_START_DAY),
            to: month.with_day(PERIOD_END_DAY),
        }
    }

    pub fn previous_for(month: ReferenceMonth) -> Self {
        Self::current_for(month.previous())
    }

    pub fn from_date(&self) -> Date {
        self.from
    }

    pub fn to_date(&self) -> Date {
        self.to
    }

    /// Inclusive day count.  Always at least 1 since `to >= from` by
    /// construction.
    pub fn working_days(&self) -> u32 {
        ((self.to - self.from).whole_days() + 1) as u32
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.from && date <= self.to
    }
}

impl Display for PayPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.from, self.to)
    }
}

/// The current period and the one before it, derived together since every
/// payroll view needs both for the period-over-period comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriodPair {
    pub current: PayPeriod,
    pub previous: PayPeriod,
}

impl PayPeriodPair {
    pub fn for_month(month: ReferenceMonth) -> Self {
        Self {
            current: PayPeriod::current_for(month),
            previous: PayPeriod::previous_for(month),
        }
    }
}
