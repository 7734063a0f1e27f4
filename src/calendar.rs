use chrono::{Datelike, Month, NaiveDate, Weekday};
use num_traits::FromPrimitive;
use std::fmt;
use std::iter;

use crate::error::{Error, ErrorKind, Result};

/// A validated (year, month) pair.
///
/// Construction fails if the month is outside `1..=12` or if chrono cannot
/// represent the first or last day of the month, so every accessor below is
/// infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpec {
    month: Month,
    first: NaiveDate,
    last: NaiveDate,
}

impl MonthSpec {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let value = Month::from_u32(month).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                &format!("month {} is not in range 1..=12", month),
            )
        })?;

        let days = days_of_month(&value, year);
        let unrepresentable = || {
            Error::new(
                ErrorKind::InvalidInput,
                &format!("{}-{:02} cannot be represented as a date", year, month),
            )
        };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(unrepresentable)?;
        let last = NaiveDate::from_ymd_opt(year, month, days).ok_or_else(unrepresentable)?;

        Ok(MonthSpec {
            month: value,
            first,
            last,
        })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn num(&self) -> u32 {
        self.month.number_from_month()
    }

    pub fn month0(&self) -> u32 {
        self.num() - 1
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }
}

impl fmt::Display for MonthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.num())
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// Maps an ISO weekday number (Monday=1 .. Sunday=7) onto a grid column
/// (Monday=0 .. Sunday=6).
pub fn remap_weekday(iso_weekday: u32) -> u32 {
    (iso_weekday + 6) % 7
}

fn column_of(weekday: Weekday) -> u32 {
    remap_weekday(weekday.number_from_monday())
}

pub fn days_in_month(spec: &MonthSpec) -> u32 {
    days_of_month(&spec.month, spec.year())
}

pub fn first_weekday(spec: &MonthSpec) -> u32 {
    column_of(spec.first.weekday())
}

pub fn last_weekday(spec: &MonthSpec) -> u32 {
    column_of(spec.last.weekday())
}

/// Number of week rows needed to lay out the month.
pub fn row_count(spec: &MonthSpec) -> u32 {
    let cells = first_weekday(spec) + days_in_month(spec);
    (cells + GridLayout::COLUMNS as u32 - 1) / GridLayout::COLUMNS as u32
}

pub fn build_grid(spec: &MonthSpec) -> GridLayout {
    let first = first_weekday(spec);
    let days = days_in_month(spec);
    let grid = GridLayout::with_offset(first, days);

    log::debug!(
        "{}: {} days, first column {}, last column {}, {} rows",
        spec,
        days,
        first,
        last_weekday(spec),
        grid.row_count()
    );

    grid
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Day(u32),
}

impl Cell {
    pub fn day(&self) -> Option<u32> {
        match *self {
            Cell::Day(num) => Some(num),
            Cell::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Day(num) => write!(f, "{}", num),
            Cell::Empty => Ok(()),
        }
    }
}

/// One week, Monday first.
pub type Week = [Cell; GridLayout::COLUMNS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    rows: Vec<Week>,
}

impl GridLayout {
    pub const COLUMNS: usize = 7;

    /// Lays out `days` consecutive day numbers starting in column
    /// `first_weekday` (taken modulo 7). Only the last row is padded with
    /// empty cells, so no row is ever completely empty.
    pub fn with_offset(first_weekday: u32, days: u32) -> Self {
        let offset = (first_weekday as usize) % Self::COLUMNS;

        let rows = iter::repeat(Cell::Empty)
            .take(offset)
            .chain((1..=days).map(Cell::Day))
            .collect::<Vec<Cell>>()
            .chunks(Self::COLUMNS)
            .map(|chunk| {
                let mut week: Week = [Cell::Empty; Self::COLUMNS];
                week[..chunk.len()].copy_from_slice(chunk);
                week
            })
            .collect();

        GridLayout { rows }
    }

    pub fn rows(&self) -> &[Week] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|week| week.iter())
    }

    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells().filter_map(Cell::day)
    }
}
