use chrono::{Datelike, Locale, NaiveDate, TimeZone, Weekday};
use chrono_tz::Tz;
use std::convert::TryFrom;

use crate::calendar::MonthSpec;
use crate::error::{Error, ErrorKind, Result};

/// Parses a locale identifier such as `pl_PL`, `pl-PL` or `pl_PL.UTF-8`.
pub fn parse_locale(id: &str) -> Result<Locale> {
    let name = id.split('.').next().unwrap_or(id).replace('-', "_");

    Locale::try_from(name.as_str()).map_err(|_| {
        Error::new(
            ErrorKind::ConfigurationError,
            &format!("unsupported locale '{}'", id),
        )
    })
}

pub fn parse_timezone(id: &str) -> Result<Tz> {
    id.parse::<Tz>().map_err(|e| {
        Error::new(
            ErrorKind::ConfigurationError,
            &format!("unsupported timezone '{}': {}", id, e),
        )
    })
}

// `%B` reads LC_TIME::MON, which holds the genitive forms in these locales.
fn standalone_months(locale: Locale) -> Option<&'static [&'static str]> {
    use pure_rust_locales as locales;

    match locale {
        Locale::pl_PL => locales::pl_PL::LC_TIME::ALT_MON,
        Locale::ru_RU => locales::ru_RU::LC_TIME::ALT_MON,
        Locale::uk_UA => locales::uk_UA::LC_TIME::ALT_MON,
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayLabel {
    pub text: String,
    pub weekday: Weekday,
}

impl WeekdayLabel {
    pub fn is_sunday(&self) -> bool {
        self.weekday == Weekday::Sun
    }
}

/// Seven short weekday names, Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayLabels(Vec<WeekdayLabel>);

impl WeekdayLabels {
    pub fn iter(&self) -> impl Iterator<Item = &WeekdayLabel> {
        self.0.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.0.iter().map(|label| label.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabels {
    pub month_name: String,
    pub weekdays: WeekdayLabels,
}

/// Formats month and weekday names for one locale in one timezone.
#[derive(Debug, Clone, Copy)]
pub struct LabelProvider {
    locale: Locale,
    tz: Tz,
}

impl LabelProvider {
    pub fn new(locale: &str, timezone: &str) -> Result<Self> {
        Ok(LabelProvider {
            locale: parse_locale(locale)?,
            tz: parse_timezone(timezone)?,
        })
    }

    pub fn labels(&self, spec: &MonthSpec) -> Result<MonthLabels> {
        Ok(MonthLabels {
            month_name: self.month_name(spec)?,
            weekdays: self.weekday_labels(spec)?,
        })
    }

    /// Standalone (nominative) month name where the locale distinguishes
    /// it, e.g. "październik" rather than "października" for `pl_PL`.
    pub fn month_name(&self, spec: &MonthSpec) -> Result<String> {
        let standalone =
            standalone_months(self.locale).and_then(|names| names.get(spec.month0() as usize));

        match standalone {
            Some(name) => Ok((*name).to_owned()),
            None => self.format(spec.first_day(), "%B"),
        }
    }

    pub fn weekday_labels(&self, spec: &MonthSpec) -> Result<WeekdayLabels> {
        let mut week: Vec<NaiveDate> = spec.first_day().iter_days().take(7).collect();

        if week.len() != 7 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                &format!("first week of {} cannot be represented", spec),
            ));
        }

        week.sort_by_key(|date| date.weekday().num_days_from_monday());

        let labels = week
            .into_iter()
            .map(|date| {
                Ok(WeekdayLabel {
                    text: self.format(date, "%a")?,
                    weekday: date.weekday(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WeekdayLabels(labels))
    }

    // Local midnight may not exist on DST transition days, noon always does.
    fn format(&self, date: NaiveDate, fmt: &str) -> Result<String> {
        let local = date
            .and_hms_opt(12, 0, 0)
            .and_then(|dt| self.tz.from_local_datetime(&dt).earliest())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidInput,
                    &format!("{} does not exist in timezone {:?}", date, self.tz),
                )
            })?;

        Ok(local.format_localized(fmt, self.locale).to_string())
    }
}
