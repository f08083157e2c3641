//! Cascading date recognition.
//!
//! A [`DateCascade`] holds an ordered list of date families. For a given
//! sentence the families are tried in order and the first one that yields a
//! valid parse wins. Every parse lands on a single integer axis through
//! [`ParsedDate::sort_key`], so dates of mixed precision can be ordered:
//!
//! ```text
//! sort_key = anchor_year * 10000 + month * 100 + day
//! ```
//!
//! Unknown parts count as zero. Coarse precisions anchor on the floor of
//! their continuous period instead of the nominal year, so "the 1990s"
//! (period 1995.0) sorts with 1995.

use chrono::{Datelike, NaiveDate, Utc};
use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const MONTHS: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";
const SHORT_MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sept|sep|oct|nov|dec";

/// Current UTC year, the default reference for relative dates.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// How precisely a date is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// A calendar year.
    Year,
    /// A full calendar date.
    Day,
    /// A month of a year.
    Month,
    /// Early, mid or late part of a year or decade.
    Period,
    /// A decade such as the 1990s.
    Decade,
    /// A quarter or half of a year.
    Quarter,
    /// A century.
    Century,
    /// A historical era.
    Era,
    /// Relative to the reference year.
    Relative,
}

impl Precision {
    /// Whether the sort key anchors on the period rather than the year.
    pub fn is_coarse(&self) -> bool {
        !matches!(self, Self::Year | Self::Day | Self::Month)
    }
}

/// Calendar parts recovered from a date expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub century: Option<u32>,
}

impl DateParts {
    fn year(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }
}

/// A parsed date with its position on the shared ordering axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDate {
    #[serde(flatten)]
    pub parts: DateParts,
    pub precision: Precision,
    /// Continuous position in years, e.g. 1992.0 for "early 1990s".
    pub period: f64,
    pub sort_key: i64,
}

impl ParsedDate {
    fn new(parts: DateParts, precision: Precision, period: f64) -> Self {
        let anchor = if precision.is_coarse() {
            period.floor() as i64
        } else {
            i64::from(parts.year)
        };
        let month = i64::from(parts.month.unwrap_or(0));
        let day = i64::from(parts.day.unwrap_or(0));
        Self {
            parts,
            precision,
            period,
            sort_key: anchor * 10_000 + month * 100 + day,
        }
    }
}

/// A date found in a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct DateMatch {
    /// The matched text.
    pub raw: String,
    /// Byte range of the match in the sentence.
    pub start: usize,
    pub end: usize,
    pub date: ParsedDate,
}

/// The date families, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFamily {
    BareYear,
    NumericDate,
    IsoDate,
    MonthDayYear,
    DayMonthYear,
    MonthYear,
    ShortMonthYear,
    RelativePeriod,
    Decade,
    QuarterOrHalf,
    Century,
    HistoricalEra,
    YearsAgo,
    RelativeWord,
}

impl DateFamily {
    /// All families in evaluation order.
    pub const ALL: [DateFamily; 14] = [
        Self::BareYear,
        Self::NumericDate,
        Self::IsoDate,
        Self::MonthDayYear,
        Self::DayMonthYear,
        Self::MonthYear,
        Self::ShortMonthYear,
        Self::RelativePeriod,
        Self::Decade,
        Self::QuarterOrHalf,
        Self::Century,
        Self::HistoricalEra,
        Self::YearsAgo,
        Self::RelativeWord,
    ];

    fn pattern(&self) -> String {
        match self {
            Self::BareYear => r"\b(\d{4})\b".to_string(),
            Self::NumericDate => r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{4})\b".to_string(),
            Self::IsoDate => r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b".to_string(),
            Self::MonthDayYear => {
                format!(r"(?i)\b({MONTHS})\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b")
            }
            Self::DayMonthYear => {
                format!(r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS}),?\s+(\d{{4}})\b")
            }
            Self::MonthYear => format!(r"(?i)\b({MONTHS})\s+(\d{{4}})\b"),
            Self::ShortMonthYear => format!(r"(?i)\b({SHORT_MONTHS})\.?\s+(\d{{4}})\b"),
            Self::RelativePeriod => r"(?i)\b(early|mid|late)[\s-]+(\d{4})(s?)\b".to_string(),
            Self::Decade => r"\b(\d{3}0)s\b".to_string(),
            Self::QuarterOrHalf => {
                r"(?i)\b(first|second|third|fourth|last)\s+(quarter|half)\s+of\s+(\d{4})\b"
                    .to_string()
            }
            Self::Century => r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\s+century\b".to_string(),
            Self::HistoricalEra => {
                r"(?i)\b(ancient|medieval|modern|contemporary|prehistoric)\s+(?:times?|era|period)\b"
                    .to_string()
            }
            Self::YearsAgo => r"(?i)\b(\d+)\s+years?\s+ago\b".to_string(),
            Self::RelativeWord => {
                r"(?i)\b(recently|lately|currently|now|today|tomorrow|yesterday)\b".to_string()
            }
        }
    }
}

/// Ordered date recognizer.
pub struct DateCascade {
    families: Vec<(DateFamily, Regex)>,
    /// Text immediately before a year that disqualifies it as a bare year.
    bare_year_prefix: Regex,
}

impl DateCascade {
    /// Compile every family.
    pub fn new() -> Result<Self> {
        let families = DateFamily::ALL
            .iter()
            .map(|family| Regex::new(&family.pattern()).map(|re| (*family, re)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let bare_year_prefix = Regex::new(&format!(
            r"(?i)(?:\b(?:{MONTHS}|{SHORT_MONTHS})\.?(?:\s+\d{{1,2}}(?:st|nd|rd|th)?,?)?|\b(?:quarter|half)\s+of|\b(?:early|mid|late)|\d[-/])\s*$"
        ))?;

        Ok(Self {
            families,
            bare_year_prefix,
        })
    }

    /// Families in evaluation order.
    pub fn families(&self) -> impl Iterator<Item = DateFamily> + '_ {
        self.families.iter().map(|(family, _)| *family)
    }

    /// Find the first date in `sentence`, trying families in order.
    pub fn find(&self, sentence: &str, reference_year: i32) -> Option<DateMatch> {
        self.families.iter().find_map(|(family, regex)| {
            regex.captures_iter(sentence).find_map(|cap| {
                let whole = cap.get(0)?;
                if *family == DateFamily::BareYear
                    && !self.is_bare_year(sentence, whole.start(), whole.end())
                {
                    return None;
                }
                let date = parse_family(*family, &cap, reference_year)?;
                Some(DateMatch {
                    raw: whole.as_str().to_string(),
                    start: whole.start(),
                    end: whole.end(),
                    date,
                })
            })
        })
    }

    /// Parse the first date in `sentence`.
    pub fn parse(&self, sentence: &str, reference_year: i32) -> Option<ParsedDate> {
        self.find(sentence, reference_year).map(|m| m.date)
    }

    fn is_bare_year(&self, sentence: &str, start: usize, end: usize) -> bool {
        let before = &sentence[..start];
        let after = &sentence[end..];
        let mut after_chars = after.chars();
        let part_of_numeric_date = matches!(after_chars.next(), Some('-' | '/'))
            && after_chars.next().is_some_and(|c| c.is_ascii_digit());
        !part_of_numeric_date && !self.bare_year_prefix.is_match(before)
    }
}

fn capture<'a>(cap: &'a Captures<'_>, index: usize) -> Option<&'a str> {
    cap.get(index).map(|m| m.as_str())
}

fn number<T: std::str::FromStr>(cap: &Captures<'_>, index: usize) -> Option<T> {
    capture(cap, index)?.parse().ok()
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let lower = lower.trim_end_matches('.');
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn month_period(year: i32, month: u32) -> f64 {
    f64::from(year) + f64::from(month - 1) / 12.0
}

fn calendar_date(year: i32, month: u32, day: u32) -> Option<ParsedDate> {
    NaiveDate::from_ymd_opt(year, month, day)?;
    let parts = DateParts {
        month: Some(month),
        day: Some(day),
        ..DateParts::year(year)
    };
    Some(ParsedDate::new(parts, Precision::Day, month_period(year, month)))
}

fn month_date(year: i32, month: u32) -> ParsedDate {
    let parts = DateParts {
        month: Some(month),
        ..DateParts::year(year)
    };
    ParsedDate::new(parts, Precision::Month, month_period(year, month))
}

fn parse_family(family: DateFamily, cap: &Captures<'_>, reference_year: i32) -> Option<ParsedDate> {
    match family {
        DateFamily::BareYear => {
            let year: i32 = number(cap, 1)?;
            (1800..=2100)
                .contains(&year)
                .then(|| ParsedDate::new(DateParts::year(year), Precision::Year, f64::from(year)))
        }
        DateFamily::NumericDate => {
            let first: u32 = number(cap, 1)?;
            let second: u32 = number(cap, 2)?;
            let year: i32 = number(cap, 3)?;
            calendar_date(year, first, second).or_else(|| calendar_date(year, second, first))
        }
        DateFamily::IsoDate => calendar_date(number(cap, 1)?, number(cap, 2)?, number(cap, 3)?),
        DateFamily::MonthDayYear => {
            let month = month_from_name(capture(cap, 1)?)?;
            calendar_date(number(cap, 3)?, month, number(cap, 2)?)
        }
        DateFamily::DayMonthYear => {
            let month = month_from_name(capture(cap, 2)?)?;
            calendar_date(number(cap, 3)?, month, number(cap, 1)?)
        }
        DateFamily::MonthYear | DateFamily::ShortMonthYear => {
            let month = month_from_name(capture(cap, 1)?)?;
            Some(month_date(number(cap, 2)?, month))
        }
        DateFamily::RelativePeriod => {
            let offset = match capture(cap, 1)?.to_lowercase().as_str() {
                "early" => 0.2,
                "late" => 0.8,
                _ => 0.5,
            };
            let year: i32 = number(cap, 2)?;
            let is_decade = capture(cap, 3).is_some_and(|s| !s.is_empty());
            let span = if is_decade { 10.0 } else { 1.0 };
            Some(ParsedDate::new(
                DateParts::year(year),
                Precision::Period,
                f64::from(year) + offset * span,
            ))
        }
        DateFamily::Decade => {
            let decade: i32 = number(cap, 1)?;
            Some(ParsedDate::new(
                DateParts::year(decade),
                Precision::Decade,
                f64::from(decade) + 5.0,
            ))
        }
        DateFamily::QuarterOrHalf => {
            let ordinal = match capture(cap, 1)?.to_lowercase().as_str() {
                "first" => 1,
                "second" => 2,
                "third" => 3,
                _ => 4,
            };
            let year: i32 = number(cap, 3)?;
            let (quarter, month) = if capture(cap, 2)?.eq_ignore_ascii_case("half") {
                if ordinal == 1 { (1, 3) } else { (3, 9) }
            } else {
                (ordinal, (ordinal - 1) * 3 + 2)
            };
            let parts = DateParts {
                month: Some(month),
                quarter: Some(quarter),
                ..DateParts::year(year)
            };
            Some(ParsedDate::new(
                parts,
                Precision::Quarter,
                month_period(year, month),
            ))
        }
        DateFamily::Century => {
            let century: u32 = number(cap, 1)?;
            if century == 0 {
                return None;
            }
            let year = (century as i32 - 1) * 100 + 50;
            let parts = DateParts {
                century: Some(century),
                ..DateParts::year(year)
            };
            Some(ParsedDate::new(parts, Precision::Century, f64::from(year)))
        }
        DateFamily::HistoricalEra => {
            let year = match capture(cap, 1)?.to_lowercase().as_str() {
                "ancient" => 500,
                "modern" => 1800,
                "contemporary" => 1950,
                "prehistoric" => -2000,
                _ => 1000,
            };
            Some(ParsedDate::new(DateParts::year(year), Precision::Era, f64::from(year)))
        }
        DateFamily::YearsAgo => {
            let ago: i32 = number(cap, 1)?;
            let year = reference_year.checked_sub(ago)?;
            Some(ParsedDate::new(
                DateParts::year(year),
                Precision::Relative,
                f64::from(year),
            ))
        }
        DateFamily::RelativeWord => {
            let year = match capture(cap, 1)?.to_lowercase().as_str() {
                "recently" | "lately" | "yesterday" => reference_year.checked_sub(1)?,
                "tomorrow" => reference_year.checked_add(1)?,
                _ => reference_year,
            };
            Some(ParsedDate::new(
                DateParts::year(year),
                Precision::Relative,
                f64::from(year),
            ))
        }
    }
}
