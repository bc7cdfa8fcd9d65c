//! Approximate date parsing and the age/life statistics derived from it.
//!
//! Every function here is pure: "today" is always supplied by the caller.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};

use crate::constants::{
    AVG_BREATHS_PER_MINUTE, AVG_HEARTBEATS_PER_MINUTE, AVG_MOON_ORBIT_DAYS, MINUTES_PER_DAY,
    PARSE_YEAR_MAX, PARSE_YEAR_MIN,
};

const PLACEHOLDERS: &[&str] = &["[year]", "[date]", "[recent]", "today & beyond", "always"];

// Generic formats, tried in order against the lowercased text.
// %B accepts both full and abbreviated month names when parsing.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dt%H:%M:%S",
    "%Y-%m-%dt%H:%M:%Sz",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dt%H:%M",
];
// Month-only formats resolve to the first of the month.
const MONTH_FORMATS: &[&str] = &["%B %Y", "%B, %Y", "%Y-%m"];

/// Calendar age split into whole years, months and days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub total_days: u64,
}

impl Age {
    pub const ZERO: Age = Age {
        years: 0,
        months: 0,
        days: 0,
        total_days: 0,
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LifeStats {
    pub heartbeats: u64,
    pub breaths: u64,
    pub moon_orbits: f64,
    pub candles: u64,
}

/// Parses the loose date strings used by story events.
///
/// Placeholders and anything unrecognised yield `None`; approximate markers
/// (`~YYYY`, `~YYYY-YYYY`, `~end YYYY`, `~mid YYYY`) and bare years resolve to
/// fixed days inside the year.
pub fn parse_approx_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim().to_lowercase();
    if s.is_empty() || PLACEHOLDERS.contains(&s.as_str()) {
        return None;
    }
    if let Some(marker) = s.strip_prefix('~') {
        return parse_approx_marker(marker);
    }
    if let Some(year) = parse_year(&s) {
        return mid_year(year);
    }
    parse_generic(&s).filter(|d| d.year() > PARSE_YEAR_MIN && d.year() < PARSE_YEAR_MAX)
}

fn parse_approx_marker(marker: &str) -> Option<NaiveDate> {
    if let Some((from, to)) = marker.split_once('-') {
        let (y1, y2) = (parse_year(from)?, parse_year(to)?);
        return mid_year((y1 + y2).div_euclid(2));
    }
    if let Some(rest) = marker.strip_prefix("end ") {
        return NaiveDate::from_ymd_opt(parse_year(rest)?, 11, 15);
    }
    if let Some(rest) = marker.strip_prefix("mid ") {
        return mid_year(parse_year(rest)?);
    }
    mid_year(parse_year(marker)?)
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn mid_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 6, 15)
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    let with_day = format!("{s} 1");
    MONTH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_day, &format!("{fmt} %d")).ok())
}

fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// Age at `target` for someone born on `birth`.
///
/// Negative components borrow from the next larger unit; a target before the
/// birth date gives [`Age::ZERO`].
pub fn calculate_age(birth: NaiveDate, target: NaiveDate) -> Age {
    let mut years = target.year() - birth.year();
    let mut months = target.month() as i32 - birth.month() as i32;
    let mut days = target.day() as i32 - birth.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(target) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Age {
        years: years.max(0) as u32,
        months: months.max(0) as u32,
        days: days.max(0) as u32,
        total_days: (target - birth).num_days().max(0) as u64,
    }
}

/// Triangular number: one candle per birthday cake so far.
pub fn calculate_candles(years: u32) -> u64 {
    let n = years as u64;
    n * (n + 1) / 2
}

pub fn calculate_stats(birth: NaiveDate, days_old: u64) -> LifeStats {
    let minutes = days_old as f64 * MINUTES_PER_DAY;
    let age_at = birth
        .checked_add_days(Days::new(days_old))
        .unwrap_or(NaiveDate::MAX);
    let years = calculate_age(birth, age_at).years;
    LifeStats {
        heartbeats: (minutes * AVG_HEARTBEATS_PER_MINUTE).floor() as u64,
        breaths: (minutes * AVG_BREATHS_PER_MINUTE).floor() as u64,
        moon_orbits: (days_old as f64 / AVG_MOON_ORBIT_DAYS * 10.0).round() / 10.0,
        candles: calculate_candles(years),
    }
}

pub fn is_birthday(today: NaiveDate, birth: NaiveDate) -> bool {
    today.month() == birth.month() && today.day() == birth.day()
}

/// Formats with `,` thousands separators on the integer part only.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    let text = n.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn generic_formats_parse() {
        assert_eq!(parse_approx_date("2015-03-05"), Some(ymd(2015, 3, 5)));
        assert_eq!(parse_approx_date("March 5, 2015"), Some(ymd(2015, 3, 5)));
        assert_eq!(parse_approx_date("5 Mar 2015"), Some(ymd(2015, 3, 5)));
        assert_eq!(parse_approx_date("03/05/2015"), Some(ymd(2015, 3, 5)));
        assert_eq!(parse_approx_date("2015-03-05T10:00:00Z"), Some(ymd(2015, 3, 5)));
        assert_eq!(parse_approx_date("  September 2019 "), Some(ymd(2019, 9, 1)));
        assert_eq!(parse_approx_date("2019-09"), Some(ymd(2019, 9, 1)));
    }

    #[test]
    fn generic_parse_rejects_years_outside_window() {
        assert_eq!(parse_approx_date("1985-01-01"), None);
        assert_eq!(parse_approx_date("1990-12-31"), None);
        assert_eq!(parse_approx_date("2050-01-01"), None);
        assert_eq!(parse_approx_date("1991-01-01"), Some(ymd(1991, 1, 1)));
    }

    #[test]
    fn markers_are_not_range_filtered() {
        assert_eq!(parse_approx_date("~1985"), Some(ymd(1985, 6, 15)));
        assert_eq!(parse_approx_date("~mid 2003"), Some(ymd(2003, 6, 15)));
    }

    #[test]
    fn negative_numbers_format() {
        assert_eq!(format_number(-1234.5), "-1,234.5");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(0), "0");
    }

    #[test]
    fn previous_month_lengths() {
        assert_eq!(days_in_previous_month(ymd(2024, 3, 10)), 29);
        assert_eq!(days_in_previous_month(ymd(2023, 3, 10)), 28);
        assert_eq!(days_in_previous_month(ymd(2023, 1, 2)), 31);
    }

    #[test]
    fn stats_scale_with_days() {
        let birth = ymd(2001, 5, 9);
        let stats = calculate_stats(birth, 1);
        assert_eq!(stats.heartbeats, 103_680);
        assert_eq!(stats.breaths, 21_600);
        assert_eq!(stats.moon_orbits, 0.0);
        assert_eq!(stats.candles, 0);
        let stats = calculate_stats(birth, 365 * 3 + 1);
        assert_eq!(stats.candles, 6);
        assert_eq!(stats.moon_orbits, 40.1);
    }
}
