//! Provenance footers appended to migrated bodies.
//!
//! The destination records the migrating account as the author of every
//! replayed item, so the original author and timestamps are kept in a
//! footer:
//!
//! ```text
//! *GitHub Import*
//! **Author:** octocat
//! **Created:** 11 years ago (March 1st 2014, 10:00:00 am)
//! **Closed:** 11 years ago (March 2nd 2014, 11:30:00 am)
//! ```
//!
//! Absolute timestamps are rendered in UTC.

use crate::model::Provenance;
use chrono::{DateTime, Datelike, Utc};

/// Marks text as machine-generated import provenance.
pub const IMPORT_MARKER: &str = "*GitHub Import*";

const LINE_BREAK: &str = "\r\n";

/// Returns the footer for `record`, with relative times measured from now.
pub fn footer<P: Provenance + ?Sized>(record: &P) -> String {
    footer_at(record, Utc::now())
}

/// Returns the footer for `record`, with relative times measured from `now`.
pub fn footer_at<P: Provenance + ?Sized>(record: &P, now: DateTime<Utc>) -> String {
    let mut footer = format!(
        "{LINE_BREAK}{LINE_BREAK}{IMPORT_MARKER}{LINE_BREAK}\
         **Author:** {}{LINE_BREAK}\
         **Created:** {}{LINE_BREAK}",
        record.author(),
        timestamp(record.created_at(), now),
    );

    if let Some(closed_at) = record.closed_at() {
        footer.push_str(&format!(
            "**Closed:** {}{LINE_BREAK}",
            timestamp(closed_at, now)
        ));
    }

    footer
}

/// Appends the footer for `record` to `body`, leaving `body` intact as the
/// prefix.
pub fn annotate<P: Provenance + ?Sized>(body: &str, record: &P) -> String {
    let mut annotated = body.to_string();
    annotated.push_str(&footer(record));
    annotated
}

fn timestamp(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!("{} ({})", relative_time(at, now), absolute_time(at))
}

/// Renders `at` as e.g. `March 1st 2014, 10:00:00 am`.
pub fn absolute_time(at: DateTime<Utc>) -> String {
    let day = at.day();
    format!(
        "{} {day}{} {}, {}",
        at.format("%B"),
        ordinal_suffix(day),
        at.format("%Y"),
        at.format("%-I:%M:%S %P"),
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Renders the distance between `at` and `now` in words, e.g. `3 days ago`
/// or `in a month`.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let past = elapsed.num_milliseconds() >= 0;
    let phrase = distance_in_words(elapsed.num_milliseconds().unsigned_abs() as f64 / 1000.0);

    if past {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

// Thresholds follow the usual "x ago" conventions: under 45 seconds is "a few
// seconds", under 45 minutes counts minutes, under 22 hours counts hours, and so on.
fn distance_in_words(total_seconds: f64) -> String {
    const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;

    let seconds = total_seconds.round();
    let minutes = (total_seconds / 60.0).round();
    let hours = (total_seconds / 3_600.0).round();
    let days = (total_seconds / 86_400.0).round();
    let months = (total_seconds / 86_400.0 / DAYS_PER_MONTH).round();
    let years = (total_seconds / 86_400.0 / DAYS_PER_MONTH / 12.0).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}
