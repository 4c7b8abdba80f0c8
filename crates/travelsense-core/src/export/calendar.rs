//! iCalendar (RFC 5545) feed for a trip plan
//!
//! One VEVENT per planned activity. Event times are floating local times: the
//! trip happens in the destination's time zone, whatever that is.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::models::{Activity, TripPlan};

const PRODID: &str = "-//TravelSense//Trip Planner//EN";
/// Content lines longer than this many octets are folded
const MAX_LINE_OCTETS: usize = 75;

/// Render the plan's activities as an iCalendar document.
///
/// Fails when the plan has no start date or an activity time is not `HH:MM`.
pub fn render_calendar(plan: &TripPlan) -> Result<String> {
    let start_date = plan
        .start_date
        .ok_or_else(|| Error::Calendar("Trip start date is not set".into()))?;
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let slug = super::slug(&plan.destination);

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, &format!("PRODID:{}", PRODID));
    push_line(&mut out, "METHOD:PUBLISH");

    for (index, activity) in plan.activities.iter().enumerate() {
        let start = event_start(start_date, activity)?;
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(
            &mut out,
            &format!("UID:{}-{}-{}@travelsense", slug, start.format("%Y%m%dT%H%M"), index),
        );
        push_line(&mut out, &format!("DTSTAMP:{}", stamp));
        push_line(&mut out, &format!("DTSTART:{}", start.format("%Y%m%dT%H%M%S")));
        push_line(&mut out, "DURATION:PT1H");
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&activity.activity)));
        if let Some(notes) = activity.notes.as_deref().filter(|n| !n.is_empty()) {
            push_line(&mut out, &format!("DESCRIPTION:{}", escape_text(notes)));
        }
        push_line(&mut out, &format!("LOCATION:{}", escape_text(&plan.destination)));
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");

    debug!(destination = %plan.destination, events = plan.activities.len(), "Rendered calendar");
    Ok(out)
}

/// Render the calendar, logging and swallowing any encoding failure
pub fn export_calendar(plan: &TripPlan) -> Option<String> {
    match render_calendar(plan) {
        Ok(ics) => Some(ics),
        Err(e) => {
            error!(error = %e, destination = %plan.destination, "Calendar export failed");
            None
        }
    }
}

/// Start of an activity: start date plus (day - 1) days, at its HH:MM time
pub fn event_start(start_date: NaiveDate, activity: &Activity) -> Result<NaiveDateTime> {
    let time = NaiveTime::parse_from_str(activity.time.trim(), "%H:%M").map_err(|_| {
        Error::Calendar(format!(
            "Activity time '{}' is not HH:MM",
            activity.time
        ))
    })?;
    let offset = u64::from(activity.day.saturating_sub(1));
    let date = start_date
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| Error::Calendar(format!("Day {} is out of range", activity.day)))?;
    Ok(date.and_time(time))
}

/// Escape a TEXT value
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Append a content line, folding at 75 octets without splitting characters
fn push_line(out: &mut String, line: &str) {
    let mut octets = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if octets + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            // The leading space counts toward the continuation line
            octets = 1;
        }
        out.push(c);
        octets += len;
    }
    out.push_str("\r\n");
}
