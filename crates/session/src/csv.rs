//! CSV export of a session and its event timeline

use chrono::{DateTime, SecondsFormat, Utc};

use crate::InterviewSession;

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell.as_ref().replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render a session as CSV.
///
/// Layout: session header and metadata rows, a blank row, an "Event Timeline"
/// marker row, the event column header, then one row per event.
pub fn to_csv(session: &InterviewSession) -> String {
    let mut rows = Vec::with_capacity(session.events.len() + 5);

    rows.push(row([
        "Candidate Name",
        "Start Time",
        "End Time",
        "Duration (ms)",
        "Integrity Score",
        "Total Events",
    ]));
    rows.push(row([
        session.candidate_name.clone(),
        timestamp(&session.start_time),
        session.end_time.as_ref().map(timestamp).unwrap_or_default(),
        session.duration_ms().unwrap_or(0).to_string(),
        session.integrity_score.to_string(),
        session.events.len().to_string(),
    ]));
    rows.push(String::new());
    rows.push(row(["Event Timeline"]));
    rows.push(row(["Timestamp", "Type", "Description", "Duration (ms)", "Confidence"]));

    for event in &session.events {
        rows.push(row([
            timestamp(&event.timestamp),
            event.event_type.to_string(),
            event.description.clone(),
            event.duration_ms.map(|d| d.to_string()).unwrap_or_default(),
            event.confidence.map(|c| c.to_string()).unwrap_or_default(),
        ]));
    }

    rows.join("\n")
}
