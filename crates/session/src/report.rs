//! Session report summary and printable rendition

use event_deriver::EventType;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{InterviewSession, ReportError};

/// Events listed in the printable timeline
pub const TIMELINE_LIMIT: usize = 20;

/// Integrity band for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl IntegrityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => IntegrityLevel::Excellent,
            75..=89 => IntegrityLevel::Good,
            60..=74 => IntegrityLevel::Fair,
            _ => IntegrityLevel::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityLevel::Excellent => "Excellent",
            IntegrityLevel::Good => "Good",
            IntegrityLevel::Fair => "Fair",
            IntegrityLevel::Poor => "Poor",
        }
    }
}

/// Per-type event counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub focus_lost: usize,
    pub no_face: usize,
    pub multiple_faces: usize,
    pub phone_detected: usize,
    pub book_detected: usize,
    pub device_detected: usize,
    pub drowsiness_detected: usize,
    pub audio_detected: usize,
    pub other: usize,
}

impl EventStats {
    pub fn from_session(session: &InterviewSession) -> Self {
        let mut stats = Self::default();
        for event in &session.events {
            let slot = match event.event_type {
                EventType::FocusLost => &mut stats.focus_lost,
                EventType::NoFace => &mut stats.no_face,
                EventType::MultipleFaces => &mut stats.multiple_faces,
                EventType::PhoneDetected => &mut stats.phone_detected,
                EventType::BookDetected => &mut stats.book_detected,
                EventType::DeviceDetected => &mut stats.device_detected,
                EventType::DrowsinessDetected => &mut stats.drowsiness_detected,
                EventType::AudioDetected => &mut stats.audio_detected,
                EventType::Other(_) => &mut stats.other,
            };
            *slot += 1;
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.focus_lost
            + self.no_face
            + self.multiple_faces
            + self.phone_detected
            + self.book_detected
            + self.device_detected
            + self.drowsiness_detected
            + self.audio_detected
            + self.other
    }

    /// Summary lines in report order
    pub fn labeled(&self) -> [(EventType, usize); 8] {
        [
            (EventType::FocusLost, self.focus_lost),
            (EventType::DrowsinessDetected, self.drowsiness_detected),
            (EventType::NoFace, self.no_face),
            (EventType::MultipleFaces, self.multiple_faces),
            (EventType::AudioDetected, self.audio_detected),
            (EventType::PhoneDetected, self.phone_detected),
            (EventType::BookDetected, self.book_detected),
            (EventType::DeviceDetected, self.device_detected),
        ]
    }
}

/// Report-ready view of a finalized session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport<'a> {
    pub session: &'a InterviewSession,
    pub duration_ms: i64,
    pub stats: EventStats,
    pub total_violations: usize,
    pub level: IntegrityLevel,
}

impl<'a> SessionReport<'a> {
    /// Build the report; the session must be finalized
    pub fn from_session(session: &'a InterviewSession) -> Result<Self, ReportError> {
        let duration_ms = session
            .duration_ms()
            .ok_or_else(|| ReportError::NotFinalized(session.id.clone()))?;
        let stats = EventStats::from_session(session);
        Ok(Self {
            session,
            duration_ms,
            total_violations: stats.total(),
            stats,
            level: IntegrityLevel::from_score(session.integrity_score),
        })
    }

    /// Duration as `m:ss`
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_ms)
    }

    /// Plain-text rendition of the printable report
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SessionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.session;

        writeln!(f, "Proctoring Report")?;
        writeln!(f)?;
        writeln!(f, "Candidate: {}", s.candidate_name)?;
        writeln!(f, "Start Time: {}", s.start_time.format("%Y-%m-%d %H:%M:%S UTC"))?;
        if let Some(end) = s.end_time {
            writeln!(f, "End Time: {}", end.format("%Y-%m-%d %H:%M:%S UTC"))?;
            writeln!(f, "Duration: {}", self.formatted_duration())?;
        }
        writeln!(
            f,
            "Integrity Score: {}/100 ({})",
            s.integrity_score,
            self.level.as_str()
        )?;
        writeln!(f)?;

        writeln!(f, "Event Summary:")?;
        for (event_type, count) in self.stats.labeled() {
            writeln!(f, "  {}: {}", event_type.label(), count)?;
        }
        if self.stats.other > 0 {
            writeln!(f, "  Other Events: {}", self.stats.other)?;
        }

        if s.events.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Event Timeline:")?;
        for event in s.events.iter().take(TIMELINE_LIMIT) {
            write!(f, "  {}  {}", event.timestamp.format("%H:%M:%S"), event.description)?;
            if let Some(ms) = event.duration_ms.filter(|ms| *ms > 0) {
                write!(f, "  {}s", ms / 1000)?;
            }
            writeln!(f)?;
        }
        if s.events.len() > TIMELINE_LIMIT {
            writeln!(f, "  ... {} more", s.events.len() - TIMELINE_LIMIT)?;
        }
        Ok(())
    }
}

/// `m:ss` for a millisecond duration
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

/// Download file name for a session report, e.g. `proctoring-report-Ada-Lovelace.csv`
pub fn report_file_name(candidate_name: &str, extension: &str) -> String {
    let slug = candidate_name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("proctoring-report-{}.{}", slug, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionAggregator;
    use chrono::{DateTime, TimeZone, Utc};
    use event_deriver::DetectionEvent;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn finalized(types: &[EventType], end_ms: i64) -> InterviewSession {
        let mut agg = SessionAggregator::new();
        agg.start_session("Ada Lovelace", t(0)).unwrap();
        for (i, ty) in types.iter().enumerate() {
            let event = DetectionEvent::new(ty.clone(), format!("{} event", ty), t(1000 * (i as i64 + 1)));
            agg.record_event(event);
        }
        agg.end_session(t(end_ms)).unwrap()
    }

    #[test]
    fn test_levels() {
        assert_eq!(IntegrityLevel::from_score(100), IntegrityLevel::Excellent);
        assert_eq!(IntegrityLevel::from_score(90), IntegrityLevel::Excellent);
        assert_eq!(IntegrityLevel::from_score(89), IntegrityLevel::Good);
        assert_eq!(IntegrityLevel::from_score(75), IntegrityLevel::Good);
        assert_eq!(IntegrityLevel::from_score(60), IntegrityLevel::Fair);
        assert_eq!(IntegrityLevel::from_score(59), IntegrityLevel::Poor);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65_000), "1:05");
        assert_eq!(format_duration(754_999), "12:34");
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Ada  Lovelace", "csv"), "proctoring-report-Ada-Lovelace.csv");
        assert_eq!(report_file_name("Grace", "txt"), "proctoring-report-Grace.txt");
    }

    #[test]
    fn test_requires_finalized_session() {
        let mut agg = SessionAggregator::new();
        agg.start_session("Active", t(0)).unwrap();
        let active = agg.active().unwrap();
        assert!(matches!(
            SessionReport::from_session(active),
            Err(ReportError::NotFinalized(_))
        ));
    }

    #[test]
    fn test_stats() {
        let session = finalized(
            &[
                EventType::FocusLost,
                EventType::FocusLost,
                EventType::PhoneDetected,
                EventType::Other("tab_switched".into()),
            ],
            125_000,
        );
        let report = SessionReport::from_session(&session).unwrap();
        assert_eq!(report.stats.focus_lost, 2);
        assert_eq!(report.stats.phone_detected, 1);
        assert_eq!(report.stats.other, 1);
        assert_eq!(report.total_violations, 4);
        assert_eq!(report.formatted_duration(), "2:05");
        // 100 - 5 - 5 - 15 - 2
        assert_eq!(report.level, IntegrityLevel::Fair);
    }

    #[test]
    fn test_render_text() {
        let session = finalized(&[EventType::NoFace, EventType::AudioDetected], 61_000);
        let text = SessionReport::from_session(&session).unwrap().render_text();

        assert!(text.starts_with("Proctoring Report\n"));
        assert!(text.contains("Candidate: Ada Lovelace\n"));
        assert!(text.contains("Duration: 1:01\n"));
        assert!(text.contains("Integrity Score: 90/100 (Excellent)\n"));
        assert!(text.contains("  No Face Detected: 1\n"));
        assert!(text.contains("  Background Noise: 1\n"));
        assert!(text.contains("  Books/Notes Detected: 0\n"));
        assert!(text.contains("Event Timeline:\n"));
        assert!(text.contains("no_face event"));

        let summary = text.find("Focus Lost:").unwrap();
        let drowsy = text.find("Drowsiness Detected:").unwrap();
        assert!(summary < drowsy);
    }

    #[test]
    fn test_timeline_is_truncated() {
        let types = vec![EventType::AudioDetected; 25];
        let session = finalized(&types, 100_000);
        let text = SessionReport::from_session(&session).unwrap().render_text();
        assert_eq!(text.matches("audio_detected event").count(), TIMELINE_LIMIT);
        assert!(text.contains("... 5 more"));
    }

    #[test]
    fn test_clean_session_has_no_timeline() {
        let session = finalized(&[], 30_000);
        let report = SessionReport::from_session(&session).unwrap();
        let text = report.render_text();

        assert_eq!(text, format!("{}", report));
        assert!(!text.contains("Event Timeline"));
        assert!(text.ends_with("  Other Devices: 0\n"));
        assert!(text.contains("Integrity Score: 100/100 (Excellent)\n"));
    }
}
