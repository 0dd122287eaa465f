//! Interview session record and lifecycle

use chrono::{DateTime, Utc};
use event_deriver::{DetectionEvent, EventType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::score::{integrity_score, MAX_SCORE};
use crate::SessionError;

/// Interview session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: String,

    pub candidate_name: String,

    pub start_time: DateTime<Utc>,

    /// Unset while the session is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Chronological event log
    pub events: Vec<DetectionEvent>,

    /// 0-100, computed at finalization
    pub integrity_score: u8,
}

impl InterviewSession {
    fn new(candidate_name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("session-{}", Uuid::new_v4()),
            candidate_name,
            start_time: now,
            end_time: None,
            events: Vec::new(),
            integrity_score: MAX_SCORE,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.end_time.is_some()
    }

    /// Session length (milliseconds), once finalized
    pub fn duration_ms(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds().max(0))
    }

    /// Number of logged events of a type
    pub fn count(&self, event_type: &EventType) -> usize {
        self.events
            .iter()
            .filter(|e| &e.event_type == event_type)
            .count()
    }
}

/// Owns the active session and the most recently finalized one
#[derive(Debug, Default)]
pub struct SessionAggregator {
    active: Option<InterviewSession>,
    finalized: Option<InterviewSession>,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session for a candidate
    pub fn start_session(&mut self, candidate_name: &str, now: DateTime<Utc>) -> Result<&InterviewSession, SessionError> {
        let name = candidate_name.trim();
        if name.is_empty() {
            warn!("Refusing to start session: empty candidate name");
            return Err(SessionError::EmptyCandidateName);
        }
        if self.active.is_some() {
            warn!("Refusing to start session: one is already active");
            return Err(SessionError::AlreadyActive);
        }

        let session = InterviewSession::new(name.to_string(), now);
        info!("Session {} started for {}", session.id, session.candidate_name);
        Ok(self.active.insert(session))
    }

    /// Append an event to the active session; no-op when none is active
    pub fn record_event(&mut self, event: DetectionEvent) -> bool {
        match self.active.as_mut() {
            Some(session) => {
                debug!("Recording {} in {}", event.event_type, session.id);
                session.events.push(event);
                true
            }
            None => false,
        }
    }

    /// Finalize the active session: set the end time and compute the score
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Result<InterviewSession, SessionError> {
        let mut session = self.active.take().ok_or(SessionError::NoActiveSession)?;
        session.end_time = Some(now);
        session.integrity_score = integrity_score(&session.events);

        info!(
            "Session {} finalized: {} events, integrity score {}",
            session.id,
            session.events.len(),
            session.integrity_score
        );

        self.finalized = Some(session.clone());
        Ok(session)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&InterviewSession> {
        self.active.as_ref()
    }

    /// Most recently finalized session
    pub fn finalized(&self) -> Option<&InterviewSession> {
        self.finalized.as_ref()
    }

    /// Active session, or else the last finalized one
    pub fn current(&self) -> Option<&InterviewSession> {
        self.active.as_ref().or(self.finalized.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn event(event_type: EventType, ms: i64) -> DetectionEvent {
        DetectionEvent::new(event_type.clone(), event_type.label(), t(ms))
    }

    #[test]
    fn test_start_session() {
        let mut agg = SessionAggregator::new();
        let session = agg.start_session("  Ada Lovelace ", t(0)).unwrap();
        assert_eq!(session.candidate_name, "Ada Lovelace");
        assert_eq!(session.integrity_score, 100);
        assert!(session.events.is_empty());
        assert_eq!(session.start_time, t(0));
        assert!(session.id.starts_with("session-"));
        assert!(agg.is_active());
    }

    #[test]
    fn test_empty_name_refused() {
        let mut agg = SessionAggregator::new();
        assert_eq!(agg.start_session("   ", t(0)).unwrap_err(), SessionError::EmptyCandidateName);
        assert_eq!(agg.start_session("", t(0)).unwrap_err(), SessionError::EmptyCandidateName);
        assert!(!agg.is_active());
        assert!(agg.current().is_none());
    }

    #[test]
    fn test_second_start_refused() {
        let mut agg = SessionAggregator::new();
        agg.start_session("A", t(0)).unwrap();
        assert_eq!(agg.start_session("B", t(1)).unwrap_err(), SessionError::AlreadyActive);
        assert_eq!(agg.active().unwrap().candidate_name, "A");
    }

    #[test]
    fn test_record_without_session_is_noop() {
        let mut agg = SessionAggregator::new();
        assert!(!agg.record_event(event(EventType::NoFace, 0)));
        assert!(agg.current().is_none());
    }

    #[test]
    fn test_end_session_scores_and_freezes() {
        let mut agg = SessionAggregator::new();
        agg.start_session("Grace", t(0)).unwrap();
        assert!(agg.record_event(event(EventType::PhoneDetected, 1000)));
        assert!(agg.record_event(event(EventType::BookDetected, 2000)));

        let done = agg.end_session(t(90_000)).unwrap();
        assert_eq!(done.integrity_score, 75);
        assert_eq!(done.end_time, Some(t(90_000)));
        assert_eq!(done.duration_ms(), Some(90_000));
        assert_eq!(done.count(&EventType::PhoneDetected), 1);

        // Nothing can reach a finalized session
        assert!(!agg.record_event(event(EventType::AudioDetected, 95_000)));
        assert_eq!(agg.finalized().unwrap().events.len(), 2);
        assert_eq!(agg.end_session(t(100_000)).unwrap_err(), SessionError::NoActiveSession);
    }

    #[test]
    fn test_empty_session_scores_full() {
        let mut agg = SessionAggregator::new();
        agg.start_session("Alan", t(0)).unwrap();
        assert_eq!(agg.end_session(t(10)).unwrap().integrity_score, 100);
    }

    #[test]
    fn test_new_session_after_finalize() {
        let mut agg = SessionAggregator::new();
        agg.start_session("First", t(0)).unwrap();
        agg.end_session(t(10)).unwrap();
        agg.start_session("Second", t(20)).unwrap();
        assert_eq!(agg.current().unwrap().candidate_name, "Second");
        assert_eq!(agg.finalized().unwrap().candidate_name, "First");
    }

    #[test]
    fn test_json_round_trip() {
        let mut agg = SessionAggregator::new();
        agg.start_session("Edsger", t(0)).unwrap();
        agg.record_event(event(EventType::FocusLost, 6000).with_duration_ms(6000));
        let done = agg.end_session(t(60_000)).unwrap();

        let json = serde_json::to_string(&done).unwrap();
        let back: InterviewSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, done);
    }
}
