//! Event Deriver
//!
//! Turns the per-tick face signal, object detections and audio loudness
//! into discrete violation events. Two temporal policies apply:
//! - Sustain gates: focus loss and face absence must persist before firing
//! - Per-type cooldowns: a firing type stays silent for the cooldown window
//!
//! Derivation is a pure function of the previous cooldown table and the
//! current tick; the caller threads the returned table into the next tick.

pub mod config;
pub mod cooldown;
pub mod event;

pub use config::DeriverConfig;
pub use cooldown::CooldownTable;
pub use event::{DetectionEvent, EventType};

use chrono::{DateTime, Utc};
use face_signal::FaceSignal;
use perception::ObjectDetection;
use tracing::debug;

/// Latest signals available to one tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    pub signal: &'a FaceSignal,
    pub detections: &'a [ObjectDetection],
    pub loud: bool,
}

/// Result of one derivation step
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    /// Newly emitted events, in emission order
    pub events: Vec<DetectionEvent>,
    /// Cooldown table to thread into the next tick
    pub cooldowns: CooldownTable,
}

/// Resolve an object label to its event type
pub fn classify_object(class: &str) -> EventType {
    let class = class.to_lowercase();
    if class.contains("phone") {
        EventType::PhoneDetected
    } else if class.contains("book") {
        EventType::BookDetected
    } else {
        EventType::DeviceDetected
    }
}

/// Derive this tick's events.
///
/// Conditions are evaluated independently, so several events may fire in
/// the same tick. Each emission stamps the cooldown table immediately.
pub fn derive_events(
    config: &DeriverConfig,
    cooldowns: &CooldownTable,
    input: TickInput<'_>,
    now: DateTime<Utc>,
) -> Derivation {
    let mut emitter = Emitter {
        config,
        cooldowns: cooldowns.clone(),
        events: Vec::new(),
        now,
    };
    let signal = input.signal;

    if !signal.is_focused {
        if let Some(age) = signal.focus_lost_ms(now) {
            if age > config.focus_lost_sustain_ms {
                emitter.emit(
                    DetectionEvent::new(EventType::FocusLost, "Candidate lost focus", now)
                        .with_duration_ms(age as u64),
                );
            }
        }
    }

    if signal.face_count == 0 {
        if let Some(age) = signal.no_face_ms(now) {
            if age > config.no_face_sustain_ms {
                emitter.emit(
                    DetectionEvent::new(EventType::NoFace, "No face detected", now).with_duration_ms(age as u64),
                );
            }
        }
    }

    if signal.face_count > 1 {
        emitter.emit(DetectionEvent::new(
            EventType::MultipleFaces,
            format!("Multiple faces detected ({} faces)", signal.face_count),
            now,
        ));
    }

    if signal.is_drowsy {
        emitter.emit(DetectionEvent::new(
            EventType::DrowsinessDetected,
            "Candidate appears drowsy",
            now,
        ));
    }

    for detection in input.detections {
        if !detection.is_relevant() || detection.confidence <= config.object_confidence_threshold {
            continue;
        }
        emitter.emit(
            DetectionEvent::new(
                classify_object(&detection.class),
                format!("{} detected", detection.class),
                now,
            )
            .with_confidence(detection.confidence),
        );
    }

    if input.loud {
        emitter.emit(DetectionEvent::new(
            EventType::AudioDetected,
            "Loud background noise detected",
            now,
        ));
    }

    Derivation {
        events: emitter.events,
        cooldowns: emitter.cooldowns,
    }
}

struct Emitter<'a> {
    config: &'a DeriverConfig,
    cooldowns: CooldownTable,
    events: Vec<DetectionEvent>,
    now: DateTime<Utc>,
}

impl Emitter<'_> {
    fn emit(&mut self, event: DetectionEvent) {
        if !self
            .cooldowns
            .is_ready(&event.event_type, self.now, self.config.cooldown_ms)
        {
            return;
        }
        debug!("Emitting {}: {}", event.event_type, event.description);
        self.cooldowns.record(event.event_type.clone(), self.now);
        self.events.push(event);
    }
}

/// Stateful convenience wrapper that threads the cooldown table itself
#[derive(Debug, Clone, Default)]
pub struct EventDeriver {
    config: DeriverConfig,
    cooldowns: CooldownTable,
}

impl EventDeriver {
    pub fn new(config: DeriverConfig) -> Self {
        Self {
            config,
            cooldowns: CooldownTable::new(),
        }
    }

    pub fn config(&self) -> &DeriverConfig {
        &self.config
    }

    pub fn cooldowns(&self) -> &CooldownTable {
        &self.cooldowns
    }

    /// Run one tick and keep the updated cooldown table
    pub fn tick(&mut self, input: TickInput<'_>, now: DateTime<Utc>) -> Vec<DetectionEvent> {
        let derivation = derive_events(&self.config, &self.cooldowns, input, now);
        self.cooldowns = derivation.cooldowns;
        derivation.events
    }

    /// Discard cooldowns (session boundary)
    pub fn reset(&mut self) {
        self.cooldowns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use face_signal::fixtures::{attentive_face, eyes_closed_face, turned_face};
    use face_signal::SignalInterpreter;
    use perception::{BoundingBox, FaceLandmarks};
    use proptest::prelude::*;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn detection(class: &str, confidence: f32) -> ObjectDetection {
        ObjectDetection::new(class, confidence, BoundingBox::default())
    }

    /// Replays scripted ticks through interpreter and deriver
    struct Replay {
        interpreter: SignalInterpreter,
        deriver: EventDeriver,
        signal: FaceSignal,
        events: Vec<DetectionEvent>,
    }

    impl Replay {
        fn new() -> Self {
            Self {
                interpreter: SignalInterpreter::default(),
                deriver: EventDeriver::default(),
                signal: FaceSignal::default(),
                events: Vec::new(),
            }
        }

        fn tick(&mut self, faces: &[FaceLandmarks], detections: &[ObjectDetection], loud: bool, now: DateTime<Utc>) {
            self.signal = self.interpreter.interpret(&self.signal, faces, now);
            let input = TickInput {
                signal: &self.signal,
                detections,
                loud,
            };
            let emitted = self.deriver.tick(input, now);
            self.events.extend(emitted);
        }

        fn count(&self, event_type: &EventType) -> usize {
            self.events.iter().filter(|e| &e.event_type == event_type).count()
        }
    }

    #[test]
    fn test_classify_object() {
        assert_eq!(classify_object("cell phone"), EventType::PhoneDetected);
        assert_eq!(classify_object("Cell Phone"), EventType::PhoneDetected);
        assert_eq!(classify_object("book"), EventType::BookDetected);
        assert_eq!(classify_object("laptop"), EventType::DeviceDetected);
        assert_eq!(classify_object("remote"), EventType::DeviceDetected);
    }

    #[test]
    fn test_quiet_tick_emits_nothing() {
        let signal = FaceSignal {
            face_count: 1,
            ..Default::default()
        };
        let d = derive_events(
            &DeriverConfig::default(),
            &CooldownTable::new(),
            TickInput {
                signal: &signal,
                detections: &[],
                loud: false,
            },
            t(0),
        );
        assert!(d.events.is_empty());
        assert!(d.cooldowns.is_empty());
    }

    #[test]
    fn test_derivation_does_not_touch_input_table() {
        let signal = FaceSignal::default();
        let before = CooldownTable::new();
        let d = derive_events(
            &DeriverConfig::default(),
            &before,
            TickInput {
                signal: &signal,
                detections: &[],
                loud: true,
            },
            t(0),
        );
        assert_eq!(d.events.len(), 1);
        assert!(before.is_empty());
        assert_eq!(d.cooldowns.last_emitted(&EventType::AudioDetected), Some(t(0)));
    }

    #[test]
    fn test_focus_lost_after_sustain() {
        let mut replay = Replay::new();
        for ms in (0..=5000).step_by(100) {
            replay.tick(&[turned_face()], &[], false, t(ms));
        }
        assert_eq!(replay.count(&EventType::FocusLost), 0, "5000ms is not past the gate");

        replay.tick(&[turned_face()], &[], false, t(5100));
        assert_eq!(replay.count(&EventType::FocusLost), 1);
        let event = replay.events.last().unwrap();
        assert_eq!(event.description, "Candidate lost focus");
        assert_eq!(event.duration_ms, Some(5100));
    }

    #[test]
    fn test_refocus_resets_sustain() {
        let mut replay = Replay::new();
        for ms in (0..4000).step_by(100) {
            replay.tick(&[turned_face()], &[], false, t(ms));
        }
        replay.tick(&[attentive_face()], &[], false, t(4000));
        for ms in (4100..8000).step_by(100) {
            replay.tick(&[turned_face()], &[], false, t(ms));
        }
        assert_eq!(replay.count(&EventType::FocusLost), 0);
    }

    #[test]
    fn test_no_face_below_gate_emits_nothing() {
        let mut replay = Replay::new();
        for ms in (0..=8000).step_by(100) {
            replay.tick(&[], &[], false, t(ms));
        }
        replay.tick(&[attentive_face()], &[], false, t(8100));
        assert_eq!(replay.count(&EventType::NoFace), 0);
    }

    #[test]
    fn test_no_face_past_gate_emits_once() {
        let mut replay = Replay::new();
        for ms in (0..=11_000).step_by(100) {
            replay.tick(&[], &[], false, t(ms));
        }
        replay.tick(&[attentive_face()], &[], false, t(11_100));
        assert_eq!(replay.count(&EventType::NoFace), 1);
        let event = replay
            .events
            .iter()
            .find(|e| e.event_type == EventType::NoFace)
            .unwrap();
        assert_eq!(event.timestamp, t(10_100));
        assert_eq!(event.description, "No face detected");
    }

    #[test]
    fn test_multiple_faces_fire_on_first_tick_only() {
        let mut replay = Replay::new();
        let two = [attentive_face(), attentive_face()];
        replay.tick(&two, &[], false, t(0));
        replay.tick(&two, &[], false, t(250));
        replay.tick(&two, &[], false, t(500));

        assert_eq!(replay.count(&EventType::MultipleFaces), 1);
        assert_eq!(replay.events[0].timestamp, t(0));
        assert_eq!(replay.events[0].description, "Multiple faces detected (2 faces)");
    }

    #[test]
    fn test_drowsiness_event() {
        let mut replay = Replay::new();
        for ms in (0..=2500).step_by(100) {
            replay.tick(&[eyes_closed_face()], &[], false, t(ms));
        }
        assert_eq!(replay.count(&EventType::DrowsinessDetected), 1);
        let event = replay.events.last().unwrap();
        assert_eq!(event.timestamp, t(2100));
        assert_eq!(event.description, "Candidate appears drowsy");
    }

    #[test]
    fn test_object_confidence_gate() {
        let mut replay = Replay::new();
        replay.tick(&[attentive_face()], &[detection("cell phone", 0.65)], false, t(0));
        replay.tick(&[attentive_face()], &[detection("cell phone", 0.70)], false, t(100));
        assert!(replay.events.is_empty());

        replay.tick(&[attentive_face()], &[detection("cell phone", 0.71)], false, t(200));
        assert_eq!(replay.count(&EventType::PhoneDetected), 1);
        let event = &replay.events[0];
        assert_eq!(event.description, "cell phone detected");
        assert_eq!(event.confidence, Some(0.71));
    }

    #[test]
    fn test_irrelevant_classes_ignored() {
        let mut replay = Replay::new();
        replay.tick(&[attentive_face()], &[detection("person", 0.99), detection("cup", 0.95)], false, t(0));
        assert!(replay.events.is_empty());
    }

    #[test]
    fn test_simultaneous_objects_of_different_types() {
        let mut replay = Replay::new();
        let detections = [
            detection("cell phone", 0.9),
            detection("book", 0.8),
            detection("laptop", 0.75),
            detection("keyboard", 0.9),
        ];
        replay.tick(&[attentive_face()], &detections, false, t(0));

        assert_eq!(replay.count(&EventType::PhoneDetected), 1);
        assert_eq!(replay.count(&EventType::BookDetected), 1);
        // keyboard resolves to the same type as laptop within the same tick
        assert_eq!(replay.count(&EventType::DeviceDetected), 1);
    }

    #[test]
    fn test_audio_cooldown() {
        let mut replay = Replay::new();
        for ms in (0..=40_000).step_by(500) {
            replay.tick(&[attentive_face()], &[], true, t(ms));
        }
        let times: Vec<_> = replay
            .events
            .iter()
            .filter(|e| e.event_type == EventType::AudioDetected)
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(times, vec![t(0), t(20_500)]);
        assert_eq!(replay.events[0].description, "Loud background noise detected");
    }

    #[test]
    fn test_independent_conditions_same_tick() {
        let signal = FaceSignal {
            face_count: 3,
            is_focused: false,
            is_drowsy: false,
            focus_lost_start: Some(t(0)),
            no_face_start: None,
            eyes_closed_since: None,
        };
        let d = derive_events(
            &DeriverConfig::default(),
            &CooldownTable::new(),
            TickInput {
                signal: &signal,
                detections: &[detection("book", 0.9)],
                loud: true,
            },
            t(6000),
        );
        let types: Vec<_> = d.events.iter().map(|e| e.event_type.clone()).collect();
        assert_eq!(
            types,
            vec![
                EventType::FocusLost,
                EventType::MultipleFaces,
                EventType::BookDetected,
                EventType::AudioDetected,
            ]
        );
    }

    #[test]
    fn test_reset_discards_cooldowns() {
        let mut deriver = EventDeriver::default();
        let signal = FaceSignal::default();
        let input = TickInput {
            signal: &signal,
            detections: &[],
            loud: true,
        };
        assert_eq!(deriver.tick(input, t(0)).len(), 1);
        assert!(deriver.tick(input, t(1000)).is_empty());
        deriver.reset();
        assert_eq!(deriver.tick(input, t(2000)).len(), 1);
    }

    #[derive(Debug, Clone)]
    enum Scripted {
        Absent,
        Attentive,
        Turned,
        Drowsy,
        Crowd,
    }

    fn scripted() -> impl Strategy<Value = (Scripted, bool, Option<f32>)> {
        (
            prop_oneof![
                Just(Scripted::Absent),
                Just(Scripted::Attentive),
                Just(Scripted::Turned),
                Just(Scripted::Drowsy),
                Just(Scripted::Crowd),
            ],
            any::<bool>(),
            proptest::option::of(0.0f32..1.0),
        )
    }

    proptest! {
        /// Same-type events are never closer than the cooldown, and the
        /// sustain-gated types always follow a long enough streak
        #[test]
        fn prop_cooldown_and_sustain(
            ticks in proptest::collection::vec((scripted(), 1i64..1500), 1..200)
        ) {
            let mut replay = Replay::new();
            let mut now = t(0);
            for ((kind, loud, phone), step) in &ticks {
                let faces = match kind {
                    Scripted::Absent => vec![],
                    Scripted::Attentive => vec![attentive_face()],
                    Scripted::Turned => vec![turned_face()],
                    Scripted::Drowsy => vec![eyes_closed_face()],
                    Scripted::Crowd => vec![attentive_face(), turned_face()],
                };
                let detections: Vec<_> = phone.iter().map(|c| detection("cell phone", *c)).collect();
                let before = replay.events.len();
                replay.tick(&faces, &detections, *loud, now);

                for event in &replay.events[before..] {
                    match event.event_type {
                        EventType::FocusLost => {
                            let start = replay.signal.focus_lost_start.unwrap();
                            prop_assert!((now - start).num_milliseconds() > 5000);
                        }
                        EventType::NoFace => {
                            let start = replay.signal.no_face_start.unwrap();
                            prop_assert!((now - start).num_milliseconds() > 10_000);
                        }
                        _ => {}
                    }
                }
                now += Duration::milliseconds(*step);
            }

            for event_type in EventType::ALL {
                let times: Vec<_> = replay
                    .events
                    .iter()
                    .filter(|e| e.event_type == event_type)
                    .map(|e| e.timestamp)
                    .collect();
                for pair in times.windows(2) {
                    prop_assert!((pair[1] - pair[0]).num_milliseconds() >= 20_000);
                }
            }
        }
    }
}
