//! Integrity scoring

use event_deriver::{DetectionEvent, EventType};

/// Score of a session with no violations
pub const MAX_SCORE: u8 = 100;

/// Points deducted per event of a type
pub fn penalty(event_type: &EventType) -> u32 {
    match event_type {
        EventType::PhoneDetected => 15,
        EventType::BookDetected => 10,
        EventType::DeviceDetected => 10,
        EventType::MultipleFaces => 8,
        EventType::FocusLost => 5,
        EventType::NoFace => 5,
        EventType::DrowsinessDetected => 7,
        EventType::AudioDetected => 5,
        EventType::Other(_) => 2,
    }
}

/// 100 minus the summed penalties, floored at 0.
///
/// The sum is order-independent, so any permutation of the log scores the same.
pub fn integrity_score(events: &[DetectionEvent]) -> u8 {
    let deducted: u32 = events.iter().map(|e| penalty(&e.event_type)).sum();
    MAX_SCORE.saturating_sub(deducted.min(MAX_SCORE as u32) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn events(types: &[EventType]) -> Vec<DetectionEvent> {
        let now = Utc::now();
        types
            .iter()
            .map(|t| DetectionEvent::new(t.clone(), t.label(), now))
            .collect()
    }

    #[test]
    fn test_empty_log_scores_full() {
        assert_eq!(integrity_score(&[]), 100);
    }

    #[test]
    fn test_phone_and_book() {
        let log = events(&[EventType::PhoneDetected, EventType::BookDetected]);
        assert_eq!(integrity_score(&log), 75);
    }

    #[test]
    fn test_thirteen_five_point_events() {
        let types: Vec<_> = (0..13)
            .map(|i| if i % 2 == 0 { EventType::FocusLost } else { EventType::NoFace })
            .collect();
        assert_eq!(integrity_score(&events(&types)), 35);
    }

    #[test]
    fn test_clamped_at_zero() {
        let log = events(&vec![EventType::PhoneDetected; 10]);
        assert_eq!(integrity_score(&log), 0);
    }

    #[test]
    fn test_unknown_type_default_penalty() {
        let log = events(&[EventType::Other("tab_switched".into())]);
        assert_eq!(integrity_score(&log), 98);
    }

    fn any_type() -> impl Strategy<Value = EventType> {
        prop_oneof![
            proptest::sample::select(EventType::ALL.to_vec()),
            "[a-z_]{3,12}".prop_map(EventType::from),
        ]
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            (types, permuted) in proptest::collection::vec(any_type(), 0..40)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(integrity_score(&events(&types)), integrity_score(&events(&permuted)));
        }

        #[test]
        fn prop_monotone_and_clamped(types in proptest::collection::vec(any_type(), 0..40)) {
            let log = events(&types);
            let mut previous = MAX_SCORE;
            for n in 0..=log.len() {
                let score = integrity_score(&log[..n]);
                prop_assert!(score <= previous);
                previous = score;
            }
            let total: u32 = types.iter().map(penalty).sum();
            prop_assert_eq!(integrity_score(&log) as u32, 100u32.saturating_sub(total));
        }

        #[test]
        fn prop_idempotent(types in proptest::collection::vec(any_type(), 0..40)) {
            let log = events(&types);
            prop_assert_eq!(integrity_score(&log), integrity_score(&log));
        }
    }
}
