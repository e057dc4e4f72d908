//! Integration tests for adaptive focus advice.

use proptest::prelude::*;
use stillmind_core::advisor::percentile;
use stillmind_core::{AudioSettings, FocusAdvisor, SessionRecord, SessionStore};

const HOUR_MS: i64 = 60 * 60 * 1000;

fn base_ms() -> i64 {
    1_718_000_000_000
}

#[test]
fn test_advice_from_persisted_history() {
    let store = SessionStore::open_memory().unwrap();

    for i in 0..3 {
        store
            .append_session(&SessionRecord::completed(
                base_ms() + i * HOUR_MS,
                25,
                AudioSettings::default(),
            ))
            .unwrap();
    }
    store
        .append_session(&SessionRecord::gave_up(
            base_ms() + 3 * HOUR_MS,
            25,
            300,
            AudioSettings::default(),
        ))
        .unwrap();

    let sessions = store.load_sessions().unwrap();
    let advice = FocusAdvisor::new().advise(&sessions);

    // Median completed length 25, abandonment band 5 -> pulled down to 18.
    assert_eq!(advice.focus_minutes, 18);
    assert_eq!(advice.break_minutes, 4);
    assert!((advice.confidence - 0.4575).abs() < 1e-9);
    assert!(advice.rationale.contains("median"));
}

#[test]
fn test_advice_window_ignores_old_sessions() {
    let store = SessionStore::open_memory().unwrap();

    // Five long sessions from last month, then twenty recent short ones.
    for i in 0..5 {
        store
            .append_session(&SessionRecord::completed(
                base_ms() - (720 - i) * HOUR_MS,
                90,
                AudioSettings::default(),
            ))
            .unwrap();
    }
    for i in 0..20 {
        store
            .append_session(&SessionRecord::completed(
                base_ms() + i * HOUR_MS,
                20,
                AudioSettings::default(),
            ))
            .unwrap();
    }

    let sessions = store.load_sessions().unwrap();
    assert_eq!(sessions.len(), 25);

    let advice = FocusAdvisor::new().advise(&sessions);
    assert_eq!(advice.focus_minutes, 20);
    assert!((advice.confidence - 1.0).abs() < 1e-9);
}

#[test]
fn test_cold_start_on_empty_store() {
    let store = SessionStore::open_memory().unwrap();
    let advice = FocusAdvisor::new().advise(&store.load_sessions().unwrap());

    assert_eq!(advice.focus_minutes, 25);
    assert_eq!(advice.break_minutes, 5);
    assert!((advice.confidence - 0.25).abs() < 1e-9);
    assert_eq!(advice.rationale, "Default Pomodoro-friendly cadence.");
}

fn arb_record() -> impl Strategy<Value = SessionRecord> {
    (
        0i64..2_000_000_000_000,
        1u32..=180,
        any::<bool>(),
        proptest::option::of(1u32..=14_400),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(ts, minutes, completed, elapsed, nature, music)| {
            let audio = AudioSettings { nature, music };
            if completed {
                SessionRecord::completed(ts, minutes, audio)
            } else {
                SessionRecord::gave_up(ts, minutes, elapsed.unwrap_or(1), audio)
            }
        })
}

proptest! {
    #[test]
    fn advice_respects_floors_and_confidence_range(
        sessions in proptest::collection::vec(arb_record(), 1..40),
    ) {
        let advice = FocusAdvisor::new().advise(&sessions);
        prop_assert!(advice.focus_minutes >= 10);
        prop_assert!(advice.break_minutes >= 3);
        prop_assert!(advice.confidence >= 0.3);
        prop_assert!(advice.confidence <= 1.0);
        prop_assert!(!advice.rationale.is_empty());
    }

    #[test]
    fn percentile_stays_within_input_bounds(
        values in proptest::collection::vec(0.0f64..1000.0, 1..50),
        p in 0.0f64..=100.0,
    ) {
        let result = percentile(&values, p);
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(result >= min - 1e-9);
        prop_assert!(result <= max + 1e-9);
    }

    #[test]
    fn percentile_of_single_value_is_identity(
        value in -1000.0f64..1000.0,
        p in 0.0f64..=100.0,
    ) {
        prop_assert_eq!(percentile(&[value], p), value);
    }
}
