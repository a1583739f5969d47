use assert_matches::assert_matches;
use chromatap::color::{Color, RandomColorSource, ScriptedColorSource};
use chromatap::record::{reconcile, RecordOutcome};
use chromatap::{AnswerResult, RoundEngine, RoundError, SessionHistory, TickResult};
use proptest::prelude::*;

fn any_color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::Red),
        Just(Color::Green),
        Just(Color::Blue),
        Just(Color::Yellow),
    ]
}

#[test]
fn full_round_then_history() {
    let mut engine = RoundEngine::new(ScriptedColorSource::new([Color::Blue, Color::Red]));
    engine.start(30).unwrap();

    let mut last = None;
    for _ in 0..29 {
        last = Some(engine.tick().unwrap());
    }
    assert_eq!(last, Some(TickResult::Running(1)));

    let target = engine.target().unwrap();
    assert_matches!(engine.submit_answer(target), Ok(AnswerResult::Correct(_)));
    assert_eq!(engine.score(), 1);

    assert_eq!(engine.tick(), Ok(TickResult::Finished(1)));

    let mut history = SessionHistory::new();
    history.record(engine.score());
    assert_eq!(history.all(), vec![1]);
    assert_eq!(history.max_score(), 1);
    assert_eq!(history.count(), 1);
}

#[test]
fn fresh_history_defaults() {
    let history = SessionHistory::new();
    assert_eq!(history.max_score(), 0);
    assert_eq!(history.count(), 0);
    assert!(history.all().is_empty());
}

#[test]
fn record_reconciliation_examples() {
    assert_eq!(
        reconcile(5, 3),
        RecordOutcome {
            updated_record: 5,
            is_new_record: true
        }
    );
    assert_eq!(
        reconcile(2, 3),
        RecordOutcome {
            updated_record: 3,
            is_new_record: false
        }
    );
    assert!(!reconcile(0, 0).is_new_record);
}

#[test]
fn misuse_before_start_is_reported() {
    let mut engine = RoundEngine::new(RandomColorSource::seeded(1));
    assert_eq!(engine.tick(), Err(RoundError::NotStarted));
    assert_eq!(engine.submit_answer(Color::Red), Err(RoundError::NotStarted));
}

proptest! {
    #[test]
    fn countdown_finishes_exactly_on_last_tick(duration in 1u32..200) {
        let mut engine = RoundEngine::new(RandomColorSource::seeded(duration as u64));
        engine.start(duration).unwrap();

        for expected in (1..duration).rev() {
            prop_assert_eq!(engine.tick(), Ok(TickResult::Running(expected)));
        }
        prop_assert_eq!(engine.tick(), Ok(TickResult::Finished(0)));
        prop_assert_eq!(engine.tick(), Ok(TickResult::AlreadyFinished));
        prop_assert_eq!(engine.tick(), Ok(TickResult::AlreadyFinished));
    }

    #[test]
    fn score_counts_matching_answers(seed in any::<u64>(), answers in prop::collection::vec(any_color(), 0..100)) {
        let mut engine = RoundEngine::new(RandomColorSource::seeded(seed));
        engine.start(60).unwrap();

        let mut expected = 0u32;
        for selected in answers {
            let before_score = engine.score();
            let before_target = engine.target().unwrap();
            let result = engine.submit_answer(selected).unwrap();

            if selected == before_target {
                expected += 1;
                prop_assert_eq!(result, AnswerResult::Correct(engine.target().unwrap()));
            } else {
                prop_assert_eq!(result, AnswerResult::Incorrect);
                prop_assert_eq!(engine.target(), Some(before_target));
            }
            prop_assert!(engine.score() >= before_score);
        }
        prop_assert_eq!(engine.score(), expected);
    }

    #[test]
    fn history_stats_match_records(scores in prop::collection::vec(0u32..1000, 0..50)) {
        let mut history = SessionHistory::new();
        for &s in &scores {
            history.record(s);
        }
        prop_assert_eq!(history.count(), scores.len());
        prop_assert_eq!(history.max_score(), scores.iter().copied().max().unwrap_or(0));
        prop_assert_eq!(history.all(), scores);

        history.reset();
        prop_assert_eq!(history.count(), 0);
    }

    #[test]
    fn reconcile_keeps_the_higher_value(score in 0u32..10_000, previous in 0u32..10_000) {
        let outcome = reconcile(score, previous);
        prop_assert_eq!(outcome.is_new_record, score > previous);
        prop_assert_eq!(outcome.updated_record, score.max(previous));
    }
}
