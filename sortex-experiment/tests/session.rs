use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sortex_core::{Context, Feedback, Phase, Side, TOTAL_TRIALS, correct_side};
use sortex_experiment::{
    Participant, SessionConfig, SessionController, SessionSummary, Strategy, play_through,
};
use sortex_timing::{ManualTimer, Timer};
use std::time::Duration;

fn new_session() -> (SessionController<ManualTimer>, ManualTimer) {
    let clock = ManualTimer::new();
    let session = SessionController::new(SessionConfig::default(), clock.clone());
    (session, clock)
}

fn wait_out_feedback(session: &mut SessionController<ManualTimer>, clock: &ManualTimer) {
    clock.advance(Duration::from_millis(1000));
    session.tick();
}

#[test]
fn dog_left_on_first_trial_is_correct() {
    let (mut s, _) = new_session();
    let record = s.choose_side(Side::Left).unwrap();
    assert_eq!(record.item.name, "dog");
    assert!(record.is_correct);
    assert_eq!(s.score(), 25);
}

#[test]
fn dog_right_on_first_trial_is_wrong() {
    let (mut s, _) = new_session();
    let record = s.choose_side(Side::Right).unwrap();
    assert!(!record.is_correct);
    assert_eq!(s.score(), 0);
}

#[test]
fn koala_at_midpoint_expects_right() {
    let (mut s, clock) = new_session();
    for _ in 0..4 {
        s.choose_side(Side::Left);
        wait_out_feedback(&mut s, &clock);
    }
    assert_eq!(s.trial_index(), 4);
    let item = s.current_item().unwrap();
    assert_eq!(item.name, "rabbit");

    s.choose_side(Side::Right);
    wait_out_feedback(&mut s, &clock);
    s.choose_side(Side::Left);
    wait_out_feedback(&mut s, &clock);

    let koala = s.current_item().unwrap();
    assert_eq!(koala.name, "koala");
    assert_eq!(correct_side(koala, 4), Side::Right);
    assert_eq!(correct_side(koala, s.trial_index()), Side::Right);

    let record = s.choose_side(Side::Right).unwrap();
    assert!(record.is_correct);
    assert_eq!(record.context, Context::Second);
}

#[test]
fn always_correct_run_scores_200() {
    let (mut s, clock) = new_session();
    for trial in 0..TOTAL_TRIALS {
        assert_eq!(s.phase(), Phase::Active);
        let item = *s.current_item().unwrap();
        s.choose_side(correct_side(&item, trial));
        wait_out_feedback(&mut s, &clock);
    }
    assert_eq!(s.score(), 200);
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.history().len(), 8);
    assert!(s.view().results().is_some());
}

#[test]
fn last_trial_waits_the_same_delay_before_finishing() {
    let (mut s, clock) = new_session();
    for _ in 0..TOTAL_TRIALS - 1 {
        s.choose_side(Side::Left);
        wait_out_feedback(&mut s, &clock);
    }
    s.choose_side(Side::Left);
    clock.advance(Duration::from_millis(500));
    s.tick();
    assert_eq!(s.phase(), Phase::Resolved);
    assert_eq!(s.feedback(), Feedback::Correct);
    clock.advance(Duration::from_millis(500));
    s.tick();
    assert_eq!(s.phase(), Phase::Finished);
    assert_eq!(s.feedback(), Feedback::None);
}

#[test]
fn replayed_transition_from_earlier_trial_is_ignored() {
    let (mut s, clock) = new_session();
    s.choose_side(Side::Left);
    clock.advance(Duration::from_millis(1000));
    let due = s.update();
    assert_eq!(due.len(), 1);
    assert!(s.handle_event(due[0]));
    assert_eq!(s.trial_index(), 1);

    s.choose_side(Side::Right);
    assert!(!s.handle_event(due[0]));
    assert_eq!(s.trial_index(), 1);
    assert_eq!(s.phase(), Phase::Resolved);
    assert!(s.is_transition_pending());

    // trial 1's own transition still lands on time
    clock.advance(Duration::from_millis(1000));
    assert!(s.tick());
    assert_eq!(s.trial_index(), 2);
    assert_eq!(s.phase(), Phase::Active);
}

#[test]
fn random_sessions_keep_score_and_history_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..64 {
        let (mut s, clock) = new_session();
        while !s.phase().is_finished() {
            // stray clicks while feedback is showing must not count
            let side = if rng.random_bool(0.5) { Side::Left } else { Side::Right };
            let before = (s.history().len(), s.score(), s.trial_index());
            let accepted = s.choose_side(side).is_some();
            if !accepted {
                assert_eq!(before, (s.history().len(), s.score(), s.trial_index()));
            }
            assert_eq!(
                s.history().len(),
                s.trial_index() + usize::from(s.phase().is_resolved())
            );
            clock.advance(Duration::from_millis(rng.random_range(0..=1000)));
            s.tick();
        }
        let correct = s.history().iter().filter(|r| r.is_correct).count() as u32;
        assert_eq!(s.history().len(), TOTAL_TRIALS);
        assert_eq!(s.score(), 25 * correct);
        for (i, record) in s.history().iter().enumerate() {
            assert_eq!(record.trial, i);
        }
    }
}

#[test]
fn reset_from_every_phase_restores_initial_state() {
    let (mut s, clock) = new_session();

    s.reset();
    assert_initial(&s);

    s.choose_side(Side::Left);
    assert_eq!(s.phase(), Phase::Resolved);
    s.reset();
    assert_initial(&s);
    clock.advance(Duration::from_secs(10));
    s.tick();
    assert_initial(&s);

    let mut p = Participant::new(Strategy::Random, StdRng::seed_from_u64(3));
    play_through(&mut s, &mut p);
    assert_eq!(s.phase(), Phase::Finished);
    s.reset();
    assert_initial(&s);
}

fn assert_initial(s: &SessionController<ManualTimer>) {
    assert_eq!(s.trial_index(), 0);
    assert_eq!(s.score(), 0);
    assert!(s.history().is_empty());
    assert_eq!(s.phase(), Phase::Active);
    assert_eq!(s.feedback(), Feedback::None);
    assert!(!s.is_transition_pending());
}

#[test]
fn perseverating_player_summary() {
    let clock = ManualTimer::new();
    let mut s = SessionController::new(SessionConfig { feedback_delay_ms: 10 }, clock.clone());
    let mut p = Participant::new(Strategy::Perseverate, StdRng::seed_from_u64(9));
    play_through(&mut s, &mut p);

    let summary = SessionSummary::from_history(s.history());
    assert_eq!(summary.score, s.score());
    assert_eq!(summary.score, 100);
    assert_eq!(summary.perseverative_errors, 4);
    assert_eq!(summary.adapted_at, None);
    assert!(clock.now() > 0);
}
