//! Tests for the session state machine.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use strictly_millionaire::{
    Answer, Cue, EndReason, GameSession, Ignored, LifelineKind, LifelineResult, Phase,
    PrizeLadder, QuestionBank, QuizErrorKind, Resolution, SessionRules, StartError, TickOutcome,
};

fn session_with_seed(seed: u64) -> GameSession {
    GameSession::new(
        QuestionBank::builtin().expect("builtin bank"),
        PrizeLadder::standard(),
        SessionRules::default(),
        StdRng::seed_from_u64(seed),
    )
    .expect("valid session")
}

fn started(seed: u64) -> GameSession {
    let mut session = session_with_seed(seed);
    session.start().expect("start from menu");
    session
}

fn correct_answer(session: &GameSession) -> Answer {
    *session.current_question().expect("question loaded").correct()
}

fn wrong_answer(session: &GameSession) -> Answer {
    correct_answer(session).others()[0]
}

/// Answers correctly until the session sits on `index`.
fn advance_to(session: &mut GameSession, index: usize) {
    while session.current_index() != Some(index) {
        let answer = correct_answer(session);
        let pending = session.select_answer(answer).unwrap();
        session.resolve(pending.generation).unwrap();
    }
}

#[test]
fn test_start_resets_everything() {
    let session = started(1);
    let view = session.view();
    assert_eq!(view.phase, Phase::Playing);
    assert_eq!(view.question_index, 0);
    assert_eq!(view.question_count, 10);
    assert_eq!(view.time_remaining, 30);
    assert!(view.selected.is_none());
    assert!(view.eliminated.is_empty());
    assert!(view.used_lifelines.is_empty());
    assert!(view.audience.is_none());
    assert!(!view.paused);
    assert!(session.timer_running());
}

#[test]
fn test_correct_answer_advances_and_clears() {
    let mut session = started(2);
    session.use_lifeline(LifelineKind::FiftyFifty).unwrap();
    session.use_lifeline(LifelineKind::AskTheAudience).unwrap();
    session.pause().unwrap();

    let pending = session.select_answer(correct_answer(&session)).unwrap();
    assert_eq!(session.phase(), Phase::Answered);
    assert_eq!(pending.delay.as_millis(), 1_500);

    let resolution = session.resolve(pending.generation).unwrap();
    assert_eq!(resolution, Resolution::Advanced { index: 1 });

    let view = session.view();
    assert_eq!(view.phase, Phase::Playing);
    assert_eq!(view.question_index, 1);
    assert!(view.selected.is_none());
    assert!(view.eliminated.is_empty());
    assert!(view.audience.is_none());
    assert_eq!(view.time_remaining, 30);
    assert!(!view.paused);
    // Lifelines stay spent for the whole session.
    assert_eq!(view.used_lifelines.len(), 2);
}

#[test]
fn test_final_correct_answer_wins_top_prize() {
    let mut session = started(3);
    session.use_lifeline(LifelineKind::PhoneAFriend).unwrap();
    advance_to(&mut session, 9);
    session.use_lifeline(LifelineKind::FiftyFifty).unwrap();

    let pending = session.select_answer(correct_answer(&session)).unwrap();
    let resolution = session.resolve(pending.generation).unwrap();

    let Resolution::Won(outcome) = resolution else {
        panic!("expected a win, got {resolution:?}");
    };
    assert_eq!(session.phase(), Phase::Won);
    assert_eq!(outcome.reason, EndReason::Won);
    assert_eq!(outcome.prize, 1_000_000);
    assert_eq!(outcome.questions_answered, 10);
}

#[test]
fn test_wrong_answer_pays_guaranteed_prize() {
    for index in [0, 3, 4, 5, 9] {
        let mut session = started(4);
        advance_to(&mut session, index);
        let expected = session.ladder().guaranteed_prize(index);

        let pending = session.select_answer(wrong_answer(&session)).unwrap();
        let resolution = session.resolve(pending.generation).unwrap();

        let Resolution::GameOver(outcome) = resolution else {
            panic!("expected game over at {index}");
        };
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(outcome.reason, EndReason::WrongAnswer);
        assert_eq!(outcome.prize, expected, "index {index}");
        assert_eq!(outcome.questions_answered, index);
    }
}

#[test]
fn test_guaranteed_prize_scenario() {
    let mut session = started(5);
    advance_to(&mut session, 3);
    assert_eq!(session.current_prize(), 500);
    assert_eq!(session.guaranteed_prize(), 0);
    advance_to(&mut session, 5);
    assert_eq!(session.current_prize(), 2_000);
    assert_eq!(session.guaranteed_prize(), 1_000);
}

#[test]
fn test_quit_pays_guaranteed_prize() {
    let mut session = started(6);
    advance_to(&mut session, 6);
    let outcome = session.quit().unwrap();
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(outcome.reason, EndReason::Quit);
    assert_eq!(outcome.prize, 1_000);
}

#[test]
fn test_quit_only_while_playing() {
    let mut session = session_with_seed(7);
    assert!(matches!(
        session.quit(),
        Err(Ignored::InvalidTransition { phase: Phase::Menu, .. })
    ));
    session.start().unwrap();
    session.select_answer(Answer::A).unwrap();
    assert!(session.quit().is_err());
    assert_eq!(session.phase(), Phase::Answered);
}

#[test]
fn test_timeout_matches_wrong_answer() {
    let mut timed_out = started(8);
    let mut wrong = started(8);
    advance_to(&mut timed_out, 5);
    advance_to(&mut wrong, 5);

    let mut expired = None;
    for _ in 0..30 {
        match timed_out.tick(timed_out.generation()).unwrap() {
            TickOutcome::Counting(_) => {}
            TickOutcome::Expired(outcome) => expired = Some(outcome),
        }
    }
    let expired = expired.expect("timer expired after 30 ticks");

    let pending = wrong.select_answer(wrong_answer(&wrong)).unwrap();
    let Resolution::GameOver(lost) = wrong.resolve(pending.generation).unwrap() else {
        panic!("wrong answer must end the game");
    };

    assert_eq!(timed_out.phase(), Phase::GameOver);
    assert_eq!(expired.reason, EndReason::TimeExpired);
    assert_eq!(expired.prize, lost.prize);
    assert_eq!(expired.questions_answered, lost.questions_answered);
    assert!(timed_out.view().selected.is_none());
}

#[test]
fn test_tick_counts_down() {
    let mut session = started(9);
    let generation = session.generation();
    assert_eq!(session.tick(generation), Ok(TickOutcome::Counting(29)));
    assert_eq!(session.tick(generation), Ok(TickOutcome::Counting(28)));
    assert_eq!(session.view().time_remaining, 28);
}

#[test]
fn test_tick_while_paused_is_ignored() {
    let mut session = started(10);
    assert!(!session.is_paused());
    session.pause().unwrap();
    assert!(session.is_paused());
    assert!(!session.timer_running());
    let before = session.view();
    assert_eq!(
        session.tick(session.generation()),
        Err(Ignored::TimerPaused)
    );
    assert_eq!(session.view(), before);
}

#[test]
fn test_stale_tick_is_discarded() {
    let mut session = started(11);
    let old = session.generation();
    advance_to(&mut session, 1);
    let before = session.view();
    assert!(matches!(session.tick(old), Err(Ignored::Stale { .. })));
    assert_eq!(session.view(), before);
}

#[test]
fn test_stale_resolution_is_discarded() {
    let mut session = started(12);
    let pending = session.select_answer(correct_answer(&session)).unwrap();
    session.resolve(pending.generation).unwrap();
    // A duplicate resolution for the same selection has no effect.
    let before = session.view();
    assert!(matches!(
        session.resolve(pending.generation),
        Err(Ignored::Stale { .. })
    ));
    assert_eq!(session.view(), before);
}

#[test]
fn test_resolution_after_reset_is_discarded() {
    let mut session = started(13);
    let pending = session.select_answer(wrong_answer(&session)).unwrap();
    session.resolve(pending.generation).unwrap();
    session.return_to_menu().unwrap();
    assert!(session.resolve(pending.generation).is_err());
    assert_eq!(session.phase(), Phase::Menu);
}

#[test]
fn test_lifeline_once_per_session() {
    let mut session = started(14);
    session.use_lifeline(LifelineKind::FiftyFifty).unwrap();
    advance_to(&mut session, 1);

    let before = session.view();
    assert_eq!(
        session.use_lifeline(LifelineKind::FiftyFifty),
        Err(Ignored::LifelineSpent(LifelineKind::FiftyFifty))
    );
    assert_eq!(session.view(), before);
    assert!(before.eliminated.is_empty());
}

#[test]
fn test_fifty_fifty_hides_two_wrong_answers() {
    for seed in 0..25 {
        let mut session = started(seed);
        let correct = correct_answer(&session);
        let LifelineResult::FiftyFifty(hidden) =
            session.use_lifeline(LifelineKind::FiftyFifty).unwrap()
        else {
            panic!("fifty-fifty returns eliminated answers");
        };
        assert!(!hidden.contains(&correct));
        let view = session.view();
        assert_eq!(view.eliminated.len(), 2);
        assert!(!view.is_eliminated(correct));
    }
}

#[test]
fn test_eliminated_answer_cannot_be_selected() {
    let mut session = started(15);
    let LifelineResult::FiftyFifty([hidden, _]) =
        session.use_lifeline(LifelineKind::FiftyFifty).unwrap()
    else {
        panic!("fifty-fifty returns eliminated answers");
    };
    assert_eq!(
        session.select_answer(hidden),
        Err(Ignored::EliminatedAnswer(hidden))
    );
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn test_lifelines_rejected_outside_playing() {
    let mut session = started(16);
    session.select_answer(Answer::B).unwrap();
    assert!(matches!(
        session.use_lifeline(LifelineKind::AskTheAudience),
        Err(Ignored::InvalidTransition { phase: Phase::Answered, .. })
    ));
    assert!(session.view().used_lifelines.is_empty());
}

#[test]
fn test_phone_suggestion_kept_for_current_question_only() {
    let mut session = started(17);
    let LifelineResult::PhoneAFriend(suggestion) =
        session.use_lifeline(LifelineKind::PhoneAFriend).unwrap()
    else {
        panic!("phone-a-friend returns a suggestion");
    };
    assert_eq!(session.view().friend_suggestion, Some(suggestion));
    // Advisory only: nothing selected or hidden.
    assert!(session.view().selected.is_none());
    assert!(session.view().eliminated.is_empty());
    advance_to(&mut session, 1);
    assert!(session.view().friend_suggestion.is_none());
}

#[test]
fn test_select_outside_playing_is_ignored() {
    let mut session = session_with_seed(18);
    assert!(matches!(
        session.select_answer(Answer::A),
        Err(Ignored::InvalidTransition { phase: Phase::Menu, .. })
    ));
    session.start().unwrap();
    session.select_answer(Answer::A).unwrap();
    assert!(matches!(
        session.select_answer(Answer::B),
        Err(Ignored::InvalidTransition { phase: Phase::Answered, .. })
    ));
    assert_eq!(session.view().selected, Some(Answer::A));
}

#[test]
fn test_start_while_playing_is_ignored() {
    let mut session = started(19);
    assert!(matches!(session.start(), Err(StartError::Ignored(_))));
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn test_insufficient_pool_fails_start() {
    let builtin = QuestionBank::builtin().unwrap();
    let small = QuestionBank::new(builtin.questions()[..5].to_vec()).unwrap();
    let mut session = GameSession::new(
        small,
        PrizeLadder::standard(),
        SessionRules::default(),
        StdRng::seed_from_u64(20),
    )
    .unwrap();

    let Err(StartError::Quiz(err)) = session.start() else {
        panic!("start must fail with a short pool");
    };
    assert_eq!(
        err.kind(),
        &QuizErrorKind::InsufficientQuestionPool {
            requested: 10,
            available: 5
        }
    );
    assert_eq!(session.phase(), Phase::Menu);
}

#[test]
fn test_return_to_menu_and_replay() {
    let mut session = started(21);
    session.use_lifeline(LifelineKind::FiftyFifty).unwrap();
    session.quit().unwrap();

    let view = session.return_to_menu().unwrap();
    assert_eq!(view.phase, Phase::Menu);
    assert!(view.question.is_none());
    assert!(view.outcome.is_none());

    session.start().unwrap();
    assert!(session.view().lifeline_available(LifelineKind::FiftyFifty));
}

#[test]
fn test_return_to_menu_only_from_terminal() {
    let mut session = started(22);
    assert!(session.return_to_menu().is_err());
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn test_reveal_pauses_and_shows_correct() {
    let mut session = started(23);
    assert!(session.view().correct.is_none());
    session.reveal().unwrap();
    let view = session.view();
    assert!(view.paused);
    assert!(view.revealed);
    assert_eq!(view.correct, Some(correct_answer(&session)));
    assert!(!session.timer_running());

    advance_to(&mut session, 1);
    let view = session.view();
    assert!(!view.revealed);
    assert!(view.correct.is_none());
}

#[test]
fn test_correct_exposed_after_game_over() {
    let mut session = started(24);
    let correct = correct_answer(&session);
    let pending = session.select_answer(wrong_answer(&session)).unwrap();
    assert!(session.view().correct.is_none());
    session.resolve(pending.generation).unwrap();
    assert_eq!(session.view().correct, Some(correct));
}

#[test]
fn test_view_json_hides_correct_answer() {
    let session = started(25);
    let json = serde_json::to_value(session.view()).unwrap();
    assert!(json["correct"].is_null());
    assert!(json["question"].get("correct").is_none());
}

#[test]
fn test_listeners_receive_views_and_cues() {
    let views = Arc::new(Mutex::new(Vec::new()));
    let cues = Arc::new(Mutex::new(Vec::new()));
    let mut session = session_with_seed(26);
    {
        let views = Arc::clone(&views);
        session.on_session_changed(move |view| views.lock().unwrap().push(view.phase));
    }
    {
        let cues = Arc::clone(&cues);
        session.on_cue(move |cue| cues.lock().unwrap().push(cue));
    }

    session.start().unwrap();
    let pending = session.select_answer(correct_answer(&session)).unwrap();
    session.resolve(pending.generation).unwrap();
    // Ignored events notify nobody.
    let _ = session.resolve(pending.generation);

    assert_eq!(
        *views.lock().unwrap(),
        vec![Phase::Playing, Phase::Answered, Phase::Playing]
    );
    assert_eq!(*cues.lock().unwrap(), vec![Cue::Select, Cue::Correct]);
}
