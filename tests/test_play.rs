//! End-to-end play scenarios against a known fixed catalog.

use rand::SeedableRng;
use rand::rngs::StdRng;

use xttriv::{Catalog, Category, HighScore, Session, SessionError, Tier};

/// One record per cell; the correct choice is always "What is right"
fn fixed_catalog() -> Catalog {
    let mut text = String::new();
    for c in Category::ALL {
        for t in Tier::ALL {
            text.push_str(&format!(
                "{}%{}%prompt {} {}%What is%right%wrong-a%wrong-b%wrong-c\n",
                c.name(),
                t.value(),
                c.name(),
                t.value()
            ));
        }
    }
    Catalog::parse(&text).unwrap()
}

fn correct_index(session: &Session) -> usize {
    session
        .question()
        .unwrap()
        .choices
        .iter()
        .position(|c| c == "What is right")
        .unwrap()
}

fn wrong_index(session: &Session) -> usize {
    session
        .question()
        .unwrap()
        .choices
        .iter()
        .position(|c| c != "What is right")
        .unwrap()
}

#[test]
fn winning_a_cell_scores_and_consumes_it() {
    let catalog = fixed_catalog();
    let mut rng = StdRng::seed_from_u64(11);
    let mut session = Session::new("Ann");

    session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap();
    let outcome = session.submit_answer(correct_index(&session)).unwrap();

    assert!(outcome.correct);
    assert_eq!(session.score(), 200);
    assert_eq!(session.cells_remaining(), 29);

    let err = session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap_err();
    assert_eq!(
        err,
        SessionError::CellUnavailable { category: Category::Math, tier: Tier::T200 }
    );
}

#[test]
fn three_misses_run_the_score_negative() {
    let catalog = fixed_catalog();
    let mut rng = StdRng::seed_from_u64(12);
    let mut session = Session::new("Ann");

    for tier in [Tier::T200, Tier::T400, Tier::T600] {
        session.select_cell(&catalog, Category::Food, tier, &mut rng).unwrap();
        session.submit_answer(wrong_index(&session)).unwrap();
    }
    assert_eq!(session.score(), -1200);
}

#[test]
fn board_exhaustion_ends_the_session() {
    let catalog = fixed_catalog();
    let mut rng = StdRng::seed_from_u64(13);
    let mut session = Session::new("Ann");

    let mut resolutions = 0;
    for c in Category::ALL {
        for t in Tier::ALL {
            session.select_cell(&catalog, c, t, &mut rng).unwrap();
            // alternate answers and timeouts; both must consume the cell
            if resolutions % 2 == 0 {
                session.submit_answer(correct_index(&session)).unwrap();
            } else {
                session.time_out().unwrap();
            }
            resolutions += 1;
        }
    }

    assert_eq!(resolutions, 30);
    assert!(session.is_finished());
    assert_eq!(session.cells_remaining(), 0);
    for c in Category::ALL {
        for t in Tier::ALL {
            assert!(matches!(
                session.select_cell(&catalog, c, t, &mut rng),
                Err(SessionError::CellUnavailable { .. })
            ));
        }
    }
    assert_eq!(session.submit_answer(0).unwrap_err(), SessionError::NoActiveQuestion);
}

#[test]
fn finishing_above_the_record_takes_it() {
    let stored = HighScore { name: "Ann".to_string(), score: 500 };

    let new_record = stored.challenge("Bob", 600).expect("600 beats 500");
    assert_eq!(new_record, HighScore { name: "Bob".to_string(), score: 600 });
    assert_eq!(new_record.serialize(), "Bob%600");

    // the record file is always a full overwrite, round-tripping exactly
    let reread = HighScore::parse(&new_record.serialize()).unwrap();
    assert_eq!(reread, new_record);
}

#[test]
fn tying_the_record_does_not_take_it() {
    let stored = HighScore { name: "Ann".to_string(), score: 500 };
    assert_eq!(stored.challenge("Cara", 500), None);
}

#[test]
fn a_full_winning_run_beats_a_modest_record() {
    let catalog = fixed_catalog();
    let mut rng = StdRng::seed_from_u64(14);
    let mut session = Session::new("Bob");

    for c in Category::ALL {
        for t in Tier::ALL {
            session.select_cell(&catalog, c, t, &mut rng).unwrap();
            session.submit_answer(correct_index(&session)).unwrap();
        }
    }
    assert!(session.is_finished());

    let stored = HighScore { name: "Ann".to_string(), score: 500 };
    let new_record = stored.challenge(session.player(), session.score()).unwrap();
    assert_eq!(new_record.name, "Bob");
    assert_eq!(new_record.score, 18_000);
}
