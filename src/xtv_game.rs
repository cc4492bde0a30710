// Game session state machine: cell availability, scoring, and the question cycle
// One session per playthrough; the catalog is shared read-only across sessions

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;

use crate::xtv_quiz::{cell_index, Catalog, CatalogError, Category, Tier, CELL_COUNT};

/// Seconds allotted to answer one question
pub const QUESTION_SECONDS: u32 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cell {category} ${tier} is not available")]
    CellUnavailable { category: Category, tier: Tier },
    #[error("no question is currently active")]
    NoActiveQuestion,
    #[error("answer index {index} is out of range for {choices} choices")]
    ChoiceOutOfRange { index: usize, choices: usize },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Context for the question currently being answered
#[derive(Debug, Clone)]
pub struct ActiveQuestion {
    pub category: Category,
    pub tier: Tier,
    pub prompt: String,
    /// Shuffled answer choices as presented to the player
    pub choices: Vec<String>,
    /// Position of the correct answer within `choices`
    correct: usize,
    /// Countdown remainder, in ticks (seconds)
    pub time_left: u32,
}

/// Result of resolving one question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub correct: bool,
    /// Signed score change (+value on a correct answer, -value otherwise)
    pub delta: i32,
    /// Running score after the change
    pub score: i32,
    /// Whether this resolution exhausted the board
    pub finished: bool,
}

/// Session lifecycle phase
#[derive(Debug, Clone)]
pub enum Phase {
    Selecting,
    Answering(ActiveQuestion),
    Finished,
}

/// One complete playthrough from first selection to board exhaustion
#[derive(Debug, Clone)]
pub struct Session {
    player: String,
    score: i32,
    consumed: Vec<bool>,
    phase: Phase,
}

impl Session {
    /// Start a session with every cell available and a zero score
    pub fn new(player: impl Into<String>) -> Self {
        Session {
            player: player.into(),
            score: 0,
            consumed: vec![false; CELL_COUNT],
            phase: Phase::Selecting,
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Running score; may be negative, no floor is enforced
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The question being answered, if one is live
    pub fn question(&self) -> Option<&ActiveQuestion> {
        match &self.phase {
            Phase::Answering(q) => Some(q),
            _ => None,
        }
    }

    pub fn is_available(&self, category: Category, tier: Tier) -> bool {
        !self.consumed[cell_index(category, tier)]
    }

    /// Number of cells still selectable
    pub fn cells_remaining(&self) -> usize {
        self.consumed.iter().filter(|c| !**c).count()
    }

    /// True once all 30 cells have been consumed
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Select an available cell: draws a question, consumes the cell,
    /// shuffles the choices, and starts the countdown
    ///
    /// Rejected with `CellUnavailable` outside the selecting phase or on a
    /// consumed cell. A failed draw leaves the session untouched.
    pub fn select_cell<R: Rng>(
        &mut self,
        catalog: &Catalog,
        category: Category,
        tier: Tier,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Selecting) || !self.is_available(category, tier) {
            return Err(SessionError::CellUnavailable { category, tier });
        }
        let record = catalog.random_question(category, tier, rng)?;
        // uniform permutation of the choices, re-finding the correct answer's slot
        let all: Vec<&str> = record.choices().collect();
        let mut order: Vec<usize> = (0..all.len()).collect();
        order.shuffle(rng);
        let correct = order.iter().position(|&i| i == 0).unwrap_or(0);
        let choices = order.iter().map(|&i| all[i].to_string()).collect();
        self.consumed[cell_index(category, tier)] = true;
        debug!(category = %category, tier = tier.value(), "cell selected");
        self.phase = Phase::Answering(ActiveQuestion {
            category,
            tier,
            prompt: record.prompt.clone(),
            choices,
            correct,
            time_left: QUESTION_SECONDS,
        });
        Ok(())
    }

    /// Resolve the live question against the player's choice
    ///
    /// An index past the choice list is a presentation-layer bug and is
    /// rejected without touching the session.
    pub fn submit_answer(&mut self, choice: usize) -> Result<Outcome, SessionError> {
        let correct = match &self.phase {
            Phase::Answering(q) if choice < q.choices.len() => choice == q.correct,
            Phase::Answering(q) => {
                return Err(SessionError::ChoiceOutOfRange { index: choice, choices: q.choices.len() });
            }
            _ => return Err(SessionError::NoActiveQuestion),
        };
        self.resolve(correct).ok_or(SessionError::NoActiveQuestion)
    }

    /// Resolve the live question as expired; scores exactly like a wrong answer
    pub fn time_out(&mut self) -> Result<Outcome, SessionError> {
        self.resolve(false).ok_or(SessionError::NoActiveQuestion)
    }

    /// Count the live question's clock down one tick
    /// Returns the remainder, or None when no question is active
    pub fn tick(&mut self) -> Option<u32> {
        match &mut self.phase {
            Phase::Answering(q) => {
                q.time_left = q.time_left.saturating_sub(1);
                Some(q.time_left)
            }
            _ => None,
        }
    }

    fn resolve(&mut self, correct: bool) -> Option<Outcome> {
        if !matches!(self.phase, Phase::Answering(_)) {
            return None;
        }
        let Phase::Answering(q) = std::mem::replace(&mut self.phase, Phase::Selecting) else {
            return None;
        };
        let value = q.tier.value();
        let delta = if correct { value } else { -value };
        self.score += delta;
        let finished = self.cells_remaining() == 0;
        if finished {
            self.phase = Phase::Finished;
            debug!(score = self.score, "board exhausted, session finished");
        } else {
            debug!(correct, delta, score = self.score, "question resolved");
        }
        Some(Outcome { correct, delta, score: self.score, finished })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> Catalog {
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

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    /// Index of the known-correct choice in the shuffled presentation
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
    fn select_consumes_the_cell() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        assert!(session.is_available(Category::Math, Tier::T200));
        session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap();
        assert!(!session.is_available(Category::Math, Tier::T200));
        assert_eq!(session.cells_remaining(), 29);
    }

    #[test]
    fn reselecting_a_consumed_cell_fails() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap();
        session.submit_answer(correct_index(&session)).unwrap();
        let err = session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SessionError::CellUnavailable { category: Category::Math, tier: Tier::T200 }
        );
    }

    #[test]
    fn selecting_while_answering_fails() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap();
        let err = session.select_cell(&catalog, Category::Food, Tier::T400, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::CellUnavailable { .. }));
        // the rejected cell is still intact
        assert!(session.is_available(Category::Food, Tier::T400));
    }

    #[test]
    fn correct_answer_adds_the_cell_value() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        session.select_cell(&catalog, Category::Math, Tier::T600, &mut rng).unwrap();
        let outcome = session.submit_answer(correct_index(&session)).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.delta, 600);
        assert_eq!(session.score(), 600);
    }

    #[test]
    fn wrong_answer_subtracts_the_cell_value() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        session.select_cell(&catalog, Category::Math, Tier::T600, &mut rng).unwrap();
        let outcome = session.submit_answer(wrong_index(&session)).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.delta, -600);
        assert_eq!(session.score(), -600);
    }

    #[test]
    fn timeout_scores_like_a_wrong_answer() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        session.select_cell(&catalog, Category::Sports, Tier::T1000, &mut rng).unwrap();
        let outcome = session.time_out().unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.delta, -1000);
        assert_eq!(session.score(), -1000);
    }

    #[test]
    fn score_may_go_negative_without_clamping() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        for tier in [Tier::T200, Tier::T400, Tier::T600] {
            session.select_cell(&catalog, Category::Math, tier, &mut rng).unwrap();
            session.submit_answer(wrong_index(&session)).unwrap();
        }
        assert_eq!(session.score(), -1200);
    }

    #[test]
    fn out_of_range_choice_is_rejected_without_mutation() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap();
        let err = session.submit_answer(4).unwrap_err();
        assert_eq!(err, SessionError::ChoiceOutOfRange { index: 4, choices: 4 });
        // still answering, score untouched
        assert!(session.question().is_some());
        assert_eq!(session.score(), 0);
        let outcome = session.submit_answer(correct_index(&session)).unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn submit_without_a_question_fails() {
        let mut session = Session::new("Ann");
        assert_eq!(session.submit_answer(0).unwrap_err(), SessionError::NoActiveQuestion);
        assert_eq!(session.time_out().unwrap_err(), SessionError::NoActiveQuestion);
    }

    #[test]
    fn tick_counts_down_only_while_answering() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        assert_eq!(session.tick(), None);
        session.select_cell(&catalog, Category::Food, Tier::T200, &mut rng).unwrap();
        assert_eq!(session.question().unwrap().time_left, QUESTION_SECONDS);
        assert_eq!(session.tick(), Some(QUESTION_SECONDS - 1));
        for _ in 0..QUESTION_SECONDS {
            session.tick();
        }
        // saturates at zero rather than wrapping
        assert_eq!(session.tick(), Some(0));
    }

    #[test]
    fn shuffle_always_tracks_the_correct_choice() {
        let catalog = catalog();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = Session::new("Ann");
            session.select_cell(&catalog, Category::Animals, Tier::T800, &mut rng).unwrap();
            let outcome = session.submit_answer(correct_index(&session)).unwrap();
            assert!(outcome.correct, "seed {seed}");
        }
    }

    #[test]
    fn thirty_resolutions_finish_the_session() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        for c in Category::ALL {
            for t in Tier::ALL {
                assert!(!session.is_finished());
                session.select_cell(&catalog, c, t, &mut rng).unwrap();
                session.submit_answer(correct_index(&session)).unwrap();
            }
        }
        assert!(session.is_finished());
        assert_eq!(session.cells_remaining(), 0);
        // six categories, each worth 200+400+600+800+1000
        assert_eq!(session.score(), 18_000);
        let err = session.select_cell(&catalog, Category::Math, Tier::T200, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::CellUnavailable { .. }));
    }

    #[test]
    fn last_resolution_reports_finished() {
        let catalog = catalog();
        let mut rng = rng();
        let mut session = Session::new("Ann");
        let mut last = None;
        for c in Category::ALL {
            for t in Tier::ALL {
                session.select_cell(&catalog, c, t, &mut rng).unwrap();
                last = Some(session.time_out().unwrap());
            }
        }
        let outcome = last.unwrap();
        assert!(outcome.finished);
        assert_eq!(outcome.score, session.score());
    }
}
