// Trivia quiz board game core and terminal front end
// Front ends drive the game through Catalog, Session, and HighScore;
// the core never touches the terminal or the filesystem itself

pub mod xtv_color; // Cross-platform color matching utilities
pub mod xtv_files; // Data file locations and I/O
pub mod xtv_game;  // Game session state machine
pub mod xtv_quiz;  // Question catalog and parser
pub mod xtv_score; // Persistent high-score record
pub mod xtv_ui;    // Terminal UI rendering and event handling

pub use xtv_game::{ActiveQuestion, Outcome, Phase, QUESTION_SECONDS, Session, SessionError};
pub use xtv_quiz::{
    CATEGORY_COUNT, CELL_COUNT, Catalog, CatalogError, Category, QuestionRecord, TIER_COUNT, Tier,
};
pub use xtv_score::{HighScore, ScoreError};
