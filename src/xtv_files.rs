// Data file locations and I/O for the question catalog and high-score record
// The game core never touches the filesystem; everything disk-shaped lives here

use directories::ProjectDirs;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::xtv_score::HighScore;

/// Question catalog compiled into the binary, used when no file overrides it
const DEFAULT_QUESTIONS: &str = include_str!("../data/questions.txt");

const QUESTIONS_FILE: &str = "questions.txt";
const SCORE_FILE: &str = "highscore.txt";

/// Candidate locations for a data file, in lookup order:
/// the per-project data directory first, then the current directory
fn candidate_paths(file: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(exe) = env::current_exe() {
        if let Some(name) = exe.file_stem().and_then(|s| s.to_str()) {
            if let Some(proj) = ProjectDirs::from("com", "xhbl", name) {
                let mut p = proj.data_dir().to_path_buf();
                p.push(file);
                paths.push(p);
            }
        }
    }
    if let Ok(mut p) = env::current_dir() {
        p.push(file);
        paths.push(p);
    }
    paths
}

/// Raw catalog text: the first readable on-disk file wins, otherwise the
/// built-in question set
pub fn questions_text() -> String {
    for path in candidate_paths(QUESTIONS_FILE) {
        if !path.exists() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "using question catalog from disk");
                return text;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable question file");
            }
        }
    }
    DEFAULT_QUESTIONS.to_string()
}

/// Load the persisted high score
/// A missing or corrupt record falls back to the default rather than failing;
/// losing a high score is not fatal to gameplay
pub fn load_high_score() -> HighScore {
    for path in candidate_paths(SCORE_FILE) {
        if !path.exists() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(text) => match HighScore::parse(&text) {
                Ok(record) => return record,
                Err(err) => {
                    warn!(path = %path.display(), %err, "ignoring corrupt high score");
                }
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable high score");
            }
        }
    }
    HighScore::default()
}

/// Overwrite the stored high score
pub fn save_high_score(record: &HighScore) -> io::Result<()> {
    let Some(path) = candidate_paths(SCORE_FILE).into_iter().next() else {
        return Err(io::Error::new(io::ErrorKind::NotFound, "no writable data location"));
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, record.serialize())
}
