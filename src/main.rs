// Entry point for the trivia board TUI application
// Loads the question catalog and high-score record, then launches the main UI

use std::error::Error;

use xttriv::Catalog;
use xttriv::xtv_files;
use xttriv::xtv_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go to stderr and only when explicitly requested,
    // so they never bleed into the alternate-screen UI
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    // A catalog that cannot back the full board is a startup failure
    let catalog = Catalog::parse(&xtv_files::questions_text())?;

    // A missing or corrupt high score falls back to the default record
    let mut high = xtv_files::load_high_score();

    // Launch the main UI loop
    run_ui(&catalog, &mut high)
}
