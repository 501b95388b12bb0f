use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wordreveal::cli::Cli;
use wordreveal::core::clock::SystemClock;
use wordreveal::core::dictionary;
use wordreveal::core::engine::Engine;
use wordreveal::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing()?;

    // 1. Load the dictionary before touching the terminal so errors stay readable
    let dictionary = dictionary::load_all(&cli.dictionary_sources()).context("could not load dictionary")?;
    info!(words = dictionary.len(), "dictionary loaded");

    if cli.list {
        for word in dictionary.words() {
            println!("{word}: {}", dictionary.definition(word).unwrap_or(""));
        }
        println!("{} words", dictionary.len());
        return Ok(());
    }

    // 2. First round starts here
    let session = Session::new(dictionary, cli.game_config(), cli.rng(), SystemClock::new())?;

    // 3. Hand the terminal to the engine, and always give it back
    let terminal = ratatui::init();
    let result = Engine::new(session).run(terminal).await;
    ratatui::restore();

    let score = result?;
    println!("Final score: {score}");
    Ok(())
}
