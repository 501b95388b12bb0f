use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::Level;

use crate::core::dictionary::{DictionarySource, JsonFileSource};
use crate::core::game::{GameConfig, DEFAULT_MASK_GLYPH};

#[derive(Parser, Debug)]
#[command(name = "wordreveal")]
#[command(about = "Guess the word before its letters are all revealed")]
#[command(version)]
pub struct Cli {
    /// Dictionary JSON file (word -> definition object, or a word list).
    /// Repeat to merge several; earlier files win. Defaults to the built-in list.
    #[arg(short, long, value_name = "PATH")]
    pub dictionary: Vec<PathBuf>,

    /// Milliseconds between automatic letter reveals
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    pub reveal_interval_ms: u64,

    /// Milliseconds a success/error flash stays visible
    #[arg(long, default_value_t = 500)]
    pub cue_ms: u64,

    /// Glyph shown in place of hidden letters
    #[arg(long, default_value_t = DEFAULT_MASK_GLYPH)]
    pub mask: char,

    /// Seed for word and letter selection (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (the terminal belongs to the game)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the word pool and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            reveal_interval: Duration::from_millis(self.reveal_interval_ms),
            cue_duration: Duration::from_millis(self.cue_ms),
            mask_glyph: self.mask,
        }
    }

    pub fn dictionary_sources(&self) -> Vec<Box<dyn DictionarySource>> {
        self.dictionary
            .iter()
            .map(|p| Box::new(JsonFileSource::new(p)) as Box<dyn DictionarySource>)
            .collect()
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Install the file logger when `--log-file` is set; otherwise logging stays off.
    pub fn init_tracing(&self) -> Result<()> {
        let Some(path) = &self.log_file else {
            return Ok(());
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(self.log_level())
            .try_init()
            .map_err(|e| anyhow!("failed to install logger: {e}"))
    }
}
