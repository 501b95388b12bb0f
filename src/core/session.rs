/// One player's sitting: the game plus the surfaces it talks to
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::Rng;

use crate::core::clock::Clock;
use crate::core::dictionary::{Dictionary, DictionaryError};
use crate::core::display::Board;
use crate::core::game::{GameConfig, GuessOutcome, Phase, RevealGame};
use crate::core::input::InputLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub board: &'a Board,
    pub input: &'a InputLine,
    pub phase: Phase,
    pub round: u32,
    pub last_word: Option<&'a str>,
    pub next_reveal_in: Option<Duration>,
}

pub struct Session<C, R> {
    game: RevealGame<R>,
    board: Board,
    input: InputLine,
    clock: C,
    last_outcome: Option<GuessOutcome>,
}

impl<C: Clock, R: Rng> Session<C, R> {
    /// Build the game and start its first round right away.
    pub fn new(dictionary: Dictionary, config: GameConfig, rng: R, clock: C) -> Result<Self, DictionaryError> {
        let mut game = RevealGame::new(dictionary, config, rng)?;
        let mut board = Board::new();
        game.start_round(clock.now(), &mut board);

        Ok(Self {
            game,
            board,
            input: InputLine::new(),
            clock,
            last_outcome: None,
        })
    }

    /// Feed one key press through the input line; Enter commits a guess.
    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Control::Quit,
            KeyCode::Enter => {
                let guess = self.input.commit();
                self.submit(&guess);
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.input.push(c)
            }
            _ => {}
        }
        Control::Continue
    }

    /// Submit `guess` as if it had been typed and committed
    pub fn submit(&mut self, guess: &str) -> GuessOutcome {
        let outcome = self.game.submit_guess(guess, self.clock.now(), &mut self.board);
        self.last_outcome = Some(outcome);
        outcome
    }

    /// Run due reveal ticks and cue expiries
    pub fn pump(&mut self) {
        self.game.poll(self.clock.now(), &mut self.board);
    }

    pub fn view(&self) -> View<'_> {
        View {
            board: &self.board,
            input: &self.input,
            phase: self.game.phase(),
            round: self.game.rounds_started(),
            last_word: self.game.last_round().map(|r| r.word.as_str()),
            next_reveal_in: self
                .game
                .next_reveal_at()
                .map(|at| at.saturating_sub(self.clock.now())),
        }
    }
}

impl<C, R> Session<C, R> {
    pub fn game(&self) -> &RevealGame<R> {
        &self.game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn last_outcome(&self) -> Option<GuessOutcome> {
        self.last_outcome
    }
}
