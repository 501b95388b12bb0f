/// Reveal-and-guess state machine
///
/// The game owns all round state and is driven from outside: the caller
/// passes the current time and a display sink into every operation, so it
/// runs the same under the terminal engine and in headless tests.
use std::collections::BTreeSet;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, trace};

use crate::core::dictionary::{Dictionary, DictionaryError};
use crate::core::display::{CueKind, CueTarget, DisplaySink, Slot};

pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_CUE_DURATION: Duration = Duration::from_millis(500);
pub const DEFAULT_MASK_GLYPH: char = '_';

/// Tunables for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Time between automatic letter reveals
    pub reveal_interval: Duration,
    /// How long success/error cues stay lit
    pub cue_duration: Duration,
    /// Glyph drawn in place of hidden letters
    pub mask_glyph: char,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            cue_duration: DEFAULT_CUE_DURATION,
            mask_glyph: DEFAULT_MASK_GLYPH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round has been started yet
    Idle,
    /// Reveal timer running, pending positions shrinking
    Revealing,
    /// Timer stopped with one blank left; only a correct guess moves on
    AwaitingFinalGuess,
}

/// Identity of one started reveal timer. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct RevealTimer {
    handle: TimerHandle,
    next_due: Duration,
}

#[derive(Debug, Clone, Copy)]
struct ActiveCue {
    target: CueTarget,
    kind: CueKind,
    until: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { score: u32 },
    Incorrect,
}

/// What happened in the most recently finished round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub word: String,
    pub revealed_by_timer: usize,
}

pub struct RevealGame<R> {
    dictionary: Dictionary,
    pool: Vec<String>,
    config: GameConfig,
    rng: R,

    current_word: String,
    letters: Vec<char>,
    pending: BTreeSet<usize>,
    revealed_by_timer: usize,
    score: u32,

    timer: Option<RevealTimer>,
    next_timer_id: u64,
    cues: Vec<ActiveCue>,

    rounds_started: u32,
    last_round: Option<RoundSummary>,
}

impl<R: Rng> RevealGame<R> {
    /// Create a game over the dictionary's words. No round is started yet.
    pub fn new(dictionary: Dictionary, config: GameConfig, rng: R) -> Result<Self, DictionaryError> {
        let pool: Vec<String> = dictionary.words().map(str::to_owned).collect();
        if pool.is_empty() {
            return Err(DictionaryError::EmptyPool);
        }
        info!(words = pool.len(), "word pool ready");

        Ok(Self {
            dictionary,
            pool,
            config,
            rng,
            current_word: String::new(),
            letters: Vec::new(),
            pending: BTreeSet::new(),
            revealed_by_timer: 0,
            score: 0,
            timer: None,
            next_timer_id: 0,
            cues: Vec::new(),
            rounds_started: 0,
            last_round: None,
        })
    }

    /// Pick a fresh word, draw it masked, and start its reveal timer.
    pub fn start_round(&mut self, now: Duration, sink: &mut impl DisplaySink) {
        // the old round's timer must be gone before the word changes
        self.cancel_timer();

        let word = self.pool[self.rng.random_range(0..self.pool.len())].clone();
        let letters: Vec<char> = word.chars().collect();
        let last = letters.len().saturating_sub(1);

        sink.clear_word();
        self.pending.clear();
        for (i, &letter) in letters.iter().enumerate() {
            if i == 0 || i == last {
                sink.push_slot(Slot::Letter(letter));
            } else {
                sink.push_slot(Slot::Mask(self.config.mask_glyph));
                self.pending.insert(i);
            }
        }
        sink.set_definition(self.dictionary.definition(&word).unwrap_or(""));

        self.current_word = word;
        self.letters = letters;
        self.revealed_by_timer = 0;
        self.rounds_started += 1;

        self.start_timer(now);
        debug!(
            round = self.rounds_started,
            len = self.letters.len(),
            pending = self.pending.len(),
            "round started"
        );
        trace!(word = %self.current_word, "round word");
    }

    /// Reveal-timer callback: uncover one random pending letter, or stop the
    /// timer once fewer than two remain.
    pub fn on_tick(&mut self, sink: &mut impl DisplaySink) {
        if self.pending.len() < 2 {
            self.cancel_timer();
            return;
        }

        let nth = self.rng.random_range(0..self.pending.len());
        let Some(index) = self.pending.iter().nth(nth).copied() else {
            return;
        };
        self.pending.remove(&index);
        self.revealed_by_timer += 1;
        sink.reveal(index, self.letters[index]);
        trace!(index, remaining = self.pending.len(), "letter revealed");
    }

    /// Compare a committed guess against the active word, exactly.
    pub fn submit_guess(&mut self, text: &str, now: Duration, sink: &mut impl DisplaySink) -> GuessOutcome {
        if self.rounds_started > 0 && text == self.current_word {
            let score = self.on_correct(now, sink);
            GuessOutcome::Correct { score }
        } else {
            self.on_incorrect(now, sink);
            GuessOutcome::Incorrect
        }
    }

    /// Score the round and move straight on to the next one. Returns the new score.
    pub fn on_correct(&mut self, now: Duration, sink: &mut impl DisplaySink) -> u32 {
        self.cancel_timer();
        self.raise_cue(CueTarget::Input, CueKind::Success, now, sink);

        self.score += 1;
        sink.set_score(self.score);
        info!(score = self.score, word_len = self.letters.len(), "correct guess");

        self.last_round = Some(RoundSummary {
            word: std::mem::take(&mut self.current_word),
            revealed_by_timer: self.revealed_by_timer,
        });

        sink.clear_word();
        self.start_round(now, sink);
        self.score
    }

    /// Flash the error cue; the round carries on untouched.
    pub fn on_incorrect(&mut self, now: Duration, sink: &mut impl DisplaySink) {
        debug!("wrong guess");
        self.raise_cue(CueTarget::Input, CueKind::Error, now, sink);
        self.raise_cue(CueTarget::Title, CueKind::Error, now, sink);
    }

    /// Run every timer and cue deadline that has passed by `now`.
    ///
    /// Late callers catch up: each missed reveal tick fires in order.
    pub fn poll(&mut self, now: Duration, sink: &mut impl DisplaySink) {
        while let Some(timer) = self.timer {
            if timer.next_due > now {
                break;
            }
            // reschedule first so a self-cancel inside the tick sticks
            self.timer = Some(RevealTimer {
                next_due: timer.next_due + self.config.reveal_interval,
                ..timer
            });
            self.on_tick(sink);
        }

        self.cues.retain(|cue| {
            if cue.until <= now {
                sink.set_cue(cue.target, cue.kind, false);
                false
            } else {
                true
            }
        });
    }

    fn start_timer(&mut self, now: Duration) {
        debug_assert!(self.timer.is_none(), "reveal timer started twice");
        let handle = TimerHandle(self.next_timer_id);
        self.next_timer_id += 1;
        self.timer = Some(RevealTimer {
            handle,
            next_due: now + self.config.reveal_interval,
        });
        trace!(?handle, "reveal timer started");
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            trace!(handle = ?timer.handle, "reveal timer cancelled");
        }
    }

    fn raise_cue(&mut self, target: CueTarget, kind: CueKind, now: Duration, sink: &mut impl DisplaySink) {
        let until = now + self.config.cue_duration;
        // one cue per target: the newest replaces whatever was lit there
        self.cues.retain(|cue| {
            if cue.target == target && cue.kind != kind {
                sink.set_cue(cue.target, cue.kind, false);
                false
            } else {
                true
            }
        });
        match self.cues.iter_mut().find(|c| c.target == target) {
            Some(cue) => cue.until = until,
            None => self.cues.push(ActiveCue { target, kind, until }),
        }
        sink.set_cue(target, kind, true);
    }
}

impl<R> RevealGame<R> {
    pub fn phase(&self) -> Phase {
        if self.rounds_started == 0 {
            Phase::Idle
        } else if self.timer.is_some() {
            Phase::Revealing
        } else {
            Phase::AwaitingFinalGuess
        }
    }

    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    pub fn current_definition(&self) -> Option<&str> {
        self.dictionary.definition(&self.current_word)
    }

    /// Interior indices (in characters) still masked
    pub fn pending_positions(&self) -> &BTreeSet<usize> {
        &self.pending
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn active_timer(&self) -> Option<TimerHandle> {
        self.timer.map(|t| t.handle)
    }

    /// When the next automatic reveal is due, if the timer is running
    pub fn next_reveal_at(&self) -> Option<Duration> {
        self.timer.map(|t| t.next_due)
    }

    pub fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::Board;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SECOND: Duration = Duration::from_secs(1);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn game_with(words: &[(&str, Option<&str>)]) -> RevealGame<StdRng> {
        let dict = Dictionary::from_entries(words.iter().copied());
        RevealGame::new(dict, GameConfig::default(), StdRng::seed_from_u64(7)).unwrap()
    }

    fn started(words: &[(&str, Option<&str>)]) -> (RevealGame<StdRng>, Board) {
        let mut game = game_with(words);
        let mut board = Board::new();
        game.start_round(Duration::ZERO, &mut board);
        (game, board)
    }

    #[test]
    fn empty_pool_is_rejected() {
        let result = RevealGame::new(Dictionary::default(), GameConfig::default(), StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(DictionaryError::EmptyPool)));
    }

    #[test]
    fn idle_until_first_round() {
        let game = game_with(&[("cat", None)]);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.active_timer(), None);
        assert_eq!(game.pool_size(), 1);
        assert_eq!(game.config(), &GameConfig::default());
    }

    #[test]
    fn round_masks_interior_letters() {
        let (game, board) = started(&[("lantern", Some("a lamp"))]);

        assert_eq!(board.glyphs(), "l_____n");
        assert_eq!(board.definition(), "a lamp");
        assert_eq!(game.current_definition(), Some("a lamp"));
        assert_eq!(game.pending_positions().iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(game.phase(), Phase::Revealing);
        assert_eq!(game.next_reveal_at(), Some(ms(5000)));
    }

    #[test]
    fn masks_by_character_not_byte() {
        let (game, board) = started(&[("perché", None)]);
        assert_eq!(board.glyphs(), "p____é");
        assert_eq!(game.pending_positions().len(), 4);
        assert_eq!(board.definition(), "");
    }

    #[test]
    fn short_words_have_nothing_to_reveal() {
        for word in ["a", "io"] {
            let (mut game, mut board) = started(&[(word, None)]);
            assert_eq!(board.glyphs(), word);
            assert!(game.pending_positions().is_empty());

            game.poll(ms(5000), &mut board);
            assert_eq!(game.phase(), Phase::AwaitingFinalGuess);
        }
    }

    #[test]
    fn tick_reveals_exactly_one_letter() {
        let (mut game, mut board) = started(&[("lantern", None)]);

        game.poll(ms(4999), &mut board);
        assert_eq!(game.pending_positions().len(), 5);

        let before = game.pending_positions().clone();
        game.poll(ms(5000), &mut board);
        let after = game.pending_positions().clone();

        assert_eq!(after.len(), 4);
        assert!(after.is_subset(&before));
        let revealed = *before.difference(&after).next().unwrap();
        assert_eq!(board.slots()[revealed], Slot::Letter("lantern".chars().nth(revealed).unwrap()));
        assert_eq!(board.masked_count(), 4);
        assert_eq!(game.next_reveal_at(), Some(ms(10_000)));
    }

    #[test]
    fn timer_stops_with_one_blank_left() {
        let (mut game, mut board) = started(&[("lantern", None)]);

        for n in 1..=10 {
            game.poll(ms(5000) * n, &mut board);
        }

        assert_eq!(game.pending_positions().len(), 1);
        assert_eq!(board.masked_count(), 1);
        assert_eq!(game.phase(), Phase::AwaitingFinalGuess);
        assert_eq!(game.active_timer(), None);
    }

    #[test]
    fn late_poll_catches_up_missed_ticks() {
        let (mut game, mut board) = started(&[("lantern", None)]);
        game.poll(ms(12_000), &mut board);
        assert_eq!(game.pending_positions().len(), 3);
        assert_eq!(game.next_reveal_at(), Some(ms(15_000)));
    }

    #[test]
    fn correct_guess_scores_and_restarts() {
        let (mut game, mut board) = started(&[("cat", Some("a small domesticated feline"))]);
        let first_timer = game.active_timer().unwrap();

        let outcome = game.submit_guess("cat", SECOND, &mut board);

        assert_eq!(outcome, GuessOutcome::Correct { score: 1 });
        assert_eq!(game.score(), 1);
        assert_eq!(board.score(), 1);
        assert_eq!(game.rounds_started(), 2);
        assert_ne!(game.active_timer(), Some(first_timer));
        assert_eq!(game.next_reveal_at(), Some(SECOND + ms(5000)));
        assert_eq!(board.glyphs(), "c_t");
        assert_eq!(game.last_round().unwrap().word, "cat");
        assert!(board.has_cue(CueTarget::Input, CueKind::Success));
    }

    #[test]
    fn wrong_guess_changes_nothing_but_cues() {
        let (mut game, mut board) = started(&[("lantern", None)]);
        game.poll(ms(5000), &mut board);
        let pending = game.pending_positions().clone();
        let glyphs = board.glyphs();
        let timer = game.active_timer();

        let outcome = game.submit_guess("lamp", ms(6000), &mut board);

        assert_eq!(outcome, GuessOutcome::Incorrect);
        assert_eq!(game.score(), 0);
        assert_eq!(game.pending_positions(), &pending);
        assert_eq!(board.glyphs(), glyphs);
        assert_eq!(game.active_timer(), timer);
        assert!(board.has_cue(CueTarget::Input, CueKind::Error));
        assert!(board.has_cue(CueTarget::Title, CueKind::Error));
    }

    #[test]
    fn comparison_is_exact() {
        let (mut game, mut board) = started(&[("word", None)]);
        for guess in ["Word", "WORD", " word", "word ", "wor", ""] {
            assert_eq!(game.submit_guess(guess, SECOND, &mut board), GuessOutcome::Incorrect);
        }
        assert_eq!(game.submit_guess("word", SECOND, &mut board), GuessOutcome::Correct { score: 1 });
    }

    #[test]
    fn guess_before_first_round_is_wrong() {
        let mut game = game_with(&[("cat", None)]);
        let mut board = Board::new();
        assert_eq!(game.submit_guess("", SECOND, &mut board), GuessOutcome::Incorrect);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn cues_expire_after_their_duration() {
        let (mut game, mut board) = started(&[("lantern", None)]);
        game.submit_guess("nope", SECOND, &mut board);

        game.poll(SECOND + ms(499), &mut board);
        assert!(board.has_cue(CueTarget::Title, CueKind::Error));

        game.poll(SECOND + ms(500), &mut board);
        assert_eq!(board.cue(CueTarget::Title), None);
        assert_eq!(board.cue(CueTarget::Input), None);
    }

    #[test]
    fn repeated_wrong_guess_extends_cue() {
        let (mut game, mut board) = started(&[("lantern", None)]);
        game.submit_guess("a", ms(1000), &mut board);
        game.submit_guess("b", ms(1300), &mut board);

        game.poll(ms(1600), &mut board);
        assert!(board.has_cue(CueTarget::Input, CueKind::Error));
        game.poll(ms(1800), &mut board);
        assert!(!board.has_cue(CueTarget::Input, CueKind::Error));
    }

    #[test]
    fn correct_guess_replaces_error_cue_on_input() {
        let (mut game, mut board) = started(&[("owl", None)]);
        game.submit_guess("OWL", ms(1000), &mut board);
        game.submit_guess("owl", ms(1100), &mut board);

        assert_eq!(board.cue(CueTarget::Input), Some(CueKind::Success));
        assert!(!board.has_cue(CueTarget::Input, CueKind::Error));
        // the title keeps its own error flash until it runs out
        assert_eq!(board.cue(CueTarget::Title), Some(CueKind::Error));

        game.poll(ms(1500), &mut board);
        assert_eq!(board.cue(CueTarget::Title), None);
        assert_eq!(board.cue(CueTarget::Input), Some(CueKind::Success));
        game.poll(ms(1600), &mut board);
        assert_eq!(board.cue(CueTarget::Input), None);
    }

    #[test]
    fn wrong_guess_replaces_success_cue_on_input() {
        let (mut game, mut board) = started(&[("owl", None)]);
        game.submit_guess("owl", ms(1000), &mut board);
        game.submit_guess("owls", ms(1200), &mut board);

        assert_eq!(board.cue(CueTarget::Input), Some(CueKind::Error));
        assert!(!board.has_cue(CueTarget::Input, CueKind::Success));
    }

    #[test]
    fn timer_handles_are_never_reused() {
        let (mut game, mut board) = started(&[("cat", None)]);
        let mut seen = vec![game.active_timer().unwrap()];
        for round in 1..=5u64 {
            game.submit_guess("cat", SECOND * round as u32, &mut board);
            let handle = game.active_timer().unwrap();
            assert!(!seen.contains(&handle));
            seen.push(handle);
        }
    }

    #[test]
    fn word_choice_covers_the_pool() {
        let (mut game, mut board) = started(&[("cat", None), ("dog", None)]);
        let mut words = BTreeSet::new();
        for _ in 0..64 {
            words.insert(game.current_word().to_string());
            let word = game.current_word().to_string();
            game.submit_guess(&word, SECOND, &mut board);
        }
        assert_eq!(words.len(), 2);
        assert_eq!(game.score(), 64);
    }

    #[test]
    fn custom_mask_and_interval() {
        let dict = Dictionary::from_entries([("anchor", None::<&str>)]);
        let config = GameConfig {
            reveal_interval: ms(100),
            cue_duration: ms(50),
            mask_glyph: '•',
        };
        let mut game = RevealGame::new(dict, config, StdRng::seed_from_u64(3)).unwrap();
        let mut board = Board::new();
        game.start_round(Duration::ZERO, &mut board);

        assert_eq!(board.glyphs(), "a••••r");
        game.poll(ms(100), &mut board);
        assert_eq!(board.masked_count(), 3);
    }
}
