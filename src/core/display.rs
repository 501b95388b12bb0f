/// Rendering sink the game writes into, plus the in-memory board the UI draws from
use tracing::trace;

/// One character cell of the word row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The literal letter is visible
    Letter(char),
    /// Still hidden; carries the glyph drawn in its place
    Mask(char),
}

impl Slot {
    pub fn glyph(self) -> char {
        match self {
            Slot::Letter(c) | Slot::Mask(c) => c,
        }
    }

    pub fn is_masked(self) -> bool {
        matches!(self, Slot::Mask(_))
    }
}

/// Screen element a transient cue is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueTarget {
    Title,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    Success,
    Error,
}

/// Write-only surface driven by the game. Nothing here feeds back into game state.
pub trait DisplaySink {
    /// Append the next cell of the word row
    fn push_slot(&mut self, slot: Slot);

    /// Replace the cell at `index` with its literal letter
    fn reveal(&mut self, index: usize, letter: char);

    /// Remove the word row and the definition
    fn clear_word(&mut self);

    fn set_definition(&mut self, text: &str);

    fn set_cue(&mut self, target: CueTarget, kind: CueKind, on: bool);

    fn set_score(&mut self, score: u32);
}

/// In-memory display surface.
///
/// The terminal renderer reads it each frame; tests inspect it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    slots: Vec<Slot>,
    definition: String,
    cues: Vec<(CueTarget, CueKind)>,
    score: u32,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The word row as a plain string, e.g. `"c_t"`
    pub fn glyphs(&self) -> String {
        self.slots.iter().map(|s| s.glyph()).collect()
    }

    pub fn masked_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_masked()).count()
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn has_cue(&self, target: CueTarget, kind: CueKind) -> bool {
        self.cues.contains(&(target, kind))
    }

    /// First active cue on `target`, if any
    pub fn cue(&self, target: CueTarget) -> Option<CueKind> {
        self.cues.iter().find(|(t, _)| *t == target).map(|(_, k)| *k)
    }
}

impl DisplaySink for Board {
    fn push_slot(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    fn reveal(&mut self, index: usize, letter: char) {
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Slot::Letter(letter),
            None => trace!(index, "reveal outside the word row ignored"),
        }
    }

    fn clear_word(&mut self) {
        self.slots.clear();
        self.definition.clear();
    }

    fn set_definition(&mut self, text: &str) {
        self.definition.clear();
        self.definition.push_str(text);
    }

    fn set_cue(&mut self, target: CueTarget, kind: CueKind, on: bool) {
        let present = self.has_cue(target, kind);
        if on && !present {
            self.cues.push((target, kind));
        } else if !on {
            self.cues.retain(|c| *c != (target, kind));
        }
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
