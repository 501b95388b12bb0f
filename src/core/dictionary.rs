/// Word -> definition store and the sources it can be loaded from
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Built-in word list, used when no dictionary file is given
const EMBEDDED_WORDS: &str = include_str!("../../assets/words.json");

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dictionary {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("dictionary contains no words")]
    EmptyPool,
}

/// On-disk layouts: a word -> definition object, or a bare word list.
///
/// Values are read loosely; anything that is not a string becomes a missing
/// definition (or a skipped list entry) instead of failing the whole file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DictionaryFile {
    Definitions(BTreeMap<String, Value>),
    Words(Vec<Value>),
}

/// Immutable mapping from word to (optional) definition.
///
/// Keys are never empty. A definition of `None` means the word is playable
/// but has no clue text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: BTreeMap<String, Option<String>>,
}

impl Dictionary {
    /// Build from raw pairs, normalising keys and definitions.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut dict = Self::default();
        let mut skipped = 0usize;
        let mut duplicates = 0usize;

        for (word, definition) in entries {
            let word = word.as_ref().trim();
            if word.is_empty() {
                skipped += 1;
                continue;
            }
            let definition = definition
                .map(|d| collapse_whitespace(d.as_ref()))
                .filter(|d| !d.is_empty());

            // first entry wins; a later duplicate only fills a missing definition
            match dict.entries.get_mut(word) {
                Some(slot) => {
                    duplicates += 1;
                    if slot.is_none() {
                        *slot = definition;
                    }
                }
                None => {
                    dict.entries.insert(word.to_string(), definition);
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "dropped dictionary entries with empty words");
        }
        if duplicates > 0 {
            warn!(duplicates, "merged dictionary entries that collide after trimming");
        }
        dict
    }

    /// Parse a JSON document in either supported layout.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let dict = match serde_json::from_str::<DictionaryFile>(json)? {
            DictionaryFile::Definitions(map) => {
                let mut non_text = 0usize;
                let entries: Vec<(String, Option<String>)> = map
                    .into_iter()
                    .map(|(word, value)| match value {
                        Value::String(text) => (word, Some(text)),
                        _ => {
                            non_text += 1;
                            (word, None)
                        }
                    })
                    .collect();
                if non_text > 0 {
                    warn!(non_text, "definitions that are not strings treated as missing");
                }
                Self::from_entries(entries)
            }
            DictionaryFile::Words(words) => {
                let total = words.len();
                let words: Vec<String> = words
                    .into_iter()
                    .filter_map(|w| match w {
                        Value::String(word) => Some(word),
                        _ => None,
                    })
                    .collect();
                if words.len() < total {
                    warn!(skipped = total - words.len(), "non-string entries in word list ignored");
                }
                Self::from_entries(words.into_iter().map(|w| (w, None::<String>)))
            }
        };
        Ok(dict)
    }

    pub fn definition(&self, word: &str) -> Option<&str> {
        self.entries.get(word).and_then(|d| d.as_deref())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// All playable words, in sorted order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fill in words that are missing here, or present without a definition,
    /// from `other`. Definitions already present are never overwritten.
    pub fn merge(&mut self, other: Dictionary) {
        for (word, definition) in other.entries {
            let slot = self.entries.entry(word).or_insert(None);
            if slot.is_none() {
                *slot = definition;
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Anything that can produce a dictionary once at startup
pub trait DictionarySource {
    fn load(&self) -> Result<Dictionary, DictionaryError>;
}

/// Dictionary stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DictionarySource for JsonFileSource {
    fn load(&self) -> Result<Dictionary, DictionaryError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| DictionaryError::Io {
            path: self.path.clone(),
            source,
        })?;
        let dict = Dictionary::from_json_str(&text).map_err(|source| DictionaryError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), words = dict.len(), "loaded dictionary file");
        Ok(dict)
    }
}

/// The word list compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl DictionarySource for EmbeddedSource {
    fn load(&self) -> Result<Dictionary, DictionaryError> {
        Dictionary::from_json_str(EMBEDDED_WORDS).map_err(|source| DictionaryError::Parse {
            path: PathBuf::from("<embedded>"),
            source,
        })
    }
}

/// Load every source in order and merge them into one dictionary.
///
/// Falls back to the embedded list when `sources` is empty.
pub fn load_all(sources: &[Box<dyn DictionarySource>]) -> Result<Dictionary, DictionaryError> {
    let dict = if sources.is_empty() {
        EmbeddedSource.load()?
    } else {
        let mut merged = Dictionary::default();
        for source in sources {
            merged.merge(source.load()?);
        }
        merged
    };

    if dict.is_empty() {
        return Err(DictionaryError::EmptyPool);
    }
    Ok(dict)
}
