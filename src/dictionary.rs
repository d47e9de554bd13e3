//! Personal spell-check dictionary file handling.
//!
//! Flat-file format: first line `personal_ws-1.1 <lang> <count>`, then one
//! lowercase word per line. Words are de-duplicated case-insensitively and
//! kept sorted by the add-word path.

use crate::error::{CommisError, Result};
use std::fs;
use std::path::Path;

/// Default dictionary language tag.
pub const DEFAULT_LANG: &str = "en";

const HEADER_PREFIX: &str = "personal_ws-1.1";

/// An in-memory personal dictionary: sorted, lowercase, unique words.
#[derive(Debug, Clone)]
pub struct Dictionary {
    lang: String,
    words: Vec<String>,
}

impl Dictionary {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            words: Vec::new(),
        }
    }

    /// Load a dictionary file; a missing file yields an empty dictionary.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::new(DEFAULT_LANG));
            }
            Err(e) => {
                return Err(CommisError::Io {
                    context: format!("failed to read dictionary '{}'", path.display()),
                    source: e,
                });
            }
        };

        let mut lines = raw.lines();
        let mut lang = DEFAULT_LANG.to_string();

        let mut dictionary = match lines.next() {
            Some(header) if header.starts_with(HEADER_PREFIX) => {
                if let Some(tag) = header.split_whitespace().nth(1) {
                    lang = tag.to_string();
                }
                Self::new(&lang)
            }
            Some(first_word) => {
                // Headerless file: treat every line as a word.
                let mut dictionary = Self::new(&lang);
                dictionary.add(first_word);
                dictionary
            }
            None => Self::new(&lang),
        };

        for line in lines {
            if !line.trim().is_empty() {
                dictionary.add(line);
            }
        }
        Ok(dictionary)
    }

    /// Add a word (lowercased); returns false when it was already present.
    pub fn add(&mut self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return false;
        }
        match self.words.binary_search(&word) {
            Ok(_) => false,
            Err(pos) => {
                self.words.insert(pos, word);
                true
            }
        }
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, word: &str) -> bool {
        self.words.binary_search(&word.to_lowercase()).is_ok()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Write the dictionary back out, header first, words sorted.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut contents = format!("{} {} {}\n", HEADER_PREFIX, self.lang, self.words.len());
        for word in &self.words {
            contents.push_str(word);
            contents.push('\n');
        }
        fs::write(path, contents).map_err(|e| CommisError::Io {
            context: format!("failed to write dictionary '{}'", path.display()),
            source: e,
        })
    }
}
