use encoding_rs::{Encoding, UTF_8};
use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub mod config;
pub mod error;
pub mod import;
pub mod menu;

pub use config::Config;
pub use error::{Error, Result};
pub use import::{import, ImportSummary};

/// Substituted for words that have no entry in the store.
pub const NO_TRANSLATION: &str = "தொகுப்பு இல்லை";

pub const COMMENT_MARKER: char = '#';

pub type Mapping = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub source: String,
    pub target: String,
}

impl Entry {
    pub fn new(source: &str, target: &str) -> Self {
        Entry {
            source: normalize_source(source),
            target: target.trim().to_string(),
        }
    }

    /// Rejects entries whose line would not parse back to the same pair.
    fn check_format(&self) -> Result<()> {
        if self.source.contains(',') {
            return Err(Error::invalid_entry(&self.source, "the English word cannot contain a comma"));
        }
        if self.source.starts_with(COMMENT_MARKER) {
            return Err(Error::invalid_entry(&self.source, "the English word cannot start with '#'"));
        }
        if self.source.contains('\n') || self.target.contains('\n') {
            return Err(Error::invalid_entry(&self.source, "entries must fit on one line"));
        }
        Ok(())
    }

    pub fn to_line(&self) -> String {
        format!("{},{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Entry(Entry),
    /// Blank line or comment
    Ignored,
    Malformed,
}

pub fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) {
        return Line::Ignored;
    }

    match line.split_once(',') {
        Some((source, target)) => Line::Entry(Entry::new(source, target)),
        None => Line::Malformed,
    }
}

pub fn normalize_source(word: &str) -> String {
    word.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_no: usize,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Loaded {
    pub entries: Mapping,
    pub skipped: Vec<SkippedLine>,
}

pub fn decode(bytes: &[u8], encoding: &'static Encoding, origin: &Path) -> String {
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!("Encoding errors in {}", origin.display());
    }
    decoded.into_owned()
}

pub fn parse_mapping(text: &str) -> Loaded {
    let mut loaded = Loaded::default();

    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Line::Entry(entry) => {
                loaded.entries.insert(entry.source, entry.target);
            }
            Line::Malformed => {
                warn!("Skipping invalid line: {}", line.trim());
                loaded.skipped.push(SkippedLine {
                    line_no: idx + 1,
                    text: line.trim().to_string(),
                });
            }
            Line::Ignored => {}
        }
    }

    loaded
}

/// Reads a store file. A missing file is created empty and loads as an empty mapping.
pub fn load(path: &Path) -> Result<Loaded> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            File::create(path)?;
            info!("Created empty translation file {}", path.display());
            return Ok(Loaded::default());
        }
        Err(e) => return Err(e.into()),
    };

    let loaded = parse_mapping(&decode(&bytes, UTF_8, path));
    info!(
        "Loaded {} translations from {} ({} skipped)",
        loaded.entries.len(),
        path.display(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

fn ends_without_newline(path: &Path) -> Result<bool> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Appends one normalized line. Does not check for an existing entry.
pub fn append(path: &Path, source: &str, target: &str) -> Result<()> {
    let entry = Entry::new(source, target);
    entry.check_format()?;

    // A hand-edited file may lack the final newline
    let needs_separator = ends_without_newline(path)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_separator {
        writeln!(file)?;
    }
    writeln!(file, "{}", entry.to_line())?;
    Ok(())
}

fn punctuation() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| Regex::new(r"[[:punct:]]").expect("punctuation pattern is valid"))
}

/// Splits `text` into words with punctuation removed, paired with their lookup result.
pub fn translate_words<'a>(text: &str, entries: &'a Mapping) -> Vec<(String, Option<&'a str>)> {
    let stripped = punctuation().replace_all(text, "");
    stripped
        .split_whitespace()
        .map(|word| {
            let target = entries.get(&word.to_lowercase()).map(String::as_str);
            (word.to_string(), target)
        })
        .collect()
}

pub fn translate(text: &str, entries: &Mapping) -> String {
    translate_with(text, entries, NO_TRANSLATION)
}

pub fn translate_with(text: &str, entries: &Mapping, placeholder: &str) -> String {
    translate_words(text, entries)
        .into_iter()
        .map(|(word, target)| {
            let target = target.unwrap_or(placeholder);
            debug!("Translating '{}' -> '{}'", word, target);
            target
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// In-memory mapping plus the file it is loaded from. Additions are written through.
#[derive(Debug)]
pub struct TranslationStore {
    path: PathBuf,
    entries: Mapping,
    skipped: Vec<SkippedLine>,
    placeholder: String,
}

impl TranslationStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loaded = load(&path)?;
        Ok(TranslationStore {
            path,
            entries: loaded.entries,
            skipped: loaded.skipped,
            placeholder: NO_TRANSLATION.to_string(),
        })
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn reload(&mut self) -> Result<()> {
        let loaded = load(&self.path)?;
        self.entries = loaded.entries;
        self.skipped = loaded.skipped;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &Mapping {
        &self.entries
    }

    /// Malformed lines seen by the last load.
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries.get(&normalize_source(word)).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&normalize_source(word))
    }

    pub fn translate(&self, text: &str) -> String {
        translate_with(text, &self.entries, &self.placeholder)
    }

    pub fn add(&mut self, source: &str, target: &str) -> Result<AddOutcome> {
        let entry = Entry::new(source, target);
        if entry.source.is_empty() {
            return Err(Error::invalid_entry(&entry.source, "the English word is empty"));
        }
        if entry.target.is_empty() {
            return Err(Error::invalid_entry(&entry.source, "the Tamil equivalent is empty"));
        }
        entry.check_format()?;

        if self.entries.contains_key(&entry.source) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        append(&self.path, &entry.source, &entry.target)?;
        info!("Added translation '{}' -> '{}'", entry.source, entry.target);
        self.entries.insert(entry.source, entry.target);
        Ok(AddOutcome::Added)
    }
}
