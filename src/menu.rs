//! Numbered menu driving a [`TranslationStore`] from a line-oriented input.

use crate::error::{Error, Result};
use crate::{normalize_source, AddOutcome, TranslationStore};
use log::error;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Translate,
    Add,
    Exit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Choice::Translate),
            "2" => Some(Choice::Add),
            "3" => Some(Choice::Exit),
            _ => None,
        }
    }
}

pub struct Session<'a, R, W> {
    store: &'a mut TranslationStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(store: &'a mut TranslationStore, input: R, output: W) -> Self {
        Session { store, input, output }
    }

    /// Writes `text` and reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn run(&mut self) -> Result<()> {
        if self.store.is_empty() {
            writeln!(
                self.output,
                "No translations found. Please add the appropriate translation by pressing option 2"
            )?;
        }
        writeln!(
            self.output,
            "Welcome to my English-to-Tamil translator! What task would you like to complete today?"
        )?;

        loop {
            writeln!(self.output, "\nHere are your options:")?;
            writeln!(self.output, "1. Do you want me to translate a sentence for you?")?;
            writeln!(self.output, "2. Do you want to add a new translation?")?;
            writeln!(self.output, "3. Do you want to exit?")?;

            let choice = match self.prompt("What is your choice (1/2/3?): ")? {
                Some(input) => Choice::parse(&input),
                None => Some(Choice::Exit),
            };

            match choice {
                Some(Choice::Translate) => {
                    if !self.translate_sentence()? {
                        break;
                    }
                }
                Some(Choice::Add) => {
                    if !self.add_translation()? {
                        break;
                    }
                }
                Some(Choice::Exit) => {
                    writeln!(self.output, "Thank you for your time! Goodbye!")?;
                    break;
                }
                None => {
                    writeln!(
                        self.output,
                        "That is not a valid input. Please select either 1, 2, or 3. Thank you!"
                    )?;
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Returns `false` when input ran out.
    fn translate_sentence(&mut self) -> Result<bool> {
        let sentence = match self.prompt("Enter a word or sentence in English: ")? {
            Some(sentence) => sentence,
            None => return Ok(false),
        };

        let translated = self.store.translate(&sentence);
        writeln!(self.output, "Translated sentence is:\n{}", translated)?;
        Ok(true)
    }

    /// Returns `false` when input ran out.
    fn add_translation(&mut self) -> Result<bool> {
        let english = match self.prompt("Enter a word in English: ")? {
            Some(word) => normalize_source(&word),
            None => return Ok(false),
        };
        let tamil = match self.prompt(&format!("Enter the Tamil equivalent for '{}': ", english))? {
            Some(word) => word,
            None => return Ok(false),
        };

        match self.store.add(&english, &tamil) {
            Ok(AddOutcome::Added) => {
                writeln!(self.output, "Translation has been added! Thank you!")?;
            }
            Ok(AddOutcome::AlreadyPresent) => {
                writeln!(self.output, "This word has already been accounted for. Thank you ")?;
            }
            Err(Error::InvalidEntry { reason, .. }) => {
                writeln!(self.output, "That translation could not be added: {}.", reason)?;
            }
            Err(e) => {
                error!("Failed to save translation for '{}': {}", english, e);
                writeln!(self.output, "Could not save the translation: {}", e)?;
            }
        }
        Ok(true)
    }
}

pub fn run<R: BufRead, W: Write>(store: &mut TranslationStore, input: R, output: W) -> Result<()> {
    Session::new(store, input, output).run()
}
