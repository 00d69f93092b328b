use crate::error::{Error, Result};
use crate::{decode, parse_line, AddOutcome, Line, TranslationStore};
use encoding_rs::Encoding;
use glob::glob;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub files: Vec<PathBuf>,
    pub added: usize,
    /// Sources already in the store, including repeats within the imported files
    pub duplicates: usize,
    pub malformed: usize,
    pub rejected: usize,
}

/// Adds the entries of every file matching `pattern` to `store`.
///
/// Files are decoded with the `encoding_rs` label `encoding` and parsed with the
/// same line rules as the store itself. Existing entries are never replaced.
pub fn import(store: &mut TranslationStore, pattern: &str, encoding: &str) -> Result<ImportSummary> {
    let encoding = Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(encoding.to_string()))?;

    let store_file = fs::canonicalize(store.path()).ok();
    let mut summary = ImportSummary::default();

    for entry in glob(pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Error reading glob entry: {}", e);
                continue;
            }
        };
        if store_file.is_some() && fs::canonicalize(&path).ok() == store_file {
            continue;
        }

        info!("Processing {}...", path.display());
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };
        let text = decode(&bytes, encoding, &path);

        for line in text.lines() {
            match parse_line(line) {
                Line::Entry(entry) => match store.add(&entry.source, &entry.target) {
                    Ok(AddOutcome::Added) => summary.added += 1,
                    Ok(AddOutcome::AlreadyPresent) => summary.duplicates += 1,
                    Err(Error::InvalidEntry { source_word, reason }) => {
                        warn!("Rejected '{}' in {}: {}", source_word, path.display(), reason);
                        summary.rejected += 1;
                    }
                    Err(e) => return Err(e),
                },
                Line::Malformed => {
                    warn!("Skipping invalid line in {}: {}", path.display(), line.trim());
                    summary.malformed += 1;
                }
                Line::Ignored => {}
            }
        }

        summary.files.push(path);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn import_adds_new_entries_and_counts_the_rest() {
        let temp_dir = tempdir().unwrap();
        let lists = temp_dir.path().join("lists");
        fs::create_dir_all(&lists).unwrap();
        fs::write(lists.join("a.csv"), "# animals\ncat,பூனை\ndog,நாய்\nbroken\n").unwrap();
        fs::write(lists.join("b.csv"), "Dog,ஞமலி\nempty,\n").unwrap();
        fs::write(lists.join("ignored.txt"), "fish,மீன்\n").unwrap();

        let store_path = temp_dir.path().join("translations.txt");
        fs::write(&store_path, "cat,பூனை\n").unwrap();
        let mut store = TranslationStore::open(&store_path).unwrap();

        let pattern = format!("{}/*.csv", lists.display());
        let summary = import(&mut store, &pattern, "utf-8").unwrap();

        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(store.lookup("dog"), Some("நாய்"));
        assert!(!store.contains("fish"));

        let reopened = TranslationStore::open(&store_path).unwrap();
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn import_decodes_with_named_encoding() {
        let temp_dir = tempdir().unwrap();
        let list = temp_dir.path().join("latin1.csv");
        // "café" in windows-1252
        fs::write(&list, b"coffee,caf\xe9\n").unwrap();

        let mut store = TranslationStore::open(temp_dir.path().join("translations.txt")).unwrap();
        let pattern = list.display().to_string();
        let summary = import(&mut store, &pattern, "windows-1252").unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(store.lookup("coffee"), Some("café"));
    }

    #[test]
    fn import_rejects_unknown_encoding() {
        let temp_dir = tempdir().unwrap();
        let mut store = TranslationStore::open(temp_dir.path().join("translations.txt")).unwrap();

        let err = import(&mut store, "*.csv", "klingon").unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding(label) if label == "klingon"));
    }

    #[test]
    fn import_rejects_bad_pattern() {
        let temp_dir = tempdir().unwrap();
        let mut store = TranslationStore::open(temp_dir.path().join("translations.txt")).unwrap();

        let err = import(&mut store, "lists/[*.csv", "utf-8").unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn import_skips_the_store_file_itself() {
        let temp_dir = tempdir().unwrap();
        let store_path = temp_dir.path().join("translations.txt");
        fs::write(&store_path, "hello,வணக்கம்\n").unwrap();
        let mut store = TranslationStore::open(&store_path).unwrap();

        let pattern = format!("{}/*.txt", temp_dir.path().display());
        let summary = import(&mut store, &pattern, "utf-8").unwrap();

        assert!(summary.files.is_empty());
        assert_eq!(summary.duplicates, 0);
    }

    #[test]
    fn import_skips_the_store_file_reached_through_another_path() {
        let temp_dir = tempdir().unwrap();
        let store_path = temp_dir.path().join("translations.txt");
        fs::write(&store_path, "hello,வணக்கம்\n").unwrap();
        let mut store = TranslationStore::open(&store_path).unwrap();

        let pattern = format!("{}/./*.txt", temp_dir.path().display());
        let summary = import(&mut store, &pattern, "utf-8").unwrap();

        assert!(summary.files.is_empty());
        assert_eq!(summary.duplicates, 0);
    }

    #[test]
    fn import_continues_past_unreadable_match() {
        let temp_dir = tempdir().unwrap();
        let lists = temp_dir.path().join("lists");
        // A directory matching the pattern cannot be read as a file
        fs::create_dir_all(lists.join("a.csv")).unwrap();
        fs::write(lists.join("b.csv"), "dog,நாய்\n").unwrap();

        let mut store = TranslationStore::open(temp_dir.path().join("translations.txt")).unwrap();
        let pattern = format!("{}/*.csv", lists.display());
        let summary = import(&mut store, &pattern, "utf-8").unwrap();

        assert_eq!(summary.files, vec![lists.join("b.csv")]);
        assert_eq!(summary.added, 1);
        assert_eq!(store.lookup("dog"), Some("நாய்"));
    }

    #[cfg(unix)]
    #[test]
    fn import_continues_past_file_without_read_permission() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let lists = temp_dir.path().join("lists");
        fs::create_dir_all(&lists).unwrap();
        let locked = lists.join("a.csv");
        fs::write(&locked, "cat,பூனை\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        fs::write(lists.join("b.csv"), "dog,நாய்\n").unwrap();

        let mut store = TranslationStore::open(temp_dir.path().join("translations.txt")).unwrap();
        let pattern = format!("{}/*.csv", lists.display());
        let summary = import(&mut store, &pattern, "utf-8").unwrap();

        assert_eq!(store.lookup("dog"), Some("நாய்"));
        // Superusers can still read the locked file
        if fs::read(&locked).is_err() {
            assert!(!store.contains("cat"));
            assert_eq!(summary.files, vec![lists.join("b.csv")]);
        }
    }
}
