//! Files containing one or more phrases.

use super::{Observer, SearchEvent, report_walk_failure};
use crate::copy::check_source;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files matching one phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatches {
    /// The trimmed phrase
    pub phrase: String,
    /// Files whose contents contain it, sorted
    pub files: Vec<PathBuf>,
}

/// A search for several phrases across the files of a tree.
///
/// # Example
///
/// ```no_run
/// use fsclient::search::{PhraseSearch, silent};
/// use std::path::Path;
///
/// for result in PhraseSearch::new("alpha,beta").run(Path::new("docs"), &silent)? {
///     println!("{}: {} files", result.phrase, result.files.len());
/// }
/// # Ok::<(), fsclient::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhraseSearch {
    phrases: Vec<String>,
    ignore_case: bool,
    patterns: Vec<String>,
}

impl PhraseSearch {
    /// Search for the comma-separated phrases in `phrases`.
    ///
    /// Each phrase is trimmed; blank ones are dropped.
    pub fn new(phrases: &str) -> Self {
        Self {
            phrases: phrases
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            ..Self::default()
        }
    }

    /// Match phrases regardless of case.
    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Only search files whose name matches one of these wildcards
    /// (`*.txt`, `data_??.csv`).
    ///
    /// With no wildcards every file is searched; an empty list is not a
    /// request to search nothing.
    #[must_use]
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// The phrases that will be searched for.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Run the search under `root`.
    ///
    /// Returns one entry per phrase, in the order given. Each candidate file
    /// is read once, in parallel, as lossy UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for a bad wildcard, or
    /// [`Error::SourceNotFound`] / [`Error::NotADirectory`] for a bad root.
    /// Unreadable files are reported to `observer` and skipped.
    pub fn run(&self, root: &Path, observer: Observer<'_>) -> Result<Vec<PhraseMatches>> {
        let filter = self.compile_patterns()?;
        check_source(root)?;

        if self.phrases.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = collect_candidates(root, filter.as_ref(), observer);

        let needles: Vec<String> = self
            .phrases
            .iter()
            .map(|p| self.normalize(p))
            .collect();
        for phrase in &self.phrases {
            observer(&SearchEvent::Phrase(phrase));
        }

        // For each file, the indices of the phrases it contains.
        let hits: Vec<(PathBuf, Vec<usize>)> = candidates
            .into_par_iter()
            .filter_map(|path| {
                let bytes = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        observer(&SearchEvent::Unreadable {
                            path: Some(&path),
                            error: &error,
                        });
                        return None;
                    }
                };
                let haystack = self.normalize(&String::from_utf8_lossy(&bytes));
                let matched: Vec<usize> = needles
                    .iter()
                    .enumerate()
                    .filter(|(_, needle)| haystack.contains(needle.as_str()))
                    .map(|(i, _)| i)
                    .collect();
                (!matched.is_empty()).then_some((path, matched))
            })
            .collect();

        let mut results: Vec<PhraseMatches> = self
            .phrases
            .iter()
            .map(|phrase| PhraseMatches {
                phrase: phrase.clone(),
                files: Vec::new(),
            })
            .collect();
        for (path, matched) in hits {
            for i in matched {
                results[i].files.push(path.clone());
            }
        }
        for result in &mut results {
            result.files.sort();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "searched {} phrases under {}",
            self.phrases.len(),
            root.display()
        );

        Ok(results)
    }

    fn normalize(&self, text: &str) -> String {
        if self.ignore_case {
            text.to_lowercase()
        } else {
            text.to_owned()
        }
    }

    fn compile_patterns(&self) -> Result<Option<GlobSet>> {
        if self.patterns.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.patterns {
            let glob = Glob::new(pattern).map_err(|source| Error::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map(Some)
            .map_err(|source| Error::InvalidPattern {
                pattern: self.patterns.join(","),
                source,
            })
    }
}

/// Every regular file under `root` whose name passes `filter`.
fn collect_candidates(root: &Path, filter: Option<&GlobSet>, observer: Observer<'_>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                report_walk_failure(observer, err);
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_dir() {
            observer(&SearchEvent::Directory(entry.path()));
        } else if file_type.is_file()
            && filter.is_none_or(|set| set.is_match(Path::new(entry.file_name())))
        {
            candidates.push(entry.into_path());
        }
    }
    candidates
}
