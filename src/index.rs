//! Fuzzy search index over show titles.
use nucleo_matcher::{
    Matcher, Utf32String,
    pattern::{CaseMatching, Normalization, Pattern},
};

use crate::show::Show;

/// Index construction options.
#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
    /// Report the match score with each hit.
    pub include_score: bool,
    /// Case-sensitive matching (default: ignore case).
    pub case_sensitive: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            include_score: true,
            case_sensitive: false,
        }
    }
}

/// How a hit was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Every query character appears in the title, in order.
    Fuzzy,
    /// Near miss: query words are within a small edit distance of title words.
    Typo,
}

/// A single match returned by [`SearchIndex::search`].
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    /// The matched show.
    pub item: &'a Show,
    /// Position of the show in the catalog.
    pub position: usize,
    /// Match score (higher = better within the same `kind`). `None` unless
    /// `include_score` is set.
    pub score: Option<u32>,
    pub kind: MatchKind,
}

/// Minimum word similarity (0..=1) for a typo match.
const TYPO_THRESHOLD: f64 = 0.75;

/// Query words shorter than this are ignored by typo matching.
const TYPO_MIN_WORD: usize = 3;

/// Immutable index built once from the full catalog.
///
/// Titles are converted to the matcher's UTF-32 form and split into words
/// up front so a lookup only pays for scoring.
pub struct SearchIndex {
    shows: Vec<Show>,
    titles: Vec<Utf32String>,
    words: Vec<Vec<String>>,
    opts: IndexOptions,
}

impl SearchIndex {
    pub fn new(shows: Vec<Show>, opts: IndexOptions) -> Self {
        let titles = shows
            .iter()
            .map(|s| Utf32String::from(s.title.as_str()))
            .collect();
        let words = shows
            .iter()
            .map(|s| split_words(&s.title, opts.case_sensitive))
            .collect();
        Self {
            shows,
            titles,
            words,
            opts,
        }
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Show> {
        self.shows.get(position)
    }

    /// Ranked matches for `query`, best first.
    ///
    /// Fuzzy (subsequence) hits come first, then typo hits for titles the
    /// fuzzy pass missed. Equal scores keep catalog order. A blank query
    /// matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let case_matching = if self.opts.case_sensitive {
            CaseMatching::Respect
        } else {
            CaseMatching::Ignore
        };
        let pattern = Pattern::parse(query, case_matching, Normalization::Smart);
        let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);

        let mut fuzzy: Vec<(usize, u32)> = Vec::new();
        let mut typo: Vec<(usize, u32)> = Vec::new();
        let query_words = split_words(query, self.opts.case_sensitive);

        for (pos, title) in self.titles.iter().enumerate() {
            if let Some(score) = pattern.score(title.slice(..), &mut matcher) {
                fuzzy.push((pos, score));
            } else if let Some(sim) = typo_similarity(&query_words, &self.words[pos]) {
                typo.push((pos, (sim * 100.0).round() as u32));
            }
        }

        // Stable sorts keep catalog order between equal scores.
        fuzzy.sort_by(|a, b| b.1.cmp(&a.1));
        typo.sort_by(|a, b| b.1.cmp(&a.1));

        let fuzzy = fuzzy.into_iter().map(|hit| (hit, MatchKind::Fuzzy));
        let typo = typo.into_iter().map(|hit| (hit, MatchKind::Typo));
        fuzzy
            .chain(typo)
            .map(|((position, score), kind)| SearchHit {
                item: &self.shows[position],
                position,
                score: self.opts.include_score.then_some(score),
                kind,
            })
            .collect()
    }
}

fn split_words(text: &str, case_sensitive: bool) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            if case_sensitive {
                w.to_string()
            } else {
                w.to_lowercase()
            }
        })
        .collect()
}

/// Mean best similarity of each long-enough query word against the title
/// words, or `None` below the threshold. A title word is also compared by its
/// prefix so a partly typed word still counts.
fn typo_similarity(query_words: &[String], title_words: &[String]) -> Option<f64> {
    let long: Vec<&String> = query_words
        .iter()
        .filter(|w| w.chars().count() >= TYPO_MIN_WORD)
        .collect();
    if long.is_empty() || title_words.is_empty() {
        return None;
    }

    let total: f64 = long
        .iter()
        .map(|qw| {
            let len = qw.chars().count();
            title_words
                .iter()
                .map(|tw| {
                    let prefix: String = tw.chars().take(len).collect();
                    strsim::normalized_damerau_levenshtein(qw, tw)
                        .max(strsim::normalized_damerau_levenshtein(qw, &prefix))
                })
                .fold(0.0, f64::max)
        })
        .sum();

    let mean = total / long.len() as f64;
    (mean >= TYPO_THRESHOLD).then_some(mean)
}
