use tracing::trace;

use crate::errors::{ScoutError, ScoutResult};
use crate::results::LineMatch;

/// The strings that must all appear on one line for a match.
///
/// Matching is plain substring containment: `"ANN"` matches inside
/// `"ANNOUNCEMENT"`, and case is compared exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    terms: Vec<String>,
}

impl SearchCriteria {
    /// Builds criteria from raw entries, dropping empty ones.
    ///
    /// Fails with [`ScoutError::EmptyCriteria`] when no entry remains, so a
    /// criteria value always has at least one term.
    pub fn new<I, S>(entries: I) -> ScoutResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = entries
            .into_iter()
            .map(Into::into)
            .filter(|term| !term.is_empty())
            .collect();

        if terms.is_empty() {
            return Err(ScoutError::EmptyCriteria);
        }
        Ok(Self { terms })
    }

    /// The terms in the order they were supplied
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether every term occurs in `line`
    pub fn matches_line(&self, line: &str) -> bool {
        self.terms.iter().all(|term| line.contains(term.as_str()))
    }

    /// Scans one page of text, returning the matches and the number of lines seen.
    ///
    /// Lines are the pieces between `'\n'` characters, so an empty trailing
    /// piece still counts toward line numbering.
    pub fn scan_page(&self, page_number: usize, text: &str) -> (Vec<LineMatch>, usize) {
        let mut matches = Vec::new();
        let mut line_count = 0;

        for (i, line) in text.split('\n').enumerate() {
            line_count += 1;
            if self.matches_line(line) {
                trace!("Match on page {} line {}: {}", page_number, i + 1, line.trim());
                matches.push(LineMatch {
                    page_number,
                    line_number: i + 1,
                    line_content: line.trim().to_string(),
                });
            }
        }

        (matches, line_count)
    }

    /// Finds every matching line across the pages of a segment, in page then
    /// line order. Page numbers start at 1.
    pub fn find_matches<'a, I>(&self, pages: I) -> Vec<LineMatch>
    where
        I: IntoIterator<Item = &'a str>,
    {
        pages
            .into_iter()
            .enumerate()
            .flat_map(|(i, text)| self.scan_page(i + 1, text).0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(terms: &[&str]) -> SearchCriteria {
        SearchCriteria::new(terms.iter().copied()).unwrap()
    }

    #[test]
    fn test_all_terms_on_one_line() {
        let c = criteria(&["ALICE", "BOB"]);
        assert!(c.matches_line("BOB AND ALICE ARE PRESENT"));
        assert!(!c.matches_line("ALICE IS PRESENT"));
    }

    #[test]
    fn test_terms_split_across_lines_do_not_match() {
        let c = criteria(&["ALICE", "BOB"]);
        let matches = c.find_matches(["ALICE\nBOB\n"]);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_substring_inside_word() {
        let c = criteria(&["ANN"]);
        assert!(c.matches_line("PUBLIC ANNOUNCEMENT"));
    }

    #[test]
    fn test_case_sensitive() {
        let c = criteria(&["John"]);
        assert!(!c.matches_line("JOHN SMITH"));
        assert!(c.matches_line("John Smith"));
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        let c = SearchCriteria::new(vec!["JOHN", "", "MARY"]).unwrap();
        assert_eq!(c.terms(), &["JOHN".to_string(), "MARY".to_string()]);
    }

    #[test]
    fn test_empty_criteria_rejected() {
        assert!(matches!(
            SearchCriteria::new(Vec::<String>::new()),
            Err(ScoutError::EmptyCriteria)
        ));
        assert!(matches!(
            SearchCriteria::new(vec!["", ""]),
            Err(ScoutError::EmptyCriteria)
        ));
    }

    #[test]
    fn test_page_and_line_numbers() {
        let c = criteria(&["JOHN", "MARY"]);
        let pages = [
            "HEADER\nnothing here\n",
            "ROLL 12\n  SMITH JOHN  MARY SMITH  \nJOHN ONLY\nMARY AND JOHN\n",
        ];
        let matches = c.find_matches(pages);
        assert_eq!(
            matches,
            vec![
                LineMatch {
                    page_number: 2,
                    line_number: 2,
                    line_content: "SMITH JOHN  MARY SMITH".to_string(),
                },
                LineMatch {
                    page_number: 2,
                    line_number: 4,
                    line_content: "MARY AND JOHN".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_scan_page_counts_lines() {
        let c = criteria(&["X"]);
        let (matches, lines) = c.scan_page(1, "a\nb\nX\n");
        assert_eq!(lines, 4);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line_number, 3);
    }

    #[test]
    fn test_find_matches_is_repeatable() {
        let c = criteria(&["JOHN", "MARY"]);
        let pages = ["JOHN MARY\n", "MARY\nJOHN + MARY\n"];
        assert_eq!(c.find_matches(pages), c.find_matches(pages));
    }
}
