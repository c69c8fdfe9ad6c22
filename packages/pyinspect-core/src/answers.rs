//! Looking up the last cached error online.

use std::io::Write;

use url::Url;

use crate::cache::{CachedError, ErrorCache};
use crate::error::{InspectError, Result};
use crate::terminal;

/// Number of links shown by [`get_answers`].
pub const MAX_LINKS: usize = 3;

/// Turns an error query into ranked result URLs, best first.
pub trait AnswerSearch {
    fn search(&self, query: &str) -> Vec<String>;
}

/// Search-page URLs on a fixed list of engines. Performs no I/O.
#[derive(Debug, Clone)]
pub struct QueryUrlSearch {
    engines: Vec<(&'static str, &'static str)>,
}

impl Default for QueryUrlSearch {
    fn default() -> Self {
        QueryUrlSearch {
            engines: vec![
                ("https://stackoverflow.com/search", "q"),
                ("https://www.google.com/search", "q"),
                ("https://duckduckgo.com/", "q"),
            ],
        }
    }
}

impl AnswerSearch for QueryUrlSearch {
    fn search(&self, query: &str) -> Vec<String> {
        let terms = format!("python {}", query);
        self.engines
            .iter()
            .filter_map(|(base, param)| {
                match Url::parse_with_params(base, &[(*param, terms.as_str())]) {
                    Ok(url) => Some(url.to_string()),
                    Err(e) => {
                        log::warn!("skipping search engine {}: {}", base, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub record: CachedError,
    pub links: Vec<String>,
}

impl Answers {
    pub fn best(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }
}

/// Loads the cached error and asks `search` for links.
pub fn find_answers(cache: &ErrorCache, search: &dyn AnswerSearch) -> Result<Answers> {
    let record = cache.load()?;
    let mut links = search.search(&record.query);
    links.truncate(MAX_LINKS);
    Ok(Answers { record, links })
}

/// Prints a recap of the cached error (unless `hide_panel`) and the top
/// links. A missing or unreadable cache prints a warning and yields `None`.
pub fn get_answers(
    cache: &ErrorCache,
    search: &dyn AnswerSearch,
    hide_panel: bool,
    out: &mut dyn Write,
) -> Result<Option<Answers>> {
    let answers = match find_answers(cache, search) {
        Ok(answers) => answers,
        Err(e) => {
            log::debug!("no answers: {}", e);
            let lines = vec![
                "Could not find a cached error to search for.".to_string(),
                format!("Expected it at {}", cache.path().display()),
            ];
            terminal::write_panel(out, "No error cached", &lines, true)
                .map_err(|e| InspectError::render(e.to_string()))?;
            return Ok(None);
        }
    };

    let render = |e: std::io::Error| InspectError::render(e.to_string());
    if !hide_panel {
        let mut lines = vec![answers.record.query.clone()];
        if !answers.record.doc.is_empty() {
            lines.push(String::new());
            lines.extend(answers.record.doc.lines().map(str::to_string));
        }
        terminal::write_panel(out, "Last error", &lines, false).map_err(render)?;
    }
    let lines: Vec<String> = answers
        .links
        .iter()
        .enumerate()
        .map(|(i, link)| format!("{}. {}", i + 1, link))
        .collect();
    terminal::write_panel(out, "Answers", &lines, false).map_err(render)?;
    Ok(Some(answers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FixedSearch(Vec<&'static str>);

    impl AnswerSearch for FixedSearch {
        fn search(&self, _query: &str) -> Vec<String> {
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    #[test]
    fn test_query_urls_are_encoded() {
        let links = QueryUrlSearch::default().search("KeyError: 'a b'");
        assert_eq!(links.len(), 3);
        assert!(links[0].starts_with("https://stackoverflow.com/search?q=python+KeyError"));
        assert!(links.iter().all(|l| !l.contains(' ')));
    }

    #[test]
    fn test_get_answers_with_cache() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let cache = ErrorCache::in_dir(dir.path());
        cache
            .store(&CachedError::new("ValueError", Some("bad"), Some("Inappropriate argument value.")))
            .unwrap();

        let search = FixedSearch(vec!["a", "b", "c", "d"]);
        let mut out = Vec::new();
        let answers = get_answers(&cache, &search, false, &mut out).unwrap().unwrap();
        assert_eq!(answers.links, vec!["a", "b", "c"]);
        assert_eq!(answers.best(), Some("a"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ValueError: bad"));
        assert!(text.contains("Inappropriate argument value."));
        assert!(text.contains("3. c"));
    }

    #[test]
    fn test_hide_panel_skips_recap() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let cache = ErrorCache::in_dir(dir.path());
        cache.store(&CachedError::new("KeyError", None, None)).unwrap();

        let mut out = Vec::new();
        get_answers(&cache, &FixedSearch(vec!["x"]), true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Last error"));
        assert!(text.contains("1. x"));
    }

    #[test]
    fn test_missing_cache_warns() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let cache = ErrorCache::in_dir(dir.path());
        let mut out = Vec::new();
        let answers = get_answers(&cache, &QueryUrlSearch::default(), false, &mut out).unwrap();
        assert!(answers.is_none());
        assert!(String::from_utf8(out).unwrap().contains("No error cached"));
    }
}
