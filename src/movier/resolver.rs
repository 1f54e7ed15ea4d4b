//! # Title Resolution
//!
//! Turns a media file path into one provider record.
//!
//! 1. The file name is parsed ([`crate::parser`]) and cleaned.
//! 2. The provider is searched with the name and year, then without the year,
//!    then with only the first two words. After that the [`Prompter`] is asked
//!    for keywords or an IMDb id, a bounded number of times.
//! 3. Every hit is fetched in full and ranked by weight (rating x votes),
//!    highest first, with equal weights collapsed.
//! 4. A single candidate, or a clear winner under [`is_guessable`], is taken
//!    without asking. Otherwise the prompter decides: a candidate, a typed id,
//!    a new search, or skipping the file.
//!
//! Provider errors while searching count as "nothing found" and feed the
//! retry chain; they never abort a batch.

use crate::error::Result;
use crate::model::{MovieDetails, SearchHit, SourceFile};
use crate::parser::{clean_name, first_two_words, parse, parse_text};
use crate::prompt::{Choice, Prompter};
use crate::provider::{MetadataProvider, SearchQuery};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, warn};

static EXTERNAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-z]{2}\d{7,8})\b").expect("valid external id pattern"));

/// Upper bounds for the interactive parts of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverLimits {
    /// How many times the user is asked for new keywords per search.
    pub max_keyword_prompts: u32,
    /// How many "search with another keyword" rounds a single file may take.
    pub max_research_rounds: u32,
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self {
            max_keyword_prompts: 5,
            max_research_rounds: 3,
        }
    }
}

/// A file matched to a provider record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMovie {
    pub details: MovieDetails,
    /// True when the pick was made by the auto-guess heuristic.
    pub guessed: bool,
    pub source: SourceFile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Box<ResolvedMovie>),
    /// The user declined every candidate.
    Skipped,
    /// Nothing could be found, even after asking.
    NotFound,
}

enum Pick {
    Chosen(MovieDetails, bool),
    Skipped,
    NotFound,
}

pub struct TitleResolver<'a, P: MetadataProvider, Q: Prompter> {
    provider: &'a P,
    prompter: &'a mut Q,
    limits: ResolverLimits,
}

impl<'a, P: MetadataProvider, Q: Prompter> TitleResolver<'a, P, Q> {
    pub fn new(provider: &'a P, prompter: &'a mut Q) -> Self {
        Self {
            provider,
            prompter,
            limits: ResolverLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResolverLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn resolve(&mut self, path: &Path, auto_guess: bool) -> Result<Resolution> {
        let parsed = parse(path);
        let name = clean_name(&parsed.name);
        let source = SourceFile {
            path: path.to_path_buf(),
            name: name.clone(),
            year: parsed.year.clone(),
            tier: parsed.tier,
            parent: path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        debug!(name = %name, year = ?parsed.year, tier = parsed.tier, "parsed file name");

        let resolution = match self.pick(name, parsed.year, auto_guess)? {
            Pick::Chosen(details, guessed) => Resolution::Resolved(Box::new(ResolvedMovie {
                details,
                guessed,
                source,
            })),
            Pick::Skipped => Resolution::Skipped,
            Pick::NotFound => Resolution::NotFound,
        };
        Ok(resolution)
    }

    fn pick(&mut self, name: String, year: Option<String>, auto_guess: bool) -> Result<Pick> {
        let mut keyword = name;
        let mut year = year;
        let mut rounds = 0;

        loop {
            let hits = self.search_movie(&keyword, year.as_deref())?;
            let ranked = rank_by_weight(self.fetch_all(hits));
            if ranked.is_empty() {
                return Ok(Pick::NotFound);
            }

            let guessed = auto_guess && ranked.len() > 1 && is_guessable(&ranked);
            if ranked.len() == 1 || guessed {
                return Ok(Pick::Chosen(ranked[0].clone(), guessed));
            }

            match self.prompter.choose_movie(&ranked)? {
                Choice::Pick(index) => match ranked.get(index) {
                    Some(details) => return Ok(Pick::Chosen(details.clone(), false)),
                    None => {
                        warn!(index, "choice out of range, skipping");
                        return Ok(Pick::Skipped);
                    }
                },
                Choice::ExternalId(id) => {
                    return match self.provider.fetch_details(id.trim()) {
                        Ok(details) => Ok(Pick::Chosen(details, false)),
                        Err(e) => {
                            warn!(id = %id, error = %e, "could not fetch typed id");
                            Ok(Pick::NotFound)
                        }
                    };
                }
                Choice::Research(text) => {
                    rounds += 1;
                    if rounds > self.limits.max_research_rounds {
                        warn!(rounds, "too many searches for one file, giving up");
                        return Ok(Pick::NotFound);
                    }
                    let parsed = parse_text(&text);
                    keyword = clean_name(&parsed.name);
                    year = parsed.year;
                }
                Choice::Skip => return Ok(Pick::Skipped),
            }
        }
    }

    /// Runs the search retry chain. Empty means the user gave up.
    fn search_movie(&mut self, keyword: &str, year: Option<&str>) -> Result<Vec<SearchHit>> {
        let mut keyword = keyword.to_string();
        let mut prompts = 0;
        let mut attempt = 0;

        loop {
            attempt += 1;
            if attempt > 1 {
                info!(keywords = %keyword, "Searching..");
            }

            let mut hits = self.search_once(&keyword, year);
            if hits.is_empty() && year.is_some() {
                hits = self.search_once(&keyword, None);
            }
            if !hits.is_empty() {
                return Ok(hits);
            }

            if attempt == 1 {
                keyword = first_two_words(&keyword);
                continue;
            }

            if prompts >= self.limits.max_keyword_prompts {
                return Ok(Vec::new());
            }
            prompts += 1;

            let answer = self.prompter.ask_keywords()?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(Vec::new());
            }
            if let Some(id) = external_id(answer) {
                return Ok(vec![SearchHit::from_id(id)]);
            }
            keyword = answer.to_string();
        }
    }

    fn search_once(&self, keyword: &str, year: Option<&str>) -> Vec<SearchHit> {
        let query = SearchQuery::movie(keyword, year.map(str::to_string));
        match self.provider.search(&query) {
            Ok(hits) => hits,
            Err(e) => {
                warn!(keyword, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    fn fetch_all(&self, hits: Vec<SearchHit>) -> Vec<MovieDetails> {
        hits.into_iter()
            .filter_map(|hit| match self.provider.fetch_details(&hit.external_id) {
                Ok(details) => Some(details),
                Err(e) => {
                    warn!(id = %hit.external_id, error = %e, "could not fetch details");
                    None
                }
            })
            .collect()
    }
}

/// Highest weight first. Candidates with the same weight collapse into one.
pub fn rank_by_weight(mut details: Vec<MovieDetails>) -> Vec<MovieDetails> {
    details.sort_by(|a, b| a.weight().total_cmp(&b.weight()));
    details.dedup_by(|a, b| a.weight() == b.weight());
    details.reverse();
    details
}

/// Whether the top candidate is clearly the one, judged on the top two.
///
/// Either the runner-up is obscure (< 5,000 votes) while the top is popular
/// (> 100,000 votes), or the top is reasonably known (> 10,000 votes) and
/// outweighs the runner-up more than 40 times.
pub fn is_guessable(ranked: &[MovieDetails]) -> bool {
    let (top, runner_up) = match ranked {
        [top, runner_up, ..] => (top, runner_up),
        _ => return false,
    };
    let obscure_rival = runner_up.votes < 5_000 && top.votes > 100_000;
    let dominant = top.votes > 10_000 && top.weight() > 40.0 * runner_up.weight();
    obscure_rival || dominant
}

/// Extracts an IMDb-style id (`tt0133093`) from free text.
pub fn external_id(text: &str) -> Option<String> {
    EXTERNAL_ID
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use crate::provider::memory::fixtures::details;
    use crate::provider::memory::ScriptedProvider;
    use std::path::PathBuf;

    fn resolve_with(
        provider: &ScriptedProvider,
        prompter: &mut ScriptedPrompter,
        path: &str,
        auto_guess: bool,
    ) -> Resolution {
        TitleResolver::new(provider, prompter)
            .resolve(&PathBuf::from(path), auto_guess)
            .unwrap()
    }

    fn resolved_id(resolution: &Resolution) -> Option<(&str, bool)> {
        match resolution {
            Resolution::Resolved(movie) => {
                Some((movie.details.external_id.as_str(), movie.guessed))
            }
            _ => None,
        }
    }

    #[test]
    fn ranking_is_by_weight_descending() {
        let ranked = rank_by_weight(vec![
            details("tt1", "Low", "2000", "5.0", "100"),
            details("tt2", "High", "2000", "9.0", "1,000"),
            details("tt3", "Mid", "2000", "7.0", "500"),
        ]);
        let ids: Vec<_> = ranked.iter().map(|d| d.external_id.as_str()).collect();
        assert_eq!(ids, vec!["tt2", "tt3", "tt1"]);
    }

    #[test]
    fn equal_weights_collapse_to_one() {
        let ranked = rank_by_weight(vec![
            details("tt1", "A", "2000", "5.0", "200"),
            details("tt2", "B", "2000", "10.0", "100"),
            details("tt3", "C", "2000", "8.0", "1,000"),
        ]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].external_id, "tt3");
    }

    #[test]
    fn obscure_runner_up_is_guessable() {
        let ranked = rank_by_weight(vec![
            details("tt1", "Big", "2000", "6.0", "120,000"),
            details("tt2", "Small", "2000", "9.9", "3,000"),
        ]);
        assert!(is_guessable(&ranked));
    }

    #[test]
    fn close_contenders_are_not_guessable() {
        // 50,000 x 8.0 = 400,000 vs 40,000 x 5.0 = 200,000: only 2x apart.
        let ranked = rank_by_weight(vec![
            details("tt1", "One", "2000", "8.0", "50,000"),
            details("tt2", "Two", "2000", "5.0", "40,000"),
        ]);
        assert!(!is_guessable(&ranked));
    }

    #[test]
    fn dominant_weight_is_guessable() {
        let ranked = rank_by_weight(vec![
            details("tt1", "Known", "2000", "8.0", "60,000"),
            details("tt2", "Rival", "2000", "2.0", "5,000"),
        ]);
        assert!(is_guessable(&ranked));
    }

    #[test]
    fn single_result_is_taken_without_asking() {
        let provider =
            ScriptedProvider::new().with_movie("heat", details("tt0113277", "Heat", "1995", "8.3", "700,000"));
        let mut prompter = ScriptedPrompter::new();
        let resolution = resolve_with(&provider, &mut prompter, "/in/Heat.1995.DVDRip.avi", false);
        assert_eq!(resolved_id(&resolution), Some(("tt0113277", false)));
        assert!(prompter.presented.is_empty());
    }

    #[test]
    fn auto_guess_picks_clear_winner() {
        let provider = ScriptedProvider::new()
            .with_movie("alien", details("tt0078748", "Alien", "1979", "8.5", "900,000"))
            .with_movie("alien", details("tt9999999", "Alien", "1979", "4.0", "1,200"));
        let mut prompter = ScriptedPrompter::new();
        let resolution = resolve_with(&provider, &mut prompter, "/in/Alien (1979).mkv", true);
        assert_eq!(resolved_id(&resolution), Some(("tt0078748", true)));
        assert!(prompter.presented.is_empty());
    }

    #[test]
    fn without_auto_guess_the_user_is_asked() {
        let provider = ScriptedProvider::new()
            .with_movie("alien", details("tt0078748", "Alien", "1979", "8.5", "900,000"))
            .with_movie("alien", details("tt9999999", "Alien", "1979", "4.0", "1,200"));
        let mut prompter = ScriptedPrompter::new().choose(Choice::Pick(1));
        let resolution = resolve_with(&provider, &mut prompter, "/in/Alien (1979).mkv", false);
        assert_eq!(resolved_id(&resolution), Some(("tt9999999", false)));
        assert_eq!(prompter.presented, vec![2]);
    }

    #[test]
    fn ambiguous_results_can_be_declined() {
        let provider = ScriptedProvider::new()
            .with_movie("crash", details("tt0375679", "Crash", "2004", "7.7", "50,000"))
            .with_movie("crash", details("tt0115964", "Crash", "1996", "6.4", "40,000"));
        let mut prompter = ScriptedPrompter::new().choose(Choice::Skip);
        let resolution = resolve_with(&provider, &mut prompter, "/in/Crash.avi", true);
        assert_eq!(resolution, Resolution::Skipped);
        assert_eq!(prompter.presented, vec![2]);
    }

    #[test]
    fn unknown_typed_id_means_not_found() {
        let provider = ScriptedProvider::new()
            .with_movie("crash", details("tt0375679", "Crash", "2004", "7.7", "50,000"))
            .with_movie("crash", details("tt0115964", "Crash", "1996", "6.4", "40,000"));
        let mut prompter =
            ScriptedPrompter::new().choose(Choice::ExternalId("tt0000404".into()));
        let resolution = resolve_with(&provider, &mut prompter, "/in/Crash.avi", true);
        assert_eq!(resolution, Resolution::NotFound);
        assert!(provider.calls().contains(&"details:tt0000404".to_string()));
    }

    #[test]
    fn falls_back_to_first_two_words() {
        let provider = ScriptedProvider::new()
            .with_movie("the matrix", details("tt0133093", "The Matrix", "1999", "8.7", "2,000,000"));
        let mut prompter = ScriptedPrompter::new();
        let resolution =
            resolve_with(&provider, &mut prompter, "/in/The.Matrix.Extended.Cut.mkv", true);
        assert_eq!(resolved_id(&resolution), Some(("tt0133093", false)));
        assert_eq!(
            provider.calls(),
            vec![
                "search:The Matrix Extended Cut",
                "search:The Matrix",
                "details:tt0133093"
            ]
        );
    }

    #[test]
    fn year_is_dropped_when_it_filters_everything() {
        let provider = ScriptedProvider::new()
            .with_movie("heat", details("tt0113277", "Heat", "1995", "8.3", "700,000"));
        let mut prompter = ScriptedPrompter::new();
        let resolution = resolve_with(&provider, &mut prompter, "/in/Heat [1996].mkv", true);
        assert_eq!(resolved_id(&resolution), Some(("tt0113277", false)));
    }

    #[test]
    fn typed_id_short_circuits_the_search() {
        let provider = ScriptedProvider::new()
            .with_details(details("tt0062622", "2001: A Space Odyssey", "1968", "8.3", "700,000"));
        let mut prompter = ScriptedPrompter::new().answer_keywords("it is tt0062622");
        let resolution = resolve_with(&provider, &mut prompter, "/in/space.odyssey.avi", true);
        assert_eq!(resolved_id(&resolution), Some(("tt0062622", false)));
        assert_eq!(prompter.keyword_prompts, 1);
    }

    #[test]
    fn empty_answer_means_not_found() {
        let provider = ScriptedProvider::new();
        let mut prompter = ScriptedPrompter::new().answer_keywords("   ");
        let resolution = resolve_with(&provider, &mut prompter, "/in/unknown.avi", true);
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[test]
    fn keyword_prompts_are_bounded() {
        let provider = ScriptedProvider::new();
        let mut prompter = ScriptedPrompter::new()
            .answer_keywords("nope")
            .answer_keywords("still nope")
            .answer_keywords("nope again");
        let resolution = TitleResolver::new(&provider, &mut prompter)
            .with_limits(ResolverLimits {
                max_keyword_prompts: 2,
                max_research_rounds: 1,
            })
            .resolve(&PathBuf::from("/in/unknown.avi"), true)
            .unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(prompter.keyword_prompts, 2);
    }

    #[test]
    fn provider_errors_feed_the_retry_chain() {
        let provider = ScriptedProvider::new()
            .failing_on("broken title")
            .with_movie("broken", details("tt0000042", "Broken", "2001", "6.0", "20,000"));
        let mut prompter = ScriptedPrompter::new();
        let resolution = resolve_with(&provider, &mut prompter, "/in/Broken.Title.avi", true);
        assert_eq!(resolution, Resolution::NotFound);

        let mut prompter = ScriptedPrompter::new().answer_keywords("broken");
        let resolution = resolve_with(&provider, &mut prompter, "/in/Broken.Title.avi", true);
        assert_eq!(resolved_id(&resolution), Some(("tt0000042", false)));
    }

    #[test]
    fn research_uses_new_keywords() {
        let provider = ScriptedProvider::new()
            .with_movie("crash", details("tt0375679", "Crash", "2004", "7.7", "50,000"))
            .with_movie("crash", details("tt0115964", "Crash", "1996", "6.4", "40,000"))
            .with_movie("heat", details("tt0113277", "Heat", "1995", "8.3", "700,000"));
        let mut prompter = ScriptedPrompter::new().choose(Choice::Research("Heat 1995".into()));
        let resolution = resolve_with(&provider, &mut prompter, "/in/Crash.avi", true);
        assert_eq!(resolved_id(&resolution), Some(("tt0113277", false)));
    }

    #[test]
    fn research_rounds_are_bounded() {
        let provider = ScriptedProvider::new()
            .with_movie("crash", details("tt0375679", "Crash", "2004", "7.7", "50,000"))
            .with_movie("crash", details("tt0115964", "Crash", "1996", "6.4", "40,000"));
        let mut prompter = ScriptedPrompter::new()
            .choose(Choice::Research("crash".into()))
            .choose(Choice::Research("crash".into()));
        let resolution = TitleResolver::new(&provider, &mut prompter)
            .with_limits(ResolverLimits {
                max_keyword_prompts: 1,
                max_research_rounds: 1,
            })
            .resolve(&PathBuf::from("/in/Crash.avi"), true)
            .unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(prompter.presented, vec![2, 2]);
    }

    #[test]
    fn source_context_is_kept() {
        let provider = ScriptedProvider::new()
            .with_movie("heat", details("tt0113277", "Heat", "1995", "8.3", "700,000"));
        let mut prompter = ScriptedPrompter::new();
        match resolve_with(&provider, &mut prompter, "/in/Crime/Heat.1995.avi", true) {
            Resolution::Resolved(movie) => {
                assert_eq!(movie.source.parent, "Crime");
                assert_eq!(movie.source.name, "Heat");
                assert_eq!(movie.source.year.as_deref(), Some("1995"));
                assert_eq!(movie.source.tier, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn external_ids_are_found_in_text() {
        assert_eq!(external_id("tt0133093"), Some("tt0133093".to_string()));
        assert_eq!(external_id("use TT0133093 please"), Some("tt0133093".to_string()));
        assert_eq!(external_id("the matrix"), None);
    }
}
