//! Exercise name resolution
//!
//! Turns free-text exercise mentions (chat, voice transcripts) into the
//! catalog's canonical name. Stages run in order and the first hit wins:
//!
//! 1. exact name, case-insensitive
//! 2. alias, case-insensitive
//! 3. trigram similarity, re-ranked by a muscle-group hint taken from the text
//! 4. auto-registration of the trimmed text as a new catalog entry
//!
//! Only stage 4 writes to the catalog.

pub mod trigram;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::exercises::MuscleGroup;

/// Minimum raw similarity for a candidate to be considered when a hint exists
pub const PREFILTER_THRESHOLD: f64 = 0.30;
/// Minimum (adjusted) similarity for a fuzzy match to be accepted
pub const ACCEPT_THRESHOLD: f64 = 0.40;
/// Added to candidates whose muscle group equals the hint
pub const MUSCLE_BONUS: f64 = 0.15;
/// Candidates fetched for re-ranking
pub const CANDIDATE_LIMIT: usize = 10;

// Order matters: the first keyword found wins.
const MUSCLE_KEYWORDS: &[(&str, MuscleGroup)] = &[
    ("shoulder", MuscleGroup::Shoulders),
    ("delt", MuscleGroup::Shoulders),
    ("chest", MuscleGroup::Chest),
    ("pec", MuscleGroup::Chest),
    ("back", MuscleGroup::Back),
    ("lat", MuscleGroup::Back),
    ("leg", MuscleGroup::Legs),
    ("quad", MuscleGroup::Legs),
    ("hamstring", MuscleGroup::Legs),
    ("glute", MuscleGroup::Legs),
    ("arm", MuscleGroup::Arms),
    ("bicep", MuscleGroup::Arms),
    ("tricep", MuscleGroup::Arms),
    ("core", MuscleGroup::Core),
    ("ab", MuscleGroup::Core),
];

/// Muscle group suggested by keywords in the raw text, if any
pub fn muscle_hint(raw: &str) -> Option<MuscleGroup> {
    let lower = raw.to_lowercase();
    MUSCLE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, group)| *group)
}

/// Fuzzy-search hit returned by the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub muscle_group: Option<MuscleGroup>,
    pub similarity: f64,
}

impl Candidate {
    /// Similarity plus the muscle-group bonus when the groups agree
    pub fn adjusted(&self, hint: MuscleGroup) -> f64 {
        if self.muscle_group == Some(hint) {
            self.similarity + MUSCLE_BONUS
        } else {
            self.similarity
        }
    }
}

/// Lookup capability the resolver needs from the catalog store.
///
/// Implementations must compare names and aliases case-insensitively and
/// return `similar` results sorted by descending similarity with a stable
/// tie order. `register` must behave as insert-or-ignore and report whether
/// a row was actually added.
pub trait ExerciseCatalog {
    /// Canonical name of the exercise whose name equals `name`
    fn find_by_name(&self, name: &str) -> Result<Option<String>>;

    /// Canonical name of the exercise carrying `alias`
    fn find_by_alias(&self, alias: &str) -> Result<Option<String>>;

    /// Up to `limit` exercises with similarity >= `min_similarity`, best first
    fn similar(&self, query: &str, min_similarity: f64, limit: usize) -> Result<Vec<Candidate>>;

    /// Insert a bare catalog row named `name` unless one already exists
    fn register(&self, name: &str) -> Result<bool>;
}

/// Which stage produced a resolution
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKind {
    /// Empty or whitespace-only input, passed through untouched
    Blank,
    Exact,
    Alias,
    Fuzzy {
        similarity: f64,
        adjusted: f64,
        hint: Option<MuscleGroup>,
    },
    /// No match; the text became a catalog entry (`inserted` is false when
    /// another writer got there first)
    Registered { inserted: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub name: String,
    pub kind: MatchKind,
}

/// Resolves raw exercise names against an `ExerciseCatalog`
pub struct NameResolver<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: ExerciseCatalog + ?Sized> NameResolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Canonical name for `raw`, registering it when nothing matches
    pub fn resolve(&self, raw: &str) -> Result<String> {
        self.resolve_detailed(raw).map(|r| r.name)
    }

    /// Like `resolve`, also reporting the stage that matched
    pub fn resolve_detailed(&self, raw: &str) -> Result<Resolution> {
        if raw.trim().is_empty() {
            return Ok(Resolution {
                name: raw.to_string(),
                kind: MatchKind::Blank,
            });
        }

        let name = raw.trim();
        if let Some(found) = self.match_trimmed(name)? {
            return Ok(found);
        }

        // A concurrent insert of the same name is fine: the caller already
        // has the name it wants.
        let inserted = self.catalog.register(name)?;
        info!(exercise = name, inserted, "Auto-registered new exercise");

        Ok(Resolution {
            name: name.to_string(),
            kind: MatchKind::Registered { inserted },
        })
    }

    /// Read-only variant: stages 1-3, `None` instead of registering
    pub fn lookup(&self, raw: &str) -> Result<Option<Resolution>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        self.match_trimmed(raw.trim())
    }

    fn match_trimmed(&self, name: &str) -> Result<Option<Resolution>> {
        if let Some(canonical) = self.catalog.find_by_name(name)? {
            return Ok(Some(Resolution {
                name: canonical,
                kind: MatchKind::Exact,
            }));
        }

        if let Some(canonical) = self.catalog.find_by_alias(name)? {
            info!(raw = name, canonical = %canonical, "Resolved via alias");
            return Ok(Some(Resolution {
                name: canonical,
                kind: MatchKind::Alias,
            }));
        }

        self.match_fuzzy(name)
    }

    fn match_fuzzy(&self, name: &str) -> Result<Option<Resolution>> {
        let Some(hint) = muscle_hint(name) else {
            let best = self
                .catalog
                .similar(name, ACCEPT_THRESHOLD, 1)?
                .into_iter()
                .next();

            return Ok(best.map(|c| {
                warn!(raw = name, similarity = c.similarity, canonical = %c.name, "Resolved via trigram");
                Resolution {
                    kind: MatchKind::Fuzzy {
                        similarity: c.similarity,
                        adjusted: c.similarity,
                        hint: None,
                    },
                    name: c.name,
                }
            }));
        };

        let candidates = self.catalog.similar(name, PREFILTER_THRESHOLD, CANDIDATE_LIMIT)?;
        let Some((best, adjusted)) = rerank(&candidates, hint) else {
            debug!(raw = name, hint = %hint, "No trigram candidates");
            return Ok(None);
        };

        if adjusted < ACCEPT_THRESHOLD {
            debug!(raw = name, best = %best.name, adjusted, "Best trigram candidate below threshold");
            return Ok(None);
        }

        warn!(
            raw = name,
            similarity = best.similarity,
            muscle = %hint,
            adjusted,
            canonical = %best.name,
            "Resolved via trigram with muscle hint"
        );

        Ok(Some(Resolution {
            name: best.name.clone(),
            kind: MatchKind::Fuzzy {
                similarity: best.similarity,
                adjusted,
                hint: Some(hint),
            },
        }))
    }
}

/// Highest adjusted score; earlier candidates win ties
fn rerank(candidates: &[Candidate], hint: MuscleGroup) -> Option<(&Candidate, f64)> {
    let mut best: Option<(&Candidate, f64)> = None;
    for candidate in candidates {
        let score = candidate.adjusted(hint);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Scripted catalog recording every call made against it
    #[derive(Default)]
    struct FakeCatalog {
        names: Vec<&'static str>,
        aliases: Vec<(&'static str, &'static str)>,
        candidates: Vec<Candidate>,
        registered: RefCell<Vec<String>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeCatalog {
        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ExerciseCatalog for FakeCatalog {
        fn find_by_name(&self, name: &str) -> Result<Option<String>> {
            self.calls.borrow_mut().push(format!("name:{}", name));
            Ok(self
                .names
                .iter()
                .find(|n| n.to_lowercase() == name.to_lowercase())
                .map(|n| n.to_string()))
        }

        fn find_by_alias(&self, alias: &str) -> Result<Option<String>> {
            self.calls.borrow_mut().push(format!("alias:{}", alias));
            Ok(self
                .aliases
                .iter()
                .find(|(a, _)| a.to_lowercase() == alias.to_lowercase())
                .map(|(_, n)| n.to_string()))
        }

        fn similar(&self, query: &str, min_similarity: f64, limit: usize) -> Result<Vec<Candidate>> {
            self.calls
                .borrow_mut()
                .push(format!("similar:{}:{}:{}", query, min_similarity, limit));
            Ok(self
                .candidates
                .iter()
                .filter(|c| c.similarity >= min_similarity)
                .take(limit)
                .cloned()
                .collect())
        }

        fn register(&self, name: &str) -> Result<bool> {
            self.calls.borrow_mut().push(format!("register:{}", name));
            let mut registered = self.registered.borrow_mut();
            if registered.iter().any(|n| n == name) {
                return Ok(false);
            }
            registered.push(name.to_string());
            Ok(true)
        }
    }

    fn candidate(name: &str, group: Option<MuscleGroup>, similarity: f64) -> Candidate {
        Candidate {
            name: name.to_string(),
            muscle_group: group,
            similarity,
        }
    }

    #[test]
    fn test_exact_match_returns_catalog_casing() {
        let catalog = FakeCatalog {
            names: vec!["Barbell Bench Press"],
            ..Default::default()
        };
        let resolver = NameResolver::new(&catalog);

        let resolution = resolver.resolve_detailed("  barbell BENCH press ").unwrap();
        assert_eq!(resolution.name, "Barbell Bench Press");
        assert_eq!(resolution.kind, MatchKind::Exact);
        assert_eq!(catalog.call_count(), 1);
    }

    #[test]
    fn test_alias_match() {
        let catalog = FakeCatalog {
            names: vec!["Barbell Bench Press"],
            aliases: vec![("Bench", "Barbell Bench Press")],
            ..Default::default()
        };
        let resolver = NameResolver::new(&catalog);

        let resolution = resolver.resolve_detailed("bench").unwrap();
        assert_eq!(resolution.name, "Barbell Bench Press");
        assert_eq!(resolution.kind, MatchKind::Alias);
    }

    #[test]
    fn test_blank_input_untouched_without_lookups() {
        let catalog = FakeCatalog::default();
        let resolver = NameResolver::new(&catalog);

        assert_eq!(resolver.resolve("").unwrap(), "");
        assert_eq!(resolver.resolve("   ").unwrap(), "   ");
        assert_eq!(catalog.call_count(), 0);
        assert!(catalog.registered.borrow().is_empty());
    }

    #[test]
    fn test_muscle_bonus_beats_higher_raw_similarity() {
        let catalog = FakeCatalog {
            candidates: vec![
                candidate("Machine Chest Press", Some(MuscleGroup::Chest), 0.45),
                candidate("Dumbbell Shoulder Press", Some(MuscleGroup::Shoulders), 0.40),
            ],
            ..Default::default()
        };
        let resolver = NameResolver::new(&catalog);

        let resolution = resolver.resolve_detailed("shoulder press machine").unwrap();
        assert_eq!(resolution.name, "Dumbbell Shoulder Press");
        match resolution.kind {
            MatchKind::Fuzzy { similarity, adjusted, hint } => {
                assert_eq!(similarity, 0.40);
                assert!((adjusted - 0.55).abs() < 1e-9);
                assert_eq!(hint, Some(MuscleGroup::Shoulders));
            }
            other => panic!("unexpected match kind {:?}", other),
        }
        assert!(catalog.registered.borrow().is_empty());
    }

    #[test]
    fn test_hint_fetches_prefiltered_candidates() {
        let catalog = FakeCatalog::default();
        let resolver = NameResolver::new(&catalog);

        resolver.resolve("weird chest thing").unwrap();
        let calls = catalog.calls.borrow();
        assert_eq!(calls[2], "similar:weird chest thing:0.3:10");
    }

    #[test]
    fn test_without_hint_takes_single_best() {
        let catalog = FakeCatalog {
            candidates: vec![
                candidate("Goblet Squat", Some(MuscleGroup::Legs), 0.52),
                candidate("Front Squat", Some(MuscleGroup::Legs), 0.47),
            ],
            ..Default::default()
        };
        let resolver = NameResolver::new(&catalog);

        let resolution = resolver.resolve_detailed("goblet squats").unwrap();
        assert_eq!(resolution.name, "Goblet Squat");
        assert_eq!(catalog.calls.borrow()[2], "similar:goblet squats:0.4:1");
    }

    #[test]
    fn test_without_hint_below_threshold_registers() {
        let catalog = FakeCatalog {
            candidates: vec![candidate("Goblet Squat", Some(MuscleGroup::Legs), 0.35)],
            ..Default::default()
        };
        let resolver = NameResolver::new(&catalog);

        let resolution = resolver.resolve_detailed("sissy squat").unwrap();
        assert_eq!(resolution.name, "sissy squat");
        assert_eq!(resolution.kind, MatchKind::Registered { inserted: true });
    }

    #[test]
    fn test_hint_without_bonus_below_threshold_registers() {
        let catalog = FakeCatalog {
            candidates: vec![candidate("Cable Crossover", Some(MuscleGroup::Chest), 0.32)],
            ..Default::default()
        };
        let resolver = NameResolver::new(&catalog);

        let resolution = resolver.resolve_detailed("cable back extension").unwrap();
        assert_eq!(resolution.kind, MatchKind::Registered { inserted: true });
        assert_eq!(catalog.registered.borrow().as_slice(), ["cable back extension"]);
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let catalog = FakeCatalog {
            candidates: vec![
                candidate("Leg Curl", Some(MuscleGroup::Legs), 0.36),
                candidate("Leg Extension", Some(MuscleGroup::Legs), 0.36),
            ],
            ..Default::default()
        };
        let resolver = NameResolver::new(&catalog);

        assert_eq!(resolver.resolve("leg machine").unwrap(), "Leg Curl");
    }

    #[test]
    fn test_registration_trims_and_reports_race() {
        let catalog = FakeCatalog::default();
        let resolver = NameResolver::new(&catalog);

        let first = resolver.resolve_detailed("  My Custom Exercise ").unwrap();
        assert_eq!(first.name, "My Custom Exercise");
        assert_eq!(first.kind, MatchKind::Registered { inserted: true });

        let second = resolver.resolve_detailed("My Custom Exercise").unwrap();
        assert_eq!(second.name, "My Custom Exercise");
        assert_eq!(second.kind, MatchKind::Registered { inserted: false });
        assert_eq!(catalog.registered.borrow().len(), 1);
    }

    #[test]
    fn test_lookup_never_registers() {
        let catalog = FakeCatalog::default();
        let resolver = NameResolver::new(&catalog);

        assert!(resolver.lookup("unknown lift").unwrap().is_none());
        assert!(resolver.lookup(" ").unwrap().is_none());
        assert!(catalog.registered.borrow().is_empty());
    }

    #[test]
    fn test_muscle_hint_keyword_order() {
        assert_eq!(muscle_hint("Rear Delt Fly"), Some(MuscleGroup::Shoulders));
        // "shoulder" is checked before "chest" regardless of position
        assert_eq!(muscle_hint("chest to shoulder press"), Some(MuscleGroup::Shoulders));
        assert_eq!(muscle_hint("Lat Pulldown"), Some(MuscleGroup::Back));
        assert_eq!(muscle_hint("hamstring curl"), Some(MuscleGroup::Legs));
        assert_eq!(muscle_hint("TRICEP rope"), Some(MuscleGroup::Arms));
        assert_eq!(muscle_hint("ab crunch"), Some(MuscleGroup::Core));
        assert_eq!(muscle_hint("squat"), None);
    }
}
