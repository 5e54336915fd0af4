//! Search over the cached drawings and RFIs
//!
//! Queries may start with a mode prefix:
//!
//! - `?term` - RFIs only (`?` alone lists every RFI)
//! - `*term` - favorited drawings only
//! - `@term` - drawings whose discipline name matches `term`
//! - empty  - recently opened drawings
//! - anything else - drawings and RFIs together
//!
//! Drawings come back grouped by discipline, groups ordered by the
//! discipline's taxonomy index. RFIs form one trailing group. At most
//! [`MAX_RESULTS`] items are returned, filled group by group.

pub mod fuzzy;
pub mod natural;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::Serialize;

use crate::entities::{DisciplineMap, Drawing, Rfi};

pub use fuzzy::{fuzzy_match, fuzzy_match_any};
pub use natural::natural_cmp;

/// Hard cap on the number of items a search returns
pub const MAX_RESULTS: usize = 50;

/// Group label for drawings without a resolvable discipline
pub const GENERAL_DISCIPLINE: &str = "General";

/// Group label for RFI results
pub const RFI_GROUP: &str = "RFIs";

/// Query mode selected by the leading character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode<'a> {
    Rfis(&'a str),
    Favorites(&'a str),
    Discipline(&'a str),
    Recents,
    Combined(&'a str),
}

impl<'a> QueryMode<'a> {
    pub fn parse(query: &'a str) -> Self {
        let query = query.trim();
        if let Some(rest) = query.strip_prefix('?') {
            QueryMode::Rfis(rest.trim())
        } else if let Some(rest) = query.strip_prefix('*') {
            QueryMode::Favorites(rest.trim())
        } else if let Some(rest) = query.strip_prefix('@') {
            QueryMode::Discipline(rest.trim())
        } else if query.is_empty() {
            QueryMode::Recents
        } else {
            QueryMode::Combined(query)
        }
    }
}

/// Everything a search reads; a snapshot of the cache plus user state
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub drawings: &'a [Drawing],
    pub disciplines: &'a DisciplineMap,
    pub favorites: &'a HashSet<String>,
    /// Most recent first
    pub recents: &'a [String],
    pub rfis: &'a [Rfi],
}

/// A drawing in a result list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawingHit {
    #[serde(flatten)]
    pub drawing: Drawing,
    /// Resolved discipline name the drawing is grouped under
    pub group: String,
    pub favorite: bool,
    pub recent: bool,
}

/// One result item, tagged by type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchItem {
    Drawing(DrawingHit),
    Rfi(Rfi),
}

/// What a result group contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Discipline,
    Rfi,
}

/// A labelled run of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultGroup {
    pub label: String,
    pub kind: GroupKind,
    pub items: Vec<SearchItem>,
}

/// Grouped, ordered, capped search output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub groups: Vec<ResultGroup>,
}

impl SearchResults {
    /// Total number of items across all groups
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.items.is_empty())
    }

    /// Items in display order, each with its group label
    pub fn items(&self) -> impl Iterator<Item = (&str, &SearchItem)> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter().map(move |item| (g.label.as_str(), item)))
    }
}

/// Run a query against a cache snapshot
pub fn search(query: &str, ctx: &SearchContext<'_>) -> SearchResults {
    let mode = QueryMode::parse(query);
    tracing::trace!(?mode, drawings = ctx.drawings.len(), rfis = ctx.rfis.len(), "search");

    let resolved: Vec<ResolvedDrawing<'_>> = ctx
        .drawings
        .iter()
        .map(|d| ResolvedDrawing::new(d, ctx.disciplines))
        .collect();

    let (drawings, rfis): (Vec<&ResolvedDrawing<'_>>, Vec<&Rfi>) = match mode {
        QueryMode::Rfis(term) => (Vec::new(), filter_rfis(ctx.rfis, term)),
        QueryMode::Favorites(term) => (
            resolved
                .iter()
                .filter(|r| ctx.favorites.contains(&r.drawing.num) && r.matches(term))
                .collect(),
            Vec::new(),
        ),
        QueryMode::Discipline(term) => (
            resolved
                .iter()
                .filter(|r| fuzzy_match(&r.group, term))
                .collect(),
            Vec::new(),
        ),
        QueryMode::Recents => {
            let recent: HashSet<&str> = ctx.recents.iter().map(String::as_str).collect();
            (
                resolved
                    .iter()
                    .filter(|r| recent.contains(r.drawing.num.as_str()))
                    .collect(),
                Vec::new(),
            )
        }
        QueryMode::Combined(term) => (
            resolved.iter().filter(|r| r.matches(term)).collect(),
            filter_rfis(ctx.rfis, term),
        ),
    };

    let mut groups = group_drawings(drawings, ctx);
    if !rfis.is_empty() {
        groups.push(ResultGroup {
            label: RFI_GROUP.to_string(),
            kind: GroupKind::Rfi,
            items: rfis.into_iter().cloned().map(SearchItem::Rfi).collect(),
        });
    }

    SearchResults {
        groups: cap_groups(groups, MAX_RESULTS),
    }
}

/// A drawing with its discipline already resolved
struct ResolvedDrawing<'a> {
    drawing: &'a Drawing,
    group: String,
    sort_index: i64,
}

impl<'a> ResolvedDrawing<'a> {
    fn new(drawing: &'a Drawing, disciplines: &DisciplineMap) -> Self {
        let key = drawing.discipline.map(|id| id.to_string());
        let group = key
            .as_deref()
            .and_then(|k| disciplines.name_of(k))
            .or(drawing.discipline_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(GENERAL_DISCIPLINE)
            .to_string();

        let sort_index = match key.as_deref() {
            Some(k) if disciplines.contains_key(k) => disciplines.index_of(k),
            _ => disciplines.index_of_name(&group),
        };

        Self {
            drawing,
            group,
            sort_index,
        }
    }

    fn matches(&self, term: &str) -> bool {
        fuzzy_match_any(
            [
                self.drawing.num.as_str(),
                self.drawing.title.as_str(),
                self.group.as_str(),
            ],
            term,
        )
    }
}

fn filter_rfis<'a>(rfis: &'a [Rfi], term: &str) -> Vec<&'a Rfi> {
    let mut matched: Vec<&Rfi> = rfis
        .iter()
        .filter(|rfi| fuzzy_match_any([rfi.number.as_str(), rfi.subject.as_str()], term))
        .collect();
    matched.sort_by(|a, b| natural_cmp(&a.number, &b.number).then(a.id.cmp(&b.id)));
    matched
}

fn group_drawings(drawings: Vec<&ResolvedDrawing<'_>>, ctx: &SearchContext<'_>) -> Vec<ResultGroup> {
    let recent: HashSet<&str> = ctx.recents.iter().map(String::as_str).collect();
    let mut by_group: HashMap<&str, (i64, Vec<&ResolvedDrawing<'_>>)> = HashMap::new();

    for resolved in drawings {
        let entry = by_group
            .entry(resolved.group.as_str())
            .or_insert((resolved.sort_index, Vec::new()));
        entry.0 = entry.0.min(resolved.sort_index);
        entry.1.push(resolved);
    }

    let mut ordered: Vec<(&str, (i64, Vec<&ResolvedDrawing<'_>>))> = by_group.into_iter().collect();
    ordered.sort_by(|a, b| (a.1).0.cmp(&(b.1).0).then_with(|| a.0.cmp(b.0)));

    ordered
        .into_iter()
        .map(|(label, (_, mut members))| {
            members.sort_by(|a, b| {
                natural_cmp(&a.drawing.num, &b.drawing.num).then(a.drawing.id.cmp(&b.drawing.id))
            });
            ResultGroup {
                label: label.to_string(),
                kind: GroupKind::Discipline,
                items: members
                    .into_iter()
                    .map(|r| {
                        SearchItem::Drawing(DrawingHit {
                            drawing: r.drawing.clone(),
                            group: r.group.clone(),
                            favorite: ctx.favorites.contains(&r.drawing.num),
                            recent: recent.contains(r.drawing.num.as_str()),
                        })
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Fill groups in order until `cap` items are taken; later groups may be cut entirely
fn cap_groups(groups: Vec<ResultGroup>, cap: usize) -> Vec<ResultGroup> {
    let mut remaining = cap;
    let mut out = Vec::with_capacity(groups.len());

    for mut group in groups {
        if remaining == 0 {
            break;
        }
        if group.items.is_empty() {
            continue;
        }
        group.items.truncate(remaining);
        remaining -= group.items.len();
        out.push(group);
    }

    out
}

/// Monotonic request tokens for discarding superseded searches
///
/// Callers take a token before searching and only commit results while the
/// token is still the latest one issued.
#[derive(Debug, Default)]
pub struct SearchTokens {
    latest: AtomicU64,
}

impl SearchTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding all earlier ones
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, AtomicOrdering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(AtomicOrdering::SeqCst) == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaxonomyEntry;

    fn disciplines() -> DisciplineMap {
        [
            ("1", "Architectural", 0),
            ("2", "Structural", 1),
            ("3", "Mechanical", 2),
        ]
        .into_iter()
        .map(|(k, n, i)| (k.to_string(), TaxonomyEntry::new(n, i)))
        .collect()
    }

    fn drawings() -> Vec<Drawing> {
        vec![
            Drawing::new(1, "A-10", "Door Schedule").with_discipline(Some(1), None),
            Drawing::new(2, "A-2", "Floor Plan").with_discipline(Some(1), None),
            Drawing::new(3, "S-101", "Foundation Plan").with_discipline(Some(2), None),
            Drawing::new(4, "M-201", "Level 2 HVAC").with_discipline(Some(3), None),
            Drawing::new(5, "M-101", "Mechanical Floor Plan").with_discipline(Some(3), None),
            Drawing::new(6, "G-001", "Cover Sheet"),
        ]
    }

    fn rfis() -> Vec<Rfi> {
        vec![
            Rfi::new(10, "12", "Beam size at grid C", "open"),
            Rfi::new(11, "2", "Floor finish", "closed"),
            Rfi::new(12, "7", "Duct routing", "open"),
            Rfi::new(13, "1", "Plan dimension conflict", "closed"),
            Rfi::new(14, "30", "Door hardware", "open"),
        ]
    }

    struct Fixture {
        drawings: Vec<Drawing>,
        disciplines: DisciplineMap,
        favorites: HashSet<String>,
        recents: Vec<String>,
        rfis: Vec<Rfi>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                drawings: drawings(),
                disciplines: disciplines(),
                favorites: ["S-101".to_string(), "A-2".to_string()].into_iter().collect(),
                recents: vec!["M-201".into(), "A-10".into()],
                rfis: rfis(),
            }
        }

        fn ctx(&self) -> SearchContext<'_> {
            SearchContext {
                drawings: &self.drawings,
                disciplines: &self.disciplines,
                favorites: &self.favorites,
                recents: &self.recents,
                rfis: &self.rfis,
            }
        }
    }

    fn drawing_nums(results: &SearchResults) -> Vec<String> {
        results
            .items()
            .filter_map(|(_, item)| match item {
                SearchItem::Drawing(hit) => Some(hit.drawing.num.clone()),
                SearchItem::Rfi(_) => None,
            })
            .collect()
    }

    fn labels(results: &SearchResults) -> Vec<&str> {
        results.groups.iter().map(|g| g.label.as_str()).collect()
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(QueryMode::parse("?"), QueryMode::Rfis(""));
        assert_eq!(QueryMode::parse("? beam"), QueryMode::Rfis("beam"));
        assert_eq!(QueryMode::parse("*a1"), QueryMode::Favorites("a1"));
        assert_eq!(QueryMode::parse("@mech"), QueryMode::Discipline("mech"));
        assert_eq!(QueryMode::parse("   "), QueryMode::Recents);
        assert_eq!(QueryMode::parse("floor"), QueryMode::Combined("floor"));
    }

    #[test]
    fn test_rfi_mode_lists_all_sorted_numerically() {
        let fx = Fixture::new();
        let results = search("?", &fx.ctx());

        assert_eq!(results.groups.len(), 1);
        assert_eq!(results.groups[0].label, RFI_GROUP);
        assert_eq!(results.groups[0].kind, GroupKind::Rfi);
        let numbers: Vec<_> = results
            .items()
            .map(|(_, item)| match item {
                SearchItem::Rfi(rfi) => rfi.number.clone(),
                SearchItem::Drawing(_) => panic!("drawing in RFI mode"),
            })
            .collect();
        assert_eq!(numbers, vec!["1", "2", "7", "12", "30"]);
    }

    #[test]
    fn test_rfi_mode_filters_on_number_and_subject() {
        let fx = Fixture::new();
        let results = search("?door", &fx.ctx());
        assert_eq!(results.len(), 1);

        let results = search("?12", &fx.ctx());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_discipline_mode_ignores_number_and_title() {
        let fx = Fixture::new();
        let results = search("@mech", &fx.ctx());

        assert_eq!(labels(&results), vec!["Mechanical"]);
        assert_eq!(drawing_nums(&results), vec!["M-101", "M-201"]);
    }

    #[test]
    fn test_favorites_mode() {
        let fx = Fixture::new();
        let results = search("*", &fx.ctx());
        assert_eq!(drawing_nums(&results), vec!["A-2", "S-101"]);
        assert!(results.items().all(|(_, item)| matches!(
            item,
            SearchItem::Drawing(hit) if hit.favorite
        )));

        let results = search("*s1", &fx.ctx());
        assert_eq!(drawing_nums(&results), vec!["S-101"]);
    }

    #[test]
    fn test_empty_query_returns_recents_grouped() {
        let fx = Fixture::new();
        let results = search("", &fx.ctx());

        assert_eq!(labels(&results), vec!["Architectural", "Mechanical"]);
        assert_eq!(drawing_nums(&results), vec!["A-10", "M-201"]);
        assert!(results
            .items()
            .all(|(_, item)| matches!(item, SearchItem::Drawing(hit) if hit.recent)));
    }

    #[test]
    fn test_combined_search_groups_drawings_then_rfis() {
        let fx = Fixture::new();
        let results = search("floor", &fx.ctx());

        assert_eq!(labels(&results), vec!["Architectural", "Mechanical", RFI_GROUP]);
        assert_eq!(drawing_nums(&results), vec!["A-2", "M-101"]);
        let last = results.groups.last().unwrap();
        assert_eq!(last.items.len(), 1);
    }

    #[test]
    fn test_combined_search_matches_discipline_name() {
        let fx = Fixture::new();
        let results = search("structural", &fx.ctx());
        assert_eq!(drawing_nums(&results), vec!["S-101"]);
    }

    #[test]
    fn test_unknown_discipline_groups_last_under_general() {
        let fx = Fixture::new();
        let results = search("g", &fx.ctx());
        let last_drawing_group = results
            .groups
            .iter()
            .filter(|g| g.kind == GroupKind::Discipline)
            .last()
            .unwrap();
        assert_eq!(last_drawing_group.label, GENERAL_DISCIPLINE);
    }

    #[test]
    fn test_discipline_name_fallback_when_map_is_stale() {
        let drawings = vec![Drawing::new(1, "E-1", "Lighting").with_discipline(Some(99), Some("Electrical"))];
        let disciplines = disciplines();
        let empty = HashSet::new();
        let ctx = SearchContext {
            drawings: &drawings,
            disciplines: &disciplines,
            favorites: &empty,
            recents: &[],
            rfis: &[],
        };

        let results = search("@elec", &ctx);
        assert_eq!(labels(&results), vec!["Electrical"]);
    }

    #[test]
    fn test_ties_in_sort_index_break_alphabetically() {
        let drawings = vec![
            Drawing::new(1, "P-1", "Riser").with_discipline(None, Some("Plumbing")),
            Drawing::new(2, "C-1", "Grading").with_discipline(None, Some("Civil")),
        ];
        let disciplines = DisciplineMap::new();
        let empty = HashSet::new();
        let ctx = SearchContext {
            drawings: &drawings,
            disciplines: &disciplines,
            favorites: &empty,
            recents: &[],
            rfis: &[],
        };

        let results = search("1", &ctx);
        assert_eq!(labels(&results), vec!["Civil", "Plumbing"]);
    }

    #[test]
    fn test_results_are_capped_and_later_groups_cut() {
        let drawings: Vec<Drawing> = (0..60)
            .map(|i| Drawing::new(i, format!("A-{}", i), "Sheet").with_discipline(Some(1), None))
            .collect();
        let rfis: Vec<Rfi> = (0..10)
            .map(|i| Rfi::new(1000 + i, i.to_string(), "Sheet question", "open"))
            .collect();
        let disciplines = disciplines();
        let empty = HashSet::new();
        let ctx = SearchContext {
            drawings: &drawings,
            disciplines: &disciplines,
            favorites: &empty,
            recents: &[],
            rfis: &rfis,
        };

        let results = search("sheet", &ctx);
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(labels(&results), vec!["Architectural"]);

        for query in ["", "?", "*", "@", "a", "s"] {
            assert!(search(query, &ctx).len() <= MAX_RESULTS);
        }
    }

    #[test]
    fn test_search_tokens_supersede() {
        let tokens = SearchTokens::new();
        let first = tokens.next();
        assert!(tokens.is_current(first));
        let second = tokens.next();
        assert!(second > first);
        assert!(!tokens.is_current(first));
        assert!(tokens.is_current(second));
    }
}
