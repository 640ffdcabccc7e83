//! Sorting & Filtering
//!
//! Pure arrangement of the project list. Filtering never removes a project:
//! non-matching ones are flagged `display = false` and moved behind the
//! visible ones so their cards can fade instead of unmounting.
//!
//! Shuffling is seeded: the same seed gives the same order, so changing the
//! filter while shuffled keeps the cards where they are.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::models::Project;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Relevance,
    Newest,
    Title,
    Shuffle,
    /// Order left by drag-to-reorder
    Manual,
}

impl SortMode {
    /// Modes offered by the controls; `Manual` is entered by dragging
    pub const CHOICES: [SortMode; 4] = [Self::Relevance, Self::Newest, Self::Title, Self::Shuffle];

    pub fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::Newest => "Newest",
            Self::Title => "A–Z",
            Self::Shuffle => "Shuffle",
            Self::Manual => "Custom",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Projects without a client
    Personal,
    Client,
    /// Substring of any tool or tag, ignoring case and whitespace
    Keyword(String),
}

impl Filter {
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Personal => project.is_personal(),
            Self::Client => !project.is_personal(),
            Self::Keyword(keyword) => {
                let needle = smoosh(keyword);
                project
                    .tools
                    .iter()
                    .chain(&project.tags)
                    .any(|word| smoosh(word).contains(&needle))
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Personal => "Personal",
            Self::Client => "Client work",
            Self::Keyword(keyword) => keyword,
        }
    }

    /// Filter after clicking `self` while `current` is active; clicking the
    /// active filter again switches back to `All`
    pub fn toggled(self, current: &Filter) -> Filter {
        if self == *current {
            Filter::All
        } else {
            self
        }
    }
}

fn smoosh(word: &str) -> String {
    word.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

/// Sort and filter `projects`. Shown projects come first, hidden ones
/// follow, both in `sort` order. `seed` only matters
/// for [`SortMode::Shuffle`].
pub fn arrange(projects: &[Project], sort: SortMode, filter: &Filter, seed: u64) -> Vec<Project> {
    let mut ordered = projects.to_vec();
    match sort {
        SortMode::Relevance => ordered.sort_by(|a, b| b.relevance.total_cmp(&a.relevance)),
        SortMode::Newest => ordered.sort_by(newest_first),
        SortMode::Title => ordered.sort_by_key(|p| p.title.to_lowercase()),
        SortMode::Shuffle => {
            // Independent of the current arrangement
            ordered.sort_by(|a, b| a.id.cmp(&b.id));
            shuffle(&mut ordered, seed);
        }
        SortMode::Manual => {}
    }

    let (mut shown, hidden): (Vec<Project>, Vec<Project>) = ordered
        .into_iter()
        .map(|mut p| {
            p.display = filter.matches(&p);
            p
        })
        .partition(|p| p.display);
    shown.extend(hidden);
    shown
}

// Ongoing projects (no end date) count as the newest.
fn newest_first(a: &Project, b: &Project) -> Ordering {
    match (a.end_date, b.end_date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    }
}

/// Deterministic shuffle for `seed`
pub fn shuffle<T>(items: &mut [T], seed: u64) {
    items.shuffle(&mut StdRng::seed_from_u64(seed));
}

/// Swap two projects by id. Returns false if either is missing.
pub fn swap_projects(projects: &mut [Project], a: &str, b: &str) -> bool {
    let ia = projects.iter().position(|p| p.id == a);
    let ib = projects.iter().position(|p| p.id == b);
    match (ia, ib) {
        (Some(ia), Some(ib)) => {
            projects.swap(ia, ib);
            true
        }
        _ => false,
    }
}

/// Every tool and tag used by any project, sorted and deduplicated
pub fn keywords(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.tools.iter().chain(&p.tags).cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
