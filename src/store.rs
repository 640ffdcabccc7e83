//! Gallery State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use leptos_dragdrop::Rect;
use reactive_stores::Store;

use crate::models::Project;
use crate::sorting::{self, Filter, SortMode};

/// Gallery state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct GalleryState {
    /// Every project in display order; hidden ones trail the shown ones
    pub projects: Vec<Project>,
    pub sort: SortMode,
    pub filter: Filter,
    /// Id of the project open in the overlay
    pub selected: Option<String>,
    /// Card rect the overlay expands from
    pub opened_from: Option<Rect>,
    /// Seed of the current shuffle; only the Shuffle button changes it
    pub shuffle_seed: u64,
}

impl GalleryState {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects, ..Default::default() }
    }
}

/// Type alias for the store
pub type GalleryStore = Store<GalleryState>;

/// Get the gallery store from context
pub fn use_gallery_store() -> GalleryStore {
    expect_context::<GalleryStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Re-sort and re-filter the projects
pub fn store_arrange(store: &GalleryStore, sort: SortMode, filter: Filter) {
    let seed = store.shuffle_seed().get_untracked();
    let arranged = store
        .projects()
        .with_untracked(|projects| sorting::arrange(projects, sort, &filter, seed));
    log::debug!("[STORE] arrange {:?} / {:?}", sort, filter);
    store.sort().set(sort);
    store.filter().set(filter);
    store.projects().set(arranged);
}

/// Pick a new shuffle seed; the next shuffled arrangement differs
pub fn store_reseed(store: &GalleryStore) {
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    store.shuffle_seed().set(seed);
}

/// Swap two projects by id; the order becomes manual
pub fn store_swap(store: &GalleryStore, a: &str, b: &str) -> bool {
    let swapped = sorting::swap_projects(&mut store.projects().write(), a, b);
    if swapped {
        store.sort().set(SortMode::Manual);
    } else {
        log::warn!("[STORE] swap {} <-> {}: unknown project", a, b);
    }
    swapped
}

/// Open a project in the overlay
pub fn store_open(store: &GalleryStore, id: String, from: Option<Rect>) {
    store.opened_from().set(from);
    store.selected().set(Some(id));
}

pub fn store_close(store: &GalleryStore) {
    store.selected().set(None);
}

/// Find a project by id
pub fn find_project(store: &GalleryStore, id: &str) -> Option<Project> {
    store
        .projects()
        .with_untracked(|projects| projects.iter().find(|p| p.id == id).cloned())
}
