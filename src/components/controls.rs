//! Gallery Controls Component
//!
//! Sort buttons, filter buttons and the keyword select. Every action locks
//! the controls for the debounce window so reorder animations can finish.
//! Clicking the active filter again clears it; clicking Shuffle always
//! deals a new order.

use leptos::prelude::*;

use crate::context::use_gallery;
use crate::store::GalleryStateStoreFields;
use crate::dom;
use crate::sorting::{keywords, Filter, SortMode};
use crate::store::{store_arrange, store_reseed, use_gallery_store};

#[component]
pub fn Controls() -> impl IntoView {
    let store = use_gallery_store();
    let ctx = use_gallery();
    let locked = ctx.controls_locked;
    let choices = Memo::new(move |_| store.projects().with(|projects| keywords(projects)));

    let apply = move |sort: SortMode, filter: Filter| {
        if locked.get_untracked() {
            return;
        }
        ctx.lock_controls();
        store_arrange(&store, sort, filter);
    };

    let on_sort = move |mode: SortMode| {
        if locked.get_untracked() {
            return;
        }
        if mode == SortMode::Shuffle {
            store_reseed(&store);
        } else if store.sort().get_untracked() == mode {
            return;
        }
        apply(mode, store.filter().get_untracked());
    };

    let on_filter = move |clicked: Filter| {
        let current = store.filter().get_untracked();
        let next = clicked.toggled(&current);
        if next != current {
            apply(store.sort().get_untracked(), next);
        }
    };

    let sort_buttons = SortMode::CHOICES
        .into_iter()
        .map(|mode| {
            let class = move || {
                let active = store.sort().get() == mode;
                dom::merge_classes(["control", "sort", if active { "active" } else { "" }])
            };
            view! {
                <button
                    type="button"
                    class=class
                    disabled=move || locked.get()
                    on:click=move |_| on_sort(mode)
                >
                    {mode.label()}
                </button>
            }
        })
        .collect_view();

    let filter_buttons = [Filter::All, Filter::Personal, Filter::Client]
        .into_iter()
        .map(|filter| {
            let label = filter.label().to_string();
            let active = {
                let filter = filter.clone();
                move || store.filter().with(|current| *current == filter)
            };
            let class = {
                let active = active.clone();
                move || dom::merge_classes(["control", "filter", if active() { "active" } else { "" }])
            };
            view! {
                <button
                    type="button"
                    class=class
                    aria-pressed=move || active().to_string()
                    disabled=move || locked.get()
                    on:click=move |_| on_filter(filter.clone())
                >
                    {label}
                </button>
            }
        })
        .collect_view();

    let selected_keyword = move || match store.filter().get() {
        Filter::Keyword(keyword) => keyword,
        _ => String::new(),
    };

    view! {
        <nav class="gallery-controls" aria-label="Sort and filter projects">
            <div class="control-group">{sort_buttons}</div>
            <div class="control-group">
                {filter_buttons}
                <select
                    class="control keyword-filter"
                    disabled=move || locked.get()
                    prop:value=selected_keyword
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        let filter = if value.is_empty() { Filter::All } else { Filter::Keyword(value) };
                        on_filter(filter);
                    }
                >
                    <option value="">"Any tool or tag"</option>
                    <For
                        each=move || choices.get()
                        key=|keyword: &String| keyword.clone()
                        children=move |keyword: String| view! { <option value=keyword.clone()>{keyword.clone()}</option> }
                    />
                </select>
            </div>
        </nav>
    }
}
