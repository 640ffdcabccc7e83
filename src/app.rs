//! Folio Gallery App
//!
//! Loads the bundled project feed and mounts the gallery.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::Gallery;
use crate::config::GalleryConfig;
use crate::context::GalleryContext;
use crate::models::parse_feed;
use crate::sorting::{arrange, Filter, SortMode};
use crate::store::GalleryState;

/// Static project feed bundled at build time
const FEED: &str = include_str!("../data/projects.json");

#[component]
pub fn App() -> impl IntoView {
    let (config, projects) = match parse_feed(FEED) {
        Ok(feed) => feed,
        Err(err) => {
            log::error!("[APP] project feed rejected: {}", err);
            (GalleryConfig::default(), Vec::new())
        }
    };
    log::info!("[APP] loaded {} projects", projects.len());

    let projects = arrange(&projects, SortMode::default(), &Filter::All, 0);

    // Provide state to all children
    provide_context(Store::new(GalleryState::new(projects)));
    provide_context(GalleryContext::new(config));

    view! {
        <main class="portfolio">
            <h1>"Projects"</h1>
            <Gallery />
        </main>
    }
}
