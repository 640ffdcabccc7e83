//! Folio Gallery Entry Point

mod animations;
mod app;
mod components;
mod config;
mod context;
mod dom;
mod error;
mod markdown;
mod models;
mod reconcile;
mod sorting;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    let level = if cfg!(debug_assertions) { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    rolling_logger::init(level, rolling_logger::DEFAULT_CAPACITY);

    // Flush the recent log lines before the panic message
    std::panic::set_hook(Box::new(|info| {
        rolling_logger::dump();
        console_error_panic_hook::hook(info);
    }));

    mount_to_body(App);
}
