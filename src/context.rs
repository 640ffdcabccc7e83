//! Gallery Context
//!
//! Settings and control state provided via Leptos Context API.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::GalleryConfig;

/// Gallery-wide settings and signals provided via context
#[derive(Clone, Copy)]
pub struct GalleryContext {
    config: StoredValue<GalleryConfig>,
    /// Controls ignore input while set - read
    pub controls_locked: ReadSignal<bool>,
    /// Controls ignore input while set - write
    set_controls_locked: WriteSignal<bool>,
}

impl GalleryContext {
    pub fn new(config: GalleryConfig) -> Self {
        let (controls_locked, set_controls_locked) = signal(false);
        Self { config: StoredValue::new(config), controls_locked, set_controls_locked }
    }

    pub fn config(&self) -> GalleryConfig {
        self.config.get_value()
    }

    /// Disable the controls for the configured debounce window
    pub fn lock_controls(&self) {
        let ms = self.config.with_value(|c| c.controls.debounce_ms);
        let set_locked = self.set_controls_locked;
        set_locked.set(true);
        spawn_local(async move {
            TimeoutFuture::new(ms).await;
            set_locked.set(false);
        });
    }
}

pub fn use_gallery() -> GalleryContext {
    expect_context::<GalleryContext>()
}
