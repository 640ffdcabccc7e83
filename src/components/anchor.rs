//! Anchor Components
//!
//! `Anchor` links a name to a URL, falling back to the bare URL as text, or
//! to plain text when there is nothing to link. External destinations open
//! in a new tab. `AnchorChain` joins several with English separators.

use leptos::either::Either;
use leptos::prelude::*;

use crate::dom;
use crate::models::Link;

/// Link text: `name`, else `url` without its scheme and a leading `www.`
pub fn anchor_text(name: Option<&str>, url: &str) -> String {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match url.strip_prefix("https://").or_else(|| url.strip_prefix("http://")) {
        Some(rest) => rest.strip_prefix("www.").unwrap_or(rest).to_string(),
        None => url.to_string(),
    }
}

/// Text placed before item `index` of `len`: "A and B", "A, B, and C"
pub fn separator(index: usize, len: usize) -> &'static str {
    match (index, len) {
        (0, _) => "",
        (1, 2) => " and ",
        (i, n) if i + 1 == n => ", and ",
        _ => ", ",
    }
}

#[component]
pub fn Anchor(
    #[prop(default = None)] name: Option<String>,
    #[prop(default = None)] url: Option<String>,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return Either::Right(name.unwrap_or_default());
    };

    let text = anchor_text(name.as_deref(), &url);
    let external = dom::is_external(&url);
    let class = dom::merge_classes(["anchor", &class, if external { "external" } else { "" }]);

    Either::Left(view! {
        <a
            href=url
            class=class
            target=external.then_some("_blank")
            rel=external.then_some("noopener noreferrer")
        >
            {text}
        </a>
    })
}

#[component]
pub fn AnchorChain(links: Vec<Link>) -> impl IntoView {
    let len = links.len();
    links
        .into_iter()
        .enumerate()
        .map(|(i, link)| {
            view! {
                {separator(i, len)}
                <Anchor name=link.name url=link.url />
            }
        })
        .collect_view()
}
