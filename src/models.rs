//! Gallery Models
//!
//! Project records as they appear in the static feed.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};
use crate::reconcile::Reconcilable;

/// One image of a project; responsive variants sit next to `path`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub path: String,
    /// Pre-rendered widths; empty means the configured defaults
    #[serde(default)]
    pub widths: Vec<u32>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl Image {
    pub fn widths_or<'a>(&'a self, defaults: &'a [u32]) -> &'a [u32] {
        if self.widths.is_empty() {
            defaults
        } else {
            &self.widths
        }
    }
}

/// A credit that may link somewhere. The feed gives either a bare name or
/// `{ "name": .., "url": .. }` with either part optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LinkEntry")]
pub struct Link {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Link {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), url: None }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkEntry {
    Name(String),
    Full {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl From<LinkEntry> for Link {
    fn from(entry: LinkEntry) -> Self {
        match entry {
            LinkEntry::Name(name) => Link::named(name),
            LinkEntry::Full { name, url } => Link { name, url },
        }
    }
}

/// A project card in the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Empty for personal projects
    #[serde(default)]
    pub clients: Vec<Link>,
    #[serde(default)]
    pub summary: String,
    /// Markdown write-up shown in the overlay
    #[serde(default)]
    pub writeup: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub relevance: f64,
    /// `None` while the project is ongoing
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Soft visibility: hidden cards stay mounted at the end of the list
    #[serde(default = "default_true")]
    pub display: bool,
}

fn default_true() -> bool {
    true
}

impl Project {
    pub fn is_personal(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn cover(&self) -> Option<&Image> {
        self.images.first()
    }

    /// DOM id of the rendered card
    pub fn dom_id(&self) -> String {
        format!("project-{}", self.id)
    }

    /// DOM id of the card's cover image
    pub fn cover_dom_id(&self) -> String {
        format!("project-{}-cover", self.id)
    }
}

impl Reconcilable for Project {
    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn same_identity(&self, other: &Self) -> bool {
        self == other
    }

    fn displayed(&self) -> bool {
        self.display
    }
}

#[derive(Deserialize)]
struct Feed {
    #[serde(default)]
    settings: GalleryConfig,
    projects: Vec<Project>,
}

/// Parse the static feed: settings (validated) and projects (unique ids)
pub fn parse_feed(json: &str) -> GalleryResult<(GalleryConfig, Vec<Project>)> {
    let feed: Feed = serde_json::from_str(json)?;
    feed.settings.validate()?;

    let mut seen = HashSet::new();
    for project in &feed.projects {
        if !seen.insert(project.id.as_str()) {
            return Err(GalleryError::DuplicateProjectId(project.id.clone()));
        }
    }
    Ok((feed.settings, feed.projects))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_feed() {
        let (config, projects) = parse_feed(r#"{"projects": [{"id": "a", "title": "Alpha"}]}"#).unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(projects.len(), 1);

        let p = &projects[0];
        assert!(p.display);
        assert!(p.is_personal());
        assert_eq!(p.end_date, None);
        assert_eq!(p.cover(), None);
        assert_eq!(p.dom_id(), "project-a");
    }

    #[test]
    fn test_parse_full_project() {
        let json = r#"{
            "settings": {"controls": {"debounce_ms": 100}},
            "projects": [{
                "id": "kiln",
                "title": "Kiln",
                "images": [{"path": "kiln/cover.jpg", "alt": "Kiln dashboard"}, {"path": "kiln/wide.jpg", "widths": [1920]}],
                "tools": ["Rust", "WebGL"],
                "tags": ["data-viz"],
                "clients": ["Acme", {"name": "Birch Labs", "url": "https://birch.example"}],
                "summary": "Firing curves.",
                "relevance": 8.5,
                "endDate": "2023-04-30",
                "display": false
            }]
        }"#;
        let (config, projects) = parse_feed(json).unwrap();
        assert_eq!(config.controls.debounce_ms, 100);

        let p = &projects[0];
        assert!(!p.display);
        assert!(!p.is_personal());
        assert_eq!(p.end_date, NaiveDate::from_ymd_opt(2023, 4, 30));
        let cover = p.cover().unwrap();
        assert_eq!(cover.alt.as_deref(), Some("Kiln dashboard"));
        assert_eq!(cover.widths_or(&[480]), [480]);
        assert_eq!(p.images[1].widths_or(&[480]), [1920]);
        assert_eq!(p.key(), Some("kiln"));
        assert_eq!(
            p.clients,
            [
                Link::named("Acme"),
                Link { name: Some("Birch Labs".to_string()), url: Some("https://birch.example".to_string()) },
            ]
        );
    }

    #[test]
    fn test_bundled_feed_parses() {
        let (_, projects) = parse_feed(include_str!("../data/projects.json")).unwrap();
        assert!(!projects.is_empty());
        assert!(projects.iter().all(|p| p.display));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let json = r#"{"projects": [{"id": "a", "title": "A"}, {"id": "a", "title": "B"}]}"#;
        assert!(matches!(parse_feed(json), Err(GalleryError::DuplicateProjectId(id)) if id == "a"));
    }

    #[test]
    fn test_malformed_feed_is_an_error() {
        assert!(matches!(parse_feed("{\"projects\": 3}"), Err(GalleryError::Feed(_))));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let json = r#"{"settings": {"drag": {"swap_threshold": 2.0}}, "projects": []}"#;
        assert!(matches!(parse_feed(json), Err(GalleryError::InvalidSetting { .. })));
    }
}
