//! Project Write-ups
//!
//! Markdown rendering on top of pulldown-cmark:
//! - Syntax highlighting for fenced code (syntect)
//! - Relative image paths resolved against the asset base
//! - External links open in a new tab
//! - Heading ids for in-page anchors

use std::collections::HashMap;
use std::sync::OnceLock;

use pulldown_cmark::{html::push_html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::AssetSettings;
use crate::dom;

/// Syntax highlighter resources (lazy loaded)
static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn get_syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn get_theme() -> Option<&'static Theme> {
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get("InspiredGitHub")
}

/// Render a write-up to HTML
pub fn render_writeup(text: &str, assets: &AssetSettings) -> String {
    let parser = Parser::new_ext(text, get_options());
    let events = transform_events(parser, assets);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_HEADING_ATTRIBUTES
}

// State for the event transformer
enum State<'a> {
    Normal,
    InCodeBlock { lang: Option<String>, content: String },
    InImage { src: String, title: String, alt: String, depth: usize },
    InHeading { start: Tag<'a>, inner: Vec<Event<'a>>, text: String },
}

/// Transform parser events; `links` remembers which open links were rewritten
fn transform_events<'a>(parser: Parser<'a>, assets: &AssetSettings) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;
    let mut links: Vec<bool> = Vec::new();
    let mut slugs: HashMap<String, usize> = HashMap::new();

    for event in parser {
        match state {
            State::Normal => match event {
                // --- Code Blocks (Highlighting) ---
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(l) if !l.is_empty() => Some(l.to_string()),
                        _ => None,
                    };
                    state = State::InCodeBlock { lang, content: String::new() };
                }

                // --- Images ---
                Event::Start(Tag::Image { dest_url, title, .. }) => {
                    state = State::InImage {
                        src: dom::asset_url(&assets.base, &dest_url),
                        title: title.to_string(),
                        alt: String::new(),
                        depth: 0,
                    };
                }

                // --- Links ---
                Event::Start(Tag::Link { dest_url, title, .. }) if dom::is_external(&dest_url) => {
                    let title = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    let html = format!(
                        r#"<a href="{}"{} target="_blank" rel="noopener noreferrer">"#,
                        escape_html(&dest_url),
                        title
                    );
                    events.push(Event::Html(CowStr::from(html)));
                    links.push(true);
                }
                Event::Start(tag @ Tag::Link { .. }) => {
                    events.push(Event::Start(tag));
                    links.push(false);
                }
                Event::End(TagEnd::Link) => {
                    if links.pop().unwrap_or(false) {
                        events.push(Event::Html(CowStr::from("</a>")));
                    } else {
                        events.push(Event::End(TagEnd::Link));
                    }
                }

                // --- Headings ---
                Event::Start(start @ Tag::Heading { id: None, .. }) => {
                    state = State::InHeading { start, inner: Vec::new(), text: String::new() };
                }

                other => events.push(other),
            },

            State::InCodeBlock { ref lang, ref mut content } => match event {
                Event::Text(t) => content.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    let html = highlight_code(content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(html)));
                    state = State::Normal;
                }
                _ => {}
            },

            State::InImage { ref src, ref title, ref mut alt, ref mut depth } => match event {
                Event::Text(t) | Event::Code(t) => alt.push_str(&t),
                Event::Start(_) => *depth += 1,
                Event::End(_) if *depth > 0 => *depth -= 1,
                Event::End(_) => {
                    let title = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(title))
                    };
                    let html = format!(
                        r#"<img src="{}" alt="{}"{} loading="lazy" />"#,
                        escape_html(src),
                        escape_html(alt),
                        title
                    );
                    events.push(Event::Html(CowStr::from(html)));
                    state = State::Normal;
                }
                _ => {}
            },

            State::InHeading { ref mut start, ref mut inner, ref mut text } => match event {
                Event::End(TagEnd::Heading(level)) => {
                    let id = unique_slug(&mut slugs, text);
                    if let Tag::Heading { id: slot, .. } = start {
                        *slot = Some(CowStr::from(id));
                    }
                    let start = std::mem::replace(start, Tag::Paragraph);
                    events.push(Event::Start(start));
                    events.append(inner);
                    events.push(Event::End(TagEnd::Heading(level)));
                    state = State::Normal;
                }
                other => {
                    if let Event::Text(t) | Event::Code(t) = &other {
                        text.push_str(t);
                    }
                    inner.push(other);
                }
            },
        }
    }

    events
}

fn highlight_code(code: &str, lang: Option<&str>) -> String {
    let ss = get_syntax_set();
    let Some(theme) = get_theme() else {
        return format!("<pre><code>{}</code></pre>", escape_html(code));
    };

    let syntax = lang
        .and_then(|l| ss.find_syntax_by_token(l))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    highlighted_html_for_string(code, ss, syntax, theme)
        .unwrap_or_else(|_| format!("<pre><code>{}</code></pre>", escape_html(code)))
}

/// `"Hello, World!"` → `hello-world`
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

fn unique_slug(seen: &mut HashMap<String, usize>, text: &str) -> String {
    let slug = slugify(text);
    let count = seen.entry(slug.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        slug
    } else {
        format!("{}-{}", slug, *count - 1)
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        render_writeup(text, &AssetSettings::default())
    }

    #[test]
    fn test_relative_image_resolved_against_base() {
        let html = render("![Kiln *dashboard*](<kiln/shot 1.png>)");
        assert!(html.contains(r#"<img src="assets/kiln/shot%201.png" alt="Kiln dashboard" loading="lazy" />"#), "{html}");
    }

    #[test]
    fn test_absolute_image_untouched() {
        let html = render("![x](https://cdn.example.com/x.png \"Caption\")");
        assert!(html.contains(r#"src="https://cdn.example.com/x.png""#));
        assert!(html.contains(r#"title="Caption""#));
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        let html = render("See [the repo](https://example.com/repo) and [notes](#notes).");
        assert!(html.contains(r#"<a href="https://example.com/repo" target="_blank" rel="noopener noreferrer">the repo</a>"#), "{html}");
        assert!(html.contains(r##"<a href="#notes">notes</a>"##), "{html}");
    }

    #[test]
    fn test_headings_get_ids() {
        let html = render("## Process & Tools\n\n## Process & Tools\n\n### Custom {#mine}");
        assert!(html.contains(r#"<h2 id="process-tools">"#), "{html}");
        assert!(html.contains(r#"<h2 id="process-tools-1">"#), "{html}");
        assert!(html.contains(r#"<h3 id="mine">"#), "{html}");
    }

    #[test]
    fn test_code_block_is_highlighted() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(!html.contains("<code class=\"language-rust\">"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  --  "), "section");
        assert_eq!(slugify("Über 3D"), "über-3d");
    }
}
