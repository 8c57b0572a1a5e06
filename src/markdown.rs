//! Markdown to HTML rendering.
//!
//! A thin layer over `pulldown-cmark` that does the three things every converter
//! needs on top of plain rendering: heading ids that can be linked from a table of
//! contents, heading levels that can be shifted so a document nests inside a larger
//! one, and fenced code blocks coloured by `syntect`.

use crate::highlight::Highlighter;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

/// Anchor of the table of contents block; never handed out to a heading.
pub const TOC_ID: &str = "table-of-contents";

/// A heading encountered while rendering, after any level shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,
    /// Plain heading text
    pub text: String,
    /// Anchor id written onto the heading element
    pub id: String,
}

#[derive(Default)]
pub struct RenderOptions<'h> {
    /// Prepended to every heading id, e.g. `chapter-3-`
    pub id_prefix: String,
    /// Added to every heading level; results are clamped to 1..=6
    pub level_shift: i8,
    pub highlighter: Option<&'h Highlighter>,
}

/// Rendered HTML plus the headings found in it, in document order.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    pub headings: Vec<Heading>,
}

struct PendingHeading<'a> {
    level: u8,
    text: String,
    events: Vec<Event<'a>>,
}

struct PendingCode {
    language: String,
    code: String,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render markdown to an HTML fragment.
pub fn render(markdown: &str, options: &RenderOptions<'_>) -> Rendered {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut headings = Vec::new();
    let mut seen_ids: HashMap<String, usize> = HashMap::from([(TOC_ID.to_string(), 1)]);
    let mut heading: Option<PendingHeading<'_>> = None;
    let mut code: Option<PendingCode> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        if code.is_some() {
            match event {
                Event::Text(text) => {
                    if let Some(block) = code.as_mut() {
                        block.code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code.take() {
                        events.push(Event::Html(
                            render_code_block(&block, options.highlighter).into(),
                        ));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some(PendingCode {
                    language,
                    code: String::new(),
                });
            }
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(PendingHeading {
                    level: shift_level(level as u8, options.level_shift),
                    text: String::new(),
                    events: Vec::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(pending) = heading.take() {
                    let text = pending.text.trim().to_string();
                    let id = unique_id(&mut seen_ids, &options.id_prefix, &text);
                    events.push(Event::Html(
                        format!("<h{} id=\"{}\">", pending.level, id).into(),
                    ));
                    events.extend(pending.events);
                    events.push(Event::Html(format!("</h{}>\n", pending.level).into()));
                    headings.push(Heading {
                        level: pending.level,
                        text,
                        id,
                    });
                }
            }
            event => match heading.as_mut() {
                Some(pending) => {
                    if let Event::Text(text) | Event::Code(text) = &event {
                        pending.text.push_str(text);
                    }
                    pending.events.push(event);
                }
                None => events.push(event),
            },
        }
    }

    let mut html_out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_out, events.into_iter());
    Rendered {
        html: html_out,
        headings,
    }
}

fn render_code_block(block: &PendingCode, highlighter: Option<&Highlighter>) -> String {
    if !block.language.is_empty() {
        if let Some(html) = highlighter.and_then(|h| h.highlight(&block.code, &block.language)) {
            return html;
        }
    }
    let language = if block.language.is_empty() {
        "text"
    } else {
        block.language.as_str()
    };
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>\n",
        html_escape::encode_double_quoted_attribute(language),
        html_escape::encode_text(&block.code)
    )
}

fn unique_id(seen: &mut HashMap<String, usize>, prefix: &str, text: &str) -> String {
    let slug = slugify(text);
    let base = if slug.is_empty() {
        format!("{prefix}section")
    } else {
        format!("{prefix}{slug}")
    };
    let count = seen.entry(base.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base
    } else {
        format!("{}-{}", base, *count - 1)
    }
}

/// Move a heading level by `shift`, staying within 1..=6.
///
/// Clamping keeps the mapping monotonic: if `a <= b` then
/// `shift_level(a, s) <= shift_level(b, s)`.
pub fn shift_level(level: u8, shift: i8) -> u8 {
    (level as i16 + shift as i16).clamp(1, 6) as u8
}

/// The shift that moves the first heading of `markdown` to `target_level`.
pub fn level_shift_to(markdown: &str, target_level: u8) -> i8 {
    match first_heading(markdown) {
        Some((level, _)) => target_level as i8 - level as i8,
        None => 0,
    }
}

/// The level and text of the first heading in `markdown` that has any text.
pub fn first_heading(markdown: &str) -> Option<(u8, String)> {
    let mut current: Option<(u8, String)> = None;
    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => current = Some((level as u8, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, heading)) = current.as_mut() {
                    heading.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        return Some((level, text.to_string()));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// The text of the first level-1 heading, used as a document title.
pub fn title_from_markdown(markdown: &str) -> Option<String> {
    let mut in_title = false;
    let mut title = String::new();
    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => in_title = level as u8 == 1,
            Event::Text(text) | Event::Code(text) if in_title => title.push_str(&text),
            Event::End(TagEnd::Heading(_)) if in_title => {
                in_title = false;
                let text = title.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
                title.clear();
            }
            _ => {}
        }
    }
    None
}

/// Convert heading text to a URL-safe anchor.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Paragraph text of a document, flattened and cut at `max_chars`.
pub fn plain_text_preview(markdown: &str, max_chars: usize) -> String {
    let mut depth = 0usize;
    let mut words: Vec<String> = Vec::new();
    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading { .. } | Tag::CodeBlock(_)) => depth += 1,
            Event::End(TagEnd::Heading(_) | TagEnd::CodeBlock) => depth = depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) if depth == 0 => words.push(text.to_string()),
            Event::SoftBreak | Event::HardBreak if depth == 0 => words.push(" ".to_string()),
            Event::End(TagEnd::Paragraph) => words.push(" ".to_string()),
            _ => {}
        }
    }
    let flat = words
        .concat()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_slugify_headings() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Stage 1 -- Intent_Processing "), "stage-1-intent-processing");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn headings_get_ids_and_are_collected() {
        let rendered = render("# Intro\n\nText\n\n## Details\n", &RenderOptions::default());
        assert!(rendered.html.contains(r#"<h1 id="intro">Intro</h1>"#));
        assert!(rendered.html.contains(r#"<h2 id="details">Details</h2>"#));
        assert_eq!(
            rendered.headings,
            vec![
                Heading {
                    level: 1,
                    text: "Intro".to_string(),
                    id: "intro".to_string()
                },
                Heading {
                    level: 2,
                    text: "Details".to_string(),
                    id: "details".to_string()
                },
            ]
        );
    }

    #[test]
    fn duplicate_headings_get_distinct_ids() {
        let rendered = render("## Notes\n\n## Notes\n\n## Notes\n", &RenderOptions::default());
        let ids: Vec<_> = rendered.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes-1", "notes-2"]);
    }

    #[test]
    fn heading_levels_are_shifted_and_clamped() {
        let options = RenderOptions {
            id_prefix: "chapter-2-".to_string(),
            level_shift: 1,
            highlighter: None,
        };
        let rendered = render("# A\n\n## B\n\n###### C\n", &options);
        let levels: Vec<_> = rendered.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![2, 3, 6]);
        assert!(rendered.html.contains(r#"<h2 id="chapter-2-a">A</h2>"#));
    }

    #[test]
    fn shifting_preserves_heading_order() {
        for shift in -5i8..=5 {
            for a in 1u8..=6 {
                for b in a..=6 {
                    assert!(shift_level(a, shift) <= shift_level(b, shift));
                }
            }
        }
    }

    #[test]
    fn can_compute_shift_to_section_level() {
        assert_eq!(level_shift_to("# Top\n", 2), 1);
        assert_eq!(level_shift_to("intro\n\n### Deep\n", 2), -1);
        assert_eq!(level_shift_to("no headings here", 2), 0);
    }

    #[test]
    fn inline_markup_in_headings_is_kept() {
        let rendered = render("# The `main` loop\n", &RenderOptions::default());
        assert!(rendered
            .html
            .contains(r#"<h1 id="the-main-loop">The <code>main</code> loop</h1>"#));
        assert_eq!(rendered.headings[0].text, "The main loop");
    }

    #[test]
    fn code_blocks_without_highlighter_are_escaped() {
        let rendered = render("```html\n<b>hi</b>\n```\n", &RenderOptions::default());
        assert!(rendered
            .html
            .contains(r#"<pre><code class="language-html">&lt;b&gt;hi&lt;/b&gt;"#));
    }

    #[test]
    fn can_find_titles() {
        assert_eq!(
            title_from_markdown("intro\n\n## Not it\n\n# The Title\n"),
            Some("The Title".to_string())
        );
        assert_eq!(title_from_markdown("## Only h2\n"), None);
        assert_eq!(
            first_heading("text\n\n### Deep *one*\n"),
            Some((3, "Deep one".to_string()))
        );
    }

    #[test]
    fn empty_headings_are_passed_over() {
        assert_eq!(
            first_heading("#\n\n### Real\n"),
            Some((3, "Real".to_string()))
        );
        assert_eq!(level_shift_to("#\n\n### Real\n", 2), -1);
        assert_eq!(
            title_from_markdown("#\n\n# Named\n"),
            Some("Named".to_string())
        );
    }

    #[test]
    fn toc_anchor_is_reserved() {
        let rendered = render("## Table of Contents\n", &RenderOptions::default());
        assert_eq!(rendered.headings[0].id, "table-of-contents-1");
    }

    #[test]
    fn can_preview_plain_text() {
        let md = "# Title\n\nSome **bold** and `code` text.\n\n```\nskipped\n```\n\nMore.";
        assert_eq!(plain_text_preview(md, 200), "Some bold and code text. More.");
        assert_eq!(plain_text_preview(md, 9), "Some bold…");
    }
}
