//! Fenced code block extraction for the diagram converters.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// A fenced block's language tag and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub language: String,
    pub body: String,
}

/// Every fenced code block in `text`, in document order.
///
/// The language is the first word of the fence's info string, lowercased.
/// Indented code blocks are not fences and are skipped.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<FencedBlock> = None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some(FencedBlock {
                    language: info
                        .split_whitespace()
                        .next()
                        .unwrap_or_default()
                        .to_lowercase(),
                    body: String::new(),
                });
            }
            Event::Text(body) => {
                if let Some(block) = current.as_mut() {
                    block.body.push_str(&body);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(mut block) = current.take() {
                    // parsers keep `\r` from CRLF files inside code text
                    block.body = block.body.replace("\r\n", "\n");
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Bodies of the fenced blocks tagged `language`.
pub fn blocks_tagged(text: &str, language: &str) -> Vec<String> {
    fenced_blocks(text)
        .into_iter()
        .filter(|b| b.language.eq_ignore_ascii_case(language))
        .map(|b| b.body)
        .collect()
}

/// Strip leading and trailing blank lines while keeping indentation intact.
pub fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    lines[start..end.max(start)].join("\n")
}
