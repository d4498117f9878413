//! Markdown subset to HTML conversion for resource article bodies.
//!
//! Conversion runs in two passes: block constructs (headings, tables, quotes,
//! lists, paragraphs, raw HTML lines) are tokenized first, then inline syntax
//! (emphasis, code spans, links) is substituted inside each block's text.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::front_matter::{normalize_source, split_front_matter};

/// Image spliced into the article body after a named heading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub insert_after: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Block<'a> {
    Heading {
        level: usize,
        text: &'a str,
    },
    Table {
        header: Vec<&'a str>,
        rows: Vec<Vec<&'a str>>,
    },
    Quote(Vec<&'a str>),
    List {
        kind: ListKind,
        items: Vec<&'a str>,
    },
    Paragraph(Vec<&'a str>),
    Html(&'a str),
    Figure(String),
}

/// Converts an article body to an HTML fragment. Never fails: anything that is not
/// recognized ends up as paragraph text.
pub fn markdown_to_html(markdown: &str, inline_image: Option<&InlineImage>) -> String {
    let normalized = normalize_source(markdown);
    let source = match split_front_matter(&normalized) {
        Some(split) => split.body,
        None => &*normalized,
    };

    let lines = strip_preamble(source);
    let mut blocks = tokenize(&lines);
    if let Some(image) = inline_image {
        insert_inline_image(&mut blocks, image);
    }

    let rendered: Vec<String> = blocks.iter().map(render_block).collect();
    collapse_blank_runs(&rendered.join("\n\n")).trim().to_string()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Preamble {
    Title,
    Subtitle,
    Done,
}

/// Drops the title heading, the subtitle lines right after it, and separator rules.
fn strip_preamble(source: &str) -> Vec<&str> {
    let mut state = Preamble::Title;
    let mut lines = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim();
        if is_rule(trimmed) {
            continue;
        }
        match state {
            Preamble::Title if trimmed.is_empty() => continue,
            Preamble::Title if is_title(trimmed) => {
                state = Preamble::Subtitle;
                continue;
            }
            Preamble::Subtitle if trimmed.is_empty() || is_subtitle(trimmed) => continue,
            Preamble::Title | Preamble::Subtitle => state = Preamble::Done,
            Preamble::Done => {}
        }
        lines.push(line);
    }

    lines
}

fn is_rule(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'-')
}

fn is_title(trimmed: &str) -> bool {
    trimmed
        .strip_prefix('#')
        .is_some_and(|rest| rest.starts_with(char::is_whitespace) && !rest.trim().is_empty())
}

fn is_subtitle(trimmed: &str) -> bool {
    let bold = trimmed.len() > 4 && trimmed.starts_with("**") && trimmed.ends_with("**");
    let italic = trimmed.len() > 2
        && trimmed.starts_with('*')
        && trimmed.ends_with('*')
        && !trimmed.starts_with("**");
    bold || italic
}

fn tokenize<'a>(lines: &[&'a str]) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        if line.trim().is_empty() {
            idx += 1;
            continue;
        }

        if let Some((block, next)) = take_block(lines, idx) {
            blocks.push(block);
            idx = next;
            continue;
        }

        let mut paragraph = vec![line.trim()];
        idx += 1;
        while idx < lines.len()
            && !lines[idx].trim().is_empty()
            && take_block(lines, idx).is_none()
        {
            paragraph.push(lines[idx].trim());
            idx += 1;
        }
        blocks.push(Block::Paragraph(paragraph));
    }

    blocks
}

/// Recognizes a non-paragraph block starting at `idx`, returning it with the index
/// of the first line after it.
fn take_block<'a>(lines: &[&'a str], idx: usize) -> Option<(Block<'a>, usize)> {
    let line = lines[idx];
    let trimmed = line.trim();

    if is_table_row(trimmed) {
        if let Some(table) = take_table(lines, idx) {
            return Some(table);
        }
    }
    if quote_text(line).is_some() {
        return Some(take_quote(lines, idx));
    }
    if let Some((level, text)) = heading(line) {
        return Some((Block::Heading { level, text }, idx + 1));
    }
    if let Some((kind, _)) = list_item(line) {
        return Some(take_list(lines, idx, kind));
    }
    if is_block_html(trimmed) {
        return Some((Block::Html(line), idx + 1));
    }
    None
}

fn is_table_row(trimmed: &str) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn is_table_separator(trimmed: &str) -> bool {
    is_table_row(trimmed)
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|ch| matches!(ch, '|' | '-' | ':') || ch.is_whitespace())
}

fn table_cells(row: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = row.trim().split('|').collect();
    if cells.first().is_some_and(|cell| cell.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|cell| cell.trim().is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(str::trim).collect()
}

fn take_table<'a>(lines: &[&'a str], start: usize) -> Option<(Block<'a>, usize)> {
    let mut end = start;
    while end < lines.len() && is_table_row(lines[end].trim()) {
        end += 1;
    }
    if end - start < 2 || !is_table_separator(lines[start + 1].trim()) {
        return None;
    }

    let header = table_cells(lines[start]);
    let rows = lines[start + 2..end]
        .iter()
        .filter(|row| !is_table_separator(row.trim()))
        .map(|row| table_cells(*row))
        .collect();
    Some((Block::Table { header, rows }, end))
}

/// Text of a `>` line. A bare `>` is not a quote.
fn quote_text(line: &str) -> Option<&str> {
    line.strip_prefix('>')
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn take_quote<'a>(lines: &[&'a str], start: usize) -> (Block<'a>, usize) {
    let mut idx = start;
    let mut quoted = Vec::new();
    while let Some(text) = lines.get(idx).copied().and_then(quote_text) {
        quoted.push(text);
        idx += 1;
    }
    (Block::Quote(quoted), idx)
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(2..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) || rest.trim().is_empty() {
        return None;
    }
    Some((level, rest.trim()))
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(rest) = line.strip_prefix(['-', '*']) {
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let content = rest.trim_start();
        let content = ["[ ]", "[x]", "[X]"]
            .iter()
            .find_map(|marker| {
                content
                    .strip_prefix(*marker)
                    .filter(|after| after.is_empty() || after.starts_with(char::is_whitespace))
            })
            .map(str::trim_start)
            .unwrap_or(content);
        return Some((ListKind::Unordered, content.trim_end()));
    }

    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((ListKind::Ordered, rest.trim()))
}

fn take_list<'a>(lines: &[&'a str], start: usize, kind: ListKind) -> (Block<'a>, usize) {
    let continues = |line: &str| matches!(list_item(line), Some((next, _)) if next == kind);

    let mut items = Vec::new();
    let mut idx = start;
    while idx < lines.len() {
        if let Some((next_kind, text)) = list_item(lines[idx]) {
            if next_kind == kind {
                items.push(text);
                idx += 1;
                continue;
            }
            break;
        }
        if lines[idx].trim().is_empty() {
            let resume = (idx..lines.len()).find(|&n| !lines[n].trim().is_empty());
            if let Some(resume) = resume.filter(|&n| continues(lines[n])) {
                idx = resume;
                continue;
            }
        }
        break;
    }

    (Block::List { kind, items }, idx)
}

fn is_block_html(trimmed: &str) -> bool {
    const INLINE_TAGS: [&str; 4] = ["<a ", "<strong", "<em", "<code"];
    trimmed.starts_with('<') && !INLINE_TAGS.iter().any(|tag| trimmed.starts_with(tag))
}

fn insert_inline_image(blocks: &mut Vec<Block<'_>>, image: &InlineImage) {
    let (Some(src), Some(insert_after)) = (image.src.as_deref(), image.insert_after.as_deref())
    else {
        return;
    };
    let target = insert_after.trim_start_matches('#').trim_start();

    let position = blocks
        .iter()
        .position(|block| matches!(block, Block::Heading { text, .. } if *text == target));
    match position {
        Some(idx) => {
            let alt = image.alt.as_deref().unwrap_or_default();
            blocks.insert(idx + 1, Block::Figure(content_figure(src, alt)));
        }
        None => tracing::debug!(heading = target, "inline image anchor heading not found"),
    }
}

fn content_figure(src: &str, alt: &str) -> String {
    format!(
        "<figure class=\"article-content-image\">\n  <img src=\"{src}\" alt=\"{alt}\" loading=\"lazy\" style=\"width: 100%; height: auto; display: block; border-radius: 8px; margin: 2rem 0;\">\n</figure>"
    )
}

fn render_block(block: &Block<'_>) -> String {
    match block {
        Block::Heading { level, text } => format!("<h{level}>{}</h{level}>", render_inline(text)),
        Block::Table { header, rows } => render_table(header, rows),
        Block::Quote(lines) => {
            let paragraphs: Vec<String> = lines
                .iter()
                .map(|line| format!("<p>{}</p>", render_inline(line)))
                .collect();
            format!("<blockquote>{}</blockquote>", paragraphs.join("\n"))
        }
        Block::List { kind, items } => {
            let tag = kind.tag();
            let mut html = format!("<{tag}>\n");
            for item in items {
                html.push_str(&format!("  <li>{}</li>\n", render_inline(item)));
            }
            html.push_str(&format!("</{tag}>"));
            html
        }
        Block::Paragraph(lines) => format!("<p>{}</p>", render_inline(&lines.join(" "))),
        Block::Html(line) => render_inline(line),
        Block::Figure(html) => html.clone(),
    }
}

fn render_table(header: &[&str], rows: &[Vec<&str>]) -> String {
    let mut html = String::from("<table class=\"comparison-table\">\n  <thead>\n");
    push_row(&mut html, header, "th");
    html.push_str("  </thead>\n  <tbody>\n");
    for row in rows {
        push_row(&mut html, row, "td");
    }
    html.push_str("  </tbody>\n</table>");
    html
}

fn push_row(html: &mut String, cells: &[&str], tag: &str) {
    html.push_str("    <tr>\n");
    for cell in cells {
        html.push_str(&format!("      <{tag}>{}</{tag}>\n", render_inline(cell)));
    }
    html.push_str("    </tr>\n");
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid regex"))
}

const CODE_OPEN: char = '\u{E000}';
const CODE_CLOSE: char = '\u{E001}';

/// Applies emphasis, code span, and link substitution to one run of text.
pub fn render_inline(text: &str) -> String {
    static CODE: OnceLock<Regex> = OnceLock::new();
    static CODE_SLOT: OnceLock<Regex> = OnceLock::new();
    static STRONG_EM: OnceLock<Regex> = OnceLock::new();
    static STRONG: OnceLock<Regex> = OnceLock::new();
    static EM: OnceLock<Regex> = OnceLock::new();
    static LINK: OnceLock<Regex> = OnceLock::new();

    // Code spans are parked behind placeholders so emphasis and links never see them.
    let mut spans: Vec<String> = Vec::new();
    let parked = regex(&CODE, r"`([^`]+)`").replace_all(text, |caps: &Captures| {
        spans.push(caps[1].to_string());
        format!("{CODE_OPEN}{}{CODE_CLOSE}", spans.len() - 1)
    });

    let html = regex(&STRONG_EM, r"\*\*\*(.+?)\*\*\*")
        .replace_all(&parked, "<strong><em>$1</em></strong>");
    let html = regex(&STRONG, r"\*\*(.+?)\*\*").replace_all(&html, "<strong>$1</strong>");
    let html = regex(&EM, r"\*(.+?)\*").replace_all(&html, "<em>$1</em>");
    let html = regex(&LINK, r"(!?)\[([^\]]+)\]\(([^)]+)\)").replace_all(
        &html,
        |caps: &Captures| {
            if &caps[1] == "!" {
                caps[0].to_string()
            } else {
                format!("<a href=\"{}\">{}</a>", &caps[3], &caps[2])
            }
        },
    );

    if spans.is_empty() {
        return html.into_owned();
    }
    regex(&CODE_SLOT, "\u{E000}(\\d+)\u{E001}")
        .replace_all(&html, |caps: &Captures| {
            let code = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|slot| spans.get(slot))
                .map(String::as_str)
                .unwrap_or_default();
            format!("<code>{code}</code>")
        })
        .into_owned()
}

fn collapse_blank_runs(html: &str) -> String {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    regex(&BLANK_RUN, r"\n{3,}").replace_all(html, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_bold_paragraph() {
        let html = markdown_to_html("## Hello\nSome **bold** text.", None);
        assert!(html.contains("<h2>Hello</h2>"), "{html}");
        assert!(html.contains("<p>Some <strong>bold</strong> text.</p>"), "{html}");
    }

    #[test]
    fn table_with_header_and_two_rows() {
        let md = "| Fuel | Price |\n|------|:-----:|\n| Diesel | $3.90 |\n| Gas | $3.10 |";
        let html = markdown_to_html(md, None);

        assert_eq!(html.matches("<table").count(), 1, "{html}");
        assert_eq!(html.matches("<thead>").count(), 1);
        assert_eq!(html.matches("<tbody>").count(), 1);
        let (head, body) = html.split_once("<tbody>").expect("tbody");
        assert_eq!(head.matches("<tr>").count(), 1);
        assert_eq!(body.matches("<tr>").count(), 2);
        assert!(head.contains("<th>Fuel</th>"));
        assert!(body.contains("<td>$3.90</td>"));
    }

    #[test]
    fn pipe_rows_without_separator_stay_text() {
        let html = markdown_to_html("| a | b |\n| c | d |", None);
        assert!(!html.contains("<table"));
        assert_eq!(html, "<p>| a | b | | c | d |</p>");
    }

    #[test]
    fn interior_empty_cells_are_kept() {
        let html = markdown_to_html("| a | | c |\n|---|---|---|\n| 1 | | 3 |", None);
        assert!(html.contains("<th></th>"), "{html}");
        assert!(html.contains("<td></td>"), "{html}");
    }

    #[test]
    fn strips_title_subtitle_and_rules() {
        let md = "# Big Title\n\n**A subtitle line**\n*Published January 2026*\n\n---\n\nFirst paragraph.";
        let html = markdown_to_html(md, None);
        assert_eq!(html, "<p>First paragraph.</p>");
    }

    #[test]
    fn bold_line_later_in_document_is_kept() {
        let md = "Intro.\n\n**Key takeaway**";
        let html = markdown_to_html(md, None);
        assert!(html.contains("<p><strong>Key takeaway</strong></p>"), "{html}");
    }

    #[test]
    fn stray_front_matter_is_removed() {
        let html = markdown_to_html("---\nslug: x\n---\nBody", None);
        assert_eq!(html, "<p>Body</p>");
    }

    #[test]
    fn adjacent_quotes_collapse() {
        let html = markdown_to_html("> first\n> second\n\nAfter.", None);
        assert!(html.starts_with("<blockquote><p>first</p>\n<p>second</p></blockquote>"), "{html}");
        assert_eq!(html.matches("<blockquote>").count(), 1);
    }

    #[test]
    fn bare_quote_marker_stays_text() {
        let html = markdown_to_html(">\n\nAfter.", None);
        assert!(!html.contains("<blockquote>"), "{html}");
        assert_eq!(html, "<p>></p>\n\n<p>After.</p>");
    }

    #[test]
    fn heading_levels_two_through_six() {
        let html = markdown_to_html("## Two\n### Three\n###### Six\n####### Seven", None);
        assert!(html.contains("<h2>Two</h2>"));
        assert!(html.contains("<h3>Three</h3>"));
        assert!(html.contains("<h6>Six</h6>"));
        assert!(html.contains("<p>####### Seven</p>"));
    }

    #[test]
    fn second_h1_is_not_a_heading() {
        let html = markdown_to_html("# Title\n\nText\n\n# Another", None);
        assert!(!html.contains("<h1"));
        assert!(html.contains("<p># Another</p>"));
    }

    #[test]
    fn lists_survive_single_blank_lines() {
        let md = "- one\n- two\n\n- three\n\nAfter\n\n1. first\n2. second";
        let html = markdown_to_html(md, None);
        assert_eq!(html.matches("<ul>").count(), 1, "{html}");
        assert_eq!(html.matches("<li>").count(), 5);
        assert!(html.contains("<ol>\n  <li>first</li>\n  <li>second</li>\n</ol>"));
    }

    #[test]
    fn switching_list_kind_starts_new_list() {
        let html = markdown_to_html("- a\n1. b", None);
        assert!(html.contains("<ul>\n  <li>a</li>\n</ul>"), "{html}");
        assert!(html.contains("<ol>\n  <li>b</li>\n</ol>"), "{html}");
    }

    #[test]
    fn checkboxes_become_plain_items() {
        let html = markdown_to_html("- [ ] Check tank levels\n- [x] Order delivery", None);
        assert!(html.contains("<li>Check tank levels</li>"), "{html}");
        assert!(html.contains("<li>Order delivery</li>"), "{html}");
    }

    #[test]
    fn emphasis_order() {
        assert_eq!(
            render_inline("***both*** and **bold** and *em*"),
            "<strong><em>both</em></strong> and <strong>bold</strong> and <em>em</em>"
        );
    }

    #[test]
    fn code_spans_are_not_reprocessed() {
        assert_eq!(
            render_inline("run `a*b*c` **now**"),
            "run <code>a*b*c</code> <strong>now</strong>"
        );
    }

    #[test]
    fn links_skip_images() {
        assert_eq!(
            render_inline("see [the guide](/resources/g.html) ![chart](c.png)"),
            "see <a href=\"/resources/g.html\">the guide</a> ![chart](c.png)"
        );
    }

    #[test]
    fn html_lines_pass_through_but_inline_tags_wrap() {
        let html = markdown_to_html("<div class=\"callout\">Note</div>\n<a href=\"/x\">x</a> text", None);
        assert!(html.starts_with("<div class=\"callout\">Note</div>"), "{html}");
        assert!(html.contains("<p><a href=\"/x\">x</a> text</p>"), "{html}");
    }

    #[test]
    fn html_lines_still_get_inline_markup() {
        let html = markdown_to_html("<div class=\"note\">**Tip:** see [guide](/g.html)</div>", None);
        assert_eq!(
            html,
            "<div class=\"note\"><strong>Tip:</strong> see <a href=\"/g.html\">guide</a></div>"
        );
    }

    #[test]
    fn paragraph_lines_join_with_space() {
        let html = markdown_to_html("line one\nline two\n\nnext", None);
        assert_eq!(html, "<p>line one line two</p>\n\n<p>next</p>");
    }

    #[test]
    fn inline_image_after_matching_heading_only_once() {
        let image = InlineImage {
            src: Some("images/inline.png".into()),
            alt: Some("Tank".into()),
            insert_after: Some("## Storage".into()),
        };
        let md = "## Intro\nText\n\n## Storage\nMore\n\n## Storage\nAgain";
        let html = markdown_to_html(md, Some(&image));

        assert_eq!(html.matches("article-content-image").count(), 1);
        let heading = html.find("<h2>Storage</h2>").expect("heading");
        let figure = html.find("<figure").expect("figure");
        let next = html[heading..].find("<p>More</p>").map(|i| i + heading).expect("para");
        assert!(heading < figure && figure < next, "{html}");
        assert!(html.contains("alt=\"Tank\""));
    }

    #[test]
    fn inline_image_needs_src_and_anchor() {
        let image = InlineImage {
            src: Some("images/inline.png".into()),
            alt: None,
            insert_after: None,
        };
        let html = markdown_to_html("## Storage\nText", Some(&image));
        assert!(!html.contains("<figure"));

        let unmatched = InlineImage {
            insert_after: Some("storage".into()),
            ..image
        };
        let html = markdown_to_html("## Storage\nText", Some(&unmatched));
        assert!(!html.contains("<figure"));
    }

    #[test]
    fn output_is_deterministic_and_trimmed() {
        let md = "\n\n## A\n\n\n\nText\n\n\n";
        let first = markdown_to_html(md, None);
        assert_eq!(first, markdown_to_html(md, None));
        assert!(!first.contains("\n\n\n"));
        assert_eq!(first, "<h2>A</h2>\n\n<p>Text</p>");
    }
}
