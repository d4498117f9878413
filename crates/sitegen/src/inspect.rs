use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::page::PLACEHOLDERS;
use crate::validation::ResourceDraft;

/// Structural problem found in a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageFinding {
    ArticleHeaderCount { found: usize },
    HeroImageCount { found: usize },
    HeadingOneInBody { found: usize },
    UnreplacedPlaceholder { placeholder: String },
    MissingTagClass { class: String },
}

impl fmt::Display for PageFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFinding::ArticleHeaderCount { found } => {
                write!(f, "expected exactly one article-header, found {found}")
            }
            PageFinding::HeroImageCount { found } => {
                write!(f, "expected exactly one article-hero-image, found {found}")
            }
            PageFinding::HeadingOneInBody { found } => {
                write!(f, "content body contains {found} <h1> element(s)")
            }
            PageFinding::UnreplacedPlaceholder { placeholder } => {
                write!(f, "placeholder {placeholder} was not replaced")
            }
            PageFinding::MissingTagClass { class } => write!(f, "tag class {class} not found"),
        }
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid regex"))
}

/// Checks a rendered page for the structure every resource page should have.
pub fn inspect_page(html: &str, draft: &ResourceDraft) -> Vec<PageFinding> {
    static HERO: OnceLock<Regex> = OnceLock::new();
    static CONTENT_BODY: OnceLock<Regex> = OnceLock::new();
    static HEADING_ONE: OnceLock<Regex> = OnceLock::new();

    let mut findings = Vec::new();

    let headers = html.matches("class=\"article-header\"").count();
    if headers != 1 {
        findings.push(PageFinding::ArticleHeaderCount { found: headers });
    }

    let heroes = regex(&HERO, r#"class="[^"]*\barticle-hero-image\b[^"]*""#)
        .find_iter(html)
        .count();
    if heroes != 1 {
        findings.push(PageFinding::HeroImageCount { found: heroes });
    }

    let heading_one = regex(&HEADING_ONE, r"<h1[\s>]");
    let in_body: usize = regex(
        &CONTENT_BODY,
        r#"(?s)<article[^>]*class="[^"]*\bcontent-body\b[^"]*"[^>]*>(.*?)</article>"#,
    )
    .captures_iter(html)
    .filter_map(|caps| caps.get(1))
    .map(|body| heading_one.find_iter(body.as_str()).count())
    .sum();
    if in_body > 0 {
        findings.push(PageFinding::HeadingOneInBody { found: in_body });
    }

    findings.extend(
        PLACEHOLDERS
            .iter()
            .filter(|token| html.contains(*token))
            .map(|token| PageFinding::UnreplacedPlaceholder {
                placeholder: token.to_string(),
            }),
    );

    if html.contains("resource-card__tag--") {
        let class = format!("resource-card__tag--{}", draft.tag_type);
        if !html.contains(&class) {
            findings.push(PageFinding::MissingTagClass { class });
        }
    }

    findings
}
