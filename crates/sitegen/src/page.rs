use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::SitegenError;
use crate::markdown::markdown_to_html;
use crate::validation::ResourceDraft;

/// Literal tokens the page template carries.
pub const PLACEHOLDERS: [&str; 8] = [
    "[TITLE]",
    "[DESCRIPTION]",
    "[PATH]",
    "[SHORT TITLE]",
    "[TYPE]",
    "[CATEGORY]",
    "[FULL TITLE]",
    "[X] min read",
];

/// A rendered resource page, ready to be written to `<resources>/<file_name>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    pub slug: String,
    pub file_name: String,
    #[serde(skip)]
    pub html: String,
}

/// Seam for turning a validated draft and its Markdown body into a page.
pub trait PageRenderer {
    fn render(&self, draft: &ResourceDraft, body_markdown: &str) -> RenderedPage;
}

/// The single-resource HTML template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageTemplate {
    source: String,
}

impl PageTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SitegenError> {
        if !path.is_file() {
            return Err(SitegenError::MissingInput(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)
            .map_err(|err| SitegenError::Template(format!("{}: {err}", path.display())))?;
        Ok(Self::new(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PageRenderer for PageTemplate {
    fn render(&self, draft: &ResourceDraft, body_markdown: &str) -> RenderedPage {
        let body_html = markdown_to_html(body_markdown, draft.inline_image.as_ref());
        let html = substitute_placeholders(&self.source, draft);
        let html = insert_hero(&html, draft);
        let html = replace_content_body(&html, &body_html);

        RenderedPage {
            slug: draft.slug.clone(),
            file_name: draft.page_file_name(),
            html,
        }
    }
}

/// Replaces every placeholder occurrence with the draft's values.
pub fn substitute_placeholders(template: &str, draft: &ResourceDraft) -> String {
    let read_time = format!("{} min read", draft.read_time_minutes);
    let path = draft.page_file_name();
    [
        ("[TITLE]", draft.title.as_str()),
        ("[DESCRIPTION]", draft.description.as_str()),
        ("[PATH]", path.as_str()),
        ("[SHORT TITLE]", draft.short_title.as_str()),
        ("[TYPE]", draft.tag_type.as_str()),
        ("[CATEGORY]", draft.category.as_str()),
        ("[FULL TITLE]", draft.title.as_str()),
        ("[X] min read", read_time.as_str()),
    ]
    .into_iter()
    .fold(template.to_string(), |html, (token, value)| {
        html.replace(token, value)
    })
}

/// Puts the hero figure between the header section and the article content comment.
pub fn insert_hero(html: &str, draft: &ResourceDraft) -> String {
    static HERO_ANCHOR: OnceLock<Regex> = OnceLock::new();
    let re = HERO_ANCHOR.get_or_init(|| {
        Regex::new(r"(</section>\s*)(<!-- Article Content -->)").expect("Invalid regex")
    });

    let Some(caps) = re.captures(html) else {
        tracing::warn!(slug = %draft.slug, "template has no hero anchor; hero image not inserted");
        return html.to_string();
    };
    let (Some(whole), Some(section), Some(comment)) = (caps.get(0), caps.get(1), caps.get(2))
    else {
        return html.to_string();
    };

    let figure = format!(
        "\n    <!-- Hero Image -->\n    <figure class=\"article-hero-image\">\n      <img src=\"{}\" alt=\"{}\" loading=\"eager\" style=\"width: 100%; height: auto; display: block;\">\n    </figure>\n",
        draft.hero.src, draft.hero.alt
    );

    let mut out = String::with_capacity(html.len() + figure.len() + 8);
    out.push_str(&html[..whole.start()]);
    out.push_str(section.as_str());
    out.push('\n');
    out.push_str(&figure);
    out.push_str("\n    ");
    out.push_str(comment.as_str());
    out.push_str(&html[whole.end()..]);
    out
}

/// Swaps the inside of the narrow content container for `body_html`.
pub fn replace_content_body(html: &str, body_html: &str) -> String {
    static CONTENT_BODY: OnceLock<Regex> = OnceLock::new();
    let re = CONTENT_BODY.get_or_init(|| {
        Regex::new(
            r#"(?s)<article class="content-body">.*?<div class="container container--narrow">.*?</div>\s*</article>"#,
        )
        .expect("Invalid regex")
    });

    let Some(found) = re.find(html) else {
        tracing::warn!("template has no content-body article; body not inserted");
        return html.to_string();
    };

    let mut out = String::with_capacity(html.len() + body_html.len());
    out.push_str(&html[..found.start()]);
    out.push_str("<article class=\"content-body\">\n      <div class=\"container container--narrow\">\n\n");
    out.push_str(body_html);
    out.push_str("\n\n      </div>\n    </article>");
    out.push_str(&html[found.end()..]);
    out
}
