use unicode_normalization::UnicodeNormalization;

/// Returns true when `slug` is non-empty lowercase ASCII alphanumerics and hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Derives a URL-safe slug from a title: accents are folded, whitespace becomes a
/// hyphen, anything else outside `[a-z0-9-]` is dropped, and hyphen runs collapse.
pub fn slugify(text: &str) -> String {
    let folded: String = text.nfkd().collect::<String>().to_lowercase();

    let mut slug = String::with_capacity(folded.len());
    for ch in folded.trim().chars() {
        let mapped = if ch.is_whitespace() { '-' } else { ch };
        if !(mapped.is_ascii_lowercase() || mapped.is_ascii_digit() || mapped == '-') {
            continue;
        }
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    slug.trim_matches('-').to_string()
}
