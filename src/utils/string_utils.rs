//! Slug and label helpers for extracted text

/// Reduce a display title to a URL-safe slug.
///
/// Lowercases, folds whitespace runs into single hyphens, and drops anything
/// that is not alphanumeric. Consecutive hyphens collapse and leading or
/// trailing hyphens are trimmed, so the result is stable under repeated
/// application.
///
/// # Examples
/// ```
/// # use otakuscrape::utils::string_utils::slugify;
/// assert_eq!(slugify("My Show!"), "my-show");
/// assert_eq!(slugify("  Boku no   Hero 7  "), "boku-no-hero-7");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for ch in title.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Parse the integer at the front of scraped text, ignoring whatever
/// follows the digit run.
///
/// Pagination counters arrive as anchor text that can carry stray characters
/// after the number; the leading digits are the value.
///
/// # Examples
/// ```
/// # use otakuscrape::utils::string_utils::leading_int;
/// assert_eq!(leading_int("24"), Some(24));
/// assert_eq!(leading_int(" 12 of 24"), Some(12));
/// assert_eq!(leading_int("next"), None);
/// ```
#[must_use]
pub fn leading_int(text: &str) -> Option<u64> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Remove the first occurrence of a literal label from scraped text and
/// tidy the remaining whitespace.
///
/// Handles prefix labels (`"Status : Ongoing"`), suffix decorations
/// (`"My Show Subtitle Indonesia"`), and labels buried mid-text. Text
/// without the label passes through trimmed.
#[must_use]
pub fn strip_label(text: &str, label: &str) -> String {
    match text.find(label) {
        Some(pos) => {
            let mut remainder = String::with_capacity(text.len() - label.len());
            remainder.push_str(&text[..pos]);
            remainder.push_str(&text[pos + label.len()..]);
            remainder.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        None => text.trim().to_string(),
    }
}
