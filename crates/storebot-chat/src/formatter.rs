use crate::classifier::Language;

const MAX_EXCERPT_CHARS: usize = 300;
/// A sentence cut must keep more than this many characters.
const MIN_SENTENCE_CUT: usize = 100;

/// Wraps an excerpt in the reply template for `language`, with a bold title
/// header when the title is meaningful.
#[must_use]
pub fn format_reply(excerpt: &str, language: Language, title: Option<&str>) -> String {
    let excerpt = shorten(excerpt.trim());
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("product"));

    match (language, title) {
        (Language::English, Some(title)) => {
            format!("✨ **{title}**\n\n{excerpt}\n\nWant more details?")
        }
        (Language::English, None) => format!("{excerpt}\n\nNeed more info?"),
        (Language::Urdu, Some(title)) => {
            format!("✨ **{title}**\n\n{excerpt}\n\n💬 Aur details chahiye?")
        }
        (Language::Urdu, None) => format!("{excerpt}\n\n💬 Kya aur janana chahein?"),
    }
}

/// Cuts to 300 characters, preferring to end on a sentence.
fn shorten(excerpt: &str) -> String {
    if excerpt.chars().count() <= MAX_EXCERPT_CHARS {
        return excerpt.to_string();
    }

    let cut: String = excerpt.chars().take(MAX_EXCERPT_CHARS).collect();
    match cut.rfind('.') {
        Some(idx) if cut[..idx].chars().count() > MIN_SENTENCE_CUT => cut[..=idx].to_string(),
        _ => format!("{cut}..."),
    }
}
