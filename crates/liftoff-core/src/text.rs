//! Text helpers shared by the metadata generators

use regex::Regex;
use std::sync::LazyLock;

/// Emoji and pictograph ranges removed from store titles
static EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        "\u{1F600}-\u{1F64F}",
        "\u{1F300}-\u{1F5FF}",
        "\u{1F680}-\u{1F6FF}",
        "\u{1F700}-\u{1F77F}",
        "\u{1F780}-\u{1F7FF}",
        "\u{1F800}-\u{1F8FF}",
        "\u{1F900}-\u{1F9FF}",
        "\u{1FA00}-\u{1FA6F}",
        "\u{1FA70}-\u{1FAFF}",
        "\u{2600}-\u{26FF}",
        "\u{2700}-\u{27BF}",
        "]+"
    ))
    .expect("Invalid regex")
});

/// A word followed by a capitalized word, e.g. `fooBar` or `HTTPServer`
static CAMEL_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("Invalid regex"));

/// A lowercase letter or digit followed by an uppercase letter
static CAMEL_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid regex"));

/// Title-case text word by word.
///
/// Every letter that follows a non-letter is upper-cased and every other
/// letter is lower-cased.
///
/// ```rust
/// use liftoff_core::text::title_case;
///
/// assert_eq!(title_case("godot dice roller"), "Godot Dice Roller");
/// assert_eq!(title_case("3d VIEWER"), "3D Viewer");
/// ```
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

/// Remove emoji and pictographs from text
pub fn strip_emoji(text: &str) -> String {
    EMOJI_REGEX.replace_all(text, "").into_owned()
}

/// Insert underscores at camel-case boundaries (`myCoolShot` -> `my_Cool_Shot`)
pub fn split_camel_case(text: &str) -> String {
    let words = CAMEL_WORD_REGEX.replace_all(text, "${1}_${2}");
    CAMEL_BOUNDARY_REGEX
        .replace_all(&words, "${1}_${2}")
        .into_owned()
}

/// Turn an identifier-like file stem into a human readable caption
///
/// ```rust
/// use liftoff_core::text::humanize_stem;
///
/// assert_eq!(humanize_stem("myCoolShot-2"), "My Cool Shot 2");
/// assert_eq!(humanize_stem("main_menu"), "Main Menu");
/// ```
pub fn humanize_stem(stem: &str) -> String {
    let spaced = split_camel_case(stem).replace(['-', '_'], " ");
    title_case(&spaced)
}
