//! `:shortcode:` replacement for commit summaries

use regex::{Captures, Regex};
use std::sync::OnceLock;

const EMOJI: &[(&str, &str)] = &[
    ("art", "🎨"),
    ("bug", "🐛"),
    ("memo", "📝"),
    ("rocket", "🚀"),
    ("sparkles", "✨"),
    ("fire", "🔥"),
    ("zap", "⚡"),
    ("white_check_mark", "✅"),
    ("lock", "🔒"),
    ("bookmark", "🔖"),
    ("construction", "🚧"),
    ("recycle", "♻️"),
    ("heavy_plus_sign", "➕"),
    ("heavy_minus_sign", "➖"),
    ("wrench", "🔧"),
    ("hammer", "🔨"),
    ("lipstick", "💄"),
    ("tada", "🎉"),
    ("ambulance", "🚑"),
    ("truck", "🚚"),
    ("boom", "💥"),
    ("twisted_rightwards_arrows", "🔀"),
    ("rewind", "⏪"),
    ("arrow_up", "⬆️"),
    ("arrow_down", "⬇️"),
    ("pencil2", "✏️"),
    ("green_heart", "💚"),
    ("rotating_light", "🚨"),
    ("package", "📦"),
    ("see_no_evil", "🙈"),
    ("wastebasket", "🗑️"),
    ("+1", "👍"),
    ("-1", "👎"),
    ("heart", "❤️"),
    ("smile", "😄"),
    ("warning", "⚠️"),
];

fn shortcode_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":([a-z0-9_+\-]+):").ok())
        .as_ref()
}

pub fn lookup(code: &str) -> Option<&'static str> {
    EMOJI.iter().find(|(name, _)| *name == code).map(|(_, e)| *e)
}

/// Replace known `:shortcodes:`; unknown ones are left as typed.
pub fn emojify(text: &str) -> String {
    if !text.contains(':') {
        return text.to_string();
    }
    let Some(re) = shortcode_re() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures<'_>| match lookup(&caps[1]) {
        Some(emoji) => emoji.to_string(),
        None => caps[0].to_string(),
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_replaced() {
        assert_eq!(emojify(":bug: fix crash"), "🐛 fix crash");
        assert_eq!(emojify("release :tada::rocket:"), "release 🎉🚀");
    }

    #[test]
    fn unknown_codes_and_plain_colons_survive() {
        assert_eq!(emojify(":nope: thing"), ":nope: thing");
        assert_eq!(emojify("fix: handle a:b"), "fix: handle a:b");
    }
}
