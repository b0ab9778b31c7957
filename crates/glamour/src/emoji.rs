//! `:shortcode:` emoji substitution.

use std::sync::LazyLock;

use regex::Regex;

static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-z0-9_+\-]+):").expect("valid shortcode regex"));

/// A run of text split around known shortcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Plain text.
    Text(&'a str),
    /// A recognised shortcode and its Unicode value.
    Emoji {
        /// Shortcode without the colons.
        shortcode: &'a str,
        /// Emoji text.
        value: &'static str,
    },
}

/// Looks up a shortcode (without colons).
#[must_use]
pub fn lookup(shortcode: &str) -> Option<&'static str> {
    EMOJI
        .binary_search_by(|(name, _)| name.cmp(&shortcode))
        .ok()
        .map(|i| EMOJI[i].1)
}

/// Splits `text` into plain runs and known emoji. Unknown shortcodes stay
/// in the plain runs.
#[must_use]
pub fn split(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for caps in SHORTCODE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(value) = lookup(name.as_str()) else {
            continue;
        };
        if whole.start() > last {
            pieces.push(Piece::Text(&text[last..whole.start()]));
        }
        pieces.push(Piece::Emoji {
            shortcode: name.as_str(),
            value,
        });
        last = whole.end();
    }
    if last < text.len() {
        pieces.push(Piece::Text(&text[last..]));
    }
    pieces
}

// Sorted by shortcode.
const EMOJI: &[(&str, &str)] = &[
    ("+1", "👍"),
    ("-1", "👎"),
    ("100", "💯"),
    ("angry", "😠"),
    ("apple", "🍎"),
    ("arrow_down", "⬇️"),
    ("arrow_left", "⬅️"),
    ("arrow_right", "➡️"),
    ("arrow_up", "⬆️"),
    ("beer", "🍺"),
    ("bell", "🔔"),
    ("blush", "😊"),
    ("bomb", "💣"),
    ("book", "📖"),
    ("bookmark", "🔖"),
    ("boom", "💥"),
    ("bug", "🐛"),
    ("bulb", "💡"),
    ("calendar", "📆"),
    ("cat", "🐱"),
    ("check", "✔️"),
    ("clap", "👏"),
    ("clipboard", "📋"),
    ("cloud", "☁️"),
    ("coffee", "☕"),
    ("computer", "💻"),
    ("confused", "😕"),
    ("construction", "🚧"),
    ("cool", "🆒"),
    ("cry", "😢"),
    ("dog", "🐶"),
    ("eyes", "👀"),
    ("fire", "🔥"),
    ("gear", "⚙️"),
    ("gem", "💎"),
    ("ghost", "👻"),
    ("gift", "🎁"),
    ("globe_with_meridians", "🌐"),
    ("grin", "😁"),
    ("grinning", "😀"),
    ("hammer", "🔨"),
    ("heart", "❤️"),
    ("heavy_check_mark", "✔️"),
    ("hourglass", "⌛"),
    ("info", "ℹ️"),
    ("joy", "😂"),
    ("key", "🔑"),
    ("laughing", "😆"),
    ("link", "🔗"),
    ("lock", "🔒"),
    ("mag", "🔍"),
    ("memo", "📝"),
    ("moon", "🌙"),
    ("muscle", "💪"),
    ("no_entry", "⛔"),
    ("ok", "🆗"),
    ("ok_hand", "👌"),
    ("package", "📦"),
    ("pencil", "📝"),
    ("point_right", "👉"),
    ("pray", "🙏"),
    ("question", "❓"),
    ("raised_hands", "🙌"),
    ("recycle", "♻️"),
    ("rocket", "🚀"),
    ("rotating_light", "🚨"),
    ("scream", "😱"),
    ("see_no_evil", "🙈"),
    ("shield", "🛡️"),
    ("shrug", "🤷"),
    ("skull", "💀"),
    ("sleeping", "😴"),
    ("smile", "😄"),
    ("smiley", "😃"),
    ("smirk", "😏"),
    ("snake", "🐍"),
    ("sparkles", "✨"),
    ("star", "⭐"),
    ("sunglasses", "😎"),
    ("sunny", "☀️"),
    ("tada", "🎉"),
    ("thinking", "🤔"),
    ("thumbsdown", "👎"),
    ("thumbsup", "👍"),
    ("trophy", "🏆"),
    ("truck", "🚚"),
    ("unlock", "🔓"),
    ("warning", "⚠️"),
    ("wave", "👋"),
    ("white_check_mark", "✅"),
    ("wink", "😉"),
    ("wrench", "🔧"),
    ("x", "❌"),
    ("zap", "⚡"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(EMOJI.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn looks_up_known_codes() {
        assert_eq!(lookup("rocket"), Some("🚀"));
        assert_eq!(lookup("+1"), Some("👍"));
        assert_eq!(lookup("not_an_emoji"), None);
    }

    #[test]
    fn splits_around_known_codes() {
        let pieces = split("ship it :rocket: now :nope:");
        assert_eq!(
            pieces,
            vec![
                Piece::Text("ship it "),
                Piece::Emoji {
                    shortcode: "rocket",
                    value: "🚀"
                },
                Piece::Text(" now :nope:"),
            ]
        );
    }

    #[test]
    fn text_without_codes_is_one_piece() {
        assert_eq!(split("10:30 am"), vec![Piece::Text("10:30 am")]);
    }
}
