use std::fmt;

pub const DOMAIN_LESSWRONG_RU: &str = "lesswrong.ru";
pub const DOMAIN_SLATE: &str = "slatestarcodex.com";
pub const DOMAIN_ASTRAL: &str = "astralcodexten.substack.com";
pub const DOMAIN_LESSWRONG: &str = "lesswrong.com";

/// A content origin the bot can read posts from.
///
/// Each variant is registered with a short user-facing code. Anything that
/// doesn't match a registered code is not a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Source {
    #[default]
    LesswrongRu,
    SlateStarCodex,
    AstralCodexTen,
    Lesswrong,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::LesswrongRu,
        Source::SlateStarCodex,
        Source::AstralCodexTen,
        Source::Lesswrong,
    ];

    /// Parse a code like `"2"`. Only the exact code matches.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Resolve a code to its base URL, returning an empty string and `false`
    /// for empty, unknown or malformed input.
    pub fn resolve(code: &str) -> (String, bool) {
        match Self::from_code(code) {
            Some(source) => (source.base_url(), true),
            None => (String::new(), false),
        }
    }

    /// Interpret a stored preference, falling back to the default source when
    /// it is absent or no longer valid.
    pub fn from_preference(stored: Option<&str>) -> Self {
        stored.and_then(Self::from_code).unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        match self {
            Source::LesswrongRu => "1",
            Source::SlateStarCodex => "2",
            Source::AstralCodexTen => "3",
            Source::Lesswrong => "4",
        }
    }

    pub fn domain(self) -> &'static str {
        match self {
            Source::LesswrongRu => DOMAIN_LESSWRONG_RU,
            Source::SlateStarCodex => DOMAIN_SLATE,
            Source::AstralCodexTen => DOMAIN_ASTRAL,
            Source::Lesswrong => DOMAIN_LESSWRONG,
        }
    }

    pub fn base_url(self) -> String {
        format!("https://{}", self.domain())
    }

    /// Human readable name used in the help message.
    pub fn title(self) -> &'static str {
        match self {
            Source::LesswrongRu => "Lesswrong.ru",
            Source::SlateStarCodex => "Slate Star Codex",
            Source::AstralCodexTen => "Astral Codex Ten",
            Source::Lesswrong => "Lesswrong.com",
        }
    }

    /// Key under which the post listing is cached. Sources without a
    /// listing (queried on demand) have none.
    pub fn cache_key(self) -> Option<&'static str> {
        match self {
            Source::LesswrongRu => Some("posts:lesswrong.ru"),
            Source::SlateStarCodex => Some("posts:slatestarcodex"),
            Source::AstralCodexTen => Some("posts:astralcodexten"),
            Source::Lesswrong => None,
        }
    }

    /// Whether a rendered post ends with the titled link instead of the bare
    /// URL. lesswrong.ru links don't unfurl in chat clients, so the title is
    /// repeated there.
    pub fn url_with_text(self) -> bool {
        matches!(self, Source::LesswrongRu)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://{}", self.domain())
    }
}
