//! Post rendering for chat messages.
//!
//! ```text
//! HTML → MarkdownConverter → truncate → repair → "📝 [title](url)\n\n<body>\n\n<trailer>"
//! ```

mod converter;

pub use converter::MarkdownConverter;

use crate::app::{BotError, Result};
use crate::domain::{PostDetail, Source};

/// Longest preview body, in characters, before it is cut at the next line end.
pub const POST_MAX_LENGTH: usize = 1500;

pub const POST_PREFIX: &str = "📝";

/// Substitutions fixing known conversion artifacts, applied in order.
///
/// `* * *` comes from ad separators rendered as rules and ``` from inline
/// snippets detected as code blocks; both break once a preview is cut.
const REPAIRS: [(&str, &str); 7] = [
    ("* * *", ""),
    ("```", ""),
    ("![]", "[Image]"),
    ("[[", "["),
    ("]]", "]"),
    ("_[", "["),
    ("]_", "]"),
];

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    max_length: usize,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(POST_MAX_LENGTH)
    }
}

impl MarkdownRenderer {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Render a fetched post the way its source wants it shown.
    pub fn render_post(&self, post: &PostDetail, source: Source) -> Result<String> {
        self.render(
            &post.html,
            post.title(),
            post.url(),
            source.domain(),
            source.url_with_text(),
        )
    }

    /// Convert `html` and frame it with the title link and a trailing
    /// reference: the titled link when `url_with_text` is set, the bare URL
    /// otherwise.
    pub fn render(
        &self,
        html: &str,
        title: &str,
        url: &str,
        domain: &str,
        url_with_text: bool,
    ) -> Result<String> {
        let converted = MarkdownConverter::new(domain)
            .and_then(|converter| converter.convert(html))
            .map_err(|e| match e {
                BotError::Markdown(msg) => BotError::Markdown(format!("{domain}: {msg}")),
                other => BotError::Markdown(format!("{domain}: {other}")),
            })?;

        let markdown = repair(truncate(&converted, self.max_length));

        let link = format!("[{title}]({url})");
        let trailer = if url_with_text { link.as_str() } else { url };

        Ok(format!("{POST_PREFIX} {link}\n\n{markdown}\n\n{trailer}"))
    }
}

/// Cut `markdown` to `max_chars` characters, then extend the cut to the end
/// of the current line. Text without a later line end is returned whole.
pub fn truncate(markdown: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = markdown.char_indices().nth(max_chars) else {
        return markdown;
    };

    match markdown[cut..].find('\n') {
        Some(n) => &markdown[..cut + n],
        None => markdown,
    }
}

/// Apply [`REPAIRS`] until none of them matches any more.
pub fn repair(markdown: &str) -> String {
    let mut text = markdown.to_string();

    loop {
        let mut next = strip_link_emphasis(&text);
        for (from, to) in REPAIRS {
            while next.contains(from) {
                next = next.replace(from, to);
            }
        }

        if next == text {
            return text;
        }
        text = next;
    }
}

/// Drop emphasis wrapped around a whole link: `_[label](href)_` becomes
/// `[label](href)`.
fn strip_link_emphasis(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut rest = markdown;

    while let Some(start) = rest.find("_[") {
        out.push_str(&rest[..start]);
        let link = &rest[start + 1..];

        match link_len(link) {
            Some(len) if link[len..].starts_with('_') => {
                out.push_str(&link[..len]);
                rest = &link[len + 1..];
            }
            _ => {
                out.push('_');
                rest = link;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte length of the single-line `[label](href)` at the start of `text`.
fn link_len(text: &str) -> Option<usize> {
    let label_end = text.find("](")?;
    let href_end = text[label_end + 2..].find(')')?;
    let len = label_end + 2 + href_end + 1;

    (!text[..len].contains('\n')).then_some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_not_truncated() {
        assert_eq!(truncate("abc\ndef", 10), "abc\ndef");
        assert_eq!(truncate("abcdefghij", 10), "abcdefghij");
    }

    #[test]
    fn test_truncate_extends_to_line_end() {
        let text = "first line\nsecond line\nthird line";
        assert_eq!(truncate(text, 3), "first line");
        assert_eq!(truncate(text, 13), "first line\nsecond line");
    }

    #[test]
    fn test_truncate_without_later_newline_keeps_everything() {
        let text = "line\nlong last line without end";
        assert_eq!(truncate(text, 8), text);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = format!("{}\n{}", "ж".repeat(10), "ё".repeat(10));
        assert_eq!(truncate(&text, 5), "ж".repeat(10));

        // The cut lands between multi-byte characters without splitting one.
        let mixed = "ab😀😀😀cd\nrest";
        assert_eq!(truncate(mixed, 3), "ab😀😀😀cd");
    }

    #[test]
    fn test_truncated_length_is_bounded_by_one_line() {
        let lines: Vec<String> = (0..200).map(|i| format!("line number {i}")).collect();
        let text = lines.join("\n");
        let cut = truncate(&text, 100);
        let longest_line = lines.iter().map(|l| l.chars().count()).max().unwrap();
        assert!(cut.chars().count() <= 100 + longest_line);
        assert!(text.starts_with(cut));
    }

    #[test]
    fn test_repairs() {
        assert_eq!(repair("a\n\n* * *\n\nb"), "a\n\n\n\nb");
        assert_eq!(repair("```\ncode\n```"), "\ncode\n");
        assert_eq!(repair("![](https://x/y.png)"), "[Image](https://x/y.png)");
        assert_eq!(repair("[[1]](https://x)"), "[1](https://x)");
        assert_eq!(repair("_[link](https://x)_"), "[link](https://x)");
        assert_eq!(repair("_[a](b)_ and _c_"), "[a](b) and _c_");
        assert_eq!(repair("see [note]_ here"), "see [note] here");
    }

    #[test]
    fn test_repair_is_idempotent() {
        let samples = [
            "[[[nested]]]",
            "[_[x]_]",
            "![]![]",
            "* * * * * *",
            "````",
            "_[[![](a)]]_",
            "plain text",
        ];

        for sample in samples {
            let once = repair(sample);
            assert_eq!(repair(&once), once, "{sample}");
            for (pattern, _) in REPAIRS {
                assert!(!once.contains(pattern), "{sample} -> {once}");
            }
        }
    }

    #[test]
    fn test_emphasized_link_keeps_underscores_balanced() {
        let renderer = MarkdownRenderer::default();
        let got = renderer
            .render(
                "<p>See <em><a href=\"/w/x\">the map</a></em> now.</p>",
                "Post",
                "https://lesswrong.ru/w/post",
                "lesswrong.ru",
                true,
            )
            .unwrap();

        let body = got.split("\n\n").nth(1).unwrap();
        assert_eq!(body, "See [the map](https://lesswrong.ru/w/x) now.");
        assert_eq!(got.matches('_').count() % 2, 0);
    }

    #[test]
    fn test_render_layout_with_bare_url() {
        let renderer = MarkdownRenderer::default();
        let got = renderer
            .render(
                "<p>Hello</p>",
                "Post",
                "https://slatestarcodex.com/p",
                "slatestarcodex.com",
                false,
            )
            .unwrap();
        assert_eq!(
            got,
            "📝 [Post](https://slatestarcodex.com/p)\n\nHello\n\nhttps://slatestarcodex.com/p"
        );
    }

    #[test]
    fn test_render_layout_with_titled_link() {
        let renderer = MarkdownRenderer::default();
        let got = renderer
            .render("<p>Привет</p>", "Пост", "https://lesswrong.ru/w/x", "lesswrong.ru", true)
            .unwrap();
        assert_eq!(
            got,
            "📝 [Пост](https://lesswrong.ru/w/x)\n\nПривет\n\n[Пост](https://lesswrong.ru/w/x)"
        );
    }

    #[test]
    fn test_render_truncates_long_posts() {
        let paragraphs: String = (0..100)
            .map(|i| format!("<p>Paragraph {i} with some words in it.</p>"))
            .collect();
        let renderer = MarkdownRenderer::new(200);
        let got = renderer
            .render(&paragraphs, "T", "https://a.b/c", "a.b", false)
            .unwrap();

        let prefix = "📝 [T](https://a.b/c)\n\n";
        assert!(got.starts_with(prefix));
        assert!(got.ends_with("\n\nhttps://a.b/c"));
        assert!(got.contains("Paragraph 0 with"));
        assert!(!got.contains("Paragraph 99"));
        let body = &got[prefix.len()..got.len() - "\n\nhttps://a.b/c".len()];
        assert!(body.chars().count() <= 200 + "Paragraph 99 with some words in it.".len());
    }

    #[test]
    fn test_render_fails_on_invalid_domain() {
        let renderer = MarkdownRenderer::default();
        let err = renderer
            .render("<p>x</p>", "T", "u", "", false)
            .unwrap_err();
        assert!(matches!(err, BotError::Markdown(_)));
    }
}
