use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

use crate::app::{BotError, Result};

/// Converts post markup into Markdown.
///
/// Relative links and image sources are resolved against the source's
/// domain. Horizontal rules come out as `* * *` and emphasis as `_text_`.
pub struct MarkdownConverter {
    base: Url,
}

#[derive(Clone, Copy, Default)]
struct Context {
    in_pre: bool,
}

impl MarkdownConverter {
    pub fn new(domain: &str) -> Result<Self> {
        let base = Url::parse(&format!("https://{domain}"))
            .map_err(|e| BotError::Markdown(format!("invalid domain {domain:?}: {e}")))?;
        Ok(Self { base })
    }

    pub fn convert(&self, html: &str) -> Result<String> {
        let fragment = Html::parse_fragment(html);
        let raw = self.children(fragment.root_element(), Context::default());
        Ok(normalize(&raw))
    }

    fn children(&self, element: ElementRef<'_>, ctx: Context) -> String {
        let mut out = String::new();

        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    if ctx.in_pre {
                        out.push_str(text);
                    } else {
                        push_collapsed(&mut out, text);
                    }
                }
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        out.push_str(&self.element(child, ctx));
                    }
                }
                _ => {}
            }
        }

        out
    }

    fn element(&self, element: ElementRef<'_>, ctx: Context) -> String {
        let tag = element.value().name();

        match tag {
            "script" | "style" | "noscript" | "head" | "iframe" | "svg" | "button" | "form" => {
                String::new()
            }
            "br" => "\n".to_string(),
            "hr" => "\n\n* * *\n\n".to_string(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                let text = self.children(element, ctx);
                let text = text.trim();
                if text.is_empty() {
                    return String::new();
                }
                format!("\n\n{} {}\n\n", "#".repeat(level), text.replace('\n', " "))
            }
            "p" | "div" | "section" | "article" | "header" | "footer" | "main" | "figure"
            | "figcaption" | "center" | "aside" | "table" | "dl" => {
                block(self.children(element, ctx).trim())
            }
            "tr" | "dt" | "dd" => format!("\n{}\n", self.children(element, ctx).trim()),
            "td" | "th" => format!("{} ", self.children(element, ctx).trim()),
            "strong" | "b" => wrap_inline(&self.children(element, ctx), "**"),
            "em" | "i" | "cite" => wrap_inline(&self.children(element, ctx), "_"),
            "del" | "s" | "strike" => wrap_inline(&self.children(element, ctx), "~~"),
            "code" if !ctx.in_pre => {
                let code = element.text().collect::<String>();
                if code.trim().is_empty() {
                    code
                } else {
                    format!("`{}`", code.trim())
                }
            }
            "pre" => {
                let code = element.text().collect::<String>();
                let code = code.trim_matches('\n');
                if code.trim().is_empty() {
                    return String::new();
                }
                format!("\n\n```\n{code}\n```\n\n")
            }
            "blockquote" => {
                let inner = normalize(&self.children(element, ctx));
                if inner.is_empty() {
                    return String::new();
                }
                let quoted = inner
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {line}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                block(&quoted)
            }
            "ul" | "ol" => self.list(element, ctx, tag == "ol"),
            "a" => self.link(element, ctx),
            "img" => self.image(element),
            _ => self.children(element, ctx),
        }
    }

    fn list(&self, element: ElementRef<'_>, ctx: Context, ordered: bool) -> String {
        let mut items = Vec::new();

        for item in element.children().filter_map(ElementRef::wrap) {
            if item.value().name() != "li" {
                continue;
            }

            let marker = if ordered {
                format!("{}. ", items.len() + 1)
            } else {
                "- ".to_string()
            };
            let indent = " ".repeat(marker.chars().count());
            let content = normalize(&self.children(item, ctx)).replace('\n', &format!("\n{indent}"));
            items.push(format!("{marker}{content}"));
        }

        if items.is_empty() {
            return String::new();
        }

        block(&items.join("\n"))
    }

    fn link(&self, element: ElementRef<'_>, ctx: Context) -> String {
        let text = self.children(element, ctx);
        let label = text.trim();

        let Some(href) = element.value().attr("href").map(str::trim) else {
            return text;
        };
        if label.is_empty() || href.is_empty() {
            return text;
        }

        let (lead, trail) = edges(&text);
        format!("{lead}[{label}]({}){trail}", self.resolve(href))
    }

    fn image(&self, element: ElementRef<'_>) -> String {
        let Some(src) = element.value().attr("src").map(str::trim) else {
            return String::new();
        };
        if src.is_empty() {
            return String::new();
        }

        let alt = element.value().attr("alt").unwrap_or("").trim();
        format!("![{alt}]({})", self.resolve(src))
    }

    fn resolve(&self, href: &str) -> String {
        if href.starts_with('#') || href.starts_with("mailto:") {
            return href.to_string();
        }
        self.base
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut last_space = out.ends_with(' ');
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(c);
            last_space = false;
        }
    }
}

fn block(inner: &str) -> String {
    if inner.is_empty() {
        String::new()
    } else {
        format!("\n\n{inner}\n\n")
    }
}

/// Leading and trailing whitespace of an inline run, kept outside markers.
fn edges(text: &str) -> (&'static str, &'static str) {
    let lead = if text.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if text.ends_with(char::is_whitespace) { " " } else { "" };
    (lead, trail)
}

fn wrap_inline(text: &str, marker: &str) -> String {
    let inner = text.trim();
    if inner.is_empty() {
        return text.to_string();
    }
    let (lead, trail) = edges(text);
    format!("{lead}{marker}{inner}{marker}{trail}")
}

/// Trim line ends, squeeze blank line runs to one and strip outer blank lines.
fn normalize(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in raw.lines() {
        let line = if in_fence { line } else { line.trim_end() };
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        let blank = line.trim().is_empty();
        if blank && !in_fence && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(if blank && !in_fence { "" } else { line });
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
