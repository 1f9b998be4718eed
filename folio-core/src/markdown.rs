use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use std::sync::LazyLock;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

// Not Options::all(): metadata blocks would swallow a body that opens with
// a `---` rule, and smart punctuation rewrites the author's quotes.
fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Convert a markdown body into an HTML fragment.
///
/// Never fails: anything the parser does not understand falls through as
/// text. Fenced code blocks tagged with a known language are highlighted.
pub fn render_markdown(source: &str) -> String {
    let events = HighlightFenced {
        inner: Parser::new_ext(source, options()),
    };
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Replaces each fenced code block with a single pre-rendered HTML event.
struct HighlightFenced<I> {
    inner: I,
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for HighlightFenced<I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let lang = match self.inner.next()? {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => lang,
            other => return Some(other),
        };

        let mut code = String::new();
        for event in self.inner.by_ref() {
            match event {
                Event::End(TagEnd::CodeBlock) => break,
                Event::Text(text) => code.push_str(&text),
                _ => {}
            }
        }
        Some(Event::Html(highlight_code(&lang, &code).into()))
    }
}

fn highlight_code(lang: &str, code: &str) -> String {
    let plain = || format!("<pre><code>{}</code></pre>\n", html_escape::encode_text(code));

    let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang.trim()) else {
        return plain();
    };
    let theme = &THEME_SET.themes[CODE_THEME];
    highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme).unwrap_or_else(|_| plain())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_emphasis() {
        let html = render_markdown("# Hi\n\nSome *text* and **more**.\n");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<em>text</em>"));
        assert!(html.contains("<strong>more</strong>"));
    }

    #[test]
    fn renders_lists_and_links() {
        let html = render_markdown("- one\n- [two](/two/)\n");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<a href=\"/two/\">two</a>"));
    }

    #[test]
    fn unknown_language_is_escaped_plain_block() {
        let html = render_markdown("```nosuchlang\n<b>x</b>\n```\n");
        assert!(html.contains("<pre><code>&lt;b&gt;x&lt;/b&gt;\n</code></pre>"));
    }

    #[test]
    fn known_language_is_highlighted() {
        let html = render_markdown("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn leading_rule_and_quotes_are_kept() {
        let html = render_markdown("---\n\nSay \"hi\"\n\n---\n");
        assert_eq!(html.matches("<hr />").count(), 2);
        assert!(html.contains("Say &quot;hi&quot;"));
    }

    #[test]
    fn malformed_markdown_degrades_to_text() {
        let html = render_markdown("**unclosed [link(\n");
        assert!(html.contains("**unclosed [link("));
    }
}
