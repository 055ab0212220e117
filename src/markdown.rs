use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use unicode_width::UnicodeWidthStr;

/// Maps the raw markdown returned by the generation service to the string
/// shown in the content area. Injected into the app so tests can substitute
/// a stub.
pub trait MarkupRenderer {
    fn render(&self, raw: &str) -> String;
}

/// Renders markdown into plain readable text: underlined headings, bulleted
/// and numbered lists, indented code blocks, quoted blockquotes.
pub struct TextRenderer;

impl MarkupRenderer for TextRenderer {
    fn render(&self, raw: &str) -> String {
        let mut out = String::new();
        // Byte offset where the current heading's text begins, so the
        // underline can match its display width.
        let mut heading_start: Option<(HeadingLevel, usize)> = None;
        let mut list_stack: Vec<Option<u64>> = Vec::new();
        let mut in_code_block = false;
        let mut quote_depth: usize = 0;

        for event in Parser::new(raw) {
            match event {
                Event::Start(Tag::Heading(level, _, _)) => {
                    heading_start = Some((level, out.len()));
                }
                Event::End(Tag::Heading(..)) => {
                    if let Some((level, start)) = heading_start.take() {
                        let width = UnicodeWidthStr::width(&out[start..]).max(1);
                        match level {
                            HeadingLevel::H1 => {
                                out.push('\n');
                                out.push_str(&"=".repeat(width));
                            }
                            HeadingLevel::H2 => {
                                out.push('\n');
                                out.push_str(&"-".repeat(width));
                            }
                            _ => {}
                        }
                        out.push_str("\n\n");
                    }
                }
                Event::Start(Tag::Paragraph) => {
                    if quote_depth > 0 {
                        out.push_str(&"> ".repeat(quote_depth));
                    }
                }
                Event::End(Tag::Paragraph) => out.push_str("\n\n"),
                Event::Start(Tag::BlockQuote) => quote_depth += 1,
                Event::End(Tag::BlockQuote) => quote_depth = quote_depth.saturating_sub(1),
                Event::Start(Tag::List(start)) => list_stack.push(start),
                Event::End(Tag::List(_)) => {
                    list_stack.pop();
                    if list_stack.is_empty() {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Item) => {
                    out.push_str(&"  ".repeat(list_stack.len().saturating_sub(1)));
                    match list_stack.last_mut() {
                        Some(Some(n)) => {
                            out.push_str(&format!("{}. ", n));
                            *n += 1;
                        }
                        _ => out.push_str("• "),
                    }
                }
                Event::End(Tag::Item) => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                }
                Event::End(Tag::CodeBlock(_)) => {
                    in_code_block = false;
                    out.push('\n');
                }
                Event::End(Tag::Link(_, dest, _)) => {
                    if !dest.is_empty() {
                        out.push_str(&format!(" ({})", dest));
                    }
                }
                Event::Text(text) => {
                    if in_code_block {
                        for line in text.lines() {
                            out.push_str("    ");
                            out.push_str(line);
                            out.push('\n');
                        }
                    } else {
                        out.push_str(&text);
                    }
                }
                Event::Code(code) => {
                    out.push('`');
                    out.push_str(&code);
                    out.push('`');
                }
                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                Event::Rule => out.push_str(&format!("{}\n\n", "─".repeat(40))),
                _ => {}
            }
        }

        if out.trim_end().is_empty() {
            String::new()
        } else {
            let mut rendered = out.trim_end().to_string();
            rendered.push('\n');
            rendered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h1_is_underlined_to_width() {
        let rendered = TextRenderer.render("# Hello");
        assert_eq!(rendered, "Hello\n=====\n");
    }

    #[test]
    fn test_h2_uses_dashes() {
        let rendered = TextRenderer.render("## Key Points");
        assert_eq!(rendered, "Key Points\n----------\n");
    }

    #[test]
    fn test_paragraphs_and_lists() {
        let rendered = TextRenderer.render("intro\n\n- first\n- second\n");
        assert_eq!(rendered, "intro\n\n• first\n• second\n");
    }

    #[test]
    fn test_ordered_list_counts() {
        let rendered = TextRenderer.render("1. one\n2. two\n");
        assert_eq!(rendered, "1. one\n2. two\n");
    }

    #[test]
    fn test_code_block_is_indented() {
        let rendered = TextRenderer.render("```\nlet x = 1;\n```\n");
        assert_eq!(rendered, "    let x = 1;\n");
    }

    #[test]
    fn test_inline_code_kept_in_backticks() {
        let rendered = TextRenderer.render("run `cargo run` now");
        assert_eq!(rendered, "run `cargo run` now\n");
    }

    #[test]
    fn test_link_destination_appended() {
        let rendered = TextRenderer.render("[docs](https://example.com)");
        assert_eq!(rendered, "docs (https://example.com)\n");
    }

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(TextRenderer.render(""), "");
        assert_eq!(TextRenderer.render("   \n"), "");
    }
}
