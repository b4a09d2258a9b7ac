use lazy_static::lazy_static;
use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::error::Result;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
}

const HIGHLIGHT_CLASS: &str = "hljs";
const DEFAULT_LANGUAGE: &str = "java";
const TOKEN_CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

/// First word of a fenced code block's info string.
pub fn language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

/// Renders a code block with classed spans for every recognized token.
/// A named language that is not recognized is rendered as escaped plain text.
pub fn highlighted_code_block(language: Option<&str>, code: &str) -> Result<String> {
    let syntax = match language {
        Some(token) => SYNTAX_SET.find_syntax_by_token(token),
        None => detect_syntax(code),
    };

    let body = match syntax {
        Some(syntax) => {
            let mut generator =
                ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, TOKEN_CLASS_STYLE);
            for line in LinesWithEndings::from(code) {
                generator.parse_html_for_line_which_includes_newline(line)?;
            }
            generator.finalize()
        }
        None => escape_html(code),
    };

    Ok(format!(
        "<pre><code class=\"{}\">{}</code></pre>\n",
        code_classes(HIGHLIGHT_CLASS, language),
        body
    ))
}

/// Blocks without a language are guessed from a shebang or similar first
/// line, and are otherwise taken to be Java.
fn detect_syntax(code: &str) -> Option<&'static SyntaxReference> {
    SYNTAX_SET
        .find_syntax_by_first_line(code)
        .or_else(|| SYNTAX_SET.find_syntax_by_token(DEFAULT_LANGUAGE))
}

/// Same markup as the stock CommonMark renderer.
pub fn plain_code_block(language: Option<&str>, code: &str) -> String {
    match language {
        Some(_) => format!(
            "<pre><code class=\"{}\">{}</code></pre>\n",
            code_classes("", language),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", escape_html(code)),
    }
}

fn code_classes(base: &str, language: Option<&str>) -> String {
    let mut classes = String::from(base);
    if let Some(language) = language {
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str("language-");
        classes.push_str(&escape_html(language));
    }
    classes
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // Writing to a `String` cannot fail.
    let _ = pulldown_cmark_escape::escape_html(&mut escaped, text);
    escaped
}
