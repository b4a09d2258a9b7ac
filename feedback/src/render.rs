use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use report::junit::TestCase;

use crate::{
    condition::Condition,
    error::{FeedbackError, Result},
    highlight,
};

pub const DEFAULT_MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// How many conditional blocks may be nested inside each other.
    pub max_depth: usize,
    /// Ordinary code blocks get syntax highlighting when set.
    pub highlight_code: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            highlight_code: true,
        }
    }
}

/// What happens to a single code block. Blocks are decided independently of
/// each other.
#[derive(Debug)]
enum BlockAction<'c> {
    /// No test outcome is available: describe the condition instead.
    ExplanationCard(&'c Condition),
    Suppress,
    RenderContent,
    Passthrough,
}

/// Converts feedback Markdown to HTML, resolving conditional blocks against
/// the outcome of one test.
#[derive(Debug, Clone, Default)]
pub struct FeedbackRenderer {
    options: RenderOptions,
}

impl FeedbackRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders `source` for `test_case`. Without a test case every
    /// conditional block becomes an explanation card, for previewing a
    /// template while it is being written.
    pub fn render(&self, source: &str, test_case: Option<&TestCase>) -> Result<String> {
        self.render_nested(source, test_case, 0)
    }

    pub fn preview(&self, source: &str) -> Result<String> {
        self.render(source, None)
    }

    fn render_nested(&self, source: &str, test_case: Option<&TestCase>, depth: usize) -> Result<String> {
        if depth > self.options.max_depth {
            return Err(FeedbackError::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }

        let mut events = Vec::new();
        let mut open_block: Option<(CodeBlockKind, String)> = None;
        for event in Parser::new_ext(source, markdown_options()) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => open_block = Some((kind, String::new())),
                Event::Text(text) if open_block.is_some() => {
                    if let Some((_, code)) = open_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((kind, code)) = open_block.take() {
                        let block_html = self.render_code_block(kind, &code, test_case, depth)?;
                        if !block_html.is_empty() {
                            events.push(Event::Html(CowStr::from(block_html)));
                        }
                    }
                }
                event => events.push(event),
            }
        }

        let mut output = String::new();
        html::push_html(&mut output, events.into_iter());
        Ok(output)
    }

    fn render_code_block(
        &self,
        kind: CodeBlockKind,
        code: &str,
        test_case: Option<&TestCase>,
        depth: usize,
    ) -> Result<String> {
        let info = match &kind {
            CodeBlockKind::Fenced(info) => Some(&**info),
            CodeBlockKind::Indented => None,
        };
        let condition = match info {
            Some(info) => Condition::parse(info)?,
            None => None,
        };

        match decide(condition.as_ref(), test_case)? {
            BlockAction::ExplanationCard(condition) => {
                log::debug!("Explaining block `{}`", condition.title());
                let body = self.render_nested(code, test_case, depth + 1)?;
                Ok(format!(
                    "<div class=\"card\"><div class=\"card-body\"><h5 class=\"card-title\">{}</h5>{}</div></div>\n",
                    highlight::escape_html(&condition.title()),
                    body
                ))
            }
            BlockAction::Suppress => Ok(String::new()),
            BlockAction::RenderContent => self.render_nested(code, test_case, depth + 1),
            BlockAction::Passthrough => {
                let language = info.and_then(highlight::language);
                if self.options.highlight_code {
                    highlight::highlighted_code_block(language, code)
                } else {
                    Ok(highlight::plain_code_block(language, code))
                }
            }
        }
    }
}

fn decide<'c>(condition: Option<&'c Condition>, test_case: Option<&TestCase>) -> Result<BlockAction<'c>> {
    let action = match (condition, test_case) {
        (None, _) => BlockAction::Passthrough,
        (Some(condition), None) => BlockAction::ExplanationCard(condition),
        (Some(condition), Some(test_case)) => {
            let shown = condition.is_satisfied_by(test_case)?;
            log::debug!(
                "Block `{}` is {} for {}.{}",
                condition.title(),
                if shown { "shown" } else { "hidden" },
                test_case.class_name,
                test_case.name
            );
            if shown {
                BlockAction::RenderContent
            } else {
                BlockAction::Suppress
            }
        }
    };
    Ok(action)
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Renders `source` with the default options.
pub fn render_feedback(source: &str, test_case: Option<&TestCase>) -> Result<String> {
    FeedbackRenderer::default().render(source, test_case)
}
