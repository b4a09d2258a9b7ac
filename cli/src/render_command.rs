use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Args;
use feedback::{FeedbackRenderer, RenderOptions, DEFAULT_MAX_DEPTH};

use crate::{reports::find_test_case, EXIT_SUCCESS};

#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    #[arg(long, help = "Markdown feedback template to render.")]
    pub template: PathBuf,
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = clap::builder::NonEmptyStringValueParser::new(),
        help = "Comma-separated list of glob paths to junit files."
    )]
    pub junit_paths: Vec<String>,
    #[arg(
        long = "class",
        requires_all = ["junit_paths", "test"],
        help = "Class of the test to render feedback for."
    )]
    pub class_name: Option<String>,
    #[arg(
        long,
        requires = "class_name",
        help = "Name of the test to render feedback for. Without a test the template is previewed."
    )]
    pub test: Option<String>,
    #[arg(long, help = "Render untagged code blocks without syntax highlighting.")]
    pub no_highlight: bool,
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, help = "Deepest allowed nesting of conditional blocks.")]
    pub max_depth: usize,
}

pub fn run_render(render_args: RenderArgs) -> anyhow::Result<i32> {
    let RenderArgs {
        template,
        junit_paths,
        class_name,
        test,
        no_highlight,
        max_depth,
    } = render_args;

    let source = fs::read_to_string(&template)
        .with_context(|| format!("failed to read template {}", template.display()))?;
    let renderer = FeedbackRenderer::new(RenderOptions {
        max_depth,
        highlight_code: !no_highlight,
    });

    let html = match (class_name, test) {
        (Some(class_name), Some(name)) => {
            let test_case = find_test_case(&junit_paths, &class_name, &name)?;
            log::info!(
                "Rendering {} for {}#{} ({})",
                template.display(),
                class_name,
                name,
                test_case.status()
            );
            renderer.render(&source, Some(&test_case))?
        }
        _ => {
            log::info!("Previewing {}", template.display());
            renderer.preview(&source)?
        }
    };
    print!("{html}");

    Ok(EXIT_SUCCESS)
}
