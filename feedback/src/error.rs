use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("invalid regular expression `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },
    #[error("no ending delimiter '/' in regular expression `{pattern}`")]
    MissingDelimiter { pattern: String },
    #[error("unsupported flag `{flag}` in regular expression `{pattern}`")]
    UnknownRegexFlag { pattern: String, flag: char },
    #[error("conditional blocks are nested more than {limit} levels deep")]
    NestingTooDeep { limit: usize },
    #[error("could not highlight code block")]
    Highlight(#[from] syntect::Error),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
