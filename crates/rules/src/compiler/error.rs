//! Error types for the trigger compiler.

/// Errors that reject a trigger configuration.
///
/// Every variant carries the 1-based line number and the offending line so
/// rule authors can fix the file before any items are processed.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Definition names a type outside TITLE/DESCRIPTION/BEFORE/AFTER/NOT/AND/OR.
    #[error("line {line}: unknown trigger type '{kind}'{}: {content}", did_you_mean(.suggestion))]
    UnknownTriggerType {
        line: usize,
        content: String,
        kind: String,
        suggestion: Option<String>,
    },

    /// NOT/AND/OR/ADD refers to a name with no earlier binding.
    #[error("line {line}: undefined trigger '{name}'{}: {content}", did_you_mean(.suggestion))]
    UndefinedTriggerReference {
        line: usize,
        content: String,
        name: String,
        suggestion: Option<String>,
    },

    /// Wrong argument count, missing name or missing type.
    #[error("line {line}: malformed definition ({reason}): {content}")]
    MalformedDefinition {
        line: usize,
        content: String,
        reason: String,
    },

    /// BEFORE/AFTER literal not in `DD Mon YYYY HH:MM:SS` form.
    #[error("line {line}: time '{value}' does not match 'DD Mon YYYY HH:MM:SS': {content}")]
    TimeParse {
        line: usize,
        content: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl CompileError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownTriggerType { line, .. }
            | Self::UndefinedTriggerReference { line, .. }
            | Self::MalformedDefinition { line, .. }
            | Self::TimeParse { line, .. } => *line,
        }
    }

    /// Offending line, trailing whitespace removed.
    pub fn content(&self) -> &str {
        match self {
            Self::UnknownTriggerType { content, .. }
            | Self::UndefinedTriggerReference { content, .. }
            | Self::MalformedDefinition { content, .. }
            | Self::TimeParse { content, .. } => content,
        }
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

/// Result alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
