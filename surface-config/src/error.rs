use std::{fmt, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for configuration operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Which half of configuration handling raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading files and following the `extends` chain.
    Loading,
    /// Turning a merged document into an `ExtractorConfig`.
    Parsing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Loading => write!(f, "loading"),
            Stage::Parsing => write!(f, "parsing"),
        }
    }
}

/// Source context for JSON parse errors.
///
/// Keeps the raw file content and its display name together so a syntax
/// error can be rendered with a label over the offending character.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a serde_json error.
    pub fn parse_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = offset_of(&self.src, source.line(), source.column())
            .map(|offset| SourceSpan::from((offset, 0)));
        Box::new(Error::Parse {
            file: self.filename.clone(),
            src: self.named_source(),
            span,
            source,
        })
    }
}

/// Byte offset of a 1-based line/column pair, as reported by serde_json.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

/// Context for errors raised while preparing a configuration.
///
/// Every error created here carries the `Error parsing <file>:` prefix.
#[derive(Debug, Clone)]
pub struct PrepareContext {
    file: String,
}

impl PrepareContext {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn error(&self, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Prepare {
            file: self.file.clone(),
            message: message.into(),
        })
    }

    pub fn invalid_tags(&self, violations: Vec<String>) -> Box<Error> {
        Box::new(Error::InvalidTags {
            file: self.file.clone(),
            violations,
        })
    }

    pub fn schema_error(&self, violations: Vec<String>) -> Box<Error> {
        Error::schema(Stage::Parsing, self.file.clone(), violations)
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Error loading {file}:\n{message}")]
    #[diagnostic(code(apisurface::load_error))]
    Load { file: String, message: String },

    #[error("Error loading {file}:\nthe file is not valid JSON")]
    #[diagnostic(code(apisurface::parse_error))]
    Parse {
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{source}")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Error loading {file}:\nThe \"extends\" setting contains a cycle.  This file is included twice: \"{}\"",
        .path.display()
    )]
    #[diagnostic(
        code(apisurface::extends_cycle),
        help("remove one of the \"extends\" references so the chain ends")
    )]
    ExtendsCycle { file: String, path: PathBuf },

    #[error("Error loading {file}:\nError resolving package path \"{name}\": {reason}")]
    #[diagnostic(
        code(apisurface::unresolved_extends),
        help("use a \"./\" or \"../\" prefix for files next to the configuration")
    )]
    UnresolvedExtends {
        file: String,
        name: String,
        reason: String,
    },

    #[error("Error {stage} {file}:\nJSON schema validation failed:\n{}", format_list(.violations))]
    #[diagnostic(code(apisurface::schema_error))]
    Schema {
        stage: Stage,
        file: String,
        violations: Vec<String>,
    },

    #[error("Found conflicting api-surface.json files in \".\" and \"./config\" folders of {}", .base.display())]
    #[diagnostic(
        code(apisurface::conflicting_config),
        help("delete one of the two files")
    )]
    ConflictingConfigFiles { base: PathBuf },

    #[error("Error parsing {file}:\n{message}")]
    #[diagnostic(code(apisurface::invalid_config))]
    Prepare { file: String, message: String },

    #[error("Error parsing {file}:\nThe \"tagsToReport\" setting is invalid:\n{}", format_list(.violations))]
    #[diagnostic(
        code(apisurface::invalid_tags),
        help("release tags are always reported; other tags must look like \"@myTag\"")
    )]
    InvalidTags { file: String, violations: Vec<String> },
}

fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Error {
    pub fn load(file: impl Into<String>, message: impl Into<String>) -> Box<Self> {
        Box::new(Error::Load {
            file: file.into(),
            message: message.into(),
        })
    }

    pub fn schema(stage: Stage, file: impl Into<String>, violations: Vec<String>) -> Box<Self> {
        Box::new(Error::Schema {
            stage,
            file: file.into(),
            violations,
        })
    }
}
