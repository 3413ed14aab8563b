use std::{fmt, io, ops::Range, path::PathBuf};

use crate::include::{IncludeDirective, SyntaxError};

/// Where an include directive appears: the file containing it and the directive itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeSite {
    pub file: PathBuf,
    pub token: String,
    pub line: usize,
    pub span: Range<usize>,
}

impl IncludeSite {
    pub fn new(file: impl Into<PathBuf>, directive: &IncludeDirective) -> Self {
        IncludeSite {
            file: file.into(),
            token: directive.token.clone(),
            line: directive.line,
            span: directive.span.clone(),
        }
    }
}

impl fmt::Display for IncludeSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} in {}:{}", self.token, self.file.display(), self.line)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("could not resolve include {site}")]
    NotFound { site: IncludeSite },

    #[error("include {site} matches more than one package: {}", join_paths(.candidates, ", "))]
    Ambiguous {
        site: IncludeSite,
        candidates: Vec<PathBuf>,
    },

    #[error("cyclic include: {}", join_paths(.chain, " -> "))]
    Cycle {
        /// Files on the cycle, starting and ending with the re-entered file.
        chain: Vec<PathBuf>,
        /// The include that closed the cycle.
        site: IncludeSite,
    },

    #[error("could not read {}{}", .path.display(), included_from(.site.as_ref()))]
    Read {
        path: PathBuf,
        /// The include that pulled the file in. `None` for the entry file.
        site: Option<IncludeSite>,
        #[source]
        source: io::Error,
    },

    #[error("malformed include in {}:{}", .file.display(), .error.line)]
    Syntax {
        file: PathBuf,
        #[source]
        error: SyntaxError,
    },
}

impl ResolveError {
    /// The include directive that triggered the error, if there is one.
    pub fn site(&self) -> Option<&IncludeSite> {
        match self {
            ResolveError::NotFound { site }
            | ResolveError::Ambiguous { site, .. }
            | ResolveError::Cycle { site, .. } => Some(site),
            ResolveError::Read { site, .. } => site.as_ref(),
            ResolveError::Syntax { .. } => None,
        }
    }
}

fn included_from(site: Option<&IncludeSite>) -> String {
    match site {
        Some(site) => format!(" (included as {site})"),
        None => String::new(),
    }
}

fn join_paths(paths: &[PathBuf], separator: &str) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
