//! Rendering resolution errors as annotated source snippets.

use std::{fs, path::Path};

use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::{self, SimpleFile},
    term::{self, termcolor::WriteColor},
};

use crate::error::ResolveError;

/// Writes `error` to stderr, pointing at the offending include when there is one.
pub fn emit_to_stderr(error: &ResolveError) -> Result<(), files::Error> {
    use term::termcolor::{ColorChoice, StandardStream};

    let mut writer = StandardStream::stderr(ColorChoice::Auto);
    emit(&mut writer, error)
}

pub fn emit(writer: &mut dyn WriteColor, error: &ResolveError) -> Result<(), files::Error> {
    let (file, span, label) = match error {
        ResolveError::NotFound { site } => (
            Some(site.file.as_path()),
            site.span.clone(),
            "no file or package with this name",
        ),
        ResolveError::Ambiguous { site, .. } => (
            Some(site.file.as_path()),
            site.span.clone(),
            "matches more than one package",
        ),
        ResolveError::Cycle { site, .. } => (
            Some(site.file.as_path()),
            site.span.clone(),
            "this include closes the cycle",
        ),
        ResolveError::Syntax { file, error } => {
            (Some(file.as_path()), error.span.clone(), error.message)
        }
        ResolveError::Read { site: Some(site), .. } => (
            Some(site.file.as_path()),
            site.span.clone(),
            "included here",
        ),
        ResolveError::Read { site: None, .. } => (None, 0..0, ""),
    };

    let source = file.and_then(|path| fs::read_to_string(path).ok());
    let name = file.map(Path::display).map(|name| name.to_string()).unwrap_or_default();
    let files = SimpleFile::new(name, source.as_deref().unwrap_or(""));

    let mut diagnostic = Diagnostic::error().with_message(error.to_string());

    // the file may have changed since it was read, so only label spans that still fit
    if let Some(source) = &source {
        if source.get(span.clone()).is_some() {
            diagnostic =
                diagnostic.with_labels(vec![Label::primary((), span).with_message(label)]);
        }
    }

    diagnostic = diagnostic.with_notes({
        let mut notes = match error {
            ResolveError::Ambiguous { candidates, .. } => candidates
                .iter()
                .map(|path| format!("candidate: {}", path.display()))
                .collect(),
            _ => Vec::new(),
        };
        let mut source: &dyn std::error::Error = error;
        while let Some(next) = std::error::Error::source(source) {
            notes.push(next.to_string());
            source = next;
        }
        notes
    });

    term::emit(writer, &term::Config::default(), &files, &diagnostic)
}
