use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use crate::{
    error::{IncludeSite, ResolveError},
    include::IncludeDirective,
    options::ResolveOptions,
};

/// Maps include tokens to files on disk.
#[derive(Debug, Clone)]
pub struct PathResolver<'a> {
    options: &'a ResolveOptions,
    roots: Vec<PathBuf>,
}

impl<'a> PathResolver<'a> {
    pub fn new(options: &'a ResolveOptions, base_directory: &Path) -> Self {
        let roots = options
            .search_roots
            .iter()
            .chain(std::iter::once(&options.package_directory))
            .map(|root| base_directory.join(root))
            .collect();

        PathResolver { options, roots }
    }

    /// Resolves `directive`, found in `including_file`, to a canonical path.
    pub fn resolve(
        &self,
        directive: &IncludeDirective,
        including_file: &Path,
    ) -> Result<PathBuf, ResolveError> {
        let token = directive.token.as_str();
        let directory = including_file.parent().unwrap_or_else(|| Path::new(""));
        let site = || IncludeSite::new(including_file, directive);

        let relative = directory.join(token);
        if relative.is_file() {
            return canonicalize(relative, site());
        }

        if is_explicit_path(token) {
            return Err(ResolveError::NotFound { site: site() });
        }

        if !self.options.strict {
            return match self.roots.iter().find_map(|root| self.package_candidate(root, token)) {
                Some(path) => canonicalize(path, site()),
                None => Err(ResolveError::NotFound { site: site() }),
            };
        }

        let mut candidates = Vec::new();
        for root in &self.roots {
            if let Some(path) = self.package_candidate(root, token) {
                let path = canonicalize(path, site())?;
                if !candidates.contains(&path) {
                    candidates.push(path);
                }
            }
        }

        match candidates.len() {
            0 => Err(ResolveError::NotFound { site: site() }),
            1 => Ok(candidates.remove(0)),
            _ => Err(ResolveError::Ambiguous {
                site: site(),
                candidates,
            }),
        }
    }

    fn package_candidate(&self, root: &Path, token: &str) -> Option<PathBuf> {
        let target = root.join(token);

        let entry = target.join(&self.options.entry_file);
        if target.is_dir() && entry.is_file() {
            return Some(entry);
        }

        if target.is_file() {
            return Some(target);
        }

        if target.extension().is_none() {
            let with_extension = target.with_extension(&self.options.extension);
            if with_extension.is_file() {
                return Some(with_extension);
            }
        }

        None
    }
}

/// Absolute paths and paths starting with `./` or `../` never name a package.
fn is_explicit_path(token: &str) -> bool {
    matches!(
        Path::new(token).components().next(),
        Some(Component::RootDir | Component::Prefix(_) | Component::CurDir | Component::ParentDir)
    )
}

fn canonicalize(path: PathBuf, site: IncludeSite) -> Result<PathBuf, ResolveError> {
    fs::canonicalize(&path).map_err(|source| ResolveError::Read {
        path,
        site: Some(site),
        source,
    })
}
