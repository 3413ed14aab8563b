mod path;

pub use path::PathResolver;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{IncludeSite, ResolveError},
    graph::{DependencyGraph, NodeId, ResolvedNode},
    include::{self, IncludeDirective},
    options::ResolveOptions,
};

/// The outcome of resolving an entry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical path of the entry file.
    pub entry: PathBuf,

    /// Every file the entry depends on, each listed after its own dependencies. The entry
    /// itself is not included.
    pub dependencies: Vec<PathBuf>,

    pub graph: DependencyGraph,
}

/// Resolves the includes of shader files.
///
/// A resolver only holds its options; every call to [`Resolver::resolve`] starts from a
/// clean state, so one resolver can serve any number of entry files.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolveOptions,
}

impl Resolver {
    pub fn new(options: ResolveOptions) -> Self {
        Resolver { options }
    }

    /// The directory relative paths are resolved against.
    pub fn base_directory(&self) -> Result<PathBuf, ResolveError> {
        match &self.options.base_directory {
            Some(directory) => Ok(directory.clone()),
            None => std::env::current_dir().map_err(|source| ResolveError::Read {
                path: PathBuf::from("."),
                site: None,
                source,
            }),
        }
    }

    pub fn resolve(&self, entry: impl AsRef<Path>) -> Result<Resolution, ResolveError> {
        let base = self.base_directory()?;

        let entry = base.join(entry.as_ref());
        let entry = fs::canonicalize(&entry).map_err(|source| ResolveError::Read {
            path: entry.clone(),
            site: None,
            source,
        })?;

        debug!(entry = %entry.display(), base = %base.display(), "resolving dependencies");

        let mut walk = Walk::new(PathResolver::new(&self.options, &base));
        let root = walk.visit(entry.clone(), None)?;

        debug!(count = walk.order.len(), "resolved dependencies");

        Ok(Resolution {
            entry,
            dependencies: walk.order,
            graph: DependencyGraph::new(walk.nodes, root),
        })
    }
}

/// Shorthand for `Resolver::new(options.clone()).resolve(entry)`.
pub fn resolve(
    entry: impl AsRef<Path>,
    options: &ResolveOptions,
) -> Result<Resolution, ResolveError> {
    Resolver::new(options.clone()).resolve(entry)
}

/// A shader read from disk, kept only while its includes are walked.
struct SourceFile {
    path: PathBuf,
    includes: Vec<IncludeDirective>,
}

impl SourceFile {
    /// Reads and scans `path`. `site` is the include that led here, if any.
    fn read(path: PathBuf, site: Option<IncludeSite>) -> Result<Self, ResolveError> {
        // only the directives need to be ASCII, so the text is scanned as raw bytes
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) => return Err(ResolveError::Read { path, site, source }),
        };

        match include::parse_includes(&bytes) {
            Ok(includes) => Ok(SourceFile { path, includes }),
            Err(error) => Err(ResolveError::Syntax { file: path, error }),
        }
    }
}

/// State of a single depth-first walk.
struct Walk<'a> {
    paths: PathResolver<'a>,

    /// Files whose includes are being resolved, outermost first.
    active: Vec<PathBuf>,

    /// Files that have been fully resolved.
    completed: HashMap<PathBuf, NodeId>,

    /// Completed files in the order they finished, excluding the entry.
    order: Vec<PathBuf>,

    nodes: Vec<ResolvedNode>,
}

impl<'a> Walk<'a> {
    fn new(paths: PathResolver<'a>) -> Self {
        Walk {
            paths,
            active: Vec::new(),
            completed: HashMap::new(),
            order: Vec::new(),
            nodes: Vec::new(),
        }
    }

    fn visit(
        &mut self,
        path: PathBuf,
        site: Option<IncludeSite>,
    ) -> Result<NodeId, ResolveError> {
        let file = SourceFile::read(path.clone(), site)?;
        self.active.push(path);

        let mut children = Vec::with_capacity(file.includes.len());
        for directive in &file.includes {
            let resolved = self.paths.resolve(directive, &file.path)?;
            trace!(token = %directive.token, path = %resolved.display(), "resolved include");

            let site = IncludeSite::new(&file.path, directive);

            if let Some(start) = self.active.iter().position(|active| *active == resolved) {
                let mut chain = self.active[start..].to_vec();
                chain.push(resolved);
                return Err(ResolveError::Cycle { chain, site });
            }

            if let Some(&id) = self.completed.get(&resolved) {
                children.push(id);
                continue;
            }

            let id = self.visit(resolved.clone(), Some(site))?;
            self.order.push(resolved);
            children.push(id);
        }

        self.active.pop();

        let id = self.nodes.len();
        self.nodes.push(ResolvedNode {
            path: file.path.clone(),
            includes: file.includes,
            children,
        });
        self.completed.insert(file.path, id);

        Ok(id)
    }
}
