use std::path::PathBuf;

pub const DEFAULT_PACKAGE_DIRECTORY: &str = "shader_modules";
pub const DEFAULT_ENTRY_FILE: &str = "index.glsl";
pub const DEFAULT_EXTENSION: &str = "glsl";

/// Settings for a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Directory that relative entry paths and search roots are resolved against. When
    /// unset, the current directory at the time of resolution is used.
    pub base_directory: Option<PathBuf>,

    /// Extra directories searched for package-style includes, in order, before the
    /// package directory.
    pub search_roots: Vec<PathBuf>,

    /// Default package directory, relative to the base directory.
    pub package_directory: PathBuf,

    /// File that marks a directory as a package.
    pub entry_file: String,

    /// Extension appended to package tokens that have none.
    pub extension: String,

    /// Treat a package token that matches in more than one root as an error.
    pub strict: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            base_directory: None,
            search_roots: Vec::new(),
            package_directory: PathBuf::from(DEFAULT_PACKAGE_DIRECTORY),
            entry_file: DEFAULT_ENTRY_FILE.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            strict: false,
        }
    }
}

impl ResolveOptions {
    pub fn with_base_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.base_directory = Some(directory.into());
        self
    }

    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn with_package_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.package_directory = directory.into();
        self
    }

    pub fn with_entry_file(mut self, name: impl Into<String>) -> Self {
        self.entry_file = name.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
