//! Lists the files a shader depends on through `#pragma include` directives.
//!
//! ```no_run
//! use shader_deps::{ResolveOptions, Resolver};
//!
//! let resolver = Resolver::new(ResolveOptions::default().with_search_root("vendor"));
//! let resolution = resolver.resolve("shaders/main.glsl")?;
//! for path in &resolution.dependencies {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), shader_deps::ResolveError>(())
//! ```
//!
//! Includes are either paths, resolved against the directory of the including file, or
//! package names, looked up in the configured search roots and then in the
//! `shader_modules` directory under the base directory.

#[macro_use]
extern crate tracing;

pub mod check;
pub mod diagnostic;
mod error;
pub mod graph;
pub mod include;
mod options;
pub mod resolve;

pub use error::{IncludeSite, ResolveError};
pub use graph::{DependencyGraph, NodeId, ResolvedNode};
pub use include::{IncludeDirective, SyntaxError};
pub use options::{
    ResolveOptions, DEFAULT_ENTRY_FILE, DEFAULT_EXTENSION, DEFAULT_PACKAGE_DIRECTORY,
};
pub use resolve::{resolve, Resolution, Resolver};
