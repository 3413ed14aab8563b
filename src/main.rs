use std::{
    collections::BTreeSet,
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use shader_deps::{
    check::{self, CheckFailure},
    diagnostic, Resolution, ResolveError, ResolveOptions, Resolver, DEFAULT_ENTRY_FILE,
    DEFAULT_EXTENSION, DEFAULT_PACKAGE_DIRECTORY,
};

#[macro_use]
extern crate tracing;

#[derive(Parser)]
#[command(name = "shader-deps")]
#[command(about = "Print the files a shader depends on through `#pragma include`")]
#[command(version)]
struct Cli {
    /// Entry shader, or the directory to scan with --check
    path: PathBuf,

    /// Base directory for dependency finding
    #[arg(short, long, value_name = "DIRECTORY")]
    base: Option<PathBuf>,

    /// Directory searched for package includes (can be repeated)
    #[arg(short = 'I', long = "search-root", value_name = "DIRECTORY")]
    search_roots: Vec<PathBuf>,

    /// Default package directory, relative to the base directory
    #[arg(long, value_name = "DIRECTORY", default_value = DEFAULT_PACKAGE_DIRECTORY)]
    package_dir: PathBuf,

    /// File that marks a directory as a package
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ENTRY_FILE)]
    entry_file: String,

    /// Extension tried for package includes that have none
    #[arg(long, value_name = "EXTENSION", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Fail when a package include matches in more than one search root
    #[arg(long)]
    strict: bool,

    /// Print the include tree instead of a flat list
    #[arg(long)]
    tree: bool,

    /// Resolve every shader below PATH and report all failures
    #[arg(long, conflicts_with_all = ["tree", "watch"])]
    check: bool,

    /// Print again whenever the entry or one of its dependencies changes
    #[arg(short, long)]
    watch: bool,
}

impl Cli {
    fn options(&self) -> ResolveOptions {
        let mut options = ResolveOptions::default()
            .with_package_directory(&self.package_dir)
            .with_entry_file(&self.entry_file)
            .with_extension(&self.extension)
            .strict(self.strict);
        options.base_directory = self.base.clone();
        options.search_roots = self.search_roots.clone();
        options
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        // stdout is reserved for the dependency list
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolver = Resolver::new(cli.options());

    if cli.check {
        return check_shaders(&resolver, &cli.path);
    }

    if cli.watch {
        return watch_dependencies(&resolver, &cli.path, cli.tree);
    }

    match resolver.resolve(&cli.path) {
        Ok(resolution) => {
            print_resolution(&resolution, cli.tree)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            report(&error)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_resolution(resolution: &Resolution, tree: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if tree {
        resolution.graph.write_tree(&mut out)?;
    } else {
        for path in &resolution.dependencies {
            writeln!(out, "{}", path.display())?;
        }
    }

    out.flush().context("could not write dependencies")
}

fn report(error: &ResolveError) -> anyhow::Result<()> {
    diagnostic::emit_to_stderr(error).context("could not write diagnostic")
}

fn check_shaders(resolver: &Resolver, directory: &Path) -> anyhow::Result<ExitCode> {
    let root = resolver.base_directory()?.join(directory);

    let summary = check::check_directory(resolver, &root, |failure| match failure {
        CheckFailure::Scan(error) => {
            error!("could not scan {}: {error}", root.display());
            anyhow::Ok(())
        }
        CheckFailure::Resolve { error, .. } => report(&error),
    })?;

    if summary.failed > 0 {
        eprintln!(
            "{} failures while checking {} shaders",
            summary.failed, summary.checked
        );
        return Ok(ExitCode::FAILURE);
    }

    info!(checked = summary.checked, "all shaders resolved");
    Ok(ExitCode::SUCCESS)
}

fn watch_dependencies(resolver: &Resolver, entry: &Path, tree: bool) -> anyhow::Result<ExitCode> {
    use notify::Watcher;

    let (sender, receiver) = std::sync::mpsc::channel();
    let debounce = Duration::from_millis(200);

    let mut watcher =
        notify::PollWatcher::new(sender, debounce).context("could not start file watcher")?;

    let entry_path = resolver.base_directory()?.join(entry);
    let mut watched = BTreeSet::new();

    loop {
        let mut files = BTreeSet::from([entry_path.clone()]);

        match resolver.resolve(entry) {
            Ok(resolution) => {
                print_resolution(&resolution, tree)?;
                files.extend(resolution.dependencies);
            }
            Err(error) => {
                report(&error)?;
                // keep watching the last known dependencies so a fix gets picked up
                files.extend(watched.iter().cloned());
            }
        }

        for path in watched.difference(&files) {
            if let Err(error) = watcher.unwatch(path) {
                debug!(path = %path.display(), "could not unwatch: {error:#}");
            }
        }
        for path in files.difference(&watched) {
            if let Err(error) = watcher.watch(path, notify::RecursiveMode::NonRecursive) {
                warn!(path = %path.display(), "could not watch: {error:#}");
            }
        }
        watched = files;

        loop {
            let event = match receiver.recv() {
                Ok(event) => event,
                Err(_) => {
                    info!("ending watcher");
                    return Ok(ExitCode::SUCCESS);
                }
            };

            match event {
                notify::DebouncedEvent::Rescan
                | notify::DebouncedEvent::Error(_, _)
                | notify::DebouncedEvent::NoticeWrite(_)
                | notify::DebouncedEvent::NoticeRemove(_) => continue,
                notify::DebouncedEvent::Create(_)
                | notify::DebouncedEvent::Write(_)
                | notify::DebouncedEvent::Chmod(_)
                | notify::DebouncedEvent::Remove(_)
                | notify::DebouncedEvent::Rename(_, _) => break,
            }
        }

        // sleep a bit so that editors that write in several steps are done
        std::thread::sleep(Duration::from_millis(10));

        // skip all events currently in the queue
        while receiver.try_recv().is_ok() {}

        info!("reloading");
    }
}
