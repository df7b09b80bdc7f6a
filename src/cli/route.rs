//! CLI route: single route table and run context. Dispatches to the mirror and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_listing_json, format_listing_text, format_mirror_json, format_mirror_text,
};
use crate::config::{ConfigLoader, MirrorConfig};
use crate::error::ApiError;
use crate::events::read_event_log;
use crate::reconcile::{NoticeSink, Reconciler, RecordingNoticeSink};
use crate::tooling::watch::WatchSession;
use crate::tree::cache::DirectoryCache;
use crate::tree::path::{canonicalize_path, dir_key, ROOT_KEY};
use crate::tree::walker::{DirectoryLoader, FsDirectoryLoader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runtime context for CLI execution: mirrored root and effective config.
/// Built from the root flag and optional config path using ConfigLoader only.
pub struct RunContext {
    root: PathBuf,
    config: MirrorConfig,
}

impl RunContext {
    /// Root precedence: `--root`, then config `root`, then the current directory.
    /// Workspace config files are looked up under `--root` (or the current
    /// directory) unless `config_path` names a file.
    pub fn new(root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let workspace = root.clone().unwrap_or_else(|| PathBuf::from("."));
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace)?,
        };

        let root = root.or_else(|| config.root.clone()).unwrap_or(workspace);
        let root = canonicalize_path(&root)?;
        debug!(root = %root.display(), "Resolved mirror root");

        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = name, root = %self.root.display(), "Running command");

        let result = self.execute_inner(command);
        let elapsed_ms = started.elapsed().as_millis();
        match &result {
            Ok(_) => info!(command = name, elapsed_ms, "Command finished"),
            Err(e) => warn!(command = name, elapsed_ms, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::List { dir, format } => self.handle_list(dir, format),
            Commands::Replay {
                events,
                expand,
                format,
            } => self.handle_replay(events, expand, format),
            Commands::Watch { expand } => self.handle_watch(expand),
            Commands::Config => self.config.to_toml(),
        }
    }

    fn handle_list(&self, dir: &str, format: &str) -> Result<String, ApiError> {
        let key = dir_key(dir);
        let entries = self.loader().load_directory(&key)?;
        match format {
            "json" => format_listing_json(&key, &entries),
            "text" => Ok(format_listing_text(&key, &entries)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_replay(
        &self,
        events_path: &Path,
        expand: &[String],
        format: &str,
    ) -> Result<String, ApiError> {
        if format != "json" && format != "text" {
            return Err(invalid_format(format));
        }

        let events = read_event_log(BufReader::new(File::open(events_path)?))?;
        let notices = Arc::new(RecordingNoticeSink::new());
        let mut reconciler = self.mirror(expand, Box::new(Arc::clone(&notices)))?;

        for event in &events {
            reconciler.dispatch(event);
        }
        let focus = reconciler.focus_queue().after_render();
        let notices = notices.take();
        info!(
            events = events.len(),
            notices = notices.len(),
            "Replayed event log"
        );

        if format == "json" {
            format_mirror_json(reconciler.cache(), &notices, &focus)
        } else {
            Ok(format_mirror_text(reconciler.cache(), &notices, &focus))
        }
    }

    fn handle_watch(&self, expand: &[String]) -> Result<String, ApiError> {
        let notices = Arc::new(RecordingNoticeSink::new());
        let mut reconciler = self.mirror(expand, Box::new(Arc::clone(&notices)))?;

        let session = WatchSession::new(
            &self.root,
            self.config.loader.clone(),
            self.config.watch.clone(),
        )?;
        session.run(&mut reconciler, |reconciler, applied| {
            let focus = reconciler.focus_queue().after_render();
            println!(
                "{}",
                format_mirror_text(reconciler.cache(), &notices.take(), &focus)
            );
            debug!(applied, "Rendered mirror");
        })?;

        Ok(format!("Stopped watching {}", self.root.display()))
    }

    fn loader(&self) -> FsDirectoryLoader {
        FsDirectoryLoader::with_config(self.root.clone(), self.config.loader.clone())
    }

    /// Reconciler over a freshly loaded root with `expand` already expanded.
    fn mirror(&self, expand: &[String], notices: Box<dyn NoticeSink>) -> Result<Reconciler, ApiError> {
        let loader = self.loader();
        let cache = DirectoryCache::with_root(loader.load_directory(ROOT_KEY)?);
        let mut reconciler = Reconciler::with_notice_sink(cache, notices);
        for dir in expand {
            reconciler.expand(&loader, dir)?;
        }
        Ok(reconciler)
    }
}

fn invalid_format(format: &str) -> ApiError {
    ApiError::ConfigError(format!(
        "Invalid output format: {} (must be 'text' or 'json')",
        format
    ))
}
