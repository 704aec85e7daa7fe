//! Batch execution over a file or a directory of files
//!
//! Resolves the input path into an ordered list of files and partitions
//! them strictly one after another. Each file runs on tokio's blocking pool
//! and is awaited before the next one starts, so there is never more than
//! one file (and one set of year sinks) open at a time.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::app::models::{BatchReport, FileReport, SourceFormat};
use crate::app::services::partitioner::StreamingPartitioner;
use crate::config::PartitionConfig;
use crate::{Error, Result};

/// Files selected for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPlan {
    /// A single file, processed whatever its extension
    SingleFile(PathBuf),
    /// Supported files directly inside a directory, in file-name order
    Directory { root: PathBuf, files: Vec<PathBuf> },
}

impl InputPlan {
    /// Resolve an input path
    ///
    /// Directories are listed non-recursively; sub-directories and files
    /// with unsupported extensions are left out.
    pub fn discover(input: &Path) -> Result<Self> {
        if !input.exists() {
            return Err(Error::file_not_found(input.display().to_string()));
        }

        if !input.is_dir() {
            return Ok(InputPlan::SingleFile(input.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(input)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to list {}", input.display()), e)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            if SourceFormat::from_path(&path).is_some() {
                files.push(path);
            } else {
                debug!("Ignoring unsupported file {}", path.display());
            }
        }

        Ok(InputPlan::Directory {
            root: input.to_path_buf(),
            files,
        })
    }

    /// Files to process, in order
    pub fn files(&self) -> Vec<PathBuf> {
        match self {
            InputPlan::SingleFile(path) => vec![path.clone()],
            InputPlan::Directory { files, .. } => files.clone(),
        }
    }

    /// Whether the input was a directory
    pub fn is_directory(&self) -> bool {
        matches!(self, InputPlan::Directory { .. })
    }
}

/// Runs the partitioner over every file of an input plan
#[derive(Debug, Clone)]
pub struct BatchRunner {
    partitioner: Arc<StreamingPartitioner>,
    show_progress: bool,
}

impl BatchRunner {
    /// Create a runner for the given configuration
    pub fn new(config: PartitionConfig) -> Self {
        Self {
            partitioner: Arc::new(StreamingPartitioner::new(config)),
            show_progress: false,
        }
    }

    /// Show a progress bar over files in directory mode
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Resolve `input` and partition every selected file
    pub async fn run(&self, input: &Path) -> Result<BatchReport> {
        let plan = InputPlan::discover(input)?;
        self.run_plan(&plan).await
    }

    /// Partition every file of an already resolved plan
    pub async fn run_plan(&self, plan: &InputPlan) -> Result<BatchReport> {
        let start_time = Instant::now();
        let files = plan.files();

        let progress_bar = self.progress_bar(plan, files.len());
        let mut reports = Vec::with_capacity(files.len());

        for path in files {
            info!("Processing {}...", path.display());
            if let Some(file_name) = path.file_name() {
                progress_bar.set_message(file_name.to_string_lossy().to_string());
            }

            reports.push(self.run_file(path).await?);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        Ok(BatchReport {
            files: reports,
            processing_time_ms: start_time.elapsed().as_millis(),
        })
    }

    async fn run_file(&self, path: PathBuf) -> Result<FileReport> {
        let partitioner = Arc::clone(&self.partitioner);
        let label = path.display().to_string();

        tokio::task::spawn_blocking(move || partitioner.run_file(&path))
            .await
            .map_err(|e| Error::background_task(format!("Partitioning {} failed: {}", label, e)))
    }

    fn progress_bar(&self, plan: &InputPlan, len: usize) -> ProgressBar {
        if !self.show_progress || !plan.is_directory() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
