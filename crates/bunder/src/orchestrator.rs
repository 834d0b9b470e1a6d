//! Concurrent per-bundle build pipelines.
//!
//! Every bundle runs as its own task on a `JoinSet`. File lists are resolved
//! for all buildable bundles before the first task is spawned, so a reference
//! cycle aborts the run without touching the filesystem. After that, a failing
//! bundle only fails itself unless `fail_fast` is set.
//!
//! Completion is tracked by [`BuildRunState`]: one increment per bundle, no
//! matter how it ended. The increment that reaches the total logs the final
//! completion line.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tracing::{debug, error, info};

use crate::definition::{BundleDefinition, BundleSet};
use crate::error::{BuildError, Result};
use crate::paths::prefix_source;
use crate::pipeline::{concat, filter_newer, read_sources, write_output};
use crate::resolver::FileListResolver;
use crate::runtime::Runtime;

/// Completion accounting for one run.
#[derive(Debug)]
pub struct BuildRunState {
    total: usize,
    completed: AtomicUsize,
}

impl BuildRunState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
        }
    }

    /// Record one finished bundle. Returns `true` for the call that completes the run.
    pub fn complete_one(&self) -> bool {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1 == self.total
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.completed() >= self.total
    }
}

/// How a bundle ended.
#[derive(Debug)]
pub enum BundleStatus {
    /// Sources were concatenated, minified and written.
    Built {
        output_path: PathBuf,
        sources: usize,
        bytes: usize,
    },
    /// A reference-only bundle had its static output copied.
    Copied { output_path: PathBuf, bytes: usize },
    /// Reference-only bundle without static output.
    Skipped,
    /// Newer-only run where no source was newer than the output.
    UpToDate,
    Failed(BuildError),
}

impl BundleStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, BundleStatus::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            BundleStatus::Built { .. } => "built",
            BundleStatus::Copied { .. } => "copied",
            BundleStatus::Skipped => "skipped",
            BundleStatus::UpToDate => "up-to-date",
            BundleStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct BundleOutcome {
    pub name: String,
    pub status: BundleStatus,
}

/// Result of a run, with outcomes in declaration order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<BundleOutcome>,
    pub duration: Duration,
}

impl BuildReport {
    pub fn outcome(&self, name: &str) -> Option<&BundleStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.name == name)
            .map(|outcome| &outcome.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &BuildError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.status {
            BundleStatus::Failed(err) => Some((outcome.name.as_str(), err)),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Number of bundles whose status has the given label.
    pub fn count(&self, label: &str) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.label() == label)
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    /// Drop sources that are not newer than the existing output.
    pub newer_only: bool,
    /// Abort every remaining pipeline after the first failure.
    pub fail_fast: bool,
    /// Upper bound on concurrently running pipelines. `None` runs all at once.
    pub max_parallel: Option<usize>,
}

/// Everything one pipeline task needs, owned.
struct BundleTask {
    index: usize,
    bundle: BundleDefinition,
    files: Vec<String>,
    base_path: String,
    newer_only: bool,
    runtime: Arc<dyn Runtime>,
}

pub struct BuildOrchestrator {
    runtime: Arc<dyn Runtime>,
    options: OrchestratorOptions,
}

impl BuildOrchestrator {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self {
            runtime,
            options: OrchestratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn newer_only(mut self, newer_only: bool) -> Self {
        self.options.newer_only = newer_only;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.options.fail_fast = fail_fast;
        self
    }

    pub fn max_parallel(mut self, max_parallel: usize) -> Self {
        self.options.max_parallel = Some(max_parallel.max(1));
        self
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Build every bundle in `bundles`.
    ///
    /// `base_path` prefixes source entries and static output paths.
    ///
    /// # Errors
    ///
    /// - `BuildError::ResolutionCycle` before any pipeline starts
    /// - `BuildError::Aborted` when `fail_fast` is set and a bundle fails
    ///
    /// Other per-bundle failures are reported in the returned [`BuildReport`].
    pub async fn run(&self, bundles: &BundleSet, base_path: &str) -> Result<BuildReport> {
        let started = Instant::now();

        if bundles.is_empty() {
            info!("No bundles found.");
            return Ok(BuildReport::default());
        }

        info!("*** Starting bundling. Newer Only: {} ***", self.options.newer_only);
        info!("Bundle count: {}", bundles.len());

        let resolver = FileListResolver::new(bundles, base_path);
        let mut resolved = Vec::with_capacity(bundles.len());
        for bundle in bundles {
            if bundle.is_reference_only() {
                resolved.push(Vec::new());
            } else {
                resolved.push(resolver.resolve(bundle)?);
            }
        }

        let state = BuildRunState::new(bundles.len());
        let permits = self.options.max_parallel.map(|n| Arc::new(Semaphore::new(n)));
        let mut slots: Vec<Option<BundleStatus>> = Vec::with_capacity(bundles.len());
        let mut join_set = JoinSet::new();
        let mut task_bundles: FxHashMap<Id, usize> = FxHashMap::default();

        for (index, (bundle, files)) in bundles.iter().zip(resolved).enumerate() {
            if bundle.is_reference_only() && bundle.static_output_path().is_none() {
                info!(
                    "Bundle for {} is set to only be referenced. No bundling for this bundle.",
                    bundle.name()
                );
                slots.push(Some(BundleStatus::Skipped));
                self.record_completion(&state);
                continue;
            }

            slots.push(None);
            let task = BundleTask {
                index,
                bundle: bundle.clone(),
                files,
                base_path: base_path.to_string(),
                newer_only: self.options.newer_only,
                runtime: Arc::clone(&self.runtime),
            };
            let permits = permits.clone();

            let handle = join_set.spawn(async move {
                let _permit = match &permits {
                    Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
                    None => None,
                };
                let index = task.index;
                (index, run_bundle(task).await)
            });
            task_bundles.insert(handle.id(), index);
        }

        while let Some(joined) = join_set.join_next().await {
            self.record_completion(&state);

            let (index, result) = match joined {
                Ok(done) => done,
                Err(join_err) => {
                    let Some(&index) = task_bundles.get(&join_err.id()) else {
                        error!("Bundle pipeline failed: {}", join_err);
                        continue;
                    };
                    let name = bundles.as_slice()[index].name();
                    error!("Bundle {} pipeline panicked: {}", name, join_err);
                    (
                        index,
                        Err(BuildError::Panicked {
                            bundle: name.to_string(),
                        }),
                    )
                }
            };

            let status = match result {
                Ok(status) => status,
                Err(err) => {
                    let name = bundles.as_slice()[index].name();
                    error!("Bundle {} failed: {}", name, err);
                    if self.options.fail_fast {
                        join_set.abort_all();
                        return Err(BuildError::Aborted {
                            bundle: name.to_string(),
                            source: Box::new(err),
                        });
                    }
                    BundleStatus::Failed(err)
                }
            };
            slots[index] = Some(status);
        }

        let outcomes = bundles
            .iter()
            .zip(slots)
            .map(|(bundle, status)| BundleOutcome {
                name: bundle.name().to_string(),
                status: status.unwrap_or_else(|| {
                    BundleStatus::Failed(BuildError::Panicked {
                        bundle: bundle.name().to_string(),
                    })
                }),
            })
            .collect();

        Ok(BuildReport {
            outcomes,
            duration: started.elapsed(),
        })
    }

    fn record_completion(&self, state: &BuildRunState) {
        if state.complete_one() {
            info!("*** Bundling process complete. ***");
        } else {
            debug!("Completed {}/{} bundles", state.completed(), state.total());
        }
    }
}

async fn run_bundle(task: BundleTask) -> Result<BundleStatus> {
    match task.bundle.static_output_path() {
        Some(static_output) if task.bundle.is_reference_only() => {
            copy_static_output(&task, static_output).await
        }
        _ => build_bundle(&task).await,
    }
}

async fn copy_static_output(task: &BundleTask, static_output: &str) -> Result<BundleStatus> {
    let bundle = &task.bundle;
    info!(
        "Bundle {} marked as having a static output of '{}'. It will have its static output copied to destination.",
        bundle.name(),
        static_output
    );

    let source = prefix_source(&task.base_path, static_output);
    let sources = read_sources(task.runtime.as_ref(), bundle.name(), &[source]).await?;
    let contents = concat(&sources).unwrap_or_default();

    let output_path = bundle.output_path_buf();
    write_output(task.runtime.as_ref(), bundle.name(), &output_path, &contents).await?;
    info!("Static Output '{}' copied to '{}'.", static_output, bundle.output_path());

    Ok(BundleStatus::Copied {
        output_path,
        bytes: contents.len(),
    })
}

async fn build_bundle(task: &BundleTask) -> Result<BundleStatus> {
    let bundle = &task.bundle;
    let runtime = task.runtime.as_ref();
    let minifier = bundle.minifier()?;
    let output_path = bundle.output_path_buf();

    let mut sources = read_sources(runtime, bundle.name(), &task.files).await?;
    if task.newer_only {
        sources = filter_newer(runtime, sources, &output_path).await;
    }

    info!("Bundling {} ... ", bundle.name());
    for source in &sources {
        debug!(" - Includes file {}.", source.path.display());
    }

    let Some(contents) = concat(&sources) else {
        info!("Bundle {} is up to date.", bundle.name());
        return Ok(BundleStatus::UpToDate);
    };

    let filename = bundle.output_file_name().to_string();
    let minified = tokio::task::spawn_blocking(move || minifier.minify_bytes(contents, &filename))
        .await
        .map_err(|_| BuildError::Panicked {
            bundle: bundle.name().to_string(),
        })?
        .map_err(|source| BuildError::Minify {
            bundle: bundle.name().to_string(),
            source,
        })?;

    write_output(runtime, bundle.name(), &output_path, minified.as_bytes()).await?;
    debug!("Wrote {} ({} bytes)", output_path.display(), minified.len());

    Ok(BundleStatus::Built {
        output_path,
        sources: sources.len(),
        bytes: minified.len(),
    })
}
