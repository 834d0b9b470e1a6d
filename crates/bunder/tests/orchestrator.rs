//! Orchestrator behavior against the in-memory runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bunder::runtime::test_utils::MemoryRuntime;
use bunder::{
    BuildError, BuildOrchestrator, BundleConfig, BundleSet, BundleStatus, BunderSettings,
    FileMetadata, Minifier, Runtime, RuntimeResult,
};

const BASE: &str = "/root/";

fn settings() -> BunderSettings {
    BunderSettings::new()
        .with_output_directory("js", "/out/js")
        .with_output_directory("css", "/out/css")
}

fn bundles(configs: Vec<BundleConfig>) -> BundleSet {
    BundleSet::from_configs(&configs, &settings(), BASE).unwrap()
}

fn runtime() -> Arc<MemoryRuntime> {
    Arc::new(
        MemoryRuntime::new()
            .with_file("/root/js/x.js", "var first = 1;")
            .with_file("/root/js/y.js", "var second = first + 1;")
            .with_file("/root/css/site.css", ".site { color: #ff0000; }")
            .with_file("/root/lib/jquery.min.js", "/*! jQuery */window.jQuery={};"),
    )
}

/// Memory runtime that panics when one particular file is read.
#[derive(Debug)]
struct PanicOnRead {
    inner: MemoryRuntime,
    path: PathBuf,
}

#[async_trait]
impl Runtime for PanicOnRead {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        if path == self.path {
            panic!("read of {} blew up", path.display());
        }
        self.inner.read_file(path).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        self.inner.write_file(path, content).await
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        self.inner.metadata(path).await
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        self.inner.create_dir(path, recursive).await
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<PathBuf>> {
        self.inner.read_dir(path).await
    }

    async fn remove_file(&self, path: &Path) -> RuntimeResult<()> {
        self.inner.remove_file(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> RuntimeResult<()> {
        self.inner.remove_dir_all(path).await
    }
}

fn panicking_runtime() -> Arc<PanicOnRead> {
    Arc::new(PanicOnRead {
        inner: MemoryRuntime::new()
            .with_file("/root/js/x.js", "var first = 1;")
            .with_file("/root/js/boom.js", "var boom = 1;"),
        path: PathBuf::from("/root/js/boom.js"),
    })
}

#[tokio::test]
async fn builds_minified_concatenation() {
    let runtime = runtime();
    let set = bundles(vec![BundleConfig::new("App", ["js/x.js", "js/y.js"])]);

    let report = BuildOrchestrator::new(runtime.clone())
        .run(&set, BASE)
        .await
        .unwrap();

    let expected = Minifier::JavaScript
        .minify("var first = 1;\nvar second = first + 1;", "App.min.js")
        .unwrap();
    assert_eq!(
        runtime.file_string("/root/out/js/App.min.js").as_deref(),
        Some(expected.as_str())
    );
    match report.outcome("App") {
        Some(BundleStatus::Built { sources, bytes, .. }) => {
            assert_eq!(*sources, 2);
            assert_eq!(*bytes, expected.len());
        }
        other => panic!("unexpected status: {other:?}"),
    }
}

#[tokio::test]
async fn reference_only_bundle_writes_nothing_but_completes() {
    let runtime = runtime();
    let set = bundles(vec![
        BundleConfig::new("Base", ["js/x.js"]).with_reference_only(true),
        BundleConfig::new("App", ["Base", "js/y.js"]),
    ]);

    let report = BuildOrchestrator::new(runtime.clone())
        .run(&set, BASE)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(report.outcome("Base"), Some(BundleStatus::Skipped)));
    assert!(matches!(report.outcome("App"), Some(BundleStatus::Built { sources: 2, .. })));
    assert!(!runtime.contains("/root/out/js/Base.min.js"));
    assert!(runtime.contains("/root/out/js/App.min.js"));
}

#[tokio::test]
async fn static_output_is_copied_verbatim() {
    let runtime = runtime();
    let set = bundles(vec![
        BundleConfig::new("jQuery", ["/lib/jquery.js"])
            .with_reference_only(true)
            .with_static_output_path("lib/jquery.min.js"),
    ]);

    let report = BuildOrchestrator::new(runtime.clone())
        .run(&set, BASE)
        .await
        .unwrap();

    assert_eq!(
        runtime.file_string("/root/out/js/jQuery.min.js").as_deref(),
        Some("/*! jQuery */window.jQuery={};")
    );
    assert!(matches!(report.outcome("jQuery"), Some(BundleStatus::Copied { bytes: 30, .. })));
}

#[tokio::test]
async fn newer_only_with_fresh_output_is_up_to_date() {
    let runtime = runtime();
    runtime.insert_file("/root/out/js/App.min.js", "previous build");
    let set = bundles(vec![BundleConfig::new("App", ["js/x.js", "js/y.js"])]);

    let report = BuildOrchestrator::new(runtime.clone())
        .newer_only(true)
        .run(&set, BASE)
        .await
        .unwrap();

    assert!(matches!(report.outcome("App"), Some(BundleStatus::UpToDate)));
    assert!(!report.has_failures());
    assert_eq!(
        runtime.file_string("/root/out/js/App.min.js").as_deref(),
        Some("previous build")
    );
}

#[tokio::test]
async fn newer_only_rebuilds_from_every_source_when_one_changed() {
    let runtime = runtime();
    runtime.insert_file("/root/out/js/App.min.js", "previous build");
    runtime.insert_file("/root/js/y.js", "var changed = 2;");
    let set = bundles(vec![BundleConfig::new("App", ["js/x.js", "js/y.js"])]);

    let report = BuildOrchestrator::new(runtime.clone())
        .newer_only(true)
        .run(&set, BASE)
        .await
        .unwrap();

    assert!(matches!(report.outcome("App"), Some(BundleStatus::Built { sources: 2, .. })));
    let output = runtime.file_string("/root/out/js/App.min.js").unwrap();
    assert!(output.contains("changed"));
    assert!(output.contains("first"));
}

#[tokio::test]
async fn unsupported_extension_fails_only_its_bundle() {
    let runtime = runtime();
    runtime.insert_file("/root/data/table.xyz", "rows");
    let set = bundles(vec![
        BundleConfig::new("Data", ["data/table.xyz"]),
        BundleConfig::new("Styles", ["css/site.css"]),
    ]);

    let report = BuildOrchestrator::new(runtime.clone())
        .run(&set, BASE)
        .await
        .unwrap();

    match report.outcome("Data") {
        Some(BundleStatus::Failed(BuildError::UnsupportedExtension { bundle, extension })) => {
            assert_eq!(bundle, "Data");
            assert_eq!(extension, "xyz");
        }
        other => panic!("unexpected status: {other:?}"),
    }
    assert_eq!(
        runtime.file_string("/root/out/css/Styles.min.css").as_deref(),
        Some(".site{color:red}")
    );
}

#[tokio::test]
async fn missing_source_is_isolated() {
    let runtime = runtime();
    let set = bundles(vec![
        BundleConfig::new("Broken", ["js/x.js", "js/missing.js"]),
        BundleConfig::new("App", ["js/x.js"]),
    ]);

    let report = BuildOrchestrator::new(runtime.clone())
        .run(&set, BASE)
        .await
        .unwrap();

    let failures: Vec<_> = report.failures().map(|(name, _)| name).collect();
    assert_eq!(failures, vec!["Broken"]);
    assert!(matches!(
        report.outcome("Broken"),
        Some(BundleStatus::Failed(BuildError::Read { .. }))
    ));
    assert!(!runtime.contains("/root/out/js/Broken.min.js"));
    assert!(runtime.contains("/root/out/js/App.min.js"));
}

#[tokio::test]
async fn fail_fast_aborts_the_run() {
    let runtime = runtime();
    let set = bundles(vec![BundleConfig::new("Broken", ["js/missing.js"])]);

    let err = BuildOrchestrator::new(runtime)
        .fail_fast(true)
        .run(&set, BASE)
        .await
        .unwrap_err();

    match err {
        BuildError::Aborted { bundle, source } => {
            assert_eq!(bundle, "Broken");
            assert!(matches!(*source, BuildError::Read { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn panicked_pipeline_is_reported_as_failure() {
    let runtime = panicking_runtime();
    let set = bundles(vec![
        BundleConfig::new("Boom", ["js/boom.js"]),
        BundleConfig::new("App", ["js/x.js"]),
    ]);

    let report = BuildOrchestrator::new(runtime.clone())
        .run(&set, BASE)
        .await
        .unwrap();

    match report.outcome("Boom") {
        Some(BundleStatus::Failed(BuildError::Panicked { bundle })) => assert_eq!(bundle, "Boom"),
        other => panic!("unexpected status: {other:?}"),
    }
    assert!(matches!(report.outcome("App"), Some(BundleStatus::Built { .. })));
}

#[tokio::test]
async fn fail_fast_aborts_on_panicked_pipeline() {
    let runtime = panicking_runtime();
    let set = bundles(vec![BundleConfig::new("Boom", ["js/boom.js"])]);

    let err = BuildOrchestrator::new(runtime)
        .fail_fast(true)
        .run(&set, BASE)
        .await
        .unwrap_err();

    match err {
        BuildError::Aborted { bundle, source } => {
            assert_eq!(bundle, "Boom");
            assert!(matches!(*source, BuildError::Panicked { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn reference_cycle_aborts_before_any_write() {
    let runtime = runtime();
    let set = bundles(vec![
        BundleConfig::new("App", ["js/x.js"]),
        BundleConfig::new("A", ["B", "js/x.js"]),
        BundleConfig::new("B", ["A", "js/y.js"]),
    ]);

    let err = BuildOrchestrator::new(runtime.clone())
        .run(&set, BASE)
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::ResolutionCycle { .. }));
    assert!(!runtime.contains("/root/out/js/App.min.js"));
}

#[tokio::test]
async fn empty_bundle_set_completes() {
    let report = BuildOrchestrator::new(runtime())
        .run(&BundleSet::default(), BASE)
        .await
        .unwrap();

    assert!(report.outcomes.is_empty());
    assert!(!report.has_failures());
}

#[tokio::test]
async fn bounded_parallelism_builds_everything() {
    let runtime = runtime();
    let configs = (0..6)
        .map(|i| BundleConfig::new(format!("Bundle{i}"), ["js/x.js"]))
        .collect();
    let set = bundles(configs);

    let report = BuildOrchestrator::new(runtime.clone())
        .max_parallel(2)
        .run(&set, BASE)
        .await
        .unwrap();

    assert_eq!(report.count("built"), 6);
    let names: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Bundle0", "Bundle1", "Bundle2", "Bundle3", "Bundle4", "Bundle5"]);
    for i in 0..6 {
        assert!(runtime.contains(format!("/root/out/js/Bundle{i}.min.js")));
    }
}
