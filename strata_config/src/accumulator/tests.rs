//! Unit tests for the accumulator state machine and file cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Result, anyhow, ensure};
use camino::Utf8Path;
use rstest::{fixture, rstest};
use serde::Deserialize;
use serial_test::serial;
use serde_json::{Map, Value, json};

use super::{APP_ROOT_KEY, CacheEntry, ConfigAccumulator, SnapshotState};
use crate::decode::{DecodeError, Format, FormatDecoder, StandardDecoder};
use crate::layer::SourceProvenance;
use crate::script::{PatchScript, ScriptError, ScriptRunner};
use crate::source::{MemoryReader, SourceReader};
use crate::StrataError;

const ROOT: &str = "/app";

#[derive(Default)]
struct CountingReader {
    inner: MemoryReader,
    reads: AtomicUsize,
}

impl CountingReader {
    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SourceReader for CountingReader {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.inner.exists(path)
    }

    fn read_text(&self, path: &Utf8Path) -> std::io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_text(path)
    }
}

#[derive(Default)]
struct CountingDecoder {
    decodes: AtomicUsize,
}

impl FormatDecoder for CountingDecoder {
    fn decode(&self, text: &str, format: Format) -> Result<Value, DecodeError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        StandardDecoder.decode(text, format)
    }
}

impl FormatDecoder for Arc<CountingDecoder> {
    fn decode(&self, text: &str, format: Format) -> Result<Value, DecodeError> {
        (**self).decode(text, format)
    }
}

struct Harness {
    reader: Arc<CountingReader>,
    decoder: Arc<CountingDecoder>,
    config: ConfigAccumulator,
}

impl Harness {
    fn insert(&self, name: &str, text: &str) {
        self.reader.inner.insert(format!("{ROOT}/{name}"), text);
    }

    fn decodes(&self) -> usize {
        self.decoder.decodes.load(Ordering::SeqCst)
    }
}

#[fixture]
fn harness() -> Harness {
    let reader = Arc::new(CountingReader::default());
    reader.inner.insert(
        format!("{ROOT}/package.json"),
        r#"{"name": "demo", "version": "1.0.0", "private": true}"#,
    );
    let decoder = Arc::new(CountingDecoder::default());
    let config = ConfigAccumulator::from_parts(
        ROOT.into(),
        Box::new(Arc::clone(&reader)),
        Box::new(Arc::clone(&decoder)),
        Box::new(PatchScript),
    );
    Harness {
        reader,
        decoder,
        config,
    }
}

fn mapping(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected a mapping, found {other}")),
    }
}

fn strata(err: Arc<StrataError>) -> anyhow::Error {
    anyhow!(err.to_string())
}

fn defaults() -> Value {
    json!({"APP_NAME": "demo", "APP_VERSION": "1.0.0", "APP_ROOT": ROOT})
}

#[rstest]
fn fresh_accumulator_is_uninitialized(harness: Harness) {
    assert_eq!(harness.config.state(), SnapshotState::Uninitialized);
    assert!(harness.config.snapshot().is_none());
    assert_eq!(harness.reader.reads(), 0);
}

#[rstest]
fn materialize_seeds_defaults_once(mut harness: Harness) -> Result<()> {
    let first = Value::Object(harness.config.materialize().map_err(strata)?.clone());
    ensure!(first == defaults(), "unexpected defaults {first}");
    ensure!(harness.config.state() == SnapshotState::Materialized);

    harness.insert("package.json", r#"{"name": "renamed", "version": "9.9.9"}"#);
    let second = Value::Object(harness.config.materialize().map_err(strata)?.clone());
    ensure!(second == defaults(), "defaults were recomputed: {second}");
    ensure!(harness.reader.reads() == 1);
    Ok(())
}

#[rstest]
fn missing_descriptor_yields_null_name_and_version() -> Result<()> {
    let mut config = ConfigAccumulator::builder()
        .app_root(ROOT)
        .reader(MemoryReader::new())
        .build()
        .map_err(strata)?;
    let value = config.to_value().map_err(strata)?;
    ensure!(value == json!({"APP_NAME": null, "APP_VERSION": null, "APP_ROOT": ROOT}));
    Ok(())
}

#[rstest]
fn malformed_descriptor_surfaces_on_first_read() {
    let reader = MemoryReader::new().with_source(format!("{ROOT}/package.json"), "{ name: ");
    let mut config = ConfigAccumulator::from_parts(
        ROOT.into(),
        Box::new(reader),
        Box::new(StandardDecoder),
        Box::new(PatchScript),
    );
    let err = config.materialize().err();
    assert!(matches!(err.as_deref(), Some(StrataError::File { .. })));
    assert_eq!(config.state(), SnapshotState::Uninitialized);
}

#[rstest]
fn add_config_merges_successive_mappings(mut harness: Harness) -> Result<()> {
    harness
        .config
        .add_config(mapping(json!({"a": {"b": 1}}))?)
        .map_err(strata)?
        .add_config(mapping(json!({"a": {"c": 2}}))?)
        .map_err(strata)?;
    let mut expected = mapping(defaults())?;
    expected.insert("a".into(), json!({"b": 1, "c": 2}));
    ensure!(harness.config.to_value().map_err(strata)? == Value::Object(expected));
    Ok(())
}

#[rstest]
fn missing_file_contributes_nothing(mut harness: Harness) -> Result<()> {
    harness.config.add_file("missing.json").map_err(strata)?;
    ensure!(harness.config.to_value().map_err(strata)? == defaults());
    let entry = harness
        .config
        .file_cache()
        .get(Utf8Path::new("/app/missing.json"))
        .ok_or_else(|| anyhow!("missing file was not cached"))?;
    ensure!(entry.is_missing());
    Ok(())
}

#[rstest]
fn repeated_files_are_read_and_decoded_once(mut harness: Harness) -> Result<()> {
    harness.insert("config.json", r#"{"value": 1}"#);
    harness.config.materialize().map_err(strata)?;
    let reads_before = harness.reader.reads();
    let decodes_before = harness.decodes();

    harness
        .config
        .add_file("config.json")
        .map_err(strata)?
        .add_file("./nested/../config.json")
        .map_err(strata)?
        .add_file("/app/config.json")
        .map_err(strata)?;

    ensure!(harness.reader.reads() == reads_before + 1);
    ensure!(harness.decodes() == decodes_before + 1);
    ensure!(harness.config.file_cache().len() == 2);
    Ok(())
}

#[rstest]
fn cached_values_do_not_alias_the_snapshot(mut harness: Harness) -> Result<()> {
    harness.insert("config.json", r#"{"value": 1}"#);
    harness
        .config
        .add_file("config.json")
        .map_err(strata)?
        .add_script("value = 2")
        .map_err(strata)?;
    let cached = harness
        .config
        .file_cache()
        .get(Utf8Path::new("/app/config.json"))
        .cloned();
    ensure!(cached == Some(CacheEntry::Loaded(mapping(json!({"value": 1}))?)));
    Ok(())
}

#[rstest]
fn decode_failures_are_not_cached(mut harness: Harness) -> Result<()> {
    harness.insert("broken.json", r#"{"a": "#);
    let err = harness
        .config
        .add_file("broken.json")
        .err()
        .ok_or_else(|| anyhow!("malformed file must fail"))?;
    ensure!(
        err.to_string().starts_with("Error loading config /app/broken.json: "),
        "unexpected message: {err}"
    );
    ensure!(!harness.config.file_cache().contains(Utf8Path::new("/app/broken.json")));

    harness.insert("broken.json", r#"{"a": "fixed"}"#);
    harness.config.add_file("broken.json").map_err(strata)?;
    ensure!(harness.config.to_value().map_err(strata)?["a"] == json!("fixed"));
    Ok(())
}

/// Reader whose `locked.json` exists but cannot be read until unlocked.
struct LockedReader {
    inner: MemoryReader,
    is_locked: AtomicBool,
    reads: AtomicUsize,
}

impl SourceReader for LockedReader {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.file_name() == Some("locked.json") || self.inner.exists(path)
    }

    fn read_text(&self, path: &Utf8Path) -> std::io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if path.file_name() != Some("locked.json") {
            return self.inner.read_text(path);
        }
        if self.is_locked.load(Ordering::SeqCst) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        Ok(r#"{"unlocked": true}"#.to_owned())
    }
}

#[rstest]
fn unreadable_files_report_io_errors_and_are_not_cached() -> Result<()> {
    let reader = Arc::new(LockedReader {
        inner: MemoryReader::new().with_source(format!("{ROOT}/package.json"), "{}"),
        is_locked: AtomicBool::new(true),
        reads: AtomicUsize::new(0),
    });
    let mut config = ConfigAccumulator::builder()
        .app_root(ROOT)
        .reader(Arc::clone(&reader))
        .build()
        .map_err(strata)?;
    config.add_config(mapping(json!({"kept": 1}))?).map_err(strata)?;
    let before = config.to_value().map_err(strata)?;

    let err = config
        .add_file("config/locked.json")
        .err()
        .ok_or_else(|| anyhow!("unreadable file must fail"))?;
    ensure!(matches!(err.as_ref(), StrataError::Io { .. }), "unexpected error: {err}");
    ensure!(err.path().map(|path| path.as_str()) == Some("/app/config/locked.json"));
    ensure!(config.to_value().map_err(strata)? == before);
    ensure!(!config.file_cache().contains(Utf8Path::new("/app/config/locked.json")));
    ensure!(reader.reads.load(Ordering::SeqCst) == 2);

    reader.is_locked.store(false, Ordering::SeqCst);
    config.add_file("config/locked.json").map_err(strata)?;
    ensure!(reader.reads.load(Ordering::SeqCst) == 3);
    ensure!(config.to_value().map_err(strata)?["unlocked"] == json!(true));
    Ok(())
}

#[rstest]
#[serial]
fn relative_roots_are_anchored_to_the_working_directory() -> Result<()> {
    let mut config = ConfigAccumulator::builder()
        .app_root("rel/./root")
        .reader(MemoryReader::new())
        .build()
        .map_err(strata)?;
    let root = config.app_root().to_path_buf();
    ensure!(root.is_absolute(), "root {root} is relative");
    ensure!(root.ends_with("rel/root"), "root {root} was not normalised");

    config.add_file("a.json").map_err(strata)?;
    for (path, _) in config.file_cache().iter() {
        ensure!(path.is_absolute(), "non-absolute cache key {path}");
    }
    ensure!(config.file_cache().contains(&root.join("a.json")));
    ensure!(config.to_value().map_err(strata)?[APP_ROOT_KEY] == json!(root.as_str()));
    Ok(())
}

#[rstest]
fn failed_string_leaves_state_untouched(mut harness: Harness) -> Result<()> {
    let err = harness.config.add_string(r#"{"a":"#).err();
    ensure!(matches!(err.as_deref(), Some(StrataError::Inline(_))));
    ensure!(harness.config.state() == SnapshotState::Uninitialized);
    ensure!(harness.config.applied().is_empty());

    harness.config.add_string("{a: 1}").map_err(strata)?;
    let err = harness.config.add_string("a: [").err();
    ensure!(err.is_some());
    ensure!(harness.config.to_value().map_err(strata)?["a"] == json!(1));
    Ok(())
}

#[rstest]
#[case(Format::Yaml, "a:\n  b: yaml\n")]
#[case(Format::Json, r#"{"a": {"b": "yaml"}}"#)]
#[case(Format::Json5, "{a: {b: 'yaml'}}")]
fn add_string_as_honours_the_format(
    mut harness: Harness,
    #[case] format: Format,
    #[case] text: &str,
) -> Result<()> {
    harness.config.add_string_as(text, format).map_err(strata)?;
    ensure!(harness.config.to_value().map_err(strata)?["a"] == json!({"b": "yaml"}));
    Ok(())
}

#[rstest]
fn top_level_sequences_are_rejected(mut harness: Harness) {
    let err = harness.config.add_string("[1, 2]").err();
    assert!(matches!(
        err.as_deref(),
        Some(StrataError::Inline(DecodeError::NotAMapping { found: "array" }))
    ));
}

#[rstest]
fn scripts_mutate_the_live_snapshot(mut harness: Harness) -> Result<()> {
    harness
        .config
        .add_config(mapping(json!({"x": {"y": "old", "w": 1}}))?)
        .map_err(strata)?
        .add_script("x.y = \"z\"")
        .map_err(strata)?;
    let value = harness.config.to_value().map_err(strata)?;
    ensure!(value["x"] == json!({"y": "z", "w": 1}));
    ensure!(value["APP_NAME"] == json!("demo"));
    Ok(())
}

#[rstest]
fn script_failures_keep_partial_mutations(mut harness: Harness) -> Result<()> {
    let err = harness
        .config
        .add_script("first = 1\nmissing.field = 2")
        .err()
        .ok_or_else(|| anyhow!("script must fail"))?;
    ensure!(matches!(
        err.as_ref(),
        StrataError::Script(ScriptError::Runtime { line: 2, .. })
    ));
    ensure!(harness.config.to_value().map_err(strata)?["first"] == json!(1));
    ensure!(harness.config.applied().is_empty());
    Ok(())
}

struct UppercaseKeys;

impl ScriptRunner for UppercaseKeys {
    fn run(&self, _script: &str, context: &mut Map<String, Value>) -> Result<(), ScriptError> {
        let taken = std::mem::take(context);
        context.extend(taken.into_iter().map(|(key, value)| (key.to_uppercase(), value)));
        Ok(())
    }
}

#[rstest]
fn script_runner_is_pluggable() -> Result<()> {
    let mut config = ConfigAccumulator::builder()
        .app_root(ROOT)
        .reader(MemoryReader::new())
        .script_runner(UppercaseKeys)
        .build()
        .map_err(strata)?;
    config
        .add_config(mapping(json!({"port": 1}))?)
        .map_err(strata)?
        .add_script("ignored")
        .map_err(strata)?;
    ensure!(config.to_value().map_err(strata)?["PORT"] == json!(1));
    Ok(())
}

#[rstest]
fn applied_sources_are_recorded_in_order(mut harness: Harness) -> Result<()> {
    harness.insert("config.yaml", "a: 1\n");
    harness
        .config
        .add_file("config.yaml")
        .map_err(strata)?
        .add_string("{b: 2}")
        .map_err(strata)?
        .add_config(Map::new())
        .map_err(strata)?
        .add_script("c = 3")
        .map_err(strata)?;
    let kinds: Vec<SourceProvenance> = harness
        .config
        .applied()
        .iter()
        .map(|source| source.provenance())
        .collect();
    ensure!(
        kinds
            == [
                SourceProvenance::File,
                SourceProvenance::String,
                SourceProvenance::Config,
                SourceProvenance::Script,
            ]
    );
    let first_path = harness.config.applied().first().and_then(|source| source.path());
    ensure!(first_path == Some(Utf8Path::new("/app/config.yaml")));
    Ok(())
}

#[rstest]
fn missing_files_are_logged_and_told_apart_by_the_cache(mut harness: Harness) -> Result<()> {
    harness.insert("found.json", "{}");
    harness
        .config
        .add_file("found.json")
        .map_err(strata)?
        .add_file("absent.json")
        .map_err(strata)?;
    let paths: Vec<&Utf8Path> = harness
        .config
        .applied()
        .iter()
        .filter_map(|source| source.path())
        .collect();
    ensure!(paths == [Utf8Path::new("/app/found.json"), Utf8Path::new("/app/absent.json")]);
    let cache = harness.config.file_cache();
    ensure!(matches!(cache.get(Utf8Path::new("/app/found.json")), Some(CacheEntry::Loaded(_))));
    ensure!(cache.get(Utf8Path::new("/app/absent.json")).is_some_and(CacheEntry::is_missing));
    Ok(())
}

#[rstest]
fn load_file_does_not_touch_the_snapshot(mut harness: Harness) -> Result<()> {
    harness.insert("extra.json5", "{ extra: true, }");
    let loaded = harness.config.load_file("extra.json5").map_err(strata)?;
    ensure!(Value::Object(loaded) == json!({"extra": true}));
    ensure!(harness.config.state() == SnapshotState::Uninitialized);
    ensure!(harness.config.package().map_err(strata)?["private"] == json!(true));
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    #[serde(rename = "APP_NAME")]
    name: String,
    server: Server,
}

#[rstest]
fn extract_deserialises_the_snapshot(mut harness: Harness) -> Result<()> {
    harness
        .config
        .add_string_as("server: {host: example, port: 8080}", Format::Yaml)
        .map_err(strata)?;
    let config: AppConfig = harness.config.extract().map_err(strata)?;
    ensure!(config.name == "demo");
    ensure!(
        config.server
            == Server {
                host: "example".into(),
                port: 8080
            }
    );

    harness.config.add_string("{server: {port: 'nope'}}").map_err(strata)?;
    let err = harness.config.extract::<AppConfig>().err();
    ensure!(matches!(err.as_deref(), Some(StrataError::Extract(_))));
    Ok(())
}

#[rstest]
fn into_snapshot_returns_the_owned_mapping(mut harness: Harness) -> Result<()> {
    harness.config.add_string("{k: 'v'}").map_err(strata)?;
    let snapshot = harness.config.into_snapshot().map_err(strata)?;
    ensure!(snapshot.get("k") == Some(&json!("v")));
    ensure!(snapshot.contains_key("APP_ROOT"));
    Ok(())
}
