//! Definition tree walking and registry construction.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use crate::definitions::source::{DefinitionSource, Entry, EntryKind, FsSource};
use crate::definitions::variant::{Variant, VariantError};
use crate::observability::metrics;
use crate::routing::key::{method_for_dir, EndpointKey, EndpointPath};
use crate::routing::{Endpoint, Registry};

/// Only this exact file name provides the `default` variant.
const DEFAULT_FILE: &str = "default.json";

/// Error type for definition loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The tree itself could not be walked.
    #[error("definition tree error at {}: {source}", path.display())]
    Tree {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A method directory or variant file is malformed.
    #[error("definition file error at {}: {kind}", path.display())]
    File {
        path: PathBuf,
        #[source]
        kind: FileErrorKind,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FileErrorKind {
    #[error("method directory contains no variant files")]
    EmptyMethodDirectory,
    #[error("missing default.json")]
    MissingDefault,
    #[error("duplicate variant {0:?}")]
    DuplicateVariant(String),
    #[error("directories are not allowed inside a method directory")]
    NestedDirectory,
    #[error("unreadable file: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Variant(#[from] VariantError),
}

/// One variant file, decoded.
#[derive(Debug, Clone)]
pub struct Definition {
    pub key: EndpointKey,
    pub variant: String,
    pub file: PathBuf,
    pub response: Variant,
}

/// Load the definition tree under `root` from the local filesystem.
pub fn load_dir(root: &Path) -> Result<Registry, LoadError> {
    load(&FsSource, root)
}

/// Load the definition tree under `root` into a registry.
pub fn load<S: DefinitionSource>(source: &S, root: &Path) -> Result<Registry, LoadError> {
    let definitions = scan(source, root)?;
    let definition_count = definitions.len();

    // Variants grouped per endpoint, remembering each endpoint's method directory.
    let mut grouped: HashMap<EndpointKey, (PathBuf, BTreeMap<String, Variant>)> = HashMap::new();
    for def in definitions {
        let dir = def.file.parent().map(Path::to_path_buf).unwrap_or_default();
        let (_, variants) = grouped
            .entry(def.key)
            .or_insert_with(|| (dir, BTreeMap::new()));

        if variants.contains_key(&def.variant) {
            return Err(LoadError::File {
                path: def.file,
                kind: FileErrorKind::DuplicateVariant(def.variant),
            });
        }
        variants.insert(def.variant, def.response);
    }

    let mut endpoints = Vec::with_capacity(grouped.len());
    for (key, (dir, variants)) in grouped {
        let endpoint = Endpoint::new(key, variants).map_err(|_| LoadError::File {
            path: dir,
            kind: FileErrorKind::MissingDefault,
        })?;
        endpoints.push(endpoint);
    }

    let registry = Registry::new(endpoints);
    metrics::record_endpoints_loaded(registry.len());
    if registry.is_empty() {
        tracing::warn!(root = %root.display(), "No endpoints defined; every request will get 404");
    }
    tracing::info!(
        root = %root.display(),
        endpoints = registry.len(),
        variants = definition_count,
        "Definitions loaded"
    );

    Ok(registry)
}

/// Walk the tree under `root` and decode every variant file.
pub fn scan<S: DefinitionSource>(source: &S, root: &Path) -> Result<Vec<Definition>, LoadError> {
    let mut out = Vec::new();
    let mut segments = Vec::new();
    walk(source, root, &mut segments, &mut out)?;
    Ok(out)
}

fn list_sorted<S: DefinitionSource>(source: &S, dir: &Path) -> Result<Vec<Entry>, LoadError> {
    let mut entries = source.list(dir).map_err(|e| LoadError::Tree {
        path: dir.to_path_buf(),
        source: e,
    })?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn walk<S: DefinitionSource>(
    source: &S,
    dir: &Path,
    segments: &mut Vec<String>,
    out: &mut Vec<Definition>,
) -> Result<(), LoadError> {
    for entry in list_sorted(source, dir)? {
        let path = dir.join(&entry.name);
        match entry.kind {
            EntryKind::Dir => match method_for_dir(&entry.name) {
                Some(method) => {
                    let key = EndpointKey::new(method, EndpointPath::from_segments(segments.iter().cloned()));
                    scan_method_dir(source, &path, key, out)?;
                }
                None => {
                    segments.push(entry.name);
                    walk(source, &path, segments, out)?;
                    segments.pop();
                }
            },
            EntryKind::File => {
                tracing::debug!(path = %path.display(), "Ignoring file outside a method directory");
            }
        }
    }
    Ok(())
}

fn scan_method_dir<S: DefinitionSource>(
    source: &S,
    dir: &Path,
    key: EndpointKey,
    out: &mut Vec<Definition>,
) -> Result<(), LoadError> {
    if key.path.is_control() {
        tracing::warn!(path = %dir.display(), "Skipping definitions for the reserved control path");
        return Ok(());
    }

    let mut found = 0;
    let mut has_default = false;
    for entry in list_sorted(source, dir)? {
        if entry.name.starts_with('.') {
            continue;
        }

        let path = dir.join(&entry.name);
        if entry.kind == EntryKind::Dir {
            return Err(LoadError::File {
                path,
                kind: FileErrorKind::NestedDirectory,
            });
        }

        let variant = Path::new(&entry.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.name.clone());
        has_default |= entry.name == DEFAULT_FILE;

        let raw = source.read(&path).map_err(|e| LoadError::File {
            path: path.clone(),
            kind: FileErrorKind::Read(e),
        })?;
        let response = Variant::from_slice(&raw).map_err(|e| LoadError::File {
            path: path.clone(),
            kind: e.into(),
        })?;

        tracing::debug!(endpoint = %key, variant = %variant, "Variant loaded");
        out.push(Definition {
            key: key.clone(),
            variant,
            file: path,
            response,
        });
        found += 1;
    }

    if found == 0 {
        return Err(LoadError::File {
            path: dir.to_path_buf(),
            kind: FileErrorKind::EmptyMethodDirectory,
        });
    }
    if !has_default {
        return Err(LoadError::File {
            path: dir.to_path_buf(),
            kind: FileErrorKind::MissingDefault,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::source::MemorySource;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    const DEFAULT_JSON: &str =
        r#"{ "response_code": 200, "headers": { "header-1": "some value" }, "body": { "a":1, "b":2, "c":3 }}"#;

    fn root() -> &'static Path {
        Path::new("")
    }

    #[test]
    fn test_loads_every_endpoint() {
        let source = MemorySource::new()
            .with_file("endpoint1/POST/default.json", DEFAULT_JSON)
            .with_file("endpoint1/GET/default.json", DEFAULT_JSON)
            .with_file("endpoint1/subendpoint1/GET/default.json", DEFAULT_JSON)
            .with_file("endpoint1/subendpoint1/GET/empty.json", r#"{ "response_code": 204 }"#)
            .with_file("README.md", "not a definition");

        let registry = load(&source, root()).unwrap();
        assert_eq!(registry.len(), 3);

        let endpoint = registry.lookup(&Method::GET, "/endpoint1/subendpoint1").unwrap();
        assert_eq!(endpoint.variant_names().collect::<Vec<_>>(), vec!["default", "empty"]);
        assert_eq!(endpoint.active().name(), "default");
        assert_eq!(endpoint.active().variant().body(), &json!({ "a": 1, "b": 2, "c": 3 }));
        assert_eq!(endpoint.variant("empty").unwrap().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_scan_yields_tuples() {
        let source = MemorySource::new()
            .with_file("a/b/PUT/default.json", "{}")
            .with_file("a/b/PUT/conflict.json", r#"{ "response_code": 409 }"#);

        let defs = scan(&source, root()).unwrap();
        let tuples: Vec<(String, &str)> = defs.iter().map(|d| (d.key.to_string(), d.variant.as_str())).collect();
        assert_eq!(
            tuples,
            vec![("PUT /a/b".to_string(), "conflict"), ("PUT /a/b".to_string(), "default")]
        );
    }

    #[test]
    fn test_root_endpoint() {
        let source = MemorySource::new().with_file("GET/default.json", "{}");
        let registry = load(&source, root()).unwrap();
        assert!(registry.lookup(&Method::GET, "/").is_ok());
    }

    #[test]
    fn test_tree_without_method_dirs_is_empty() {
        let source = MemorySource::new()
            .with_file("README.md", "notes")
            .with_file("things/notes.txt", "more notes");

        let registry = load(&source, root()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_root() {
        let err = load(&MemorySource::new(), Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, LoadError::Tree { .. }));

        let err = load_dir(Path::new("/this/doesnt/exist")).unwrap_err();
        assert!(matches!(err, LoadError::Tree { .. }));
    }

    #[test]
    fn test_missing_default() {
        let source = MemorySource::new()
            .with_file("things/GET/default.json", "{}")
            .with_file("things/POST/created.json", "{}");

        match load(&source, root()).unwrap_err() {
            LoadError::File { path, kind: FileErrorKind::MissingDefault } => {
                assert_eq!(path, Path::new("things/POST"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_must_be_json_file() {
        for name in ["default.txt", "default"] {
            let source = MemorySource::new()
                .with_file(format!("things/GET/{name}"), "{}")
                .with_file("things/GET/other.json", "{}");

            match load(&source, root()).unwrap_err() {
                LoadError::File { path, kind: FileErrorKind::MissingDefault } => {
                    assert_eq!(path, Path::new("things/GET"));
                }
                other => panic!("unexpected error for {name}: {other}"),
            }
        }
    }

    #[test]
    fn test_rejects_informational_status() {
        let source = MemorySource::new()
            .with_file("x/GET/default.json", r#"{ "response_code": 103, "body": 1 }"#);

        match load(&source, root()).unwrap_err() {
            LoadError::File { path, kind: FileErrorKind::Variant(VariantError::Status(103)) } => {
                assert_eq!(path, Path::new("x/GET/default.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_method_dir() {
        let source = MemorySource::new()
            .with_dir("things/GET")
            .with_file("things/GET/.keep", "");

        let err = load(&source, root()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::File { kind: FileErrorKind::EmptyMethodDirectory, .. }
        ));
    }

    #[test]
    fn test_bad_json_names_file() {
        let source = MemorySource::new()
            .with_file("things/GET/default.json", "{}")
            .with_file("things/GET/broken.json", "{ nope");

        match load(&source, root()).unwrap_err() {
            LoadError::File { path, kind: FileErrorKind::Variant(_) } => {
                assert_eq!(path, Path::new("things/GET/broken.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_variant_names() {
        let source = MemorySource::new()
            .with_file("things/GET/default.json", "{}")
            .with_file("things/GET/default.txt", "{}");

        let err = load(&source, root()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::File { kind: FileErrorKind::DuplicateVariant(_), .. }
        ));
    }

    #[test]
    fn test_nested_dir_in_method_dir() {
        let source = MemorySource::new()
            .with_file("things/GET/default.json", "{}")
            .with_file("things/GET/more/default.json", "{}");

        let err = load(&source, root()).unwrap_err();
        assert!(matches!(err, LoadError::File { kind: FileErrorKind::NestedDirectory, .. }));
    }

    #[test]
    fn test_lowercase_method_dir_is_a_segment() {
        let source = MemorySource::new().with_file("things/get/GET/default.json", "{}");
        let registry = load(&source, root()).unwrap();
        assert!(registry.lookup(&Method::GET, "/things/get").is_ok());
        assert!(registry.lookup(&Method::GET, "/things").is_err());
    }

    #[test]
    fn test_control_path_skipped() {
        let source = MemorySource::new()
            .with_file("__ersatz/POST/default.json", "{}")
            .with_file("real/GET/default.json", "{}");

        let registry = load(&source, root()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup(&Method::POST, "/__ersatz").is_err());
    }

    #[test]
    fn test_load_is_deterministic() {
        let source = MemorySource::new()
            .with_file("x/GET/default.json", DEFAULT_JSON)
            .with_file("x/GET/other.json", r#"{ "body": [1] }"#)
            .with_file("y/DELETE/default.json", r#"{ "response_code": 204 }"#);

        let first = load(&source, root()).unwrap();
        let second = load(&source, root()).unwrap();
        assert_eq!(first.snapshot(), second.snapshot());

        for summary in first.snapshot() {
            let key = EndpointKey::parse(&summary.method, &summary.url).unwrap();
            for name in &summary.variants {
                let a = first.variant(&key, name).unwrap();
                let b = second.variant(&key, name).unwrap();
                assert_eq!(a.status(), b.status());
                assert_eq!(a.headers(), b.headers());
                assert_eq!(a.body_bytes(), b.body_bytes());
            }
        }
    }
}
