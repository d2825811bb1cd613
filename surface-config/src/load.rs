use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use apisurface_core::{
    find_package_json,
    path::{normalize, resolve},
};
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::{
    DefaultConfig, Error, Result,
    error::{SourceContext, Stage},
    merge::merge_overwriting_arrays,
    prepare::PrepareOptions,
    schema::{BuiltinSchema, SchemaValidator},
    tokens::{LOOKUP_TOKEN, PROJECT_FOLDER_TOKEN},
};

/// Standard name of the configuration file.
pub const CONFIG_FILENAME: &str = "api-surface.json";

/// Object paths of every field that holds a file system path.
///
/// `additionalEntryPoints` is handled separately because it is an array.
const PATH_FIELDS: &[&[&str]] = &[
    &["projectFolder"],
    &["mainEntryPointFilePath"],
    &["compiler", "tsconfigFilePath"],
    &["apiReport", "reportFolder"],
    &["apiReport", "reportTempFolder"],
    &["docModel", "apiJsonFilePath"],
    &["dtsRollup", "untrimmedFilePath"],
    &["dtsRollup", "alphaTrimmedFilePath"],
    &["dtsRollup", "betaTrimmedFilePath"],
    &["dtsRollup", "publicTrimmedFilePath"],
    &["tsdocMetadata", "tsdocMetadataFilePath"],
];

/// Loads `api-surface.json` documents, following `extends` and applying defaults.
pub struct ConfigLoader<'a> {
    defaults: &'a DefaultConfig,
    schema: &'a dyn SchemaValidator,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(defaults: &'a DefaultConfig) -> Self {
        Self {
            defaults,
            schema: &BuiltinSchema,
        }
    }

    /// Use a different schema validator for the final check.
    pub fn with_schema(mut self, schema: &'a dyn SchemaValidator) -> Self {
        self.schema = schema;
        self
    }

    /// Load a configuration file and everything it extends, merged over the
    /// built-in defaults and validated.
    ///
    /// Relative paths in each document are made absolute against that
    /// document's own folder before merging.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> Result<Value> {
        let root_path = absolute(path);
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut merged = Value::Object(Map::new());
        let mut current = Some(root_path.clone());

        while let Some(current_path) = current.take() {
            let file = current_path.display().to_string();
            if !visited.insert(current_path.clone()) {
                return Err(Box::new(Error::ExtendsCycle {
                    file,
                    path: current_path,
                }));
            }

            let mut document = read_document(&current_path)?;
            let folder = current_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();

            let extends = match document.remove("extends") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) if s.trim().is_empty() => None,
                Some(Value::String(s)) => Some(resolve_extends(&s, &folder, &file)?),
                Some(_) => {
                    return Err(Error::load(file, "The \"extends\" field must be a string"));
                }
            };

            rewrite_relative_paths(&mut document, &folder);

            let mut base = Value::Object(document);
            merge_overwriting_arrays(&mut base, merged);
            merged = base;

            if let Some(next) = &extends {
                debug!(from = %current_path.display(), to = %next.display(), "following extends");
            }
            current = extends;
        }

        let mut config = self.defaults.document().clone();
        merge_overwriting_arrays(&mut config, merged);

        let violations = self.schema.validate(&config);
        if !violations.is_empty() {
            return Err(Error::schema(
                Stage::Loading,
                root_path.display().to_string(),
                violations,
            ));
        }

        trace!(files = visited.len(), "configuration loaded");
        Ok(config)
    }

    /// Find and load the configuration for the project containing
    /// `starting_folder`.
    ///
    /// Looks in `<package>/config/api-surface.json`, then
    /// `<package>/api-surface.json`, where `<package>` is the folder of the
    /// nearest `package.json` (or `starting_folder` if there is none).
    /// Returns `Ok(None)` if neither file exists.
    #[instrument(skip(self), fields(folder = %starting_folder.display()))]
    pub fn try_load_for_folder(&self, starting_folder: &Path) -> Result<Option<PrepareOptions>> {
        let starting_folder = absolute(starting_folder);
        let package_json_full_path = find_package_json(&starting_folder);
        let base_folder = package_json_full_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| starting_folder.clone());

        let in_config_folder = base_folder.join("config").join(CONFIG_FILENAME);
        let at_root = base_folder.join(CONFIG_FILENAME);

        let config_path = match (in_config_folder.is_file(), at_root.is_file()) {
            (true, true) => {
                return Err(Box::new(Error::ConflictingConfigFiles { base: base_folder }));
            }
            (true, false) => in_config_folder,
            (false, true) => at_root,
            (false, false) => {
                debug!("no configuration file found");
                return Ok(None);
            }
        };

        let config_object = self.load_file(&config_path)?;
        Ok(Some(PrepareOptions {
            config_object,
            config_object_full_path: Some(config_path),
            package_json_full_path,
            ..PrepareOptions::default()
        }))
    }
}

pub(crate) fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        resolve(&cwd, path)
    }
}

fn read_document(path: &Path) -> Result<Map<String, Value>> {
    let file = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::load(&file, format!("failed to read file: {e}")))?;
    let ctx = SourceContext::new(&content, &file);
    match serde_json::from_str::<Value>(&content).map_err(|e| ctx.parse_error(e))? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::load(file, "the configuration file must contain a JSON object")),
    }
}

/// Resolve an `extends` value from the perspective of `folder`.
fn resolve_extends(value: &str, folder: &Path, file: &str) -> Result<PathBuf> {
    let is_relative = ["./", ".\\", "../", "..\\"]
        .iter()
        .any(|prefix| value.starts_with(prefix));
    if is_relative {
        return Ok(resolve(folder, value));
    }
    if Path::new(value).is_absolute() {
        return Ok(normalize(Path::new(value)));
    }

    for ancestor in folder.ancestors() {
        let candidate = ancestor.join("node_modules").join(value);
        if candidate.is_file() {
            return Ok(candidate);
        }
        let with_extension = ancestor.join("node_modules").join(format!("{value}.json"));
        if with_extension.is_file() {
            return Ok(with_extension);
        }
    }

    Err(Box::new(Error::UnresolvedExtends {
        file: file.to_string(),
        name: value.to_string(),
        reason: format!(
            "not found in any node_modules folder above {}",
            folder.display()
        ),
    }))
}

fn rewrite_relative_paths(document: &mut Map<String, Value>, folder: &Path) {
    for field in PATH_FIELDS {
        if let Some(value) = lookup_mut(document, field) {
            rewrite_path_value(value, folder);
        }
    }

    if let Some(Value::Array(entries)) = document.get_mut("additionalEntryPoints") {
        for entry in entries {
            if let Some(value) = entry.get_mut("filePath") {
                rewrite_path_value(value, folder);
            }
        }
    }
}

fn lookup_mut<'v>(document: &'v mut Map<String, Value>, field: &[&str]) -> Option<&'v mut Value> {
    let (last, parents) = field.split_last()?;
    let mut current = document;
    for key in parents {
        current = current.get_mut(*key)?.as_object_mut()?;
    }
    current.get_mut(*last)
}

fn rewrite_path_value(value: &mut Value, folder: &Path) {
    let Value::String(s) = value else {
        return;
    };
    if s.is_empty()
        || Path::new(s.as_str()).is_absolute()
        || s.starts_with(PROJECT_FOLDER_TOKEN)
        || s.trim() == LOOKUP_TOKEN
    {
        return;
    }
    *s = resolve(folder, s.as_str()).to_string_lossy().into_owned();
}
