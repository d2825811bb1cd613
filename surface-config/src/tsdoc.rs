use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use apisurface_core::{PackageJson, path::resolve};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    error::SourceContext,
    validate::validate_tag_name,
};

/// Name of the doc-comment configuration file looked up in the project folder.
pub const TSDOC_CONFIG_FILENAME: &str = "tsdoc.json";

/// Name of the metadata file written next to a package's typings.
pub const TSDOC_METADATA_FILENAME: &str = "tsdoc-metadata.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSyntaxKind {
    Block,
    Inline,
    Modifier,
}

/// A custom doc-comment tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TagDefinition {
    pub tag_name: String,
    pub syntax_kind: TagSyntaxKind,
    #[serde(default)]
    pub allow_multiple: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TsdocConfigFile {
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,
    #[serde(default)]
    extends: Vec<String>,
    #[serde(default)]
    no_standard_tags: Option<bool>,
    #[serde(default)]
    tag_definitions: Vec<TagDefinition>,
    #[serde(default)]
    support_for_tags: IndexMap<String, bool>,
}

/// Doc-comment parser configuration, after following `extends`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TsdocConfig {
    /// The project's own `tsdoc.json`, or `None` for the built-in base.
    file_path: Option<PathBuf>,
    no_standard_tags: bool,
    tag_definitions: Vec<TagDefinition>,
    support_for_tags: IndexMap<String, bool>,
}

impl TsdocConfig {
    /// Base configuration used when a project has no `tsdoc.json`.
    ///
    /// It defines the extractor's own release-stage modifiers on top of the
    /// standard tags.
    pub fn builtin() -> Self {
        let tag_definitions: Vec<TagDefinition> = ["@betaDocumentation", "@internalRemarks", "@preapproved"]
            .into_iter()
            .map(|name| TagDefinition {
                tag_name: name.to_string(),
                syntax_kind: if name == "@internalRemarks" {
                    TagSyntaxKind::Block
                } else {
                    TagSyntaxKind::Modifier
                },
                allow_multiple: false,
            })
            .collect();
        let support_for_tags = tag_definitions
            .iter()
            .map(|definition| (definition.tag_name.clone(), true))
            .collect();

        Self {
            file_path: None,
            no_standard_tags: false,
            tag_definitions,
            support_for_tags,
        }
    }

    /// Load `<project_folder>/tsdoc.json` if present, else the built-in base.
    pub fn load_for_folder(project_folder: &Path) -> Result<Self> {
        let path = project_folder.join(TSDOC_CONFIG_FILENAME);
        if path.is_file() {
            Self::load_file(&path)
        } else {
            Ok(Self::builtin())
        }
    }

    /// Load a `tsdoc.json` file and everything it extends.
    pub fn load_file(path: &Path) -> Result<Self> {
        let mut config = Self {
            file_path: Some(path.to_path_buf()),
            ..Self::default()
        };
        let mut visited = HashSet::new();
        config.apply_file(path, &mut visited)?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path, visited: &mut HashSet<PathBuf>) -> Result<()> {
        let filename = path.display().to_string();
        if !visited.insert(path.to_path_buf()) {
            return Err(Error::load(
                filename,
                "The \"extends\" field creates a circular reference",
            ));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::load(&filename, format!("failed to read file: {e}")))?;
        let ctx = SourceContext::new(&content, &filename);
        let file: TsdocConfigFile =
            serde_json::from_str(&content).map_err(|e| ctx.parse_error(e))?;

        let folder = path.parent().unwrap_or(Path::new("."));
        for base in &file.extends {
            if !(base.starts_with("./") || base.starts_with("../")) {
                return Err(Error::load(
                    filename,
                    format!("Unable to resolve \"extends\" reference to \"{base}\": only relative paths are supported"),
                ));
            }
            self.apply_file(&resolve(folder, base), visited)?;
        }

        let mut violations = Vec::new();
        for definition in &file.tag_definitions {
            if let Some(reason) = validate_tag_name(&definition.tag_name) {
                violations.push(format!("tagDefinitions: \"{}\": {reason}", definition.tag_name));
            }
        }
        for name in file.support_for_tags.keys() {
            if let Some(reason) = validate_tag_name(name) {
                violations.push(format!("supportForTags: \"{name}\": {reason}"));
            }
        }
        if !violations.is_empty() {
            return Err(Error::load(filename, violations.join("\n")));
        }

        if let Some(no_standard_tags) = file.no_standard_tags {
            self.no_standard_tags = no_standard_tags;
        }
        for definition in file.tag_definitions {
            match self
                .tag_definitions
                .iter_mut()
                .find(|existing| existing.tag_name.eq_ignore_ascii_case(&definition.tag_name))
            {
                Some(existing) => *existing = definition,
                None => self.tag_definitions.push(definition),
            }
        }
        self.support_for_tags.extend(file.support_for_tags);
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn no_standard_tags(&self) -> bool {
        self.no_standard_tags
    }

    pub fn tag_definitions(&self) -> &[TagDefinition] {
        &self.tag_definitions
    }

    pub fn is_tag_supported(&self, name: &str) -> bool {
        self.support_for_tags.get(name).copied().unwrap_or(false)
    }
}

/// Where `tsdoc-metadata.json` belongs for a package.
///
/// Checks the manifest's `tsdocMetadata` field, then the folder of
/// `typings`/`types`, then the folder of `main`, then the package root.
pub fn resolve_tsdoc_metadata_path(package_folder: &Path, package_json: &PackageJson) -> PathBuf {
    if let Some(explicit) = package_json.tsdoc_metadata.as_deref().filter(|s| !s.is_empty()) {
        return resolve(package_folder, explicit);
    }

    let folder_of = |file: &str| {
        let path = resolve(package_folder, file);
        path.parent().map(Path::to_path_buf).unwrap_or(path)
    };

    let folder = package_json
        .typings_path()
        .map(folder_of)
        .or_else(|| {
            package_json
                .main
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(folder_of)
        })
        .unwrap_or_else(|| package_folder.to_path_buf());

    folder.join(TSDOC_METADATA_FILENAME)
}
