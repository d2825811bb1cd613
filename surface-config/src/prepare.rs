use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use apisurface_core::{
    PackageJson, ReleaseTag, find_package_json, load_package_json,
    path::is_declaration_file, validate_package_name,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    ConfigLoader, DefaultConfig, Result,
    error::PrepareContext,
    extractor_config::{EntryPoint, ExtractorConfig},
    file::{ApiReportSection, ConfigFile},
    load::absolute,
    report::{
        REPORT_FILE_SUFFIX, ReportConfig, ReportVariant, tags_to_report_with_defaults,
        validate_tags_to_report,
    },
    schema::{BuiltinSchema, SchemaValidator},
    tokens::{LOOKUP_TOKEN, TokenContext, reject_tokens},
    tsdoc::{TsdocConfig, resolve_tsdoc_metadata_path},
};

/// File whose presence marks the project folder during `<lookup>`.
pub const TSCONFIG_FILENAME: &str = "tsconfig.json";

/// Inputs to [`ExtractorConfig::prepare`].
#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
    /// A merged configuration document, usually from [`ConfigLoader::load_file`].
    pub config_object: Value,
    /// Absolute path the document was loaded from; used for error messages and
    /// for resolving `<lookup>` in `projectFolder`.
    pub config_object_full_path: Option<PathBuf>,
    /// Absolute path of the project's `package.json`.
    pub package_json_full_path: Option<PathBuf>,
    /// Already-parsed contents of `package_json_full_path`.
    pub package_json: Option<PackageJson>,
    /// Folder to use for `<lookup>` in `projectFolder` instead of searching.
    pub project_folder_lookup_token: Option<PathBuf>,
    /// Skip the check that the main entry point exists on disk.
    pub ignore_missing_entry_point: bool,
    /// Already-loaded doc-comment configuration.
    pub tsdoc_config: Option<TsdocConfig>,
}

impl ExtractorConfig {
    /// Load `path` with [`ConfigLoader::load_file`], find the nearest
    /// `package.json`, and prepare the result.
    pub fn load_file_and_prepare(path: &Path, defaults: &DefaultConfig) -> Result<Self> {
        let config_object_full_path = absolute(path);
        let config_object = ConfigLoader::new(defaults).load_file(&config_object_full_path)?;
        let package_json_full_path = config_object_full_path
            .parent()
            .and_then(find_package_json);

        Self::prepare(PrepareOptions {
            config_object,
            config_object_full_path: Some(config_object_full_path),
            package_json_full_path,
            ..PrepareOptions::default()
        })
    }

    /// Validate a merged configuration document and resolve it into an
    /// immutable `ExtractorConfig`.
    #[instrument(skip_all, fields(file = ?options.config_object_full_path))]
    pub fn prepare(options: PrepareOptions) -> Result<Self> {
        let ctx = PrepareContext::new(
            options
                .config_object_full_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the configuration object".to_string()),
        );

        if options
            .config_object
            .get("extends")
            .is_some_and(|v| !v.is_null())
        {
            return Err(ctx.error(
                "The \"extends\" field must be expanded before calling ExtractorConfig::prepare()",
            ));
        }

        if let Some(path) = &options.config_object_full_path
            && !path.is_absolute()
        {
            return Err(ctx.error("The \"configObjectFullPath\" setting must be an absolute path"));
        }

        let violations = BuiltinSchema.validate(&options.config_object);
        if !violations.is_empty() {
            return Err(ctx.schema_error(violations));
        }
        let config = ConfigFile::deserialize(&options.config_object)
            .map_err(|e| ctx.schema_error(vec![e.to_string()]))?;

        let (package_json, package_folder) = match &options.package_json_full_path {
            Some(path) => {
                let has_json_extension = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if !has_json_extension {
                    return Err(ctx.error(
                        "The \"packageJsonFullPath\" setting does not have a .json file extension",
                    ));
                }
                if !path.is_absolute() {
                    return Err(ctx.error("The \"packageJsonFullPath\" setting must be an absolute path"));
                }
                let package_json = match &options.package_json {
                    Some(package_json) => package_json.clone(),
                    None => load_package_json(path).map_err(|e| ctx.error(e.to_string()))?,
                };
                (Some(package_json), path.parent().map(Path::to_path_buf))
            }
            None => (None, None),
        };

        let Some(compiler) = &config.compiler else {
            return Err(ctx.error("The \"compiler\" section is missing"));
        };

        let project_folder = resolve_project_folder(&ctx, &config, &options)?;
        debug!(project_folder = %project_folder.display(), "resolved project folder");

        let tokens = TokenContext::new(
            &project_folder,
            package_json
                .as_ref()
                .map(|p| p.name.as_str())
                .filter(|name| !name.is_empty()),
        );
        let resolve_path = |field: &str, value: Option<&str>| {
            tokens
                .resolve_path(field, value)
                .map_err(|e| ctx.error(e.to_string()))
        };

        // Entry points
        let main_entry_point_file_path =
            resolve_path("mainEntryPointFilePath", config.main_entry_point_file_path.as_deref())?
                .ok_or_else(|| ctx.error("The \"mainEntryPointFilePath\" setting is missing"))?;
        check_entry_point(
            &ctx,
            "The \"mainEntryPointFilePath\"",
            &main_entry_point_file_path,
            options.ignore_missing_entry_point,
        )?;
        let main_entry_point = EntryPoint {
            module_path: String::new(),
            file_path: main_entry_point_file_path,
        };

        let mut additional_entry_points: Vec<EntryPoint> = Vec::new();
        for entry in &config.additional_entry_points {
            let module_path = entry.module_path.trim();
            if module_path.is_empty() {
                return Err(ctx.error("An additional entry point is missing its \"modulePath\""));
            }
            if additional_entry_points
                .iter()
                .any(|existing| existing.module_path == module_path)
            {
                return Err(ctx.error(format!(
                    "The additional entry point \"{module_path}\" is specified more than once"
                )));
            }
            let file_path = resolve_path("filePath", Some(&entry.file_path))?.ok_or_else(|| {
                ctx.error(format!(
                    "The additional entry point \"{module_path}\" is missing its \"filePath\""
                ))
            })?;
            check_entry_point(
                &ctx,
                &format!("The \"filePath\" of additional entry point \"{module_path}\""),
                &file_path,
                options.ignore_missing_entry_point,
            )?;
            additional_entry_points.push(EntryPoint {
                module_path: module_path.to_string(),
                file_path,
            });
        }

        for bundled_package in &config.bundled_packages {
            if let Some(reason) = validate_package_name(bundled_package) {
                return Err(ctx.error(format!(
                    "The \"bundledPackages\" list contains an invalid package name: \"{bundled_package}\" ({reason})"
                )));
            }
        }

        // Compiler
        let tsconfig_file_path =
            resolve_path("tsconfigFilePath", compiler.tsconfig_file_path.as_deref())?;
        if compiler.override_tsconfig.is_none() {
            match &tsconfig_file_path {
                None => {
                    return Err(ctx.error(
                        "Either the \"tsconfigFilePath\" or \"overrideTsconfig\" setting must be specified",
                    ));
                }
                Some(path) if !path.exists() => {
                    return Err(ctx.error(format!(
                        "The file referenced by \"tsconfigFilePath\" does not exist: {}",
                        path.display()
                    )));
                }
                Some(_) => {}
            }
        }

        // API report
        let report = match &config.api_report {
            Some(section) => prepare_api_report(&ctx, &tokens, section, &project_folder)?,
            None => PreparedReport::disabled(&project_folder),
        };

        // Doc model
        let doc_model = config.doc_model.clone().unwrap_or_default();
        let api_json_file_path =
            resolve_path("apiJsonFilePath", doc_model.api_json_file_path.as_deref())?;
        if doc_model.enabled && api_json_file_path.is_none() {
            return Err(ctx.error(
                "The \"docModel.enabled\" setting is enabled, but \"apiJsonFilePath\" is not specified",
            ));
        }
        let release_tags_to_trim = match &doc_model.release_tags_to_trim {
            Some(names) => names
                .iter()
                .map(|name| {
                    ReleaseTag::from_tag_name(name.trim()).ok_or_else(|| {
                        ctx.error(format!(
                            "The \"releaseTagsToTrim\" setting contains an unrecognized release tag \"{name}\""
                        ))
                    })
                })
                .collect::<Result<BTreeSet<_>>>()?,
            None => BTreeSet::from([ReleaseTag::Internal]),
        };

        // Metadata
        let metadata = config.tsdoc_metadata.clone().unwrap_or_default();
        let tsdoc_metadata_file_path = if metadata.enabled {
            let value = metadata.tsdoc_metadata_file_path.as_deref().unwrap_or_default();
            let path = if value.trim() == LOOKUP_TOKEN {
                let (Some(package_json), Some(package_folder)) = (&package_json, &package_folder) else {
                    return Err(ctx.error(
                        "The \"<lookup>\" token cannot be used with the \"tsdocMetadataFilePath\" setting \
                         because no package.json was found",
                    ));
                };
                Some(resolve_tsdoc_metadata_path(package_folder, package_json))
            } else {
                resolve_path("tsdocMetadataFilePath", Some(value))?
            };
            if path.is_none() {
                return Err(ctx.error(
                    "The \"tsdocMetadata.enabled\" setting is enabled, but \"tsdocMetadataFilePath\" is not specified",
                ));
            }
            path
        } else {
            None
        };

        // Rollup
        let rollup = config.dts_rollup.clone().unwrap_or_default();
        if rollup.enabled && !additional_entry_points.is_empty() {
            return Err(ctx.error(
                "The \"dtsRollup.enabled\" setting cannot be used together with \"additionalEntryPoints\"; \
                 declaration rollups support a single entry point",
            ));
        }
        let untrimmed_file_path =
            resolve_path("untrimmedFilePath", rollup.untrimmed_file_path.as_deref())?;
        let alpha_trimmed_file_path =
            resolve_path("alphaTrimmedFilePath", rollup.alpha_trimmed_file_path.as_deref())?;
        let beta_trimmed_file_path =
            resolve_path("betaTrimmedFilePath", rollup.beta_trimmed_file_path.as_deref())?;
        let public_trimmed_file_path =
            resolve_path("publicTrimmedFilePath", rollup.public_trimmed_file_path.as_deref())?;

        config.messages.validate().map_err(|message| ctx.error(message))?;

        // Loaded outside the "Error parsing" context; it reports its own file.
        let tsdoc_config = match options.tsdoc_config {
            Some(tsdoc_config) => tsdoc_config,
            None => TsdocConfig::load_for_folder(&project_folder)?,
        };

        Ok(ExtractorConfig {
            config_file_path: options.config_object_full_path,
            project_folder,
            package_json,
            package_folder,
            main_entry_point,
            additional_entry_points,
            bundled_packages: config.bundled_packages,
            tsconfig_file_path,
            override_tsconfig: compiler.override_tsconfig.clone(),
            skip_lib_check: compiler.skip_lib_check,
            api_report_enabled: report.enabled,
            report_configs: report.configs,
            report_folder: report.folder,
            report_temp_folder: report.temp_folder,
            api_report_include_forgotten_exports: report.include_forgotten_exports,
            tags_to_report: report.tags_to_report,
            doc_model_enabled: doc_model.enabled,
            api_json_file_path,
            doc_model_include_forgotten_exports: doc_model.include_forgotten_exports,
            project_folder_url: doc_model.project_folder_url,
            release_tags_to_trim,
            rollup_enabled: rollup.enabled,
            untrimmed_file_path,
            alpha_trimmed_file_path,
            beta_trimmed_file_path,
            public_trimmed_file_path,
            omit_trimming_comments: rollup.omit_trimming_comments,
            tsdoc_metadata_enabled: metadata.enabled,
            tsdoc_metadata_file_path,
            messages: config.messages,
            newline_kind: config.newline_kind.unwrap_or_default(),
            test_mode: config.test_mode,
            enum_member_order: config.enum_member_order.unwrap_or_default(),
            tsdoc_config,
        })
    }
}

fn resolve_project_folder(
    ctx: &PrepareContext,
    config: &ConfigFile,
    options: &PrepareOptions,
) -> Result<PathBuf> {
    let Some(value) = config
        .project_folder
        .as_deref()
        .filter(|v| !v.trim().is_empty())
    else {
        return Err(ctx.error("The \"projectFolder\" setting is missing"));
    };

    if value.trim() != LOOKUP_TOKEN {
        reject_tokens("projectFolder", value).map_err(|e| ctx.error(e.to_string()))?;
        let project_folder = absolute(Path::new(value));
        if !project_folder.exists() {
            return Err(ctx.error(format!(
                "The specified \"projectFolder\" path does not exist: {value}"
            )));
        }
        return Ok(project_folder);
    }

    if let Some(token) = &options.project_folder_lookup_token {
        if !token.exists() {
            return Err(ctx.error(format!(
                "The specified \"projectFolderLookupToken\" path does not exist: {}",
                token.display()
            )));
        }
        return Ok(absolute(token));
    }

    let Some(config_path) = &options.config_object_full_path else {
        return Err(ctx.error(
            "The \"projectFolder\" setting uses the \"<lookup>\" token, but it cannot be expanded because \
             the \"configObjectFullPath\" setting was not specified",
        ));
    };

    config_path
        .parent()
        .into_iter()
        .flat_map(Path::ancestors)
        .find(|folder| folder.join(TSCONFIG_FILENAME).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ctx.error(
                "The \"projectFolder\" setting uses the \"<lookup>\" token, but a tsconfig.json file cannot be \
                 found in this folder or any parent folder.",
            )
        })
}

fn check_entry_point(
    ctx: &PrepareContext,
    subject: &str,
    path: &Path,
    ignore_missing: bool,
) -> Result<()> {
    if !is_declaration_file(path) {
        return Err(ctx.error(format!(
            "{subject} value is not a declaration file: {}",
            path.display()
        )));
    }
    if !ignore_missing && !path.exists() {
        return Err(ctx.error(format!(
            "{subject} path does not exist: {}",
            path.display()
        )));
    }
    Ok(())
}

struct PreparedReport {
    enabled: bool,
    configs: Vec<ReportConfig>,
    folder: PathBuf,
    temp_folder: PathBuf,
    include_forgotten_exports: bool,
    tags_to_report: indexmap::IndexMap<String, bool>,
}

impl PreparedReport {
    fn disabled(project_folder: &Path) -> Self {
        Self {
            enabled: false,
            configs: Vec::new(),
            folder: project_folder.to_path_buf(),
            temp_folder: project_folder.to_path_buf(),
            include_forgotten_exports: false,
            tags_to_report: tags_to_report_with_defaults(&Default::default()),
        }
    }
}

fn prepare_api_report(
    ctx: &PrepareContext,
    tokens: &TokenContext,
    section: &ApiReportSection,
    project_folder: &Path,
) -> Result<PreparedReport> {
    let file_name = tokens
        .expand("reportFileName", section.report_file_name.as_deref())
        .map_err(|e| ctx.error(e.to_string()))?;
    if file_name.is_empty() {
        return Err(ctx.error("The \"reportFileName\" setting is missing"));
    }
    if file_name.contains(['/', '\\']) {
        return Err(ctx.error(format!(
            "The \"reportFileName\" setting contains invalid characters: \"{file_name}\""
        )));
    }
    // Older configurations spell out the suffix.
    let base_name = file_name
        .strip_suffix(REPORT_FILE_SUFFIX)
        .unwrap_or(&file_name);

    let mut variants: Vec<ReportVariant> = Vec::new();
    for variant in section
        .report_variants
        .clone()
        .unwrap_or_else(|| vec![ReportVariant::Complete])
    {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    if section.enabled && variants.is_empty() {
        return Err(ctx.error("The \"reportVariants\" setting must list at least one variant"));
    }

    let violations = validate_tags_to_report(&section.tags_to_report);
    if !violations.is_empty() {
        return Err(ctx.invalid_tags(violations));
    }

    let folder = tokens
        .resolve_path("reportFolder", section.report_folder.as_deref())
        .map_err(|e| ctx.error(e.to_string()))?
        .unwrap_or_else(|| project_folder.to_path_buf());
    let temp_folder = tokens
        .resolve_path("reportTempFolder", section.report_temp_folder.as_deref())
        .map_err(|e| ctx.error(e.to_string()))?
        .unwrap_or_else(|| project_folder.to_path_buf());

    Ok(PreparedReport {
        enabled: section.enabled,
        configs: variants
            .into_iter()
            .map(|variant| ReportConfig::new(base_name, variant))
            .collect(),
        folder,
        temp_folder,
        include_forgotten_exports: section.include_forgotten_exports,
        tags_to_report: tags_to_report_with_defaults(&section.tags_to_report),
    })
}
