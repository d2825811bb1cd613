use std::{
    fmt,
    path::{Path, PathBuf},
};

use apisurface_config::{DefaultConfig, ExtractorConfig};
use apisurface_host::{AnalysisState, AnalysisStateOptions};
use eyre::{Context, Result};
use tracing::{info, instrument};

use crate::{
    ExtractorMessage, InvocationContext, InvocationFlags, MessageCallback, MessageRouter,
    Pipeline, Toolchain,
};

/// Options for [`Extractor::invoke`].
#[derive(Default)]
pub struct InvokeOptions {
    /// A previously built analysis state to reuse instead of building one.
    pub analysis_state: Option<AnalysisState>,
    /// Write the doc model without indentation.
    pub doc_model_minify: bool,
    /// Update drifted API reports in place and tolerate warnings.
    pub local_build: bool,
    /// Sees every message before default display; may change its level or
    /// mark it handled.
    pub message_callback: Option<MessageCallback>,
    /// Print the resolved configuration and compiler options. Implies
    /// verbose output.
    pub show_diagnostics: bool,
    pub show_verbose_messages: bool,
    /// An alternate engine installation whose `lib` folder is used.
    pub typescript_compiler_folder: Option<PathBuf>,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analysis_state(mut self, state: AnalysisState) -> Self {
        self.analysis_state = Some(state);
        self
    }

    pub fn doc_model_minify(mut self, minify: bool) -> Self {
        self.doc_model_minify = minify;
        self
    }

    pub fn local_build(mut self, local_build: bool) -> Self {
        self.local_build = local_build;
        self
    }

    pub fn message_callback(mut self, callback: impl FnMut(&mut ExtractorMessage) + Send + 'static) -> Self {
        self.message_callback = Some(Box::new(callback));
        self
    }

    pub fn show_diagnostics(mut self, show: bool) -> Self {
        self.show_diagnostics = show;
        self
    }

    pub fn show_verbose_messages(mut self, show: bool) -> Self {
        self.show_verbose_messages = show;
        self
    }

    pub fn typescript_compiler_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.typescript_compiler_folder = Some(folder.into());
        self
    }
}

impl fmt::Debug for InvokeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeOptions")
            .field("analysis_state", &self.analysis_state)
            .field("doc_model_minify", &self.doc_model_minify)
            .field("local_build", &self.local_build)
            .field("message_callback", &self.message_callback.is_some())
            .field("show_diagnostics", &self.show_diagnostics)
            .field("show_verbose_messages", &self.show_verbose_messages)
            .field("typescript_compiler_folder", &self.typescript_compiler_folder)
            .finish()
    }
}

/// The outcome of one invocation.
#[derive(Debug, Clone)]
pub struct ExtractorResult {
    analysis_state: AnalysisState,
    config: ExtractorConfig,
    succeeded: bool,
    api_report_changed: bool,
    error_count: usize,
    warning_count: usize,
}

impl ExtractorResult {
    /// The analysis state used; it may be passed to a later invocation.
    pub fn analysis_state(&self) -> &AnalysisState {
        &self.analysis_state
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// No errors, and for non-local builds no warnings either.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Some API report differed from its baseline or had none.
    pub fn api_report_changed(&self) -> bool {
        self.api_report_changed
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }
}

/// Entry points for running an extraction.
pub struct Extractor;

impl Extractor {
    /// Package name recorded in generated files.
    pub fn package_name() -> &'static str {
        "apisurface"
    }

    /// Version recorded in generated files.
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Load and prepare the configuration at `config_path`, then invoke.
    pub fn load_config_and_invoke<T: Toolchain>(
        config_path: &Path,
        defaults: &DefaultConfig,
        toolchain: &T,
        options: InvokeOptions,
    ) -> Result<ExtractorResult> {
        let config = ExtractorConfig::load_file_and_prepare(config_path, defaults)?;
        Self::invoke(config, toolchain, options)
    }

    /// Run the pipeline for a prepared configuration.
    #[instrument(skip_all, fields(project = %config.project_folder().display()))]
    pub fn invoke<T: Toolchain>(
        config: ExtractorConfig,
        toolchain: &T,
        mut options: InvokeOptions,
    ) -> Result<ExtractorResult> {
        let analysis_state = match options.analysis_state.take() {
            Some(state) => state,
            None => {
                let state_options = AnalysisStateOptions {
                    typescript_compiler_folder: options.typescript_compiler_folder.clone(),
                    ..Default::default()
                };
                AnalysisState::create(&config, toolchain.engine(), &state_options)
                    .wrap_err("Unable to create the analysis program")?
            }
        };

        let router = MessageRouter::new(config.messages())
            .with_working_package_folder(config.package_folder().map(Path::to_path_buf))
            .with_callback(options.message_callback.take())
            .with_display(options.show_verbose_messages, options.show_diagnostics);
        let flags = InvocationFlags {
            local_build: options.local_build,
            doc_model_minify: options.doc_model_minify,
        };

        let (succeeded, api_report_changed, error_count, warning_count) = {
            let mut ctx = InvocationContext::new(&config, &analysis_state, toolchain, flags, router);
            Pipeline::new().run(&mut ctx)?;
            (
                ctx.succeeded(),
                ctx.api_report_changed,
                ctx.router.error_count(),
                ctx.router.warning_count(),
            )
        };
        info!(succeeded, api_report_changed, error_count, warning_count, "extraction finished");

        Ok(ExtractorResult {
            analysis_state,
            config,
            succeeded,
            api_report_changed,
            error_count,
            warning_count,
        })
    }
}
