//! Configuration primitives and loader for markdown-outline.
//!
//! Settings resolve through the stack
//! override flag → working directory → git root → built-in defaults,
//! merged field by field. Parsed values are validated and normalised into
//! typed structures so downstream crates never touch raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".markdown-outline.toml";

const DEFAULT_TOC_MARKER: &str = "<!-- Table of contents -->";
const DEFAULT_TITLE: &str = "Title";
const MAX_HEADER_LEVEL: u8 = 6;

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub scan: ScanSettings,
    pub toc: TocSettings,
    pub sources: ConfigSources,
}

/// Which Markdown files under a scanned root are processed.
#[derive(Clone, Debug, Default)]
pub struct ScanSettings {
    pub include: PatternList,
    pub exclude: PatternList,
}

impl ScanSettings {
    /// Decide whether `relative` (a path relative to the scanned root) is in scope.
    /// An empty include list selects everything.
    pub fn is_selected(&self, relative: &Path) -> bool {
        if self.exclude.is_match(relative) {
            return false;
        }
        self.include.is_empty() || self.include.is_match(relative)
    }
}

/// Settings for TOC generation and placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocSettings {
    pub marker: String,
    pub skip_first_heading: bool,
    pub default_title: String,
    pub max_level: u8,
}

/// Pattern plus compiled matcher.
#[derive(Clone, Debug)]
pub struct Pattern {
    original: String,
    matcher: GlobMatcher,
}

impl Pattern {
    fn new(source: &ConfigSource, value: String) -> Result<Self, ConfigValidationError> {
        match Glob::new(&value) {
            Ok(glob) => Ok(Pattern {
                matcher: glob.compile_matcher(),
                original: value,
            }),
            Err(err) => Err(ConfigValidationError::new(
                Some(source.clone()),
                format!("invalid glob pattern '{value}': {err}"),
            )),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.matcher.is_match(path)
    }
}

/// Ordered list of glob patterns.
#[derive(Clone, Debug, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    fn new(patterns: Vec<Pattern>) -> Self {
        PatternList { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn default_layer() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default_layer();
        let mut merged = defaults_layer(&default_source);
        let mut source_layers = vec![default_source];

        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, &source)?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, &source)?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, &source)?);
            source_layers.push(source);
        }

        let (scan, toc) = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            scan,
            toc,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Built-in defaults without consulting the filesystem.
    pub fn builtin() -> Self {
        let source = ConfigSource::default_layer();
        let (scan, toc) = defaults_layer(&source)
            .finalize()
            .unwrap_or_else(|err| panic!("built-in defaults failed validation: {err}"));
        Config {
            scan,
            toc,
            sources: ConfigSources {
                working_directory: PathBuf::from("."),
                layers: vec![source],
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builtin()
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: &ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: &ConfigSource) -> PartialConfig {
    PartialConfig {
        include: Some(Located::new(Vec::new(), source.clone())),
        exclude: Some(Located::new(Vec::new(), source.clone())),
        marker: Some(Located::new(DEFAULT_TOC_MARKER.into(), source.clone())),
        skip_first_heading: Some(Located::new(false, source.clone())),
        default_title: Some(Located::new(DEFAULT_TITLE.into(), source.clone())),
        max_level: Some(Located::new(MAX_HEADER_LEVEL, source.clone())),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    include: Option<Located<Vec<String>>>,
    exclude: Option<Located<Vec<String>>>,
    marker: Option<Located<String>>,
    skip_first_heading: Option<Located<bool>>,
    default_title: Option<Located<String>>,
    max_level: Option<Located<u8>>,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        if other.include.is_some() {
            self.include = other.include;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
        if other.marker.is_some() {
            self.marker = other.marker;
        }
        if other.skip_first_heading.is_some() {
            self.skip_first_heading = other.skip_first_heading;
        }
        if other.default_title.is_some() {
            self.default_title = other.default_title;
        }
        if other.max_level.is_some() {
            self.max_level = other.max_level;
        }
    }

    fn finalize(self) -> Result<(ScanSettings, TocSettings), ConfigValidationErrors> {
        let mut errors = Vec::new();
        let fallback = ConfigSource::default_layer;

        let include = compile_patterns(
            self.include
                .unwrap_or_else(|| Located::new(Vec::new(), fallback())),
            "scan.include",
            &mut errors,
        );
        let exclude = compile_patterns(
            self.exclude
                .unwrap_or_else(|| Located::new(Vec::new(), fallback())),
            "scan.exclude",
            &mut errors,
        );

        let marker = self
            .marker
            .unwrap_or_else(|| Located::new(DEFAULT_TOC_MARKER.into(), fallback()));
        validate_single_line(&marker, "toc.marker", &mut errors);

        let default_title = self
            .default_title
            .unwrap_or_else(|| Located::new(DEFAULT_TITLE.into(), fallback()));
        validate_single_line(&default_title, "toc.default_title", &mut errors);

        let max_level = self
            .max_level
            .unwrap_or_else(|| Located::new(MAX_HEADER_LEVEL, fallback()));
        if max_level.value == 0 || max_level.value > MAX_HEADER_LEVEL {
            errors.push(
                ConfigValidationError::new(
                    Some(max_level.source.clone()),
                    format!(
                        "must be between 1 and {MAX_HEADER_LEVEL} (received {})",
                        max_level.value
                    ),
                )
                .with_context("toc.max_level"),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        let scan = ScanSettings {
            include: PatternList::new(include),
            exclude: PatternList::new(exclude),
        };
        let toc = TocSettings {
            marker: marker.value.trim().to_string(),
            skip_first_heading: self
                .skip_first_heading
                .map(|located| located.value)
                .unwrap_or(false),
            default_title: default_title.value.trim().to_string(),
            max_level: max_level.value,
        };
        Ok((scan, toc))
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn compile_patterns(
    located: Located<Vec<String>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for pattern in located.value {
        match Pattern::new(&located.source, pattern) {
            Ok(compiled) => patterns.push(compiled),
            Err(err) => errors.push(err.with_context(context)),
        }
    }
    patterns
}

fn validate_single_line(
    located: &Located<String>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) {
    if located.value.trim().is_empty() {
        errors.push(
            ConfigValidationError::new(Some(located.source.clone()), "cannot be empty".into())
                .with_context(context),
        );
    } else if located.value.contains(&['\n', '\r'][..]) {
        errors.push(
            ConfigValidationError::new(
                Some(located.source.clone()),
                "must fit on a single line".into(),
            )
            .with_context(context),
        );
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    scan: Option<RawScan>,
    #[serde(default)]
    toc: Option<RawToc>,
}

#[derive(Debug, Deserialize)]
struct RawScan {
    #[serde(default)]
    include: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawToc {
    #[serde(default)]
    marker: Option<String>,
    #[serde(default)]
    skip_first_heading: Option<bool>,
    #[serde(default)]
    default_title: Option<String>,
    #[serde(default)]
    max_level: Option<u8>,
}

impl RawConfig {
    fn into_partial(self, source: &ConfigSource) -> PartialConfig {
        let mut partial = PartialConfig::default();

        if let Some(scan) = self.scan {
            partial.include = scan.include.map(|value| Located::new(value, source.clone()));
            partial.exclude = scan.exclude.map(|value| Located::new(value, source.clone()));
        }

        if let Some(toc) = self.toc {
            partial.marker = toc.marker.map(|value| Located::new(value, source.clone()));
            partial.skip_first_heading = toc
                .skip_first_heading
                .map(|value| Located::new(value, source.clone()));
            partial.default_title = toc
                .default_title
                .map(|value| Located::new(value, source.clone()));
            partial.max_level = toc
                .max_level
                .map(|value| Located::new(value, source.clone()));
        }

        partial
    }
}
