use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::report::NamingRules;

/// Config file names probed in the project root, first hit wins
const CONFIG_FILES: [&str; 4] = ["ffdev.toml", "ffdev.yaml", "ffdev.json", ".ffdev.toml"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Extra ignore globs applied when listing source files
    pub ignore_patterns: Vec<String>,

    /// Go source conventions
    pub source: SourceConfig,

    /// Version bump and release-notes settings
    pub release: ReleaseConfig,

    /// Theme manifest listing
    pub themes: ThemesConfig,

    /// Formatter run after moving a function
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig
{
    pub extension: String,
    pub test_suffix: String,
    pub test_prefix: String,
    pub reserved_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig
{
    /// Prints the current `major.minor.patch`; empty reads `version_file`
    pub version_command: Vec<String>,
    pub version_file: PathBuf,
    pub changelog: PathBuf,
    pub release_notes: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemesConfig
{
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig
{
    /// Program and arguments; empty disables formatting
    pub command: Vec<String>,
}

impl Default for SourceConfig
{
    fn default() -> Self
    {
        let rules = NamingRules::default();
        Self {
            extension: "go".to_string(),
            test_suffix: "_test.go".to_string(),
            test_prefix: rules.test_prefix,
            reserved_names: rules.reserved,
        }
    }
}

impl Default for ReleaseConfig
{
    fn default() -> Self
    {
        Self {
            version_command: vec!["ffcss".to_string(), "version".to_string()],
            version_file: PathBuf::from("ffcss.go"),
            changelog: PathBuf::from("CHANGELOG.md"),
            release_notes: PathBuf::from("release_notes.md"),
        }
    }
}

impl Default for ThemesConfig
{
    fn default() -> Self
    {
        Self { dir: PathBuf::from("themes") }
    }
}

impl Default for FormatConfig
{
    fn default() -> Self
    {
        Self { command: vec!["make".to_string(), "format".to_string()] }
    }
}

impl SourceConfig
{
    /// Naming rules for the test cross-reference
    pub fn naming_rules(&self) -> NamingRules
    {
        NamingRules {
            test_prefix: self
                .test_prefix
                .clone(),
            reserved: self
                .reserved_names
                .clone(),
        }
    }
}

/// Load configuration for the project rooted at `root`.
///
/// Sources, lowest priority first: built-in defaults, the first config file
/// found in `root`, then `FFDEV_*` environment variables (nested keys use a
/// double underscore, e.g. `FFDEV_SOURCE__TEST_PREFIX`).
pub fn load_config(root: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in &CONFIG_FILES
    {
        let path = root.join(name);
        if path.exists()
        {
            tracing::debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("FFDEV")
            .prefix_separator("_")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = ctx
        .root
        .join("ffdev.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        println!("{toml_string}");
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
