//! autoflake plugin: removes unused imports and variables from Python code.
//!
//! `lint` runs autoflake in check mode and reports each diff hunk it prints;
//! `format` runs it with `--in-place`.

pub mod command;
pub mod setting;

pub use command::{build_args, parse_file_path, AutoflakeCommand, AUTOFLAKE_BIN};
pub use setting::AutoflakeSetting;

use crate::error::{Error, Result};
use crate::host::{Component, LintCommand, PathContext, Plugin, PluginConfig, Target};
use crate::source::Source;
use std::path::Path;
use tracing::{debug, info};

const TARGETS: [Target; 2] = [Target::Lint, Target::Format];

/// Plugin discovery entry point.
pub fn plugin() -> Box<dyn Plugin> {
    Box::new(AutoflakePlugin::default())
}

#[derive(Debug, Default)]
pub struct AutoflakePlugin {
    program: Option<String>,
}

impl AutoflakePlugin {
    /// Run a specific executable instead of `autoflake` from `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }
}

impl Plugin for AutoflakePlugin {
    fn load(&self, config_path: &Path, config: &PluginConfig) -> Result<Vec<Box<dyn Component>>> {
        let table = config
            .config
            .clone()
            .ok_or_else(|| Error::MissingPluginConfig {
                location: config.location.clone(),
            })?;
        let setting = AutoflakeSetting::from_table(table, &config.location)?;
        debug!(config = %config_path.display(), ?setting, "Loaded autoflake setting");

        let source = Source::new(
            setting.includes.clone(),
            setting.excludes.clone(),
            setting.include_globs.clone(),
            setting.exclude_globs.clone(),
        );
        let mut component = Autoflake::new(AUTOFLAKE_BIN, Some(setting), Some(source));
        component.program = self.program.clone();
        debug!(includes = ?component.source().includes(), "Resolved autoflake sources");
        let component: Box<dyn Component> = Box::new(component);
        Ok(vec![component])
    }
}

/// The autoflake component as seen by the host.
#[derive(Debug, Clone)]
pub struct Autoflake {
    name: String,
    setting: AutoflakeSetting,
    source: Source,
    program: Option<String>,
}

impl Default for Autoflake {
    fn default() -> Self {
        Self::new(AUTOFLAKE_BIN, None, None)
    }
}

impl Autoflake {
    pub fn new(name: &str, setting: Option<AutoflakeSetting>, source: Option<Source>) -> Self {
        Self {
            name: name.to_string(),
            setting: setting.unwrap_or_default(),
            source: source.unwrap_or_default(),
            program: None,
        }
    }

    pub fn setting(&self) -> &AutoflakeSetting {
        &self.setting
    }

    pub fn set_setting(&mut self, setting: AutoflakeSetting) {
        self.setting = setting;
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    fn build_command(&self, target: Target, paths: &PathContext) -> AutoflakeCommand {
        let in_place = match target {
            Target::Lint => false,
            Target::Format => true,
        };
        let cmd = AutoflakeCommand::new(
            &self.name,
            paths,
            self.source.clone(),
            self.setting.clone(),
            in_place,
        );
        match &self.program {
            Some(p) => cmd.with_program(p.clone()),
            None => cmd,
        }
    }
}

impl Component for Autoflake {
    fn name(&self) -> &str {
        &self.name
    }

    fn targets(&self) -> &[Target] {
        &TARGETS
    }

    fn export_setting(&self, _paths: &PathContext) -> Result<()> {
        info!("Called export_setting at {}: do nothing", self.name);
        Ok(())
    }

    fn create_command(&self, target: Target, paths: &PathContext) -> Box<dyn LintCommand> {
        Box::new(self.build_command(target, paths))
    }
}
