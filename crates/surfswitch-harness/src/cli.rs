use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use surfswitch_runtime::{HarnessConfig, HarnessError, UnsupportedRendererPolicy};

use crate::error::{CliError, Result};
use crate::script::{DEFAULT_SCRIPT, Script};
use crate::session::{Pacing, RunOptions, ScriptRunner};
use crate::signals::StopOnSignal;

#[derive(Debug, Parser)]
#[command(
    name = "surfswitch-harness",
    about = "Drive a headless surfswitch session from a script",
    version
)]
pub struct Cli {
    /// Harness config (.toml or .json).
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Script file, one step per line.
    #[arg(long, short, conflicts_with = "exec")]
    pub script: Option<PathBuf>,

    /// Inline script, steps separated by `;`.
    #[arg(long, short = 'e')]
    pub exec: Option<String>,

    /// Refresh rate.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub fps: u32,

    /// Space refreshes in real time and stamp them with the system clock.
    #[arg(long)]
    pub realtime: bool,

    /// Make the renderer fail its capability probe.
    #[arg(long)]
    pub unsupported_renderer: bool,

    /// Override the config's unsupported-renderer policy.
    #[arg(long, value_enum)]
    pub on_unsupported: Option<PolicyArg>,

    /// Print the run summary (or error) as JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the effective config as TOML and exit.
    #[arg(long)]
    pub print_config: bool,

    /// More logging (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Degrade,
    Abort,
}

impl From<PolicyArg> for UnsupportedRendererPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Degrade => Self::Degrade,
            PolicyArg::Abort => Self::Abort,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn load_config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_file(path).map_err(HarnessError::from)?,
            None => HarnessConfig::default(),
        };
        if let Some(policy) = self.on_unsupported {
            config.unsupported_renderer = policy.into();
        }
        Ok(config)
    }

    pub fn load_script(&self) -> Result<Script> {
        if let Some(path) = &self.script {
            let source = std::fs::read_to_string(path).map_err(|source| CliError::ReadScript {
                path: path.clone(),
                source,
            })?;
            return Ok(Script::parse(&source)?);
        }
        Ok(Script::parse(self.exec.as_deref().unwrap_or(DEFAULT_SCRIPT))?)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            pacing: Pacing::from_fps(self.fps, self.realtime),
            unsupported_renderer: self.unsupported_renderer,
        }
    }
}

/// Run the command and return what to print on stdout.
pub fn execute(cli: &Cli) -> Result<String> {
    let config = cli.load_config()?;
    if cli.print_config {
        return Ok(config.to_toml_string().map_err(HarnessError::from)?);
    }
    let script = cli.load_script()?;
    tracing::info!(steps = script.len(), fps = cli.fps, realtime = cli.realtime, "running script");

    let mut runner = ScriptRunner::new(config, cli.run_options())?;
    // Simulated runs never sleep, so only paced runs listen for signals.
    let guard = if cli.realtime {
        match StopOnSignal::install(runner.harness().stop_source()) {
            Ok(guard) => Some(guard),
            Err(error) => {
                tracing::warn!(%error, "could not install signal handler");
                None
            }
        }
    } else {
        None
    };
    let result = runner.run(&script);
    drop(guard);
    let summary = runner.finish();
    result?;

    Ok(if cli.json {
        format!("{}\n", summary.to_json())
    } else {
        summary.to_string()
    })
}
