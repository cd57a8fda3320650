//! CLI routing and command dispatch.

use crate::constants;
use crate::core::config::StoreConfig;
use crate::core::paths::RosterPaths;
use crate::core::store::{PersonnelStore, StoreState};
use crate::util::fs as store_fs;
use anyhow::{bail, Context, Result};
use clap::{ArgAction, ArgGroup, CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

pub mod personnel;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: RosterPaths,
    pub store: PersonnelStore,
    pub assume_yes: bool,
    pub admin_pin_stdin: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "pinroster",
    version,
    about = "PIN-guarded personnel roster for shared-space equipment"
)]
#[command(group(
    ArgGroup::new("command")
        .args(["add", "update", "remove", "list", "check", "repair", "reset"])
        .multiple(false)
))]
pub struct Cli {
    /// Add new personnel
    #[arg(
        short = 'a',
        long,
        num_args = 2,
        value_names = ["NAME", "PIN"],
        allow_hyphen_values = true
    )]
    pub add: Option<Vec<String>>,

    /// Update a personnel's PIN
    #[arg(
        short = 'u',
        long,
        num_args = 2,
        value_names = ["NAME", "NEW_PIN"],
        allow_hyphen_values = true
    )]
    pub update: Option<Vec<String>>,

    /// Remove a personnel
    #[arg(short = 'r', long, value_name = "NAME")]
    pub remove: Option<String>,

    /// List all personnel
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Check that the listing file matches the record file
    #[arg(long)]
    pub check: bool,

    /// Rebuild the listing file from the record file
    #[arg(long)]
    pub repair: bool,

    /// Erase all personnel information (debug only)
    #[arg(long, hide = true)]
    pub reset: bool,

    /// Store directory (default: nearest directory holding a roster, else cwd)
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Output format for --list
    #[arg(long, value_enum, default_value_t = ListFormat::Plain)]
    pub format: ListFormat,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Read the admin PIN from the first line of stdin instead of prompting
    #[arg(long)]
    pub admin_pin_stdin: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Plain,
    Table,
    Json,
}

/// The single action selected by the flags.
enum Action {
    Add { name: String, pin: String },
    Update { name: String, pin: String },
    Remove { name: String },
    List,
    Check,
    Repair,
    Reset,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose)?;

        let paths = RosterPaths::resolve(self.root.clone())?;
        let config = StoreConfig::load(&paths)?;
        let format = self.format;
        let action = self.action();

        let ctx = CliContext {
            store: PersonnelStore::new(config),
            paths,
            assume_yes: self.yes,
            admin_pin_stdin: self.admin_pin_stdin,
        };

        // Reset, check and repair also work on a missing or half-written store.
        let needs_store = !matches!(
            action,
            Some(Action::Reset | Action::Check | Action::Repair)
        );
        if needs_store && prepare_store(&ctx)? == StoreState::Empty {
            return personnel::run_bootstrap(&ctx);
        }
        if matches!(action, Some(Action::Reset | Action::Repair)) {
            require_store_dir(&ctx.paths)?;
        }

        match action {
            Some(Action::Add { name, pin }) => personnel::run_add(&ctx, &name, pin),
            Some(Action::Update { name, pin }) => personnel::run_update(&ctx, &name, pin),
            Some(Action::Remove { name }) => personnel::run_remove(&ctx, &name),
            Some(Action::List) => personnel::run_list(&ctx, format),
            Some(Action::Check) => personnel::run_check(&ctx),
            Some(Action::Repair) => personnel::run_repair(&ctx),
            Some(Action::Reset) => personnel::run_reset(&ctx),
            None => {
                Cli::command().print_help().context("print help")?;
                Ok(())
            }
        }
    }

    fn action(&self) -> Option<Action> {
        if let Some([name, pin]) = self.add.as_deref() {
            return Some(Action::Add {
                name: name.clone(),
                pin: pin.clone(),
            });
        }
        if let Some([name, pin]) = self.update.as_deref() {
            return Some(Action::Update {
                name: name.clone(),
                pin: pin.clone(),
            });
        }
        if let Some(name) = &self.remove {
            return Some(Action::Remove { name: name.clone() });
        }
        if self.list {
            return Some(Action::List);
        }
        if self.check {
            return Some(Action::Check);
        }
        if self.repair {
            return Some(Action::Repair);
        }
        if self.reset {
            return Some(Action::Reset);
        }
        None
    }
}

/// Make sure the store directory exists and the store is usable.
fn prepare_store(ctx: &CliContext) -> Result<StoreState> {
    store_fs::ensure_dir(&ctx.paths.root, constants::STORE_DIR_MODE)
        .with_context(|| format!("create store directory {}", ctx.paths.root.display()))?;
    let state = ctx.store.state()?;
    if state == StoreState::Partial {
        bail!(
            "{} is incomplete: one of the store files is missing (see --check, --repair)",
            ctx.paths
        );
    }
    Ok(state)
}

/// Reset and repair take the roster lock, which lives in the store directory.
fn require_store_dir(paths: &RosterPaths) -> Result<()> {
    if !paths.root.is_dir() {
        bail!("no store at {}", paths.root.display());
    }
    Ok(())
}

/// Log to stderr. The level comes from `-v` only.
fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_new(format!("pinroster={}", level))
        .context("build log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install logger: {}", e))
}
