// ABOUTME: Command line parsing for the swatch binary
// ABOUTME: Turns raw arguments into a Cli value with a subcommand and shared options

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

pub const USAGE: &str = "\
swatch - derive color tokens from key colors and match colors to tokens

USAGE:
    swatch [OPTIONS] <COMMAND> [SELECTION]

COMMANDS:
    derive <SELECTION>     Generate Light/Dark ramps from key color layers
    scan <SELECTION>       Match layer colors against existing tokens
    capture <SELECTION>    Store each layer as a variable (\"name -mode\")
    collections            List collections in the token store

OPTIONS:
    -c, --config <PATH>        Config file (default: <config dir>/swatchsmith/swatchsmith.toml)
    -s, --store <PATH>         Token store JSON (default: <data dir>/swatchsmith/tokens.json)
        --collection <NAME>    Target collection (default from config, created if absent)
        --json                 Print machine-readable output
    -n, --dry-run              Compute the changes without writing the store
    -v, --verbose              Increase log verbosity (repeatable)
    -h, --help                 Print this help
    -V, --version              Print version
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Derive { selection: PathBuf },
    Scan { selection: PathBuf },
    Capture { selection: PathBuf },
    Collections,
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub collection: Option<String>,
    pub json: bool,
    pub dry_run: bool,
    pub verbosity: u8,
}

impl Cli {
    pub fn from_env() -> Result<Self> {
        Self::parse(pico_args::Arguments::from_env())
    }

    pub fn from_vec(args: Vec<OsString>) -> Result<Self> {
        Self::parse(pico_args::Arguments::from_vec(args))
    }

    fn parse(mut args: pico_args::Arguments) -> Result<Self> {
        if args.contains(["-h", "--help"]) {
            return Ok(Self::bare(Command::Help));
        }
        if args.contains(["-V", "--version"]) {
            return Ok(Self::bare(Command::Version));
        }

        let mut verbosity = 0u8;
        while args.contains(["-v", "--verbose"]) {
            verbosity = verbosity.saturating_add(1);
        }
        let json = args.contains("--json");
        let dry_run = args.contains(["-n", "--dry-run"]);
        let config = args
            .opt_value_from_os_str(["-c", "--config"], parse_path)
            .context("Invalid --config")?;
        let store = args
            .opt_value_from_os_str(["-s", "--store"], parse_path)
            .context("Invalid --store")?;
        let collection: Option<String> = args
            .opt_value_from_str("--collection")
            .context("Invalid --collection")?;

        let subcommand = args.subcommand().context("Invalid command")?;
        let command = match subcommand.as_deref() {
            Some("derive") => Command::Derive {
                selection: selection_arg(&mut args)?,
            },
            Some("scan") => Command::Scan {
                selection: selection_arg(&mut args)?,
            },
            Some("capture") => Command::Capture {
                selection: selection_arg(&mut args)?,
            },
            Some("collections") => Command::Collections,
            Some(other) => bail!("Unknown command '{}'\n\n{}", other, USAGE),
            None => bail!("Missing command\n\n{}", USAGE),
        };

        let rest = args.finish();
        if !rest.is_empty() {
            bail!("Unexpected arguments: {:?}", rest);
        }

        Ok(Self {
            command,
            config,
            store,
            collection,
            json,
            dry_run,
            verbosity,
        })
    }

    fn bare(command: Command) -> Self {
        Self {
            command,
            config: None,
            store: None,
            collection: None,
            json: false,
            dry_run: false,
            verbosity: 0,
        }
    }
}

fn parse_path(s: &std::ffi::OsStr) -> Result<PathBuf, &'static str> {
    Ok(PathBuf::from(s))
}

fn selection_arg(args: &mut pico_args::Arguments) -> Result<PathBuf> {
    args.opt_free_from_os_str(parse_path)
        .context("Invalid selection path")?
        .context("Missing selection file")
}
