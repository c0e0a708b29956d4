use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, iter, process};

use anyhow::anyhow;

use patchset::logger;
use patchset_cli::commands::*;
use patchset_cli::terminal as term;

pub const NAME: &str = "patchset";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Patch set sequencing for code review changes";
pub const GIT_HEAD: &str = env!("GIT_HEAD");

pub const USAGE: &str = r#"
Usage

    patchset [<option>...] <command> [<arg>...]

Commands

    list            List the patch sets of a change, newest first
    latest          Show the latest patch set of a change
    check           Check a change for updates

Options

    --config <path> Configuration file (default: $PATCHSET_CONFIG)
    --verbose, -v   Log debug output to stderr
    --version       Print version
    --help          Print help
"#;

#[derive(Debug)]
enum Command {
    Other(Vec<OsString>),
    Help,
    Version,
}

#[derive(Debug)]
struct Options {
    command: Command,
    config: Option<PathBuf>,
    verbose: bool,
}

fn main() {
    match parse_args().map_err(Some).and_then(run) {
        Ok(_) => process::exit(0),
        Err(err) => {
            if let Some(err) = err {
                term::io::error(format!("patchset: {err}"));
            }
            process::exit(1);
        }
    }
}

fn parse_args() -> anyhow::Result<Options> {
    use lexopt::prelude::*;

    let mut parser = lexopt::Parser::from_env();
    let mut command = None;
    let mut config = None;
    let mut verbose = false;

    while let Some(arg) = parser.next()? {
        match arg {
            Long("help") | Short('h') => {
                command = Some(Command::Help);
            }
            Long("version") => {
                command = Some(Command::Version);
            }
            Long("verbose") | Short('v') => {
                verbose = true;
            }
            Long("config") => {
                config = Some(PathBuf::from(parser.value()?));
            }
            Value(val) if command.is_none() => {
                let args = iter::once(val)
                    .chain(iter::from_fn(|| parser.value().ok()))
                    .collect();

                command = Some(Command::Other(args))
            }
            _ => return Err(anyhow!(arg.unexpected())),
        }
    }

    Ok(Options {
        command: command.unwrap_or_else(|| Command::Other(vec![])),
        config,
        verbose,
    })
}

fn print_version(mut w: impl std::io::Write) -> anyhow::Result<()> {
    if VERSION.contains("-dev") {
        writeln!(w, "{NAME} {VERSION}+{GIT_HEAD}")?;
    } else {
        writeln!(w, "{NAME} {VERSION} ({GIT_HEAD})")?;
    }
    Ok(())
}

fn print_help() -> anyhow::Result<()> {
    print_version(&mut io::stdout())?;
    println!("{DESCRIPTION}");
    println!("{USAGE}");

    Ok(())
}

fn run(options: Options) -> Result<(), Option<anyhow::Error>> {
    let level = if options.verbose {
        log::Level::Debug
    } else {
        logger::env_level().unwrap_or(log::Level::Warn)
    };
    logger::set(logger::StderrLogger::new(level), level).ok();

    match options.command {
        Command::Version => {
            print_version(&mut io::stdout())?;
        }
        Command::Help => {
            print_help()?;
        }
        Command::Other(args) => {
            let exe = args.first();
            let ctx = term::DefaultContext {
                config: options.config,
            };

            if let Some(Some(exe)) = exe.map(|s| s.to_str()) {
                run_other(exe, &args[1..], ctx)?;
            } else {
                print_help()?;
            }
        }
    }

    Ok(())
}

fn run_other(
    exe: &str,
    args: &[OsString],
    ctx: term::DefaultContext,
) -> Result<(), Option<anyhow::Error>> {
    match exe {
        "list" => {
            term::run_command_args::<patchset_list::Options, _>(
                patchset_list::HELP,
                patchset_list::run,
                args.to_vec(),
                ctx,
            );
        }
        "latest" => {
            term::run_command_args::<patchset_latest::Options, _>(
                patchset_latest::HELP,
                patchset_latest::run,
                args.to_vec(),
                ctx,
            );
        }
        "check" => {
            term::run_command_args::<patchset_check::Options, _>(
                patchset_check::HELP,
                patchset_check::run,
                args.to_vec(),
                ctx,
            );
        }
        "help" => {
            print_help()?;
        }
        other => {
            return Err(Some(anyhow!(
                "'{other}' is not a command, see `patchset --help`"
            )));
        }
    }
    Ok(())
}
