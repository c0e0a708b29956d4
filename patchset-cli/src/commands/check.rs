use std::ffi::OsString;
use std::path::PathBuf;

use patchset::updates::{self, DirSource};
use patchset::Change;

use crate::terminal as term;
use crate::terminal::args::{Args, Error, Help};

pub const HELP: Help = Help {
    name: "check",
    description: "Check a change for updates",
    version: env!("CARGO_PKG_VERSION"),
    usage: r#"
Usage

    patchset check <change.json> --remote <dir> [<option>...]

    Compares a locally known change against its current state, read from
    `<dir>/<change-number>.json`, and reports new patch sets, status
    changes and new messages.

Options

    --remote <dir>  Directory of current change records
    --json          Output updates as JSON
    --help          Print help
"#,
};

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub path: PathBuf,
    pub remote: PathBuf,
    pub json: bool,
}

impl Args for Options {
    fn from_args(args: Vec<OsString>) -> anyhow::Result<(Self, Vec<OsString>)> {
        use lexopt::prelude::*;

        let mut parser = lexopt::Parser::from_args(args);
        let mut path = None;
        let mut remote = None;
        let mut json = false;

        while let Some(arg) = parser.next()? {
            match arg {
                Long("help") | Short('h') => {
                    return Err(Error::Help.into());
                }
                Long("remote") | Short('r') => {
                    remote = Some(PathBuf::from(parser.value()?));
                }
                Long("json") => json = true,
                Value(val) if path.is_none() => path = Some(PathBuf::from(val)),
                _ => return Err(anyhow::anyhow!(arg.unexpected())),
            }
        }
        let remote = remote.ok_or_else(|| Error::WithHint {
            err: anyhow::anyhow!("a remote directory must be specified"),
            hint: "use `--remote <dir>` to point to the current change records",
        })?;

        Ok((
            Options {
                path: path.ok_or(Error::Usage)?,
                remote,
                json,
            },
            vec![],
        ))
    }
}

pub fn run(options: Options, _ctx: impl term::Context) -> anyhow::Result<()> {
    let change = Change::load(&options.path)?;
    let source = DirSource::new(options.remote);
    let rt = tokio::runtime::Builder::new_current_thread().build()?;
    let updates = rt.block_on(updates::check(&change, &source))?;

    if options.json {
        term::io::print(serde_json::to_string_pretty(&updates)?);
    } else if updates.is_stale() {
        term::io::print(format!("Change {} has {updates}", change.id));
    } else {
        term::io::success(format!("Change {} is up to date", change.id));
    }
    Ok(())
}
