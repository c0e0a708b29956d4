use std::ffi::OsString;
use std::path::PathBuf;

use patchset::{sequence, Change, PatchNum};

use crate::terminal as term;
use crate::terminal::args::{Args, Error, Help};

pub const HELP: Help = Help {
    name: "latest",
    description: "Show the latest patch set of a change",
    version: env!("CARGO_PKG_VERSION"),
    usage: r#"
Usage

    patchset latest <change.json> [<option>...]

    Prints the number of the latest uploaded patch set, and whether the
    change has an edit based on it.

Options

    --help          Print help
"#,
};

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub path: PathBuf,
}

impl Args for Options {
    fn from_args(args: Vec<OsString>) -> anyhow::Result<(Self, Vec<OsString>)> {
        use lexopt::prelude::*;

        let mut parser = lexopt::Parser::from_args(args);
        let mut path = None;

        while let Some(arg) = parser.next()? {
            match arg {
                Long("help") | Short('h') => {
                    return Err(Error::Help.into());
                }
                Value(val) if path.is_none() => path = Some(PathBuf::from(val)),
                _ => return Err(anyhow::anyhow!(arg.unexpected())),
            }
        }

        Ok((
            Options {
                path: path.ok_or(Error::Usage)?,
            },
            vec![],
        ))
    }
}

/// Latest patch set of a change, and whether the edit is based on it.
#[derive(Debug, PartialEq, Eq)]
pub struct Latest {
    pub num: PatchNum,
    pub edit_on_current: bool,
}

impl Latest {
    pub fn of(change: &Change) -> anyhow::Result<Self> {
        let patch_sets = sequence::sequence(Some(change));
        let num = sequence::latest_patch_num(&patch_sets)
            .ok_or_else(|| anyhow::anyhow!("change {} has no patch sets", change.id))?;

        Ok(Self {
            num,
            edit_on_current: sequence::has_edit_based_on_current(&patch_sets),
        })
    }
}

pub fn run(options: Options, _ctx: impl term::Context) -> anyhow::Result<()> {
    let change = Change::load(&options.path)?;
    let latest = Latest::of(&change)?;

    if latest.edit_on_current {
        term::io::print(format!("{} (edit)", latest.num));
    } else {
        term::io::print(latest.num);
    }
    Ok(())
}
