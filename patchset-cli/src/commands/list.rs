use std::ffi::OsString;
use std::path::PathBuf;

use patchset::{Change, PatchSet};

use crate::terminal as term;
use crate::terminal::args::{Args, Error, Help};

pub const HELP: Help = Help {
    name: "list",
    description: "List the patch sets of a change, newest first",
    version: env!("CARGO_PKG_VERSION"),
    usage: r#"
Usage

    patchset list <change.json> [<option>...]

    Reads a change record and lists its patch sets in sequence, including
    the edit, if any. The work in progress state of each patch set is
    derived from the change's message log.

Options

    --json          Output patch sets as JSON
    --help          Print help
"#,
};

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub path: PathBuf,
    pub json: bool,
}

impl Args for Options {
    fn from_args(args: Vec<OsString>) -> anyhow::Result<(Self, Vec<OsString>)> {
        use lexopt::prelude::*;

        let mut parser = lexopt::Parser::from_args(args);
        let mut path = None;
        let mut json = false;

        while let Some(arg) = parser.next()? {
            match arg {
                Long("help") | Short('h') => {
                    return Err(Error::Help.into());
                }
                Long("json") => json = true,
                Value(val) if path.is_none() => path = Some(PathBuf::from(val)),
                _ => return Err(anyhow::anyhow!(arg.unexpected())),
            }
        }

        Ok((
            Options {
                path: path.ok_or(Error::Usage)?,
                json,
            },
            vec![],
        ))
    }
}

pub fn run(options: Options, ctx: impl term::Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let change = Change::load(&options.path)?;
    let patch_sets = change.patch_sets(&config.wip);

    if options.json {
        term::io::print(serde_json::to_string_pretty(&patch_sets)?);
        return Ok(());
    }
    if patch_sets.is_empty() {
        term::io::warning(format!("change {} has no patch sets", change.id));
    }
    for row in rows(&patch_sets) {
        term::io::print(row.join(" "));
    }
    Ok(())
}

/// Table rows of sequenced patch sets.
pub fn rows(patch_sets: &[PatchSet]) -> Vec<[String; 4]> {
    let width = patch_sets
        .iter()
        .map(|ps| ps.num.to_string().len())
        .max()
        .unwrap_or_default();

    patch_sets
        .iter()
        .map(|ps| {
            [
                term::format::num(ps, width).to_string(),
                term::format::sha(&ps.sha).to_string(),
                term::format::wip(ps, 5).to_string(),
                ps.desc.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use pretty_assertions::assert_eq;

    use patchset::test::fixtures;
    use patchset::wip::Markers;

    use super::*;

    #[test]
    fn test_options() {
        let (opts, rest) =
            Options::from_args(vec!["change.json".into(), "--json".into()]).unwrap();

        assert_eq!(
            opts,
            Options {
                path: PathBuf::from("change.json"),
                json: true
            }
        );
        assert!(rest.is_empty());
        assert!(matches!(
            Options::from_args(vec![]).unwrap_err().downcast_ref::<Error>(),
            Some(Error::Usage)
        ));
        assert!(Options::from_args(vec!["a".into(), "b".into()]).is_err());
    }

    #[test]
    fn test_rows() {
        colored::control::set_override(false);

        let change = Change::from_json(fixtures::CHANGE_WITH_EDIT).unwrap();
        let rows = rows(&change.patch_sets(&Markers::default()));

        assert_eq!(
            rows,
            vec![
                [
                    "   3".to_owned(),
                    "c300000".to_owned(),
                    "wip  ".to_owned(),
                    String::new()
                ],
                [
                    "edit".to_owned(),
                    "ed17000".to_owned(),
                    "-    ".to_owned(),
                    String::new()
                ],
                [
                    "   2".to_owned(),
                    "b200000".to_owned(),
                    "ready".to_owned(),
                    "Address comments".to_owned()
                ],
                [
                    "   1".to_owned(),
                    "a100000".to_owned(),
                    "wip  ".to_owned(),
                    "Initial upload".to_owned()
                ],
            ]
        );
    }

    #[test]
    fn test_run() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("change.json");
        std::fs::write(&path, fixtures::CHANGE_WITH_EDIT).unwrap();

        run(
            Options { path, json: true },
            patchset::Config::default(),
        )
        .unwrap();
    }
}
