pub mod args;
pub use args::{Args, Error, Help};
pub mod format;
pub mod io;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use patchset::Config;

/// Context passed to all commands.
pub trait Context {
    /// Return the active configuration.
    fn config(&self) -> Result<Config, anyhow::Error>;
}

impl Context for Config {
    fn config(&self) -> Result<Config, anyhow::Error> {
        Ok(self.clone())
    }
}

/// A command that can be run.
pub trait Command<A: Args, C: Context> {
    /// Run the command, given arguments and a context.
    fn run(self, args: A, context: C) -> anyhow::Result<()>;
}

impl<F, A: Args, C: Context> Command<A, C> for F
where
    F: FnOnce(A, C) -> anyhow::Result<()>,
{
    fn run(self, args: A, context: C) -> anyhow::Result<()> {
        self(args, context)
    }
}

pub fn run_command_args<A, C>(help: Help, cmd: C, args: Vec<OsString>, ctx: DefaultContext) -> !
where
    A: Args,
    C: Command<A, DefaultContext>,
{
    let options = match A::from_args(args) {
        Ok((opts, unparsed)) => {
            if let Err(err) = args::finish(unparsed) {
                io::error(err);
                process::exit(1);
            }
            opts
        }
        Err(err) => {
            let hint = match err.downcast_ref::<Error>() {
                Some(Error::Help) => {
                    help.print();
                    process::exit(0);
                }
                Some(Error::Usage) => {
                    io::usage(help.name, help.usage);
                    process::exit(1);
                }
                Some(Error::WithHint { hint, .. }) => Some(hint),
                None => None,
            };
            io::error(format!("patchset {}: {err}", help.name));

            if let Some(hint) = hint {
                io::hint(hint);
            }
            process::exit(1);
        }
    };

    match cmd.run(options, ctx) {
        Ok(()) => process::exit(0),
        Err(err) => {
            fail(help.name, &err);
            process::exit(1);
        }
    }
}

/// Loads the configuration given on the command line, or from the
/// environment.
#[derive(Debug, Default, Clone)]
pub struct DefaultContext {
    pub config: Option<PathBuf>,
}

impl Context for DefaultContext {
    fn config(&self) -> Result<Config, anyhow::Error> {
        match Config::load_or_default(self.config.as_deref()) {
            Ok(cfg) => Ok(cfg),
            Err(patchset::config::ConfigError::Io(e)) => Err(Error::WithHint {
                err: anyhow::anyhow!("could not read configuration: {e}"),
                hint: "check the `--config` option or the `PATCHSET_CONFIG` variable",
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn fail(_name: &str, error: &anyhow::Error) {
    let err = error.to_string();
    let err = err.trim_end();

    for line in err.lines() {
        io::error(line);
    }

    if let Some(e) = error.downcast_ref::<patchset::updates::Error>() {
        if e.is_retryable() {
            io::hint("the change could not be fetched, try again later");
        }
    }
    if let Some(Error::WithHint { hint, .. }) = error.downcast_ref::<Error>() {
        io::hint(hint);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_context_missing_config() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = DefaultContext {
            config: Some(tmp.path().join("missing.json")),
        };
        let err = ctx.config().unwrap_err();

        match err.downcast_ref::<Error>() {
            Some(Error::WithHint { hint, .. }) => {
                assert_eq!(
                    *hint,
                    "check the `--config` option or the `PATCHSET_CONFIG` variable"
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().starts_with("could not read configuration"));
    }

    #[test]
    fn test_default_context_invalid_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"wip": 1}"#).unwrap();
        let err = DefaultContext { config: Some(path) }.config().unwrap_err();

        assert!(err.downcast_ref::<Error>().is_none());
        assert!(matches!(
            err.downcast_ref::<patchset::config::ConfigError>(),
            Some(patchset::config::ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_default_context_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let cfg = Config {
            wip: patchset::wip::Markers::new("wip", "ready"),
        };
        cfg.write(&path).unwrap();

        assert_eq!(DefaultContext { config: Some(path) }.config().unwrap(), cfg);
    }
}
