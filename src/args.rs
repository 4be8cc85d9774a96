//! Argument-list loading, built on clap's runtime builder.
//!
//! A `Command` is assembled from the registry at parse time: one long option
//! per declared setting, named by its dotted path. Matched values then flow
//! through the same registry `set` path as document loading, so a type
//! mismatch on `--atlanta.population=many` reports exactly like one in a TOML
//! file.
//!
//! Boolean settings follow flag conventions: bare `--name` means true, an
//! explicit value needs `=` (`--name=false`); `--name false` is not accepted.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, Command};

use crate::error::ConfigError;
use crate::registry::Registry;

/// Parse `args` (without the program name) against the declared settings and
/// assign every matched value.
pub(crate) fn apply<I, S>(name: &str, registry: &Registry, args: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let command = build_command(name, registry);
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let matches = command
        .try_get_matches_from(args)
        .map_err(translate_clap_error)?;

    for entry in registry.entries() {
        if matches.value_source(entry.name()) != Some(clap::parser::ValueSource::CommandLine) {
            continue;
        }
        if let Some(raw) = matches.get_one::<String>(entry.name()) {
            registry
                .set(entry.name(), raw)
                .map_err(|e| e.into_error(entry.name()))?;
        }
    }
    Ok(())
}

fn build_command(name: &str, registry: &Registry) -> Command {
    let mut command = Command::new(name.to_string())
        .no_binary_name(true)
        .disable_version_flag(true);

    for entry in registry.entries() {
        let mut arg = Arg::new(entry.name().to_string())
            .long(entry.name().to_string())
            .help(entry.usage().to_string())
            .value_name("VALUE")
            .action(ArgAction::Set);
        if entry.boolean() {
            arg = arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true");
        }
        command = command.arg(arg);
    }
    command
}

fn translate_clap_error(err: clap::Error) -> ConfigError {
    match err.kind() {
        ErrorKind::DisplayHelp => ConfigError::HelpRequested {
            usage: err.to_string(),
        },
        ErrorKind::UnknownArgument => ConfigError::UnknownSetting {
            name: offending_argument(&err),
        },
        _ => ConfigError::InvalidArguments(err.to_string()),
    }
}

/// Pull the unrecognized token out of clap's error context and strip it down
/// to the bare setting name (`--country=x` → `country`).
fn offending_argument(err: &clap::Error) -> String {
    let raw = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(s)) => s.as_str(),
        _ => "",
    };
    raw.trim_start_matches('-')
        .split('=')
        .next()
        .unwrap_or(raw)
        .to_string()
}
