//! The externally visible configuration set: declaration, loading, and the
//! diagnostic dump.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::ConfigError;
use crate::flatten;
use crate::registry::Registry;
use crate::value::{Setting, SettingValue};

/// What to do when argument parsing fails.
///
/// The policy applies to [`ConfigSet::parse_args`] only. Document loading
/// always returns its error to the caller, whatever the policy — a bad config
/// file is the caller's to report, while argument handling follows the
/// conventions of command-line tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return the error to the caller.
    #[default]
    Continue,
    /// Print the error to stderr and exit the process with status 2. Help
    /// requests print usage to stdout and exit 0.
    Exit,
    /// Panic with the error message.
    Panic,
}

/// A named set of typed configuration settings.
///
/// Declare every setting first, then load — from a TOML file, a TOML string,
/// or an argument list. Loads may be repeated; later loads overwrite only the
/// keys they mention.
///
/// ```
/// use tomlflag::{ConfigSet, ErrorPolicy};
///
/// let mut config = ConfigSet::new("app", ErrorPolicy::Continue);
/// let country = config.declare("country", String::from("Unknown"), "country of residence");
/// let enabled = config.declare("atlanta.enabled", false, "");
/// let population = config.declare("atlanta.population", 0i32, "");
///
/// config.load_str(r#"
///     country = "USA"
///
///     [atlanta]
///     enabled = true
///     population = 432427
/// "#)?;
///
/// assert_eq!(country.get(), "USA");
/// assert!(enabled.get());
/// assert_eq!(population.get(), 432427);
/// # Ok::<(), tomlflag::ConfigError>(())
/// ```
pub struct ConfigSet {
    name: String,
    policy: ErrorPolicy,
    registry: Registry,
}

impl ConfigSet {
    /// Create an empty set. `name` appears in usage output; `policy` governs
    /// argument-parsing failures.
    pub fn new(name: impl Into<String>, policy: ErrorPolicy) -> Self {
        ConfigSet {
            name: name.into(),
            policy,
            registry: Registry::default(),
        }
    }

    /// Declare a setting and return its live handle. Works for any supported
    /// scalar type; the type is inferred from `default`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already declared in this set.
    pub fn declare<T: SettingValue>(&mut self, name: &str, default: T, usage: &str) -> Setting<T> {
        self.registry.declare(name, default, usage)
    }

    /// Declare a setting backed by a caller-supplied handle. The handle's
    /// contents are replaced with `default`; later loads write through it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already declared in this set.
    pub fn bind<T: SettingValue>(
        &mut self,
        handle: &Setting<T>,
        name: &str,
        default: T,
        usage: &str,
    ) {
        self.registry.bind(handle, name, default, usage);
    }

    /// Load a TOML file and assign every key in it.
    ///
    /// Call after all settings are declared. Failures always return to the
    /// caller, regardless of the error policy. On a per-key failure, keys
    /// assigned earlier in the traversal keep their new values.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: toml::Table = text.parse().map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;
        flatten::apply(&self.registry, &table)
    }

    /// Like [`load_file`](Self::load_file), from an in-memory TOML string.
    pub fn load_str(&self, text: &str) -> Result<(), ConfigError> {
        let table: toml::Table = text
            .parse()
            .map_err(|source| ConfigError::ParseString { source })?;
        flatten::apply(&self.registry, &table)
    }

    /// Parse command-line tokens (`--name=value`, `--name value`, bare
    /// boolean flags) against the declared settings.
    ///
    /// `args` should not include the program name. Failures follow the
    /// [`ErrorPolicy`]; under [`Continue`](ErrorPolicy::Continue) a help
    /// request surfaces as [`ConfigError::HelpRequested`] so the caller can
    /// print usage and exit zero.
    #[cfg(feature = "clap")]
    pub fn parse_args<I, S>(&self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match crate::args::apply(&self.name, &self.registry, args) {
            Ok(()) => Ok(()),
            Err(err) => match self.policy {
                ErrorPolicy::Continue => Err(err),
                ErrorPolicy::Exit => {
                    if let ConfigError::HelpRequested { usage } = &err {
                        print!("{usage}");
                        std::process::exit(0);
                    }
                    eprintln!("{err}");
                    std::process::exit(2);
                }
                ErrorPolicy::Panic => panic!("{err}"),
            },
        }
    }

    /// Write one `name=value` line per declared setting, in declaration
    /// order. The format is diagnostic output, not a stable contract.
    pub fn dump_current_values(&self, mut out: impl Write) -> io::Result<()> {
        for entry in self.registry.entries() {
            writeln!(out, "{}={}", entry.name(), entry.render())?;
        }
        Ok(())
    }

    /// [`dump_current_values`](Self::dump_current_values) to stderr, for
    /// quick "what is my config right now" inspection.
    pub fn print_current_values(&self) {
        let _ = self.dump_current_values(io::stderr());
    }

    /// The name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument-parsing error policy given at construction.
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn set() -> ConfigSet {
        ConfigSet::new("test", ErrorPolicy::Continue)
    }

    #[test]
    fn end_to_end_document_load() {
        let mut config = set();
        let country = config.declare("country", String::from("Unknown"), "");
        let enabled = config.declare("atlanta.enabled", false, "");
        let population = config.declare("atlanta.population", 0i32, "");

        config
            .load_str("country = \"USA\"\n\n[atlanta]\nenabled = true\npopulation = 432427\n")
            .unwrap();

        assert_eq!(country.get(), "USA");
        assert!(enabled.get());
        assert_eq!(population.get(), 432427);
    }

    #[test]
    fn keys_absent_from_document_keep_defaults() {
        let mut config = set();
        let country = config.declare("country", String::from("Unknown"), "");
        let population = config.declare("atlanta.population", 0i32, "");
        config.load_str("[atlanta]\npopulation = 10").unwrap();
        assert_eq!(country.get(), "Unknown");
        assert_eq!(population.get(), 10);
    }

    #[test]
    fn second_load_overwrites_only_its_own_keys() {
        let mut config = set();
        let country = config.declare("country", String::from("Unknown"), "");
        let population = config.declare("atlanta.population", 0i32, "");

        config
            .load_str("country = \"USA\"\n[atlanta]\npopulation = 432427")
            .unwrap();
        config.load_str("country = \"Iceland\"").unwrap();

        assert_eq!(country.get(), "Iceland");
        // Not reset to its default by the second load.
        assert_eq!(population.get(), 432427);
    }

    #[test]
    fn empty_document_succeeds_with_zero_assignments() {
        let mut config = set();
        let port = config.declare("port", 8080u32, "");
        config.load_str("").unwrap();
        assert_eq!(port.get(), 8080);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let config = set();
        let err = config.load_str("this is not toml =").unwrap_err();
        assert!(matches!(err, ConfigError::ParseString { .. }));
    }

    #[test]
    fn load_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(&path, "country = \"USA\"\n[atlanta]\nenabled = true\n").unwrap();

        let mut config = set();
        let country = config.declare("country", String::from("Unknown"), "");
        let enabled = config.declare("atlanta.enabled", false, "");
        config.load_file(&path).unwrap();
        assert_eq!(country.get(), "USA");
        assert!(enabled.get());
    }

    #[test]
    fn missing_file_is_an_io_error_naming_the_path() {
        let config = set();
        let err = config.load_file("/nonexistent/app.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, std::path::PathBuf::from("/nonexistent/app.toml"));
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn malformed_file_error_names_the_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not = = toml").unwrap();

        let config = set();
        let err = config.load_file(&path).unwrap_err();
        match err {
            ConfigError::ParseFile { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected ParseFile, got {other:?}"),
        }
    }

    #[test]
    fn undeclared_document_key_fails_the_load() {
        let mut config = set();
        let _country = config.declare("country", String::from("Unknown"), "");
        let err = config.load_str("countyr = \"USA\"").unwrap_err();
        match err {
            ConfigError::UnknownSetting { name } => assert_eq!(name, "countyr"),
            other => panic!("expected UnknownSetting, got {other:?}"),
        }
    }

    #[test]
    fn all_scalar_types_load() {
        let mut config = set();
        let flag = config.declare("flag", false, "");
        let small = config.declare("small", 0i32, "");
        let big = config.declare("big", 0i64, "");
        let usmall = config.declare("usmall", 0u32, "");
        let ubig = config.declare("ubig", 0u64, "");
        let rate = config.declare("rate", 0.0f64, "");
        let label = config.declare("label", String::new(), "");
        let wait = config.declare("wait", Duration::ZERO, "");

        config
            .load_str(
                "flag = true\nsmall = -5\nbig = -5000000000\nusmall = 7\n\
                 ubig = 18000000000\nrate = 99.6\nlabel = \"x\"\nwait = \"250ms\"\n",
            )
            .unwrap();

        assert!(flag.get());
        assert_eq!(small.get(), -5);
        assert_eq!(big.get(), -5_000_000_000);
        assert_eq!(usmall.get(), 7);
        assert_eq!(ubig.get(), 18_000_000_000);
        assert_eq!(rate.get(), 99.6);
        assert_eq!(label.get(), "x");
        assert_eq!(wait.get(), Duration::from_millis(250));
    }

    #[test]
    fn dump_lists_declaration_order_name_equals_value() {
        let mut config = set();
        let _country = config.declare("country", String::from("Unknown"), "");
        let _enabled = config.declare("atlanta.enabled", false, "");
        config.load_str("country = \"USA\"").unwrap();

        let mut out = Vec::new();
        config.dump_current_values(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "country=USA\natlanta.enabled=false\n"
        );
    }

    #[test]
    fn bind_writes_through_caller_handle() {
        let mut config = set();
        let timeout = Setting::new(Duration::ZERO);
        config.bind(&timeout, "timeout", Duration::from_secs(5), "request timeout");
        config.load_str("timeout = \"30s\"").unwrap();
        assert_eq!(timeout.get(), Duration::from_secs(30));
    }

    #[cfg(feature = "clap")]
    #[test]
    fn parse_args_continue_policy_returns_errors() {
        let mut config = set();
        let country = config.declare("country", String::from("Unknown"), "");
        config.parse_args(["--country=USA"]).unwrap();
        assert_eq!(country.get(), "USA");

        let err = config.parse_args(["--bogus=1"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSetting { .. }));
    }

    #[cfg(feature = "clap")]
    #[test]
    #[should_panic(expected = "is not a valid config setting")]
    fn parse_args_panic_policy_panics() {
        let mut config = ConfigSet::new("test", ErrorPolicy::Panic);
        let _country = config.declare("country", String::from("Unknown"), "");
        let _ = config.parse_args(["--bogus=1"]);
    }

    #[test]
    fn document_load_errors_ignore_the_policy() {
        // Exit policy must not terminate the process on a document error.
        let mut config = ConfigSet::new("test", ErrorPolicy::Exit);
        let _country = config.declare("country", String::from("Unknown"), "");
        assert!(config.load_str("bogus = 1").is_err());
    }
}
