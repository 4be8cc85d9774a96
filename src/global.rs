//! A process-wide default [`ConfigSet`] for programs that need only one
//! configuration namespace.
//!
//! The set is constructed lazily on first use, named after the program
//! (argv[0]) and using [`ErrorPolicy::Exit`]. Access goes through a mutex, so
//! independent components declaring settings during initialization do not
//! race; the declare-then-load ordering is still the caller's responsibility.
//!
//! Prefer constructing an explicit [`ConfigSet`] and threading it through —
//! this module exists for the small-tool case where that ceremony outweighs
//! the benefit.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::error::ConfigError;
use crate::set::{ConfigSet, ErrorPolicy};
use crate::value::{Setting, SettingValue};

static GLOBAL: OnceLock<Mutex<ConfigSet>> = OnceLock::new();

fn lock() -> MutexGuard<'static, ConfigSet> {
    GLOBAL
        .get_or_init(|| {
            let name = std::env::args()
                .next()
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
            Mutex::new(ConfigSet::new(name, ErrorPolicy::Exit))
        })
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run `f` with exclusive access to the global set.
///
/// The escape hatch for anything the free functions below don't cover.
pub fn with<R>(f: impl FnOnce(&mut ConfigSet) -> R) -> R {
    f(&mut lock())
}

/// Declare a setting on the global set. See [`ConfigSet::declare`].
pub fn declare<T: SettingValue>(name: &str, default: T, usage: &str) -> Setting<T> {
    lock().declare(name, default, usage)
}

/// Bind a caller-supplied handle on the global set. See [`ConfigSet::bind`].
pub fn bind<T: SettingValue>(handle: &Setting<T>, name: &str, default: T, usage: &str) {
    lock().bind(handle, name, default, usage);
}

/// Load a TOML file into the global set. See [`ConfigSet::load_file`].
pub fn load_file(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    lock().load_file(path)
}

/// Load a TOML string into the global set. See [`ConfigSet::load_str`].
pub fn load_str(text: &str) -> Result<(), ConfigError> {
    lock().load_str(text)
}

/// Parse the process arguments (skipping the program name) against the
/// global set. With the global set's `Exit` policy, errors terminate the
/// process the way command-line tools conventionally do.
#[cfg(feature = "clap")]
pub fn parse_args() -> Result<(), ConfigError> {
    lock().parse_args(std::env::args().skip(1))
}

/// Dump the global set's current values to stderr.
/// See [`ConfigSet::print_current_values`].
pub fn print_current_values() {
    lock().print_current_values();
}
