//! Flag-style typed configuration variables, populated from TOML.
//!
//! Declare named settings with defaults, then load a TOML document — from a
//! file or a string — or a command-line argument list over them. Nested TOML
//! tables map to dotted setting names, so `[atlanta] enabled = true` assigns
//! the setting declared as `"atlanta.enabled"`.
//!
//! ```
//! use tomlflag::{ConfigSet, ErrorPolicy};
//!
//! let mut config = ConfigSet::new("myapp", ErrorPolicy::Continue);
//! let country = config.declare("country", String::from("Unknown"), "country of residence");
//! let enabled = config.declare("atlanta.enabled", false, "serve the atlanta region");
//! let population = config.declare("atlanta.population", 0i32, "");
//!
//! config.load_str(r#"
//!     country = "USA"
//!
//!     [atlanta]
//!     enabled = true
//!     population = 432427
//! "#)?;
//!
//! assert_eq!(country.get(), "USA");
//! assert!(enabled.get());
//! assert_eq!(population.get(), 432427);
//! # Ok::<(), tomlflag::ConfigError>(())
//! ```
//!
//! # Design: a flat registry, not a config struct
//!
//! Each [`ConfigSet`] owns a flat namespace of typed settings. Declaring a
//! setting returns a [`Setting<T>`] handle — a cheap, clonable reference to
//! the live value — and loading mutates the values those handles observe.
//! There is no schema struct: components declare the settings they care about
//! where they live, and one load call populates all of them.
//!
//! The supported scalar types are `bool`, `i32`, `i64`, `u32`, `u64`, `f64`,
//! `String`, and [`std::time::Duration`] (written as strings like `"30s"` or
//! `"1h30m"` in TOML). One generic [`ConfigSet::declare`] covers them all,
//! and [`ConfigSet::bind`] is the variant that adopts a handle the caller
//! already owns.
//!
//! # Loading semantics
//!
//! Every load is **sparse**: only the keys present in the document (or
//! argument list) are assigned; everything else keeps its current value.
//! Loads may be repeated — a second document overwrites only the keys it
//! mentions. There is no rollback: if a key fails partway through a load,
//! keys assigned before it keep their new values and the error is returned.
//!
//! Every key in a document must name a declared setting. An unknown key or a
//! value of the wrong type fails the load with a structured
//! [`ConfigError`] variant naming the full dotted path.
//!
//! # Command-line arguments
//!
//! [`ConfigSet::parse_args`] (behind the default-on `clap` Cargo feature)
//! accepts `--name=value` and `--name value` tokens for every declared
//! setting, with bare `--name` shorthand for booleans. `-h`/`--help` yields
//! the distinguished [`ConfigError::HelpRequested`] outcome carrying rendered
//! usage text. The [`ErrorPolicy`] chosen at construction decides whether
//! argument failures return, exit the process, or panic; document-loading
//! failures always return regardless.
//!
//! # The global set
//!
//! For small tools, the [`global`] module offers a lazily-constructed
//! process-wide [`ConfigSet`] with free-function delegates (`global::declare`,
//! `global::load_file`, ...). Explicit sets remain the recommended shape.
//!
//! # Concurrency
//!
//! A [`ConfigSet`] assumes the flag-library lifecycle: one thread declares
//! and loads during initialization, then any number of threads read the
//! handles. Handles are internally synchronized; the set itself is not,
//! except for the [`global`] set, which serializes access through a mutex.

pub mod error;
pub mod global;

#[cfg(feature = "clap")]
mod args;
mod flatten;
mod registry;
mod set;
mod value;

pub use error::ConfigError;
pub use set::{ConfigSet, ErrorPolicy};
pub use value::{Setting, SettingValue};
