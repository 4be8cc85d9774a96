//! The flat namespace of declared settings.
//!
//! Each entry pairs a dotted name with a type-erased slot wrapping the typed
//! [`Setting`] handle. `set` reports a structured outcome — unknown name or
//! value parse failure — instead of free text, so callers classify errors by
//! variant and render the readable message from [`ConfigError`].

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::value::{Setting, SettingValue};

/// Why a `set` by name failed. The full dotted path is attached by the caller
/// via [`SetError::into_error`], since the flattener knows the path it built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetError {
    UnknownSetting,
    InvalidValue,
}

impl SetError {
    pub(crate) fn into_error(self, name: &str) -> ConfigError {
        match self {
            SetError::UnknownSetting => ConfigError::UnknownSetting { name: name.into() },
            SetError::InvalidValue => ConfigError::InvalidValue { name: name.into() },
        }
    }
}

/// Type-erased view of one setting's storage.
trait Slot: Send + Sync {
    /// Parse `raw` as the slot's type and store it. `false` = type mismatch.
    fn store(&self, raw: &str) -> bool;

    /// Render the current value for the diagnostic dump.
    fn render(&self) -> String;

    /// Whether the setting is a boolean (bare `--name` shorthand applies).
    fn boolean(&self) -> bool;
}

struct TypedSlot<T: SettingValue> {
    handle: Setting<T>,
}

impl<T: SettingValue> Slot for TypedSlot<T> {
    fn store(&self, raw: &str) -> bool {
        match T::parse(raw) {
            Some(value) => {
                self.handle.set(value);
                true
            }
            None => false,
        }
    }

    fn render(&self) -> String {
        self.handle.get().render()
    }

    fn boolean(&self) -> bool {
        T::is_boolean()
    }
}

pub(crate) struct Entry {
    name: String,
    usage: String,
    slot: Box<dyn Slot>,
}

impl Entry {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[cfg_attr(not(feature = "clap"), allow(dead_code))]
    pub(crate) fn usage(&self) -> &str {
        &self.usage
    }

    pub(crate) fn render(&self) -> String {
        self.slot.render()
    }

    #[cfg_attr(not(feature = "clap"), allow(dead_code))]
    pub(crate) fn boolean(&self) -> bool {
        self.slot.boolean()
    }
}

/// Declaration-ordered registry of settings, with by-name lookup.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Register a new setting and return its live handle.
    ///
    /// Panics on a duplicate name: two components claiming the same dotted
    /// path is a programming error there is no sensible way to arbitrate.
    pub(crate) fn declare<T: SettingValue>(
        &mut self,
        name: &str,
        default: T,
        usage: &str,
    ) -> Setting<T> {
        let handle = Setting::new(default);
        self.adopt(&handle, name, usage);
        handle
    }

    /// Register a caller-supplied handle, overwriting its contents with
    /// `default`. Loads then write through the shared handle.
    pub(crate) fn bind<T: SettingValue>(
        &mut self,
        handle: &Setting<T>,
        name: &str,
        default: T,
        usage: &str,
    ) {
        handle.set(default);
        self.adopt(handle, name, usage);
    }

    fn adopt<T: SettingValue>(&mut self, handle: &Setting<T>, name: &str, usage: &str) {
        if self.index.contains_key(name) {
            panic!("config setting {name} declared twice");
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Entry {
            name: name.to_string(),
            usage: usage.to_string(),
            slot: Box::new(TypedSlot {
                handle: handle.clone(),
            }),
        });
    }

    /// Set a declared setting from its canonical string form.
    pub(crate) fn set(&self, name: &str, raw: &str) -> Result<(), SetError> {
        let entry = self
            .index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or(SetError::UnknownSetting)?;
        if entry.slot.store(raw) {
            Ok(())
        } else {
            Err(SetError::InvalidValue)
        }
    }

    /// All entries in declaration order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn declare_then_set_updates_handle() {
        let mut registry = Registry::default();
        let port = registry.declare("port", 8080u32, "");
        assert_eq!(port.get(), 8080);
        registry.set("port", "9000").unwrap();
        assert_eq!(port.get(), 9000);
    }

    #[test]
    fn set_unknown_name_is_structured() {
        let registry = Registry::default();
        assert_eq!(registry.set("nope", "1"), Err(SetError::UnknownSetting));
    }

    #[test]
    fn set_bad_value_is_structured() {
        let mut registry = Registry::default();
        let _count = registry.declare("count", 0i64, "");
        assert_eq!(registry.set("count", "many"), Err(SetError::InvalidValue));
    }

    #[test]
    fn bind_overwrites_with_default_and_shares() {
        let mut registry = Registry::default();
        let timeout = Setting::new(Duration::ZERO);
        registry.bind(&timeout, "timeout", Duration::from_secs(5), "");
        assert_eq!(timeout.get(), Duration::from_secs(5));
        registry.set("timeout", "30s").unwrap();
        assert_eq!(timeout.get(), Duration::from_secs(30));
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn duplicate_declaration_panics() {
        let mut registry = Registry::default();
        let _a = registry.declare("port", 1u32, "");
        let _b = registry.declare("port", 2u32, "");
    }

    #[test]
    fn entries_keep_declaration_order() {
        let mut registry = Registry::default();
        let _c = registry.declare("country", String::from("Unknown"), "");
        let _e = registry.declare("atlanta.enabled", false, "");
        let _p = registry.declare("atlanta.population", 0i32, "");
        let names: Vec<&str> = registry.entries().map(Entry::name).collect();
        assert_eq!(names, ["country", "atlanta.enabled", "atlanta.population"]);
    }

    #[test]
    fn set_error_rendering() {
        let err = SetError::UnknownSetting.into_error("atlanta.popluation");
        assert_eq!(
            err.to_string(),
            "atlanta.popluation is not a valid config setting"
        );
        let err = SetError::InvalidValue.into_error("atlanta.enabled");
        assert_eq!(err.to_string(), "The value for atlanta.enabled is invalid");
    }
}
