//! The scalar types a setting can hold, and the shared handle bound to each
//! declared setting.
//!
//! One generic [`SettingValue`] trait replaces a per-type declaration surface:
//! every supported scalar knows how to parse itself from the string form used
//! by both TOML leaves and `--name=value` tokens, and how to render itself for
//! the diagnostic dump.

use std::sync::{Arc, RwLock};
use std::time::Duration;

/// A scalar type usable as a configuration setting.
///
/// Implemented for `bool`, `i32`, `i64`, `u32`, `u64`, `f64`, `String`, and
/// [`Duration`]. Parsing is total over the canonical string forms produced by
/// the TOML flattener; anything else is a type mismatch.
pub trait SettingValue: Clone + Send + Sync + 'static {
    /// Parse the canonical string form. `None` means type mismatch.
    fn parse(raw: &str) -> Option<Self>;

    /// Render the current value for display (`name=value` dump lines).
    fn render(&self) -> String;

    /// Whether `--name` with no value is accepted as `--name=true`.
    #[doc(hidden)]
    fn is_boolean() -> bool {
        false
    }
}

impl SettingValue for bool {
    // The accepted spellings match Go's strconv.ParseBool, which is what
    // configs written against the original tool may contain.
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
            _ => None,
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn is_boolean() -> bool {
        true
    }
}

impl SettingValue for String {
    fn parse(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

macro_rules! numeric_setting_value {
    ($($ty:ty),* $(,)?) => {$(
        impl SettingValue for $ty {
            fn parse(raw: &str) -> Option<Self> {
                raw.parse().ok()
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

numeric_setting_value!(i32, i64, u32, u64, f64);

impl SettingValue for Duration {
    fn parse(raw: &str) -> Option<Self> {
        parse_duration(raw)
    }

    fn render(&self) -> String {
        render_duration(*self)
    }
}

/// Parse a duration string: one or more `<number><unit>` pairs, where the
/// number may be fractional and the unit is one of `ns`, `us`/`µs`, `ms`,
/// `s`, `m`, `h`. Examples: `"30s"`, `"1h30m"`, `"1.5h"`, `"300ms"`.
///
/// A bare number with no unit is rejected.
fn parse_duration(raw: &str) -> Option<Duration> {
    let mut rest = raw.trim();
    if rest.is_empty() {
        return None;
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        // Number part, then unit part. A missing unit makes find() return
        // None here, which rejects bare numbers like "30".
        let num_end = rest.find(|c: char| !c.is_ascii_digit() && c != '.')?;
        if num_end == 0 {
            return None;
        }
        let value: f64 = rest[..num_end].parse().ok()?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let multiplier = match &rest[..unit_end] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };
        rest = &rest[unit_end..];

        let part = Duration::try_from_secs_f64(value * multiplier).ok()?;
        total = total.checked_add(part)?;
    }
    Some(total)
}

/// Render a duration in the same `<number><unit>` grammar that
/// [`parse_duration`] accepts: `1h30m`, `1m30s`, `300ms`, `0s`.
fn render_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".to_string();
    }

    let nanos = d.subsec_nanos();
    let mut secs = d.as_secs();

    // Sub-second values get the finest whole unit.
    if secs == 0 {
        return if nanos % 1_000_000 == 0 {
            format!("{}ms", nanos / 1_000_000)
        } else if nanos % 1_000 == 0 {
            format!("{}us", nanos / 1_000)
        } else {
            format!("{nanos}ns")
        };
    }

    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    secs %= 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if nanos > 0 {
        out.push_str(&format!("{}s", secs as f64 + f64::from(nanos) / 1e9));
    } else if secs > 0 || out.is_empty() {
        out.push_str(&format!("{secs}s"));
    }
    out
}

/// A live handle to a declared setting — the Rust rendition of the pointer
/// returned by a flag-style declarator.
///
/// Handles are cheap to clone and share one underlying value, so the handle
/// returned at declaration time observes every later load:
///
/// ```
/// use tomlflag::{ConfigSet, ErrorPolicy};
///
/// let mut set = ConfigSet::new("app", ErrorPolicy::Continue);
/// let port = set.declare("port", 8080u32, "listen port");
/// set.load_str("port = 9000").unwrap();
/// assert_eq!(port.get(), 9000);
/// ```
#[derive(Debug)]
pub struct Setting<T> {
    value: Arc<RwLock<T>>,
}

impl<T> Clone for Setting<T> {
    fn clone(&self) -> Self {
        Setting {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: SettingValue> Setting<T> {
    /// Create an unregistered handle holding `value`. Pass it to
    /// [`ConfigSet::bind`](crate::ConfigSet::bind) to have loads write into it.
    pub fn new(value: T) -> Self {
        Setting {
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        // A poisoned lock means a writer panicked mid-store; the stored value
        // is a plain scalar and still readable.
        self.value
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Overwrite the current value.
    pub fn set(&self, value: T) {
        *self
            .value
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
    }
}

impl<T: SettingValue + Default> Default for Setting<T> {
    fn default() -> Self {
        Setting::new(T::default())
    }
}
