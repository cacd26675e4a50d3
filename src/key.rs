//! Lookup keys for keyed registrations.

use std::fmt;
use std::sync::Arc;

/// Key disambiguating registrations of the same exported type.
///
/// A keyed lookup is an exact-match concern: a strategy registered under
/// `Name("primary")` is only found by a request carrying that same key.
/// Member injection derives `Name(member_name)` keys for member types the
/// scope's keyed-type selector picks out.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::LocateKey;
///
/// let port = LocateKey::from("port");
/// let shard = LocateKey::from(3);
///
/// assert_eq!(port, LocateKey::Name("port".into()));
/// assert_eq!(port.as_name(), Some("port"));
/// assert_eq!(shard.as_name(), None);
/// assert_eq!(shard.to_string(), "#3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocateKey {
    /// String key, also used for member-name keys
    Name(Arc<str>),
    /// Integer key
    Index(i64),
}

impl LocateKey {
    /// Returns the key text for `Name` keys.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            LocateKey::Name(name) => Some(name),
            LocateKey::Index(_) => None,
        }
    }
}

impl fmt::Display for LocateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateKey::Name(name) => write!(f, "\"{}\"", name),
            LocateKey::Index(index) => write!(f, "#{}", index),
        }
    }
}

impl From<&str> for LocateKey {
    fn from(name: &str) -> Self {
        LocateKey::Name(name.into())
    }
}

impl From<String> for LocateKey {
    fn from(name: String) -> Self {
        LocateKey::Name(name.into())
    }
}

impl From<Arc<str>> for LocateKey {
    fn from(name: Arc<str>) -> Self {
        LocateKey::Name(name)
    }
}

impl From<i64> for LocateKey {
    fn from(index: i64) -> Self {
        LocateKey::Index(index)
    }
}
