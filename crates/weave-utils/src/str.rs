use std::borrow::Cow;

type Inner = compact_str::CompactString;

/// A cheap-to-clone string used for agent ids, archetype names, and other
/// short identifiers that flow through the simulation in large numbers.
#[derive(Clone, Eq, Hash, PartialOrd, Ord, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SmallStr(Inner);

impl SmallStr {
    pub const EMPTY: Self = Self::from_static("");

    #[inline(always)]
    pub const fn from_static(s: &'static str) -> Self {
        Self(Inner::const_new(s))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for SmallStr {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Display for SmallStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for SmallStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0.as_str())
    }
}

impl AsRef<str> for SmallStr {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl core::ops::Deref for SmallStr {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl core::borrow::Borrow<str> for SmallStr {
    #[inline(always)]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for SmallStr {
    #[inline(always)]
    fn from(value: &str) -> Self {
        Self(Inner::from(value))
    }
}

impl From<String> for SmallStr {
    #[inline(always)]
    fn from(value: String) -> Self {
        Self(Inner::from(value))
    }
}

impl From<SmallStr> for String {
    #[inline(always)]
    fn from(value: SmallStr) -> Self {
        value.as_str().to_owned()
    }
}

impl From<Cow<'_, str>> for SmallStr {
    #[inline(always)]
    fn from(value: Cow<str>) -> Self {
        Self(Inner::from(value))
    }
}
