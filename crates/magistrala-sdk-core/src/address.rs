//! Channel address decoding for telemetry routes.
//!
//! A composite address has the form `<channelId>[.<subtopic>]`. The subtopic
//! uses dots as level separators and is transported as URL path segments:
//!
//! | composite | id | subtopic |
//! |---|---|---|
//! | `chan1` | `chan1` | (empty) |
//! | `chan1.temp` | `chan1` | `temp` |
//! | `chan1.temp.value` | `chan1` | `temp/value` |
//!
//! Everything after the first dot is kept; deeper levels are never dropped.

use std::fmt;

/// A channel id plus an optional slash-separated subtopic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceAddress {
    /// Channel identifier, not validated
    pub id: String,
    /// Subtopic with `/` separators, empty when absent
    pub subtopic: String,
}

impl ResourceAddress {
    /// Decode a composite address.
    ///
    /// # Examples
    ///
    /// ```
    /// use magistrala_sdk_core::ResourceAddress;
    ///
    /// let addr = ResourceAddress::decode("chan1.temp.value");
    /// assert_eq!(addr.id, "chan1");
    /// assert_eq!(addr.subtopic, "temp/value");
    /// ```
    #[must_use]
    pub fn decode(composite: &str) -> Self {
        match composite.split_once('.') {
            Some((id, rest)) => Self {
                id: id.to_string(),
                subtopic: rest.replace('.', "/"),
            },
            None => Self {
                id: composite.to_string(),
                subtopic: String::new(),
            },
        }
    }

    /// `true` when a subtopic is present.
    #[must_use]
    pub fn has_subtopic(&self) -> bool {
        !self.subtopic.is_empty()
    }

    /// Subtopic levels as individual path segments. Empty levels are skipped.
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.subtopic.split('/').filter(|s| !s.is_empty())
    }
}

impl From<&str> for ResourceAddress {
    fn from(composite: &str) -> Self {
        Self::decode(composite)
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_subtopic() {
            write!(f, "{}/{}", self.id, self.subtopic)
        } else {
            f.write_str(&self.id)
        }
    }
}
