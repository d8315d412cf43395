//! ICAP header fields.
//!
//! ICAP header names keep the exact case they are sent or received with, while lookups ignore
//! case. [`http::HeaderMap`] normalizes names to lowercase, which some ICAP servers do not
//! accept, so headers are kept in insertion order in a small list instead.

/// An ordered list of `name: value` header fields.
///
/// Names are unique by exact case: inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    fields: Vec<(String, String)>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, returning the previous value stored under the exact same name.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<String>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    /// Returns the value of the first field whose name matches case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(existing, _)| existing.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes every field whose name matches case-insensitively.
    pub fn remove(&mut self, name: &str) {
        self.fields.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the name of the first field that would break the header block framing: an empty
    /// name, a name holding `:`, or a CR or LF anywhere.
    pub fn find_invalid(&self) -> Option<&str> {
        self.iter().find(|(name, value)| !is_valid_field(name, value)).map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_valid_field(name: &str, value: &str) -> bool {
    !name.is_empty()
        && !name.bytes().any(|b| matches!(b, b'\r' | b'\n' | b':'))
        && !value.bytes().any(|b| matches!(b, b'\r' | b'\n'))
}

impl<N, V> FromIterator<(N, V)> for HeaderFields
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut fields = HeaderFields::new();
        fields.extend(iter);
        fields
    }
}

impl<N, V> Extend<(N, V)> for HeaderFields
where
    N: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}
