//! Ordered header multimap with case-insensitive names.
//!
//! `http::HeaderMap` lowercases names, so the proxy keeps its own list to
//! forward names exactly as they were received. Values stay raw
//! [`HeaderValue`] bytes, so non-UTF-8 values pass through untouched.
//! Two write primitives exist: [`HeaderList::set`] overwrites,
//! [`HeaderList::add`] appends.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ProxyError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, HeaderValue)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value stored under `name`, if it is visible ASCII.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.to_str().ok())
    }

    /// Every value stored under `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&HeaderValue> {
        self.entries
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
            .collect()
    }

    /// Replace every value under `name` with a single `value`.
    ///
    /// The replacement takes the position of the first existing entry, or is
    /// appended when there was none.
    pub fn set(&mut self, name: impl Into<String>, value: HeaderValue) {
        let name = name.into();

        match self
            .entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(first) => {
                self.entries[first] = (name.clone(), value);
                let mut index = 0;
                self.entries.retain(|(k, _)| {
                    let keep = index == first || !k.eq_ignore_ascii_case(&name);
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Append a value, keeping any existing values under the same name.
    pub fn add(&mut self, name: impl Into<String>, value: HeaderValue) {
        self.entries.push((name.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy all entries of a wire header map, preserving duplicates.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        map.iter()
            .map(|(name, value)| (name.as_str(), value.clone()))
            .collect()
    }

    /// Convert back to a wire header map, preserving duplicates.
    pub fn to_header_map(&self) -> Result<HeaderMap, ProxyError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ProxyError::InvalidHeader { name: name.clone() })?;
            map.append(header_name, value.clone());
        }
        Ok(map)
    }

    /// Render as a JSON object for log fields. Duplicate values are joined with commas.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (name, value) in &self.entries {
            let value = String::from_utf8_lossy(value.as_bytes());
            match object.get_mut(name) {
                Some(serde_json::Value::String(existing)) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                _ => {
                    object.insert(name.clone(), serde_json::Value::String(value.into_owned()));
                }
            }
        }
        serde_json::Value::Object(object)
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .map(|(name, value)| (*name, HeaderValue::from_str(value).unwrap()))
            .collect()
    }
}

impl<K> FromIterator<(K, HeaderValue)> for HeaderList
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, HeaderValue)>>(iter: I) -> Self {
        let mut list = HeaderList::new();
        for (name, value) in iter {
            list.add(name, value);
        }
        list
    }
}
