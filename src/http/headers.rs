use std::collections::HashMap;

/// Header map with case-insensitive names.
///
/// Names are stored lower-cased; inserting a name that is already present
/// replaces its value (last occurrence wins). Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.inner
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Looks a header up by name, ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.inner.get(key) {
            return Some(value.as_str());
        }
        self.inner
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(&key.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(lower-cased name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// Renders a header name in its canonical wire form.
///
/// The first letter and every letter following a hyphen are upper-cased;
/// everything else is left untouched, so `content-type` becomes
/// `Content-Type` and `cache-Control` becomes `Cache-Control`.
pub fn canonicalize_header_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = true;

    for c in key.chars() {
        if upper_next {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        upper_next = c == '-';
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keys() {
        assert_eq!(canonicalize_header_key("link"), "Link");
        assert_eq!(canonicalize_header_key("Location"), "Location");
        assert_eq!(canonicalize_header_key("content-type"), "Content-Type");
        assert_eq!(canonicalize_header_key("cache-Control"), "Cache-Control");
        assert_eq!(canonicalize_header_key("x-test"), "X-Test");
        assert_eq!(canonicalize_header_key(""), "");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        for key in ["content-length", "X-FORWARDED-FOR", "a--b", "-lead", "etag"] {
            let once = canonicalize_header_key(key);
            assert_eq!(canonicalize_header_key(&once), once);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));

        headers.insert("content-TYPE", "image/png");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Content-Type"), Some("image/png"));
    }
}
