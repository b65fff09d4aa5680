//! Header chain built on the generic list.
//!
//! Each entry is one raw `"Name: Value"` line, stored verbatim. Nothing here
//! validates the format; the transport decides what to do with a line it
//! cannot split.

use crate::list::List;

/// One header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    line: String,
}

impl HeaderEntry {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// The line exactly as it was appended.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Text before the first `:`, trimmed. The whole line if there is no `:`.
    pub fn name(&self) -> &str {
        match self.line.split_once(':') {
            Some((name, _)) => name.trim(),
            None => self.line.trim(),
        }
    }

    /// Text after the first `:`, trimmed. `None` if the line has no `:`.
    pub fn value(&self) -> Option<&str> {
        self.line.split_once(':').map(|(_, value)| value.trim())
    }

    pub fn into_line(self) -> String {
        self.line
    }
}

/// Ordered chain of header lines for one request.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: List<HeaderEntry>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, line: impl Into<String>) -> &HeaderEntry {
        let id = self.entries.append(HeaderEntry::new(line));
        &self.entries[id]
    }

    /// First entry whose name matches `name`, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&HeaderEntry> {
        self.entries
            .find(name, |entry, name| entry.name().eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> crate::list::Iter<'_, HeaderEntry> {
        self.entries.iter()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(HeaderEntry::line)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_list(&self) -> &List<HeaderEntry> {
        &self.entries
    }
}

impl<S: Into<String>> FromIterator<S> for Headers {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(HeaderEntry::new).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a HeaderEntry;
    type IntoIter = crate::list::Iter<'a, HeaderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Append `line` through a root reference, creating the chain when the
/// root is empty. Returns the new entry.
pub fn append_header(root: &mut Option<Headers>, line: impl Into<String>) -> &HeaderEntry {
    root.get_or_insert_with(Headers::new).append(line)
}

/// Release a chain that was never attached to a request.
pub fn free_headers(headers: Headers) {
    drop(headers);
}
