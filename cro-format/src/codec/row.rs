//! Decoded record rows

/// One decoded record: `(field name, text)` pairs in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRow {
    columns: Vec<(String, String)>,
}

impl DecodedRow {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: String) {
        self.columns.push((name.to_string(), value));
    }

    /// Value of the named column
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Column values in schema order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, v)| v.as_str())
    }
}
