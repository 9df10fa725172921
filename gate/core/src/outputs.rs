/// Side channel for publishing named values to the calling CI system.
pub trait VariableSink {
    fn publish(&mut self, name: &str, value: &str);
}

/// Sink that keeps published pairs in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Vec<(String, String)>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn published(&self) -> &[(String, String)] {
        &self.published
    }
}

impl VariableSink for MemorySink {
    fn publish(&mut self, name: &str, value: &str) {
        self.published.push((name.to_owned(), value.to_owned()));
    }
}
