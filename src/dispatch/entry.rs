use crate::format::{render_body, Content};

/// One scan call, rendered to text on the caller's thread so nothing
/// borrowed from the caller crosses into a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    body: String,
    file: Option<String>,
}

impl Entry {
    #[must_use]
    pub fn render(content: Content<'_>, file: Option<&str>) -> Self {
        Self {
            body: render_body(content),
            file: file.map(str::to_string),
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Target file override.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
