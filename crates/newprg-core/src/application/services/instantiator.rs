//! Template instantiation: literal marker substitution over a [`Buffer`].
//!
//! There is no template language. A marker is a literal token such as
//! `<exename>`; every occurrence is replaced by the substitution's content.
//! A substitution with empty content deletes the first occurrence of its
//! marker instead, together with the line ending when the marker has a
//! line to itself, so no blank line is left behind.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::error::NewprgResult;
use crate::text::{Buffer, DEFAULT_INCREMENT};

/// One marker and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    marker: String,
    content: String,
}

impl Substitution {
    pub fn new(marker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            content: content.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Applies substitutions to templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateInstantiator {
    growth_hint: usize,
}

impl Default for TemplateInstantiator {
    fn default() -> Self {
        Self::new(DEFAULT_INCREMENT)
    }
}

impl TemplateInstantiator {
    /// `growth_hint` is the minimum number of bytes added whenever the
    /// buffer runs out of room.
    pub fn new(growth_hint: usize) -> Self {
        Self { growth_hint }
    }

    /// Apply `substitutions` in order and return the finished text.
    pub fn render(&self, template: &[u8], substitutions: &[Substitution]) -> NewprgResult<Vec<u8>> {
        let mut buffer = Buffer::from_bytes(template, self.growth_hint)?;

        for sub in substitutions {
            if sub.content.is_empty() {
                let removed = remove_marker(&mut buffer, &sub.marker);
                debug!(marker = %sub.marker, removed, "Marker deleted");
            } else {
                let count = buffer.replace_all(&sub.marker, &sub.content, self.growth_hint)?;
                debug!(marker = %sub.marker, count, "Marker substituted");
            }
        }

        Ok(buffer.into_bytes())
    }

    /// Render `template` and write the result to `destination`, replacing
    /// whatever was there.
    #[instrument(skip(self, filesystem, template, substitutions), fields(destination = %destination.display()))]
    pub fn instantiate(
        &self,
        filesystem: &dyn Filesystem,
        template: &[u8],
        substitutions: &[Substitution],
        destination: &Path,
    ) -> NewprgResult<()> {
        let rendered = self.render(template, substitutions)?;
        filesystem.write(destination, &rendered)
    }
}

/// Delete the first `marker`, plus its `\n` when it stands alone on a line.
fn remove_marker(buffer: &mut Buffer, marker: &str) -> bool {
    let Some(at) = buffer.find_from(marker.as_bytes(), 0) else {
        return false;
    };
    let bytes = buffer.as_bytes();
    let after = at + marker.len();
    let line_start = at == 0 || bytes[at - 1] == b'\n';
    let line_end = bytes.get(after) == Some(&b'\n');

    if line_start && line_end {
        buffer.delete_range(at, after + 1);
        true
    } else {
        buffer.delete_first(marker)
    }
}
