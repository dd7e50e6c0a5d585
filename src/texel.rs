use crate::error::TexelError;
use crate::math::Texel;

/// Location of an entity's samples inside the mesh texel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TexelSpan {
    offset: usize,
    count: usize,
}

impl TexelSpan {
    /// Index of the entity's first texel within the buffer.
    #[must_use]
    pub fn offset(self) -> usize {
        self.offset
    }

    /// Number of samples the entity owns.
    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    /// Translates a local texel index into a buffer index.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::OutOfRange`] if `local` is not below the sample count.
    pub fn global_index(self, local: usize) -> Result<usize, TexelError> {
        if local < self.count {
            Ok(self.offset + local)
        } else {
            Err(TexelError::OutOfRange {
                index: local,
                count: self.count,
            })
        }
    }

    fn end(self) -> usize {
        self.offset + self.count
    }
}

/// Append-only storage for the color/displacement samples of every entity.
///
/// Spans are appended whole and never move, so an index handed out by an
/// earlier pass keeps resolving to the same sample.
#[derive(Debug, Clone, Default)]
pub struct TexelBuffer {
    texels: Vec<Texel>,
}

impl TexelBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of samples stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texels.len()
    }

    /// Whether the buffer holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    /// Appends `samples` as one contiguous span.
    pub fn append(&mut self, samples: &[Texel]) -> TexelSpan {
        let span = TexelSpan {
            offset: self.texels.len(),
            count: samples.len(),
        };
        self.texels.extend_from_slice(samples);
        span
    }

    /// Returns the sample at `local` within `span`.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::OutOfRange`] if `local` exceeds the span, or the
    /// span itself was not issued by this buffer.
    pub fn get(&self, span: TexelSpan, local: usize) -> Result<&Texel, TexelError> {
        let index = span.global_index(local)?;
        self.texels.get(index).ok_or(TexelError::OutOfRange {
            index,
            count: self.texels.len(),
        })
    }

    /// Returns every sample of `span`.
    ///
    /// # Errors
    ///
    /// Returns [`TexelError::OutOfRange`] if the span reaches past the buffer.
    pub fn samples(&self, span: TexelSpan) -> Result<&[Texel], TexelError> {
        self.texels
            .get(span.offset..span.end())
            .ok_or(TexelError::OutOfRange {
                index: span.end(),
                count: self.texels.len(),
            })
    }

    /// Drops samples appended after `mark`.
    ///
    /// Only used to roll back a cancelled pass, whose spans were never
    /// visible to readers.
    pub(crate) fn truncate(&mut self, mark: usize) {
        self.texels.truncate(mark);
    }
}
