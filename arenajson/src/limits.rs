// SPDX-License-Identifier: Apache-2.0

/// Nesting depth allowed by [`Limits::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Bounds applied while parsing.
///
/// Depth counts open arrays and objects, so `[]` has depth 1 and `[[]]` depth 2.
/// Recursion in the parser follows nesting, which makes the depth cap the
/// stack-usage cap as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of arrays and objects.
    pub max_depth: usize,
    /// Maximum input length in bytes.
    pub max_input_size: usize,
}

impl Limits {
    pub const DEFAULT_MAX_DEPTH: usize = DEFAULT_MAX_DEPTH;

    /// Default limits: depth 128, any input size.
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_size: usize::MAX,
        }
    }

    /// Tight limits for untrusted input.
    pub const fn strict() -> Self {
        Self {
            max_depth: 32,
            max_input_size: 1024 * 1024, // 1 MiB
        }
    }

    /// Generous limits for trusted, deeply nested documents.
    pub const fn lenient() -> Self {
        Self {
            max_depth: 512,
            max_input_size: usize::MAX,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_input_size(mut self, max_input_size: usize) -> Self {
        self.max_input_size = max_input_size;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}
