//! Transcoder configuration, fixed at construction.

/// Default nesting ceiling, the same recursion limit `serde_json` parses with.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How the decoder represents number, string and binary sets in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetRepresentation {
    /// Wrap each set in its sentinel object, so the set type is explicit in the document.
    #[default]
    Tagged,
    /// Emit sets as plain arrays. They still re-encode to the same set, through array
    /// inference; binary members remain blob sentinels.
    Plain,
}

/// Where the encoder drops null-valued object properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Drop null properties from every object, at any depth.
    #[default]
    Recursive,
    /// Drop null properties from the root object only; nested maps keep `NULL` attributes.
    TopLevel,
}

/// Options shared by encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscoderConfig {
    pub set_representation: SetRepresentation,
    pub null_policy: NullPolicy,
    /// Maximum container nesting accepted in either direction.
    pub max_depth: usize,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            set_representation: SetRepresentation::default(),
            null_policy: NullPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TranscoderConfig {
    pub fn with_set_representation(mut self, set_representation: SetRepresentation) -> Self {
        self.set_representation = set_representation;
        self
    }

    pub fn with_null_policy(mut self, null_policy: NullPolicy) -> Self {
        self.null_policy = null_policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
