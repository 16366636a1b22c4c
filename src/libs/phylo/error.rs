use std::fmt;

#[derive(Debug)]
pub enum TreeError {
    /// Cannot open, read or write a file or stream
    Io {
        /// What was being done, e.g. "cannot open tree.json"
        context: String,
        source: std::io::Error,
    },
    /// Input is neither Newick nor JSON
    FormatUnrecognized,
    /// Newick grammar violation
    ParseError {
        /// A human-readable message explaining the error
        message: String,
        /// Byte offset from the start of the input
        offset: usize,
        /// Up to 40 characters following the offset
        preview: String,
    },
    /// Unexpected JSON shape or version
    JsonStructure(String),
    /// xz stream cannot be decoded or encoded
    Decompression(String),
    DateFormat(String),
    ColorFormat(String),
    /// The drawing backend cannot be created or flushed
    SurfaceInit(String),
}

impl TreeError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        TreeError::Io {
            context: context.into(),
            source,
        }
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Io { context, source } => write!(f, "{}: {}", context, source),
            TreeError::FormatUnrecognized => {
                write!(f, "cannot import tree: unrecognized source format")
            }
            TreeError::ParseError {
                message,
                offset,
                preview,
            } => write!(f, "{} at {}: \"{}\"", message, offset, preview),
            TreeError::JsonStructure(msg) => write!(f, "cannot import tree: {}", msg),
            TreeError::Decompression(msg) => write!(f, "xz: {}", msg),
            TreeError::DateFormat(msg) => write!(f, "{}", msg),
            TreeError::ColorFormat(msg) => write!(f, "{}", msg),
            TreeError::SurfaceInit(msg) => write!(f, "cannot create pdf surface: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TreeError {
    fn from(e: serde_json::Error) -> Self {
        TreeError::JsonStructure(e.to_string())
    }
}
