use std::path::PathBuf;

/// Everything that can abort a conversion run.
///
/// None of these are recoverable: the pipeline stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("palette entry {index} has no namespace separator: {name:?}")]
    MalformedPaletteEntry { index: usize, name: String },

    #[error("block array holds {actual} entries but extents {x}x{y}x{z} need {expected}")]
    ExtentMismatch {
        x: u32,
        y: u32,
        z: u32,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported tag value for key {key:?}: {kind}")]
    UnsupportedTag { key: String, kind: String },

    #[error("block at y={y} is outside the world height {min_y}..{max_y}")]
    BlockOutOfRange { y: i32, min_y: i32, max_y: i32 },

    #[error("world height {min_y}..{max_y} is not a range of whole sections")]
    InvalidWorldHeight { min_y: i32, max_y: i32 },

    #[error("unknown dimension {0:?}")]
    UnknownDimension(String),

    #[error("NBT encoding failed: {0}")]
    Encoding(#[from] fastnbt::error::Error),

    #[error("cannot read input {path:?}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("persistence failure at {path:?}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
