/// Failure to produce a mesh or texture from an asset source.
///
/// None of these are fatal to a render: callers substitute an absent resource
/// and log.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("asset not found: {path}")]
    NotFound { path: String },

    #[error("failed to read asset {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed mesh: {reason}")]
    Malformed { reason: String },

    #[error("mesh contains no vertices")]
    EmptyMesh,

    #[error("failed to decode texture {path}: {reason}")]
    Decode { path: String, reason: String },
}
