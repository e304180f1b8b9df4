use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkinToneError {
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("no face detected")]
    NoFaceDetected,

    #[error("face region ({x}, {y}, {w}x{h}) is empty after clipping to the image")]
    EmptyRegion { x: i32, y: i32, w: u32, h: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load face detection model: {0}")]
    ModelLoad(String),

    #[error("no face detector configured")]
    MissingDetector,
}

impl SkinToneError {
    /// Whether the failure is caused by the submitted photo rather than by
    /// the service itself.
    ///
    /// Transport layers map `true` to a client error (the photo should be
    /// retaken or re-uploaded) and `false` to a server error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SkinToneError::DecodeError(_)
                | SkinToneError::ZeroDimensions
                | SkinToneError::NoFaceDetected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_problems_are_client_errors() {
        assert!(SkinToneError::NoFaceDetected.is_client_error());
        assert!(SkinToneError::ZeroDimensions.is_client_error());
        assert!(SkinToneError::DecodeError("bad".into()).is_client_error());
    }

    #[test]
    fn empty_region_is_a_server_error() {
        let err = SkinToneError::EmptyRegion {
            x: 500,
            y: 500,
            w: 10,
            h: 10,
        };
        assert!(!err.is_client_error());
        assert_eq!(
            err.to_string(),
            "face region (500, 500, 10x10) is empty after clipping to the image"
        );
    }
}
