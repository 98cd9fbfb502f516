use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtilError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid array length: got {len}, expected {expected}")]
    InvalidArrayLength { len: usize, expected: usize },

    #[error("invalid json string")]
    InvalidJsonString,

    #[error("invalid json int")]
    InvalidJsonInt,

    #[error("invalid json float")]
    InvalidJsonFloat,

    #[error("invalid json bool")]
    InvalidJsonBool,

    #[error("invalid json array")]
    InvalidJsonArray,

    #[error("invalid json object")]
    InvalidJsonObject,

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("duplicate name in weights: {0}")]
    DuplicateWeightName(String),

    #[error("duplicate msg ctx")]
    DuplicateMsgCtx,

    #[error("no msg ctx")]
    NoMsgCtx,

    #[error("invalid msg name: {0}")]
    InvalidMsgName(String),

    #[error("no msg name")]
    NoMsgName,

    #[error("Channel closed unexpectedly")]
    ChannelClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logger error: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, UtilError>;

impl UtilError {
    /// True for errors caused by the shape or content of caller input rather
    /// than by the filesystem or a stopped collector.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            UtilError::Json(_)
                | UtilError::InvalidArrayLength { .. }
                | UtilError::InvalidJsonString
                | UtilError::InvalidJsonInt
                | UtilError::InvalidJsonFloat
                | UtilError::InvalidJsonBool
                | UtilError::InvalidJsonArray
                | UtilError::InvalidJsonObject
                | UtilError::InvalidNumber(_)
                | UtilError::InvalidVersion(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UtilError::InvalidArrayLength {
            len: 5,
            expected: 6,
        };
        assert_eq!(err.to_string(), "invalid array length: got 5, expected 6");
        assert_eq!(
            UtilError::InvalidVersion("1.2".to_string()).to_string(),
            "invalid version: 1.2"
        );
        assert_eq!(UtilError::NoMsgCtx.to_string(), "no msg ctx");
    }

    #[test]
    fn test_malformed_input_classification() {
        assert!(UtilError::InvalidJsonInt.is_malformed_input());
        assert!(UtilError::InvalidVersion("x".to_string()).is_malformed_input());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!UtilError::from(io).is_malformed_input());
        assert!(!UtilError::ChannelClosed.is_malformed_input());
    }
}
