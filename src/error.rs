use crate::event::EventError;

/// Error type
#[derive(Debug)]
pub enum Error {
    /// An IO error.
    Io(std::io::Error),

    /// Error in storage engine.
    Storage(fjall::Error),

    /// A stored event could not be decoded.
    Decode(&'static str),

    /// The interval selector was missing (`None`) or not one of
    /// `minute`, `hour`, `day`.
    InvalidInterval(Option<String>),

    /// An event was rejected on ingestion.
    InvalidEvent(EventError),

    /// The event store failed while serving a query.
    ///
    /// No partial results are returned in that case.
    UpstreamFetch(Box<Error>),
}

impl Error {
    /// Returns `true` if the error was caused by caller input
    /// (bad interval selector or bad event), rather than by the store.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInterval(_) | Self::InvalidEvent(_))
    }
}

impl From<fjall::Error> for Error {
    fn from(value: fjall::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<EventError> for Error {
    fn from(value: EventError) -> Self {
        Self::InvalidEvent(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => {
                write!(f, "{e}")
            }
            Self::Io(e) => {
                write!(f, "{e}")
            }
            Self::Decode(msg) => {
                write!(f, "corrupted event record: {msg}")
            }
            Self::InvalidInterval(None) => {
                write!(f, "interval is required")
            }
            Self::InvalidInterval(Some(value)) => {
                write!(f, "invalid interval value: {value:?}")
            }
            Self::InvalidEvent(e) => {
                write!(f, "{e}")
            }
            Self::UpstreamFetch(e) => {
                write!(f, "failed to fetch events: {e}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::InvalidEvent(e) => Some(e),
            Self::UpstreamFetch(e) => Some(e.as_ref()),
            Self::Decode(_) | Self::InvalidInterval(_) => None,
        }
    }
}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn classify_client_errors() {
        assert!(Error::InvalidInterval(None).is_client_error());
        assert!(Error::InvalidEvent(EventError::InvalidTimestamp).is_client_error());
        assert!(!Error::Decode("short key").is_client_error());
        assert!(!Error::UpstreamFetch(Box::new(Error::Decode("short key"))).is_client_error());
    }

    #[test_log::test]
    fn display_interval_errors() {
        assert_eq!("interval is required", Error::InvalidInterval(None).to_string());
        assert_eq!(
            "invalid interval value: \"week\"",
            Error::InvalidInterval(Some("week".into())).to_string(),
        );
    }
}
