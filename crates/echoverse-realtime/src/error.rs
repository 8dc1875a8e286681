use thiserror::Error;

/// Errors surfaced by the session API.
///
/// The sync core never propagates channel failures upward; failures there
/// are logged and absorbed. This type only marks lifecycle misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RealtimeError {
    #[error("realtime session is not running")]
    NotStarted,
}
