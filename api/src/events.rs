use crate::session::Session;

/// Which mutation a write performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum WriteKind {
    #[strum(to_string = "initialize record")]
    Initialize,
    #[strum(to_string = "append link")]
    Append,
}

/// Published after something that invalidates the local item list.
///
/// The subscriber answers every event with a fresh read of the shared record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    SessionEstablished(Session),
    WriteCompleted(WriteKind),
    /// The user asked for a re-read.
    RefreshRequested,
}
