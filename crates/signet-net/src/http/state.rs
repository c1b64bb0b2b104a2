//! Request lifecycle state.

/// Readiness of a request's underlying transport.
///
/// The progression for a successful exchange is strictly
/// `Unsent → Opened → HeadersReceived → Loading → Done`; failed, aborted
/// and timed-out exchanges jump to `Done` before their terminal
/// notification fires. The enum is defined independently of the
/// transport's numeric readiness codes and mapped from them through
/// [`RequestState::from_transport_code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestState {
    /// The transport has not been opened yet.
    Unsent,
    /// The transport has been opened with a method and url.
    Opened,
    /// Response status and headers have been received.
    HeadersReceived,
    /// The response body is being received.
    Loading,
    /// The exchange is finished (successfully or not).
    Done,
}

impl RequestState {
    /// Map a transport readiness code onto the state enum.
    ///
    /// Returns `None` for codes the transport contract does not define.
    pub(crate) fn from_transport_code(code: u8) -> Option<Self> {
        match code {
            super::transport::READY_STATE_UNSENT => Some(Self::Unsent),
            super::transport::READY_STATE_OPENED => Some(Self::Opened),
            super::transport::READY_STATE_HEADERS_RECEIVED => Some(Self::HeadersReceived),
            super::transport::READY_STATE_LOADING => Some(Self::Loading),
            super::transport::READY_STATE_DONE => Some(Self::Done),
            _ => None,
        }
    }

    /// Check whether the exchange has finished.
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsent => write!(f, "unsent"),
            Self::Opened => write!(f, "opened"),
            Self::HeadersReceived => write!(f, "headers-received"),
            Self::Loading => write!(f, "loading"),
            Self::Done => write!(f, "done"),
        }
    }
}
