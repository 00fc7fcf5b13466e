/// Target-system transport errors.
///
/// Expected business outcomes (duplicate key, missing parent) are not
/// errors; they are carried by `TargetOutcome` in recsync-clients. This
/// enum only covers failures to exchange a request at all.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("network error calling target: {reason}")]
    Network { reason: String },

    #[error("target returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed target response envelope: {reason}")]
    BadEnvelope { reason: String },
}
