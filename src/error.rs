//! Error types for the query client.
//!
//! Local failures (bad input, unusable session, closed handle) are returned
//! as [`Error`]. Outcomes that depend on the network (agent error status,
//! timeout, transport failure) are carried by [`Response`](crate::Response)
//! instead, so callers can match on them without unwrapping an error chain.

use crate::oid::ParseError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The peer could not be resolved, or a local socket could not be set up.
    #[error("cannot open session to {peer}: {source}")]
    Connection {
        peer: String,
        #[source]
        source: std::io::Error,
    },

    /// A requested OID string was malformed. Raised before any I/O.
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("GET request needs at least one OID")]
    EmptyRequest,

    #[error("timeout must be greater than zero and small enough to schedule a deadline")]
    InvalidTimeout,

    /// The handle was closed; open a new one from the session.
    #[error("handle is closed")]
    Closed,

    #[error("cannot encode request: {0}")]
    Encode(String),
}

/// SNMP error-status codes (RFC 1157, RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    Unknown(i32),
}

impl ErrorStatus {
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => {
                tracing::warn!(target: "snmp_query::error", { snmp.error_status = other }, "unknown SNMP error status");
                Self::Unknown(other)
            }
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }

    /// Human-readable reason in the wording of the net-snmp error table.
    pub fn reason(&self) -> String {
        let text = match self {
            Self::NoError => "(noError) No Error",
            Self::TooBig => "(tooBig) Response message would have been too large.",
            Self::NoSuchName => "(noSuchName) There is no such variable name in this MIB.",
            Self::BadValue => "(badValue) The value given has the wrong type or length.",
            Self::ReadOnly => {
                "(readOnly) The two parties used do not have access to use the specified SNMP PDU."
            }
            Self::GenErr => "(genError) A general failure occurred",
            Self::NoAccess => "noAccess",
            Self::WrongType => {
                "wrongType (The set datatype does not match the data type the agent expects)"
            }
            Self::WrongLength => {
                "wrongLength (The set value has an illegal length from what the agent expects)"
            }
            Self::WrongEncoding => "wrongEncoding",
            Self::WrongValue => "wrongValue (The set value is illegal or unsupported in some way)",
            Self::NoCreation => {
                "noCreation (That table does not support row creation or that object can not ever be created)"
            }
            Self::InconsistentValue => {
                "inconsistentValue (The set value is illegal or unsupported in some way)"
            }
            Self::ResourceUnavailable => {
                "resourceUnavailable (This is likely a out-of-memory failure within the agent)"
            }
            Self::CommitFailed => "commitFailed",
            Self::UndoFailed => "undoFailed",
            Self::AuthorizationError => "authorizationError (access denied to that object)",
            Self::NotWritable => "notWritable (That object does not support modification)",
            Self::InconsistentName => {
                "inconsistentName (That object can not currently be created)"
            }
            Self::Unknown(code) => return format!("Unknown Error {}", code),
        };
        text.to_string()
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}
