//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! caller builds RequestSpec
//!     → request.rs (validate, normalize → PreparedRequest)
//!     → dispatcher.rs (pick transport, catch every error)
//!         → transport::raw_socket  (write + close, no response)
//!         → transport::http_client (await response → RequestOutcome)
//!     → completion.rs (classify outcome, write sink entries)
//! ```
//!
//! # Design Decisions
//! - `dispatch` never returns an outcome or an error to the caller
//! - Every failure produces exactly one error entry in the sink
//! - Transport choice is a closed `match`, never a lookup by name

pub mod completion;
pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod request;

pub use completion::RouteContext;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, TransportError};
pub use outcome::{OutcomeStatus, RequestOutcome};
pub use request::{HttpMethod, PreparedRequest, RequestSpec};
