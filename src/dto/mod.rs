//! Wire-format mirrors of the analysis types.
//!
//! Inbound requests convert with TryFrom so every construction
//! invariant is enforced at the boundary; outbound responses flatten
//! the domain types into JSON-friendly shapes (string profile keys,
//! millisecond durations, lowercase enums).

mod request;
mod response;

pub use request::*;
pub use response::*;
