pub mod clock;
pub mod error;
pub mod identity;
pub mod invitations;
pub mod lifecycle;
pub mod pairing;
pub mod relationships;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::PairingError;
pub use identity::{IdentityError, IdentityProvider, ProxyHeaderIdentity};
pub use lifecycle::{deletion_deadline, ResumeOutcome, GRACE_PERIOD_DAYS};
