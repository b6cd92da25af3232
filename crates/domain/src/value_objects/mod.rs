//! Value objects - Immutable objects without identity

mod sender_profile;

pub use sender_profile::SenderProfile;
