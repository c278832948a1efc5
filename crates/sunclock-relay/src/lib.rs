//! Phone-side relay between a wearable, the phone's location services and
//! the configuration pages.
//!
//! Every host event is handled by [`Relay::handle`], which decides the
//! delivery channel and starts at most one guarded pipeline per operation
//! kind. Host services are reached through the [`Host`],
//! [`LocationProvider`], [`FlareFeed`] and [`PlaceResolver`] traits.

pub mod flares;
pub mod formatter;
pub mod geocode;
pub mod guard;
pub mod host;
pub mod location;
pub mod router;
pub mod session;

pub use flares::{lookup_flares, FlareFeed};
pub use formatter::{Delivery, ResultFormatter};
pub use geocode::{resolve_place, PlaceResolver, GEOCODE_FAILED_PLACE, GEOCODE_TIMEOUT_PLACE};
pub use guard::{guarded, GuardElapsed, TaskSlot};
pub use host::{Host, HostError, HostEvent};
pub use location::{
    request_position, LocationFailure, LocationProvider, Position, PositionOptions, ProviderError,
    GUARD_TIMEOUT_MESSAGE,
};
pub use router::{Relay, RelayBuilder};
pub use session::Session;
