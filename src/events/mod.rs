//! Event Bus - typed multi-channel publish/subscribe transport
//!
//! Four fixed channels, each an independent fixed-capacity ring with its own
//! sequence space. Subscribers get bounded mailboxes of seq references and
//! read payloads lazily from the ring, so an overwritten or tombstoned slot
//! is detected (and counted) at read time instead of being misread.

mod channel;
mod mailbox;
mod bus;
pub mod kinds;

pub use channel::{EventView, PayloadWriter, LANES};
pub use bus::{BusConfig, BusCursor, BusStats, ChannelStats, EventBus};
pub use kinds::Channel;
