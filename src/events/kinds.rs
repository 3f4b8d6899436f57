//! Event kind tags and payload lane layouts shared with the JS renderer.
//!
//! Lane layouts are a bit-exact contract; tooling on the other side of the
//! wasm boundary indexes lanes by these positions.
//!
//! - collision: `u[0]`=body A id, `u[1]`=body B id (0 for static),
//!   `f[0..2]`=normal x/y, `f[2..4]`=contact x/y, `f[4]`=penetration depth
//! - impulse:   `u[0]`=body id, `f[0..2]`=impulse x/y
//! - sleep/wake: `u[0]`=body id
//! - pick:      `u[0]`=body id, `f[0..2]`=point x/y
//! - pointer-move: `f[0..2]`=pointer x/y
//! - perf-row:  `u[0]`=fixed steps run, `u[1]`=body count,
//!   `f[0]`=frame ms, `f[1]`=fixed-step ms
//! - body add/update/remove: `u[0]`=body id, `f[0..2]`=center x/y,
//!   `f[2..4]`=half extents x/y

pub const EV_POINTER_MOVE: u16 = 1;
pub const EV_PERF_ROW: u16 = 2;
pub const EV_COLLISION: u16 = 3;
pub const EV_SLEEP: u16 = 4;
pub const EV_WAKE: u16 = 5;
pub const EV_IMPULSE: u16 = 6;
pub const EV_PICK: u16 = 7;
pub const EV_BODY_ADDED: u16 = 8;
pub const EV_BODY_UPDATED: u16 = 9;
pub const EV_BODY_REMOVED: u16 = 10;

/// Fixed bus channels. Each has its own ring and sequence space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Input/tooling events gathered before the frame runs.
    BeforeFrame,
    /// Physics output, stamped once per fixed step.
    AfterFixedStep,
    /// Presentation-cadence events (perf rows etc).
    AfterFrame,
    /// Out-of-band events delivered outside the frame loop.
    Immediate,
}

pub const CHANNEL_COUNT: usize = 4;

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::BeforeFrame,
        Channel::AfterFixedStep,
        Channel::AfterFrame,
        Channel::Immediate,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::BeforeFrame => 0,
            Channel::AfterFixedStep => 1,
            Channel::AfterFrame => 2,
            Channel::Immediate => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Channel> {
        Channel::ALL.get(index).copied()
    }
}
