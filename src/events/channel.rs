//! Per-channel ring storage.
//!
//! Slots are structure-of-arrays: header fields and the four payload lane
//! buffers are flat arrays sliced per slot, not per-event heap objects. A
//! slot's `seq` uniquely identifies the logical event that last occupied it.

/// Payload lanes of each numeric type per slot.
pub const LANES: usize = 8;

pub(super) struct ChannelRing {
    capacity: usize,
    pub(super) head: u64,
    pub(super) tick: u64,
    ids: Vec<u16>,
    seqs: Vec<u64>,
    ticks: Vec<u64>,
    valid: Vec<bool>,
    lane_f: Vec<f32>,
    lane_i: Vec<i32>,
    lane_u: Vec<u32>,
    lane_s: Vec<u16>,
}

/// Write access to one slot's payload lanes. Out-of-range lanes are ignored.
pub struct PayloadWriter<'a> {
    f: &'a mut [f32],
    i: &'a mut [i32],
    u: &'a mut [u32],
    s: &'a mut [u16],
}

impl PayloadWriter<'_> {
    #[inline]
    pub fn f(&mut self, lane: usize, value: f32) {
        if let Some(v) = self.f.get_mut(lane) {
            *v = value;
        }
    }

    #[inline]
    pub fn i(&mut self, lane: usize, value: i32) {
        if let Some(v) = self.i.get_mut(lane) {
            *v = value;
        }
    }

    #[inline]
    pub fn u(&mut self, lane: usize, value: u32) {
        if let Some(v) = self.u.get_mut(lane) {
            *v = value;
        }
    }

    #[inline]
    pub fn sym(&mut self, lane: usize, value: u16) {
        if let Some(v) = self.s.get_mut(lane) {
            *v = value;
        }
    }
}

/// A copied-out event: header plus payload lanes.
///
/// Reads copy the slot before invoking the subscriber callback, so a callback
/// that publishes back into the bus can never observe a torn slot.
#[derive(Clone, Copy, Debug)]
pub struct EventView {
    pub kind: u16,
    pub seq: u64,
    pub tick: u64,
    f: [f32; LANES],
    i: [i32; LANES],
    u: [u32; LANES],
    s: [u16; LANES],
}

impl EventView {
    #[inline]
    pub fn f(&self, lane: usize) -> f32 {
        self.f.get(lane).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn i(&self, lane: usize) -> i32 {
        self.i.get(lane).copied().unwrap_or(0)
    }

    #[inline]
    pub fn u(&self, lane: usize) -> u32 {
        self.u.get(lane).copied().unwrap_or(0)
    }

    #[inline]
    pub fn sym(&self, lane: usize) -> u16 {
        self.s.get(lane).copied().unwrap_or(0)
    }
}

/// Outcome of re-validating a remembered seq against the live ring.
pub(super) enum Fetched {
    Live(EventView),
    Stale,
    Tombstoned,
}

impl ChannelRing {
    pub(super) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            head: 0,
            tick: 0,
            ids: vec![0; capacity],
            seqs: vec![0; capacity],
            ticks: vec![0; capacity],
            valid: vec![false; capacity],
            lane_f: vec![0.0; capacity * LANES],
            lane_i: vec![0; capacity * LANES],
            lane_u: vec![0; capacity * LANES],
            lane_s: vec![0; capacity * LANES],
        }
    }

    #[inline]
    pub(super) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seqs start at 1; 0 means "never occupied".
    #[inline]
    pub(super) fn slot_of(&self, seq: u64) -> usize {
        ((seq - 1) % self.capacity as u64) as usize
    }

    /// Clear a slot ahead of a write. Returns true when a still-valid event
    /// was overwritten (channel overflow).
    pub(super) fn open_slot(&mut self, slot: usize) -> bool {
        let was_valid = self.valid[slot];
        self.valid[slot] = false;
        self.seqs[slot] = 0;
        let base = slot * LANES;
        self.lane_f[base..base + LANES].fill(0.0);
        self.lane_i[base..base + LANES].fill(0);
        self.lane_u[base..base + LANES].fill(0);
        self.lane_s[base..base + LANES].fill(0);
        was_valid
    }

    pub(super) fn writer(&mut self, slot: usize) -> PayloadWriter<'_> {
        let base = slot * LANES;
        PayloadWriter {
            f: &mut self.lane_f[base..base + LANES],
            i: &mut self.lane_i[base..base + LANES],
            u: &mut self.lane_u[base..base + LANES],
            s: &mut self.lane_s[base..base + LANES],
        }
    }

    /// Atomically publish the header; the slot becomes visible to readers.
    pub(super) fn commit(&mut self, slot: usize, kind: u16, seq: u64) {
        self.ids[slot] = kind;
        self.seqs[slot] = seq;
        self.ticks[slot] = self.tick;
        self.valid[slot] = true;
    }

    /// Tombstone the slot if it still holds exactly `seq`. Idempotent.
    /// Returns true only for a genuine first invalidation.
    pub(super) fn invalidate(&mut self, seq: u64) -> bool {
        if seq == 0 || seq > self.head {
            return false;
        }
        let slot = self.slot_of(seq);
        if self.seqs[slot] == seq && self.valid[slot] {
            self.valid[slot] = false;
            return true;
        }
        false
    }

    pub(super) fn fetch(&self, seq: u64) -> Fetched {
        let slot = self.slot_of(seq);
        if self.seqs[slot] != seq {
            return Fetched::Stale;
        }
        if !self.valid[slot] {
            return Fetched::Tombstoned;
        }
        let base = slot * LANES;
        let mut view = EventView {
            kind: self.ids[slot],
            seq,
            tick: self.ticks[slot],
            f: [0.0; LANES],
            i: [0; LANES],
            u: [0; LANES],
            s: [0; LANES],
        };
        view.f.copy_from_slice(&self.lane_f[base..base + LANES]);
        view.i.copy_from_slice(&self.lane_i[base..base + LANES]);
        view.u.copy_from_slice(&self.lane_u[base..base + LANES]);
        view.s.copy_from_slice(&self.lane_s[base..base + LANES]);
        Fetched::Live(view)
    }

    /// Kind of the slot currently holding `seq`, if it is still live.
    pub(super) fn live_kind(&self, seq: u64) -> Option<u16> {
        let slot = self.slot_of(seq);
        if self.seqs[slot] == seq && self.valid[slot] {
            Some(self.ids[slot])
        } else {
            None
        }
    }
}
