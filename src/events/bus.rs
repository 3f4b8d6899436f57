//! The bus itself: publish, invalidate, subscribe, read, stats.
//!
//! Interior mutability throughout: all calls are synchronous and run on one
//! logical thread, but a read callback is allowed to publish back into the
//! bus. A drain-depth guard plus a drain-length snapshot defer such publishes
//! to the next read cycle instead of delivering them inside the same drain.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::channel::{ChannelRing, EventView, Fetched, PayloadWriter};
use super::kinds::{Channel, CHANNEL_COUNT};
use super::mailbox::Subscriber;

#[derive(Clone, Copy, Debug)]
pub struct BusConfig {
    pub ring_capacity: usize,
    pub mailbox_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            ring_capacity: 256,
            mailbox_capacity: 64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelStats {
    pub head: u64,
    pub tick: u64,
    pub overwrite_drops: u64,
    pub tombstone_drops: u64,
    pub stale_drops: u64,
    pub writer_drops: u64,
}

#[derive(Clone, Debug, Default)]
pub struct BusStats {
    pub channels: [ChannelStats; CHANNEL_COUNT],
    pub subscribers: usize,
    pub mailbox_drops: u64,
}

#[derive(Default)]
struct ChannelCounters {
    overwrites: Cell<u64>,
    tombstones: Cell<u64>,
    stale: Cell<u64>,
    writer_failures: Cell<u64>,
}

pub struct EventBus {
    channels: [RefCell<ChannelRing>; CHANNEL_COUNT],
    subscribers: RefCell<HashMap<u32, Subscriber>>,
    // Subscriber ids that unsubscribed at some point, with the head seq per
    // channel at that moment. A later resubscribe starts clean: no backfill.
    resub_epochs: RefCell<HashMap<u32, [u64; CHANNEL_COUNT]>>,
    counters: [ChannelCounters; CHANNEL_COUNT],
    draining: Cell<bool>,
    mailbox_capacity: usize,
}

impl EventBus {
    pub fn new(config: BusConfig) -> Self {
        Self {
            channels: std::array::from_fn(|_| RefCell::new(ChannelRing::new(config.ring_capacity))),
            subscribers: RefCell::new(HashMap::new()),
            resub_epochs: RefCell::new(HashMap::new()),
            counters: Default::default(),
            draining: Cell::new(false),
            mailbox_capacity: config.mailbox_capacity,
        }
    }

    /// Stamp the channel's tick counter; copied into every slot published
    /// until the next stamp.
    pub fn set_tick(&self, channel: Channel, tick: u64) {
        self.channels[channel.index()].borrow_mut().tick = tick;
    }

    /// Publish with an infallible payload writer. Returns the new seq.
    pub fn publish(&self, channel: Channel, kind: u16, writer: impl FnOnce(&mut PayloadWriter)) -> u64 {
        self.try_publish(channel, kind, |w| {
            writer(w);
            Ok(())
        })
        .unwrap_or(0)
    }

    /// Publish with a fallible payload writer. A writer error leaves the slot
    /// invalid and the event is silently dropped, never partially visible.
    pub fn try_publish(
        &self,
        channel: Channel,
        kind: u16,
        writer: impl FnOnce(&mut PayloadWriter) -> Result<(), String>,
    ) -> Option<u64> {
        let ci = channel.index();
        let seq = {
            let mut ring = self.channels[ci].borrow_mut();
            let seq = ring.head + 1;
            ring.head = seq;
            let slot = ring.slot_of(seq);
            if ring.open_slot(slot) {
                self.counters[ci].overwrites.set(self.counters[ci].overwrites.get() + 1);
            }
            if writer(&mut ring.writer(slot)).is_err() {
                self.counters[ci]
                    .writer_failures
                    .set(self.counters[ci].writer_failures.get() + 1);
                return None;
            }
            ring.commit(slot, kind, seq);
            seq
        };

        // Fan out the seq to every interested mailbox. Overflow evicts the
        // oldest entry and counts a per-subscriber drop.
        let mut subs = self.subscribers.borrow_mut();
        for sub in subs.values_mut() {
            if sub.wants(channel, kind) {
                sub.mailboxes[ci].push(seq);
            }
        }
        Some(seq)
    }

    /// Tombstone `seq` if its slot still holds it. Idempotent; invalidating
    /// an already-overwritten seq is a no-op.
    pub fn invalidate(&self, channel: Channel, seq: u64) {
        let ci = channel.index();
        if self.channels[ci].borrow_mut().invalidate(seq) {
            self.counters[ci].tombstones.set(self.counters[ci].tombstones.get() + 1);
        }
    }

    /// Register a subscriber with an interest set. A first-time subscribe may
    /// backfill still-live matching events already in the ring; a resubscribe
    /// after `unsubscribe` never backfills the gap.
    pub fn subscribe(&self, id: u32, wants: &[(Channel, u16)], backfill: bool) {
        let mut sub = Subscriber::new(self.mailbox_capacity);
        sub.set_wants(wants);

        let first_time = !self.resub_epochs.borrow().contains_key(&id)
            && !self.subscribers.borrow().contains_key(&id);
        if backfill && first_time {
            for channel in Channel::ALL {
                let ci = channel.index();
                let ring = self.channels[ci].borrow();
                let head = ring.head;
                let floor = head.saturating_sub(ring.capacity() as u64);
                for seq in (floor + 1)..=head {
                    if let Some(kind) = ring.live_kind(seq) {
                        if sub.wants(channel, kind) {
                            sub.mailboxes[ci].push(seq);
                        }
                    }
                }
            }
        }

        self.subscribers.borrow_mut().insert(id, sub);
    }

    /// Replace the interest set and fast-forward all of the subscriber's
    /// mailboxes, so stale-interest backlog cannot leak into the new set.
    pub fn update_subscription(&self, id: u32, wants: &[(Channel, u16)]) {
        if let Some(sub) = self.subscribers.borrow_mut().get_mut(&id) {
            sub.set_wants(wants);
            for mailbox in &mut sub.mailboxes {
                mailbox.clear();
            }
        }
    }

    /// Drop the subscriber, recording the current heads as an epoch marker.
    pub fn unsubscribe(&self, id: u32) {
        if self.subscribers.borrow_mut().remove(&id).is_some() {
            let heads = std::array::from_fn(|ci| self.channels[ci].borrow().head);
            self.resub_epochs.borrow_mut().insert(id, heads);
        }
    }

    /// Discard all pending mailbox entries for one channel without delivery.
    pub fn fast_forward(&self, id: u32, channel: Channel) {
        if let Some(sub) = self.subscribers.borrow_mut().get_mut(&id) {
            sub.mailboxes[channel.index()].clear();
        }
    }

    /// Drain up to `limit` mailbox entries in FIFO order, re-validating each
    /// seq against the live ring. Returns the number delivered.
    ///
    /// Publishes issued from inside `f` land after the drain snapshot and are
    /// delivered on the next read cycle; a nested read is a no-op.
    pub fn read(
        &self,
        id: u32,
        channel: Channel,
        limit: Option<usize>,
        mut f: impl FnMut(&EventView),
    ) -> usize {
        if self.draining.get() {
            return 0;
        }
        self.draining.set(true);

        let ci = channel.index();
        let pending = self
            .subscribers
            .borrow()
            .get(&id)
            .map_or(0, |s| s.mailboxes[ci].len());
        let max = limit.map_or(pending, |l| l.min(pending));

        let mut delivered = 0;
        for _ in 0..max {
            let seq = match self
                .subscribers
                .borrow_mut()
                .get_mut(&id)
                .and_then(|s| s.mailboxes[ci].pop())
            {
                Some(seq) => seq,
                None => break,
            };
            let fetched = self.channels[ci].borrow().fetch(seq);
            match fetched {
                Fetched::Live(view) => {
                    f(&view);
                    delivered += 1;
                }
                Fetched::Stale => {
                    self.counters[ci].stale.set(self.counters[ci].stale.get() + 1);
                }
                Fetched::Tombstoned => {
                    self.counters[ci].tombstones.set(self.counters[ci].tombstones.get() + 1);
                }
            }
        }

        self.draining.set(false);
        delivered
    }

    /// Pending (undrained) mailbox entries for a subscriber on one channel.
    pub fn pending(&self, id: u32, channel: Channel) -> usize {
        self.subscribers
            .borrow()
            .get(&id)
            .map_or(0, |s| s.mailboxes[channel.index()].len())
    }

    pub fn cursor(&self, id: u32) -> BusCursor<'_> {
        BusCursor { bus: self, id }
    }

    /// Cumulative counters since bus construction.
    pub fn stats(&self) -> BusStats {
        let subs = self.subscribers.borrow();
        BusStats {
            channels: std::array::from_fn(|ci| {
                let ring = self.channels[ci].borrow();
                ChannelStats {
                    head: ring.head,
                    tick: ring.tick,
                    overwrite_drops: self.counters[ci].overwrites.get(),
                    tombstone_drops: self.counters[ci].tombstones.get(),
                    stale_drops: self.counters[ci].stale.get(),
                    writer_drops: self.counters[ci].writer_failures.get(),
                }
            }),
            subscribers: subs.len(),
            mailbox_drops: subs.values().map(|s| s.mailbox_drops()).sum(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

/// Thin per-subscriber handle over the bus.
pub struct BusCursor<'a> {
    bus: &'a EventBus,
    id: u32,
}

impl BusCursor<'_> {
    pub fn read(&self, channel: Channel, limit: Option<usize>, f: impl FnMut(&EventView)) -> usize {
        self.bus.read(self.id, channel, limit, f)
    }

    pub fn fast_forward(&self, channel: Channel) {
        self.bus.fast_forward(self.id, channel);
    }

    pub fn pending(&self, channel: Channel) -> usize {
        self.bus.pending(self.id, channel)
    }
}
