//! Per-subscriber mailboxes and interest sets.
//!
//! A mailbox holds seq references, not payload copies; payloads are read
//! lazily from the channel ring at drain time. On overflow the oldest entry
//! is evicted to admit the newest (recency over completeness).

use std::collections::VecDeque;

use super::kinds::{Channel, CHANNEL_COUNT};

pub(super) struct Mailbox {
    queue: VecDeque<u64>,
    capacity: usize,
    drops: u64,
}

impl Mailbox {
    pub(super) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            drops: 0,
        }
    }

    pub(super) fn push(&mut self, seq: u64) {
        if self.queue.len() >= self.capacity {
            self.queue.pop_front();
            self.drops += 1;
        }
        self.queue.push_back(seq);
    }

    pub(super) fn pop(&mut self) -> Option<u64> {
        self.queue.pop_front()
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(super) fn clear(&mut self) {
        self.queue.clear();
    }

    #[inline]
    pub(super) fn drops(&self) -> u64 {
        self.drops
    }
}

pub(super) struct Subscriber {
    wants: [Vec<u16>; CHANNEL_COUNT],
    pub(super) mailboxes: [Mailbox; CHANNEL_COUNT],
}

impl Subscriber {
    pub(super) fn new(mailbox_capacity: usize) -> Self {
        Self {
            wants: Default::default(),
            mailboxes: std::array::from_fn(|_| Mailbox::new(mailbox_capacity)),
        }
    }

    /// Replace the interest set. Wants are deduplicated per (channel, kind).
    pub(super) fn set_wants(&mut self, wants: &[(Channel, u16)]) {
        for list in &mut self.wants {
            list.clear();
        }
        for &(channel, kind) in wants {
            let list = &mut self.wants[channel.index()];
            if let Err(pos) = list.binary_search(&kind) {
                list.insert(pos, kind);
            }
        }
    }

    #[inline]
    pub(super) fn wants(&self, channel: Channel, kind: u16) -> bool {
        self.wants[channel.index()].binary_search(&kind).is_ok()
    }

    pub(super) fn mailbox_drops(&self) -> u64 {
        self.mailboxes.iter().map(|m| m.drops()).sum()
    }
}
