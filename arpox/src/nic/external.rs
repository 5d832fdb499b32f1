//! A stub nic whose buffers come from an external source.
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::layer::{Error, Result};
use crate::time::Instant;

use super::Device;

/// A device backed by in-memory queues.
///
/// Frames to be received are pushed by the owner, sent frames are collected until taken. Time only
/// moves when set explicitly which makes this the device of choice for deterministic tests.
#[derive(Debug, Default)]
pub struct External {
    /// Frames waiting to be received.
    recv: VecDeque<Vec<u8>>,

    /// Frames that have been sent.
    sent: Vec<Vec<u8>>,

    /// Maximum number of sent frames held before refusing more.
    capacity: Option<usize>,

    /// The timestamp reported for all operations.
    timestamp: Instant,
}

impl External {
    /// A new device with no frames and unbounded send queue, at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of sent frames held by the device.
    ///
    /// Sending fails with `Error::Exhausted` while that many frames have not been taken.
    pub fn set_send_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
    }

    /// Queue a frame to be received.
    pub fn push_received(&mut self, frame: Vec<u8>) {
        self.recv.push_back(frame);
    }

    /// Remaining number of frames to receive.
    pub fn to_recv(&self) -> usize {
        self.recv.len()
    }

    /// All frames sent and not yet taken, oldest first.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Take all sent frames, emptying the send queue.
    pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.sent)
    }

    /// Update the timestamp on all future operations.
    pub fn set_current_time(&mut self, instant: Instant) {
        self.timestamp = instant;
    }
}

impl Device for External {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        match self.capacity {
            Some(capacity) if self.sent.len() >= capacity => Err(Error::Exhausted),
            _ => {
                self.sent.push(frame.to_vec());
                Ok(())
            }
        }
    }

    fn receive(&mut self) -> Option<Vec<u8>> {
        self.recv.pop_front()
    }

    fn timestamp(&self) -> Instant {
        self.timestamp
    }
}
