//! The abstract transport the share manager talks to: two methods per party,
//! `send`/`recv`, carrying tagged envelopes over FIFO per-pair links.

use async_trait::async_trait;
use math_lib::GF;
use std::collections::HashMap;
use tokio::sync::{mpsc, Mutex};

/// Wire tag distinguishing a single-share opening from the two rounds of a batch opening.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    /// A single-share opening (`'S'` on the wire, code `0x01`).
    Single,
    /// Round 1 of a batch opening (`'R1'`, code `0x02`).
    Round1,
    /// Round 2 of a batch opening (`'R2'`, code `0x03`).
    Round2,
}

impl Tag {
    /// The wire code for this tag, per the persisted message format.
    pub fn code(self) -> u8 {
        match self {
            Tag::Single => 0x01,
            Tag::Round1 => 0x02,
            Tag::Round2 => 0x03,
        }
    }

    /// Recovers a tag from its wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Tag::Single),
            0x02 => Some(Tag::Round1),
            0x03 => Some(Tag::Round2),
            _ => None,
        }
    }
}

/// A single message routed between two parties: a tagged, share-id-addressed list of field
/// elements. `Single` messages always carry exactly one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Which opening protocol this message belongs to.
    pub tag: Tag,
    /// The opening this message is addressed to.
    pub share_id: u64,
    /// The field elements carried by this message.
    pub payload: Vec<GF>,
}

impl Envelope {
    /// Builds a single-share envelope.
    pub fn single(share_id: u64, value: GF) -> Self {
        Self { tag: Tag::Single, share_id, payload: vec![value] }
    }

    /// Builds a round-1 batch envelope.
    pub fn round1(share_id: u64, values: Vec<GF>) -> Self {
        Self { tag: Tag::Round1, share_id, payload: values }
    }

    /// Builds a round-2 batch envelope.
    pub fn round2(share_id: u64, values: Vec<GF>) -> Self {
        Self { tag: Tag::Round2, share_id, payload: values }
    }
}

/// Failure delivering or receiving a message.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The destination party could not be reached.
    #[error("peer {0} unreachable")]
    PeerUnreachable(usize),
    /// The transport was closed and no further messages will arrive.
    #[error("router closed")]
    Closed,
}

/// The transport contract the share manager is built on: point-to-point send, and a blocking
/// receive that yields the next message from any peer along with its sender's party index.
///
/// Implementations must deliver messages between any two parties in FIFO order; no ordering
/// is required across different senders.
#[async_trait]
pub trait Router: Send + Sync {
    /// Sends `envelope` to party `dest`.
    async fn send(&self, dest: usize, envelope: Envelope) -> Result<(), RouterError>;

    /// Blocks until the next message addressed to this party arrives, returning its sender.
    ///
    /// Implementations only need to support a single concurrent caller of `recv` (the
    /// context's background receive loop); `send` may be called concurrently from many tasks.
    async fn recv(&self) -> Result<(usize, Envelope), RouterError>;
}

/// An in-memory [Router] connecting `n` parties via bounded channels, for tests and the
/// in-process program runner. Built with [SimpleRouter::network].
pub struct SimpleRouter {
    my_id: usize,
    senders: HashMap<usize, mpsc::Sender<(usize, Envelope)>>,
    receiver: Mutex<mpsc::Receiver<(usize, Envelope)>>,
}

impl SimpleRouter {
    /// Builds a fully connected network of `n` in-memory routers, one per party.
    pub fn network(n: usize) -> Vec<Self> {
        const CHANNEL_CAPACITY: usize = 1024;
        let mut senders = Vec::with_capacity(n);
        let mut receivers = Vec::with_capacity(n);
        for _ in 0..n {
            let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
            senders.push(tx);
            receivers.push(rx);
        }
        receivers
            .into_iter()
            .enumerate()
            .map(|(my_id, receiver)| {
                let senders = senders.iter().enumerate().map(|(id, tx)| (id, tx.clone())).collect();
                SimpleRouter { my_id, senders, receiver: Mutex::new(receiver) }
            })
            .collect()
    }
}

#[async_trait]
impl Router for SimpleRouter {
    async fn send(&self, dest: usize, envelope: Envelope) -> Result<(), RouterError> {
        let sender = self.senders.get(&dest).ok_or(RouterError::PeerUnreachable(dest))?;
        sender.send((self.my_id, envelope)).await.map_err(|_| RouterError::PeerUnreachable(dest))
    }

    async fn recv(&self) -> Result<(usize, Envelope), RouterError> {
        self.receiver.lock().await.recv().await.ok_or(RouterError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_codes_round_trip() {
        for tag in [Tag::Single, Tag::Round1, Tag::Round2] {
            assert_eq!(Tag::from_code(tag.code()), Some(tag));
        }
        assert_eq!(Tag::from_code(0xff), None);
    }

    #[tokio::test]
    async fn delivers_between_two_parties() {
        let mut network = SimpleRouter::network(3);
        let party1 = network.remove(1);
        let party0 = network.remove(0);

        party0.send(1, Envelope::single(7, GF::from_u64(42))).await.unwrap();
        let (src, envelope) = party1.recv().await.unwrap();
        assert_eq!(src, 0);
        assert_eq!(envelope, Envelope::single(7, GF::from_u64(42)));
    }

    #[tokio::test]
    async fn send_to_unknown_peer_fails() {
        let mut network = SimpleRouter::network(2);
        let party0 = network.remove(0);
        let result = party0.send(9, Envelope::single(0, GF::zero())).await;
        assert_eq!(result, Err(RouterError::PeerUnreachable(9)));
    }
}
