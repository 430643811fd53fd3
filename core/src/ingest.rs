//! Latest-wins hand-off between spoke producers and the single pipeline
//! consumer.
//!
//! Producers never block and nothing queues up: offering a message replaces
//! whatever the consumer has not taken yet. The consumer learns how many
//! messages were overwritten since its previous take.

use std::sync::Arc;

use tokio::sync::watch;

use crate::interface::SpokeMessage;

#[derive(Debug, Clone, Default)]
struct Slot {
    sequence: u64,
    message: Option<SpokeMessage>,
}

/// A message taken by the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub message: SpokeMessage,
    /// Messages overwritten before this one was taken.
    pub skipped: u64,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("spoke consumer has shut down")]
pub struct ChannelClosed;

#[derive(Clone)]
pub struct LatestSender {
    tx: Arc<watch::Sender<Slot>>,
}

pub struct LatestReceiver {
    rx: watch::Receiver<Slot>,
    last_sequence: u64,
}

pub fn latest_channel() -> (LatestSender, LatestReceiver) {
    let (tx, rx) = watch::channel(Slot::default());
    (
        LatestSender { tx: Arc::new(tx) },
        LatestReceiver {
            rx,
            last_sequence: 0,
        },
    )
}

impl LatestSender {
    /// Replaces the pending message, if any.
    pub fn offer(&self, message: SpokeMessage) -> Result<(), ChannelClosed> {
        if self.tx.is_closed() {
            return Err(ChannelClosed);
        }
        self.tx.send_modify(|slot| {
            slot.sequence += 1;
            slot.message = Some(message);
        });
        Ok(())
    }
}

impl LatestReceiver {
    /// Waits for the next message. Returns `None` once every sender is gone
    /// and the last message has been taken.
    pub async fn recv(&mut self) -> Option<Delivery> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            if let Some(delivery) = self.take() {
                return Some(delivery);
            }
        }
    }

    /// Takes the pending message without waiting. A message offered just
    /// before the last sender dropped is still handed out once.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        match self.rx.has_changed() {
            Ok(true) | Err(_) => self.take(),
            Ok(false) => None,
        }
    }

    fn take(&mut self) -> Option<Delivery> {
        let slot = self.rx.borrow_and_update();
        if slot.sequence == self.last_sequence {
            return None;
        }
        let message = slot.message.clone()?;
        let skipped = slot.sequence.saturating_sub(self.last_sequence + 1);
        self.last_sequence = slot.sequence;
        Some(Delivery { message, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(stamp: u32) -> SpokeMessage {
        SpokeMessage::new(1201, stamp, vec![stamp as u8])
    }

    #[test]
    fn nothing_pending_before_first_offer() {
        let (_tx, mut rx) = latest_channel();
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn consumer_sees_only_the_latest_message() {
        let (tx, mut rx) = latest_channel();
        tx.offer(message(1)).unwrap();
        tx.offer(message(2)).unwrap();
        tx.offer(message(3)).unwrap();

        let delivery = rx.try_recv().unwrap();
        assert_eq!(delivery.message.sender_stamp, 3);
        assert_eq!(delivery.skipped, 2);
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn messages_taken_in_time_are_not_skipped() {
        let (tx, mut rx) = latest_channel();
        tx.offer(message(1)).unwrap();
        assert_eq!(rx.try_recv().unwrap().skipped, 0);
        tx.offer(message(2)).unwrap();
        let delivery = rx.try_recv().unwrap();
        assert_eq!(delivery.message.sender_stamp, 2);
        assert_eq!(delivery.skipped, 0);
    }

    #[test]
    fn pending_message_survives_sender_drop() {
        let (tx, mut rx) = latest_channel();
        tx.offer(message(7)).unwrap();
        drop(tx);

        let delivery = rx.try_recv().unwrap();
        assert_eq!(delivery.message.sender_stamp, 7);
        assert_eq!(delivery.skipped, 0);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn recv_drains_then_reports_closed() {
        let (tx, mut rx) = latest_channel();
        tx.offer(message(1)).unwrap();
        tx.offer(message(2)).unwrap();
        drop(tx);

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.message.sender_stamp, 2);
        assert_eq!(delivery.skipped, 1);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn offer_fails_after_consumer_drops() {
        let (tx, rx) = latest_channel();
        drop(rx);
        assert_eq!(tx.offer(message(1)), Err(ChannelClosed));
    }
}
