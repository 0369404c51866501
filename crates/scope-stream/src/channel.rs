//! Bounded frame conduit between acquisition and presentation
//!
//! Built on a broadcast ring so the producer's `send` never blocks:
//! when the consumer falls behind by more than the capacity the oldest
//! unread frames are evicted. Bounded staleness is preferred over
//! stalling the sampling clock or growing memory without limit. The
//! consumer observes evictions as a counted overflow, never as an
//! error, and a dropped sender as ordinary end-of-stream.

use scope_core::SampleFrame;
use tokio::sync::broadcast;
use tracing::debug;

/// Create a frame channel holding at most `capacity` unread frames.
/// The underlying ring rounds `capacity` up to the next power of two.
pub fn frame_channel(capacity: usize) -> (FrameSender, FrameReceiver) {
    let (sender, receiver) = broadcast::channel(capacity);
    (
        FrameSender { inner: sender },
        FrameReceiver {
            inner: receiver,
            dropped: 0,
        },
    )
}

/// Producer half. Dropping it closes the channel; closing is the sole
/// termination signal the consumer ever needs.
pub struct FrameSender {
    inner: broadcast::Sender<SampleFrame>,
}

impl FrameSender {
    /// Hand a frame to the consumer without ever blocking. If the ring
    /// is full the oldest unread frame makes room; if the consumer is
    /// gone the frame is discarded.
    pub fn send(&self, frame: SampleFrame) {
        let _ = self.inner.send(frame);
    }
}

/// Consumer half with overflow accounting.
pub struct FrameReceiver {
    inner: broadcast::Receiver<SampleFrame>,
    dropped: u64,
}

impl FrameReceiver {
    /// Wait for the next frame. `None` once the producer has closed
    /// the channel and all buffered frames are drained. Evicted frames
    /// are absorbed silently and tallied in [`dropped_frames`].
    ///
    /// [`dropped_frames`]: FrameReceiver::dropped_frames
    pub async fn recv(&mut self) -> Option<SampleFrame> {
        loop {
            match self.inner.recv().await {
                Ok(frame) => return Some(frame),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    self.dropped += skipped;
                    debug!(skipped, "frame channel overflow, oldest frames dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Total frames evicted by the overflow policy so far
    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: f32) -> SampleFrame {
        SampleFrame::new(vec![tag; 10], 1, 0).unwrap()
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let (sender, mut receiver) = frame_channel(8);
        sender.send(frame(1.0));
        sender.send(frame(2.0));

        assert_eq!(receiver.recv().await.unwrap().channel(0).unwrap()[0], 1.0);
        assert_eq!(receiver.recv().await.unwrap().channel(0).unwrap()[0], 2.0);
    }

    #[tokio::test]
    async fn test_close_observed_as_end_of_stream() {
        let (sender, mut receiver) = frame_channel(8);
        sender.send(frame(1.0));
        drop(sender);

        // Buffered frame still delivered, then clean end
        assert!(receiver.recv().await.is_some());
        assert!(receiver.recv().await.is_none());
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_overflow_drops_oldest_and_counts() {
        let (sender, mut receiver) = frame_channel(4);
        for i in 0..12 {
            sender.send(frame(i as f32));
        }

        // Oldest eight evicted; the four newest survive in order
        let first = receiver.recv().await.unwrap();
        assert_eq!(first.channel(0).unwrap()[0], 8.0);
        assert_eq!(receiver.dropped_frames(), 8);

        for expected in 9..12 {
            let next = receiver.recv().await.unwrap();
            assert_eq!(next.channel(0).unwrap()[0], expected as f32);
        }
    }

    #[tokio::test]
    async fn test_producer_send_never_blocks_when_full() {
        let (sender, _receiver) = frame_channel(2);
        // Far beyond capacity; send must return immediately every time
        for i in 0..1000 {
            sender.send(frame(i as f32));
        }
    }
}
