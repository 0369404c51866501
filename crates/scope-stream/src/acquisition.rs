//! Acquisition task: driver boundary to frame channel
//!
//! Runs on a blocking worker, independent of presentation pacing. The
//! only shared state with the consumer is the frame channel; a full
//! channel drops the oldest unread frame instead of stalling the
//! sampling clock.

use crate::channel::FrameSender;
use crate::source::SampleSource;
use scope_core::{SampleFrame, ScopeError, ScopeResult};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Spawn the acquisition loop.
///
/// Each cycle reads exactly one block from the source, wraps it with a
/// monotonic timestamp and hands it to the channel without waiting for
/// the consumer. A driver read error is fatal: it is logged, the
/// channel is closed by dropping the sender, and the error is returned
/// from the task so persistent hardware failure surfaces to the
/// operator.
pub fn spawn_acquisition(
    mut source: Box<dyn SampleSource>,
    sender: FrameSender,
) -> JoinHandle<ScopeResult<()>> {
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let channels = source.channel_count();
        info!(channels, "acquisition started");

        let mut frames_read: u64 = 0;
        loop {
            match source.read_block() {
                Ok(Some(block)) => {
                    let timestamp_us = started.elapsed().as_micros() as u64;
                    let frame = SampleFrame::from_channels(block, timestamp_us)
                        .map_err(|e| ScopeError::AcquisitionFault {
                            reason: format!("driver returned malformed block: {}", e),
                        })?;
                    sender.send(frame);
                    frames_read += 1;
                }
                Ok(None) => {
                    info!(frames_read, "source exhausted, closing frame channel");
                    return Ok(());
                }
                Err(e) => {
                    error!(frames_read, error = %e, "driver read failed, closing frame channel");
                    return Err(e);
                }
            }
        }
        // Sender is dropped on every exit path, which closes the
        // channel and unblocks the consumer.
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::frame_channel;

    struct CountingSource {
        remaining: usize,
        fail_after: Option<usize>,
        read: usize,
    }

    impl SampleSource for CountingSource {
        fn read_block(&mut self) -> ScopeResult<Option<Vec<Vec<f32>>>> {
            if let Some(limit) = self.fail_after {
                if self.read >= limit {
                    return Err(ScopeError::AcquisitionFault {
                        reason: "link lost".to_string(),
                    });
                }
            }
            if self.read >= self.remaining {
                return Ok(None);
            }
            self.read += 1;
            Ok(Some(vec![vec![self.read as f32; 10]]))
        }

        fn channel_count(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_frames_arrive_and_channel_closes() {
        let (sender, mut receiver) = frame_channel(16);
        let source = Box::new(CountingSource {
            remaining: 3,
            fail_after: None,
            read: 0,
        });

        let handle = spawn_acquisition(source, sender);

        for expected in 1..=3 {
            let frame = receiver.recv().await.unwrap();
            assert_eq!(frame.channel(0).unwrap()[0], expected as f32);
        }
        assert!(receiver.recv().await.is_none());
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_driver_fault_is_fatal_and_closes_channel() {
        let (sender, mut receiver) = frame_channel(16);
        let source = Box::new(CountingSource {
            remaining: 100,
            fail_after: Some(2),
            read: 0,
        });

        let handle = spawn_acquisition(source, sender);

        assert!(receiver.recv().await.is_some());
        assert!(receiver.recv().await.is_some());
        // Fault closes the channel rather than leaving us blocked
        assert!(receiver.recv().await.is_none());

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ScopeError::AcquisitionFault { .. })));
    }

    #[tokio::test]
    async fn test_timestamps_are_monotonic() {
        let (sender, mut receiver) = frame_channel(16);
        let source = Box::new(CountingSource {
            remaining: 5,
            fail_after: None,
            read: 0,
        });
        spawn_acquisition(source, sender);

        let mut last = 0u64;
        while let Some(frame) = receiver.recv().await {
            assert!(frame.timestamp_us >= last);
            last = frame.timestamp_us;
        }
    }
}
