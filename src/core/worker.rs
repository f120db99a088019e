// src/core/worker.rs

use crate::core::corners::PathResult;
use crate::core::pipeline::{FramePipeline, YuvFrame};
use crate::cv::ComputerVision;
use crate::{RectDetectError, Result};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Outcomes the worker holds for a consumer that is not reading
/// [`DetectionWorker::results`]. Further outcomes are discarded until
/// the backlog drains.
pub const RESULT_BACKLOG: usize = 16;

/// Result of one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Found(PathResult),
    NotFound,
    Failed(RectDetectError),
}

/// A detection tagged with the sequence number its frame was submitted under.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub seq: u64,
    pub detection: Detection,
}

/// What happened to a submitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Handed to the worker under this sequence number.
    Accepted(u64),
    /// The worker was busy; the frame was discarded.
    Dropped,
    /// The worker has shut down.
    Stopped,
}

/// Runs a [`FramePipeline`] on a dedicated thread, one frame at a time.
///
/// Frames are handed over through a zero-capacity channel, so a frame is
/// accepted only while the worker is idle and waiting. Anything submitted
/// while a frame is in flight is dropped, never queued. Outcomes, failures
/// included, arrive on [`results`](Self::results) in submission order.
///
/// Every submission attempt consumes a sequence number, so gaps in the
/// outcome sequence mark dropped frames. Callers are expected to drain
/// [`results`](Self::results); once [`RESULT_BACKLOG`] outcomes are
/// waiting, newer ones are discarded with a warning.
pub struct DetectionWorker {
    frames: Option<Sender<(u64, YuvFrame)>>,
    results: Receiver<FrameOutcome>,
    stop: Arc<AtomicBool>,
    next_seq: AtomicU64,
    handle: Option<JoinHandle<()>>,
}

impl DetectionWorker {
    /// Starts the worker thread.
    pub fn spawn<CV>(pipeline: FramePipeline<CV>) -> Result<Self>
    where
        CV: ComputerVision + 'static,
    {
        let (frame_tx, frame_rx) = channel::bounded::<(u64, YuvFrame)>(0);
        let (result_tx, result_rx) = channel::bounded(RESULT_BACKLOG);
        let stop = Arc::new(AtomicBool::new(false));

        let worker_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("rect-detector".to_string())
            .spawn(move || run(pipeline, frame_rx, result_tx, worker_stop))
            .map_err(|e| RectDetectError::StageFailure {
                stage: "spawn",
                reason: e.to_string(),
            })?;

        info!("detection worker started");
        Ok(DetectionWorker {
            frames: Some(frame_tx),
            results: result_rx,
            stop,
            next_seq: AtomicU64::new(0),
            handle: Some(handle),
        })
    }

    /// Offers a frame without waiting. Dropped if the worker is busy.
    pub fn submit(&self, frame: YuvFrame) -> Submission {
        let Some(frames) = self.accepting() else {
            return Submission::Stopped;
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        match frames.try_send((seq, frame)) {
            Ok(()) => Submission::Accepted(seq),
            Err(TrySendError::Full(_)) => {
                debug!(seq, "worker busy, frame dropped");
                Submission::Dropped
            }
            Err(TrySendError::Disconnected(_)) => Submission::Stopped,
        }
    }

    /// Blocks until the worker is free to take the frame.
    pub fn submit_wait(&self, frame: YuvFrame) -> Submission {
        let Some(frames) = self.accepting() else {
            return Submission::Stopped;
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        match frames.send((seq, frame)) {
            Ok(()) => Submission::Accepted(seq),
            Err(_) => Submission::Stopped,
        }
    }

    /// Outcome stream. Disconnects once the worker has stopped and every
    /// delivered outcome has been read.
    pub fn results(&self) -> &Receiver<FrameOutcome> {
        &self.results
    }

    /// Non-blocking poll of the next outcome.
    pub fn try_result(&self) -> Option<FrameOutcome> {
        self.results.try_recv().ok()
    }

    pub fn is_running(&self) -> bool {
        self.accepting().is_some()
    }

    /// Stops the worker and waits for its thread to exit. No frame starts
    /// processing afterwards; the outcome of a frame still in flight is
    /// discarded. Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        self.frames.take();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("detection worker thread panicked");
            }
            info!("detection worker stopped");
        }
    }

    fn accepting(&self) -> Option<&Sender<(u64, YuvFrame)>> {
        if self.stop.load(Ordering::SeqCst) {
            return None;
        }
        self.frames.as_ref()
    }
}

impl Drop for DetectionWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<CV: ComputerVision>(
    pipeline: FramePipeline<CV>,
    frames: Receiver<(u64, YuvFrame)>,
    results: Sender<FrameOutcome>,
    stop: Arc<AtomicBool>,
) {
    for (seq, frame) in frames.iter() {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        let detection = process(&pipeline, &frame);
        if let Detection::Failed(err) = &detection {
            warn!(seq, error = %err, "frame failed");
        }

        if stop.load(Ordering::SeqCst) {
            break;
        }
        match results.try_send(FrameOutcome { seq, detection }) {
            Ok(()) => {}
            Err(TrySendError::Full(outcome)) => {
                warn!(seq = outcome.seq, backlog = RESULT_BACKLOG, "outcome backlog full, outcome discarded");
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
}

fn process<CV: ComputerVision>(pipeline: &FramePipeline<CV>, frame: &YuvFrame) -> Detection {
    match panic::catch_unwind(AssertUnwindSafe(|| pipeline.detect(&frame.view()))) {
        Ok(Ok(Some(path))) => Detection::Found(path),
        Ok(Ok(None)) => Detection::NotFound,
        Ok(Err(err)) => Detection::Failed(err),
        Err(payload) => Detection::Failed(RectDetectError::StageFailure {
            stage: "pipeline",
            reason: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
