//! # Conversion Session
//!
//! Async front end for a [`FrameConverter`]: a background capture loop pushes frames into the
//! session and reads converted frames back in submission order.
//!
//! ## Architecture
//!
//! 1. **Input queue**: bounded `tokio::sync::mpsc` channel of raw frames
//! 2. **Worker task**: pulls one frame at a time and runs `convert` on the blocking pool,
//!    since resampling is CPU-bound
//! 3. **Output queue**: bounded channel of `ConvertResult<Frame>`
//!
//! A failed frame yields an `Err` on the output queue; the worker keeps going. Both queues are
//! bounded, so a caller that submits without ever reading eventually waits in
//! [`ConversionSession::submit`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{ConvertError, ConvertResult};
use crate::frame::Frame;
use crate::processing::FrameConverter;

/// Running conversion worker. Must be created inside a tokio runtime.
pub struct ConversionSession {
    input: Option<mpsc::Sender<Frame>>,
    output: mpsc::Receiver<ConvertResult<Frame>>,
    worker: JoinHandle<u64>,
}

impl ConversionSession {
    /// Spawn the worker. `capacity` bounds both queues (minimum 1).
    pub fn spawn(converter: FrameConverter, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (in_tx, in_rx) = mpsc::channel(capacity);
        let (out_tx, out_rx) = mpsc::channel(capacity);
        let worker = tokio::spawn(run_worker(Arc::new(converter), in_rx, out_tx));
        info!(capacity, "conversion session started");
        Self {
            input: Some(in_tx),
            output: out_rx,
            worker,
        }
    }

    /// Queue a frame for conversion.
    pub async fn submit(&self, frame: Frame) -> ConvertResult<()> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| ConvertError::session("input already closed"))?;
        input
            .send(frame)
            .await
            .map_err(|_| ConvertError::session("worker stopped"))
    }

    /// Next converted frame, or `None` once the input is closed and everything is drained.
    pub async fn next(&mut self) -> Option<ConvertResult<Frame>> {
        self.output.recv().await
    }

    /// Stop accepting frames. Already queued frames are still converted.
    pub fn close_input(&mut self) {
        self.input.take();
    }

    /// Close the input, collect every remaining result and wait for the worker.
    pub async fn shutdown(mut self) -> ConvertResult<Vec<ConvertResult<Frame>>> {
        self.close_input();
        let mut remaining = Vec::new();
        while let Some(result) = self.output.recv().await {
            remaining.push(result);
        }
        let converted = self
            .worker
            .await
            .map_err(|e| ConvertError::session(format!("worker task failed: {e}")))?;
        info!(frames = converted, "conversion session stopped");
        Ok(remaining)
    }
}

async fn run_worker(
    converter: Arc<FrameConverter>,
    mut input: mpsc::Receiver<Frame>,
    output: mpsc::Sender<ConvertResult<Frame>>,
) -> u64 {
    let mut processed = 0u64;
    while let Some(frame) = input.recv().await {
        let converter = Arc::clone(&converter);
        let result = match tokio::task::spawn_blocking(move || converter.convert(&frame)).await {
            Ok(result) => result,
            Err(e) => Err(ConvertError::session(format!("conversion task failed: {e}"))),
        };
        processed += 1;
        if output.send(result).await.is_err() {
            debug!("output channel closed");
            break;
        }
    }
    processed
}
