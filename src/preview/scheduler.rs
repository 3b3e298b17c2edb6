//! Async driver for [`PreviewState`].
//!
//! One task owns the state. UI events arrive on an mpsc channel, full-size
//! recomputes run on the blocking pool and report back on a second channel,
//! and every transition is published through a `watch` channel that the UI
//! reads from.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use super::config::PreviewConfig;
use super::state::{Command, Frame, Phase, PreviewEvent, PreviewState};
use crate::buffer::PixelBuffer;
use crate::error::{RetouchError, RetouchResult};
use crate::filters::{Histogram, OneShotFilter, RegionMask};
use crate::params::{FilterParams, ParamField};

/// What the UI sees after each transition.
#[derive(Debug, Clone)]
pub struct PreviewSnapshot {
    /// `None` when no image is loaded
    pub frame: Option<Frame>,
    pub phase: Phase,
    pub params: FilterParams,
    pub mask: RegionMask,
    pub generation: u64,
}

impl PreviewSnapshot {
    fn from_state(state: &PreviewState) -> Self {
        Self {
            frame: state.displayed().cloned(),
            phase: state.phase(),
            params: state.params(),
            mask: state.mask(),
            generation: state.generation(),
        }
    }

    /// True once nothing is pending and the frame is full resolution.
    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Idle
    }
}

/// Cloneable handle used by the UI to drive a running scheduler.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    events: mpsc::UnboundedSender<PreviewEvent>,
    snapshots: watch::Receiver<PreviewSnapshot>,
}

impl PreviewHandle {
    /// Move a slider. Out-of-range values are rejected here and never reach
    /// the scheduler.
    pub fn set_param(&self, field: ParamField, value: f32) -> RetouchResult<()> {
        let value = field.validate(value)?;
        self.send(PreviewEvent::ParamChanged { field, value })
    }

    /// Slider released; run the full recompute without waiting for the debounce.
    pub fn commit(&self) -> RetouchResult<()> {
        self.send(PreviewEvent::Commit)
    }

    pub fn apply_filter(&self, filter: OneShotFilter) -> RetouchResult<()> {
        self.send(PreviewEvent::ApplyOneShot(filter))
    }

    pub fn set_region_mask(&self, mask: RegionMask) -> RetouchResult<()> {
        self.send(PreviewEvent::SetRegionMask(mask))
    }

    pub fn reset(&self) -> RetouchResult<()> {
        self.send(PreviewEvent::Reset)
    }

    pub fn snapshot(&self) -> PreviewSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn displayed(&self) -> Option<Arc<PixelBuffer>> {
        self.snapshots.borrow().frame.as_ref().map(|f| Arc::clone(&f.buffer))
    }

    pub fn histogram(&self) -> Option<Arc<Histogram>> {
        self.snapshots.borrow().frame.as_ref().map(|f| Arc::clone(&f.histogram))
    }

    /// A receiver that is notified on every published transition.
    pub fn subscribe(&self) -> watch::Receiver<PreviewSnapshot> {
        self.snapshots.clone()
    }

    fn send(&self, event: PreviewEvent) -> RetouchResult<()> {
        self.events
            .send(event)
            .map_err(|_| RetouchError::SchedulerClosed)
    }
}

/// Owns the preview state and executes its commands.
pub struct PreviewScheduler {
    state: PreviewState,
    config: PreviewConfig,
    events: mpsc::UnboundedReceiver<PreviewEvent>,
    completions_tx: mpsc::UnboundedSender<PreviewEvent>,
    completions: mpsc::UnboundedReceiver<PreviewEvent>,
    snapshots: watch::Sender<PreviewSnapshot>,
    debounce_deadline: Option<Instant>,
}

impl PreviewScheduler {
    /// Build a scheduler and its handle without starting it.
    pub fn new(source: Option<PixelBuffer>, config: PreviewConfig) -> (Self, PreviewHandle) {
        if source.is_none() {
            tracing::warn!("preview started without a source image");
        }
        let state = PreviewState::new(source, &config);
        let (events_tx, events) = mpsc::unbounded_channel();
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (snapshots, snapshots_rx) = watch::channel(PreviewSnapshot::from_state(&state));

        let scheduler = Self {
            state,
            config,
            events,
            completions_tx,
            completions,
            snapshots,
            debounce_deadline: None,
        };
        let handle = PreviewHandle {
            events: events_tx,
            snapshots: snapshots_rx,
        };
        (scheduler, handle)
    }

    /// Start the scheduler on the current tokio runtime.
    pub fn spawn(source: Option<PixelBuffer>, config: PreviewConfig) -> PreviewHandle {
        let (scheduler, handle) = Self::new(source, config);
        tokio::spawn(scheduler.run());
        handle
    }

    /// Event loop. Returns once every handle has been dropped.
    pub async fn run(mut self) {
        tracing::debug!(
            fast_scale = self.config.fast_scale,
            debounce_ms = self.config.debounce.as_millis() as u64,
            "preview scheduler started"
        );

        loop {
            let deadline = self.debounce_deadline;
            tokio::select! {
                biased;

                Some(event) = self.completions.recv() => self.dispatch(event).await,

                event = self.events.recv() => match event {
                    Some(event) => self.dispatch(event).await,
                    None => break,
                },

                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    self.debounce_deadline = None;
                    self.dispatch(PreviewEvent::DebounceElapsed).await;
                }
            }
        }

        tracing::debug!("preview scheduler stopped");
    }

    /// Feed one event through the reducer, then follow up on every command
    /// (and every event those commands produce inline).
    async fn dispatch(&mut self, event: PreviewEvent) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let (next, commands) = self.state.reduce(event);
            self.state = next;
            self.snapshots.send_replace(PreviewSnapshot::from_state(&self.state));

            for command in commands {
                self.execute(command, &mut queue).await;
            }
        }
    }

    async fn execute(&mut self, command: Command, queue: &mut VecDeque<PreviewEvent>) {
        match command {
            Command::ArmDebounce => {
                self.debounce_deadline = Some(Instant::now() + self.config.debounce);
            }
            Command::DisarmDebounce => {
                self.debounce_deadline = None;
            }
            Command::RenderPreview(job) => {
                queue.push_back(PreviewEvent::PreviewRendered(job.run()));
            }
            Command::RunFull(job) => {
                let completions = self.completions_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let frame = job.run();
                    // Receiver outlives every job unless the scheduler is gone.
                    let _ = completions.send(PreviewEvent::FullCompleted(frame));
                });
            }
            Command::RunOneShot(job) => {
                // Awaited so one-shot filters apply strictly in order.
                match tokio::task::spawn_blocking(move || job.run()).await {
                    Ok(output) => queue.push_back(PreviewEvent::OneShotApplied(output)),
                    Err(err) => tracing::error!(%err, "one-shot filter task failed"),
                }
            }
        }
    }
}
