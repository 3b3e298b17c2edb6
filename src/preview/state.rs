//! Preview state machine.
//!
//! `PreviewState` is an immutable snapshot. [`PreviewState::reduce`] takes an
//! event and returns the next snapshot plus the commands the driver must run
//! (arm/disarm the debounce timer, run a job). Nothing here touches a clock or
//! a thread, so every transition can be tested directly.
//!
//! Every event that changes what should be on screen bumps `generation`.
//! Job results carry the generation they were issued under and are dropped
//! when it no longer matches, so an older recompute finishing late can never
//! overwrite a newer one.

use std::sync::Arc;

use super::config::PreviewConfig;
use crate::buffer::PixelBuffer;
use crate::filters::{apply_all, compute_histogram, Histogram, OneShotFilter, RegionMask};
use crate::params::{FilterParams, ParamField};

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing pending; the displayed frame is authoritative.
    Idle,
    /// A parameter changed and the low-resolution preview is being rendered.
    FastActive,
    /// Preview shown; waiting for a quiet period before the full recompute.
    Debouncing,
    /// A full-resolution recompute or one-shot filter is running.
    FullInFlight,
}

/// Which buffer a frame was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Fast,
    Full,
}

/// A displayed result together with its histogram.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Arc<PixelBuffer>,
    pub histogram: Arc<Histogram>,
    pub resolution: Resolution,
    /// Generation of the state this frame was computed for
    pub generation: u64,
}

impl Frame {
    pub fn new(buffer: PixelBuffer, resolution: Resolution, generation: u64) -> Self {
        Self::from_shared(Arc::new(buffer), resolution, generation)
    }

    fn from_shared(buffer: Arc<PixelBuffer>, resolution: Resolution, generation: u64) -> Self {
        let histogram = Arc::new(compute_histogram(&buffer));
        Self {
            buffer,
            histogram,
            resolution,
            generation,
        }
    }
}

/// Render the live parameters over `base`; `None` shows the base as-is.
fn render(
    params: Option<&FilterParams>,
    base: &Arc<PixelBuffer>,
    mask: RegionMask,
) -> Arc<PixelBuffer> {
    match params {
        Some(params) => Arc::new(apply_all(params, base, mask)),
        None => Arc::clone(base),
    }
}

/// Low-latency render of the current parameters, run inline by the driver.
#[derive(Debug, Clone)]
pub struct PreviewJob {
    pub generation: u64,
    pub base: Arc<PixelBuffer>,
    pub resolution: Resolution,
    pub params: FilterParams,
    pub mask: RegionMask,
}

impl PreviewJob {
    pub fn run(self) -> Frame {
        let buffer = render(Some(&self.params), &self.base, self.mask);
        Frame::from_shared(buffer, self.resolution, self.generation)
    }
}

/// Full-resolution recompute of the live parameters.
#[derive(Debug, Clone)]
pub struct FullJob {
    pub generation: u64,
    pub original: Arc<PixelBuffer>,
    pub params: FilterParams,
    pub mask: RegionMask,
}

impl FullJob {
    pub fn run(self) -> Frame {
        let buffer = render(Some(&self.params), &self.original, self.mask);
        Frame::from_shared(buffer, Resolution::Full, self.generation)
    }
}

/// One-shot filter folded into the baseline.
#[derive(Debug, Clone)]
pub struct OneShotJob {
    pub generation: u64,
    pub filter: OneShotFilter,
    pub original: Arc<PixelBuffer>,
    /// `None` while no slider has moved since load or reset
    pub params: Option<FilterParams>,
    pub mask: RegionMask,
    pub fast_scale: f32,
}

/// Result of a [`OneShotJob`].
#[derive(Debug, Clone)]
pub struct OneShotOutput {
    pub generation: u64,
    pub baseline: Arc<PixelBuffer>,
    pub fast_baseline: Option<Arc<PixelBuffer>>,
    pub frame: Frame,
}

impl OneShotJob {
    pub fn run(self) -> OneShotOutput {
        let baseline = Arc::new(self.filter.apply(&self.original, self.mask));
        let fast_baseline = baseline.downscale(self.fast_scale).map(Arc::new);
        let frame = Frame::from_shared(
            render(self.params.as_ref(), &baseline, self.mask),
            Resolution::Full,
            self.generation,
        );
        OneShotOutput {
            generation: self.generation,
            baseline,
            fast_baseline,
            frame,
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone)]
pub enum PreviewEvent {
    /// A slider moved.
    ParamChanged { field: ParamField, value: f32 },
    /// Slider released: skip the rest of the debounce.
    Commit,
    /// The debounce timer fired.
    DebounceElapsed,
    /// Apply a destructive filter to the baseline.
    ApplyOneShot(OneShotFilter),
    SetRegionMask(RegionMask),
    /// Back to the loaded image and default parameters.
    Reset,
    PreviewRendered(Frame),
    FullCompleted(Frame),
    OneShotApplied(OneShotOutput),
}

/// Work the driver performs on behalf of the state machine.
#[derive(Debug)]
pub enum Command {
    ArmDebounce,
    DisarmDebounce,
    RenderPreview(PreviewJob),
    RunFull(FullJob),
    RunOneShot(OneShotJob),
}

/// Immutable scheduler state.
#[derive(Debug, Clone)]
pub struct PreviewState {
    source: Option<Arc<PixelBuffer>>,
    source_fast: Option<Arc<PixelBuffer>>,
    source_frame: Option<Frame>,
    original: Option<Arc<PixelBuffer>>,
    fast_original: Option<Arc<PixelBuffer>>,
    params: FilterParams,
    /// Set once a parameter change has been rendered since load or reset
    adjusted: bool,
    mask: RegionMask,
    displayed: Option<Frame>,
    phase: Phase,
    generation: u64,
    fast_scale: f32,
}

impl PreviewState {
    /// Build the initial state. `None` means the image failed to load; every
    /// event is then inert.
    pub fn new(source: Option<PixelBuffer>, config: &PreviewConfig) -> Self {
        let source = source.map(Arc::new);
        let source_fast = source
            .as_ref()
            .and_then(|s| s.downscale(config.fast_scale))
            .map(Arc::new);
        let source_frame = source
            .as_ref()
            .map(|s| Frame::from_shared(Arc::clone(s), Resolution::Full, 0));

        Self {
            original: source.clone(),
            fast_original: source_fast.clone(),
            displayed: source_frame.clone(),
            source,
            source_fast,
            source_frame,
            params: FilterParams::default(),
            adjusted: false,
            mask: RegionMask::default(),
            phase: Phase::Idle,
            generation: 0,
            fast_scale: config.fast_scale,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    pub fn mask(&self) -> RegionMask {
        self.mask
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn displayed(&self) -> Option<&Frame> {
        self.displayed.as_ref()
    }

    /// Current baseline (loaded image with one-shot filters folded in).
    pub fn original(&self) -> Option<&Arc<PixelBuffer>> {
        self.original.as_ref()
    }

    pub fn fast_original(&self) -> Option<&Arc<PixelBuffer>> {
        self.fast_original.as_ref()
    }

    /// Pure transition: the next state and the commands to run.
    pub fn reduce(&self, event: PreviewEvent) -> (PreviewState, Vec<Command>) {
        let mut next = self.clone();
        let commands = next.apply(event);
        (next, commands)
    }

    fn apply(&mut self, event: PreviewEvent) -> Vec<Command> {
        let Some(original) = self.original.clone() else {
            if let PreviewEvent::SetRegionMask(mask) = event {
                self.mask = mask;
            }
            tracing::trace!("no source image, ignoring event");
            return Vec::new();
        };

        match event {
            PreviewEvent::ParamChanged { field, value } => {
                let params = match self.params.with(field, value) {
                    Ok(params) => params,
                    Err(err) => {
                        tracing::warn!(%err, "rejected parameter change");
                        return Vec::new();
                    }
                };
                if params == self.params {
                    return Vec::new();
                }
                self.params = params;
                self.adjusted = true;
                self.generation += 1;
                self.phase = Phase::FastActive;

                let (base, resolution) = match &self.fast_original {
                    Some(fast) => (Arc::clone(fast), Resolution::Fast),
                    None => (original, Resolution::Full),
                };
                vec![Command::RenderPreview(PreviewJob {
                    generation: self.generation,
                    base,
                    resolution,
                    params,
                    mask: self.mask,
                })]
            }

            PreviewEvent::PreviewRendered(frame) => {
                if frame.generation != self.generation {
                    tracing::trace!(
                        frame = frame.generation,
                        current = self.generation,
                        "dropping stale preview"
                    );
                    return Vec::new();
                }
                let resolution = frame.resolution;
                self.displayed = Some(frame);
                match resolution {
                    Resolution::Fast => {
                        self.phase = Phase::Debouncing;
                        vec![Command::ArmDebounce]
                    }
                    // No fast buffer: the preview already is the full result.
                    Resolution::Full => {
                        self.phase = Phase::Idle;
                        vec![Command::DisarmDebounce]
                    }
                }
            }

            PreviewEvent::Commit => match self.phase {
                Phase::FastActive | Phase::Debouncing => self.issue_full(original),
                Phase::Idle | Phase::FullInFlight => Vec::new(),
            },

            PreviewEvent::DebounceElapsed => match self.phase {
                Phase::Debouncing => self.issue_full(original),
                _ => Vec::new(),
            },

            PreviewEvent::FullCompleted(frame) => {
                if frame.generation != self.generation || self.phase != Phase::FullInFlight {
                    tracing::trace!(
                        frame = frame.generation,
                        current = self.generation,
                        "dropping stale full recompute"
                    );
                    return Vec::new();
                }
                tracing::debug!(generation = frame.generation, "full recompute displayed");
                self.displayed = Some(frame);
                self.phase = Phase::Idle;
                Vec::new()
            }

            PreviewEvent::ApplyOneShot(filter) => {
                self.generation += 1;
                self.phase = Phase::FullInFlight;
                tracing::debug!(
                    %filter,
                    generation = self.generation,
                    "applying one-shot filter"
                );
                vec![
                    Command::DisarmDebounce,
                    Command::RunOneShot(OneShotJob {
                        generation: self.generation,
                        filter,
                        original,
                        params: self.adjusted.then_some(self.params),
                        mask: self.mask,
                        fast_scale: self.fast_scale,
                    }),
                ]
            }

            PreviewEvent::OneShotApplied(output) => {
                if output.generation != self.generation {
                    tracing::trace!(
                        output = output.generation,
                        current = self.generation,
                        "dropping stale one-shot"
                    );
                    return Vec::new();
                }
                if let Err(err) = output.baseline.ensure_same_shape(&original) {
                    tracing::error!(%err, "one-shot result discarded");
                    self.phase = Phase::Idle;
                    return Vec::new();
                }
                self.original = Some(output.baseline);
                self.fast_original = output.fast_baseline;
                self.displayed = Some(output.frame);
                self.phase = Phase::Idle;
                Vec::new()
            }

            PreviewEvent::SetRegionMask(mask) => {
                self.mask = mask;
                Vec::new()
            }

            PreviewEvent::Reset => {
                self.generation += 1;
                self.params = FilterParams::default();
                self.adjusted = false;
                self.original = self.source.clone();
                self.fast_original = self.source_fast.clone();
                self.displayed = self.source_frame.clone().map(|mut frame| {
                    frame.generation = self.generation;
                    frame
                });
                self.phase = Phase::Idle;
                tracing::debug!(generation = self.generation, "preview reset");
                vec![Command::DisarmDebounce]
            }
        }
    }

    fn issue_full(&mut self, original: Arc<PixelBuffer>) -> Vec<Command> {
        self.phase = Phase::FullInFlight;
        tracing::debug!(generation = self.generation, "issuing full recompute");
        vec![
            Command::DisarmDebounce,
            Command::RunFull(FullJob {
                generation: self.generation,
                original,
                params: self.params,
                mask: self.mask,
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::color_adjust;

    fn config() -> PreviewConfig {
        PreviewConfig {
            fast_scale: 0.5,
            ..PreviewConfig::default()
        }
    }

    fn source() -> PixelBuffer {
        let mut img = PixelBuffer::filled(8, 6, [0, 0, 0, 255]);
        for y in 0..6 {
            for x in 0..8 {
                img.set_pixel(x, y, [(x * 30) as u8, (y * 40) as u8, 100, 255]);
            }
        }
        img
    }

    /// Run one event and any inline preview render it requests, returning
    /// the remaining commands.
    fn step(state: PreviewState, event: PreviewEvent) -> (PreviewState, Vec<Command>) {
        let (mut state, commands) = state.reduce(event);
        let mut rest = Vec::new();
        for command in commands {
            match command {
                Command::RenderPreview(job) => {
                    let (next, more) = state.reduce(PreviewEvent::PreviewRendered(job.run()));
                    state = next;
                    rest.extend(more);
                }
                other => rest.push(other),
            }
        }
        (state, rest)
    }

    fn take_full(commands: Vec<Command>) -> FullJob {
        commands
            .into_iter()
            .find_map(|c| match c {
                Command::RunFull(job) => Some(job),
                _ => None,
            })
            .expect("full job issued")
    }

    fn take_one_shot(commands: Vec<Command>) -> OneShotJob {
        commands
            .into_iter()
            .find_map(|c| match c {
                Command::RunOneShot(job) => Some(job),
                _ => None,
            })
            .expect("one-shot job issued")
    }

    fn brightness(value: f32) -> PreviewEvent {
        PreviewEvent::ParamChanged {
            field: ParamField::Brightness,
            value,
        }
    }

    #[test]
    fn test_initial_state_shows_source() {
        let state = PreviewState::new(Some(source()), &config());

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(*state.displayed().unwrap().buffer, source());
        let fast = state.fast_original().unwrap();
        assert_eq!((fast.width(), fast.height()), (4, 3));
    }

    #[test]
    fn test_param_change_shows_fast_preview_and_arms_debounce() {
        let state = PreviewState::new(Some(source()), &config());

        let (state, commands) = state.reduce(brightness(0.5));
        assert_eq!(state.phase(), Phase::FastActive);
        assert!(matches!(commands.as_slice(), [Command::RenderPreview(_)]));

        let (state, commands) = step(PreviewState::new(Some(source()), &config()), brightness(0.5));
        assert_eq!(state.phase(), Phase::Debouncing);
        assert!(matches!(commands.as_slice(), [Command::ArmDebounce]));
        let frame = state.displayed().unwrap();
        assert_eq!(frame.resolution, Resolution::Fast);
        assert_eq!((frame.buffer.width(), frame.buffer.height()), (4, 3));
    }

    #[test]
    fn test_debounce_issues_full_recompute() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.5));

        let (state, commands) = state.reduce(PreviewEvent::DebounceElapsed);
        assert_eq!(state.phase(), Phase::FullInFlight);
        assert!(matches!(commands.first(), Some(Command::DisarmDebounce)));

        let job = take_full(commands);
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(job.run()));

        assert_eq!(state.phase(), Phase::Idle);
        let frame = state.displayed().unwrap();
        assert_eq!(frame.resolution, Resolution::Full);
        let expected = apply_all(&state.params(), &source(), RegionMask::FULL);
        assert_eq!(*frame.buffer, expected);
        assert_eq!(*frame.histogram, compute_histogram(&expected));
    }

    #[test]
    fn test_commit_skips_debounce() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(-0.5));

        let (state, commands) = state.reduce(PreviewEvent::Commit);

        assert_eq!(state.phase(), Phase::FullInFlight);
        take_full(commands);
    }

    #[test]
    fn test_commit_when_idle_is_noop() {
        let state = PreviewState::new(Some(source()), &config());

        let (state, commands) = state.reduce(PreviewEvent::Commit);

        assert_eq!(state.phase(), Phase::Idle);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_stale_full_result_never_overwrites_newer_preview() {
        let state = PreviewState::new(Some(source()), &config());

        // P1 goes all the way to a full recompute in flight
        let (state, _) = step(state, brightness(0.2));
        let (state, commands) = state.reduce(PreviewEvent::DebounceElapsed);
        let p1_job = take_full(commands);

        // P2 arrives before P1 completes
        let (state, _) = step(state, brightness(0.8));
        let p2_preview = state.displayed().unwrap().clone();
        assert_eq!(p2_preview.resolution, Resolution::Fast);

        // P1 completes late and is dropped
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(p1_job.run()));
        let shown = state.displayed().unwrap();
        assert_eq!(shown.generation, p2_preview.generation);
        assert_eq!(shown.resolution, Resolution::Fast);
        assert_eq!(state.phase(), Phase::Debouncing);

        // P2's own full recompute is accepted
        let (state, commands) = state.reduce(PreviewEvent::DebounceElapsed);
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(take_full(commands).run()));
        let shown = state.displayed().unwrap();
        assert_eq!(shown.resolution, Resolution::Full);
        let p2 = FilterParams::default().with(ParamField::Brightness, 0.8).unwrap();
        assert_eq!(*shown.buffer, apply_all(&p2, &source(), RegionMask::FULL));
    }

    #[test]
    fn test_older_of_two_full_jobs_is_dropped() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.2));
        let (state, commands) = state.reduce(PreviewEvent::Commit);
        let first = take_full(commands);
        let (state, _) = step(state, brightness(0.4));
        let (state, commands) = state.reduce(PreviewEvent::Commit);
        let second = take_full(commands);

        // Newer finishes first, older afterwards
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(second.run()));
        let newest = state.displayed().unwrap().generation;
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(first.run()));

        assert_eq!(state.displayed().unwrap().generation, newest);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_unchanged_value_is_ignored() {
        let state = PreviewState::new(Some(source()), &config());

        let (next, commands) = state.reduce(PreviewEvent::ParamChanged {
            field: ParamField::Contrast,
            value: 1.25,
        });

        assert!(commands.is_empty());
        assert_eq!(next.generation(), state.generation());
    }

    #[test]
    fn test_out_of_range_change_is_ignored() {
        let state = PreviewState::new(Some(source()), &config());

        let (next, commands) = state.reduce(brightness(4.0));

        assert!(commands.is_empty());
        assert_eq!(next.params(), FilterParams::default());
    }

    #[test]
    fn test_one_shot_replaces_baseline() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.3));

        let (state, commands) = state.reduce(PreviewEvent::ApplyOneShot(OneShotFilter::Invert));
        assert_eq!(state.phase(), Phase::FullInFlight);
        assert!(matches!(commands.first(), Some(Command::DisarmDebounce)));
        let job = commands
            .into_iter()
            .find_map(|c| match c {
                Command::RunOneShot(job) => Some(job),
                _ => None,
            })
            .unwrap();

        let (state, _) = state.reduce(PreviewEvent::OneShotApplied(job.run()));

        let inverted = color_adjust::invert(&source(), RegionMask::FULL);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(**state.original().unwrap(), inverted);
        assert_eq!(
            **state.fast_original().unwrap(),
            inverted.downscale(0.5).unwrap()
        );
        // Live brightness still applies on top of the new baseline
        assert_eq!(
            *state.displayed().unwrap().buffer,
            apply_all(&state.params(), &inverted, RegionMask::FULL)
        );
    }

    #[test]
    fn test_one_shot_before_any_slider_move_shows_baseline() {
        let state = PreviewState::new(Some(source()), &config());

        let (state, commands) = state.reduce(PreviewEvent::ApplyOneShot(OneShotFilter::Emboss));
        let (state, _) = state.reduce(PreviewEvent::OneShotApplied(take_one_shot(commands).run()));

        assert_eq!(state.displayed().unwrap().buffer, *state.original().unwrap());
    }

    #[test]
    fn test_slider_back_to_default_renders_pipeline() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.01));
        let (state, _) = step(state, brightness(0.0));
        assert_eq!(state.params(), FilterParams::default());

        let fast = state.displayed().unwrap();
        let fast_source = source().downscale(0.5).unwrap();
        assert_eq!(
            *fast.buffer,
            apply_all(&FilterParams::default(), &fast_source, RegionMask::FULL)
        );

        let (state, commands) = state.reduce(PreviewEvent::Commit);
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(take_full(commands).run()));

        let expected = apply_all(&FilterParams::default(), &source(), RegionMask::FULL);
        assert_ne!(expected, source());
        assert_eq!(*state.displayed().unwrap().buffer, expected);
    }

    #[test]
    fn test_one_shot_after_slider_returns_to_default_renders_pipeline() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.2));
        let (state, _) = step(state, brightness(0.0));

        let (state, commands) = state.reduce(PreviewEvent::ApplyOneShot(OneShotFilter::Invert));
        let (state, _) = state.reduce(PreviewEvent::OneShotApplied(take_one_shot(commands).run()));

        let inverted = color_adjust::invert(&source(), RegionMask::FULL);
        assert_eq!(
            *state.displayed().unwrap().buffer,
            apply_all(&FilterParams::default(), &inverted, RegionMask::FULL)
        );
    }

    #[test]
    fn test_reset_clears_slider_history() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.2));
        let (state, _) = state.reduce(PreviewEvent::Reset);

        let (state, commands) = state.reduce(PreviewEvent::ApplyOneShot(OneShotFilter::Invert));
        let (state, _) = state.reduce(PreviewEvent::OneShotApplied(take_one_shot(commands).run()));

        assert_eq!(
            *state.displayed().unwrap().buffer,
            color_adjust::invert(&source(), RegionMask::FULL)
        );
    }

    #[test]
    fn test_one_shot_invalidates_in_flight_full() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.3));
        let (state, commands) = state.reduce(PreviewEvent::Commit);
        let full = take_full(commands);

        let (state, _) = state.reduce(PreviewEvent::ApplyOneShot(OneShotFilter::Blur));
        let before = state.displayed().unwrap().generation;
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(full.run()));

        assert_eq!(state.displayed().unwrap().generation, before);
        assert_eq!(state.phase(), Phase::FullInFlight);
    }

    #[test]
    fn test_one_shot_with_wrong_shape_is_discarded() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = state.reduce(PreviewEvent::ApplyOneShot(OneShotFilter::Invert));
        let wrong = Arc::new(PixelBuffer::filled(3, 3, [0, 0, 0, 255]));
        let output = OneShotOutput {
            generation: state.generation(),
            baseline: Arc::clone(&wrong),
            fast_baseline: None,
            frame: Frame::new(
                PixelBuffer::filled(3, 3, [0, 0, 0, 255]),
                Resolution::Full,
                state.generation(),
            ),
        };

        let (state, _) = state.reduce(PreviewEvent::OneShotApplied(output));

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(**state.original().unwrap(), source());
        assert_eq!(*state.displayed().unwrap().buffer, source());
    }

    #[test]
    fn test_reset_restores_source_and_defaults() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = step(state, brightness(0.3));
        let (state, commands) = state.reduce(PreviewEvent::ApplyOneShot(OneShotFilter::Invert));
        let job = commands
            .into_iter()
            .find_map(|c| match c {
                Command::RunOneShot(job) => Some(job),
                _ => None,
            })
            .unwrap();
        let (state, _) = state.reduce(PreviewEvent::OneShotApplied(job.run()));

        let (state, commands) = state.reduce(PreviewEvent::Reset);

        assert!(matches!(commands.as_slice(), [Command::DisarmDebounce]));
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.params(), FilterParams::default());
        assert_eq!(**state.original().unwrap(), source());
        let frame = state.displayed().unwrap();
        assert_eq!(*frame.buffer, source());
        assert_eq!(frame.generation, state.generation());
    }

    #[test]
    fn test_region_mask_applies_to_later_renders() {
        let state = PreviewState::new(Some(source()), &config());
        let (state, _) = state.reduce(PreviewEvent::SetRegionMask(RegionMask::RIGHT_HALF));
        let (state, _) = step(state, brightness(1.0));
        let (state, commands) = state.reduce(PreviewEvent::Commit);
        let (state, _) = state.reduce(PreviewEvent::FullCompleted(take_full(commands).run()));

        let shown = &state.displayed().unwrap().buffer;
        for y in 0..6 {
            for x in 0..=4 {
                assert_eq!(shown.pixel(x, y), source().pixel(x, y));
            }
        }
    }

    #[test]
    fn test_missing_fast_buffer_renders_full_directly() {
        let tiny = PixelBuffer::filled(3, 3, [50, 50, 50, 255]);
        let state = PreviewState::new(Some(tiny.clone()), &PreviewConfig::default());
        assert!(state.fast_original().is_none());

        let (state, commands) = step(state, brightness(0.5));

        assert_eq!(state.phase(), Phase::Idle);
        assert!(matches!(commands.as_slice(), [Command::DisarmDebounce]));
        let frame = state.displayed().unwrap();
        assert_eq!(frame.resolution, Resolution::Full);
        assert_eq!(*frame.buffer, apply_all(&state.params(), &tiny, RegionMask::FULL));
    }

    #[test]
    fn test_missing_source_is_inert() {
        let state = PreviewState::new(None, &config());

        for event in [
            brightness(0.5),
            PreviewEvent::Commit,
            PreviewEvent::DebounceElapsed,
            PreviewEvent::ApplyOneShot(OneShotFilter::Sharpen),
            PreviewEvent::Reset,
        ] {
            let (next, commands) = state.reduce(event);
            assert!(commands.is_empty());
            assert!(next.displayed().is_none());
            assert_eq!(next.phase(), Phase::Idle);
        }
    }
}
