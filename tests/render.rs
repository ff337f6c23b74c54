//! Integration tests for the render tick.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod common;

use std::time::Duration;

use common::{DURATION_MS, FakeProvider, flush, media_state, spawn};
use nowplaying::widget::{Frame, RenderSurface, TerminalSurface, render_frame};
use tokio::time::{Instant, advance};

#[derive(Default)]
struct RecordingSurface {
    unmounted: bool,
    frames: Vec<Frame>,
}

impl RenderSurface for RecordingSurface {
    fn is_mounted(&self) -> bool {
        !self.unmounted
    }

    fn paint(&mut self, frame: &Frame) {
        self.frames.push(*frame);
    }
}

#[tokio::test(start_paused = true)]
async fn skips_painting_until_duration_is_known() {
    let (provider, _push) = FakeProvider::with_push();
    let (handle, _task) = spawn(provider);
    flush().await;

    let mut surface = RecordingSurface::default();

    assert!(!render_frame(&handle, &mut surface, Instant::now()));
    assert!(surface.frames.is_empty());
}

#[tokio::test(start_paused = true)]
async fn paints_live_position() {
    let (provider, push) = FakeProvider::with_push();
    let (handle, _task) = spawn(provider);
    flush().await;

    push.send(media_state("A", 50_000, true)).unwrap();
    flush().await;
    advance(Duration::from_millis(250)).await;

    let mut surface = RecordingSurface::default();
    assert!(render_frame(&handle, &mut surface, Instant::now()));

    let frame = surface.frames[0];
    assert_eq!(frame.position_ms, 50_250);
    assert_eq!(frame.duration_ms, DURATION_MS);
    assert!(frame.playing);
    assert!((frame.progress - 50_250.0 / DURATION_MS as f64).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn unmounted_surface_is_skipped() {
    let (provider, push) = FakeProvider::with_push();
    let (handle, _task) = spawn(provider);
    flush().await;

    push.send(media_state("A", 0, true)).unwrap();
    flush().await;

    let mut surface = RecordingSurface {
        unmounted: true,
        ..RecordingSurface::default()
    };

    assert!(!render_frame(&handle, &mut surface, Instant::now()));
    assert!(surface.frames.is_empty());
}

#[tokio::test(start_paused = true)]
async fn terminal_line_only_rewritten_when_text_changes() {
    let (provider, push) = FakeProvider::with_push();
    let (handle, _task) = spawn(provider);
    flush().await;

    push.send(media_state("Song", 61_000, false)).unwrap();
    flush().await;

    let mut surface = TerminalSurface::new(handle.clone(), Vec::new());
    render_frame(&handle, &mut surface, Instant::now());
    render_frame(&handle, &mut surface, Instant::now());

    let output = String::from_utf8(surface.output().clone()).unwrap();
    assert_eq!(output.matches('\r').count(), 1);
    assert!(output.contains("Song - Artist"));
    assert!(output.contains("[1:01 / 3:20]"));
}
