#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use surfswitch_core::{InputSlot, Size, SurfaceEvent, SurfaceHandle, SurfaceRole};
use surfswitch_runtime::{
    DrawOutcome, Harness, HarnessConfig, HeadlessHost, ManualClock, RecordingRenderer, SkipReason,
};
use web_time::Duration;

#[derive(Debug, Arbitrary)]
enum Op {
    Press,
    Refresh,
    Create { b: bool, w: u8, h: u8 },
    Destroy { b: bool },
    DestroyStale { b: bool, raw: u8 },
    FailLock { b: bool },
    FailPost { b: bool },
    Stop,
    Start,
}

fn slot(b: bool) -> InputSlot {
    if b { InputSlot::B } else { InputSlot::A }
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 512 {
        return;
    }
    let Ok(mut harness) = Harness::new(
        HarnessConfig::default(),
        RecordingRenderer::new(),
        HeadlessHost::new(),
        ManualClock::new(0),
    ) else {
        return;
    };
    if harness.on_create().is_err() {
        return;
    }
    harness.on_create_view();

    let mut last: [Option<SurfaceHandle>; 2] = [None, None];
    let mut frame = 0u32;

    for op in ops {
        match op {
            Op::Press => {
                let before = harness.renderer().input_calls().len();
                let t = harness.advance();
                assert_eq!(harness.renderer().input_calls().len(), before + 1);
                let expected = t.to.slot().and_then(|s| harness.registry().get(s));
                assert_eq!(t.input, expected);
            }
            Op::Refresh => {
                let armed = harness.frame_callbacks().is_pending();
                frame += 1;
                harness.clock().advance(16);
                let report = harness.on_refresh(Duration::from_millis(16) * frame);
                assert_eq!(report.is_some(), armed);
                if let Some(report) = report {
                    assert!(report.rearmed, "loop must re-arm until teardown");
                    for s in InputSlot::ALL {
                        let valid = harness.registry().is_valid(s);
                        let not_ready = report.outcome(s) == DrawOutcome::Skipped(SkipReason::NotReady);
                        assert_eq!(valid, !not_ready);
                    }
                }
            }
            Op::Create { b, w, h } => {
                let size = Size::new(u32::from(w).max(1), u32::from(h).max(1));
                let handle = harness.host_mut().create_surface(size);
                last[usize::from(b)] = Some(handle);
                harness.handle_surface_event(SurfaceRole::Input(slot(b)), SurfaceEvent::Created(handle));
            }
            Op::Destroy { b } => {
                if let Some(handle) = last[usize::from(b)] {
                    harness.host_mut().revoke(handle);
                    harness.handle_surface_event(
                        SurfaceRole::Input(slot(b)),
                        SurfaceEvent::Destroyed(handle),
                    );
                }
            }
            Op::DestroyStale { b, raw } => {
                let before = harness.registry().clone();
                let handle = SurfaceHandle::new(1_000 + u64::from(raw));
                harness.handle_surface_event(SurfaceRole::Input(slot(b)), SurfaceEvent::Destroyed(handle));
                assert_eq!(harness.registry(), &before, "unknown handle must not clear a slot");
            }
            Op::FailLock { b } => {
                if let Some(handle) = last[usize::from(b)] {
                    harness.host_mut().fail_next_lock(handle);
                }
            }
            Op::FailPost { b } => {
                if let Some(handle) = last[usize::from(b)] {
                    harness.host_mut().fail_next_post(handle);
                }
            }
            Op::Stop => harness.on_stop(),
            Op::Start => harness.on_create_view(),
        }
    }

    harness.on_destroy();
    frame += 1;
    assert!(harness.on_refresh(Duration::from_millis(16) * frame).is_none());
    let inputs = harness.renderer().input_calls().len();
    let t = harness.advance();
    assert_eq!(t.from, t.to);
    assert_eq!(harness.renderer().input_calls().len(), inputs);
    assert!(harness.on_create().is_ok());
    let late = harness.host_mut().create_surface(Size::new(1, 1));
    harness.handle_surface_event(SurfaceRole::Input(InputSlot::A), SurfaceEvent::Created(late));
    assert!(!harness.registry().is_valid(InputSlot::A));
});
