use super::*;

#[test]
fn handles_are_unique_and_fifo() {
    let mut host = ManualFrameHost::new();
    let a = host.request_frame();
    let b = host.request_frame();
    assert_ne!(a, b);
    assert_eq!(host.take_pending(), Some(a));
    assert_eq!(host.take_pending(), Some(b));
    assert_eq!(host.take_pending(), None);
}

#[test]
fn cancel_removes_only_pending_handles() {
    let mut host = ManualFrameHost::new();
    let a = host.request_frame();
    host.cancel_frame(a);
    host.cancel_frame(a);
    host.cancel_frame(FrameHandle(99));
    assert!(host.pending().is_empty());
    assert_eq!(host.cancelled(), &[a]);
}
