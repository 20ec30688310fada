use std::sync::Arc;

use ambient::{
    AmbientLight, AmbientLightProps, DualMediaSync, HeadlessTransport, MediaCallbacks,
    MediaError, MediaEvent, MediaHandle, MediaKind, MediaPair,
};

struct Fixture {
    primary: Arc<HeadlessTransport>,
    glow: Arc<HeadlessTransport>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            primary: Arc::new(HeadlessTransport::new()),
            glow: Arc::new(HeadlessTransport::new()),
        }
    }

    fn primary_handle(&self) -> Arc<dyn MediaHandle> {
        self.primary.clone()
    }

    fn glow_handle(&self) -> Arc<dyn MediaHandle> {
        self.glow.clone()
    }

    fn pair(&self) -> MediaPair {
        MediaPair::new(self.primary_handle(), self.glow_handle())
    }
}

#[test]
fn primary_play_issues_exactly_one_glow_play() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());

    media.primary.play().expect("primary play");

    assert_eq!(media.glow.play_count(), 1);
    assert!(!media.glow.is_paused());
}

#[test]
fn primary_pause_issues_exactly_one_glow_pause() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());
    media.primary.play().expect("primary play");

    media.primary.pause();

    assert_eq!(media.glow.pause_count(), 1);
    assert!(media.glow.is_paused());
}

#[test]
fn seek_copies_the_exact_primary_position() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());
    media.glow.set_current_time(3.0);

    media.primary.set_current_time(17.25);
    media.primary.set_current_time(4.5);

    assert_eq!(media.glow.current_time(), 4.5);
    // One direct seek by the test plus one mirror per primary seek.
    assert_eq!(media.glow.seek_count(), 3);
}

#[test]
fn glow_play_rejection_is_swallowed_and_primary_keeps_playing() {
    let media = Fixture::new();
    media.glow.reject_play_with(Some(MediaError::PlaybackRejected {
        reason: "autoplay policy".to_owned(),
    }));
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());

    media.primary.play().expect("primary play must not see glow errors");

    assert!(!media.primary.is_paused());
    assert!(media.glow.is_paused());
    assert_eq!(media.glow.play_count(), 1);

    // The next primary play retries naturally.
    media.glow.reject_play_with(None);
    media.primary.pause();
    media.primary.play().expect("primary play");
    assert_eq!(media.glow.play_count(), 2);
    assert!(!media.glow.is_paused());
}

#[test]
fn glow_never_drives_primary() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());

    media.glow.play().expect("glow play");
    media.glow.set_current_time(9.0);

    assert!(media.primary.is_paused());
    assert_eq!(media.primary.current_time(), 0.0);
    assert_eq!(media.glow.listener_count(), 0);
}

#[test]
fn attach_registers_one_listener_per_event() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();

    sync.attach(&media.primary_handle(), &media.glow_handle());

    assert_eq!(media.primary.listener_count(), 3);
    for event in [MediaEvent::Play, MediaEvent::Pause, MediaEvent::Seeking] {
        assert_eq!(media.primary.listener_count_for(event), 1);
    }
}

#[test]
fn detach_is_idempotent_and_leaves_no_listeners() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());

    sync.detach();
    sync.detach();

    assert_eq!(media.primary.listener_count(), 0);
    assert!(!sync.is_attached());
    media.primary.play().expect("primary play");
    assert_eq!(media.glow.play_count(), 0);
}

#[test]
fn rapid_reattach_cycles_do_not_leak_listeners() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();

    for _ in 0..100 {
        sync.attach(&media.primary_handle(), &media.glow_handle());
        sync.reconcile(MediaKind::Video, Some(&media.pair()));
    }
    assert_eq!(media.primary.listener_count(), 3);

    media.primary.play().expect("primary play");
    assert_eq!(media.glow.play_count(), 1);

    drop(sync);
    assert_eq!(media.primary.listener_count(), 0);
}

#[test]
fn reconcile_in_image_mode_attaches_nothing() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());

    sync.reconcile(MediaKind::Image, Some(&media.pair()));

    assert!(!sync.is_attached());
    assert_eq!(media.primary.listener_count(), 0);
}

#[test]
fn attachment_does_not_keep_elements_alive() {
    let media = Fixture::new();
    let mut sync = DualMediaSync::new();
    sync.attach(&media.primary_handle(), &media.glow_handle());
    let glow_weak = Arc::downgrade(&media.glow);
    let primary = media.primary.clone();

    drop(media);

    assert!(glow_weak.upgrade().is_none());
    primary.play().expect("primary play without glow");
    sync.detach();
    assert_eq!(primary.listener_count(), 0);
}

#[test]
fn component_switching_media_kind_detaches_then_reattaches() {
    let media = Fixture::new();
    let mut component = AmbientLight::new(
        AmbientLightProps::new("clip.mp4", MediaKind::Video),
        MediaCallbacks::default(),
    )
    .expect("valid props");
    component.mount(Some(media.pair()));
    assert!(component.is_synced());
    assert_eq!(media.primary.listener_count(), 3);

    let mut image_props = component.props().clone();
    image_props.kind = MediaKind::Image;
    component
        .set_props(image_props)
        .expect("switch to image mode");
    assert!(!component.is_synced());
    assert_eq!(media.primary.listener_count(), 0);

    let fresh = Fixture::new();
    let mut video_props = component.props().clone();
    video_props.kind = MediaKind::Video;
    component
        .set_props(video_props)
        .expect("switch back to video");
    component.bind_media(Some(fresh.pair()));
    assert!(component.is_synced());
    assert_eq!(fresh.primary.listener_count(), 3);
    assert_eq!(media.primary.listener_count(), 0);
}

#[test]
fn component_rebinding_elements_moves_listeners() {
    let first = Fixture::new();
    let second = Fixture::new();
    let mut component = AmbientLight::new(
        AmbientLightProps::new("clip.mp4", MediaKind::Video),
        MediaCallbacks::default(),
    )
    .expect("valid props");
    component.mount(Some(first.pair()));

    component.bind_media(Some(first.pair()));
    assert_eq!(first.primary.listener_count(), 3);

    component.bind_media(Some(second.pair()));
    assert_eq!(first.primary.listener_count(), 0);
    assert_eq!(second.primary.listener_count(), 3);

    component.unmount();
    component.unmount();
    assert_eq!(second.primary.listener_count(), 0);
    assert!(!component.is_mounted());
}

#[test]
fn component_in_image_mode_never_attaches() {
    let media = Fixture::new();
    let mut component = AmbientLight::new(
        AmbientLightProps::new("a.jpg", MediaKind::Image),
        MediaCallbacks::default(),
    )
    .expect("valid props");

    component.mount(Some(media.pair()));

    assert!(!component.is_synced());
    assert_eq!(media.primary.listener_count(), 0);
}
