//! Integration tests for Remux Core

use async_trait::async_trait;
use remux_core::{
    AutoplayOutcome, ContainerLayout, Error, ErrorListener, Layout, LayoutHost, MediaEngine,
    MediaPlatform, PlaybackStatus, PlayerConfig, PlayerHandle, Rect, Result, ScrollDirection,
    ScrollInfo, TextTrack, TextTrackKind, WindowSize,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

// =============================================================================
// Mock engine
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Attach(String),
    Detach,
    Load(String),
    AddTrack(String, String),
    Visibility(bool),
    Play,
}

#[derive(Default)]
struct Behavior {
    fail_attach: bool,
    fail_load: bool,
    block_autoplay: bool,
    rejected_tracks: Vec<String>,
}

type CallLog = Rc<RefCell<Vec<Call>>>;

struct MockEngine {
    log: CallLog,
    behavior: Rc<RefCell<Behavior>>,
    element: RefCell<Option<String>>,
    listeners: Rc<RefCell<Vec<ErrorListener>>>,
}

#[async_trait(?Send)]
impl MediaEngine for MockEngine {
    type Element = String;

    fn add_error_listener(&self, listener: ErrorListener) {
        self.listeners.borrow_mut().push(listener);
    }

    async fn attach(&self, element: &String, _init_media_source: bool) -> Result<()> {
        tokio::task::yield_now().await;
        self.log.borrow_mut().push(Call::Attach(element.clone()));
        if self.behavior.borrow().fail_attach {
            return Err(Error::Attach("media source unavailable".into()));
        }
        *self.element.borrow_mut() = Some(element.clone());
        Ok(())
    }

    async fn detach(&self) -> Result<()> {
        tokio::task::yield_now().await;
        self.log.borrow_mut().push(Call::Detach);
        *self.element.borrow_mut() = None;
        Ok(())
    }

    async fn load(&self, url: &str) -> Result<()> {
        tokio::task::yield_now().await;
        self.log.borrow_mut().push(Call::Load(url.to_string()));
        if self.behavior.borrow().fail_load {
            return Err(Error::load(url, "HTTP 404"));
        }
        Ok(())
    }

    async fn add_text_track(&self, track: &TextTrack, kind: TextTrackKind) -> Result<()> {
        self.log
            .borrow_mut()
            .push(Call::AddTrack(track.url.clone(), kind.to_string()));
        if self.behavior.borrow().rejected_tracks.contains(&track.url) {
            return Err(Error::TextTrack {
                url: track.url.clone(),
                reason: "unsupported mime".into(),
            });
        }
        Ok(())
    }

    fn set_text_track_visibility(&self, visible: bool) {
        self.log.borrow_mut().push(Call::Visibility(visible));
    }

    async fn play(&self, _element: &String) -> Result<()> {
        tokio::task::yield_now().await;
        self.log.borrow_mut().push(Call::Play);
        if self.behavior.borrow().block_autoplay {
            return Err(Error::Engine("NotAllowedError: play() failed".into()));
        }
        Ok(())
    }
}

struct MockPlatform {
    elements: Vec<String>,
    supported: bool,
    created: Cell<usize>,
    polyfills: Cell<usize>,
    log: CallLog,
    behavior: Rc<RefCell<Behavior>>,
    listeners: Rc<RefCell<Vec<ErrorListener>>>,
}

impl MockPlatform {
    fn new() -> Self {
        Self {
            elements: vec!["video-player".to_string()],
            supported: true,
            created: Cell::new(0),
            polyfills: Cell::new(0),
            log: Rc::new(RefCell::new(Vec::new())),
            behavior: Rc::new(RefCell::new(Behavior::default())),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn without_elements() -> Self {
        Self {
            elements: Vec::new(),
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }
}

impl MediaPlatform for MockPlatform {
    type Engine = MockEngine;

    fn install_polyfills(&self) {
        self.polyfills.set(self.polyfills.get() + 1);
    }

    fn find_media_element(&self, id: &str) -> Option<String> {
        self.elements.iter().find(|e| *e == id).cloned()
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create_engine(&self) -> Result<MockEngine> {
        self.created.set(self.created.get() + 1);
        Ok(MockEngine {
            log: Rc::clone(&self.log),
            behavior: Rc::clone(&self.behavior),
            element: RefCell::new(None),
            listeners: Rc::clone(&self.listeners),
        })
    }
}

fn tracks() -> Vec<TextTrack> {
    vec![
        TextTrack::from_subtitle("https://subs.example.com/en.srt", Some("en".into())),
        TextTrack::from_subtitle("https://subs.example.com/xx.srt", None),
    ]
}

const SOURCE: &str = "https://cdn.example.com/movie/manifest.mpd";

// =============================================================================
// Bootstrap Tests
// =============================================================================

#[test]
fn test_bootstrap_twice_creates_one_engine() {
    let player = PlayerHandle::new(MockPlatform::new());

    tokio_test::block_on(async {
        player.bootstrap("video-player").await.unwrap();
        player.bootstrap("video-player").await.unwrap();
    });

    assert_eq!(player.platform().created.get(), 1);
    assert_eq!(player.platform().polyfills.get(), 1);
    assert_eq!(player.platform().listeners.borrow().len(), 1);
    assert_eq!(player.platform().calls(), vec![Call::Attach("video-player".into())]);
}

#[test]
fn test_bootstrap_missing_element_fails() {
    let player = PlayerHandle::new(MockPlatform::without_elements());

    let result = tokio_test::block_on(player.bootstrap("video-player"));

    assert_eq!(
        result,
        Err(Error::ElementNotFound {
            id: "video-player".into()
        })
    );
    assert_eq!(player.platform().created.get(), 0);
    assert!(!player.is_initialized());
}

#[test]
fn test_bootstrap_unsupported_platform_fails() {
    let platform = MockPlatform {
        supported: false,
        ..MockPlatform::new()
    };
    let player = PlayerHandle::new(platform);

    let result = tokio_test::block_on(player.bootstrap("video-player"));

    assert_eq!(result, Err(Error::UnsupportedPlatform));
    assert!(result.unwrap_err().is_fatal());
    assert_eq!(player.platform().created.get(), 0);
}

#[test]
fn test_bootstrap_can_retry_after_attach_failure() {
    let player = PlayerHandle::new(MockPlatform::new());
    player.platform().behavior.borrow_mut().fail_attach = true;

    let first = tokio_test::block_on(player.bootstrap("video-player"));
    assert!(matches!(first, Err(Error::Attach(_))));
    assert!(!player.is_initialized());

    player.platform().behavior.borrow_mut().fail_attach = false;
    tokio_test::block_on(player.bootstrap("video-player")).unwrap();

    assert!(player.is_initialized());
    assert_eq!(player.platform().created.get(), 2);
}

#[test]
fn test_concurrent_bootstrap_creates_one_engine() {
    let player = PlayerHandle::new(MockPlatform::new());

    let (a, b) = tokio_test::block_on(async {
        tokio::join!(player.bootstrap("video-player"), player.bootstrap("video-player"))
    });

    assert_eq!(a, Ok(()));
    assert_eq!(b, Ok(()));
    assert_eq!(player.platform().created.get(), 1);
    assert_eq!(player.platform().calls(), vec![Call::Attach("video-player".into())]);
    assert!(player.is_initialized());
}

#[test]
fn test_playback_waits_for_pending_bootstrap() {
    let player = PlayerHandle::new(MockPlatform::new());

    let (bootstrapped, report) = tokio_test::block_on(async {
        tokio::join!(player.bootstrap("video-player"), player.start_playback(SOURCE, &[]))
    });

    assert_eq!(bootstrapped, Ok(()));
    assert!(report.is_loaded());
    assert_eq!(report.status, PlaybackStatus::Playing);
    assert_eq!(player.platform().created.get(), 1);
}

#[test]
fn test_waiting_bootstrap_retries_after_failed_attach() {
    let player = PlayerHandle::new(MockPlatform::new());
    player.platform().behavior.borrow_mut().fail_attach = true;

    let (first, second) = tokio_test::block_on(async {
        tokio::join!(player.bootstrap("video-player"), player.bootstrap("video-player"))
    });

    assert!(matches!(first, Err(Error::Attach(_))));
    assert!(matches!(second, Err(Error::Attach(_))));
    assert_eq!(player.platform().created.get(), 2);
    assert!(!player.is_initialized());
}

// =============================================================================
// Playback Tests
// =============================================================================

#[test]
fn test_playback_sequence() {
    let player = PlayerHandle::new(MockPlatform::new());

    let report = tokio_test::block_on(player.start_playback(SOURCE, &[]));

    assert!(report.is_loaded());
    assert_eq!(report.status, PlaybackStatus::Playing);
    assert_eq!(report.autoplay, AutoplayOutcome::Started);
    assert!(!report.captions_visible);
    assert_eq!(
        player.platform().calls(),
        vec![
            Call::Attach("video-player".into()),
            Call::Detach,
            Call::Attach("video-player".into()),
            Call::Load(SOURCE.into()),
            Call::Play,
        ]
    );
}

#[test]
fn test_load_failure_is_swallowed() {
    let player = PlayerHandle::new(MockPlatform::new());
    player.platform().behavior.borrow_mut().fail_load = true;

    let report = tokio_test::block_on(player.start_playback(SOURCE, &tracks()));

    assert_eq!(report.failure, Some(Error::load(SOURCE, "HTTP 404")));
    assert!(report.status.is_error());
    assert!(!report.captions_visible);
    assert!(!player.platform().calls().contains(&Call::Play));

    // The next start still goes through
    player.platform().behavior.borrow_mut().fail_load = false;
    player.platform().clear_calls();
    let report = tokio_test::block_on(player.start_playback(SOURCE, &[]));

    assert!(report.is_loaded());
    assert_eq!(player.status(), PlaybackStatus::Playing);
    assert_eq!(player.platform().created.get(), 1);
    assert_eq!(player.platform().calls().first(), Some(&Call::Detach));
}

#[test]
fn test_playback_without_video_element_reports_failure() {
    let player = PlayerHandle::new(MockPlatform::without_elements());

    let report = tokio_test::block_on(player.start_playback(SOURCE, &[]));

    assert!(matches!(report.failure, Some(Error::ElementNotFound { .. })));
    assert!(player.platform().calls().is_empty());
}

#[test]
fn test_tracks_ignored_by_default_but_captions_shown() {
    let player = PlayerHandle::new(MockPlatform::new());

    let report = tokio_test::block_on(player.start_playback(SOURCE, &tracks()));

    assert_eq!(report.tracks_supplied, 2);
    assert!(report.text_tracks.is_empty());
    assert!(report.captions_visible);
    let calls = player.platform().calls();
    assert!(!calls.iter().any(|c| matches!(c, Call::AddTrack(..))));
    assert!(calls.contains(&Call::Visibility(true)));
}

#[test]
fn test_tracks_applied_when_configured() {
    let player = PlayerHandle::with_config(MockPlatform::new(), PlayerConfig::with_text_tracks());
    player
        .platform()
        .behavior
        .borrow_mut()
        .rejected_tracks
        .push("https://subs.example.com/xx.srt".into());

    let report = tokio_test::block_on(player.start_playback(SOURCE, &tracks()));

    assert!(report.is_loaded());
    assert_eq!(report.status, PlaybackStatus::Playing);
    assert_eq!(report.text_tracks.len(), 2);
    assert!(report.text_tracks[0].applied);
    assert!(!report.text_tracks[1].applied);
    assert_eq!(report.text_tracks[1].lang, "und");

    let calls = player.platform().calls();
    let load = calls.iter().position(|c| *c == Call::Load(SOURCE.into())).unwrap();
    let first_track = calls
        .iter()
        .position(|c| matches!(c, Call::AddTrack(..)))
        .unwrap();
    assert!(load < first_track);
    assert!(calls.contains(&Call::AddTrack(
        "https://subs.example.com/en.srt".into(),
        "subtitles".into()
    )));
}

#[test]
fn test_autoplay_blocked_is_not_a_failure() {
    let player = PlayerHandle::new(MockPlatform::new());
    player.platform().behavior.borrow_mut().block_autoplay = true;

    let report = tokio_test::block_on(player.start_playback(SOURCE, &[]));

    assert!(report.is_loaded());
    assert_eq!(report.status, PlaybackStatus::Paused);
    assert!(matches!(report.autoplay, AutoplayOutcome::Blocked(_)));
}

#[test]
fn test_autoplay_disabled() {
    let config = PlayerConfig {
        autoplay: false,
        ..Default::default()
    };
    let player = PlayerHandle::with_config(MockPlatform::new(), config);

    let report = tokio_test::block_on(player.start_playback(SOURCE, &[]));

    assert_eq!(report.autoplay, AutoplayOutcome::Disabled);
    assert!(!player.platform().calls().contains(&Call::Play));
}

#[test]
fn test_newer_playback_supersedes_older() {
    let player = PlayerHandle::new(MockPlatform::new());
    tokio_test::block_on(player.bootstrap("video-player")).unwrap();

    let (a, b) = tokio_test::block_on(async {
        tokio::join!(
            player.start_playback("https://cdn.example.com/a.mpd", &[]),
            player.start_playback("https://cdn.example.com/b.mpd", &[])
        )
    });

    let reports = [a, b];
    assert_eq!(
        reports
            .iter()
            .filter(|r| r.failure == Some(Error::Superseded))
            .count(),
        1
    );
    assert_eq!(reports.iter().filter(|r| r.is_loaded()).count(), 1);
    assert_eq!(player.status(), PlaybackStatus::Playing);
    let plays = player
        .platform()
        .calls()
        .iter()
        .filter(|c| **c == Call::Play)
        .count();
    assert_eq!(plays, 1);
}

#[test]
fn test_stop_abandons_playback_in_flight() {
    let player = PlayerHandle::new(MockPlatform::new());
    tokio_test::block_on(player.bootstrap("video-player")).unwrap();

    let (report, ()) = tokio_test::block_on(async {
        tokio::join!(player.start_playback(SOURCE, &[]), async {
            tokio::task::yield_now().await;
            player.stop();
        })
    });

    assert_eq!(report.failure, Some(Error::Superseded));
    assert_eq!(player.status(), PlaybackStatus::Stopped);
    assert!(!player.platform().calls().contains(&Call::Play));
}

#[test]
fn test_playback_after_stop_mid_detach() {
    let player = PlayerHandle::new(MockPlatform::new());
    tokio_test::block_on(player.bootstrap("video-player")).unwrap();

    tokio_test::block_on(async {
        tokio::join!(player.start_playback(SOURCE, &[]), async {
            tokio::task::yield_now().await;
            player.stop();
        })
    });
    assert_eq!(
        *player.engine().unwrap().element.borrow(),
        Some("video-player".to_string())
    );

    for _ in 0..2 {
        let report = tokio_test::block_on(player.start_playback(SOURCE, &[]));
        assert!(report.is_loaded());
        assert_eq!(report.status, PlaybackStatus::Playing);
    }
    assert_eq!(player.media_element(), Some("video-player".to_string()));
}

#[test]
fn test_malformed_text_tracks_are_reported() {
    let player = PlayerHandle::new(MockPlatform::new());
    let input = Err(Error::Serialization("invalid type: string, expected a sequence".into()));

    let report = tokio_test::block_on(player.start_playback_from_input(SOURCE, input));

    assert!(report.is_loaded());
    assert_eq!(report.tracks_supplied, 0);
    assert!(!report.captions_visible);
    assert_eq!(
        report.text_track_error.as_deref(),
        Some("Serialization error: invalid type: string, expected a sequence")
    );

    let report = tokio_test::block_on(player.start_playback_from_input(SOURCE, Ok(tracks())));
    assert_eq!(report.tracks_supplied, 2);
    assert_eq!(report.text_track_error, None);
}

// =============================================================================
// Layout Tests
// =============================================================================

#[derive(Default)]
struct MockHost {
    scroll: HashMap<String, ScrollInfo>,
    containers: HashMap<String, ContainerLayout>,
    scrolled_to: RefCell<Vec<(String, usize)>>,
}

impl LayoutHost for MockHost {
    fn scroll_info(&self, id: &str) -> Option<ScrollInfo> {
        self.scroll.get(id).copied()
    }

    fn window_size(&self) -> WindowSize {
        WindowSize::new(390, 844)
    }

    fn container_layout(&self, id: &str) -> Option<ContainerLayout> {
        self.containers.get(id).cloned()
    }

    fn scroll_child_into_view(&self, id: &str, index: usize) -> bool {
        let found = self
            .containers
            .get(id)
            .is_some_and(|layout| index < layout.children.len());
        if found {
            self.scrolled_to.borrow_mut().push((id.to_string(), index));
        }
        found
    }
}

const CAROUSEL_SCROLL: ScrollInfo = ScrollInfo {
    scroll_top: 0.0,
    scroll_left: 600.0,
    scroll_width: 2000.0,
    scroll_height: 200.0,
    client_width: 390.0,
    client_height: 200.0,
    offset_width: 390.0,
    offset_height: 200.0,
};

fn carousel_host() -> MockHost {
    let mut host = MockHost::default();
    host.scroll.insert("pl-000042".into(), CAROUSEL_SCROLL);
    // container spans x 0..390, cards are 150 wide, scrolled by 600
    let children = (0..10)
        .map(|i| Rect::from_origin(i as f64 * 150.0 - 600.0, 0.0, 150.0, 200.0))
        .collect();
    host.containers.insert(
        "pl-000042".into(),
        ContainerLayout {
            bounds: Rect::from_origin(0.0, 0.0, 390.0, 200.0),
            children,
        },
    );
    host
}

#[test]
fn test_scroll_info_snapshot() {
    let layout = Layout::new(carousel_host());

    assert_eq!(layout.scroll_info("pl-000042"), Some(CAROUSEL_SCROLL));
    assert!(layout.scroll_info("missing").is_none());
    assert_eq!(layout.window_size(), WindowSize::new(390, 844));
    assert!(layout.window_size().is_portrait());
}

#[test]
fn test_visibility_scan() {
    let layout = Layout::new(carousel_host());

    // card 6 spans 300..450 and overlaps the 0..390 viewport by 90
    assert_eq!(
        layout.find_last_partially_visible_index("pl-000042", ScrollDirection::Horizontal),
        Some(6)
    );
    assert_eq!(
        layout.find_last_partially_visible_index("missing", ScrollDirection::Horizontal),
        None
    );
    assert_eq!(
        layout.find_last_partially_visible_index_or_zero("missing", ScrollDirection::Horizontal),
        0
    );
}

#[test]
fn test_load_more_and_scroll_into_view() {
    let layout = Layout::new(carousel_host());

    // 2000 - (600 + 390) = 1010 remaining
    assert_eq!(
        layout.should_load_more("pl-000042", ScrollDirection::Horizontal),
        Some(false)
    );
    assert_eq!(layout.should_load_more("missing", ScrollDirection::Horizontal), None);

    assert!(layout.scroll_child_into_view("pl-000042", 3));
    assert!(!layout.scroll_child_into_view("pl-000042", 10));
    assert_eq!(
        layout.host().scrolled_to.borrow().as_slice(),
        &[("pl-000042".to_string(), 3)]
    );
}
