//! Scroll scenarios over finite feeds.
//!
//! Exercises reelkit-core configuration and windowing through the
//! reelkit-player orchestrator.

use reelkit_core::{MediaSource, ReelsConfig, ReelsError};
use reelkit_player::{MediaPlayer, MediaPlayerFactory, PlaybackOrchestrator, PlayerStats};
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────

type Feed = PlaybackOrchestrator<MediaPlayerFactory>;

fn videos(count: usize) -> Vec<MediaSource> {
    (0..count)
        .map(|i| MediaSource::video(format!("https://cdn.example/reel-{}.mp4", i)))
        .collect()
}

fn build_feed(preload: usize, capacity: usize, count: usize) -> (Feed, Arc<PlayerStats>) {
    crate::init_tracing();
    let factory = MediaPlayerFactory::new();
    let stats = factory.stats();
    let config = ReelsConfig::new(preload, capacity, false).unwrap();
    (
        PlaybackOrchestrator::new(config, videos(count), factory).unwrap(),
        stats,
    )
}

fn playing(feed: &Feed) -> Vec<i64> {
    feed.bound_pages()
        .into_iter()
        .filter(|page| feed.handle(*page).is_some_and(MediaPlayer::is_playing))
        .collect()
}

// ── Window sizing ──────────────────────────────────────────────

#[test]
fn clipped_edges_and_interior_window() {
    let (mut feed, _) = build_feed(2, 5, 10);

    feed.settle(0).unwrap();
    assert_eq!(feed.bound_pages(), vec![0, 1, 2]);

    let report = feed.settle(5).unwrap();
    assert_eq!(feed.bound_pages(), vec![3, 4, 5, 6, 7]);
    assert_eq!(report.released, vec![0, 1, 2]);

    feed.settle(9).unwrap();
    assert_eq!(feed.bound_pages(), vec![7, 8, 9]);
}

#[test]
fn interior_window_matches_radius_for_every_page() {
    for radius in 0..4usize {
        let (mut feed, _) = build_feed(radius, 2 * radius + 1, 12);
        for page in 0..12i64 {
            feed.settle(page).unwrap();
            let r = radius as i64;
            let expected: Vec<i64> = ((page - r).max(0)..=(page + r).min(11)).collect();
            assert_eq!(feed.bound_pages(), expected, "radius {} page {}", radius, page);
        }
    }
}

#[test]
fn minimum_pool_never_exhausts_on_rapid_settles() {
    let (mut feed, stats) = build_feed(1, 3, 10);

    for page in [0, 1, 2] {
        let report = feed.settle(page).unwrap();
        assert!(report.is_clean(), "settle({}) failed: {:?}", page, report.failures);
    }
    assert_eq!(feed.bound_pages(), vec![1, 2, 3]);
    assert!(stats.created() <= 3);
}

#[test]
fn undersized_pool_is_rejected() {
    let err = ReelsConfig::new(1, 2, false).unwrap_err();
    assert!(matches!(
        err,
        ReelsError::InvalidConfig {
            capacity: 2,
            required: 3,
            ..
        }
    ));
}

#[test]
fn pool_size_bounded_over_long_scroll() {
    let (mut feed, stats) = build_feed(2, 5, 40);

    let path = (0..40).chain((0..40).rev()).chain([0, 39, 20, 21, 5]);
    for page in path {
        feed.settle(page).unwrap();
        assert!(feed.pool_stats().live() <= 5);
        assert!(stats.alive() <= 5);
    }
}

// ── Jumps ──────────────────────────────────────────────────────

#[test]
fn far_jump_skips_intermediate_pages() {
    let (mut feed, _) = build_feed(1, 3, 100);
    let rx = feed.subscribe();

    feed.settle(0).unwrap();
    let report = feed.settle(50).unwrap();

    assert_eq!(report.released, vec![0, 1]);
    assert_eq!(feed.bound_pages(), vec![49, 50, 51]);

    // nothing between the two windows was ever bound
    let bound: Vec<i64> = rx
        .try_iter()
        .filter_map(|event| match event {
            reelkit_player::FeedEvent::Bound { page, .. } => Some(page),
            _ => None,
        })
        .collect();
    assert!(bound.iter().all(|p| *p <= 1 || (49..=51).contains(p)));
}

// ── Play / mute intent ─────────────────────────────────────────

#[test]
fn exactly_one_page_plays() {
    let (mut feed, _) = build_feed(2, 5, 10);

    for page in [0, 4, 5, 9] {
        feed.settle(page).unwrap();
        assert_eq!(playing(&feed), vec![page]);
    }

    feed.pause();
    assert!(playing(&feed).is_empty());
    feed.settle(3).unwrap();
    assert!(playing(&feed).is_empty());

    feed.play();
    assert_eq!(playing(&feed), vec![3]);
}

#[test]
fn mute_reaches_pages_bound_later() {
    let (mut feed, _) = build_feed(1, 3, 10);
    feed.settle(0).unwrap();
    feed.set_muted(true);

    feed.settle(6).unwrap();
    for page in feed.bound_pages() {
        assert!(feed.handle(page).unwrap().is_muted(), "page {}", page);
    }

    feed.set_muted(false);
    for page in feed.bound_pages() {
        assert!(!feed.handle(page).unwrap().is_muted(), "page {}", page);
    }
}

#[test]
fn mixed_feed_binds_only_videos() {
    crate::init_tracing();
    let items = vec![
        MediaSource::from_url("https://cdn.example/a.mp4", None),
        MediaSource::from_url("https://cdn.example/b.jpg", None),
        MediaSource::from_url("https://cdn.example/c.m3u8", None),
        MediaSource::from_url("https://cdn.example/d.png", None),
    ];
    let config = ReelsConfig::new(1, 3, false).unwrap();
    let mut feed = PlaybackOrchestrator::new(config, items, MediaPlayerFactory::new()).unwrap();

    feed.settle(1).unwrap();
    assert_eq!(feed.bound_pages(), vec![0, 2]);

    feed.settle(2).unwrap();
    assert_eq!(feed.bound_pages(), vec![2]);
    assert!(feed.handle(2).unwrap().is_playing());
}

#[test]
fn out_of_range_settle_is_rejected() {
    let (mut feed, _) = build_feed(1, 3, 4);
    feed.settle(2).unwrap();

    assert!(matches!(feed.settle(-1), Err(ReelsError::OutOfRange { .. })));
    assert!(matches!(feed.settle(4), Err(ReelsError::OutOfRange { .. })));
    assert_eq!(feed.current_page(), Some(2));
    assert_eq!(feed.bound_pages(), vec![1, 2, 3]);
}
