//! Circular (infinite loop) feeds.

use reelkit_core::{to_logical_index, FeedIndexMapper, MediaSource, ReelsConfig, ReelsError};
use reelkit_player::{MediaPlayerFactory, PlaybackOrchestrator};

fn circular_feed(preload: usize, count: usize) -> PlaybackOrchestrator<MediaPlayerFactory> {
    crate::init_tracing();
    let items = (0..count)
        .map(|i| MediaSource::video(format!("loop-{}.mp4", i)))
        .collect();
    let config = ReelsConfig::new(preload, 2 * preload + 1, true).unwrap();
    PlaybackOrchestrator::new(config, items, MediaPlayerFactory::new()).unwrap()
}

#[test]
fn window_wraps_around_the_origin() {
    let mut feed = circular_feed(2, 5);
    let report = feed.settle(0).unwrap();

    assert!(report.is_clean());
    assert_eq!(feed.bound_pages(), vec![-2, -1, 0, 1, 2]);
    assert_eq!(feed.handle(-1).unwrap().url(), Some("loop-4.mp4"));
    assert_eq!(feed.handle(-2).unwrap().url(), Some("loop-3.mp4"));
    assert_eq!(feed.handle(2).unwrap().url(), Some("loop-2.mp4"));
}

#[test]
fn feed_shorter_than_window_binds_each_raw_page() {
    // two items, five pages in the window: the same item shows on several pages
    let mut feed = circular_feed(2, 2);
    feed.settle(10).unwrap();

    assert_eq!(feed.bound_pages(), vec![8, 9, 10, 11, 12]);
    assert_eq!(feed.handle(8).unwrap().url(), Some("loop-0.mp4"));
    assert_eq!(feed.handle(9).unwrap().url(), Some("loop-1.mp4"));
}

#[test]
fn scrolling_backwards_forever() {
    let mut feed = circular_feed(1, 7);
    for raw in (-1_000..=0).rev() {
        let report = feed.settle(raw).unwrap();
        assert!(report.logical_index < 7);
        assert!(report.is_clean());
        assert!(feed.pool_stats().live() <= 3);
    }
    assert_eq!(feed.logical_index(-1_000).unwrap(), to_logical_index(-1_000, 7, true, 0).unwrap());
}

#[test]
fn extreme_positions_map_without_overflow() {
    let mapper = FeedIndexMapper::circular_with_origin(10, i64::MAX / 2);
    for raw in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX - 1, i64::MAX] {
        assert!(mapper.logical_index(raw).unwrap() < 10);
    }

    let mut feed = circular_feed(1, 4);
    feed.settle(i64::MAX).unwrap();
    assert_eq!(feed.bound_pages(), vec![i64::MAX - 1, i64::MAX]);
}

#[test]
fn start_position_opens_on_initial_item() {
    crate::init_tracing();
    let items = (0..6).map(|i| MediaSource::video(format!("{}.mp4", i))).collect();
    let config = ReelsConfig::new(1, 3, true).unwrap().with_initial_index(4);
    let mut feed = PlaybackOrchestrator::new(config, items, MediaPlayerFactory::new()).unwrap();

    let start = feed.start_position().unwrap();
    let report = feed.settle(start).unwrap();
    assert_eq!(report.logical_index, 4);
    assert_eq!(feed.media_at(start + 2).unwrap().url(), "0.mp4");
}

#[test]
fn empty_circular_feed_refuses_to_settle() {
    let mut feed = circular_feed(1, 0);
    assert!(matches!(feed.settle(3), Err(ReelsError::EmptyFeed)));
    assert!(matches!(feed.start_position(), Err(ReelsError::EmptyFeed)));
    assert_eq!(feed.pool_stats().live(), 0);
}
