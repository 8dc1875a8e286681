//! Derived view model over the notification feed.
//!
//! Everything here is a pure function of `(feed, now)` so ordering,
//! windowing, and bucketing stay independently testable without timers.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{NotificationRecord, TimeBucket};
use crate::store::NotificationFeed;

/// One rendered feed section: a time bucket and its members, newest first.
#[derive(Debug, Clone)]
pub struct FeedSection {
    pub bucket: TimeBucket,
    pub records: Vec<NotificationRecord>,
}

#[derive(Debug, Clone)]
pub struct FeedView {
    pub sections: Vec<FeedSection>,
    pub total: usize,
    pub visible_count: usize,
    pub unread_count: usize,
}

/// Group records into ordered time buckets; buckets with zero members are
/// omitted and the bucket order is fixed regardless of member counts.
pub fn bucketed(records: &[NotificationRecord], now: DateTime<Utc>) -> Vec<FeedSection> {
    let mut groups: HashMap<TimeBucket, Vec<NotificationRecord>> = HashMap::new();
    for record in records {
        let bucket = TimeBucket::for_timestamp(now, record.resolved_timestamp(now));
        groups.entry(bucket).or_default().push(record.clone());
    }
    TimeBucket::ORDER
        .iter()
        .filter_map(|bucket| {
            groups.remove(bucket).map(|records| FeedSection {
                bucket: *bucket,
                records,
            })
        })
        .collect()
}

/// Build the presented view: merge the read overlay into each record, sort
/// descending by resolved timestamp, take the visible window, bucket it.
pub fn build_feed_view(feed: &NotificationFeed, now: DateTime<Utc>) -> FeedView {
    let mut merged: Vec<NotificationRecord> = feed
        .records()
        .iter()
        .map(|record| {
            let mut record = record.clone();
            record.read = feed.is_read(&record);
            record
        })
        .collect();
    merged.sort_by_key(|record| Reverse(record.resolved_timestamp(now)));

    let shown = merged.len().min(feed.visible_count());
    FeedView {
        sections: bucketed(&merged[..shown], now),
        total: merged.len(),
        visible_count: feed.visible_count(),
        unread_count: feed.unread_count(),
    }
}
