//! Swipe cursor
//!
//! Walks a feed one restaurant at a time. The cursor holds an index, never a
//! copy of the feed, and wraps around at the end so it never runs out while
//! the feed has entries.

use crate::liked::LikedStore;
use crate::restaurant::Restaurant;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Position of the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum CursorState {
    Idle(usize),
    Empty,
    Error(String),
}

/// Advance owed after a like or save
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAdvance {
    /// Restaurant that was liked
    pub restaurant: Restaurant,
    from: usize,
    delay: Duration,
}

impl PendingAdvance {
    /// Wait out the presentation delay
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Presentation pointer into a feed
#[derive(Debug, Clone)]
pub struct SwipeCursor {
    state: CursorState,
    len: usize,
    delay: Duration,
    saved: HashSet<String>,
}

impl SwipeCursor {
    /// Start on a feed, at `initial_id` if it is present, else at the first entry
    pub fn for_feed(feed: &[Restaurant], initial_id: Option<&str>, delay: Duration) -> Self {
        let state = if feed.is_empty() {
            CursorState::Empty
        } else {
            let index = initial_id
                .and_then(|id| feed.iter().position(|r| r.id == id))
                .unwrap_or(0);
            CursorState::Idle(index)
        };

        Self {
            state,
            len: feed.len(),
            delay,
            saved: HashSet::new(),
        }
    }

    /// Cursor over a feed that failed to assemble
    pub fn failed(message: impl Into<String>, delay: Duration) -> Self {
        Self {
            state: CursorState::Error(message.into()),
            len: 0,
            delay,
            saved: HashSet::new(),
        }
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Index of the current restaurant, if any
    pub fn index(&self) -> Option<usize> {
        match self.state {
            CursorState::Idle(index) => Some(index),
            _ => None,
        }
    }

    /// Current restaurant of `feed`
    pub fn current<'a>(&self, feed: &'a [Restaurant]) -> Option<&'a Restaurant> {
        self.index().and_then(|index| feed.get(index))
    }

    /// Skip the current restaurant
    pub fn reject(&mut self) {
        self.advance();
    }

    /// Like the current restaurant
    ///
    /// The restaurant is added right away; the returned advance is applied
    /// with [`SwipeCursor::settle`] once its delay has passed.
    pub fn like(&mut self, feed: &[Restaurant], liked: &mut LikedStore) -> Option<PendingAdvance> {
        let from = self.index()?;
        let restaurant = feed.get(from)?.clone();
        liked.add(restaurant.clone());
        Some(PendingAdvance {
            restaurant,
            from,
            delay: self.delay,
        })
    }

    /// Star the current restaurant: liked and marked as saved
    pub fn save(&mut self, feed: &[Restaurant], liked: &mut LikedStore) -> Option<PendingAdvance> {
        let pending = self.like(feed, liked)?;
        self.saved.insert(pending.restaurant.id.clone());
        Some(pending)
    }

    /// Apply a delayed advance; false if the cursor moved in the meantime
    pub fn settle(&mut self, pending: &PendingAdvance) -> bool {
        if self.index() != Some(pending.from) {
            debug!("Cursor left {} before its advance", pending.from);
            return false;
        }
        self.advance();
        true
    }

    /// Whether `id` was starred during this session
    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    fn advance(&mut self) {
        if let CursorState::Idle(index) = self.state {
            // len > 0 whenever the cursor is idle
            let next = (index + 1) % self.len;
            debug!("Cursor {} -> {}", index, next);
            self.state = CursorState::Idle(next);
        }
    }
}
