//! Feed session
//!
//! Tracks the latest feed and the cursor over it. Every refresh takes a new
//! generation; a result is applied only if its generation is still the
//! latest, so a slow response can never replace a newer feed.

use super::FeedState;
use crate::error::Result;
use crate::liked::LikedStore;
use crate::restaurant::Restaurant;
use crate::swipe::{PendingAdvance, SwipeCursor};
use std::time::Duration;
use tracing::debug;

/// Token identifying one feed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Latest feed, its generation and the cursor walking it
#[derive(Debug)]
pub struct FeedSession {
    generation: u64,
    state: FeedState,
    cursor: SwipeCursor,
    delay: Duration,
}

impl FeedSession {
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: 0,
            state: FeedState::Loading,
            cursor: SwipeCursor::for_feed(&[], None, delay),
            delay,
        }
    }

    /// Start a new request, superseding any in flight
    pub fn begin(&mut self) -> Generation {
        self.generation += 1;
        self.state = FeedState::Loading;
        self.cursor = SwipeCursor::for_feed(&[], None, self.delay);
        Generation(self.generation)
    }

    /// Apply a finished request; returns false if it was superseded
    pub fn complete(&mut self, generation: Generation, result: Result<Vec<Restaurant>>) -> bool {
        if generation.0 != self.generation {
            debug!(
                "Discarding stale feed response (generation {}, latest {})",
                generation.0, self.generation
            );
            return false;
        }

        self.state = FeedState::from_result(result);
        self.cursor = match &self.state {
            FeedState::Failed(message) => SwipeCursor::failed(message.clone(), self.delay),
            state => SwipeCursor::for_feed(state.restaurants(), None, self.delay),
        };
        true
    }

    /// Generation of the latest request
    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn cursor(&self) -> &SwipeCursor {
        &self.cursor
    }

    /// Restaurant under the cursor
    pub fn current(&self) -> Option<&Restaurant> {
        self.cursor.current(self.state.restaurants())
    }

    /// Move the cursor to a restaurant of the current feed; false if absent
    pub fn focus(&mut self, id: &str) -> bool {
        let restaurants = self.state.restaurants();
        if !restaurants.iter().any(|r| r.id == id) {
            return false;
        }
        self.cursor = SwipeCursor::for_feed(restaurants, Some(id), self.delay);
        true
    }

    pub fn reject(&mut self) -> Option<&Restaurant> {
        self.cursor.reject();
        self.current()
    }

    /// Like the current restaurant; the advance is owed until [`FeedSession::settle`]
    pub fn like(&mut self, liked: &mut LikedStore) -> Option<(Generation, PendingAdvance)> {
        let generation = Generation(self.generation);
        let Self { state, cursor, .. } = self;
        let pending = cursor.like(state.restaurants(), liked)?;
        Some((generation, pending))
    }

    /// Star the current restaurant; the advance is owed until [`FeedSession::settle`]
    pub fn save(&mut self, liked: &mut LikedStore) -> Option<(Generation, PendingAdvance)> {
        let generation = Generation(self.generation);
        let Self { state, cursor, .. } = self;
        let pending = cursor.save(state.restaurants(), liked)?;
        Some((generation, pending))
    }

    /// Apply an owed advance unless a newer feed replaced the cursor
    pub fn settle(&mut self, generation: Generation, pending: &PendingAdvance) -> bool {
        if generation.0 != self.generation {
            debug!("Dropping advance from generation {}", generation.0);
            return false;
        }
        self.cursor.settle(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::coord::Coordinates;
    use crate::restaurant::RestaurantType;
    use crate::storage::MemoryStore;
    use crate::swipe::CursorState;
    use std::sync::Arc;

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: id.to_string(),
            cuisine: "Restaurant".to_string(),
            rating: 0.0,
            price_range: String::new(),
            distance: 0.2,
            is_open: true,
            image: "/placeholder.svg".to_string(),
            website: String::new(),
            reviews: Vec::new(),
            location: Coordinates::new(44.0, -76.0),
            types: RestaurantType {
                primary: "restaurant".to_string(),
                cuisines: Vec::new(),
                attributes: Vec::new(),
            },
        }
    }

    #[test]
    fn test_starts_loading() {
        let session = FeedSession::new(Duration::ZERO);
        assert_eq!(session.state(), &FeedState::Loading);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut session = FeedSession::new(Duration::ZERO);

        let first = session.begin();
        let second = session.begin();

        assert!(session.complete(second, Ok(vec![restaurant("new")])));
        assert!(!session.complete(first, Ok(vec![restaurant("old")])));

        assert_eq!(session.current().unwrap().id, "new");
        assert_eq!(session.generation(), second);
    }

    #[test]
    fn test_stale_response_ignored_while_loading() {
        let mut session = FeedSession::new(Duration::ZERO);
        let first = session.begin();
        session.begin();

        assert!(!session.complete(first, Ok(vec![restaurant("old")])));
        assert_eq!(session.state(), &FeedState::Loading);
    }

    #[test]
    fn test_outcomes_map_to_states() {
        let mut session = FeedSession::new(Duration::ZERO);

        let generation = session.begin();
        session.complete(generation, Ok(Vec::new()));
        assert_eq!(session.state(), &FeedState::Empty);
        assert_eq!(session.cursor().state(), &CursorState::Empty);

        let generation = session.begin();
        session.complete(generation, Err(Error::Feed("nope".to_string())));
        assert_eq!(session.state(), &FeedState::Failed("nope".to_string()));
        assert_eq!(session.cursor().state(), &CursorState::Error("nope".to_string()));
    }

    #[test]
    fn test_focus_and_reject() {
        let mut session = FeedSession::new(Duration::ZERO);
        let generation = session.begin();
        session.complete(generation, Ok(vec![restaurant("a"), restaurant("b")]));

        assert!(session.focus("b"));
        assert!(!session.focus("zz"));
        assert_eq!(session.current().unwrap().id, "b");
        assert_eq!(session.reject().unwrap().id, "a");
    }

    #[test]
    fn test_like_and_save_through_session() {
        let mut session = FeedSession::new(Duration::ZERO);
        let mut liked = LikedStore::load(Arc::new(MemoryStore::new()));
        let generation = session.begin();
        session.complete(generation, Ok(vec![restaurant("a"), restaurant("b")]));

        let (owed, pending) = session.like(&mut liked).unwrap();
        assert_eq!(pending.restaurant.id, "a");
        assert!(session.settle(owed, &pending));

        let (owed, pending) = session.save(&mut liked).unwrap();
        assert_eq!(pending.restaurant.id, "b");
        assert!(session.settle(owed, &pending));

        assert!(session.cursor().is_saved("b"));
        assert_eq!(liked.len(), 2);
        assert_eq!(session.current().unwrap().id, "a");
    }

    #[test]
    fn test_advance_dropped_after_refresh() {
        let mut session = FeedSession::new(Duration::ZERO);
        let mut liked = LikedStore::load(Arc::new(MemoryStore::new()));
        let generation = session.begin();
        session.complete(generation, Ok(vec![restaurant("a"), restaurant("b")]));

        let (owed, pending) = session.like(&mut liked).unwrap();

        let generation = session.begin();
        session.complete(generation, Ok(vec![restaurant("x"), restaurant("y")]));

        assert!(!session.settle(owed, &pending));
        assert_eq!(session.current().unwrap().id, "x");
        assert!(liked.contains("a"));
    }
}
