//! Browsing preferences: grid/list view mode and rating filter.
//!
//! This is the model behind the gallery toolbar. The toolbar mutates it,
//! the gallery view subscribes to it and re-renders on every change.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::collection::ImageCollectionModel;
use crate::error::Error;
use crate::image::{ImageModel, MAX_RATING};
use crate::subject::{ListenerId, Subject};

/// How the gallery lays out images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Which images the gallery shows: everything, or only images rated at
/// least some number of stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingFilter(u8);

impl RatingFilter {
    /// No filtering; every image is visible.
    pub const ALL: RatingFilter = RatingFilter(0);

    /// Filter on a minimum rating in 1-5, or 0 for no filtering.
    pub fn new(rating: u8) -> Result<Self, Error> {
        if rating > MAX_RATING {
            return Err(Error::InvalidRating(rating));
        }
        Ok(Self(rating))
    }

    pub fn rating(self) -> u8 {
        self.0
    }

    /// Whether `image` passes the filter.
    pub fn matches(self, image: &ImageModel) -> bool {
        self.0 == 0 || image.rating() >= self.0
    }
}

impl Default for RatingFilter {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseEventKind {
    ViewModeChanged,
    FilterChanged,
}

/// Payload delivered to preference listeners.
#[derive(Debug, Clone)]
pub struct BrowseEvent {
    pub kind: BrowseEventKind,
    pub prefs: BrowsePrefs,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
struct BrowseState {
    mode: ViewMode,
    filter: RatingFilter,
}

struct Inner {
    state: RefCell<BrowseState>,
    subject: Subject<BrowseEvent>,
}

/// Handle to the current browsing preferences with change notification.
#[derive(Clone)]
pub struct BrowsePrefs {
    inner: Rc<Inner>,
}

impl BrowsePrefs {
    /// Grid view, no filtering.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(BrowseState {
                    mode: ViewMode::default(),
                    filter: RatingFilter::default(),
                }),
                subject: Subject::new(),
            }),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.inner.state.borrow().mode
    }

    pub fn rating_filter(&self) -> RatingFilter {
        self.inner.state.borrow().filter
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.inner.state.borrow_mut().mode = mode;
        debug!(?mode, "view mode changed");
        self.broadcast(BrowseEventKind::ViewModeChanged);
    }

    pub fn set_rating_filter(&self, filter: RatingFilter) {
        self.inner.state.borrow_mut().filter = filter;
        debug!(rating = filter.rating(), "rating filter changed");
        self.broadcast(BrowseEventKind::FilterChanged);
    }

    /// The images of `collection` passing the current filter, in collection
    /// order.
    pub fn visible_images(&self, collection: &ImageCollectionModel) -> Vec<ImageModel> {
        let filter = self.rating_filter();
        collection
            .image_models()
            .into_iter()
            .filter(|image| filter.matches(image))
            .collect()
    }

    pub fn subscribe(&self, listener: impl Fn(&BrowseEvent) + 'static) -> ListenerId {
        self.inner.subject.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.subject.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.subject.len()
    }

    fn broadcast(&self, kind: BrowseEventKind) {
        let event = BrowseEvent {
            kind,
            prefs: self.clone(),
            at: Utc::now(),
        };
        self.inner.subject.notify(&event);
    }
}

impl Default for BrowsePrefs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BrowsePrefs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("BrowsePrefs")
            .field("mode", &state.mode)
            .field("filter", &state.filter)
            .finish()
    }
}
