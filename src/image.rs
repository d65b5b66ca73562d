//! A single annotated image: path, caption, star rating, modification date.
//!
//! `ImageModel` is a cheap-to-clone handle over shared state, so one image
//! can belong to any number of collections and views at once. Equality is
//! identity: two handles compare equal when they point at the same image.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::error::Error;
use crate::subject::{ListenerId, Subject};

/// Highest allowed star rating; 0 means unrated.
pub const MAX_RATING: u8 = 5;

#[derive(Debug)]
struct ImageState {
    caption: String,
    rating: u8,
    modified: DateTime<Utc>,
}

struct Inner {
    // The path never changes after construction, so it lives outside the cell.
    path: PathBuf,
    state: RefCell<ImageState>,
    subject: Subject<ImageModel>,
}

/// Handle to one image's editable metadata plus change notification.
#[derive(Clone)]
pub struct ImageModel {
    inner: Rc<Inner>,
}

impl ImageModel {
    /// Construct an image with explicit metadata, e.g. when restoring from a
    /// stored snapshot. Fails if `rating` is out of range.
    pub fn new(
        path: impl Into<PathBuf>,
        modified: DateTime<Utc>,
        caption: impl Into<String>,
        rating: u8,
    ) -> Result<Self, Error> {
        if rating > MAX_RATING {
            return Err(Error::InvalidRating(rating));
        }
        Ok(Self {
            inner: Rc::new(Inner {
                path: path.into(),
                state: RefCell::new(ImageState {
                    caption: caption.into(),
                    rating,
                    modified,
                }),
                subject: Subject::new(),
            }),
        })
    }

    /// Construct a freshly imported image: empty caption, unrated.
    pub fn untagged(path: impl Into<PathBuf>, modified: DateTime<Utc>) -> Self {
        Self {
            inner: Rc::new(Inner {
                path: path.into(),
                state: RefCell::new(ImageState {
                    caption: String::new(),
                    rating: 0,
                    modified,
                }),
                subject: Subject::new(),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn caption(&self) -> String {
        self.inner.state.borrow().caption.clone()
    }

    pub fn rating(&self) -> u8 {
        self.inner.state.borrow().rating
    }

    pub fn modification_date(&self) -> DateTime<Utc> {
        self.inner.state.borrow().modified
    }

    /// Replace the caption, refresh the modification date and notify
    /// listeners. Exactly one notification per call.
    pub fn set_caption(&self, caption: impl Into<String>) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.caption = caption.into();
            state.modified = advance(state.modified);
        }
        trace!(path = %self.inner.path.display(), "caption updated");
        self.inner.subject.notify(self);
    }

    /// Reset the caption to the empty string, with the same date refresh and
    /// notification as [`set_caption`](Self::set_caption).
    pub fn clear_caption(&self) {
        self.set_caption("");
    }

    /// Set the star rating. Out-of-range values are rejected and leave the
    /// model entirely unchanged: no date refresh, no notification.
    pub fn set_rating(&self, rating: u8) -> Result<(), Error> {
        if rating > MAX_RATING {
            return Err(Error::InvalidRating(rating));
        }
        {
            let mut state = self.inner.state.borrow_mut();
            state.rating = rating;
            state.modified = advance(state.modified);
        }
        trace!(path = %self.inner.path.display(), rating, "rating updated");
        self.inner.subject.notify(self);
        Ok(())
    }

    /// Reset the rating to 0 (unrated).
    pub fn reset_rating(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.rating = 0;
            state.modified = advance(state.modified);
        }
        trace!(path = %self.inner.path.display(), "rating reset");
        self.inner.subject.notify(self);
    }

    /// Register a mutation listener, invoked with this image after every
    /// successful caption or rating change.
    pub fn subscribe(&self, listener: impl Fn(&ImageModel) + 'static) -> ListenerId {
        self.inner.subject.subscribe(listener)
    }

    /// Drop a mutation listener; an unknown id is a no-op.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.subject.unsubscribe(id)
    }

    /// Number of currently registered mutation listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.subject.len()
    }
}

/// Refresh a modification date to "now", guaranteed strictly after `prev`
/// even when two mutations land within clock resolution.
fn advance(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::nanoseconds(1)
    }
}

impl PartialEq for ImageModel {
    /// Identity comparison: same underlying image, not same field values.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ImageModel {}

impl fmt::Debug for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ImageModel")
            .field("path", &self.inner.path)
            .field("caption", &state.caption)
            .field("rating", &state.rating)
            .field("modified", &state.modified)
            .finish()
    }
}
