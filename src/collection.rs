//! An ordered, mutable set of [`ImageModel`]s with aggregate notification.
//!
//! The collection subscribes a relay listener to every image it contains, so
//! image-level mutations surface as collection-level `MetadataChanged`
//! events and a view only ever has to watch the collection.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::image::ImageModel;
use crate::subject::{ListenerId, Subject};

/// What happened to the collection. Exactly one kind per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEventKind {
    /// An image was appended via `add_image_model`.
    ImageAdded,
    /// An image was removed via `remove_image_model`.
    ImageRemoved,
    /// A contained image's caption or rating changed.
    MetadataChanged,
}

/// Payload delivered to collection listeners.
#[derive(Debug, Clone)]
pub struct CollectionEvent {
    pub kind: CollectionEventKind,
    /// The collection the event originated from.
    pub collection: ImageCollectionModel,
    /// The image that was added, removed or mutated.
    pub image: ImageModel,
    /// Wall-clock time the event was broadcast.
    pub at: DateTime<Utc>,
}

/// One contained image together with its relay subscription handle, released
/// precisely when the entry is removed.
struct Entry {
    image: ImageModel,
    relay: ListenerId,
}

struct Inner {
    entries: RefCell<Vec<Entry>>,
    subject: Subject<CollectionEvent>,
}

/// Handle to an ordered collection of images with change notification.
///
/// Like [`ImageModel`], this is a cheap-to-clone handle with identity
/// equality; the same image may appear in several collections (or several
/// times in one — each occurrence carries its own relay subscription).
#[derive(Clone)]
pub struct ImageCollectionModel {
    inner: Rc<Inner>,
}

impl ImageCollectionModel {
    /// An empty collection.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                entries: RefCell::new(Vec::new()),
                subject: Subject::new(),
            }),
        }
    }

    /// Append `image` and broadcast `ImageAdded`.
    ///
    /// A relay listener is subscribed to the image first, so any later
    /// mutation of the image re-broadcasts as `MetadataChanged` on this
    /// collection. The relay holds only a weak reference back, so putting a
    /// collection in an image's listener list never leaks the collection.
    pub fn add_image_model(&self, image: &ImageModel) {
        let weak = Rc::downgrade(&self.inner);
        let relay = image.subscribe(move |mutated: &ImageModel| {
            if let Some(inner) = weak.upgrade() {
                let collection = ImageCollectionModel { inner };
                collection.broadcast(CollectionEventKind::MetadataChanged, mutated.clone());
            }
        });
        self.inner.entries.borrow_mut().push(Entry {
            image: image.clone(),
            relay,
        });
        debug!(path = %image.path().display(), "image added to collection");
        self.broadcast(CollectionEventKind::ImageAdded, image.clone());
    }

    /// Remove the first occurrence of `image`, release its relay
    /// subscription and broadcast `ImageRemoved`.
    ///
    /// If the image appears more than once only the first entry goes; the
    /// others keep their own relays. If it is absent this is a pure no-op:
    /// no unsubscribe attempt, no event, no error.
    pub fn remove_image_model(&self, image: &ImageModel) {
        let removed = {
            let mut entries = self.inner.entries.borrow_mut();
            entries
                .iter()
                .position(|e| e.image == *image)
                .map(|idx| entries.remove(idx))
        };
        let Some(entry) = removed else {
            return;
        };
        entry.image.unsubscribe(entry.relay);
        debug!(path = %entry.image.path().display(), "image removed from collection");
        self.broadcast(CollectionEventKind::ImageRemoved, entry.image);
    }

    /// Defensive copy of the contained image handles, in insertion order.
    pub fn image_models(&self) -> Vec<ImageModel> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|e| e.image.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Whether `image` currently appears in the collection (identity match).
    pub fn contains(&self, image: &ImageModel) -> bool {
        self.inner.entries.borrow().iter().any(|e| e.image == *image)
    }

    /// Register a collection listener, invoked for every add, remove and
    /// contained-image mutation.
    pub fn subscribe(&self, listener: impl Fn(&CollectionEvent) + 'static) -> ListenerId {
        self.inner.subject.subscribe(listener)
    }

    /// Drop a collection listener; an unknown id is a no-op.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.subject.unsubscribe(id)
    }

    /// Number of currently registered collection listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.subject.len()
    }

    fn broadcast(&self, kind: CollectionEventKind, image: ImageModel) {
        let event = CollectionEvent {
            kind,
            collection: self.clone(),
            image,
            at: Utc::now(),
        };
        self.inner.subject.notify(&event);
    }
}

impl Default for ImageCollectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ImageCollectionModel {
    /// Identity comparison, matching [`ImageModel`].
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ImageCollectionModel {}

impl fmt::Debug for ImageCollectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCollectionModel")
            .field("images", &self.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
