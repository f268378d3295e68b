//! Core library for the heritage exhibit viewer.
//!
//! The crate owns the exhibit state and playback engine: concurrent dataset
//! loading with per-resource degradation, cross-reference lookups between
//! map points, timeline events, museum items and AR markers, the overlay
//! state machines, the AR marker session with its single audio channel, and
//! the timed tour and route animations. Rendering is delegated to the
//! collaborator traits in [`render`].

pub mod ar;
pub mod audio;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod gallery;
pub mod index;
pub mod loader;
pub mod map;
pub mod model;
pub mod notice;
pub mod overlay;
pub mod playback;
pub mod render;
pub mod session;
pub mod timeline;

#[cfg(test)]
pub(crate) mod testing;

pub use ar::{ActiveMarker, ArSession};
pub use audio::{AudioOrigin, AudioSession};
pub use clock::{TimerHandle, TimerKind, TimerQueue};
pub use command::Command;
pub use config::{AppConfig, DatasetConfig, MapConfig, MediaConfig, TimingConfig};
pub use error::{ExhibitError, Result};
pub use gallery::{Gallery, GalleryCard};
pub use index::ExhibitIndex;
pub use loader::{
    load_datasets, load_or_degrade, DatasetLocators, DatasetSource, FsSource, LoadOutcome,
    Resource, StaticSource,
};
pub use map::{MapView, PointPopup};
pub use model::{ArMarker, Coordinates, ExhibitData, MuseumItem, Point, TimelineEvent};
pub use notice::{Notice, NoticeBoard, NoticeKind, View};
pub use overlay::{ClickTarget, ModalContent, Overlays, ScanStatus};
pub use playback::{RoutePlayback, TourCycle};
pub use render::{
    ArRenderer, AudioChannel, ChartWidget, MapLayer, MapWidget, RecordingArRenderer,
    RecordingAudio, RecordingChart, RecordingMap,
};
pub use session::{Collaborators, ExhibitSession};
pub use timeline::TimelineView;
