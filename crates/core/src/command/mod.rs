//! Commands emitted by the interactive controls.
//!
//! Every control produces exactly one [`Command`];
//! [`crate::ExhibitSession::dispatch`] routes it to the component that owns
//! the operation.

use crate::overlay::ClickTarget;
use crate::render::MapLayer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Gallery and detail dialogs.
    OpenMuseumItem(String),
    CloseModal,
    /// Global cancel key (Escape).
    CancelKey,
    /// Pointer click routed through the document.
    Click(ClickTarget),

    // Map and timeline.
    FocusMapPoint(String),
    OpenPointDetail(String),
    OpenPointAr(String),
    PlayPointAudio(String),
    ToggleMapLayer(MapLayer),
    /// Click on the timeline chart point at this series index.
    TimelinePointClicked(usize),

    // AR.
    LoadArMarker(String),
    PlayArAudio,
    OpenScan,
    CloseScan,

    // Timed processes.
    StartTour,
    StopTour,
    PlayRoute,
    ResetRoute,

    // Header menus.
    ToggleNavigationMenu,
    NavigationLinkClicked,
    ToggleLanguageMenu,
    SelectLanguage(String),
}
