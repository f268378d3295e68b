//! Transient overlays: modal dialog, AR scan overlay and the two menus.
//!
//! Background scroll is locked while the modal or the scan overlay is open.
//! The lock is derived from which overlays are open, never from which one
//! closed last.

use crate::clock::{TimerHandle, TimerKind, TimerQueue};
use crate::model::{MuseumItem, TimelineEvent};

/// Body of the modal dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalContent {
    MuseumItem(MuseumItem),
    TimelineEvent(TimelineEvent),
    ArPreview { model_url: String },
}

impl ModalContent {
    pub fn title(&self) -> &str {
        match self {
            ModalContent::MuseumItem(item) => &item.title,
            ModalContent::TimelineEvent(event) => &event.title,
            ModalContent::ArPreview { .. } => "Open AR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStatus {
    #[default]
    Idle,
    Scanning,
    NoMarkerDetected,
}

impl ScanStatus {
    pub fn text(self) -> &'static str {
        match self {
            ScanStatus::Idle => "Scanning… no valid marker recognised yet.",
            ScanStatus::Scanning => "Scanning… please hold the frame steady.",
            ScanStatus::NoMarkerDetected => "No valid marker detected in view.",
        }
    }
}

/// Where a pointer click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    ModalBackdrop,
    ModalBody,
    ScanBackdrop,
    ScanBody,
    LanguageMenu,
    LanguageToggle,
    NavigationMenu,
    NavigationToggle,
    Elsewhere,
}

#[derive(Debug)]
pub struct Overlays {
    modal: Option<ModalContent>,
    scan_open: bool,
    scan_status: ScanStatus,
    scan_timer: Option<TimerHandle>,
    scan_timeout_ms: u64,
    ar_viewport_active: bool,
    language_menu_open: bool,
    navigation_menu_open: bool,
    language: String,
    languages: Vec<String>,
}

impl Overlays {
    pub fn new(scan_timeout_ms: u64, language: String, languages: Vec<String>) -> Self {
        Self {
            modal: None,
            scan_open: false,
            scan_status: ScanStatus::Idle,
            scan_timer: None,
            scan_timeout_ms,
            ar_viewport_active: false,
            language_menu_open: false,
            navigation_menu_open: false,
            language,
            languages,
        }
    }

    /// Page scrolling is locked while the modal or the scan overlay is open.
    pub fn is_scroll_locked(&self) -> bool {
        self.modal.is_some() || self.scan_open
    }

    /// Content of the open modal, if any.
    pub fn modal(&self) -> Option<&ModalContent> {
        self.modal.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Opens the modal, replacing any content already shown.
    pub fn open_modal(&mut self, content: ModalContent) {
        tracing::debug!(title = content.title(), "modal opened");
        self.modal = Some(content);
    }

    /// Closes the modal. Scrolling stays locked if the scan overlay is open.
    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            tracing::debug!(scroll_locked = self.is_scroll_locked(), "modal closed");
        }
    }

    pub fn is_scan_open(&self) -> bool {
        self.scan_open
    }

    /// Status line of the scan overlay.
    pub fn scan_status(&self) -> ScanStatus {
        self.scan_status
    }

    /// Once activated by the first scan, the AR viewport stays active.
    pub fn is_ar_viewport_active(&self) -> bool {
        self.ar_viewport_active
    }

    /// Opens the scan overlay and arms the "no marker" timeout.
    pub fn open_scan(&mut self, timers: &mut TimerQueue) {
        if !self.ar_viewport_active {
            self.ar_viewport_active = true;
            tracing::debug!("AR viewport activated");
        }
        if let Some(previous) = self.scan_timer.take() {
            timers.cancel(previous);
        }
        self.scan_open = true;
        self.scan_status = ScanStatus::Scanning;
        self.scan_timer = Some(timers.schedule_once(self.scan_timeout_ms, TimerKind::ScanTimeout));
    }

    /// Closes the scan overlay, resets its status and disarms the timeout.
    pub fn close_scan(&mut self, timers: &mut TimerQueue) {
        if let Some(timer) = self.scan_timer.take() {
            timers.cancel(timer);
        }
        self.scan_open = false;
        self.scan_status = ScanStatus::Idle;
    }

    pub(crate) fn on_scan_timeout(&mut self, handle: TimerHandle) {
        if self.scan_timer != Some(handle) {
            return;
        }
        self.scan_timer = None;
        if self.scan_open {
            self.scan_status = ScanStatus::NoMarkerDetected;
        }
    }

    pub fn is_language_menu_open(&self) -> bool {
        self.language_menu_open
    }

    pub fn is_navigation_menu_open(&self) -> bool {
        self.navigation_menu_open
    }

    /// Opens the language menu, or closes it if open.
    pub fn toggle_language_menu(&mut self) {
        self.language_menu_open = !self.language_menu_open;
    }

    pub fn toggle_navigation_menu(&mut self) {
        self.navigation_menu_open = !self.navigation_menu_open;
    }

    /// Following a navigation link collapses the navigation menu.
    pub fn navigation_link_clicked(&mut self) {
        self.navigation_menu_open = false;
    }

    /// Code of the active language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Label shown on the language toggle.
    pub fn language_label(&self) -> String {
        self.language.to_uppercase()
    }

    /// Switches language and closes the menu. Unknown codes are ignored.
    pub fn select_language(&mut self, code: &str) -> bool {
        if !self.languages.iter().any(|offered| offered == code) {
            tracing::debug!(code, "ignoring unknown language");
            return false;
        }
        self.language = code.to_string();
        self.language_menu_open = false;
        tracing::info!(language = code, "language switched");
        true
    }

    /// Applies a document-level click: backdrop dismissal and closing menus
    /// clicked outside of. Toggle clicks do not reach the document.
    pub fn click(&mut self, target: ClickTarget, timers: &mut TimerQueue) {
        match target {
            ClickTarget::LanguageToggle | ClickTarget::NavigationToggle => return,
            ClickTarget::ModalBackdrop => self.close_modal(),
            ClickTarget::ScanBackdrop => self.close_scan(timers),
            _ => {}
        }
        if target != ClickTarget::LanguageMenu {
            self.language_menu_open = false;
        }
        if target != ClickTarget::NavigationMenu {
            self.navigation_menu_open = false;
        }
    }

    /// The global cancel key only ever closes the modal.
    pub fn cancel_key(&mut self) {
        self.close_modal();
    }
}
