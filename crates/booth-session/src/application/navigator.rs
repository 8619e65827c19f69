//! Screen navigator.
//!
//! Single owner of the current screen and the session record. Every
//! transition is a synchronous method that validates the current screen and
//! the session fields the next screen needs; a rejected request leaves the
//! navigator untouched.

use std::sync::Arc;

use booth_core::clock::Clock;
use booth_generation::domain::category::Category;
use booth_generation::domain::pair::ResultPair;
use booth_generation::domain::prompt::StyleAttribute;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::record::SessionRecord;
use crate::domain::screen::{Action, NavigationError, Screen};

/// Finite-state router over the kiosk screens.
pub struct Navigator {
    clock: Arc<dyn Clock>,
    screen: Screen,
    record: Option<SessionRecord>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("screen", &self.screen)
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// A navigator on the attract screen with no session.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            screen: Screen::Attract,
            record: None,
        }
    }

    /// The current screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The current session, absent on the attract screen.
    #[must_use]
    pub fn record(&self) -> Option<&SessionRecord> {
        self.record.as_ref()
    }

    /// Attract → biographical entry. Opens a fresh session record.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` off the attract screen.
    pub fn start(&mut self) -> Result<(), NavigationError> {
        self.ensure_on(Screen::Attract, Action::Start)?;
        let record = SessionRecord::new(Uuid::now_v7(), self.clock.now());
        info!(session_id = %record.session_id(), "session started");
        self.record = Some(record);
        self.go(Screen::BiographicalEntry);
        Ok(())
    }

    /// Biographical entry → category selection.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` off the biographical
    /// entry screen.
    pub fn select_attribute(&mut self, attribute: StyleAttribute) -> Result<(), NavigationError> {
        self.session_on(Screen::BiographicalEntry, Action::SelectAttribute)?
            .set_attribute(attribute);
        self.go(Screen::CategorySelection);
        Ok(())
    }

    /// Category selection → photo capture.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` off the category
    /// selection screen.
    pub fn select_category(&mut self, category: Category) -> Result<(), NavigationError> {
        self.session_on(Screen::CategorySelection, Action::SelectCategory)?
            .set_category(category);
        self.go(Screen::PhotoCapture);
        Ok(())
    }

    /// Photo capture → processing.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` off the photo capture
    /// screen, `NavigationError::EmptyImage` for a blank still, and
    /// `NavigationError::MissingField` if the attribute or category is
    /// absent.
    pub fn capture_photo(&mut self, image: String) -> Result<(), NavigationError> {
        let record = self.session_on(Screen::PhotoCapture, Action::CapturePhoto)?;
        if image.trim().is_empty() {
            return Err(NavigationError::EmptyImage);
        }
        if record.attribute().is_none() {
            return Err(NavigationError::MissingField("attribute"));
        }
        if record.category().is_none() {
            return Err(NavigationError::MissingField("category"));
        }
        record.set_captured_image(image);
        self.go(Screen::Processing);
        Ok(())
    }

    /// Processing → reveal, storing the pair delivered by the completion
    /// gate.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` off the processing
    /// screen and `NavigationError::MissingField` if the image or category
    /// is absent.
    pub fn complete_processing(&mut self, pair: ResultPair) -> Result<(), NavigationError> {
        let record = self.session_on(Screen::Processing, Action::CompleteProcessing)?;
        if record.captured_image().is_none_or(|image| image.trim().is_empty()) {
            return Err(NavigationError::MissingField("captured image"));
        }
        if record.category().is_none() {
            return Err(NavigationError::MissingField("category"));
        }
        record.set_result_pair(pair);
        self.go(Screen::Reveal);
        Ok(())
    }

    /// Clears the session and returns to attract. Valid from every screen.
    pub fn restart(&mut self) {
        if let Some(record) = self.record.take() {
            info!(
                session_id = %record.session_id(),
                from = %self.screen,
                "session reset"
            );
        }
        self.screen = Screen::Attract;
    }

    fn ensure_on(&self, expected: Screen, action: Action) -> Result<(), NavigationError> {
        if self.screen == expected {
            Ok(())
        } else {
            warn!(from = %self.screen, %action, "navigation rejected");
            Err(NavigationError::InvalidTransition {
                from: self.screen,
                action,
            })
        }
    }

    fn session_on(
        &mut self,
        expected: Screen,
        action: Action,
    ) -> Result<&mut SessionRecord, NavigationError> {
        self.ensure_on(expected, action)?;
        self.record
            .as_mut()
            .ok_or(NavigationError::MissingField("session record"))
    }

    fn go(&mut self, to: Screen) {
        info!(from = %self.screen, %to, "screen transition");
        self.screen = to;
    }
}
