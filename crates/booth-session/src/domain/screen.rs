//! Screens of the kiosk flow and the actions that move between them.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One screen of the kiosk flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    /// Idle loop waiting for a visitor.
    Attract,
    /// Style attribute entry.
    BiographicalEntry,
    /// Category cards.
    CategorySelection,
    /// Camera countdown and capture.
    PhotoCapture,
    /// Generation in progress with the presentation video.
    Processing,
    /// Both results shown side by side.
    Reveal,
}

impl Screen {
    /// Stable identifier used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attract => "attract",
            Self::BiographicalEntry => "biographical-entry",
            Self::CategorySelection => "category-selection",
            Self::PhotoCapture => "photo-capture",
            Self::Processing => "processing",
            Self::Reveal => "reveal",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A visitor or system action that requests a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Touch on the attract screen.
    Start,
    /// Style attribute chosen.
    SelectAttribute,
    /// Category card chosen.
    SelectCategory,
    /// Still captured.
    CapturePhoto,
    /// Completion gate fired.
    CompleteProcessing,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::SelectAttribute => "select_attribute",
            Self::SelectCategory => "select_category",
            Self::CapturePhoto => "capture_photo",
            Self::CompleteProcessing => "complete_processing",
        })
    }
}

/// Rejected navigation request. The navigator is unchanged after any of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The action is not valid on the current screen.
    #[error("cannot {action} from the {from} screen")]
    InvalidTransition {
        /// Screen the navigator was on.
        from: Screen,
        /// Requested action.
        action: Action,
    },

    /// A session field required by the next screen is absent.
    #[error("session is missing {0}")]
    MissingField(&'static str),

    /// The captured still is empty.
    #[error("captured image must not be empty")]
    EmptyImage,
}
