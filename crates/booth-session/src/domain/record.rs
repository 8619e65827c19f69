//! The session record carried across screens.

use booth_generation::domain::category::Category;
use booth_generation::domain::pair::ResultPair;
use booth_generation::domain::prompt::StyleAttribute;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Everything the visitor has chosen so far in one pass through the flow.
///
/// Fields are filled in order and only by the navigator. A result pair is
/// only ever stored after a non-empty image and a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    attribute: Option<StyleAttribute>,
    category: Option<Category>,
    captured_image: Option<String>,
    result_pair: Option<ResultPair>,
}

impl SessionRecord {
    /// An empty record for a new visitor.
    #[must_use]
    pub fn new(session_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            started_at,
            attribute: None,
            category: None,
            captured_image: None,
            result_pair: None,
        }
    }

    /// Identifier used to correlate log lines of one visitor.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// When the visitor touched the attract screen.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Chosen style attribute.
    #[must_use]
    pub fn attribute(&self) -> Option<StyleAttribute> {
        self.attribute
    }

    /// Chosen category.
    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Captured still.
    #[must_use]
    pub fn captured_image(&self) -> Option<&str> {
        self.captured_image.as_deref()
    }

    /// Result pair, present once processing completed.
    #[must_use]
    pub fn result_pair(&self) -> Option<&ResultPair> {
        self.result_pair.as_ref()
    }

    pub(crate) fn set_attribute(&mut self, attribute: StyleAttribute) {
        self.attribute = Some(attribute);
    }

    pub(crate) fn set_category(&mut self, category: Category) {
        self.category = Some(category);
    }

    pub(crate) fn set_captured_image(&mut self, image: String) {
        self.captured_image = Some(image);
    }

    pub(crate) fn set_result_pair(&mut self, pair: ResultPair) {
        debug_assert!(self.captured_image.is_some() && self.category.is_some());
        self.result_pair = Some(pair);
    }
}
