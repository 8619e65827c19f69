//! Category profiles the visitor chooses between.
//!
//! Each category carries display metadata for the selection screen and the
//! two prompt templates used for the portrait and field generations.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::prompt::PromptTemplate;

/// Presentation video played on the processing screen when a category does
/// not name its own.
pub const DEFAULT_PROCESSING_VIDEO: &str =
    "/Media/I AM AN AMERICAN SOLDIER  BE ALL YOU CAN BE  GOARMY.mp4";

/// Invalid category catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog is not valid YAML or a template is malformed.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The catalog has no categories.
    #[error("catalog must define at least one category")]
    Empty,

    /// Two categories share an id (compared case-insensitively).
    #[error("duplicate category id {0:?}")]
    DuplicateId(String),

    /// A stat is outside 0..=100.
    #[error("category {id:?} stat {stat} is {value}, expected 0..=100")]
    StatOutOfRange {
        /// Category id.
        id: String,
        /// Stat name.
        stat: &'static str,
        /// Offending value.
        value: u8,
    },
}

/// Attribute bars shown on the selection card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Strategy rating.
    pub strategy: u8,
    /// Technology rating.
    pub technology: u8,
    /// Leadership rating.
    pub leadership: u8,
    /// Endurance rating.
    pub endurance: u8,
}

/// The two generation prompts of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPrompts {
    /// Studio portrait prompt, fills the primary slot.
    pub portrait: PromptTemplate,
    /// In-the-field prompt, fills the secondary slot.
    pub field: PromptTemplate,
}

/// One selectable profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier, e.g. `aviation`.
    pub id: String,
    /// Full title.
    pub title: String,
    /// Title used in the HUD.
    pub short_title: String,
    /// Selection card blurb.
    pub description: String,
    /// Icon name understood by the presentation layer.
    pub icon: String,
    /// Attribute bars.
    pub stats: CategoryStats,
    /// Video for the processing screen; the default video when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_video: Option<String>,
    /// Generation prompts.
    pub prompts: CategoryPrompts,
}

impl Category {
    /// The video the processing screen should play for this category.
    #[must_use]
    pub fn processing_video(&self) -> &str {
        self.processing_video
            .as_deref()
            .unwrap_or(DEFAULT_PROCESSING_VIDEO)
    }

    fn validate_stats(&self) -> Result<(), CatalogError> {
        let stats = [
            ("strategy", self.stats.strategy),
            ("technology", self.stats.technology),
            ("leadership", self.stats.leadership),
            ("endurance", self.stats.endurance),
        ];
        for (stat, value) in stats {
            if value > 100 {
                return Err(CatalogError::StatOutOfRange {
                    id: self.id.clone(),
                    stat,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
}

/// The fixed set of categories offered by the kiosk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Builds a catalog, rejecting empty sets and duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the categories are inconsistent.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.id.to_ascii_lowercase()) {
                return Err(CatalogError::DuplicateId(category.id.clone()));
            }
            category.validate_stats()?;
        }
        Ok(Self { categories })
    }

    /// Parses a YAML catalog with a top-level `categories` list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the document is malformed or inconsistent.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(source)?;
        Self::new(file.categories)
    }

    /// Reads and parses a YAML catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    /// Looks a category up by id, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Category> {
        let id = id.trim();
        self.categories
            .iter()
            .find(|category| category.id.eq_ignore_ascii_case(id))
    }

    /// All categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            categories: built_in_categories(),
        }
    }
}

const PORTRAIT_TEMPLATE: &str = "Transform this person into a professional portrait of a {subject} as a US Army {title}. \
Keep the person's face and features exactly the same but dress them in military dress uniform with medals and insignia. \
{modifier}. American flag in background, studio lighting, photorealistic, highly detailed, sharp focus, \
professional military portrait photography, 8k quality. Maintain facial identity and likeness.";

const FIELD_TEMPLATE: &str = "Transform this person into a {subject} serving as a US Army {title} on an active field exercise. \
Keep the person's face and features exactly the same. {modifier}, candid action shot, natural daylight, \
photorealistic, highly detailed, documentary photography. Maintain facial identity and likeness.";

fn prompts_for(title: &str, modifier: &str) -> CategoryPrompts {
    let fill = |template: &str| {
        PromptTemplate::built_in(
            template
                .replace("{title}", title)
                .replace("{modifier}", modifier),
        )
    };
    CategoryPrompts {
        portrait: fill(PORTRAIT_TEMPLATE),
        field: fill(FIELD_TEMPLATE),
    }
}

fn built_in_categories() -> Vec<Category> {
    vec![
        Category {
            id: "cyber".to_owned(),
            title: "Cyber Operations Officer".to_owned(),
            short_title: "CYBER OPS".to_owned(),
            description: "Lead digital warfare operations, protect critical infrastructure, \
                          and conduct offensive cyber missions."
                .to_owned(),
            icon: "Shield".to_owned(),
            stats: CategoryStats {
                strategy: 85,
                technology: 100,
                leadership: 75,
                endurance: 60,
            },
            processing_video: None,
            prompts: prompts_for(
                "Cyber Operations Officer",
                "cyber warfare specialist, digital operations, tactical gear with tech elements",
            ),
        },
        Category {
            id: "artillery".to_owned(),
            title: "Field Artillery Officer".to_owned(),
            short_title: "ARTILLERY".to_owned(),
            description: "Command fire support operations, coordinate precision strikes, \
                          and lead artillery battalions."
                .to_owned(),
            icon: "Target".to_owned(),
            stats: CategoryStats {
                strategy: 95,
                technology: 70,
                leadership: 85,
                endurance: 75,
            },
            processing_video: None,
            prompts: prompts_for(
                "Field Artillery Officer",
                "field artillery commander, tactical operations, combat uniform",
            ),
        },
        Category {
            id: "aviation".to_owned(),
            title: "Aviation Officer".to_owned(),
            short_title: "AVIATION".to_owned(),
            description: "Pilot advanced aircraft, lead air assault missions, \
                          and manage aviation operations."
                .to_owned(),
            icon: "Plane".to_owned(),
            stats: CategoryStats {
                strategy: 80,
                technology: 90,
                leadership: 80,
                endurance: 85,
            },
            processing_video: None,
            prompts: prompts_for(
                "Aviation Officer",
                "military aviator, pilot gear, flight suit with tactical equipment",
            ),
        },
    ]
}
