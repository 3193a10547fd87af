// Form fields owned by the page and read by the submitter
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable element ids of the report page
pub mod ids {
    pub const DESCRIPTION: &str = "description";
    pub const LOCATION: &str = "location";
    pub const IMAGE: &str = "imgUpload";
}

/// A file picked in the image field. Only the name is ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub file_name: String,
}

impl ImageRef {
    #[cfg(test)]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormFields {
    /// Every field sharing the description class. Only the first one is validated.
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

impl FormFields {
    pub fn new(description: &str, location: &str, image: Option<ImageRef>) -> Self {
        Self {
            descriptions: vec![description.to_string()],
            location: location.to_string(),
            image,
        }
    }

    pub fn primary_description(&self) -> Option<&str> {
        self.descriptions.first().map(String::as_str)
    }

    /// Empties every field but keeps the number of description fields
    pub fn clear(&mut self) {
        for description in &mut self.descriptions {
            description.clear();
        }
        self.location.clear();
        self.image = None;
    }
}

/// Fields checked before a report is accepted, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Description,
    Image,
    Location,
}

impl FormField {
    pub fn element_id(&self) -> &'static str {
        match self {
            FormField::Description => ids::DESCRIPTION,
            FormField::Image => ids::IMAGE,
            FormField::Location => ids::LOCATION,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Description => "description",
            FormField::Image => "image",
            FormField::Location => "location",
        };
        f.write_str(name)
    }
}
