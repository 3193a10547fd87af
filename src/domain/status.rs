// Status line shown under the form
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusColor {
    #[default]
    Info,
    Error,
}

impl StatusColor {
    pub fn css(&self) -> &'static str {
        match self {
            StatusColor::Info => "#2196F3",
            StatusColor::Error => "red",
        }
    }
}

impl Serialize for StatusColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.css())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub color: StatusColor,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: StatusColor::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: StatusColor::Error,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub const DETECTING: &str = "Detecting live location...";
pub const DETECTED: &str = "Live location detected ✅";
pub const SUBMITTED: &str = "Report submitted successfully 🎉";
