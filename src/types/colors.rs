// src/types/colors.rs
use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe color enum for text decorations and callout backgrounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    LightGray,
    LightBrown,
    LightRed,
    LightOrange,
    LightYellow,
    LightGreen,
    LightBlue,
    LightPurple,
    LightPink,
}

impl std::str::FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Color::Default),
            "gray" => Ok(Color::Gray),
            "brown" => Ok(Color::Brown),
            "red" => Ok(Color::Red),
            "orange" => Ok(Color::Orange),
            "yellow" => Ok(Color::Yellow),
            // The export calls green "teal"
            "green" | "teal" => Ok(Color::Green),
            "blue" => Ok(Color::Blue),
            "purple" => Ok(Color::Purple),
            "pink" => Ok(Color::Pink),
            "gray_background" => Ok(Color::LightGray),
            "brown_background" => Ok(Color::LightBrown),
            "red_background" => Ok(Color::LightRed),
            "orange_background" => Ok(Color::LightOrange),
            "yellow_background" => Ok(Color::LightYellow),
            "green_background" | "teal_background" => Ok(Color::LightGreen),
            "blue_background" => Ok(Color::LightBlue),
            "purple_background" => Ok(Color::LightPurple),
            "pink_background" => Ok(Color::LightPink),
            _ => Err(ValidationError::InvalidColor(s.to_string())),
        }
    }
}

impl Color {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Gray => "gray",
            Color::Brown => "brown",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::LightGray => "gray_background",
            Color::LightBrown => "brown_background",
            Color::LightRed => "red_background",
            Color::LightOrange => "orange_background",
            Color::LightYellow => "yellow_background",
            Color::LightGreen => "green_background",
            Color::LightBlue => "blue_background",
            Color::LightPurple => "purple_background",
            Color::LightPink => "pink_background",
        }
    }

    /// CSS class used for the HTML passthrough of colored spans.
    pub fn css_class(&self) -> &'static str {
        match self {
            Color::Default => "text-default",
            Color::Gray => "text-gray",
            Color::Brown => "text-brown",
            Color::Red => "text-red",
            Color::Orange => "text-orange",
            Color::Yellow => "text-yellow",
            Color::Green => "text-green",
            Color::Blue => "text-blue",
            Color::Purple => "text-purple",
            Color::Pink => "text-pink",
            Color::LightGray => "bg-gray",
            Color::LightBrown => "bg-brown",
            Color::LightRed => "bg-red",
            Color::LightOrange => "bg-orange",
            Color::LightYellow => "bg-yellow",
            Color::LightGreen => "bg-green",
            Color::LightBlue => "bg-blue",
            Color::LightPurple => "bg-purple",
            Color::LightPink => "bg-pink",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
