//! Ship deck layout
//!
//! The walkable ship is a graph of locations. Each location is a 360°
//! panorama; exits sit at a heading (yaw, degrees) and lead to another
//! location.
//!
//! ```json
//! {
//!   "start": "bridge",
//!   "fov": 75,
//!   "locations": [
//!     { "id": "bridge", "name": "ship.bridge", "panorama": "bridge.png",
//!       "exits": [{ "yaw": 180, "target": "corridor", "label": "ship.to_corridor" }] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Half-width of the cone in which an exit counts as "ahead", degrees
pub const EXIT_CONE: f32 = 25.0;

#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    #[error("unable to read deck: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid deck: {0}")]
    Json(#[from] serde_json::Error),
    #[error("deck has no locations")]
    Empty,
    #[error("duplicate location '{0}'")]
    DuplicateLocation(String),
    #[error("start location '{0}' does not exist")]
    UnknownStart(String),
    #[error("exit from '{from}' leads to unknown location '{target}'")]
    UnknownTarget { from: String, target: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    pub yaw: f32,
    pub target: String,
    pub label: String,
    /// Heading after arriving; defaults to the exit heading
    #[serde(default)]
    pub arrive_yaw: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub panorama: String,
    #[serde(default)]
    pub start_yaw: f32,
    #[serde(default)]
    pub exits: Vec<Exit>,
}

fn default_fov() -> f32 {
    75.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDeck {
    pub start: String,
    #[serde(default = "default_fov")]
    pub fov: f32,
    pub locations: Vec<Location>,
}

impl ShipDeck {
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let json = fs::read_to_string(path)?;
        let deck: ShipDeck = serde_json::from_str(&json)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Checks that ids are unique and every reference resolves
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.locations.is_empty() {
            return Err(DeckError::Empty);
        }

        let mut ids = HashSet::new();
        for location in &self.locations {
            if !ids.insert(location.id.as_str()) {
                return Err(DeckError::DuplicateLocation(location.id.clone()));
            }
        }

        if !ids.contains(self.start.as_str()) {
            return Err(DeckError::UnknownStart(self.start.clone()));
        }

        for location in &self.locations {
            for exit in &location.exits {
                if !ids.contains(exit.target.as_str()) {
                    return Err(DeckError::UnknownTarget {
                        from: location.id.clone(),
                        target: exit.target.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }
}

/// Wraps an angle into 0..360
pub fn normalize_yaw(yaw: f32) -> f32 {
    yaw.rem_euclid(360.0)
}

/// Shortest signed difference `to - from`, in -180..=180
pub fn angle_between(from: f32, to: f32) -> f32 {
    let diff = normalize_yaw(to - from);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// The player's position and heading on the deck
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    location: String,
    yaw: f32,
}

impl Walker {
    /// Starts at the deck's start location
    pub fn new(deck: &ShipDeck) -> Self {
        let yaw = deck
            .location(&deck.start)
            .map(|location| location.start_yaw)
            .unwrap_or(0.0);
        Walker {
            location: deck.start.clone(),
            yaw: normalize_yaw(yaw),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn turn(&mut self, degrees: f32) {
        self.yaw = normalize_yaw(self.yaw + degrees);
    }

    /// The exit closest to the view direction, if inside the exit cone
    pub fn exit_ahead<'d>(&self, deck: &'d ShipDeck) -> Option<&'d Exit> {
        deck.location(&self.location)?
            .exits
            .iter()
            .map(|exit| (angle_between(self.yaw, exit.yaw).abs(), exit))
            .filter(|(distance, _)| *distance <= EXIT_CONE)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, exit)| exit)
    }

    /// Walks through the exit ahead; returns the location left behind
    pub fn walk(&mut self, deck: &ShipDeck) -> Option<String> {
        let exit = self.exit_ahead(deck)?;
        let yaw = normalize_yaw(exit.arrive_yaw.unwrap_or(exit.yaw));
        let previous = std::mem::replace(&mut self.location, exit.target.clone());
        self.yaw = yaw;
        Some(previous)
    }
}
