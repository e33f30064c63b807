use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A latitude/longitude pair in degrees.
///
/// Points are plain values. Constructing one does not check ranges; call
/// [`Point::validate`] before handing a point to the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

/// Why a point was rejected by [`Point::validate`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidPoint {
    #[error("coordinate is not a number")]
    NotFinite,
    #[error("latitude {0} out of range")]
    Latitude(f64),
    #[error("longitude {0} out of range")]
    Longitude(f64),
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the point unchanged if both coordinates are finite and in range.
    pub fn validate(self) -> Result<Self, InvalidPoint> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(InvalidPoint::NotFinite);
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidPoint::Latitude(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(InvalidPoint::Longitude(self.lng));
        }
        Ok(self)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Axis-aligned lat/lng box used to frame the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Point,
    pub north_east: Point,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            south_west: *first,
            north_east: *first,
        };
        for p in rest {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }

    /// Grows the box by `ratio` of its height/width on every side, clamped to valid ranges.
    pub fn pad(self, ratio: f64) -> Self {
        let dlat = (self.north_east.lat - self.south_west.lat) * ratio;
        let dlng = (self.north_east.lng - self.south_west.lng) * ratio;
        Self {
            south_west: Point::new(
                (self.south_west.lat - dlat).max(-90.0),
                (self.south_west.lng - dlng).max(-180.0),
            ),
            north_east: Point::new(
                (self.north_east.lat + dlat).min(90.0),
                (self.north_east.lng + dlng).min(180.0),
            ),
        }
    }
}

/// A deferred reference to a point, resolved right before a trace is attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSource {
    /// Free text or a literal `lat,lng` pair typed by the user.
    Text(String),
    /// A point that is already known (map click, override).
    Resolved(Point),
    /// The device's own live position.
    LiveSelf,
}

/// Travel profile understood by the routing service.
///
/// Serialised as the routing service's token (`driving-car`, ...). Unknown tokens are kept
/// as [`Profile::Other`] and passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Driving,
    Walking,
    Cycling,
    Other(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Driving => "driving-car",
            Self::Walking => "foot-walking",
            Self::Cycling => "cycling-regular",
            Self::Other(token) => token,
        }
    }

    /// Maps short names and service tokens (any case) onto a profile.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "driving" | "driving-car" => Self::Driving,
            "walking" | "foot-walking" => Self::Walking,
            "cycling" | "cycling-regular" => Self::Cycling,
            _ => Self::Other(token.trim().to_string()),
        }
    }
}

impl FromStr for Profile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}
