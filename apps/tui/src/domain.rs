use serde::{Deserialize, Serialize};

/// A user-created named group tracking cleanup participation counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    pub id: i64,
    pub name: String,
    pub members: Vec<String>,
    pub cleanup_count: u32,
    pub trash_collected: f64,
    pub created_at: String,
}

/// A scheduled cleanup, loaded from the store and displayed; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupEvent {
    pub id: i64,
    pub title: String,
    pub spot: String,
    pub scheduled_for: String,
}

/// Last successful device position. In-memory only, lost on exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spot {
    EastCoast,
    PasirRis,
    Sentosa,
    Changi,
}

/// Static facts about one cleanup spot.
#[derive(Debug, Clone, Copy)]
pub struct SpotInfo {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub description: &'static str,
    pub difficulty: &'static str,
}

impl Spot {
    pub const ALL: [Self; 4] = [Self::EastCoast, Self::PasirRis, Self::Sentosa, Self::Changi];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EastCoast => "east-coast",
            Self::PasirRis => "pasir-ris",
            Self::Sentosa => "sentosa",
            Self::Changi => "changi",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::EastCoast),
            1 => Some(Self::PasirRis),
            2 => Some(Self::Sentosa),
            3 => Some(Self::Changi),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::EastCoast => 0,
            Self::PasirRis => 1,
            Self::Sentosa => 2,
            Self::Changi => 3,
        }
    }

    pub const fn info(self) -> &'static SpotInfo {
        match self {
            Self::EastCoast => &SpotInfo {
                name: "East Coast Park",
                lat: 1.3024,
                lng: 103.9620,
                description: "10 km of pristine coastline",
                difficulty: "Easy",
            },
            Self::PasirRis => &SpotInfo {
                name: "Pasir Ris Beach",
                lat: 1.3815,
                lng: 103.9556,
                description: "Scenic beach with mangroves",
                difficulty: "Medium",
            },
            Self::Sentosa => &SpotInfo {
                name: "Sentosa Beach",
                lat: 1.2494,
                lng: 103.8303,
                description: "Popular tourist beach",
                difficulty: "Easy",
            },
            Self::Changi => &SpotInfo {
                name: "Changi Beach",
                lat: 1.4050,
                lng: 103.9765,
                description: "Historic beach with naval history",
                difficulty: "Hard",
            },
        }
    }

    pub const fn label(self) -> &'static str {
        self.info().name
    }
}

/// Degrees-to-kilometres factor for the flat-distance estimate.
const KM_PER_DEGREE: f64 = 111.0;

/// Approximate distance in kilometres between a spot and a position, using
/// the same flat-distance estimate the nearest-spot pick uses.
pub fn distance_km(spot: Spot, location: &UserLocation) -> f64 {
    let info = spot.info();
    ((info.lat - location.latitude).powi(2) + (info.lng - location.longitude).powi(2)).sqrt()
        * KM_PER_DEGREE
}

/// Nearest cleanup spot to the given position, with the approximate distance
/// in kilometres. Falls back to the first spot when no position is known.
pub fn nearest_spot(location: Option<&UserLocation>) -> (Spot, Option<f64>) {
    let Some(location) = location else {
        return (Spot::ALL[0], None);
    };

    let mut nearest = Spot::ALL[0];
    let mut min_distance = f64::INFINITY;

    for spot in Spot::ALL {
        let distance = distance_km(spot, location);
        if distance < min_distance {
            min_distance = distance;
            nearest = spot;
        }
    }

    (nearest, Some(min_distance))
}
