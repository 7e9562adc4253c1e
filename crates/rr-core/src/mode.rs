//! Travel mode of an expanded route.
//!
//! A route is either run end to end, or run up to a transit stop and finished
//! by bus or subway.

/// How an expanded route is travelled.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TravelMode {
    /// Run the whole route.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "run"))]
    Run,
    /// Run to a bus stop, then ride.
    #[cfg_attr(feature = "serde", serde(rename = "run+bus"))]
    RunBus,
    /// Run to a subway entrance, then ride.
    #[cfg_attr(feature = "serde", serde(rename = "run+subway"))]
    RunSubway,
}

impl TravelMode {
    /// Label used in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Run       => "run",
            TravelMode::RunBus    => "run+bus",
            TravelMode::RunSubway => "run+subway",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
