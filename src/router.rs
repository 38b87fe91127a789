//! Static route table for the demo pages

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::concepts::ConceptKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no page at {0}")]
    NotFound(String),
}

/// Every page the demo serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    UserGuidance,
    SofaArm,
    SteeringWheel,
    VehicleDoor,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Landing,
        Route::UserGuidance,
        Route::SofaArm,
        Route::SteeringWheel,
        Route::VehicleDoor,
    ];

    /// Map a path to its page. A trailing slash is ignored.
    pub fn resolve(path: &str) -> Result<Self, RouteError> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == trimmed)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::UserGuidance => "/user-guidance",
            Route::SofaArm => "/examples/sofa-arm",
            Route::SteeringWheel => "/examples/steering-wheel",
            Route::VehicleDoor => "/examples/vehicle-door",
        }
    }

    /// The concept demonstrated on this page, if any
    pub fn concept(self) -> Option<ConceptKind> {
        match self {
            Route::SofaArm => Some(ConceptKind::SofaArm),
            Route::SteeringWheel => Some(ConceptKind::SteeringWheel),
            Route::VehicleDoor => Some(ConceptKind::VehicleDoor),
            Route::Landing | Route::UserGuidance => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
