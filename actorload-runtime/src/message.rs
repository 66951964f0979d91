use actorload::actorload_core::TestSpecification;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returned by a driver's `/ping` route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub server_id: Uuid,
    pub version: String,
}

/// Body of a driver's `/run` route.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunRequest {
    pub driver_id: usize,
    pub specification: TestSpecification,
}
