use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::attendance::geofence::GeoPoint;

/// Per-team attendance settings. Without an office point geofencing is off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSettings {
    #[schema(nullable = true)]
    pub office: Option<GeoPoint>,

    #[schema(example = 100.0)]
    pub radius_meters: f64,
}

impl AttendanceSettings {
    pub fn geofence(&self) -> Option<(GeoPoint, f64)> {
        self.office.map(|office| (office, self.radius_meters.max(0.0)))
    }
}
