use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    /// IANA name, e.g. `Europe/Paris`. Opening hours and reservations are
    /// wall-clock times in this zone.
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}
