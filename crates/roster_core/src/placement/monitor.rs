//! Mandatory-zone alerts and occupancy summaries.

use crate::model::roster::Roster;
use crate::model::zone::{ZoneId, ZoneRegistry};

/// Alert state of one monitored zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAlert {
    pub zone_id: ZoneId,
    /// `true` while the zone has no occupant.
    pub empty: bool,
}

/// Recomputes the alert flag of every monitored zone, in registry order.
pub fn mandatory_zone_alerts(roster: &Roster, registry: &ZoneRegistry) -> Vec<ZoneAlert> {
    registry
        .monitored_zones()
        .iter()
        .map(|zone_id| ZoneAlert {
            zone_id: zone_id.clone(),
            empty: roster.occupancy(zone_id) == 0,
        })
        .collect()
}

/// Occupancy and capacity of one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOccupancy {
    pub zone_id: ZoneId,
    pub display_name: String,
    pub occupancy: usize,
    pub capacity: u32,
}

impl ZoneOccupancy {
    pub fn is_full(&self) -> bool {
        self.occupancy >= self.capacity as usize
    }
}

/// Per-zone occupancy for every configured zone.
pub fn zone_occupancy(roster: &Roster, registry: &ZoneRegistry) -> Vec<ZoneOccupancy> {
    registry
        .zones()
        .map(|zone| ZoneOccupancy {
            zone_id: zone.id.clone(),
            display_name: zone.display_name.clone(),
            occupancy: roster.occupancy(&zone.id),
            capacity: zone.capacity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{mandatory_zone_alerts, zone_occupancy};
    use crate::model::roster::Roster;
    use crate::model::seed::demo_roster;
    use crate::model::zone::{ZoneId, ZoneRegistry};

    #[test]
    fn empty_roster_raises_every_alert() {
        let alerts = mandatory_zone_alerts(&Roster::default(), &ZoneRegistry::default());
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|alert| alert.empty));
    }

    #[test]
    fn demo_roster_fills_reception_and_security() {
        let roster = Roster::new(demo_roster());
        let alerts = mandatory_zone_alerts(&roster, &ZoneRegistry::default());
        assert!(alerts.iter().all(|alert| !alert.empty));

        let summary = zone_occupancy(&roster, &ZoneRegistry::default());
        let reception = summary
            .iter()
            .find(|entry| entry.zone_id == ZoneId::new("reception"))
            .unwrap();
        assert_eq!((reception.occupancy, reception.capacity), (1, 2));
        assert!(!reception.is_full());
    }
}
