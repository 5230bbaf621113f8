//! Facility Bed Occupancy

use serde::{Deserialize, Serialize};

/// Bed occupancy counts for the facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedOccupancy {
    pub total_beds: u32,
    pub occupied_beds: u32,
}

impl BedOccupancy {
    /// Beds currently free
    pub fn available_beds(&self) -> u32 {
        self.total_beds.saturating_sub(self.occupied_beds)
    }

    /// Occupied fraction, 0.0 when the facility has no beds
    pub fn occupancy_ratio(&self) -> f64 {
        if self.total_beds == 0 {
            return 0.0;
        }
        f64::from(self.occupied_beds) / f64::from(self.total_beds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        let occ = BedOccupancy { total_beds: 10, occupied_beds: 9 };
        assert_eq!(occ.occupancy_ratio(), 0.9);
        assert_eq!(occ.available_beds(), 1);
    }

    #[test]
    fn test_empty_facility() {
        let occ = BedOccupancy { total_beds: 0, occupied_beds: 0 };
        assert_eq!(occ.occupancy_ratio(), 0.0);
        assert_eq!(occ.available_beds(), 0);
    }

    #[test]
    fn test_overbooked_saturates() {
        let occ = BedOccupancy { total_beds: 5, occupied_beds: 7 };
        assert_eq!(occ.available_beds(), 0);
    }
}
