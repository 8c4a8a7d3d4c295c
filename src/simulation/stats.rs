//! Aggregate statistics over the autonomous population

use crate::entity::pedestrian::Pedestrian;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PedestrianStats {
    pub total_count: usize,
    pub shopping_count: usize,
    pub walking_count: usize,
    pub idle_count: usize,
    /// 0.0 when there are no autonomous pedestrians
    pub average_satisfaction: f32,
    pub total_money_spent: f32,
}

impl PedestrianStats {
    pub fn summary(&self) -> String {
        format!(
            "{} pedestrians ({} shopping, {} walking, {} idle), satisfaction {:.2}, spent {:.2}",
            self.total_count,
            self.shopping_count,
            self.walking_count,
            self.idle_count,
            self.average_satisfaction,
            self.total_money_spent,
        )
    }
}

/// Single pass over autonomous pedestrians; scripted ones are ignored
pub fn aggregate_stats(pedestrians: &[Pedestrian]) -> PedestrianStats {
    let mut stats = PedestrianStats::default();
    let mut satisfaction_sum = 0.0_f64;

    for pedestrian in pedestrians.iter().filter(|p| p.autonomous) {
        stats.total_count += 1;
        if pedestrian.is_shopping() {
            stats.shopping_count += 1;
        } else if pedestrian.is_walking() {
            stats.walking_count += 1;
        } else {
            stats.idle_count += 1;
        }
        satisfaction_sum += f64::from(pedestrian.satisfaction());
        stats.total_money_spent += pedestrian.total_spent();
    }

    if stats.total_count > 0 {
        stats.average_satisfaction = (satisfaction_sum / stats.total_count as f64) as f32;
    }
    stats
}
