use serde::Serialize;

pub const PROJECTION_MONTHS: u32 = 12;

/// One month of the revenue projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthProjection {
    pub month: u32,
    pub users: u64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

/// Project twelve months of revenue under compounding user growth
///
/// Month 1 uses `start_users` as-is. Each following month grows the previous
/// user count by `growth_rate` percent, rounded down. Cost scales linearly
/// with users relative to month 1.
pub fn project_revenue(
    start_users: u64,
    price: f64,
    adjusted_cost: f64,
    growth_rate: f64,
) -> Vec<MonthProjection> {
    let baseline = start_users.max(1) as f64;
    let growth_percent = 100.0 + growth_rate;
    let mut users = start_users;
    let mut months = Vec::with_capacity(PROJECTION_MONTHS as usize);

    for month in 1..=PROJECTION_MONTHS {
        if month > 1 {
            // Scale by the percentage first so 100 users at 15% is exactly 115
            users = (users as f64 * growth_percent / 100.0).floor().max(0.0) as u64;
        }
        let revenue = users as f64 * price;
        let cost = adjusted_cost * users as f64 / baseline;
        months.push(MonthProjection {
            month,
            users,
            revenue,
            cost,
            profit: revenue - cost,
        });
    }

    months
}

/// First month whose user count reaches `target_users`
pub fn month_reaching_users(projection: &[MonthProjection], target_users: u64) -> Option<u32> {
    projection
        .iter()
        .find(|m| m.users >= target_users)
        .map(|m| m.month)
}

/// First month whose cumulative profit covers `investment`
pub fn payback_month(projection: &[MonthProjection], investment: f64) -> Option<u32> {
    let mut cumulative = 0.0;
    for month in projection {
        cumulative += month.profit;
        if cumulative >= investment {
            return Some(month.month);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_example() {
        let projection = project_revenue(100, 10.0, 500.0, 15.0);

        assert_eq!(projection.len(), 12);

        let first = projection[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.users, 100);
        assert_eq!(first.cost, 500.0);
        assert_eq!(first.revenue, 1000.0);
        assert_eq!(first.profit, 500.0);

        let second = projection[1];
        assert_eq!(second.month, 2);
        assert_eq!(second.users, 115);
        assert!((second.cost - 575.0).abs() < 1e-9);
        assert!((second.revenue - 1150.0).abs() < 1e-9);
        assert!((second.profit - 575.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_floors_every_month() {
        let projection = project_revenue(10, 1.0, 0.0, 15.0);
        // 10 -> 11 (11.5) -> 12 (12.65) -> 13 (13.8)
        let users: Vec<u64> = projection.iter().take(4).map(|m| m.users).collect();
        assert_eq!(users, vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_zero_growth_is_flat() {
        let projection = project_revenue(250, 4.0, 300.0, 0.0);
        assert!(projection.iter().all(|m| m.users == 250 && m.cost == 300.0));
        assert_eq!(projection.last().unwrap().month, 12);
    }

    #[test]
    fn test_milestones() {
        let projection = project_revenue(100, 10.0, 500.0, 15.0);

        assert_eq!(month_reaching_users(&projection, 100), Some(1));
        // 100 -> 115 -> 132 -> 151
        assert_eq!(month_reaching_users(&projection, 150), Some(4));
        assert_eq!(month_reaching_users(&projection, 1_000_000), None);

        // 500 + 575 = 1075 after month 2
        assert_eq!(payback_month(&projection, 1000.0), Some(2));
        assert_eq!(payback_month(&projection, 1e9), None);
    }
}
