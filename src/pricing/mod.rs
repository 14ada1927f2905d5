pub mod calculator;
pub mod models;
pub mod projection;
pub mod tiers;

pub use calculator::{classify_strategy, recompute, CostBreakdown, CostCalculator, DerivedMetrics, Strategy};
pub use models::{ContextWindowOption, ModelCatalog, ModelPricing, UsagePreset};
pub use projection::{project_revenue, MonthProjection};
pub use tiers::{standard_ladder, target_ladder, PricingTier, StandardLadder, UsageTier};
