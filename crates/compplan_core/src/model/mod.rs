mod plan_type;
mod timeline;

pub use plan_type::{PlanType, UnknownPlanType};
pub use timeline::{SummaryRow, TimelineStep};
