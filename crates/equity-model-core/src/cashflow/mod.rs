pub mod timeline;

pub use timeline::{
    compute_timeline, first_affordable_month, CashflowMonth, CashflowTimeline, OperatingCostPolicy,
    SalaryPolicy, TimelineParams,
};
