pub mod event_importance;
pub mod finish_status;
pub mod rating_adjustment_type;
pub mod rating_period;
