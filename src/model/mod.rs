pub mod analysis;
pub mod constants;
pub mod decay;
pub mod glicko2;
pub mod glicko_model;
pub mod head_to_head;
pub mod matchups;
pub mod period;
pub mod rating_tracker;
pub mod structures;
pub mod timeline;
