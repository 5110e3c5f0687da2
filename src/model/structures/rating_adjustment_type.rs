use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::EnumIter;

/// Tags a history entry: a full Glicko-2 period update, or an inactivity-only RD inflation.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[repr(u8)]
pub enum RatingAdjustmentType {
    PeriodUpdate = 0,
    Decay = 1
}

impl TryFrom<i32> for RatingAdjustmentType {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(RatingAdjustmentType::PeriodUpdate),
            1 => Ok(RatingAdjustmentType::Decay),
            _ => Err(())
        }
    }
}
