//! The token stored in the encrypted auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::UserID;

// Hours are always two digits, otherwise midnight would not parse back.
time::serde::format_description!(
    expiry_format,
    OffsetDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] \
     [offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
);

/// Who is logged in, and until when.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub user_id: UserID,
    #[serde(with = "expiry_format")]
    pub expires_at: OffsetDateTime,
}
