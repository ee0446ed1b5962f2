//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod account;
pub mod place;
pub mod region;
pub mod review;
pub mod tag;

pub use validation::{search_term, ValidationError};
pub use account::{NoticeBody, UserId, UserProfile};
pub use place::PlaceSort;
pub use region::{parse_exclude_ids, Region};
pub use review::{Rating, ReviewContent};
pub use tag::TagName;
