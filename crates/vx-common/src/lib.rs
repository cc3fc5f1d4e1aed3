//! Common types shared by the grid verification crates.
//!
//! The central type is [`DataPlane`], a dense `nx * ny` field of `f64`
//! values in which any cell may hold the missing-value sentinel
//! [`BAD_DATA`]. [`MaskPlane`] is its boolean counterpart and
//! [`SingleThresh`] is the comparison used to turn a field into events.

pub mod bad_data;
pub mod bbox;
pub mod data_plane;
pub mod error;
pub mod mask;
pub mod threshold;

pub use bad_data::{is_bad_data, is_eq, BAD_DATA};
pub use bbox::BoundingBox;
pub use data_plane::{Axis, DataPlane};
pub use error::{VxError, VxResult};
pub use mask::MaskPlane;
pub use threshold::{SingleThresh, ThreshOp};
