//! Numeric helpers and tolerances shared by the intersection routines.

pub use self::consts::*;
pub use self::inv::{inv_dir, inv_or_huge};

mod consts;
mod inv;
