//! Structural edits on tables.
//!
//! Purge (drop) and flag (replace with a presence indicator) operations,
//! applied to a single column or to every column above a null-ratio
//! threshold.

mod purge_flag;

pub use purge_flag::{
    apply_edit, apply_flag, apply_flag_by_ratio, apply_purge, apply_purge_by_ratio,
};
