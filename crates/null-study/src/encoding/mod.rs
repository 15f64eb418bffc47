//! Categorical encoding.

mod one_hot;

pub use one_hot::{Indicator, OneHotEncoding, encode_one_hot};
