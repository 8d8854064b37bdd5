use crate::model::{PackResult, Size};

pub mod flow;

pub use flow::FlowPacker;

/// A line packer places items one at a time, in order, and produces the final layout.
///
/// Implementations must keep input order, never drop an item, and never let two items on
/// the same line overlap.
pub trait LinePacker<K> {
    fn push(&mut self, key: K, natural: Size);
    fn finish(self) -> PackResult<K>
    where
        Self: Sized;
}
