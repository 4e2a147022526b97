use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque label
///
/// Labels are compared by identity: two labels are equal only if one is a copy of the other.
/// They carry no payload and no position, the position of a label is wherever its
/// [`Instruction::Label`](super::Instruction::Label) marker is placed in an instruction list.
#[derive(Copy, Clone, Hash, Eq, PartialEq)]
pub struct Label(u64);

static NEXT_LABEL: AtomicU64 = AtomicU64::new(0);

impl Label {
    /// Get a label which is distinct from every other label created in this process
    pub fn fresh() -> Label {
        Label(NEXT_LABEL.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_fmt(format_args!("l{}", self.0))
    }
}
