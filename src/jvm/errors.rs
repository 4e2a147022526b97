use super::code::Label;
use super::BinaryName;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The lookup capability could not locate a class
    ClassNotFound(BinaryName),

    /// A label is referenced in a method body but never placed in it
    DanglingLabel(Label),

    /// A label is placed more than once in the same method body
    DuplicateLabel(Label),

    /// A local access overlaps a parameter without matching its slots (for instance, the upper
    /// half of a `long`/`double`, or a wide access starting on a narrow parameter)
    SlotWidthMismatch { slot: u16, parameter: usize },

    /// The parameters of a method need more slots than a method may have (255, `this` included)
    TooManyParameterSlots(usize),

    /// A descriptor string is malformed
    BadDescriptor(String),

    /// A class, method or field name is malformed
    BadName(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ClassNotFound(name) => write!(f, "class not found: {}", name),
            Error::DanglingLabel(label) => write!(f, "label {:?} is referenced but never placed", label),
            Error::DuplicateLabel(label) => write!(f, "label {:?} is placed more than once", label),
            Error::SlotWidthMismatch { slot, parameter } => write!(
                f,
                "access to slot {} does not match the width of parameter {}",
                slot, parameter
            ),
            Error::TooManyParameterSlots(slots) => {
                write!(f, "parameters need {} slots, at most 255 are allowed", slots)
            }
            Error::BadDescriptor(msg) => write!(f, "bad descriptor: {}", msg),
            Error::BadName(msg) => write!(f, "bad name: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
