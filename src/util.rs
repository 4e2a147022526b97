/// Number of local variable slots (or operand stack entries) a value occupies
///
/// `long` and `double` are the only types with a width of 2.
pub trait Width {
    fn width(&self) -> usize;
}
