use super::{BinaryName, Error, Name};
use crate::util::Width;
use std::iter::Peekable;
use std::str::Chars;

/// Utility trait for converting descriptors to string representations
pub trait RenderDescriptor {
    /// Turn the descriptor into a string
    fn render(&self) -> String {
        let mut string = String::new();
        self.render_to(&mut string);
        string
    }

    /// Write the descriptor to a string
    fn render_to(&self, write_to: &mut String);
}

/// Utility trait for reading descriptors back out of their string representations
pub trait ParseDescriptor: Sized {
    /// Parse a descriptor from a string, rejecting trailing input
    fn parse(source: &str) -> Result<Self, Error> {
        let mut chars = source.chars().peekable();
        let ret = Self::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(ret),
            Some(c) => Err(invalid(format!("Unexpected leftover input '{}'", c))),
        }
    }

    /// Read the descriptor from a character buffer
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, Error>;
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::BadDescriptor(msg.into())
}

fn eof(msg: &str) -> Error {
    Error::BadDescriptor(format!("Unexpected end of descriptor: {}", msg))
}

/// Primitive value types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    /// Every primitive type, in descriptor character order
    pub const ALL: [BaseType; 8] = [
        BaseType::Byte,
        BaseType::Char,
        BaseType::Double,
        BaseType::Float,
        BaseType::Int,
        BaseType::Long,
        BaseType::Short,
        BaseType::Boolean,
    ];

    fn descriptor_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    fn from_descriptor_char(c: char) -> Option<BaseType> {
        BaseType::ALL
            .iter()
            .copied()
            .find(|base_type| base_type.descriptor_char() == c)
    }
}

impl Width for BaseType {
    fn width(&self) -> usize {
        match self {
            BaseType::Double | BaseType::Long => 2,
            _ => 1,
        }
    }
}

impl RenderDescriptor for BaseType {
    fn render_to(&self, write_to: &mut String) {
        write_to.push(self.descriptor_char());
    }
}

impl ParseDescriptor for BaseType {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, Error> {
        match source.next() {
            Some(c) => BaseType::from_descriptor_char(c)
                .ok_or_else(|| invalid(format!("Invalid base type character '{}'", c))),
            None => Err(eof("Missing base type character")),
        }
    }
}

/// Reference type
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RefType<Class> {
    Object(Class),
    ObjectArray(ArrayType<Class>),
    PrimitiveArray(ArrayType<BaseType>),
}

/// Generic array type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArrayType<T> {
    /// Additional dimensions (`A[]` has 0 additional dimensions, `A[][][][]` has 3)
    pub additional_dimensions: usize,

    /// Underlying element type (`A` is the underlying element type of `A[][]`)
    pub element_type: T,
}

impl<T> ArrayType<T> {
    /// Total number of dimensions in the array type
    pub const fn dimensions(&self) -> usize {
        self.additional_dimensions + 1
    }
}

impl<T: RenderDescriptor> RenderDescriptor for ArrayType<T> {
    fn render_to(&self, write_to: &mut String) {
        for _ in 0..self.dimensions() {
            write_to.push('[');
        }
        self.element_type.render_to(write_to);
    }
}

impl RenderDescriptor for BinaryName {
    fn render_to(&self, write_to: &mut String) {
        write_to.push('L');
        write_to.push_str(self.as_str());
        write_to.push(';');
    }
}

impl ParseDescriptor for BinaryName {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, Error> {
        if source.next() != Some('L') {
            return Err(invalid("Expected object type to start with `L`"));
        }
        let mut class_name = String::new();
        loop {
            match source.next() {
                Some(';') => {
                    return BinaryName::from_string(class_name)
                        .map_err(|err| invalid(format!("Bad class name in descriptor: {}", err)))
                }
                Some(c) => class_name.push(c),
                None => {
                    let msg = format!("Missing terminator for 'L{}'", class_name);
                    return Err(invalid(msg));
                }
            }
        }
    }
}

impl<C: RenderDescriptor> RenderDescriptor for RefType<C> {
    fn render_to(&self, write_to: &mut String) {
        match self {
            RefType::Object(cls) => cls.render_to(write_to),
            RefType::PrimitiveArray(arr) => arr.render_to(write_to),
            RefType::ObjectArray(arr) => arr.render_to(write_to),
        }
    }
}

impl<C: ParseDescriptor> ParseDescriptor for RefType<C> {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, Error> {
        match source.peek().copied() {
            Some('L') => Ok(RefType::Object(C::parse_from(source)?)),
            Some('[') => {
                let mut dimensions = 0;
                while source.next_if_eq(&'[').is_some() {
                    dimensions += 1;
                }
                let additional_dimensions = dimensions - 1;
                if source.peek() == Some(&'L') {
                    Ok(RefType::ObjectArray(ArrayType {
                        additional_dimensions,
                        element_type: C::parse_from(source)?,
                    }))
                } else {
                    Ok(RefType::PrimitiveArray(ArrayType {
                        additional_dimensions,
                        element_type: BaseType::parse_from(source)?,
                    }))
                }
            }
            Some(c) => Err(invalid(format!("Invalid reference type character '{}'", c))),
            None => Err(eof("Missing reference type")),
        }
    }
}

impl<C> RefType<C> {
    /// Array whose elements have the given type
    pub fn array(field_type: FieldType<C>) -> RefType<C> {
        match field_type {
            FieldType::Base(element_type) => RefType::PrimitiveArray(ArrayType {
                additional_dimensions: 0,
                element_type,
            }),
            FieldType::Ref(RefType::Object(element_type)) => RefType::ObjectArray(ArrayType {
                additional_dimensions: 0,
                element_type,
            }),
            FieldType::Ref(RefType::PrimitiveArray(arr)) => RefType::PrimitiveArray(ArrayType {
                additional_dimensions: arr.additional_dimensions + 1,
                element_type: arr.element_type,
            }),
            FieldType::Ref(RefType::ObjectArray(arr)) => RefType::ObjectArray(ArrayType {
                additional_dimensions: arr.additional_dimensions + 1,
                element_type: arr.element_type,
            }),
        }
    }
}

impl RefType<BinaryName> {
    /// Operand form used by `checkcast`, `new`, `anewarray` and friends
    ///
    /// Classes are written as their bare binary name, while arrays use their full descriptor.
    pub fn internal_name(&self) -> String {
        match self {
            RefType::Object(name) => name.as_str().to_owned(),
            array => array.render(),
        }
    }
}

/// Type of a class, instance, or local variable
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldType<Class> {
    Base(BaseType),
    Ref(RefType<Class>),
}

impl<C> Width for FieldType<C> {
    fn width(&self) -> usize {
        match self {
            FieldType::Base(base_type) => base_type.width(),
            FieldType::Ref(_) => 1,
        }
    }
}

impl<C> FieldType<C> {
    pub fn array(field_type: FieldType<C>) -> FieldType<C> {
        FieldType::Ref(RefType::array(field_type))
    }

    pub const fn object(class_name: C) -> FieldType<C> {
        FieldType::Ref(RefType::Object(class_name))
    }

    pub const fn int() -> FieldType<C> {
        FieldType::Base(BaseType::Int)
    }

    pub const fn long() -> FieldType<C> {
        FieldType::Base(BaseType::Long)
    }

    pub const fn float() -> FieldType<C> {
        FieldType::Base(BaseType::Float)
    }

    pub const fn double() -> FieldType<C> {
        FieldType::Base(BaseType::Double)
    }

    pub const fn char() -> FieldType<C> {
        FieldType::Base(BaseType::Char)
    }

    pub const fn short() -> FieldType<C> {
        FieldType::Base(BaseType::Short)
    }

    pub const fn byte() -> FieldType<C> {
        FieldType::Base(BaseType::Byte)
    }

    pub const fn boolean() -> FieldType<C> {
        FieldType::Base(BaseType::Boolean)
    }
}

impl<C: RenderDescriptor> RenderDescriptor for FieldType<C> {
    fn render_to(&self, write_to: &mut String) {
        match self {
            FieldType::Base(base_type) => base_type.render_to(write_to),
            FieldType::Ref(reference_type) => reference_type.render_to(write_to),
        }
    }
}

impl<C: ParseDescriptor> ParseDescriptor for FieldType<C> {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, Error> {
        match source.peek().copied() {
            None => Err(eof("Missing field type")),
            Some('L' | '[') => RefType::parse_from(source).map(FieldType::Ref),
            Some(_) => BaseType::parse_from(source).map(FieldType::Base),
        }
    }
}

/// Signature of a method
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub struct MethodDescriptor<Class> {
    pub parameters: Vec<FieldType<Class>>,
    pub return_type: Option<FieldType<Class>>, // `None` is for `void` (ie. no return)
}

impl<C> MethodDescriptor<C> {
    /// Total slot length of parameters (not the same as the length of the vector), which must be
    /// 255 or less for it to be valid
    pub fn parameter_length(&self, has_this_param: bool) -> usize {
        let this_len = if has_this_param { 1 } else { 0 };
        this_len + self.parameters.iter().map(Width::width).sum::<usize>()
    }
}

impl<C: RenderDescriptor> RenderDescriptor for MethodDescriptor<C> {
    fn render_to(&self, write_to: &mut String) {
        write_to.push('(');
        for parameter in &self.parameters {
            parameter.render_to(write_to);
        }
        write_to.push(')');
        match &self.return_type {
            None => write_to.push('V'),
            Some(typ) => typ.render_to(write_to),
        };
    }
}

impl<C: ParseDescriptor> ParseDescriptor for MethodDescriptor<C> {
    fn parse_from(source: &mut Peekable<Chars>) -> Result<Self, Error> {
        if source.next() != Some('(') {
            return Err(invalid("Expected '(' for method"));
        }

        let mut parameters = vec![];
        loop {
            match source.peek() {
                Some(')') => break,
                None => return Err(eof("Expected ')' for method")),
                Some(_) => parameters.push(FieldType::<C>::parse_from(source)?),
            }
        }
        let _ = source.next();

        let return_type = if source.next_if_eq(&'V').is_some() {
            None
        } else {
            Some(FieldType::<C>::parse_from(source)?)
        };

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fmt::Debug;

    fn round_trip<T: RenderDescriptor + ParseDescriptor + Debug + Eq>(rendered: &str, parsed: T) {
        assert_eq!(rendered, parsed.render());
        assert_eq!(T::parse(rendered).unwrap(), parsed);
    }

    type FT = FieldType<BinaryName>;

    const INT: FT = FieldType::Base(BaseType::Int);
    const LONG: FT = FieldType::Base(BaseType::Long);
    const DOUBLE: FT = FieldType::Base(BaseType::Double);
    const OBJECT: FT = FieldType::object(BinaryName::OBJECT);
    const STRING: FT = FieldType::object(BinaryName::STRING);

    #[test]
    fn field_types() {
        round_trip("J", LONG);
        round_trip("Ljava/lang/Object;", OBJECT);
        round_trip(
            "[[[D",
            FieldType::array(FieldType::array(FieldType::array(DOUBLE))),
        );
        round_trip("[Ljava/lang/String;", FieldType::array(STRING));
    }

    #[test]
    fn method_descriptors() {
        round_trip(
            "(IJLjava/lang/String;)Ljava/lang/Object;",
            MethodDescriptor {
                parameters: vec![INT, LONG, STRING],
                return_type: Some(OBJECT),
            },
        );
        round_trip(
            "()V",
            MethodDescriptor {
                parameters: Vec::<FT>::new(),
                return_type: None,
            },
        );
    }

    #[test]
    fn malformed_descriptors() {
        assert!(MethodDescriptor::<BinaryName>::parse("(I").is_err());
        assert!(MethodDescriptor::<BinaryName>::parse("I)V").is_err());
        assert!(FieldType::<BinaryName>::parse("Ljava/lang/Object").is_err());
        assert!(FieldType::<BinaryName>::parse("Q").is_err());
        assert!(FieldType::<BinaryName>::parse("II").is_err());
        assert!(matches!(
            FieldType::<BinaryName>::parse("Ljava//Object;"),
            Err(Error::BadDescriptor(_))
        ));
    }

    #[test]
    fn parameter_slots() {
        let desc = MethodDescriptor::<BinaryName>::parse("(IJLjava/lang/String;D)V").unwrap();
        assert_eq!(desc.parameter_length(false), 6);
        assert_eq!(desc.parameter_length(true), 7);
    }

    #[test]
    fn internal_names() {
        assert_eq!(RefType::Object(BinaryName::STRING).internal_name(), "java/lang/String");
        let ints: RefType<BinaryName> = RefType::array(FieldType::int());
        assert_eq!(ints.internal_name(), "[I");
    }
}
