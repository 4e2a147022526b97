use super::Error;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Error as FmtError, Formatter};

/// Names of methods, fields
///
/// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.2.2>
#[derive(Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct UnqualifiedName(Cow<'static, str>);

/// Names of classes and interfaces, in their internal `/`-separated form
///
/// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.2.1>
#[derive(Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct BinaryName(Cow<'static, str>);

/// Extracts the raw underlying string name
impl AsRef<str> for UnqualifiedName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

/// Extracts the raw underlying string name
impl AsRef<str> for BinaryName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

pub trait Name: Sized {
    /// Check if a string would be a valid name
    fn check_valid(name: impl AsRef<str>) -> Result<(), Error>;

    /// Extact the raw underlying string data
    fn as_cow(&self) -> &Cow<'static, str>;

    /// Extact the raw underlying string name
    fn as_str(&self) -> &str {
        self.as_cow().as_ref()
    }

    /// Try to construct a name from a string
    fn from_string(name: String) -> Result<Self, Error>;
}

impl Name for UnqualifiedName {
    fn check_valid(name: impl AsRef<str>) -> Result<(), Error> {
        let name = name.as_ref();
        if name.contains(&['.', ';', '[', '/'][..]) {
            Err(Error::BadName(format!(
                "Unqualified name '{}' contains an illegal character",
                name
            )))
        } else if name.is_empty() {
            Err(Error::BadName(format!("Unqualified name '{}' is empty", name)))
        } else {
            Ok(())
        }
    }

    fn as_cow(&self) -> &Cow<'static, str> {
        &self.0
    }

    fn from_string(name: String) -> Result<Self, Error> {
        Self::check_valid(&name)?;
        Ok(UnqualifiedName(Cow::Owned(name)))
    }
}

impl Name for BinaryName {
    fn check_valid(name: impl AsRef<str>) -> Result<(), Error> {
        let name = name.as_ref();
        if name.is_empty() {
            Err(Error::BadName(format!("Binary name '{}' is empty", name)))
        } else {
            name.split('/').map(UnqualifiedName::check_valid).collect()
        }
    }

    fn as_cow(&self) -> &Cow<'static, str> {
        &self.0
    }

    fn from_string(name: String) -> Result<Self, Error> {
        Self::check_valid(&name)?;
        Ok(BinaryName(Cow::Owned(name)))
    }
}

impl Debug for UnqualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Debug for BinaryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Display for UnqualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Display for BinaryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl UnqualifiedName {
    const fn name(value: &'static str) -> UnqualifiedName {
        UnqualifiedName(Cow::Borrowed(value))
    }

    // Wrapper accessors and factories
    pub const BOOLEANVALUE: Self = Self::name("booleanValue");
    pub const BYTEVALUE: Self = Self::name("byteValue");
    pub const CHARVALUE: Self = Self::name("charValue");
    pub const DOUBLEVALUE: Self = Self::name("doubleValue");
    pub const FLOATVALUE: Self = Self::name("floatValue");
    pub const INTVALUE: Self = Self::name("intValue");
    pub const LONGVALUE: Self = Self::name("longValue");
    pub const SHORTVALUE: Self = Self::name("shortValue");
    pub const VALUEOF: Self = Self::name("valueOf");

    // Special unqualified names - only these are allowed to have angle brackets in them
    pub const INIT: Self = Self::name("<init>");
    pub const CLINIT: Self = Self::name("<clinit>");
}

impl BinaryName {
    /// Convert a source-style name (`java.lang.Object`) into a binary name (`java/lang/Object`)
    pub fn from_dotted(name: impl AsRef<str>) -> Result<BinaryName, Error> {
        BinaryName::from_string(name.as_ref().replace('.', "/"))
    }

    /// Render the name in source style, with `.` separating packages
    pub fn to_dotted(&self) -> String {
        self.as_str().replace('/', ".")
    }

    /// Last segment of the name (`Object` for `java/lang/Object`)
    pub fn simple_name(&self) -> &str {
        match self.as_str().rsplit_once('/') {
            Some((_, simple)) => simple,
            None => self.as_str(),
        }
    }

    const fn name(value: &'static str) -> BinaryName {
        BinaryName(Cow::Borrowed(value))
    }

    // JDK names
    pub const BOOLEAN: Self = Self::name("java/lang/Boolean");
    pub const BYTE: Self = Self::name("java/lang/Byte");
    pub const CHARACTER: Self = Self::name("java/lang/Character");
    pub const DOUBLE: Self = Self::name("java/lang/Double");
    pub const FLOAT: Self = Self::name("java/lang/Float");
    pub const INTEGER: Self = Self::name("java/lang/Integer");
    pub const LONG: Self = Self::name("java/lang/Long");
    pub const OBJECT: Self = Self::name("java/lang/Object");
    pub const SHORT: Self = Self::name("java/lang/Short");
    pub const STRING: Self = Self::name("java/lang/String");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dotted_names() {
        let name = BinaryName::from_dotted("java.util.Map$Entry").unwrap();
        assert_eq!(name.as_str(), "java/util/Map$Entry");
        assert_eq!(name.to_dotted(), "java.util.Map$Entry");
        assert_eq!(name.simple_name(), "Map$Entry");
        assert_eq!(BinaryName::OBJECT.simple_name(), "Object");
    }

    #[test]
    fn invalid_names() {
        assert!(BinaryName::from_dotted("").is_err());
        assert!(BinaryName::from_dotted("java..lang").is_err());
        assert!(UnqualifiedName::from_string(String::from("a/b")).is_err());
        assert!(UnqualifiedName::from_string(String::from("run")).is_ok());
        assert!(matches!(
            BinaryName::from_dotted("java.lang."),
            Err(Error::BadName(_))
        ));
    }
}
