use core::fmt::{self, Write};

/// A full type path that displays without its module prefixes.
///
/// `core::option::Option<alloc::string::String>` displays as `Option<String>`.
///
/// # Examples
///
/// ```
/// use lb_access::ShortName;
///
/// let name = ShortName::of::<Option<String>>();
/// assert_eq!(name.to_string(), "Option<String>");
/// assert_eq!(name.full(), core::any::type_name::<Option<String>>());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortName(&'static str);

impl ShortName {
    #[inline]
    pub const fn new(full: &'static str) -> Self {
        Self(full)
    }

    #[inline]
    pub fn of<T: ?Sized>() -> Self {
        Self(core::any::type_name::<T>())
    }

    /// Returns the full type path.
    #[inline]
    pub const fn full(&self) -> &'static str {
        self.0
    }

    /// Returns the last path segment of the outermost type, generics excluded.
    ///
    /// `a::b::Foo<c::Bar>` gives `Foo`.
    pub fn ident(&self) -> &'static str {
        let outer = match self.0.find('<') {
            Some(index) => &self.0[..index],
            None => self.0,
        };
        match outer.rfind("::") {
            Some(index) => &outer[index + 2..],
            None => outer,
        }
    }
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.0;
        let mut start = 0;
        let mut chars = full.char_indices().peekable();
        while let Some((index, c)) = chars.next() {
            if c == ':' {
                if let Some(&(_, ':')) = chars.peek() {
                    chars.next();
                    start = index + 2;
                }
                continue;
            }
            if c.is_alphanumeric() || c == '_' {
                continue;
            }
            f.write_str(&full[start..index])?;
            f.write_char(c)?;
            start = index + c.len_utf8();
        }
        f.write_str(&full[start..])
    }
}

impl fmt::Debug for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
