//! Command definitions
//!
//! A command is the command name followed by ordered, binary-safe
//! arguments. Arguments carry no type: numbers travel as their decimal text.

use bytes::Bytes;

/// A request ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<Bytes>,
}

impl Command {
    /// Start a command with its name as the first argument
    pub fn new(name: &str) -> Self {
        Self {
            args: vec![Bytes::copy_from_slice(name.as_bytes())],
        }
    }

    /// Append one argument
    pub fn arg<A: ToArg>(mut self, arg: A) -> Self {
        self.args.push(arg.to_arg());
        self
    }

    /// Append one argument in place
    pub fn push_arg<A: ToArg>(&mut self, arg: A) {
        self.args.push(arg.to_arg());
    }

    /// The command name (first argument)
    pub fn name(&self) -> &[u8] {
        &self.args[0]
    }

    /// All arguments, name included
    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    /// Number of arguments after the name
    pub fn arg_count(&self) -> usize {
        self.args.len() - 1
    }
}

/// Conversion of a request argument into its wire bytes
pub trait ToArg {
    fn to_arg(&self) -> Bytes;
}

impl ToArg for Bytes {
    fn to_arg(&self) -> Bytes {
        self.clone()
    }
}

impl ToArg for &[u8] {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl<const N: usize> ToArg for &[u8; N] {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }
}

impl ToArg for Vec<u8> {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl ToArg for &str {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

macro_rules! decimal_to_arg {
    ($($ty:ty),*) => {
        $(
            impl ToArg for $ty {
                fn to_arg(&self) -> Bytes {
                    Bytes::from(self.to_string())
                }
            }
        )*
    };
}

decimal_to_arg!(i64, u64, i32, u32, usize, u8);

impl ToArg for f64 {
    /// Shortest text that parses back to the same value; never exponent form
    fn to_arg(&self) -> Bytes {
        Bytes::from(format!("{}", self))
    }
}

impl ToArg for bool {
    fn to_arg(&self) -> Bytes {
        Bytes::from_static(if *self { b"1" } else { b"0" })
    }
}
