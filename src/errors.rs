pub use nix::errno::Errno::{self, *};
use nix::Error as NixError;
use std::io::Error as IOError;
use std::{
    fmt::{self, Display},
    result,
};
pub type Result<T> = result::Result<T, Error>;

/// This struct is an abstraction of exceptions encountered in the code. It is
/// inspired by [`anyhow`]. Every error carries an `errno`, so that it can be
/// handed straight back to a caller expecting a raw errno value.
///
/// [`anyhow`]: https://docs.rs/anyhow/1.0.40/anyhow/
pub struct Error {
    errno: Errno,
    msg: Option<Box<dyn Display + Send + Sync + 'static>>,
    source: Option<Box<dyn std::error::Error>>,
}

#[allow(dead_code)]
impl Error {
    /// Create an Error with a unknown errno
    pub fn unknown() -> Self {
        Error::errno(Errno::UnknownErrno)
    }

    /// Create an Error with the specific errno
    pub fn errno(errno: Errno) -> Self {
        Error {
            errno,
            msg: None,
            source: None,
        }
    }

    /// Create an Error with the specific message
    pub fn msg<M>(msg: M) -> Self
    where
        M: Display + Send + Sync + 'static,
    {
        Error::errno_with_msg(Errno::UnknownErrno, msg)
    }

    /// Create an Error with the specific errno and message
    pub fn errno_with_msg<M>(errno: Errno, msg: M) -> Self
    where
        M: Display + Send + Sync + 'static,
    {
        Error {
            errno,
            msg: Some(Box::new(msg)),
            source: None,
        }
    }

    /// A component or the assembled path would exceed its bound.
    pub fn name_too_long<M: Display + Send + Sync + 'static>(msg: M) -> Self {
        Error::errno_with_msg(Errno::ENAMETOOLONG, msg)
    }

    /// A non-final component resolves to a non-directory, or `dir_fd` does
    /// not refer to a directory.
    pub fn not_a_directory<M: Display + Send + Sync + 'static>(msg: M) -> Self {
        Error::errno_with_msg(Errno::ENOTDIR, msg)
    }

    /// A non-final component does not exist.
    pub fn no_entry<M: Display + Send + Sync + 'static>(msg: M) -> Self {
        Error::errno_with_msg(Errno::ENOENT, msg)
    }

    /// Symlink dereference budget exhausted.
    pub fn too_many_links<M: Display + Send + Sync + 'static>(msg: M) -> Self {
        Error::errno_with_msg(Errno::ELOOP, msg)
    }

    /// A path escapes the area the caller is allowed to see.
    pub fn permission_denied<M: Display + Send + Sync + 'static>(msg: M) -> Self {
        Error::errno_with_msg(Errno::EACCES, msg)
    }

    /// Unexpected failure of a host syscall.
    pub fn operation_failed<M: Display + Send + Sync + 'static>(msg: M) -> Self {
        Error::errno_with_msg(Errno::EIO, msg)
    }

    /// Set errno of self to a specific errno, and return this Error.
    pub fn with_errno(mut self, errno: Errno) -> Self {
        self.errno = errno;
        self
    }

    /// Set message of self to a specific message, and return this Error.
    pub fn with_msg<M>(mut self, msg: M) -> Self
    where
        M: Display + Send + Sync + 'static,
    {
        self.msg = Some(Box::new(msg));
        self
    }

    /// Get errno of this Error. If errno is not set, the default value is
    /// `UnknownErrno`.
    pub fn get_errno(&self) -> Errno {
        self.errno
    }
}

#[allow(dead_code)]
impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error with {}({})", self.errno, self.errno as i32)?;

        if let Some(msg) = &self.msg {
            write!(f, ", msg: {}", msg)?;
        }
        if let Some(source) = &self.source {
            write!(f, ", source: {}", source)?;
        }
        Ok(())
    }
}

#[allow(dead_code)]
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Error");
        d.field("errno", &self.errno);
        match self.msg.as_ref() {
            Some(msg) => d.field("msg", &Some(format_args!("{}", msg))),
            None => d.field("msg", &Option::<()>::None),
        };
        d.field("source", &self.source).finish()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.errno == other.errno
    }
}

impl std::error::Error for Error {}

impl From<Errno> for Error {
    fn from(errno: Errno) -> Error {
        Error::errno(errno)
    }
}

impl From<IOError> for Error {
    fn from(error: IOError) -> Error {
        Error {
            errno: match error.raw_os_error() {
                // we try to convert it to an errno
                Some(errno) => Errno::from_i32(errno),
                None => Errno::UnknownErrno,
            },
            msg: None,
            source: Some(Box::new(error)),
        }
    }
}

impl From<NixError> for Error {
    fn from(error: NixError) -> Error {
        Error {
            errno: match error {
                NixError::Sys(errno) => errno,
                _ => Errno::UnknownErrno,
            },
            msg: None,
            source: Some(Box::new(error)),
        }
    }
}

/// This trait is something like [`anyhow::Context`], which provide
/// `with_context()` and `context()` function to attach a message to
/// `Result<T,E>`, In addition, it also allows appending an `errno` value.
///
/// Implemented directly for `io::Error` and `nix::Error` instead of via a
/// blanket `impl<E: std::error::Error>` — that blanket requires
/// specialization (nightly-only) to coexist with the concrete `From` impls
/// above, which this crate avoids.
///
/// [`anyhow::Context`]: https://docs.rs/anyhow/1.0.40/anyhow/trait.Context.html
#[allow(dead_code)]
pub trait WithContext<T> {
    fn errno(self, errno: Errno) -> Result<T>;

    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

macro_rules! impl_with_context {
    ($from:ty) => {
        impl<T> WithContext<T> for result::Result<T, $from> {
            fn errno(self, errno: Errno) -> Result<T> {
                self.map_err(|error| Error::from(error).with_errno(errno))
            }

            fn context<C>(self, context: C) -> Result<T>
            where
                C: Display + Send + Sync + 'static,
            {
                self.map_err(|error| Error::from(error).with_msg(context))
            }

            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: Display + Send + Sync + 'static,
                F: FnOnce() -> C,
            {
                self.map_err(|error| Error::from(error).with_msg(f()))
            }
        }
    };
}

impl_with_context!(Error);
impl_with_context!(IOError);
impl_with_context!(NixError);
impl_with_context!(Errno);
