//! Internal logging shims. With the `log` feature disabled the
//! format string is still checked but the arguments are never evaluated.

#[cfg(feature = "log")]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::log::trace!($($arg)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)*) => {{
        let _ = || {
            let _ = ::core::format_args!($($arg)*);
        };
    }};
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = || {
            let _ = ::core::format_args!($($arg)*);
        };
    }};
}
