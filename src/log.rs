//! Structured events, emitted through `tracing` when the `tracing` feature is
//! enabled and compiled out otherwise.

macro_rules! trace_event {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::trace!($($arg)+);
        }
    };
}

macro_rules! warn_event {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::warn!($($arg)+);
        }
    };
}

macro_rules! error_event {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::error!($($arg)+);
        }
    };
}

pub(crate) use {error_event, trace_event, warn_event};
