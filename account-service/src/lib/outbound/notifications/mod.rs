pub mod reset;

pub use reset::LoggingResetNotifier;
