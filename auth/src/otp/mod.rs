pub mod manager;

pub use manager::OtpManager;
