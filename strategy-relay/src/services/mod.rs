pub mod providers;
pub mod relay;
pub mod sanitize;

pub use relay::RelayService;
