pub mod inputs;
mod mock_logger;

pub use mock_logger::mock_logger;
