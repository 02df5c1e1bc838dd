pub mod generate;
pub mod openapi;
pub mod serve;

pub use generate::generate;
pub use openapi::print_openapi;
pub use serve::serve;
