pub use types::helper_functions_types::Error;
