pub mod raptor;
pub mod scan_result;
