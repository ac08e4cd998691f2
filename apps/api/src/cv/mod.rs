// CV API: inline text parsing and batch PDF upload.
pub mod handlers;
pub mod upload;
