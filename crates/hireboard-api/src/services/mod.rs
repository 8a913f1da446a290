//! Request-scoped services that sit between handlers and the backends.

pub mod file_transfer;
pub mod second_factor;

pub use file_transfer::{FileTransferService, TransferSettings};
pub use second_factor::SecondFactorVerifier;
