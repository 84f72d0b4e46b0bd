pub mod check;
pub mod decode;
pub mod init;

pub use check::{check, CheckArgs};
pub use decode::{decode, DecodeArgs};
pub use init::{init, InitArgs};
