pub mod init;
pub mod reset;
pub mod status;
pub mod take;
pub mod validate;
