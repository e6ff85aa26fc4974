pub mod fetch;
pub mod init_config;
pub mod run;
