pub mod apprunner;
pub mod deployment;
pub mod object_store;
pub mod s3;
