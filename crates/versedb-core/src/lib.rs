#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod canon;
pub mod config;
pub mod error;
pub mod nav;
pub mod traits;
pub mod types;
