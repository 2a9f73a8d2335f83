pub mod acknowledger;
pub mod error;
pub mod executable_utils;
pub mod lister;
pub mod model;
pub mod operation_id;
pub mod persister;
pub mod printer;
pub mod processor;
pub mod report;
pub mod service;
pub mod telemetry;
