pub mod bindings_handler;
pub mod instances_handler;
pub mod problem;
