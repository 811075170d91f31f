pub mod audit_service;
pub mod automation_service;
pub mod command_service;
pub mod gateway_service;
pub mod serial_service;
