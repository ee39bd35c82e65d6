pub mod macros;
pub mod payroll;
pub mod report;

mod test;
