#[cfg(test)]
pub mod payroll;
