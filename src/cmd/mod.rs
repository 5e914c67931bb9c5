pub mod execute;
pub mod execution_plan;
