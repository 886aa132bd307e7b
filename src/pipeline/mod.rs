pub mod aggregate;
pub mod assemble;
pub mod categorize;
pub mod evaluate;
