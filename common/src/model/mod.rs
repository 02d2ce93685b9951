pub mod data;
pub mod records;
pub mod report;
pub mod row;
