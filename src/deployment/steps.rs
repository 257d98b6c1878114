pub mod assemble_report;
pub mod auction;
pub mod link;
pub mod review;
