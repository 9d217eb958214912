pub mod altloc;
pub mod report;
