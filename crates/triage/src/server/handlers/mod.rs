pub mod demands;
pub mod status;
