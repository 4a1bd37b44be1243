pub mod activity;
pub mod goal;
pub mod interview;
pub mod month;
pub mod office_hours;
pub mod profile;
pub mod reminder;
pub mod resume;
pub mod review;
