pub mod quote;
pub mod time_of_day;
