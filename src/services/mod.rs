pub mod posters;
pub mod recommendations;
