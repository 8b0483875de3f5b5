pub mod companies;
pub mod health;
