pub mod health;
pub mod invites;
pub mod members;
pub mod notifications;
pub mod programs;
pub mod workouts;
