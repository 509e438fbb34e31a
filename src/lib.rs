pub mod display;
pub mod error;
pub mod reference;
pub mod scheduling;
pub mod web;
