// Domain modules

pub mod auth;
pub mod catalog;
pub mod member;
