// src/handlers/mod.rs

pub mod attempts;
pub mod auth;
pub mod docs;
pub mod questions;
pub mod quizzes;
pub mod users;
