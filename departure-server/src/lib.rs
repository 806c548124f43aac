//! Departure planner server.
//!
//! A web application that answers: "When is the latest I can leave and
//! still get there on time?" Travel times come from a maps service with
//! live and predicted traffic.

pub mod cache;
pub mod config;
pub mod domain;
pub mod maps;
pub mod planner;
pub mod web;
