//! Blogfront - read-model front end for a blog
//!
//! Builds page documents (home, post detail, tag filter, contacts) from a
//! relational content store and renders them as HTML or JSON.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
