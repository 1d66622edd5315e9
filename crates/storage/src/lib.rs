#![forbid(unsafe_code)]

pub mod demo;
pub mod repository;
pub mod supabase;
