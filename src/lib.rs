//! Fundraiser registry
//!
//! NGOs, their fundraisers, individually organized fundraisers and
//! fundraiser updates, stored together in one partition/sort key table.
//! Record kind and parent/child relationships are encoded in the keys
//! (see [`keys`]); listings are prefix queries over one partition.

pub mod config;
pub mod entities;
pub mod handlers;
pub mod interfaces;
pub mod keys;
pub mod repository;
pub mod storage;
pub mod utils;
