//! # Tutorial: Building HTTP Clients with courier
//!
//! Learn to declare REST and JSON-RPC clients step by step.
//!
//! ## Chapters
//!
//! 1. [Getting Started][chapter_0] - Your first REST method
//! 2. [Routing Parameters][chapter_1] - Path, query, headers, bodies, files
//! 3. [Responses and JSON-RPC][chapter_2] - Status policies, decoding, JSON-RPC
//!
//! Ready? Start with [Chapter 0: Getting Started][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
