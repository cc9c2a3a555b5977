//! Integration tests for the Book Register web client

mod common;
