#![allow(dead_code)]

pub mod keeper;
